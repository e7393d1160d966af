//! Domain models
//!
//! Entity structs plus Create/Update payloads for every resource. The
//! `db` feature adds sqlx derives so the server can map rows directly.

pub mod branch;
pub mod customer;
pub mod expense;
pub mod laundry_category;
pub mod order;
pub mod payment;
pub mod pricing_rule;
pub mod report;
pub mod role;
pub mod service_type;
pub mod user;

pub use branch::{Branch, BranchCreate, BranchUpdate};
pub use customer::{Customer, CustomerCreate, CustomerUpdate};
pub use expense::{
    Expense, ExpenseCategory, ExpenseCategoryCreate, ExpenseCategoryUpdate, ExpenseCreate,
    ExpenseUpdate, ExpenseWithCategory,
};
pub use laundry_category::{LaundryCategory, LaundryCategoryCreate, LaundryCategoryUpdate};
pub use order::{
    DiscountType, Order, OrderCreate, OrderItem, OrderItemInput, OrderStatus, OrderUpdate,
    OrderWithDetails, PaymentStatus,
};
pub use payment::{Payment, PaymentCreate, PaymentMethod};
pub use pricing_rule::{PriceQuote, PricingRule, PricingRuleCreate, PricingRuleUpdate};
pub use report::{
    DashboardSummary, ExpenseByCategory, PaymentMethodBreakdown, RevenuePoint, TopService,
};
pub use role::Role;
pub use service_type::{ServiceType, ServiceTypeCreate, ServiceTypeUpdate, ServiceUnit};
pub use user::{BanRequest, SetRoleRequest, User, UserCreate, UserResponse, UserUpdate};
