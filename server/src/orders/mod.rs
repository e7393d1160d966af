//! 订单业务模块
//!
//! - [`money`] - 金额计算（小计、折扣、应付/已付推导）

pub mod money;

pub use money::{OrderTotals, compute_totals, derive_payment_status, line_total, round2};
