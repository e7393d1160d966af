//! Permission Definitions
//!
//! Simplified RBAC permission system.
//!
//! ## 设计原则
//! - 基础读取（查看客户、订单、价目表）无需权限，登录即可使用
//! - 模块化权限：按功能模块授权
//! - 用户管理：仅 admin 角色可用（is_system 保护）

/// 可配置权限列表
/// 不包含 "all" 和 "users:manage"，这些是系统级权限
pub const ALL_PERMISSIONS: &[&str] = &[
    "customers:manage", // 客户管理（增删改）
    "orders:manage",    // 订单管理（创建、状态流转、折扣）
    "payments:record",  // 收款登记
    "expenses:manage",  // 支出管理
    "pricing:manage",   // 价格规则管理
    "catalog:manage",   // 服务与类别管理
    "branches:manage",  // 门店管理
    "reports:view",     // 报表查看
];

/// Admin 专属权限（不在可配置列表中）
pub const ADMIN_ONLY_PERMISSIONS: &[&str] = &[
    "users:manage", // 用户管理
    "all",          // 超级权限
];

/// Default role permissions
pub const DEFAULT_ADMIN_PERMISSIONS: &[&str] = &["all"];

/// 经理角色默认权限（全部可配置权限）
pub const DEFAULT_MANAGER_PERMISSIONS: &[&str] = &[
    "customers:manage",
    "orders:manage",
    "payments:record",
    "expenses:manage",
    "pricing:manage",
    "catalog:manage",
    "branches:manage",
    "reports:view",
];

/// 前台员工默认权限（收衣台基础操作）
pub const DEFAULT_STAFF_PERMISSIONS: &[&str] = &[
    "customers:manage",
    "orders:manage",
    "payments:record",
];

/// Get permissions for a role name
pub fn get_default_permissions(role_name: &str) -> Vec<String> {
    match role_name {
        "admin" => DEFAULT_ADMIN_PERMISSIONS
            .iter()
            .map(|s| s.to_string())
            .collect(),
        "manager" => DEFAULT_MANAGER_PERMISSIONS
            .iter()
            .map(|s| s.to_string())
            .collect(),
        "staff" => DEFAULT_STAFF_PERMISSIONS
            .iter()
            .map(|s| s.to_string())
            .collect(),
        _ => vec![],
    }
}

/// Validate if a role name is one of the assignable roles
pub fn is_valid_role(role_name: &str) -> bool {
    matches!(role_name, "admin" | "manager" | "staff")
}

/// Validate if a permission string is valid
pub fn is_valid_permission(permission: &str) -> bool {
    ALL_PERMISSIONS.contains(&permission)
        || ADMIN_ONLY_PERMISSIONS.contains(&permission)
        || permission.ends_with(":*")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_defaults() {
        assert_eq!(get_default_permissions("admin"), vec!["all"]);
        assert_eq!(
            get_default_permissions("manager").len(),
            ALL_PERMISSIONS.len()
        );
        assert!(get_default_permissions("staff").contains(&"orders:manage".to_string()));
        assert!(get_default_permissions("nobody").is_empty());
    }

    #[test]
    fn role_names() {
        assert!(is_valid_role("manager"));
        assert!(!is_valid_role("superuser"));
    }
}
