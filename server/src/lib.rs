//! Laundry Server - 洗衣店业务管理服务
//!
//! # 架构概述
//!
//! 本模块是服务端主入口，提供以下核心功能：
//!
//! - **数据库** (`db`): SQLite (sqlx) 存储与按实体的仓储层
//! - **认证** (`auth`): JWT + Argon2 认证体系，静态角色/权限表
//! - **HTTP API** (`api`): RESTful API 接口
//! - **订单金额** (`orders`): 小计/折扣/收款状态推导
//! - **邮件** (`mailer`): 模板渲染与外部邮件 API
//!
//! # 模块结构
//!
//! ```text
//! server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、权限
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层与仓储
//! ├── orders/        # 订单金额计算
//! ├── mailer/        # 邮件模板与发送
//! └── utils/         # 错误、日志、校验
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod mailer;
pub mod orders;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState, setup_environment};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
    __                           __
   / /   ____ ___  ______  ____/ /______  __
  / /   / __ `/ / / / __ \/ __  / ___/ / / /
 / /___/ /_/ / /_/ / / / / /_/ / /  / /_/ /
/_____/\__,_/\__,_/_/ /_/\__,_/_/   \__, /
                                   /____/
    "#
    );
}
