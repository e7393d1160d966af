use std::sync::Arc;

use dashmap::DashMap;
use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::{DbService, seed};
use crate::mailer::Mailer;

/// 资源版本管理器
///
/// 使用 DashMap 实现无锁并发的版本号管理。每种资源类型维护独立的版本号，
/// 支持原子递增。客户端通过 `/api/sync/versions` 轮询版本号判断缓存是否
/// 过期，替代按页面的缓存失效。
#[derive(Debug)]
pub struct ResourceVersions {
    versions: DashMap<String, u64>,
}

impl ResourceVersions {
    /// 创建空的版本管理器
    pub fn new() -> Self {
        Self {
            versions: DashMap::new(),
        }
    }

    /// 递增指定资源的版本号并返回新值
    ///
    /// 如果资源不存在，从 0 开始递增（返回 1）
    pub fn increment(&self, resource: &str) -> u64 {
        let mut entry = self.versions.entry(resource.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }

    /// 获取指定资源的当前版本号
    ///
    /// 如果资源不存在，返回 0
    pub fn get(&self, resource: &str) -> u64 {
        self.versions.get(resource).map(|v| *v).unwrap_or(0)
    }

    /// 所有资源的当前版本号快照
    pub fn snapshot(&self) -> std::collections::HashMap<String, u64> {
        self.versions
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }
}

impl Default for ResourceVersions {
    fn default() -> Self {
        Self::new()
    }
}

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，克隆成本极低。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | pool | SQLite 连接池 |
/// | jwt_service | JWT 认证服务 |
/// | mailer | 邮件发送服务 |
/// | resource_versions | 资源版本管理 (客户端缓存失效) |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// SQLite 连接池
    pub pool: SqlitePool,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
    /// 邮件发送服务
    pub mailer: Arc<Mailer>,
    /// 资源版本管理器
    pub resource_versions: Arc<ResourceVersions>,
    /// 启动时间 (毫秒)
    pub started_at: i64,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. 数据库 (work_dir/database/laundry.db) 与迁移
    /// 3. 种子数据（默认门店与管理员）
    /// 4. JWT、邮件服务
    ///
    /// # Panics
    ///
    /// 数据库初始化失败时 panic
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_dir().join("laundry.db");
        let db_path_str = db_path.to_string_lossy();

        let db_service = DbService::new(&db_path_str)
            .await
            .expect("Failed to initialize database");
        let pool = db_service.pool;

        seed::ensure_defaults(&pool, config)
            .await
            .expect("Failed to seed defaults");

        Self::with_pool(config.clone(), pool)
    }

    /// 使用现有连接池构造状态（测试用）
    pub fn with_pool(config: Config, pool: SqlitePool) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let mailer = Arc::new(Mailer::new(
            config.email_api_url.clone(),
            config.email_api_key.clone(),
            config.email_from.clone(),
            config.templates_dir(),
        ));

        Self {
            config,
            pool,
            jwt_service,
            mailer,
            resource_versions: Arc::new(ResourceVersions::new()),
            started_at: shared::util::now_millis(),
        }
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// 通知资源变更
    ///
    /// 每次成功写入后调用，递增该资源的版本号；客户端据此失效缓存页面。
    ///
    /// # 参数
    /// - `resource`: 资源类型 (如 "customer", "order", "expense")
    pub fn notify_changed(&self, resource: &str) {
        let version = self.resource_versions.increment(resource);
        tracing::debug!(resource = %resource, version, "Resource changed");
    }
}
