use std::path::PathBuf;

use crate::auth::JwtConfig;

/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录（数据库、日志、模板） |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | REPORT_TIMEZONE | UTC | 报表的营业日时区 (IANA) |
/// | EMAIL_API_URL | (未设置) | 邮件 API 端点，未设置时不发送 |
/// | EMAIL_API_KEY | (未设置) | 邮件 API 密钥 |
/// | EMAIL_FROM | no-reply@laundry.local | 发件人地址 |
/// | APP_BASE_URL | http://localhost:3000 | 邮件链接的基础地址 |
/// | ADMIN_EMAIL | admin@laundry.local | 首次启动的管理员邮箱 |
/// | ADMIN_PASSWORD | (随机生成) | 首次启动的管理员密码 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/laundry HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志、模板覆盖文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 报表营业日时区
    pub report_timezone: chrono_tz::Tz,
    /// 邮件 API 端点 (None = 不发送)
    pub email_api_url: Option<String>,
    /// 邮件 API 密钥
    pub email_api_key: Option<String>,
    /// 发件人地址
    pub email_from: String,
    /// 邮件链接的基础地址
    pub app_base_url: String,
    /// 首次启动的管理员邮箱
    pub admin_email: String,
    /// 首次启动的管理员密码 (None = 随机生成并记录日志)
    pub admin_password: Option<String>,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        let report_timezone = std::env::var("REPORT_TIMEZONE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(chrono_tz::UTC);

        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            report_timezone,
            email_api_url: std::env::var("EMAIL_API_URL").ok(),
            email_api_key: std::env::var("EMAIL_API_KEY").ok(),
            email_from: std::env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "no-reply@laundry.local".into()),
            app_base_url: std::env::var("APP_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
            admin_email: std::env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| "admin@laundry.local".into()),
            admin_password: std::env::var("ADMIN_PASSWORD").ok(),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// 数据库目录 (work_dir/database)
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// 日志目录 (work_dir/logs)
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// 模板覆盖目录 (work_dir/templates)
    pub fn templates_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("templates")
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.log_dir())?;
        std::fs::create_dir_all(self.templates_dir())?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

/// 设置进程环境 (dotenv, 日志)
pub fn setup_environment() -> anyhow::Result<()> {
    // .env 不存在不算错误
    let _ = dotenv::dotenv();

    let log_level = std::env::var("LOG_LEVEL").ok();
    crate::utils::logger::init_logger_with_file(log_level.as_deref(), None);

    Ok(())
}
