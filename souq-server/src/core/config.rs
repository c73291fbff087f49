/// 服务器配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | DATABASE_PATH | souq.db | SQLite 数据库文件 |
/// | LOG_DIR | (无) | 日志目录，设置后启用按日滚动文件日志 |
/// | APP_URL | http://localhost:3000 | 对外地址（支付回调） |
/// | PAYMENT_API_URL | https://api.moyasar.com | 支付网关地址 |
/// | SHIPPING_API_URL | (空) | 物流服务地址 |
/// | ENVIRONMENT | development | 运行环境 |
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API 服务端口
    pub http_port: u16,
    /// SQLite 数据库文件路径
    pub database_path: String,
    /// 日志目录（可选）
    pub log_dir: Option<String>,
    /// 对外基础地址，用于支付回调 URL
    pub app_url: String,
    /// 运行环境: development | staging | production
    pub environment: String,

    // === 外部服务 ===
    pub payment_api_url: String,
    pub payment_api_key: String,
    pub shipping_api_url: String,
    pub shipping_api_key: String,
    pub mail_api_url: String,
    pub mail_api_key: String,
    pub mail_from: String,
    pub sms_api_url: String,
    pub sms_api_key: String,
}

impl Config {
    /// 从环境变量加载配置，未设置的使用默认值
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            database_path: std::env::var("DATABASE_PATH").unwrap_or_else(|_| "souq.db".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
            app_url: std::env::var("APP_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),

            payment_api_url: std::env::var("PAYMENT_API_URL")
                .unwrap_or_else(|_| "https://api.moyasar.com".into()),
            payment_api_key: std::env::var("PAYMENT_API_KEY").unwrap_or_default(),
            shipping_api_url: std::env::var("SHIPPING_API_URL").unwrap_or_default(),
            shipping_api_key: std::env::var("SHIPPING_API_KEY").unwrap_or_default(),
            mail_api_url: std::env::var("MAIL_API_URL").unwrap_or_default(),
            mail_api_key: std::env::var("MAIL_API_KEY").unwrap_or_default(),
            mail_from: std::env::var("MAIL_FROM")
                .unwrap_or_else(|_| "no-reply@souq.example".into()),
            sms_api_url: std::env::var("SMS_API_URL").unwrap_or_default(),
            sms_api_key: std::env::var("SMS_API_KEY").unwrap_or_default(),
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
