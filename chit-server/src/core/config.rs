use std::time::Duration;

/// 服务器配置 - 管理后台的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (unset) | 日志目录 (存在时按天滚动写文件) |
/// | FIXTURE_PATH | (unset) | 夹具 JSON 文件 (未设置时使用内置数据) |
/// | REMINDER_SETTLE_MS | 500 | 每位成员的发送间隔(毫秒) |
/// | SMS_SENDER_ID | CHITFD | 短信发送方标识 |
/// | SMS_UNREACHABLE_NUMBERS | (empty) | 模拟网关中不可达的号码, 逗号分隔 |
/// | SESSION_IDLE_TIMEOUT_SECS | 1800 | 会话空闲超时(秒), 0 表示不清理 |
///
/// # 示例
///
/// ```ignore
/// HTTP_PORT=8080 REMINDER_SETTLE_MS=100 cargo run -p chit-server
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 日志级别 / EnvFilter 指令
    pub log_level: String,
    /// 日志目录
    pub log_dir: Option<String>,
    /// 夹具文件路径
    pub fixture_path: Option<String>,
    /// 每位收件人的发送间隔
    pub settle_delay: Duration,
    /// 短信发送方标识
    pub sms_sender_id: String,
    /// 模拟网关中不可达的号码
    pub sms_unreachable_numbers: Vec<String>,
    /// 会话空闲超时, None 表示不清理
    pub session_idle_timeout: Option<Duration>,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
            fixture_path: std::env::var("FIXTURE_PATH").ok().filter(|s| !s.is_empty()),
            settle_delay: Duration::from_millis(
                std::env::var("REMINDER_SETTLE_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(500),
            ),
            sms_sender_id: std::env::var("SMS_SENDER_ID").unwrap_or_else(|_| "CHITFD".into()),
            sms_unreachable_numbers: std::env::var("SMS_UNREACHABLE_NUMBERS")
                .map(|v| parse_list(&v))
                .unwrap_or_default(),
            session_idle_timeout: idle_timeout(
                std::env::var("SESSION_IDLE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(1800),
            ),
        }
    }

    /// 测试用配置: 不读环境变量, 无发送间隔
    pub fn for_tests() -> Self {
        Self {
            http_port: 0,
            environment: "test".into(),
            log_level: "debug".into(),
            log_dir: None,
            fixture_path: None,
            settle_delay: Duration::ZERO,
            sms_sender_id: "CHITFD".into(),
            sms_unreachable_numbers: Vec::new(),
            session_idle_timeout: None,
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn idle_timeout(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
