//! Chit Reminder Server - 互助会 (chit fund) 管理后台
//!
//! # 架构概述
//!
//! - **夹具数据** (`fixture`): 内存中的群组和成员数据
//! - **页面导航** (`navigation`): 每个管理员会话的当前页面和参数
//! - **发送提醒** (`reminders`): 选择收件人、按顺序发送短信、取消与续发
//! - **管理员会话** (`sessions`): 导航 + 发送状态
//! - **HTTP API** (`api`): JSON 接口
//!
//! # 模块结构
//!
//! ```text
//! chit-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── fixture/       # 夹具数据
//! ├── navigation/    # 页面导航
//! ├── reminders/     # 选择引擎与发送调度
//! ├── sessions/      # 管理员会话
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 日志
//! ```

pub mod api;
pub mod core;
pub mod fixture;
pub mod navigation;
pub mod reminders;
pub mod sessions;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerState, build_router};
pub use fixture::FixtureStore;

// Re-export unified error types from shared
pub use shared::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境: 加载 .env, 初始化日志
pub fn setup_environment() -> Config {
    if let Err(e) = dotenv::dotenv() {
        // .env 不存在是正常情况
        eprintln!("No .env loaded: {}", e);
    }
    let config = Config::from_env();
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    config
}

pub fn print_banner() {
    println!(
        r#"
   ________    _ __
  / ____/ /_  (_) /_
 / /   / __ \/ / __/
/ /___/ / / / / /_
\____/_/ /_/_/\__/   reminders
    "#
    );
}
