use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;

use chit_sms::{SimulatedGateway, SmsGateway};

use crate::core::{Config, Result};
use crate::fixture::FixtureStore;
use crate::reminders::Dispatcher;
use crate::sessions::SessionRegistry;

/// 服务器状态 - 所有请求处理器共享
///
/// 克隆成本很低 (内部均为 `Arc`)。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 启动时加载的配置 |
/// | store | 夹具数据 (群组、成员) |
/// | sessions | 管理员会话表 |
/// | dispatcher | 提醒发送调度器 (持有短信网关) |
/// | shutdown | 关闭信号, 所有发送任务的父令牌 |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub store: FixtureStore,
    pub sessions: Arc<SessionRegistry>,
    pub dispatcher: Dispatcher,
    pub shutdown: CancellationToken,
    started_at: Instant,
}

impl ServerState {
    /// 根据配置初始化: 加载夹具, 构建模拟短信网关
    pub fn initialize(config: &Config) -> Result<Self> {
        let store = FixtureStore::load(config.fixture_path.as_deref())?;
        let gateway = SimulatedGateway::new()
            .with_unreachable(config.sms_unreachable_numbers.iter().cloned());
        if !config.sms_unreachable_numbers.is_empty() {
            tracing::info!(
                count = config.sms_unreachable_numbers.len(),
                "Simulated gateway has unreachable numbers"
            );
        }
        Ok(Self::with_parts(config.clone(), store, Arc::new(gateway)))
    }

    /// 使用指定的夹具和网关构建 (测试用)
    pub fn with_parts(config: Config, store: FixtureStore, gateway: Arc<dyn SmsGateway>) -> Self {
        let shutdown = CancellationToken::new();
        let dispatcher = Dispatcher::new(
            gateway,
            config.sms_sender_id.clone(),
            config.settle_delay,
            shutdown.clone(),
        );
        Self {
            config,
            store,
            sessions: Arc::new(SessionRegistry::new()),
            dispatcher,
            shutdown,
            started_at: Instant::now(),
        }
    }

    /// 运行时间 (秒)
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
