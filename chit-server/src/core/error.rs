use thiserror::Error;

use crate::fixture::FixtureError;

/// 服务器启动/运行错误
///
/// 请求级错误统一使用 [`shared::AppError`]，这里只覆盖进程级失败。
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("夹具加载失败: {0}")]
    Fixture(#[from] FixtureError),

    #[error("端口绑定失败 {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP 服务异常: {0}")]
    Serve(#[source] std::io::Error),

    #[error("内部服务器错误: {0}")]
    Internal(#[from] anyhow::Error),
}

/// 服务器 Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_error_converts() {
        let err: ServerError = FixtureError::InvalidDueDay {
            group_id: "g1".into(),
            due_day: 40,
        }
        .into();
        assert!(err.to_string().contains("g1"));
    }
}
