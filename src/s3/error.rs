//! 对象存储层的错误类型。

use aws_sdk_s3::error::DisplayErrorContext;
use thiserror::Error;

/// 对象存储操作的错误。
///
/// 存储端的「未找到」信号显式地建模为 `NotFound` 变体，
/// 其余所有存储侧失败统一归为 `Upstream`。
#[derive(Debug, Error)]
pub enum StoreError {
    /// 请求的对象在存储桶中不存在
    #[error("object not found")]
    NotFound,

    /// 其他存储侧失败
    #[error("object store error: {0}")]
    Upstream(String),
}

impl StoreError {
    /// 将 SDK 错误转换为携带完整错误链描述的 `Upstream`。
    pub(crate) fn upstream<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Upstream(DisplayErrorContext(err).to_string())
    }
}
