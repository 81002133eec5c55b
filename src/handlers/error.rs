//! HTTP 层的网关错误类型。
//!
//! 所有被处理的失败都以 JSON 消息体返回：存储桶或对象缺失、
//! 请求格式错误返回 400，其余存储侧失败返回 500。

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use crate::s3::StoreError;

/// 网关操作的错误。
#[derive(Debug, Error)]
pub enum GatewayError {
    /// 目标存储桶不存在
    #[error("Bucket {0} does not exist.")]
    BucketNotFound(String),

    /// 请求的对象不存在
    #[error("Object {0} does not exist.")]
    ObjectNotFound(String),

    /// 请求格式错误（如缺少文件字段的 multipart 请求）
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// 未被显式处理的存储侧失败
    #[error("Upstream storage error: {0}")]
    Upstream(String),
}

impl GatewayError {
    /// 将针对某个键的存储层错误映射为网关错误。
    pub fn for_key(err: StoreError, key: &str) -> Self {
        match err {
            StoreError::NotFound => Self::ObjectNotFound(key.to_string()),
            StoreError::Upstream(detail) => Self::Upstream(detail),
        }
    }

    /// 将不应出现「未找到」的存储层错误统一映射为上游错误。
    pub fn upstream(err: StoreError) -> Self {
        Self::Upstream(err.to_string())
    }
}

/// 错误响应的 JSON 消息体。
#[derive(Serialize)]
struct ErrorBody {
    #[serde(rename = "Message")]
    message: String,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::BucketNotFound(_) | Self::ObjectNotFound(_) | Self::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Upstream(detail) => {
                tracing::error!("存储侧失败: {detail}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (
            status,
            Json(ErrorBody {
                message: self.to_string(),
            }),
        )
            .into_response()
    }
}
