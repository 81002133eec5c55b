//! 文件网关的 HTTP 处理器。
//!
//! 四个操作共享同一个前置检查：目标存储桶必须存在
//! （通过列出存储桶并做成员测试），否则返回 `BucketNotFound`，
//! 并且不会再访问任何按对象的端点。

use std::time::Duration;

use axum::Json;
use axum::body::Body;
use axum::extract::{Multipart, Query, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::error::GatewayError;
use crate::AppState;
use crate::utils::path::derive_key;

/// 列表操作生成的预签名 URL 的有效期（7 天 = 604800 秒）。
const PRESIGN_EXPIRES: Duration = Duration::from_secs(604_800);

/// 带可选前缀的查询参数。
#[derive(Deserialize)]
pub struct PrefixQuery {
    pub prefix: Option<String>,
}

/// 带对象键的查询参数。
#[derive(Deserialize)]
pub struct KeyQuery {
    pub key: String,
}

/// 上传成功的响应体。
#[derive(Serialize)]
pub struct UploadResponse {
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(rename = "Url")]
    pub url: String,
}

/// 列表结果中的单个对象。
#[derive(Serialize)]
pub struct ObjectSummary {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "PresignedUrl")]
    pub presigned_url: String,
}

/// 列表操作的响应体。
#[derive(Serialize)]
pub struct ListResponse {
    #[serde(rename = "Objects")]
    pub objects: Vec<ObjectSummary>,
}

/// 校验目标存储桶是否存在。
///
/// 通过列出所有存储桶并做成员测试来检查，存在性检查失败时
/// 返回 `BucketNotFound`，后续不再发起任何按对象的调用。
async fn ensure_bucket_exists(state: &AppState) -> Result<(), GatewayError> {
    let buckets = state
        .store
        .list_buckets()
        .await
        .map_err(GatewayError::upstream)?;

    if buckets.iter().any(|name| name == &state.bucket) {
        Ok(())
    } else {
        Err(GatewayError::BucketNotFound(state.bucket.clone()))
    }
}

/// 处理文件上传请求。
///
/// 从 multipart 请求体中取出第一个带文件名的字段，根据可选的
/// `prefix` 查询参数推导对象键，并把字节与内容类型写入存储桶。
/// 同键的已有对象会被覆盖（last-write-wins，由存储端决定）。
///
/// # 返回值
///
/// 200 响应，包含最终键的提示消息和公开形式的对象 URL。
pub async fn upload_file(
    State(state): State<AppState>,
    Query(query): Query<PrefixQuery>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, GatewayError> {
    ensure_bucket_exists(&state).await?;

    // 取出 multipart 中第一个带文件名的字段
    let mut upload: Option<(String, String, Bytes)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| GatewayError::InvalidRequest(err.to_string()))?
    {
        let Some(file_name) = field.file_name() else {
            continue;
        };
        if file_name.is_empty() {
            continue;
        }
        let file_name = file_name.to_string();

        // 字段未声明内容类型时根据文件名猜测
        let content_type = match field.content_type() {
            Some(content_type) => content_type.to_string(),
            None => mime_guess::from_path(&file_name)
                .first_or_octet_stream()
                .to_string(),
        };

        let data = field
            .bytes()
            .await
            .map_err(|err| GatewayError::InvalidRequest(err.to_string()))?;

        upload = Some((file_name, content_type, data));
        break;
    }

    let Some((file_name, content_type, data)) = upload else {
        return Err(GatewayError::InvalidRequest(
            "multipart request must contain a file field".to_string(),
        ));
    };

    let key = derive_key(query.prefix.as_deref(), &file_name);

    state
        .store
        .put_object(&state.bucket, &key, &content_type, data)
        .await
        .map_err(GatewayError::upstream)?;

    let url = format!("https://{}.s3.amazonaws.com/{}", state.bucket, key);

    Ok(Json(UploadResponse {
        message: format!("File {key} uploaded to S3 successfully!"),
        url,
    }))
}

/// 处理对象列表请求。
///
/// 列出匹配可选前缀的对象键（仅第一页），并为每个键生成
/// 7 天有效的预签名下载 URL。顺序沿用存储端的原生列表顺序。
pub async fn get_all_files(
    State(state): State<AppState>,
    Query(query): Query<PrefixQuery>,
) -> Result<Json<ListResponse>, GatewayError> {
    ensure_bucket_exists(&state).await?;

    let keys = state
        .store
        .list_objects(&state.bucket, query.prefix.as_deref())
        .await
        .map_err(GatewayError::upstream)?;

    let mut objects = Vec::with_capacity(keys.len());
    for key in keys {
        let presigned_url = state
            .store
            .presigned_get_url(&state.bucket, &key, PRESIGN_EXPIRES)
            .await
            .map_err(GatewayError::upstream)?;

        objects.push(ObjectSummary {
            name: key,
            presigned_url,
        });
    }

    Ok(Json(ListResponse { objects }))
}

/// 处理按键读取请求。
///
/// 先查询对象元数据获取内容类型，再以流的方式把对象字节
/// 写回响应体。对象不存在时返回 `ObjectNotFound`。
pub async fn get_file_by_key(
    State(state): State<AppState>,
    Query(query): Query<KeyQuery>,
) -> Result<Response, GatewayError> {
    ensure_bucket_exists(&state).await?;

    let metadata = state
        .store
        .object_metadata(&state.bucket, &query.key)
        .await
        .map_err(|err| GatewayError::for_key(err, &query.key))?;

    let stream = state
        .store
        .object_stream(&state.bucket, &query.key)
        .await
        .map_err(|err| GatewayError::for_key(err, &query.key))?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, metadata.content_type)
        .body(Body::from_stream(stream))
        .map_err(|err| GatewayError::Upstream(err.to_string()))
}

/// 处理按键删除请求。
///
/// 请求存储端删除对象，成功时返回 204 No Content。
/// 多数对象存储的删除是幂等的，「未找到」分支实际上很难触发，
/// 但存储端确实报告未找到时仍映射为 `ObjectNotFound`。
pub async fn delete_file(
    State(state): State<AppState>,
    Query(query): Query<KeyQuery>,
) -> Result<StatusCode, GatewayError> {
    ensure_bucket_exists(&state).await?;

    state
        .store
        .delete_object(&state.bucket, &query.key)
        .await
        .map_err(|err| GatewayError::for_key(err, &query.key))?;

    Ok(StatusCode::NO_CONTENT)
}
