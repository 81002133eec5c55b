//! 对象存储的抽象接口及其 S3 实现。
//!
//! 本服务把远端对象存储当作一组不透明的能力来消费：
//! 列出存储桶、写入/读取/删除对象、查询元数据、生成预签名 URL。
//! 接口抽象为 trait，便于在测试中用 mock 替换真实的 S3 客户端。

use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use futures::Stream;

use super::error::StoreError;

/// 对象内容的字节流类型。
///
/// 流由响应体持有，请求结束（无论成功或失败）时随响应体一起释放。
pub type ObjectStream = Pin<Box<dyn Stream<Item = Result<Bytes, StoreError>> + Send>>;

/// 对象元数据。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMetadata {
    /// 对象的内容类型
    pub content_type: String,
    /// 对象的字节数（存储端未报告时为 None）
    pub content_length: Option<i64>,
}

/// 对象存储的能力集合。
///
/// 每个方法对应远端存储的一次调用，不做任何本地缓存或重试。
#[mockall::automock]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// 列出当前凭据可见的所有存储桶名称。
    async fn list_buckets(&self) -> Result<Vec<String>, StoreError>;

    /// 将对象字节及其内容类型写入指定键，覆盖同键的已有对象。
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
        body: Bytes,
    ) -> Result<(), StoreError>;

    /// 列出匹配前缀的对象键。
    ///
    /// 只发起一次 ListObjectsV2 调用并返回第一页结果，
    /// 不做继续翻页（与原服务一致的已知限制）。
    async fn list_objects<'a>(
        &self,
        bucket: &str,
        prefix: Option<&'a str>,
    ) -> Result<Vec<String>, StoreError>;

    /// 查询对象元数据。
    async fn object_metadata(&self, bucket: &str, key: &str) -> Result<ObjectMetadata, StoreError>;

    /// 读取对象内容的字节流。
    async fn object_stream(&self, bucket: &str, key: &str) -> Result<ObjectStream, StoreError>;

    /// 删除指定键的对象。
    ///
    /// 多数对象存储的删除是幂等的，键不存在时同样报告成功。
    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), StoreError>;

    /// 为对象生成限时有效的预签名 GET URL。
    async fn presigned_get_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, StoreError>;
}

/// 基于 `aws_sdk_s3::Client` 的对象存储实现。
pub struct S3FileStore {
    client: Arc<Client>,
}

impl S3FileStore {
    /// 使用已配置好的 S3 客户端创建存储实例。
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3FileStore {
    async fn list_buckets(&self) -> Result<Vec<String>, StoreError> {
        let output = self
            .client
            .list_buckets()
            .send()
            .await
            .map_err(StoreError::upstream)?;

        Ok(output
            .buckets()
            .iter()
            .filter_map(|bucket| bucket.name().map(str::to_string))
            .collect())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
        body: Bytes,
    ) -> Result<(), StoreError> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(StoreError::upstream)?;

        Ok(())
    }

    async fn list_objects<'a>(
        &self,
        bucket: &str,
        prefix: Option<&'a str>,
    ) -> Result<Vec<String>, StoreError> {
        let output = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .set_prefix(prefix.map(str::to_string))
            .send()
            .await
            .map_err(StoreError::upstream)?;

        Ok(output
            .contents()
            .iter()
            .filter_map(|object| object.key().map(str::to_string))
            .collect())
    }

    async fn object_metadata(&self, bucket: &str, key: &str) -> Result<ObjectMetadata, StoreError> {
        let result = self
            .client
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await;

        match result {
            Ok(output) => Ok(ObjectMetadata {
                content_type: output
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string(),
                content_length: output.content_length(),
            }),
            Err(SdkError::ServiceError(err)) if err.err().is_not_found() => {
                Err(StoreError::NotFound)
            }
            Err(err) => Err(StoreError::upstream(err)),
        }
    }

    async fn object_stream(&self, bucket: &str, key: &str) -> Result<ObjectStream, StoreError> {
        let result = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await;

        let output = match result {
            Ok(output) => output,
            Err(SdkError::ServiceError(err)) if err.err().is_no_such_key() => {
                return Err(StoreError::NotFound);
            }
            Err(err) => return Err(StoreError::upstream(err)),
        };

        // 将 SDK 的 ByteStream 包装为响应体可消费的流
        let stream = futures::stream::try_unfold(output.body, |mut body| async move {
            let chunk = body.try_next().await.map_err(StoreError::upstream)?;
            Ok(chunk.map(|bytes| (bytes, body)))
        });

        Ok(Box::pin(stream))
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), StoreError> {
        let result = self
            .client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) if err.code() == Some("NoSuchKey") => Err(StoreError::NotFound),
            Err(err) => Err(StoreError::upstream(err)),
        }
    }

    async fn presigned_get_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, StoreError> {
        let presigning_config =
            PresigningConfig::expires_in(expires_in).map_err(StoreError::upstream)?;

        let presigned_request = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigning_config)
            .await
            .map_err(StoreError::upstream)?;

        Ok(presigned_request.uri().to_string())
    }
}
