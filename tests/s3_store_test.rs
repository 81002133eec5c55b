use std::sync::Arc;
use std::time::Duration;

use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::config::Credentials;
use bytes::Bytes;
use futures::TryStreamExt;
use tokio_test::assert_ok;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use file_gateway::s3::{ObjectStore, S3FileStore, StoreError};

/// 测试用的存储桶名称
const BUCKET: &str = "my-bucket";

/// 构建指向 wiremock 端点的 S3 存储实例。
///
/// 使用静态测试凭据和 path-style 寻址，这样所有请求
/// 都会落到 mock 服务器的路径上。
async fn store_for(endpoint: &str) -> S3FileStore {
    let credentials = Credentials::new("test-access-key", "test-secret-key", None, None, "test");

    let config = aws_config::defaults(BehaviorVersion::latest())
        .credentials_provider(credentials)
        .region(Region::new("us-east-1"))
        .endpoint_url(endpoint)
        .load()
        .await;

    let s3_config = aws_sdk_s3::config::Builder::from(&config)
        .force_path_style(true)
        .build();

    S3FileStore::new(Arc::new(aws_sdk_s3::Client::from_conf(s3_config)))
}

/// 验证 list_buckets 能解析 ListAllMyBucketsResult 响应。
#[tokio::test]
async fn test_list_buckets_parses_names() {
    let server = MockServer::start().await;

    let body = r#"<?xml version="1.0" encoding="UTF-8"?>
<ListAllMyBucketsResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/">
  <Owner><ID>owner-id</ID><DisplayName>owner</DisplayName></Owner>
  <Buckets>
    <Bucket><Name>my-bucket</Name><CreationDate>2024-01-01T00:00:00.000Z</CreationDate></Bucket>
    <Bucket><Name>otro-bucket</Name><CreationDate>2024-01-01T00:00:00.000Z</CreationDate></Bucket>
  </Buckets>
</ListAllMyBucketsResult>"#;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/xml"))
        .mount(&server)
        .await;

    let store = store_for(&server.uri()).await;
    let buckets = store.list_buckets().await.unwrap();

    assert_eq!(buckets, vec!["my-bucket", "otro-bucket"]);
}

/// 验证 put_object 把字节写到推导出的键路径下。
#[tokio::test]
async fn test_put_object_succeeds() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(format!("/{BUCKET}/pets/photo.png")))
        .respond_with(ResponseTemplate::new(200).insert_header("ETag", "\"abc123\""))
        .mount(&server)
        .await;

    let store = store_for(&server.uri()).await;
    let result = store
        .put_object(BUCKET, "pets/photo.png", "image/png", Bytes::from_static(b"pixels"))
        .await;

    tokio_test::assert_ok!(result);
}

/// 验证 list_objects 透传前缀并解析返回的键列表。
#[tokio::test]
async fn test_list_objects_passes_prefix() {
    let server = MockServer::start().await;

    let body = r#"<?xml version="1.0" encoding="UTF-8"?>
<ListBucketResult xmlns="http://s3.amazonaws.com/doc/2006-03-01/">
  <Name>my-bucket</Name>
  <Prefix>pets/</Prefix>
  <KeyCount>2</KeyCount>
  <MaxKeys>1000</MaxKeys>
  <IsTruncated>false</IsTruncated>
  <Contents>
    <Key>pets/a.png</Key>
    <LastModified>2024-01-01T00:00:00.000Z</LastModified>
    <ETag>"aaa"</ETag>
    <Size>3</Size>
    <StorageClass>STANDARD</StorageClass>
  </Contents>
  <Contents>
    <Key>pets/b.png</Key>
    <LastModified>2024-01-01T00:00:00.000Z</LastModified>
    <ETag>"bbb"</ETag>
    <Size>3</Size>
    <StorageClass>STANDARD</StorageClass>
  </Contents>
</ListBucketResult>"#;

    Mock::given(method("GET"))
        .and(path(format!("/{BUCKET}/")))
        .and(query_param("list-type", "2"))
        .and(query_param("prefix", "pets/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/xml"))
        .mount(&server)
        .await;

    let store = store_for(&server.uri()).await;
    let keys = store.list_objects(BUCKET, Some("pets/")).await.unwrap();

    assert_eq!(keys, vec!["pets/a.png", "pets/b.png"]);
}

/// 验证 object_metadata 读取存储端记录的内容类型。
#[tokio::test]
async fn test_object_metadata_reads_content_type() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path(format!("/{BUCKET}/hello.txt")))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/plain"))
        .mount(&server)
        .await;

    let store = store_for(&server.uri()).await;
    let metadata = store.object_metadata(BUCKET, "hello.txt").await.unwrap();

    assert_eq!(metadata.content_type, "text/plain");
}

/// 验证 head 请求的 404 映射为 NotFound。
#[tokio::test]
async fn test_object_metadata_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path(format!("/{BUCKET}/missing.txt")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let store = store_for(&server.uri()).await;
    let result = store.object_metadata(BUCKET, "missing.txt").await;

    assert!(matches!(result, Err(StoreError::NotFound)));
}

/// 验证 object_stream 返回的流能取回完整的对象字节。
#[tokio::test]
async fn test_object_stream_returns_bytes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/{BUCKET}/hello.txt")))
        .respond_with(ResponseTemplate::new(200).set_body_raw(&b"hello, gateway"[..], "text/plain"))
        .mount(&server)
        .await;

    let store = store_for(&server.uri()).await;
    let stream = store.object_stream(BUCKET, "hello.txt").await.unwrap();

    let chunks: Vec<Bytes> = stream.try_collect().await.unwrap();
    let data = chunks.concat();
    assert_eq!(data, b"hello, gateway");
}

/// 验证 get 请求的 NoSuchKey 错误映射为 NotFound。
#[tokio::test]
async fn test_object_stream_not_found() {
    let server = MockServer::start().await;

    let body = r#"<?xml version="1.0" encoding="UTF-8"?>
<Error>
  <Code>NoSuchKey</Code>
  <Message>The specified key does not exist.</Message>
  <Key>missing.txt</Key>
  <RequestId>req-1</RequestId>
</Error>"#;

    Mock::given(method("GET"))
        .and(path(format!("/{BUCKET}/missing.txt")))
        .respond_with(ResponseTemplate::new(404).set_body_raw(body, "application/xml"))
        .mount(&server)
        .await;

    let store = store_for(&server.uri()).await;
    let result = store.object_stream(BUCKET, "missing.txt").await;

    assert!(matches!(result, Err(StoreError::NotFound)));
}

/// 验证删除成功（包括幂等删除）返回 Ok。
#[tokio::test]
async fn test_delete_object_succeeds() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!("/{BUCKET}/pets/photo.png")))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let store = store_for(&server.uri()).await;
    let result = store.delete_object(BUCKET, "pets/photo.png").await;

    tokio_test::assert_ok!(result);
}

/// 验证删除时存储端报告 NoSuchKey 映射为 NotFound。
#[tokio::test]
async fn test_delete_object_not_found_signal() {
    let server = MockServer::start().await;

    let body = r#"<?xml version="1.0" encoding="UTF-8"?>
<Error>
  <Code>NoSuchKey</Code>
  <Message>The specified key does not exist.</Message>
  <Key>missing.txt</Key>
  <RequestId>req-2</RequestId>
</Error>"#;

    Mock::given(method("DELETE"))
        .and(path(format!("/{BUCKET}/missing.txt")))
        .respond_with(ResponseTemplate::new(404).set_body_raw(body, "application/xml"))
        .mount(&server)
        .await;

    let store = store_for(&server.uri()).await;
    let result = store.delete_object(BUCKET, "missing.txt").await;

    assert!(matches!(result, Err(StoreError::NotFound)));
}

/// 验证预签名 URL 包含对象键、签名和 7 天有效期参数。
///
/// 预签名在本地完成，不需要真实的网络请求。
#[tokio::test]
async fn test_presigned_get_url_contains_signature_and_expiry() {
    let store = store_for("http://localhost:9000").await;

    let url = store
        .presigned_get_url(BUCKET, "pets/photo.png", Duration::from_secs(604_800))
        .await
        .unwrap();

    assert!(url.contains("pets/photo.png"));
    assert!(url.contains("X-Amz-Signature"));
    assert!(url.contains("X-Amz-Expires=604800"));
}
