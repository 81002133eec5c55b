//! 文件网关服务的配置模块。
//!
//! 该模块负责从环境变量加载配置并构造 S3 客户端。

use anyhow::Context;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use std::env;

/// 服务配置。
#[derive(Debug, Clone)]
pub struct Config {
    /// 目标存储桶名称
    pub bucket: String,
    /// HTTP 监听地址
    pub addr: String,
}

impl Config {
    /// 从环境变量加载配置。
    ///
    /// # 环境变量
    ///
    /// * `S3_BUCKET` - 目标存储桶名称（必须设置）
    /// * `BIND_ADDR` - HTTP 监听地址（默认：0.0.0.0:3000）
    ///
    /// # 返回值
    ///
    /// 加载好的配置，缺少必需变量时返回错误。
    pub fn from_env() -> anyhow::Result<Self> {
        let bucket = env::var("S3_BUCKET").context("必须设置 S3_BUCKET")?;
        let addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        Ok(Self { bucket, addr })
    }
}

/// 使用环境变量创建 S3 客户端。
///
/// 所有凭据配置都通过标准 AWS 环境变量自动处理。
///
/// # 标准 AWS 环境变量
///
/// * `AWS_ACCESS_KEY_ID` - AWS 访问密钥 ID
/// * `AWS_SECRET_ACCESS_KEY` - AWS 秘密访问密钥
/// * `AWS_REGION` - AWS 区域
///
/// 设置 `S3_ENDPOINT` 时指向 S3 兼容服务（如 MinIO），
/// 此时启用 path-style 寻址。
///
/// # 返回值
///
/// 配置好的 `aws_sdk_s3::Client`。
pub async fn create_s3_client() -> Client {
    let endpoint = env::var("S3_ENDPOINT").ok();

    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(endpoint) = &endpoint {
        loader = loader.endpoint_url(endpoint);
    }
    let aws_config = loader.load().await;

    let mut builder = aws_sdk_s3::config::Builder::from(&aws_config);
    if endpoint.is_some() {
        builder.set_force_path_style(Some(true));
    }
    Client::from_conf(builder.build())
}
