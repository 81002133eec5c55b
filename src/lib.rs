//! 文件网关服务库
//!
//! 这是一个基于Axum的文件网关服务，主要功能包括：
//! - 通过 multipart 上传文件到固定的 S3 存储桶
//! - 列出存储桶中的对象并生成预签名下载链接
//! - 按键流式读取对象内容
//! - 按键删除对象
//!
//! 所有操作都是对远端对象存储的单次透传调用，本服务自身不持有任何持久状态。

pub mod config;
pub mod handlers;
pub mod s3;
pub mod utils;

use axum::Router;
use axum::routing::{delete, get, post};
use http::Method;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, CorsLayer};
use tower_http::trace::TraceLayer;

use s3::ObjectStore;

/// 应用程序共享状态。
///
/// 存储客户端是请求之间唯一共享的资源，必须可以安全地并发使用；
/// 存储桶名称在服务构造时注入，而不是写死的全局常量。
#[derive(Clone)]
pub struct AppState {
    /// 对象存储客户端
    pub store: Arc<dyn ObjectStore>,
    /// 目标存储桶名称
    pub bucket: String,
}

/// 创建并配置Axum应用程序
///
/// 此函数设置了一个完整的HTTP服务器，包括：
/// - CORS配置，允许GET、POST、DELETE、HEAD和OPTIONS请求
/// - 请求追踪中间件
/// - 四个文件操作路由（上传、列表、按键读取、删除）
///
/// # 参数
///
/// * `state` - 应用程序共享状态。
///
/// # Returns
///
/// 返回配置好的Axum Router实例
pub fn app(state: AppState) -> Router {
    // 配置 CORS
    let cors = CorsLayer::permissive()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::DELETE,
            Method::HEAD,
            Method::OPTIONS,
        ])
        .allow_headers(AllowHeaders::any());

    Router::new()
        .route("/api/files/upload", post(handlers::upload_file))
        .route("/api/files/get-all", get(handlers::get_all_files))
        .route("/api/files/get-by-key", get(handlers::get_file_by_key))
        .route("/api/files/delete", delete(handlers::delete_file))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
