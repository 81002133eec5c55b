use std::sync::Arc;

use file_gateway::config::{self, Config};
use file_gateway::s3::S3FileStore;
use file_gateway::{AppState, app};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载 .env 文件
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt().init();

    let config = Config::from_env()?;

    // 初始化 S3 客户端
    let s3_client = Arc::new(config::create_s3_client().await);
    let state = AppState {
        store: Arc::new(S3FileStore::new(s3_client)),
        bucket: config.bucket.clone(),
    };

    let listener = tokio::net::TcpListener::bind(&config.addr).await?;
    tracing::info!("服务器运行在 http://{}", config.addr);

    axum::serve(listener, app(state)).await?;

    Ok(())
}
