//! 文件网关服务的 S3 操作模块。
//!
//! 该模块处理与对象存储的所有交互，包括存储桶列表、对象的
//! 写入/读取/删除、元数据查询和预签名 URL 生成。

pub mod error;
pub mod store;

// 重新导出主要的公共接口
pub use error::StoreError;
pub use store::{MockObjectStore, ObjectMetadata, ObjectStore, ObjectStream, S3FileStore};
