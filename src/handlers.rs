//! HTTP请求处理模块
//!
//! 此模块包含了四个文件操作的处理器：
//! - 上传处理器
//! - 列表处理器
//! - 按键读取处理器
//! - 删除处理器

pub mod error;
pub mod files;

// 重新导出主要的公共接口
pub use error::GatewayError;
pub use files::{delete_file, get_all_files, get_file_by_key, upload_file};
