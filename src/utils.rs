//! 工具函数模块
//!
//! 此模块包含了项目中使用的各种工具函数：
//! - 对象键推导工具

pub mod path;
