/// 根据可选前缀和文件名推导对象键。
///
/// 前缀为空或未提供时，键就是文件名本身；否则去掉前缀末尾的
/// 所有 `/` 后用 `/` 与文件名拼接。
///
/// # 参数
///
/// * `prefix` - 可选的键前缀
/// * `file_name` - 上传文件的文件名
///
/// # 返回值
///
/// 推导出的对象键
///
/// # 示例
///
/// ```
/// use file_gateway::utils::path::derive_key;
///
/// assert_eq!(derive_key(None, "photo.png"), "photo.png");
/// assert_eq!(derive_key(Some("pets/"), "photo.png"), "pets/photo.png");
/// assert_eq!(derive_key(Some("pets"), "photo.png"), "pets/photo.png");
/// ```
pub fn derive_key(prefix: Option<&str>, file_name: &str) -> String {
    match prefix {
        Some(prefix) if !prefix.is_empty() => {
            format!("{}/{}", prefix.trim_end_matches('/'), file_name)
        }
        _ => file_name.to_string(),
    }
}
