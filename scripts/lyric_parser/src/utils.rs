//! 包含一些工具函数的模块。

/// 去除字节顺序标记和回车符。
pub(crate) fn strip_bom_and_cr(text: &str) -> String {
    text.chars().filter(|&c| c != '\u{feff}' && c != '\r').collect()
}
