//! 歌词行分类。
//!
//! 判断一段已去除时间标记的文本是否是真正的歌词，
//! 还是间奏标记、坐标注释、制作人员信息之类的噪声。

use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// 纯分隔符行，包括常见的中文标点。
    static ref SEPARATOR_ONLY_RE: Regex = Regex::new(r"^[/\-*~\s\\：:.。，,]+$").unwrap();
    /// 逐字歌词中的间奏行，字符集比 `SEPARATOR_ONLY_RE` 窄。
    static ref INTERLUDE_RE: Regex = Regex::new(r"^[/\-*~\s\\：:]+$").unwrap();
    /// 单个字只由标点和括号组成。
    static ref SYMBOL_WORD_RE: Regex = Regex::new(r"^[/\-*~\s\\：:.。，,()（）]+$").unwrap();
    /// 整段文本是一个坐标注释，如 `(1062,531)`。
    static ref COORDINATE_ONLY_RE: Regex = Regex::new(r"^\(\d+(?:,\d+)*\)$").unwrap();
    /// 文本中任意位置的坐标注释。
    static ref COORDINATE_RE: Regex = Regex::new(r"\(\d+(?:,\d+)*\)").unwrap();
    /// 以制作人员标签开头的行。
    static ref CREDIT_PREFIX_RE: Regex = Regex::new(
        r"(?i)^(Writtenby|Composedby|Producedby|Arrangedby|作词|作曲|词|曲|编曲|制作|演唱|原唱|翻唱)[\s：:]"
    )
    .unwrap();
    /// 破折号后紧跟艺人或制作人员标签。
    static ref ARTIST_CREDIT_RE: Regex =
        Regex::new(r"(?i)[-–—]\s*(Artist|Singer|Band|作词|作曲|编曲)").unwrap();
}

/// 标题行的时间上限（毫秒）。
const TITLE_LINE_MAX_START_MS: u64 = 60_000;

/// 文本的分类结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextClass {
    /// 有效的歌词文本。
    Lyric,
    /// 去除空白后为空。
    Empty,
    /// 只由分隔符和标点组成。
    Separator,
    /// 只有一个坐标注释。
    Coordinate,
}

/// 对一段文本进行分类。
#[must_use]
pub fn classify_lyric_text(text: &str) -> TextClass {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        TextClass::Empty
    } else if SEPARATOR_ONLY_RE.is_match(trimmed) {
        TextClass::Separator
    } else if COORDINATE_ONLY_RE.is_match(trimmed) {
        TextClass::Coordinate
    } else {
        TextClass::Lyric
    }
}

/// 检查是否是无效的歌词文本（纯符号、间奏标记、坐标注释等）。
#[must_use]
pub fn is_invalid_lyric_text(text: &str) -> bool {
    classify_lyric_text(text) != TextClass::Lyric
}

/// 逐字歌词的间奏行：为空，或只有分隔符。
#[must_use]
pub fn is_interlude_text(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty() || INTERLUDE_RE.is_match(trimmed)
}

/// 制作人员信息行，如 `作词：某某` 或 `Title - Artist: 某某`。
#[must_use]
pub fn is_credit_line(text: &str) -> bool {
    let trimmed = text.trim();
    CREDIT_PREFIX_RE.is_match(trimmed) || ARTIST_CREDIT_RE.is_match(trimmed)
}

/// 单个字是否只是标点或坐标噪声。
///
/// 去除空白后为空的字不算噪声。
#[must_use]
pub fn is_symbol_word(text: &str) -> bool {
    let trimmed = text.trim();
    SYMBOL_WORD_RE.is_match(trimmed) || COORDINATE_ONLY_RE.is_match(trimmed)
}

/// 形如 `歌名 - 歌手` 且出现在开头一分钟内的行。
///
/// 只应对第一个被接受的行调用。
#[must_use]
pub fn looks_like_title_line(text: &str, start_ms: u64) -> bool {
    start_ms < TITLE_LINE_MAX_START_MS && text.contains(" - ")
}

/// 去除文本中所有的坐标注释。
pub fn strip_coordinate_annotations(text: &str) -> Cow<'_, str> {
    COORDINATE_RE.replace_all(text, "")
}
