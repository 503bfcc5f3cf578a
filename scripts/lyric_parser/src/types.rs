//! 定义了歌词解析中使用的核心数据类型。

use std::io;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

//=============================================================================
// 1. 错误枚举
//=============================================================================

/// 歌词解析外围流程中可能发生的错误。
///
/// 解析本身从不失败，格式错误的行和时间标记会被跳过。
/// 这里只覆盖文件读写、序列化和格式名称解析。
#[derive(Error, Debug)]
pub enum LyricError {
    /// 文件读写等IO错误。
    #[error("IO 错误: {0}")]
    Io(#[from] io::Error),
    /// JSON 序列化或反序列化错误。
    #[error("JSON 错误: {0}")]
    Json(#[from] serde_json::Error),
    /// 无法识别的歌词格式名称。
    #[error("无效的歌词格式: {0}")]
    InvalidLyricFormat(#[from] strum::ParseError),
}

//=============================================================================
// 2. 歌词格式枚举
//=============================================================================

/// 枚举：表示支持的歌词格式。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, Serialize, Deserialize, EnumIter,
)]
#[strum(ascii_case_insensitive)]
#[derive(Default)]
pub enum LyricFormat {
    /// 逐行歌词，每行一个时间标签。
    #[default]
    #[strum(to_string = "lrc")]
    Lrc,
    /// 逐字歌词，包括 QQ 音乐的 QRC 和网易云的 YRC。
    #[strum(to_string = "qrc", serialize = "yrc")]
    Qrc,
}

//=============================================================================
// 3. 歌词内部表示结构
//=============================================================================

/// 逐行歌词行。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricLine {
    /// 行开始时间（毫秒）。
    #[serde(rename = "time")]
    pub time_ms: u64,
    /// 原文。逐行格式下已去除首尾空白，逐字格式下与 `QrcLine::full_text` 相同，保留原始空白。
    pub text: String,
    /// 翻译。
    #[serde(rename = "trans", default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
}

/// 逐字歌词中的一个字或词。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LyricWord {
    /// 文本内容，保留原始空白。
    pub text: String,
    /// 开始时间（秒）。
    #[serde(rename = "start")]
    pub start_seconds: f64,
    /// 持续时间（秒）。
    #[serde(rename = "duration")]
    pub duration_seconds: f64,
}

impl LyricWord {
    /// 结束时间（秒）。
    #[must_use]
    pub fn end_seconds(&self) -> f64 {
        self.start_seconds + self.duration_seconds
    }
}

/// 带逐字时间的歌词行。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrcLine {
    /// 行开始时间（秒）。
    #[serde(rename = "time")]
    pub start_seconds: f64,
    /// 按顺序排列的逐字数组，不为空。
    pub words: Vec<LyricWord>,
    /// 所有字拼接后的完整文本，用于回退显示和翻译匹配。
    #[serde(rename = "text")]
    pub full_text: String,
    /// 翻译。
    #[serde(rename = "trans", default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
}

impl QrcLine {
    /// 行开始时间，四舍五入到毫秒。
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn start_ms(&self) -> u64 {
        (self.start_seconds * 1000.0).round() as u64
    }

    /// 最后一个字的结束时间（秒）。
    #[must_use]
    pub fn end_seconds(&self) -> f64 {
        self.words
            .iter()
            .map(LyricWord::end_seconds)
            .fold(self.start_seconds, f64::max)
    }

    /// 转换为逐行歌词行，用于回退显示。
    #[must_use]
    pub fn to_lyric_line(&self) -> LyricLine {
        LyricLine {
            time_ms: self.start_ms(),
            text: self.full_text.clone(),
            translation: self.translation.clone(),
        }
    }
}

//=============================================================================
// 4. 解析结果
//=============================================================================

/// 一次解析调用的最终产物。
///
/// 如果 `is_qrc` 为真，`qrc_lines` 一定存在且不为空，
/// 并且 `lines` 与其一一对应。否则 `qrc_lines` 为 `None`。
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedLyric {
    /// 按时间升序排列的逐行歌词。
    pub lines: Vec<LyricLine>,
    /// 按时间升序排列的逐字歌词。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qrc_lines: Option<Vec<QrcLine>>,
    /// 是否是逐字格式。
    pub is_qrc: bool,
}

impl ParsedLyric {
    /// 空结果。
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// 从逐字歌词行构建结果，同时生成用于回退的逐行歌词。
    #[must_use]
    pub fn from_qrc_lines(qrc_lines: Vec<QrcLine>) -> Self {
        let lines = qrc_lines.iter().map(QrcLine::to_lyric_line).collect();
        Self {
            lines,
            qrc_lines: Some(qrc_lines),
            is_qrc: true,
        }
    }

    /// 从逐行歌词构建结果。
    #[must_use]
    pub fn from_lrc_lines(lines: Vec<LyricLine>) -> Self {
        Self {
            lines,
            qrc_lines: None,
            is_qrc: false,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// 结果实际采用的格式。
    #[must_use]
    pub fn format(&self) -> LyricFormat {
        if self.is_qrc {
            LyricFormat::Qrc
        } else {
            LyricFormat::Lrc
        }
    }

    /// 序列化为紧凑的 JSON 字符串。
    ///
    /// # Errors
    ///
    /// 序列化失败时返回 `LyricError::Json`。
    pub fn to_json(&self) -> Result<String, LyricError> {
        Ok(serde_json::to_string(self)?)
    }

    /// 序列化为格式化的 JSON 字符串。
    ///
    /// # Errors
    ///
    /// 序列化失败时返回 `LyricError::Json`。
    pub fn to_json_pretty(&self) -> Result<String, LyricError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

//=============================================================================
// 5. 解析选项
//=============================================================================

/// 翻译与逐字歌词行匹配时允许的默认最大时间差（毫秒）。
pub const DEFAULT_TRANSLATION_WINDOW_MS: u64 = 500;

/// 歌词解析选项
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LyricParseOptions {
    /// 强制指定格式，跳过格式检测。
    ///
    /// 即使强制为 `Qrc`，逐字解析没有结果时仍会回退到逐行解析。
    #[serde(default)]
    pub force_format: Option<LyricFormat>,
    /// 翻译匹配窗口（毫秒），包含边界。
    #[serde(default = "default_translation_window_ms")]
    pub translation_window_ms: u64,
}

const fn default_translation_window_ms() -> u64 {
    DEFAULT_TRANSLATION_WINDOW_MS
}

impl Default for LyricParseOptions {
    fn default() -> Self {
        Self {
            force_format: None,
            translation_window_ms: DEFAULT_TRANSLATION_WINDOW_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_lyric_format_from_str() {
        assert_eq!("lrc".parse::<LyricFormat>().unwrap(), LyricFormat::Lrc);
        assert_eq!("QRC".parse::<LyricFormat>().unwrap(), LyricFormat::Qrc);
        assert_eq!("yrc".parse::<LyricFormat>().unwrap(), LyricFormat::Qrc);
        assert!("ttml".parse::<LyricFormat>().is_err());
        assert_eq!(LyricFormat::Qrc.to_string(), "qrc");

        for format in LyricFormat::iter() {
            assert_eq!(format.to_string().parse::<LyricFormat>().unwrap(), format);
        }
    }

    #[test]
    fn test_serialize_wire_shape() {
        let parsed = ParsedLyric::from_lrc_lines(vec![LyricLine {
            time_ms: 1000,
            text: "Hello".to_string(),
            translation: None,
        }]);
        let json: serde_json::Value = serde_json::from_str(&parsed.to_json().unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "lines": [{ "time": 1000, "text": "Hello" }],
                "isQrc": false
            })
        );
    }

    #[test]
    fn test_qrc_result_derives_lines() {
        let qrc_line = QrcLine {
            start_seconds: 1.234,
            words: vec![LyricWord {
                text: "Hi".to_string(),
                start_seconds: 1.234,
                duration_seconds: 0.5,
            }],
            full_text: "Hi".to_string(),
            translation: Some("你好".to_string()),
        };
        let parsed = ParsedLyric::from_qrc_lines(vec![qrc_line]);
        assert!(parsed.is_qrc);
        assert_eq!(parsed.format(), LyricFormat::Qrc);
        assert_eq!(parsed.lines.len(), 1);
        assert_eq!(parsed.lines[0].time_ms, 1234);
        assert_eq!(parsed.lines[0].translation.as_deref(), Some("你好"));

        let json: serde_json::Value = serde_json::from_str(&parsed.to_json().unwrap()).unwrap();
        assert_eq!(json["qrcLines"][0]["trans"], "你好");
        assert_eq!(json["qrcLines"][0]["words"][0]["duration"], 0.5);
        assert_eq!(json["isQrc"], true);
    }

    #[test]
    fn test_end_seconds() {
        let line = QrcLine {
            start_seconds: 1.0,
            words: vec![
                LyricWord {
                    text: "a".to_string(),
                    start_seconds: 1.0,
                    duration_seconds: 0.5,
                },
                LyricWord {
                    text: "b".to_string(),
                    start_seconds: 1.5,
                    duration_seconds: 0.25,
                },
            ],
            full_text: "ab".to_string(),
            translation: None,
        };
        assert!((line.end_seconds() - 1.75).abs() < 1e-9);
    }
}
