//! # LRC 逐行歌词解析器
//!
//! 一行可以带多个时间标签（例如重复的副歌），每个标签都会生成一条记录。
//! 元数据标签（`[ti:...]`、`[ar:...]` 等）不匹配时间标签，因此会被自然地忽略。

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use log::trace;
use regex::Regex;

use crate::{
    classifier::is_invalid_lyric_text, time_tag::parse_time_tag, types::LyricLine,
    utils::strip_bom_and_cr,
};

lazy_static! {
    static ref TIME_TAG_RE: Regex = Regex::new(r"\[(\d+:\d+(?:[.:]\d+)?)\]").unwrap();
}

/// 时间戳（毫秒）到文本的映射，按时间升序遍历。
pub type LrcMap = BTreeMap<u64, String>;

/// 解析完整的 LRC 歌词。
///
/// 同一时间戳出现多次时，后出现的行覆盖先出现的行。
#[must_use]
pub fn parse_lrc(lrc: &str) -> LrcMap {
    let mut result = LrcMap::new();
    if lrc.is_empty() {
        return result;
    }

    let cleaned = strip_bom_and_cr(lrc);

    for (line_number, line) in cleaned.split('\n').enumerate() {
        let trimmed_line = line.trim_end();
        if trimmed_line.is_empty() {
            continue;
        }

        let times: Vec<u64> = TIME_TAG_RE
            .captures_iter(trimmed_line)
            .filter_map(|caps| {
                let time = parse_time_tag(&caps[1]);
                if time.is_none() {
                    trace!("[LRC 解析] 行 {}: 跳过无效时间标签 {}", line_number + 1, &caps[0]);
                }
                time
            })
            .collect();

        let text = TIME_TAG_RE.replace_all(trimmed_line, "");
        let text = text.trim();
        if text.is_empty() || is_invalid_lyric_text(text) {
            continue;
        }

        for time in times {
            result.insert(time, text.to_string());
        }
    }

    result
}

/// 将原文和翻译的映射合并为按时间排序的歌词行。
///
/// 只有原文存在的时间戳才会生成歌词行，翻译不会单独成行。
#[must_use]
pub fn build_lrc_lines(lyric_map: &LrcMap, trans_map: &LrcMap) -> Vec<LyricLine> {
    // 两个映射都是有序的，原文的键本身就是最终顺序
    lyric_map
        .iter()
        .filter(|(_, text)| !text.is_empty())
        .map(|(&time_ms, text)| LyricLine {
            time_ms,
            text: text.clone(),
            translation: trans_map
                .get(&time_ms)
                .filter(|trans| !trans.is_empty())
                .cloned(),
        })
        .collect()
}
