//! # QRC / YRC 逐字歌词解析器
//!
//! 行格式为 `[行开始,行时长]字(开始,时长)字(开始,时长)...`，所有时间均为毫秒。
//! 网易云的 YRC 在时间标记中多带一个字段 `(开始,时长,0)`，该字段被忽略。
//!
//! 供应商给出的数据经常不规范：时长为 0 的标记、行尾没有标记的文本、
//! 混在歌词里的坐标注释等。解析器对这些情况做降级处理，而不是放弃整行。

use lazy_static::lazy_static;
use log::trace;
use regex::Regex;

use crate::{
    classifier::{
        is_credit_line, is_interlude_text, is_symbol_word, looks_like_title_line,
        strip_coordinate_annotations,
    },
    types::{LyricWord, QrcLine},
    utils::strip_bom_and_cr,
};

lazy_static! {
    static ref QRC_LINE_HEADER_RE: Regex = Regex::new(r"^\[\d+,\d+").unwrap();
    static ref QRC_LINE_RE: Regex = Regex::new(r"^\[(\d+),(\d+)(?:,.*?)?\](.+)$").unwrap();
    // 支持 QQ 音乐 (数字,数字) 和网易云 YRC (数字,数字,数字)
    static ref TIME_MARKER_RE: Regex = Regex::new(r"\((\d+),(\d+)(?:,\d+)?\)").unwrap();
}

/// 格式检测时检查的非空行数。
const SNIFF_LINE_LIMIT: usize = 30;

/// 无效时间标记对应的字使用的时长（毫秒）。
const FALLBACK_WORD_DURATION_MS: u64 = 100;

/// 检测是否是 QRC/YRC 格式的歌词。
///
/// 只要前 30 个非空行中有一行以 `[数字,数字` 开头即可。
#[must_use]
pub fn is_qrc_format(lyric: &str) -> bool {
    lyric
        .trim_start_matches('\u{feff}')
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(SNIFF_LINE_LIMIT)
        .any(|line| QRC_LINE_HEADER_RE.is_match(line))
}

#[derive(Debug, Clone, Copy)]
struct TimeMarker {
    start_ms: u64,
    duration_ms: u64,
}

impl TimeMarker {
    const fn is_valid(self) -> bool {
        self.duration_ms > 0
    }

    const fn end_ms(self) -> u64 {
        self.start_ms.saturating_add(self.duration_ms)
    }
}

/// 一行之内字的计时状态。
///
/// 最近的有效标记在整行范围内保持，不会按字重置，
/// 后续的无效标记都从它的结束时间开始计时。
struct WordTimer {
    line_start_ms: u64,
    last_valid_marker: Option<TimeMarker>,
}

impl WordTimer {
    const fn new(line_start_ms: u64) -> Self {
        Self {
            line_start_ms,
            last_valid_marker: None,
        }
    }

    fn fallback_start_ms(&self) -> u64 {
        self.last_valid_marker
            .map_or(self.line_start_ms, TimeMarker::end_ms)
    }

    /// 返回以该标记结尾的字的 (开始, 时长)。
    fn timing_for(&self, marker: TimeMarker) -> (u64, u64) {
        if marker.is_valid() {
            (marker.start_ms, marker.duration_ms)
        } else {
            (self.fallback_start_ms(), FALLBACK_WORD_DURATION_MS)
        }
    }

    fn observe(&mut self, marker: TimeMarker) {
        if marker.is_valid() {
            self.last_valid_marker = Some(marker);
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn ms_to_seconds(ms: u64) -> f64 {
    ms as f64 / 1000.0
}

fn make_word(text: &str, start_ms: u64, duration_ms: u64) -> LyricWord {
    LyricWord {
        text: text.to_string(),
        start_seconds: ms_to_seconds(start_ms),
        duration_seconds: ms_to_seconds(duration_ms),
    }
}

/// 从一行的内容部分提取逐字数组。
fn extract_words(content: &str, line_start_ms: u64) -> Vec<LyricWord> {
    let mut words = Vec::new();
    let mut timer = WordTimer::new(line_start_ms);
    let mut last_end = 0;
    let mut saw_marker = false;

    for caps in TIME_MARKER_RE.captures_iter(content) {
        // 数值溢出的标记按无效标记处理，文本仍按回退时间计时
        let marker = match (caps[1].parse::<u64>(), caps[2].parse::<u64>()) {
            (Ok(start_ms), Ok(duration_ms)) => TimeMarker {
                start_ms,
                duration_ms,
            },
            _ => {
                trace!("[QRC 解析] 无法解析的时间标记 {}，按无效标记处理", &caps[0]);
                TimeMarker {
                    start_ms: 0,
                    duration_ms: 0,
                }
            }
        };
        let Some(whole) = caps.get(0) else {
            continue;
        };

        let text = &content[last_end..whole.start()];
        if !text.is_empty() {
            let (start, duration) = timer.timing_for(marker);
            words.push(make_word(text, start, duration));
        }

        last_end = whole.end();
        saw_marker = true;
        timer.observe(marker);
    }

    // 没有任何时间标记，整行作为一个字
    if !saw_marker {
        let cleaned = strip_coordinate_annotations(content);
        let cleaned = cleaned.trim();
        if !cleaned.is_empty() {
            words.push(make_word(cleaned, line_start_ms, FALLBACK_WORD_DURATION_MS));
        }
        return words;
    }

    // 最后一个时间标记之后的文本
    if last_end < content.len() {
        let remaining = strip_coordinate_annotations(&content[last_end..]);
        if !remaining.trim().is_empty() {
            words.push(make_word(
                &remaining,
                timer.fallback_start_ms(),
                FALLBACK_WORD_DURATION_MS,
            ));
        }
    }

    words
}

/// 解析单行，只做结构上的提取，不做内容过滤。
fn parse_qrc_line(line: &str) -> Option<QrcLine> {
    let caps = QRC_LINE_RE.captures(line)?;
    let line_start_ms: u64 = caps[1].parse().ok()?;
    let content = caps.get(3)?.as_str();

    let words = extract_words(content, line_start_ms);
    if words.is_empty() {
        return None;
    }
    let full_text: String = words.iter().map(|w| w.text.as_str()).collect();

    Some(QrcLine {
        start_seconds: ms_to_seconds(line_start_ms),
        words,
        full_text,
        translation: None,
    })
}

/// 判断一行是否应被丢弃，返回丢弃原因。
fn rejection_reason(line: &QrcLine, is_first_accepted: bool) -> Option<&'static str> {
    let clean_text = line.full_text.trim();
    if is_interlude_text(clean_text) {
        Some("间奏")
    } else if is_credit_line(clean_text) {
        Some("制作人员信息")
    } else if line.words.iter().all(|w| is_symbol_word(&w.text)) {
        Some("纯符号")
    } else if is_first_accepted && looks_like_title_line(clean_text, line.start_ms()) {
        Some("标题行")
    } else {
        None
    }
}

/// 解析 QRC/YRC 格式的歌词。
///
/// 不符合行格式的行会被跳过。结果按行开始时间升序排列。
#[must_use]
pub fn parse_qrc(qrc: &str) -> Vec<QrcLine> {
    let mut result: Vec<QrcLine> = Vec::new();
    if qrc.is_empty() {
        return result;
    }

    let cleaned = strip_bom_and_cr(qrc);

    for (line_number, raw_line) in cleaned.split('\n').enumerate() {
        let trimmed_line = raw_line.trim_end();
        if trimmed_line.is_empty() {
            continue;
        }

        let Some(line) = parse_qrc_line(trimmed_line) else {
            trace!("[QRC 解析] 行 {}: 不是有效的逐字歌词行，已跳过。", line_number + 1);
            continue;
        };

        if let Some(reason) = rejection_reason(&line, result.is_empty()) {
            trace!(
                "[QRC 解析] 行 {}: 过滤{}行 '{}'",
                line_number + 1,
                reason,
                line.full_text
            );
            continue;
        }

        result.push(line);
    }

    result.sort_by(|a, b| a.start_seconds.total_cmp(&b.start_seconds));
    result
}
