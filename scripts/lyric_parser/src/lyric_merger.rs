//! 歌词解析入口：格式检测、解析和翻译合并。

use log::debug;

use crate::{
    classifier::is_invalid_lyric_text,
    lrc_parser::{LrcMap, build_lrc_lines, parse_lrc},
    qrc_parser::{is_qrc_format, parse_qrc},
    types::{LyricFormat, LyricParseOptions, ParsedLyric, QrcLine},
};

/// 使用默认选项解析歌词（原文 + 翻译），自动检测 QRC 或 LRC 格式。
///
/// 翻译可以传入空字符串。
#[must_use]
pub fn parse_lyric(lyric: &str, translation: &str) -> ParsedLyric {
    parse_lyric_with_options(lyric, translation, &LyricParseOptions::default())
}

/// 解析歌词（原文 + 翻译）。
///
/// 翻译总是按 LRC 格式解析。逐字解析没有产出任何行时回退到逐行解析。
/// 该函数从不失败，最坏的结果是一个空的 `ParsedLyric`。
#[must_use]
pub fn parse_lyric_with_options(
    lyric: &str,
    translation: &str,
    options: &LyricParseOptions,
) -> ParsedLyric {
    if lyric.is_empty() {
        return ParsedLyric::empty();
    }

    let trans_map = if translation.is_empty() {
        LrcMap::new()
    } else {
        parse_lrc(translation)
    };

    let try_qrc = match options.force_format {
        Some(LyricFormat::Lrc) => false,
        Some(LyricFormat::Qrc) => true,
        None => is_qrc_format(lyric),
    };

    if try_qrc {
        let mut qrc_lines = parse_qrc(lyric);
        if let (Some(first), Some(last)) = (qrc_lines.first(), qrc_lines.last()) {
            debug!(
                "按逐字格式解析得到 {} 行，时间范围 {:.3}s - {:.3}s。",
                qrc_lines.len(),
                first.start_seconds,
                last.end_seconds()
            );
            attach_translations(&mut qrc_lines, &trans_map, options.translation_window_ms);
            return ParsedLyric::from_qrc_lines(qrc_lines);
        }
        debug!("逐字格式解析没有结果，回退到 LRC 解析。");
    }

    let lyric_map = parse_lrc(lyric);
    let lines = build_lrc_lines(&lyric_map, &trans_map);
    debug!("按 LRC 格式解析得到 {} 行。", lines.len());
    ParsedLyric::from_lrc_lines(lines)
}

/// 为逐字歌词行附加翻译。
///
/// 取时间差在窗口内的第一条有效翻译，而不是时间差最小的一条。
fn attach_translations(qrc_lines: &mut [QrcLine], trans_map: &LrcMap, window_ms: u64) {
    if trans_map.is_empty() {
        return;
    }

    for line in qrc_lines {
        let line_ms = line.start_ms();
        line.translation = trans_map
            .iter()
            .find(|(trans_ms, text)| {
                trans_ms.abs_diff(line_ms) <= window_ms && !is_invalid_lyric_text(text)
            })
            .map(|(_, text)| text.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let parsed = parse_lyric("", "[00:01.00]翻译");
        assert!(parsed.lines.is_empty());
        assert!(parsed.qrc_lines.is_none());
        assert!(!parsed.is_qrc);
    }

    #[test]
    fn test_lrc_round_trip() {
        let parsed = parse_lyric("[00:01.00]Hello\n[00:02.00]World", "");
        assert!(!parsed.is_qrc);
        assert!(parsed.qrc_lines.is_none());
        let lines: Vec<(u64, &str)> = parsed
            .lines
            .iter()
            .map(|l| (l.time_ms, l.text.as_str()))
            .collect();
        assert_eq!(lines, vec![(1000, "Hello"), (2000, "World")]);
    }

    #[test]
    fn test_multi_timestamp_line() {
        let parsed = parse_lyric("[00:01.00][00:05.00]Chorus", "");
        assert_eq!(parsed.lines.len(), 2);
        assert_eq!(parsed.lines[0].time_ms, 1000);
        assert_eq!(parsed.lines[1].time_ms, 5000);
        assert!(parsed.lines.iter().all(|l| l.text == "Chorus"));
    }

    #[test]
    fn test_lrc_translation_exact_timestamp() {
        let parsed = parse_lyric(
            "[00:01.00]Hello\n[00:02.00]World",
            "[00:01.00]你好\n[00:02.10]世界\n[00:09.00]多余",
        );
        assert_eq!(parsed.lines.len(), 2);
        assert_eq!(parsed.lines[0].translation.as_deref(), Some("你好"));
        assert_eq!(parsed.lines[1].translation, None);
    }

    #[test]
    fn test_qrc_path_derives_lines() {
        let parsed = parse_lyric(
            "[1000,2000]Hel(1000,300)lo(1300,300) world\n[4000,1000]Again(4000,1000)",
            "",
        );
        assert!(parsed.is_qrc);
        let qrc_lines = parsed.qrc_lines.as_ref().unwrap();
        assert_eq!(qrc_lines.len(), parsed.lines.len());
        for (line, qrc_line) in parsed.lines.iter().zip(qrc_lines) {
            assert_eq!(line.time_ms, qrc_line.start_ms());
            assert_eq!(line.text, qrc_line.full_text);
        }
        assert_eq!(parsed.lines[0].text, "Hello world");
        assert_eq!(parsed.lines[1].time_ms, 4000);
    }

    #[test]
    fn test_qrc_line_text_keeps_whitespace() {
        let parsed = parse_lyric("[1000,2000] Hi(1000,300) ", "");
        assert!(parsed.is_qrc);
        assert_eq!(parsed.lines[0].text, " Hi");
        assert_eq!(parsed.qrc_lines.as_ref().unwrap()[0].full_text, " Hi");
    }

    #[test]
    fn test_translation_merge_window() {
        let lyric = "[10000,2000]Line(10000,2000)";
        let merged = parse_lyric(lyric, "[00:10.40]译文");
        assert_eq!(merged.lines[0].translation.as_deref(), Some("译文"));
        assert_eq!(
            merged.qrc_lines.as_ref().unwrap()[0].translation.as_deref(),
            Some("译文")
        );

        let unmerged = parse_lyric(lyric, "[00:10.60]译文");
        assert_eq!(unmerged.lines[0].translation, None);
        assert_eq!(unmerged.qrc_lines.as_ref().unwrap()[0].translation, None);
    }

    #[test]
    fn test_translation_merge_is_first_match() {
        let lyric = "[10000,2000]Line(10000,2000)";
        let parsed = parse_lyric(lyric, "[00:09.70]较早\n[00:10.00]精确");
        assert_eq!(parsed.lines[0].translation.as_deref(), Some("较早"));
    }

    #[test]
    fn test_translation_merge_window_is_configurable() {
        let options = LyricParseOptions {
            translation_window_ms: 1000,
            ..Default::default()
        };
        let parsed =
            parse_lyric_with_options("[10000,2000]Line(10000,2000)", "[00:10.90]译文", &options);
        assert_eq!(parsed.lines[0].translation.as_deref(), Some("译文"));
    }

    #[test]
    fn test_malformed_qrc_falls_back_to_lrc() {
        let lyric = "[1000,2000]\n[00:01.00]Hello";
        let parsed = parse_lyric(lyric, "");
        assert!(!parsed.is_qrc);
        assert!(parsed.qrc_lines.is_none());
        assert_eq!(parsed.lines.len(), 1);
        assert_eq!(parsed.lines[0].text, "Hello");
    }

    #[test]
    fn test_force_format() {
        let qrc = "[1000,2000]Hi(1000,500)";
        let lrc_forced = parse_lyric_with_options(
            qrc,
            "",
            &LyricParseOptions {
                force_format: Some(LyricFormat::Lrc),
                ..Default::default()
            },
        );
        assert!(!lrc_forced.is_qrc);
        assert!(lrc_forced.lines.is_empty());

        let qrc_forced = parse_lyric_with_options(
            "[00:01.00]Hello",
            "",
            &LyricParseOptions {
                force_format: Some(LyricFormat::Qrc),
                ..Default::default()
            },
        );
        assert!(!qrc_forced.is_qrc);
        assert_eq!(qrc_forced.lines.len(), 1);
    }

    #[test]
    fn test_deterministic() {
        let lyric = "[1000,500]a(1000,500)\n[2000,500]b(2000,0)c(0,0)";
        let trans = "[00:01.00]甲\n[00:02.00]乙";
        assert_eq!(parse_lyric(lyric, trans), parse_lyric(lyric, trans));
    }
}
