//! LRC 时间标签解码。

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // 分:秒 后可选的小数部分，分隔符可以是 `.` 或 `:`
    static ref TIME_TAG_RE: Regex = Regex::new(r"^(\d+):(\d+)(?:[.:](\d{1,3}))?$").unwrap();
}

/// 将 `mm:ss[.xx]` 形式的时间标签解析为毫秒。
///
/// 小数部分的处理规则：
/// * 两位数视为百分之一秒，乘以 10；
/// * 三位数直接视为毫秒；
/// * 一位数同样直接视为毫秒，不做缩放。
///
/// 无法解析时返回 `None`，调用方应跳过该标签而不是中断整行。
pub fn parse_time_tag(time_str: &str) -> Option<u64> {
    let caps = TIME_TAG_RE.captures(time_str.trim())?;

    let minutes: u64 = caps[1].parse().ok()?;
    let seconds: u64 = caps[2].parse().ok()?;
    let fraction = match caps.get(3) {
        Some(m) => {
            let value: u64 = m.as_str().parse().ok()?;
            // 一位数不缩放
            if m.as_str().len() == 2 {
                value * 10
            } else {
                value
            }
        }
        None => 0,
    };

    minutes
        .checked_mul(60_000)?
        .checked_add(seconds.checked_mul(1000)?)?
        .checked_add(fraction)
}
