pub mod classifier;
pub mod lrc_parser;
mod lyric_merger;
pub mod qrc_parser;
pub mod time_tag;
pub mod types;
mod utils;

pub use lrc_parser::{LrcMap, build_lrc_lines, parse_lrc};
pub use lyric_merger::{parse_lyric, parse_lyric_with_options};
pub use qrc_parser::{is_qrc_format, parse_qrc};
pub use time_tag::parse_time_tag;
pub use types::{
    DEFAULT_TRANSLATION_WINDOW_MS, LyricError, LyricFormat, LyricLine, LyricParseOptions,
    LyricWord, ParsedLyric, QrcLine,
};
