use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use env_logger::Env;

use lyric_parser::{
    DEFAULT_TRANSLATION_WINDOW_MS, LyricError, LyricFormat, LyricParseOptions,
    parse_lyric_with_options,
};

#[derive(clap::Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 输入的歌词文件路径 (LRC / QRC / YRC)
    #[arg(short, long)]
    input: PathBuf,

    /// 翻译歌词文件路径，按 LRC 格式解析
    #[arg(short, long)]
    translation: Option<PathBuf>,

    /// 输出的 JSON 文件路径。如果未提供，结果将打印到标准输出。
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// 强制指定歌词格式 ('lrc'、'qrc' 或 'yrc')，默认自动检测
    #[arg(long)]
    format: Option<String>,

    /// 翻译与逐字歌词行匹配的最大时间差（毫秒）
    #[arg(long, default_value_t = DEFAULT_TRANSLATION_WINDOW_MS)]
    window_ms: u64,

    /// 输出格式化的 JSON
    #[arg(long)]
    pretty: bool,
}

fn read_input(path: &Path) -> Result<String, LyricError> {
    Ok(fs::read_to_string(path)?)
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    // 解析命令行参数
    let args = Args::parse();

    let force_format = match args
        .format
        .as_deref()
        .map(str::parse::<LyricFormat>)
        .transpose()
    {
        Ok(format) => format,
        Err(e) => {
            log::error!("{}", LyricError::from(e));
            process::exit(1);
        }
    };

    // --- 1. 读取输入文件 ---
    let lyric = match read_input(&args.input) {
        Ok(content) => content,
        Err(e) => {
            log::error!("无法读取输入文件 {:?}: {}", args.input, e);
            process::exit(1);
        }
    };

    let translation = match &args.translation {
        Some(path) => match read_input(path) {
            Ok(content) => content,
            Err(e) => {
                log::error!("无法读取翻译文件 {:?}: {}", path, e);
                process::exit(1);
            }
        },
        None => String::new(),
    };

    // --- 2. 解析歌词 ---
    log::info!("开始解析歌词...");
    let options = LyricParseOptions {
        force_format,
        translation_window_ms: args.window_ms,
    };
    let parsed = parse_lyric_with_options(&lyric, &translation, &options);
    if parsed.is_empty() {
        log::warn!("没有解析出任何歌词行。");
    } else {
        log::info!(
            "解析完成: 格式 {}, 共 {} 行, 其中 {} 行带翻译。",
            parsed.format(),
            parsed.lines.len(),
            parsed
                .lines
                .iter()
                .filter(|l| l.translation.is_some())
                .count()
        );
    }

    // --- 3. 序列化 ---
    let serialized = if args.pretty {
        parsed.to_json_pretty()
    } else {
        parsed.to_json()
    };
    let json = match serialized {
        Ok(s) => s,
        Err(e) => {
            log::error!("序列化歌词到 JSON 失败: {}", e);
            process::exit(1);
        }
    };

    // --- 4. 输出结果 ---
    match args.output {
        Some(output_path) => {
            log::info!("正在将结果写入文件: {:?}", output_path);
            if let Err(e) = fs::write(&output_path, json) {
                log::error!("写入输出文件 {:?} 失败: {}", output_path, e);
                process::exit(1);
            }
            log::info!("处理成功！输出文件已保存。");
        }
        None => {
            if let Err(e) = io::stdout().write_all(json.as_bytes()) {
                log::error!("写入标准输出失败: {}", e);
                process::exit(1);
            }
        }
    }
}
