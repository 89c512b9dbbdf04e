// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

/// 人数统计 (People Counter)
///
/// 回放检测记录, 统计越过计数线的不同ID数量
///
/// 系统架构:
/// 1. 工作线程: 取帧 → 检测 → 跟踪计数 (独立工作线程)
/// 2. 主线程:   启动/轮询最新结果/输出统计
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, Level};

use people_counter::input::Recording;
use people_counter::{Controller, CounterConfig, ExitReason, FrameSource};

/// 人数统计参数
#[derive(Parser, Debug)]
#[command(author, version, about = "人数统计 - 回放检测记录并统计越线人数", long_about = None)]
struct Args {
    /// 检测记录 (JSON lines, 每行一帧)
    recording: PathBuf,

    /// 配置文件 (不存在时自动创建)
    #[arg(short, long, default_value = "counter_config.json")]
    config: PathBuf,

    /// 匹配距离阈值(像素), 覆盖配置文件
    #[arg(short, long)]
    threshold: Option<u32>,

    /// 计数线位置(帧高比例), 覆盖配置文件
    #[arg(long)]
    line_ratio: Option<f64>,

    /// 输出调试日志
    #[arg(short, long)]
    verbose: bool,
}

fn open_recording(handle: &str) -> Result<Box<dyn FrameSource>> {
    Ok(Box::new(Recording::load(handle)?.source()))
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .init();

    // 配置 + 命令行覆盖
    let mut config = CounterConfig::load(&args.config);
    if let Some(threshold) = args.threshold {
        config.match_threshold = threshold;
    }
    if let Some(ratio) = args.line_ratio {
        config.line_ratio = ratio;
    }
    config.validate().context("invalid configuration")?;
    config.print_summary();

    let oracle = Recording::load(&args.recording)?.oracle();
    let mut controller = Controller::new(config, Box::new(open_recording), Box::new(oracle));
    controller.select_source(args.recording.to_string_lossy());

    info!("🚀 人数统计启动");
    controller.start()?;

    let mut last_count = 0;
    let summary = loop {
        if let Some(report) = controller.wait_report(Duration::from_millis(50)) {
            let count = report.unique_count();
            if count != last_count {
                info!(
                    "🚶 [帧{}] 累计越线 {} 人",
                    report.update.frame_index, count
                );
                last_count = count;
            }
        }
        if let Some(summary) = controller.poll()? {
            break summary;
        }
    };

    let elapsed_ms = (summary.finished_at - summary.started_at).num_milliseconds();
    println!(
        "✅ {} | {} 帧 | 累计越线 {} 人 | {:?} | 耗时 {}ms",
        summary.source, summary.frames, summary.unique_count, summary.exit, elapsed_ms
    );

    if let ExitReason::Aborted(reason) = summary.exit {
        bail!("run aborted: {}", reason);
    }
    Ok(())
}
