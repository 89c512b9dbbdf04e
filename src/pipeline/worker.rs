// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! 工作线程 (Worker)
//! 职责: 取帧 → 检测 → 过滤 → 跟踪计数 → 标注 → 发布FrameReport
//!
//! 运行状态只在本线程内修改; 停止标志在帧与帧之间检查, 正在处理的帧总会处理完。
//! 恢复运行时从上次停止后的下一帧继续, 已处理的帧不会重复计数。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{debug, error, info};

use super::slot::SlotWriter;
use super::{DetectionOracle, Frame, FrameReport, FrameSource};
use crate::detection::{filter_people, PersonFilter};
use crate::render::annotate;
use crate::tracking::RunState;

/// 工作线程退出原因
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExitReason {
    /// 收到停止信号
    Stopped,
    /// 帧源结束
    Exhausted,
    /// 帧源或检测器出错
    Aborted(String),
}

/// 工作线程结束后交还的资源
pub struct WorkerOutput {
    pub state: RunState,
    pub detector: Box<dyn DetectionOracle>,
    pub exit: ExitReason,
    /// 下一个待处理的源内帧序号
    pub next_index: u64,
}

pub struct Worker {
    state: RunState,
    source: Box<dyn FrameSource>,
    detector: Box<dyn DetectionOracle>,
    filter: PersonFilter,
    stop: Arc<AtomicBool>,
    writer: SlotWriter<FrameReport>,
    /// 序号小于它的帧已在之前的运行中处理过
    resume_from: u64,
    next_index: u64,

    // 统计
    stats_interval: Duration,
    count: u64,
    last: Instant,
    current_fps: f64,
}

impl Worker {
    pub fn new(
        state: RunState,
        source: Box<dyn FrameSource>,
        detector: Box<dyn DetectionOracle>,
        filter: PersonFilter,
        stop: Arc<AtomicBool>,
        writer: SlotWriter<FrameReport>,
    ) -> Self {
        Self {
            state,
            source,
            detector,
            filter,
            stop,
            writer,
            resume_from: 0,
            next_index: 0,
            stats_interval: Duration::from_secs(1),
            count: 0,
            last: Instant::now(),
            current_fps: 0.0,
        }
    }

    /// 从源内帧序号 `index` 继续
    pub fn with_resume_from(mut self, index: u64) -> Self {
        self.resume_from = index;
        self.next_index = index;
        self
    }

    pub fn with_stats_interval(mut self, interval: Duration) -> Self {
        self.stats_interval = interval;
        self
    }

    /// 主循环, 直到停止/帧源结束/出错
    pub fn run(mut self) -> WorkerOutput {
        info!("🔍 工作线程启动");

        let exit = match self.seek_resume_point() {
            Ok(()) => self.run_loop(),
            Err(e) => {
                error!("❌ 帧源定位失败: {:#}", e);
                ExitReason::Aborted(format!("{:#}", e))
            }
        };

        self.source.release();
        info!(
            "✅ 工作线程退出 ({:?}) | 处理{}帧 | 累计越线{}人",
            exit,
            self.state.frames_processed(),
            self.state.unique_count()
        );

        WorkerOutput {
            state: self.state,
            detector: self.detector,
            exit,
            next_index: self.next_index,
        }
    }

    fn seek_resume_point(&mut self) -> Result<()> {
        if self.resume_from == 0 {
            return Ok(());
        }
        let seeked = self
            .source
            .seek(self.resume_from)
            .with_context(|| format!("failed to seek to frame {}", self.resume_from))?;
        info!(
            "⏩ 从第{}帧继续{}",
            self.resume_from,
            if seeked { "" } else { " (逐帧跳过)" }
        );
        Ok(())
    }

    fn run_loop(&mut self) -> ExitReason {
        loop {
            if self.stop.load(Ordering::Acquire) {
                break ExitReason::Stopped;
            }

            let frame = match self.source.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => break ExitReason::Exhausted,
                Err(e) => {
                    error!("❌ 读取帧失败: {:#}", e);
                    break ExitReason::Aborted(format!("{:#}", e));
                }
            };

            if frame.index < self.resume_from {
                continue;
            }

            let index = frame.index;
            if let Err(e) = self.process_frame(frame) {
                error!("❌ 处理帧失败, 终止运行: {:#}", e);
                break ExitReason::Aborted(format!("{:#}", e));
            }
            self.next_index = index + 1;
        }
    }

    /// 处理单帧
    fn process_frame(&mut self, frame: Frame) -> Result<()> {
        let start = Instant::now();

        // 1. 检测 + 过滤
        let boxes = self
            .detector
            .detect(&frame)
            .with_context(|| format!("detection failed on frame {}", frame.index))?;
        let detections = filter_people(&boxes, &self.filter);

        // 2. 跟踪 + 越线计数
        let update = self.state.process(frame.height, &detections);
        debug!(
            "🎯 [帧{}] 检测{}个 → 跟踪{}人 | 丢弃{:?} | 越线{:?}",
            frame.index,
            boxes.len(),
            update.tracks.len(),
            update.dropped,
            update.crossed_now
        );

        // 3. 标注
        let image = frame.image.map(|mut img| {
            annotate(&mut img, &update.tracks, update.line);
            img
        });

        let processing_ms = start.elapsed().as_secs_f64() * 1000.0;
        self.update_stats(update.tracks.len(), update.unique_count, processing_ms);

        // 4. 帧与计数一起发布
        self.writer.publish(FrameReport {
            update,
            source_index: frame.index,
            image,
            processing_ms,
        });
        Ok(())
    }

    fn update_stats(&mut self, active: usize, unique: usize, processing_ms: f64) {
        self.count += 1;
        let elapsed = self.last.elapsed();
        if elapsed >= self.stats_interval {
            self.current_fps = self.count as f64 / elapsed.as_secs_f64();
            info!(
                "📊 处理统计: {:.1}fps | 每帧{:.1}ms | 当前{}人 | 累计越线{}人",
                self.current_fps, processing_ms, active, unique
            );
            self.count = 0;
            self.last = Instant::now();
        }
    }
}
