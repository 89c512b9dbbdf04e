// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! 运行控制 (Controller)
//! 职责: 选择输入源 → 启动/停止/恢复工作线程 → 读取最新结果
//!
//! - start:  新的运行, ID计数器和越线集合清零
//! - stop:   协作式停止, 保留运行状态和帧源位置
//! - resume: 重新打开输入源, 从停止处的下一帧继续, 沿用保留的运行状态

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::slot::{latest_slot, SlotReader, SlotWriter};
use super::worker::{ExitReason, Worker, WorkerOutput};
use super::{DetectionOracle, FrameReport, SourceOpener};
use crate::config::CounterConfig;
use crate::error::{CounterError, Result};
use crate::tracking::RunState;

/// 一次运行(从启动/恢复到结束)的摘要
#[derive(Clone, Debug)]
pub struct RunSummary {
    pub source: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// 本运行状态累计处理的帧数
    pub frames: u64,
    pub unique_count: usize,
    pub exit: ExitReason,
    /// 恢复运行时的起始帧序号
    pub resume_at: u64,
}

struct RunHandle {
    source: String,
    started_at: DateTime<Utc>,
    stop: Arc<AtomicBool>,
    thread: JoinHandle<WorkerOutput>,
}

pub struct Controller {
    config: CounterConfig,
    opener: Box<dyn SourceOpener>,
    detector: Option<Box<dyn DetectionOracle>>,
    selected: Option<String>,

    running: Option<RunHandle>,
    /// 上次停止后保留的状态
    retained: Option<RunState>,
    /// 上次停止后下一个待处理的源内帧序号
    resume_at: u64,

    writer: SlotWriter<FrameReport>,
    reader: SlotReader<FrameReport>,
    last_report: Option<FrameReport>,
}

impl Controller {
    pub fn new(
        config: CounterConfig,
        opener: Box<dyn SourceOpener>,
        detector: Box<dyn DetectionOracle>,
    ) -> Self {
        let (writer, reader) = latest_slot();
        Self {
            config,
            opener,
            detector: Some(detector),
            selected: None,
            running: None,
            retained: None,
            resume_at: 0,
            writer,
            reader,
            last_report: None,
        }
    }

    pub fn config(&self) -> &CounterConfig {
        &self.config
    }

    /// 选择输入源 (路径/URL)
    pub fn select_source(&mut self, handle: impl Into<String>) {
        let handle = handle.into();
        info!("📹 输入源: {}", handle);
        self.selected = Some(handle);
    }

    pub fn selected_source(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// 开始新的运行
    pub fn start(&mut self) -> Result<()> {
        self.ensure_idle()?;
        let state = RunState::new(self.config.match_threshold, self.config.line_ratio);
        self.spawn(state, 0)?;
        self.retained = None;
        self.last_report = None;
        Ok(())
    }

    /// 沿用上次停止时的状态继续运行
    pub fn resume(&mut self) -> Result<()> {
        self.ensure_idle()?;
        let state = match self.retained.take() {
            Some(state) => state,
            None => return self.start(),
        };
        info!(
            "▶️ 恢复运行, 从第{}帧继续, 已累计{}人",
            self.resume_at,
            state.unique_count()
        );
        match self.spawn(state.clone(), self.resume_at) {
            Ok(()) => Ok(()),
            Err(e) => {
                self.retained = Some(state);
                Err(e)
            }
        }
    }

    /// 发出停止信号但不等待 (之后用 poll/wait/stop 回收)
    pub fn request_stop(&self) {
        if let Some(run) = &self.running {
            if !run.stop.swap(true, Ordering::AcqRel) {
                info!("⏹️ 请求停止");
            }
        }
    }

    /// 停止当前运行, 等待正在处理的帧完成
    pub fn stop(&mut self) -> Result<Option<RunSummary>> {
        self.request_stop();
        self.wait()
    }

    /// 回收已自行结束的工作线程 (帧源结束或出错)
    pub fn poll(&mut self) -> Result<Option<RunSummary>> {
        let finished = self
            .running
            .as_ref()
            .map_or(false, |run| run.thread.is_finished());
        if !finished {
            return Ok(None);
        }
        self.wait()
    }

    /// 阻塞等待当前运行结束 (不发送停止信号)
    pub fn wait(&mut self) -> Result<Option<RunSummary>> {
        match self.running.take() {
            Some(run) => self.join(run).map(Some),
            None => Ok(None),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
            .as_ref()
            .map_or(false, |run| !run.thread.is_finished())
    }

    /// 最新的帧结果 (消费端可能跳过中间帧)
    pub fn latest(&mut self) -> Option<&FrameReport> {
        if let Some(report) = self.reader.take() {
            self.last_report = Some(report);
        }
        self.last_report.as_ref()
    }

    /// 等待下一份结果, 超时返回 None
    pub fn wait_report(&mut self, timeout: Duration) -> Option<&FrameReport> {
        let report = self.reader.wait(timeout)?;
        self.last_report = Some(report);
        self.last_report.as_ref()
    }

    /// 当前累计越线人数
    pub fn unique_count(&self) -> usize {
        match (&self.retained, &self.last_report) {
            (Some(state), _) if self.running.is_none() => state.unique_count(),
            (_, Some(report)) => report.unique_count(),
            _ => 0,
        }
    }

    fn ensure_idle(&mut self) -> Result<()> {
        self.poll()?;
        if self.running.is_some() {
            return Err(CounterError::AlreadyRunning);
        }
        Ok(())
    }

    fn spawn(&mut self, state: RunState, resume_at: u64) -> Result<()> {
        let handle = self
            .selected
            .clone()
            .ok_or(CounterError::NoSourceSelected)?;
        if self.detector.is_none() {
            return Err(CounterError::DetectorUnavailable);
        }

        // 先取走上一次运行遗留的结果
        if let Some(stale) = self.reader.take() {
            self.last_report = Some(stale);
        }

        let source = self
            .opener
            .open(&handle)
            .map_err(|e| CounterError::source_open(handle.as_str(), format!("{:#}", e)))?;
        let detector = self.detector.take().ok_or(CounterError::DetectorUnavailable)?;

        let stop = Arc::new(AtomicBool::new(false));
        let worker = Worker::new(
            state,
            source,
            detector,
            self.config.person_filter(),
            stop.clone(),
            self.writer.clone(),
        )
        .with_resume_from(resume_at)
        .with_stats_interval(Duration::from_secs(self.config.stats_interval_secs.max(1)));

        let thread = std::thread::Builder::new()
            .name("people-counter-worker".to_string())
            .spawn(move || worker.run())?;

        info!("🚀 运行开始: {}", handle);
        self.running = Some(RunHandle {
            source: handle,
            started_at: Utc::now(),
            stop,
            thread,
        });
        Ok(())
    }

    fn join(&mut self, run: RunHandle) -> Result<RunSummary> {
        let output = run.thread.join().map_err(|_| {
            warn!("❌ 工作线程异常退出, 检测器已丢失");
            CounterError::WorkerPanicked
        })?;

        let summary = RunSummary {
            source: run.source,
            started_at: run.started_at,
            finished_at: Utc::now(),
            frames: output.state.frames_processed(),
            unique_count: output.state.unique_count(),
            exit: output.exit,
            resume_at: output.next_index,
        };
        info!(
            "🏁 运行结束: {:?} | {}帧 | 累计越线{}人",
            summary.exit, summary.frames, summary.unique_count
        );

        self.detector = Some(output.detector);
        self.retained = Some(output.state);
        self.resume_at = output.next_index;
        Ok(summary)
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        if let Some(run) = self.running.take() {
            run.stop.store(true, Ordering::Release);
            let _ = run.thread.join();
        }
    }
}
