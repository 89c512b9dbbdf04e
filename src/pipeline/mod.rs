// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

/// 处理流水线 (Processing Pipeline)
///
/// 双线程架构:
/// - Worker:     取帧 → 检测 → 跟踪计数 → 标注 (独立工作线程, 独占运行状态)
/// - Controller: 启动/停止/读取最新结果 (宿主线程)
///
/// 两者之间只通过单槽最新值通道传递 `FrameReport`, 帧和计数在同一个值里。
pub mod controller;
pub mod slot;
pub mod worker;

use anyhow::Result;
use image::RgbaImage;

use crate::detection::BBox;
use crate::tracking::FrameUpdate;

pub use controller::{Controller, RunSummary};
pub use slot::{latest_slot, SlotReader, SlotWriter};
pub use worker::{ExitReason, Worker, WorkerOutput};

// ========== 外部组件接口 ==========

/// 一帧输入
#[derive(Clone, Debug)]
pub struct Frame {
    /// 源内帧序号
    pub index: u64,
    pub width: u32,
    pub height: u32,
    /// 像素数据 (回放源没有像素)
    pub image: Option<RgbaImage>,
}

/// 帧源 (视频解码/回放)
pub trait FrameSource: Send {
    /// 下一帧; 源结束时返回 Ok(None)
    fn next_frame(&mut self) -> Result<Option<Frame>>;

    /// 定位到源内帧序号 `index`, 返回是否支持定位。
    /// 不支持时工作线程读取并丢弃序号更小的帧。
    fn seek(&mut self, _index: u64) -> Result<bool> {
        Ok(false)
    }

    /// 释放底层资源
    fn release(&mut self) {}
}

/// 检测器 (目标检测模型)
pub trait DetectionOracle: Send {
    /// 返回原始检测框, 顺序即跟踪顺序
    fn detect(&mut self, frame: &Frame) -> Result<Vec<BBox>>;
}

/// 根据句柄(路径/URL)打开帧源
pub trait SourceOpener: Send {
    fn open(&self, handle: &str) -> Result<Box<dyn FrameSource>>;
}

impl<F> SourceOpener for F
where
    F: Fn(&str) -> Result<Box<dyn FrameSource>> + Send,
{
    fn open(&self, handle: &str) -> Result<Box<dyn FrameSource>> {
        self(handle)
    }
}

// ========== 输出 ==========

/// 发布给消费端的单帧结果 (工作线程 → 宿主线程)
#[derive(Clone, Debug)]
pub struct FrameReport {
    pub update: FrameUpdate,
    /// 源内帧序号
    pub source_index: u64,
    /// 标注后的帧
    pub image: Option<RgbaImage>,
    pub processing_ms: f64,
}

impl FrameReport {
    pub fn unique_count(&self) -> usize {
        self.update.unique_count
    }
}
