// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
pub mod config; // 计数器配置参数
pub mod detection; // 检测数据与过滤
pub mod error; // 控制接口错误类型
pub mod input; // 检测记录回放
pub mod pipeline; // 工作线程与运行控制
pub mod render; // 帧标注
pub mod tracking; // 跟踪与越线计数

pub use crate::config::CounterConfig;
pub use crate::detection::{filter_people, BBox, Detection, PersonFilter};
pub use crate::error::{CounterError, Result};
pub use crate::pipeline::{
    Controller, DetectionOracle, ExitReason, Frame, FrameReport, FrameSource, RunSummary,
    SourceOpener,
};
pub use crate::tracking::{
    match_tracks, CrossingLine, FrameUpdate, RunState, Track, TrackId, TrackMatcher, TrackStatus,
};
