// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

/// 跟踪与越线计数 (Tracking & Crossing Count)
///
/// 纯计算, 无I/O, 无错误路径:
/// - Allocator: 单调递增的跟踪ID
/// - Matcher:   上一帧轨迹 + 本帧检测 → 本帧轨迹 (贪心, 首个命中)
/// - Crossing:  每条轨迹的越线锁存 + 全局唯一越线集合
/// - RunState:  一次运行的全部状态, 由工作线程独占
pub mod allocator;
pub mod crossing;
pub mod matcher;
pub mod state;
pub mod track;

pub use allocator::IdAllocator;
pub use crossing::{CrossingCheck, CrossingLine, UniqueCrossings};
pub use matcher::{match_tracks, MatchOutcome, TrackMatcher, DEFAULT_MATCH_THRESHOLD};
pub use state::{FrameUpdate, RunState};
pub use track::{Track, TrackId, TrackStatus};
