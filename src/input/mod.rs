// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

/// 输入系统 (Input System)
///
/// 视频解码和检测模型由宿主程序提供; 这里只提供检测记录回放,
/// 用于离线计数和回归测试
pub mod recording;

pub use recording::{RecordedFrame, RecordedOracle, RecordedSource, Recording};
