// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

/// 渲染辅助 (Rendering helpers)
///
/// 显示由宿主程序负责, 这里只在帧上绘制跟踪结果
pub mod annotate;

pub use annotate::{annotate, track_color, track_label, LINE_COLOR, MATCHED_COLOR, NEW_COLOR};
