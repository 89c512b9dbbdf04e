// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

/// 检测数据 (Detection Data)
///
/// 检测器本身是外部组件, 这里只定义:
/// - BBox:      检测器原始输出
/// - Detection: 过滤后的整数像素检测 (中心点 + 边界框)
/// - Filter:    只保留 person 且置信度 > 0.5
pub mod filter;
pub mod types;

pub use filter::{filter_people, PersonFilter};
pub use types::{BBox, Detection, PixelBox, PERSON_CLASS_ID};
