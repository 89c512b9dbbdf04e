// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! 跟踪对象
//! Per-frame track record

use crate::detection::{Detection, PixelBox};

/// 跟踪ID (每次运行内唯一)
pub type TrackId = u64;

/// 本帧中轨迹的来源
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackStatus {
    /// 本帧新建
    New,
    /// 与上一帧轨迹匹配
    Matched,
}

/// 跟踪对象 (统一的跟踪结果)
#[derive(Clone, Debug, PartialEq)]
pub struct Track {
    /// 唯一跟踪ID
    pub id: TrackId,

    /// 最近一次的中心点
    pub cx: i32,
    pub cy: i32,

    /// 是否已越线 (只会 false → true)
    pub crossed: bool,

    /// 边界框 (仅用于渲染)
    pub bbox: PixelBox,

    pub status: TrackStatus,
}

impl Track {
    pub(crate) fn from_detection(
        id: TrackId,
        detection: &Detection,
        crossed: bool,
        status: TrackStatus,
    ) -> Self {
        Self {
            id,
            cx: detection.cx,
            cy: detection.cy,
            crossed,
            bbox: detection.bbox,
            status,
        }
    }

    /// 获取中心点
    pub fn center(&self) -> (i32, i32) {
        (self.cx, self.cy)
    }

    /// 中心点两轴距离都严格小于阈值
    pub fn is_within(&self, detection: &Detection, threshold: u32) -> bool {
        detection.cx.abs_diff(self.cx) < threshold && detection.cy.abs_diff(self.cy) < threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track_at(cx: i32, cy: i32) -> Track {
        Track::from_detection(0, &Detection::new(cx, cy), false, TrackStatus::New)
    }

    #[test]
    fn test_is_within_is_strict_per_axis() {
        let track = track_at(100, 100);
        assert!(track.is_within(&Detection::new(149, 51), 50));
        assert!(!track.is_within(&Detection::new(150, 100), 50));
        assert!(!track.is_within(&Detection::new(100, 50), 50));
        // 欧氏距离超过阈值但两轴都在范围内
        assert!(track.is_within(&Detection::new(140, 140), 50));
    }
}
