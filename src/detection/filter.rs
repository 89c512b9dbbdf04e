// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! 检测过滤: 只保留高置信度的人

use super::types::{BBox, Detection, PERSON_CLASS_ID};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PersonFilter {
    pub class_id: u32,
    /// 严格大于才保留
    pub min_confidence: f32,
}

impl Default for PersonFilter {
    fn default() -> Self {
        Self {
            class_id: PERSON_CLASS_ID,
            min_confidence: 0.5,
        }
    }
}

impl PersonFilter {
    pub fn accepts(&self, bbox: &BBox) -> bool {
        bbox.class_id == self.class_id && bbox.confidence > self.min_confidence
    }
}

/// 过滤检测器输出, 保持原有顺序
pub fn filter_people(boxes: &[BBox], filter: &PersonFilter) -> Vec<Detection> {
    boxes
        .iter()
        .filter(|b| filter.accepts(b))
        .map(Detection::from_bbox)
        .collect()
}
