// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

/// 检测数据结构定义
/// Data structures for per-frame detections
use serde::{Deserialize, Serialize};

// ========== 公共常量 ==========

/// COCO类别: 0=person
pub const PERSON_CLASS_ID: u32 = 0;

// ========== 数据结构 ==========

/// 检测框 (检测器原始输出, 浮点像素坐标)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub confidence: f32,
    pub class_id: u32,
}

/// 整数像素边界框 (透传给渲染, 不参与匹配)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PixelBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

/// 已过滤的检测 (输入跟踪器)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Detection {
    /// 中心点
    pub cx: i32,
    pub cy: i32,

    pub bbox: PixelBox,
    pub class_id: u32,
    pub confidence: f32,
}

impl Detection {
    pub fn new(cx: i32, cy: i32) -> Self {
        Self {
            cx,
            cy,
            bbox: PixelBox {
                x1: cx,
                y1: cy,
                x2: cx,
                y2: cy,
            },
            class_id: PERSON_CLASS_ID,
            confidence: 1.0,
        }
    }

    /// 从检测框构造: 角点向零截断, 中心点由截断后的角点求出
    pub fn from_bbox(bbox: &BBox) -> Self {
        let pixel = PixelBox {
            x1: bbox.x1 as i32,
            y1: bbox.y1 as i32,
            x2: bbox.x2 as i32,
            y2: bbox.y2 as i32,
        };
        let (cx, cy) = pixel.center();
        Self {
            cx,
            cy,
            bbox: pixel,
            class_id: bbox.class_id,
            confidence: bbox.confidence,
        }
    }
}

impl PixelBox {
    /// 整数中点, 向零截断 (i64 求和, 不溢出)
    pub fn center(&self) -> (i32, i32) {
        let cx = (self.x1 as i64 + self.x2 as i64) / 2;
        let cy = (self.y1 as i64 + self.y2 as i64) / 2;
        (cx as i32, cy as i32)
    }

    pub fn width(&self) -> i64 {
        self.x2 as i64 - self.x1 as i64
    }

    pub fn height(&self) -> i64 {
        self.y2 as i64 - self.y1 as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bbox_truncates() {
        let det = Detection::from_bbox(&BBox {
            x1: 10.9,
            y1: 20.2,
            x2: 31.7,
            y2: 41.0,
            confidence: 0.8,
            class_id: 0,
        });
        assert_eq!(det.bbox, PixelBox { x1: 10, y1: 20, x2: 31, y2: 41 });
        // (10+31)/2 = 20.5 → 20, (20+41)/2 = 30.5 → 30
        assert_eq!((det.cx, det.cy), (20, 30));
        assert_eq!(det.bbox.width(), 21);
        assert_eq!(det.bbox.height(), 21);
    }

    #[test]
    fn test_center_is_exact_for_large_coordinates() {
        let det = Detection::from_bbox(&BBox {
            x1: 2.0e9,
            y1: -2.1e9,
            x2: 2.1e9,
            y2: -2.0e9,
            confidence: 0.9,
            class_id: 0,
        });
        assert_eq!(det.cx, 2_050_000_000);
        assert_eq!(det.cy, -2_050_000_000);

        // 超出 f32 精度的奇数和
        let pixel = PixelBox {
            x1: 16_777_215,
            y1: -3,
            x2: 16_777_216,
            y2: 0,
        };
        assert_eq!(pixel.center(), (16_777_215, -1));

        // 饱和到 i32 边界的角点
        let wide = PixelBox {
            x1: i32::MIN,
            y1: 0,
            x2: i32::MAX,
            y2: 10,
        };
        assert_eq!(wide.center().0, 0);
        assert_eq!(wide.width(), u32::MAX as i64);
    }
}
