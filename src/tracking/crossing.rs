// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! 越线计数
//! Horizontal line crossing latch and the run-wide unique-crossing set
//!
//! 每条轨迹一个锁存标志: 中心点从线上方移动到线上或线下时置位, 之后不再复位。
//! 新建轨迹没有历史位置, 只看当前位置是否已在线上或线下。

use std::collections::BTreeSet;

use super::track::TrackId;

/// 水平计数线 (像素y坐标)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CrossingLine {
    pub y: i32,
}

/// 一次越线检查的结果
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CrossingCheck {
    /// 更新后的越线标志
    pub crossed: bool,
    /// 本次是否为新的越线事件
    pub new_event: bool,
}

impl CrossingLine {
    pub fn new(y: i32) -> Self {
        Self { y }
    }

    /// y = trunc(帧高 × 比例)
    pub fn from_frame_height(height: u32, ratio: f64) -> Self {
        Self {
            y: (height as f64 * ratio) as i32,
        }
    }

    /// 在线上或线下
    pub fn is_reached(&self, y: i32) -> bool {
        y >= self.y
    }

    /// 已匹配轨迹: 上一帧在线上方, 本帧到达线上或线下
    pub fn transition(&self, previous_y: i32, current_y: i32, crossed: bool) -> CrossingCheck {
        if !crossed && self.is_reached(current_y) && previous_y < self.y {
            CrossingCheck {
                crossed: true,
                new_event: true,
            }
        } else {
            CrossingCheck {
                crossed,
                new_event: false,
            }
        }
    }

    /// 新建轨迹: 只看当前位置
    pub fn first_observation(&self, current_y: i32) -> CrossingCheck {
        let crossed = self.is_reached(current_y);
        CrossingCheck {
            crossed,
            new_event: crossed,
        }
    }
}

/// 曾经越线的ID集合 (只增不减)
#[derive(Clone, Debug, Default)]
pub struct UniqueCrossings {
    ids: BTreeSet<TrackId>,
}

impl UniqueCrossings {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录越线ID, 返回是否为首次记录
    pub fn record(&mut self, id: TrackId) -> bool {
        self.ids.insert(id)
    }

    /// 对外报告的人数
    pub fn count(&self) -> usize {
        self.ids.len()
    }

    pub fn contains(&self, id: TrackId) -> bool {
        self.ids.contains(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = TrackId> + '_ {
        self.ids.iter().copied()
    }
}
