// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! 中心点贪心匹配
//! Greedy first-fit centroid matcher
//!
//! 核心规则:
//! 1. 按检测顺序逐个处理
//! 2. 按上一帧轨迹的原始顺序扫描, 取第一个满足阈值且未被占用的轨迹
//! 3. 两轴距离分别严格小于阈值 (不是欧氏距离, 不做代价最小化)
//! 4. 未匹配的检测新建轨迹, 未被引用的旧轨迹直接丢弃
//!
//! 匹配结果依赖检测顺序: 两个检测都靠近同一条轨迹时, 先处理的那个拿走它。

use std::collections::HashSet;

use tracing::debug;

use super::allocator::IdAllocator;
use super::crossing::CrossingLine;
use super::track::{Track, TrackId, TrackStatus};
use crate::detection::Detection;

/// 默认匹配阈值 (像素)
pub const DEFAULT_MATCH_THRESHOLD: u32 = 50;

/// 单帧匹配结果
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MatchOutcome {
    /// 本帧轨迹, 与检测顺序一致
    pub tracks: Vec<Track>,

    /// 上一帧存在但本帧未匹配的ID
    pub dropped: Vec<TrackId>,

    /// 本帧产生越线事件的ID
    pub crossed_now: Vec<TrackId>,
}

/// 中心点匹配器
#[derive(Clone, Copy, Debug)]
pub struct TrackMatcher {
    /// 每个轴独立的距离阈值
    threshold: u32,
}

impl TrackMatcher {
    pub fn new(threshold: u32) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// 用当前帧检测更新轨迹
    pub fn match_frame(
        &self,
        previous: &[Track],
        detections: &[Detection],
        line: CrossingLine,
        ids: &mut IdAllocator,
    ) -> MatchOutcome {
        let mut matched_ids: HashSet<TrackId> = HashSet::with_capacity(previous.len());
        let mut outcome = MatchOutcome {
            tracks: Vec::with_capacity(detections.len()),
            ..Default::default()
        };

        for detection in detections {
            // 1. 首个满足条件的旧轨迹 (不按距离排序)
            let candidate = previous
                .iter()
                .find(|p| !matched_ids.contains(&p.id) && p.is_within(detection, self.threshold));

            let track = match candidate {
                // 2. 匹配: 继承ID和越线标志, 检查越线
                Some(prev) => {
                    matched_ids.insert(prev.id);
                    let check = line.transition(prev.cy, detection.cy, prev.crossed);
                    if check.new_event {
                        outcome.crossed_now.push(prev.id);
                    }
                    Track::from_detection(prev.id, detection, check.crossed, TrackStatus::Matched)
                }
                // 3. 未匹配: 新建轨迹, 已在线上或线下则直接算越线
                None => {
                    let id = ids.allocate();
                    let check = line.first_observation(detection.cy);
                    if check.new_event {
                        outcome.crossed_now.push(id);
                    }
                    Track::from_detection(id, detection, check.crossed, TrackStatus::New)
                }
            };
            outcome.tracks.push(track);
        }

        // 4. 未被引用的旧轨迹 → 丢弃
        outcome.dropped = previous
            .iter()
            .filter(|p| !matched_ids.contains(&p.id))
            .map(|p| p.id)
            .collect();

        if !outcome.dropped.is_empty() {
            debug!("🗑️ 丢弃轨迹: {:?}", outcome.dropped);
        }

        outcome
    }
}

impl Default for TrackMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_MATCH_THRESHOLD)
    }
}

/// 函数形式: 上一帧轨迹 + 当前检测 → 本帧轨迹
pub fn match_tracks(
    previous: &[Track],
    detections: &[Detection],
    threshold: u32,
    line: CrossingLine,
    ids: &mut IdAllocator,
) -> Vec<Track> {
    TrackMatcher::new(threshold)
        .match_frame(previous, detections, line, ids)
        .tracks
}
