// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! 单次运行的全部跟踪状态
//! Run state: previous-frame tracks, id counter, unique-crossing set, line
//!
//! 由工作线程独占; 重新开始运行 = 用 `RunState::new` 替换整个值。

use tracing::debug;

use super::allocator::IdAllocator;
use super::crossing::{CrossingLine, UniqueCrossings};
use super::matcher::TrackMatcher;
use super::track::{Track, TrackId};
use crate::detection::Detection;

/// 单帧处理结果
#[derive(Clone, Debug, PartialEq)]
pub struct FrameUpdate {
    /// 本次运行内的帧序号 (从0开始)
    pub frame_index: u64,

    pub line: CrossingLine,
    pub tracks: Vec<Track>,
    pub dropped: Vec<TrackId>,
    pub crossed_now: Vec<TrackId>,

    /// 累计越线人数
    pub unique_count: usize,
}

/// 运行状态
#[derive(Clone, Debug)]
pub struct RunState {
    matcher: TrackMatcher,
    line_ratio: f64,

    /// 首帧确定后固定
    line: Option<CrossingLine>,

    /// 上一帧轨迹
    tracks: Vec<Track>,
    ids: IdAllocator,
    crossings: UniqueCrossings,
    frames: u64,
}

impl RunState {
    pub fn new(match_threshold: u32, line_ratio: f64) -> Self {
        Self {
            matcher: TrackMatcher::new(match_threshold),
            line_ratio,
            line: None,
            tracks: Vec::new(),
            ids: IdAllocator::new(),
            crossings: UniqueCrossings::new(),
            frames: 0,
        }
    }

    /// 处理一帧: 匹配 → 越线计数
    pub fn process(&mut self, frame_height: u32, detections: &[Detection]) -> FrameUpdate {
        let line_ratio = self.line_ratio;
        let line = *self
            .line
            .get_or_insert_with(|| CrossingLine::from_frame_height(frame_height, line_ratio));

        let outcome = self
            .matcher
            .match_frame(&self.tracks, detections, line, &mut self.ids);

        for &id in &outcome.crossed_now {
            if self.crossings.record(id) {
                debug!("🚶 ID:{} 越线, 累计 {} 人", id, self.crossings.count());
            }
        }

        self.tracks = outcome.tracks.clone();
        let frame_index = self.frames;
        self.frames += 1;

        FrameUpdate {
            frame_index,
            line,
            tracks: outcome.tracks,
            dropped: outcome.dropped,
            crossed_now: outcome.crossed_now,
            unique_count: self.crossings.count(),
        }
    }

    /// 计数线 (首帧之前为 None)
    pub fn line(&self) -> Option<CrossingLine> {
        self.line
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn unique_count(&self) -> usize {
        self.crossings.count()
    }

    pub fn crossings(&self) -> &UniqueCrossings {
        &self.crossings
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames
    }

    pub fn ids_issued(&self) -> u64 {
        self.ids.issued()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use std::collections::HashMap;

    fn state_with_line_300() -> RunState {
        // 400 × 0.75 = 300
        RunState::new(50, 0.75)
    }

    #[test]
    fn test_scenario_with_threshold_50() {
        let mut state = state_with_line_300();

        // 帧1: 新轨迹, 在线上方
        let u = state.process(400, &[Detection::new(100, 250)]);
        assert_eq!(u.line.y, 300);
        assert_eq!((u.tracks[0].id, u.tracks[0].crossed), (0, false));
        assert_eq!(u.unique_count, 0);

        // 帧2: |Δcy| = 55 ≥ 50, 不匹配 → id=0 丢弃, 新轨迹 id=1 首次观测即越线
        let u = state.process(400, &[Detection::new(102, 305)]);
        assert_eq!(u.dropped, vec![0]);
        assert_eq!((u.tracks[0].id, u.tracks[0].crossed), (1, true));
        assert_eq!(u.unique_count, 1);

        // 帧3: 无检测
        let u = state.process(400, &[]);
        assert_eq!(u.dropped, vec![1]);
        assert_eq!(u.unique_count, 1);

        // 帧4: 重新出现 → id=2, 再计一次
        let u = state.process(400, &[Detection::new(102, 305)]);
        assert_eq!((u.tracks[0].id, u.tracks[0].crossed), (2, true));
        assert_eq!(u.unique_count, 2);
    }

    #[test]
    fn test_end_to_end_scenario() {
        // 阈值60: 250 → 305 在阈值内, 走匹配+越线路径
        let mut state = RunState::new(60, 0.75);

        // 帧1: 新轨迹, 在线上方
        let u = state.process(400, &[Detection::new(100, 250)]);
        assert_eq!(u.line.y, 300);
        assert_eq!(u.tracks.len(), 1);
        assert_eq!((u.tracks[0].id, u.tracks[0].crossed), (0, false));
        assert_eq!(u.unique_count, 0);

        // 帧2: 匹配 id=0, 250 → 305 越线
        let u = state.process(400, &[Detection::new(102, 305)]);
        assert_eq!((u.tracks[0].id, u.tracks[0].crossed), (0, true));
        assert_eq!(u.crossed_now, vec![0]);
        assert_eq!(u.unique_count, 1);

        // 帧3: 无检测 → id=0 丢弃
        let u = state.process(400, &[]);
        assert!(u.tracks.is_empty());
        assert_eq!(u.dropped, vec![0]);
        assert_eq!(u.unique_count, 1);

        // 帧4: 同一位置重新出现 → 新ID, 首次观测即越线 (重复计数)
        let u = state.process(400, &[Detection::new(102, 305)]);
        assert_eq!((u.tracks[0].id, u.tracks[0].crossed), (1, true));
        assert_eq!(u.unique_count, 2);
        assert_eq!(u.frame_index, 3);
    }

    #[test]
    fn test_line_fixed_on_first_frame() {
        let mut state = RunState::new(50, 0.75);
        assert!(state.line().is_none());
        state.process(720, &[]);
        assert_eq!(state.line().map(|l| l.y), Some(540));
        let u = state.process(1080, &[]);
        assert_eq!(u.line.y, 540);
    }

    #[test]
    fn test_configured_ratio_keeps_double_precision() {
        let mut state = RunState::new(50, 0.7);
        assert_eq!(state.process(1000, &[]).line.y, 700);
    }

    #[test]
    fn test_drop_on_miss_cannot_revive() {
        let mut state = state_with_line_300();
        state.process(400, &[Detection::new(10, 10), Detection::new(200, 10)]);
        state.process(400, &[Detection::new(10, 10), Detection::new(200, 10)]);
        state.process(400, &[Detection::new(10, 10), Detection::new(200, 10)]);
        state.process(400, &[Detection::new(10, 10)]);
        let u = state.process(400, &[Detection::new(10, 10), Detection::new(200, 10)]);
        assert_eq!(u.tracks.iter().map(|t| t.id).collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(state.ids_issued(), 3);
    }

    #[test]
    fn test_new_track_below_line_counts_immediately() {
        let mut state = state_with_line_300();
        let u = state.process(400, &[Detection::new(50, 350)]);
        assert!(u.tracks[0].crossed);
        assert_eq!(u.unique_count, 1);

        // 之后继续在线下移动不会重复计数
        let u = state.process(400, &[Detection::new(55, 360)]);
        assert_eq!(u.tracks[0].id, 0);
        assert!(u.crossed_now.is_empty());
        assert_eq!(u.unique_count, 1);
    }

    #[test]
    fn test_random_sequences_keep_invariants() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);

        for _ in 0..20 {
            let mut state = RunState::new(50, 0.75);
            let mut last_count = 0;
            let mut max_id_seen: Option<TrackId> = None;
            let mut crossed_seen: HashMap<TrackId, bool> = HashMap::new();

            for _ in 0..200 {
                let n = rng.gen_range(0..6);
                let dets: Vec<Detection> = (0..n)
                    .map(|_| Detection::new(rng.gen_range(0..640), rng.gen_range(0..480)))
                    .collect();
                let u = state.process(480, &dets);

                assert_eq!(u.tracks.len(), dets.len());
                assert!(u.unique_count >= last_count);
                last_count = u.unique_count;

                let mut seen_in_frame = std::collections::HashSet::new();
                for t in &u.tracks {
                    assert!(seen_in_frame.insert(t.id), "duplicate id in frame");
                    match crossed_seen.get(&t.id) {
                        // 越线标志只会 false → true
                        Some(&was) => assert!(!was || t.crossed),
                        // 新ID按首次出现顺序严格递增
                        None => {
                            assert!(max_id_seen.map_or(true, |m| t.id > m));
                            max_id_seen = Some(t.id);
                        }
                    }
                    crossed_seen.insert(t.id, t.crossed);
                    if t.crossed {
                        assert!(state.crossings().contains(t.id));
                    }
                }
            }
            assert_eq!(state.ids_issued() as usize, crossed_seen.len());
        }
    }
}
