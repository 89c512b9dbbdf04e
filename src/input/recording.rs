// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

/// 检测记录回放
/// Replays per-frame detections recorded as JSON lines
///
/// 每行一帧: {"width": 1280, "height": 720, "detections": [{x1, y1, x2, y2, confidence, class_id}, ...]}
use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::detection::BBox;
use crate::pipeline::{DetectionOracle, Frame, FrameSource};

/// 一帧记录
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub detections: Vec<BBox>,
}

/// 完整记录 (只读, 可在帧源和检测器之间共享)
#[derive(Clone, Debug, Default)]
pub struct Recording {
    frames: Arc<Vec<RecordedFrame>>,
}

impl Recording {
    pub fn new(frames: Vec<RecordedFrame>) -> Self {
        Self {
            frames: Arc::new(frames),
        }
    }

    /// 从文件加载
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read recording {}", path.display()))?;
        let recording = Self::parse(&text)
            .with_context(|| format!("failed to parse recording {}", path.display()))?;
        info!("✅ 检测记录加载成功: {} 帧", recording.len());
        Ok(recording)
    }

    /// 解析JSON lines, 跳过空行
    pub fn parse(text: &str) -> Result<Self> {
        let mut frames = Vec::new();
        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let frame: RecordedFrame = serde_json::from_str(line)
                .with_context(|| format!("line {}: invalid frame record", lineno + 1))?;
            frames.push(frame);
        }
        Ok(Self::new(frames))
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// 新的帧源 (从第0帧开始)
    pub fn source(&self) -> RecordedSource {
        RecordedSource {
            frames: self.frames.clone(),
            next: 0,
        }
    }

    /// 按帧序号返回记录检测结果的检测器
    pub fn oracle(&self) -> RecordedOracle {
        RecordedOracle {
            frames: self.frames.clone(),
        }
    }
}

/// 回放帧源: 只有尺寸, 没有像素
pub struct RecordedSource {
    frames: Arc<Vec<RecordedFrame>>,
    next: usize,
}

impl FrameSource for RecordedSource {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        let Some(record) = self.frames.get(self.next) else {
            return Ok(None);
        };
        let frame = Frame {
            index: self.next as u64,
            width: record.width,
            height: record.height,
            image: None,
        };
        self.next += 1;
        Ok(Some(frame))
    }

    fn seek(&mut self, index: u64) -> Result<bool> {
        self.next = usize::try_from(index).unwrap_or(usize::MAX).min(self.frames.len());
        Ok(true)
    }
}

/// 回放检测器
pub struct RecordedOracle {
    frames: Arc<Vec<RecordedFrame>>,
}

impl DetectionOracle for RecordedOracle {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<BBox>> {
        self.frames
            .get(frame.index as usize)
            .map(|record| record.detections.clone())
            .ok_or_else(|| anyhow!("no detections recorded for frame {}", frame.index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
{"width": 640, "height": 400, "detections": [{"x1": 90, "y1": 240, "x2": 110, "y2": 260, "confidence": 0.9, "class_id": 0}]}

{"width": 640, "height": 400}
{"width": 640, "height": 400, "detections": []}
"#;

    #[test]
    fn test_parse_skips_blank_lines() {
        let recording = Recording::parse(SAMPLE).unwrap();
        assert_eq!(recording.len(), 3);
        assert!(!recording.is_empty());

        let mut source = recording.source();
        let mut oracle = recording.oracle();

        let frame = source.next_frame().unwrap().unwrap();
        assert_eq!((frame.index, frame.height), (0, 400));
        assert!(frame.image.is_none());
        assert_eq!(oracle.detect(&frame).unwrap().len(), 1);

        let frame = source.next_frame().unwrap().unwrap();
        assert!(oracle.detect(&frame).unwrap().is_empty());

        source.next_frame().unwrap().unwrap();
        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_seek_continues_from_index() {
        let recording = Recording::parse(SAMPLE).unwrap();
        let mut source = recording.source();
        assert!(source.seek(2).unwrap());
        assert_eq!(source.next_frame().unwrap().unwrap().index, 2);
        assert!(source.next_frame().unwrap().is_none());

        assert!(source.seek(99).unwrap());
        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_parse_error_reports_line() {
        let err = Recording::parse("{\"width\": 1, \"height\": 1}\n{oops}\n").unwrap_err();
        assert!(format!("{:#}", err).contains("line 2"));
    }

    #[test]
    fn test_oracle_beyond_recording_fails() {
        let recording = Recording::parse(SAMPLE).unwrap();
        let frame = Frame {
            index: 10,
            width: 640,
            height: 400,
            image: None,
        };
        assert!(recording.oracle().detect(&frame).is_err());
    }
}
