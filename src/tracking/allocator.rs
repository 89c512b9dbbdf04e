// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! 跟踪ID分配器
//! Monotonic identity allocator, one per run

use super::track::TrackId;

/// 单调递增计数器, 从0开始, 丢弃的ID永不复用
#[derive(Clone, Debug, Default)]
pub struct IdAllocator {
    next_id: TrackId,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 分配下一个ID
    pub fn allocate(&mut self) -> TrackId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// 已分配的ID数量
    pub fn issued(&self) -> u64 {
        self.next_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_from_zero() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.allocate(), 0);
        assert_eq!(ids.allocate(), 1);
        assert_eq!(ids.allocate(), 2);
        assert_eq!(ids.issued(), 3);
    }
}
