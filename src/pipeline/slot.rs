// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! 单槽最新值通道
//! Single-slot, latest-wins handoff between the worker and the consumer
//!
//! 容量为1的有界通道; 写满时写端先取走旧值再写入新值。
//! 读端可能跳过中间帧, 但每次读到的都是一个完整的值。

use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError, TrySendError};

/// 写端 (工作线程持有)
#[derive(Clone)]
pub struct SlotWriter<T> {
    tx: Sender<T>,
    // 用于覆盖旧值
    drain: Receiver<T>,
}

/// 读端 (渲染/控制线程持有)
#[derive(Clone)]
pub struct SlotReader<T> {
    rx: Receiver<T>,
}

pub fn latest_slot<T>() -> (SlotWriter<T>, SlotReader<T>) {
    let (tx, rx) = bounded(1);
    (
        SlotWriter {
            tx,
            drain: rx.clone(),
        },
        SlotReader { rx },
    )
}

impl<T> SlotWriter<T> {
    /// 发布新值, 覆盖未读的旧值
    pub fn publish(&self, mut value: T) {
        loop {
            match self.tx.try_send(value) {
                Ok(()) => return,
                Err(TrySendError::Full(v)) => {
                    let _ = self.drain.try_recv();
                    value = v;
                }
                // 写端自己持有一个接收端, 不会断开
                Err(TrySendError::Disconnected(_)) => return,
            }
        }
    }
}

impl<T> SlotReader<T> {
    /// 取出最新值 (无新值时返回 None, 不阻塞)
    pub fn take(&self) -> Option<T> {
        match self.rx.try_recv() {
            Ok(v) => Some(v),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// 等待新值, 超时返回 None
    pub fn wait(&self, timeout: Duration) -> Option<T> {
        match self.rx.recv_timeout(timeout) {
            Ok(v) => Some(v),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}
