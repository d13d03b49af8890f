//! # 数据流水线
//!
//! 生产者线程逐字节读取待隐藏的数据，拆分为 quartet 后送入有界队列；
//! 像素填充循环作为消费者逐个取出。队列满时生产者阻塞，
//! 因此内存占用只取决于 [`STREAM_CAPACITY`]，与数据大小无关。
//!
//! 读取失败时错误作为最后一项送入同一队列，随后生产者退出，
//! 消费者在取到它之前会先取完所有已读出的 quartet。

use super::quartet::{self, Quartet};
use crate::constants::STREAM_CAPACITY;
use crate::error::{Result, StegError};
use std::io::{ErrorKind, Read};
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread::Scope;

/// 消费端：按输入顺序产出 quartet。
///
/// 丢弃它会断开队列，阻塞中的生产者随之退出。
pub struct PayloadStream {
    rx: Receiver<Result<Quartet>>,
}

impl PayloadStream {
    /// 在 `scope` 中启动生产者线程读取 `source`。
    ///
    /// 生产者的生命周期受 `scope` 约束，不会超出调用方。
    pub fn spawn<'scope, 'env, R>(scope: &'scope Scope<'scope, 'env>, source: R) -> Self
    where
        R: Read + Send + 'scope,
    {
        let (tx, rx) = mpsc::sync_channel(STREAM_CAPACITY);
        scope.spawn(move || produce(source, tx));
        Self { rx }
    }
}

impl Iterator for PayloadStream {
    type Item = Result<Quartet>;

    /// 队列已关闭且为空时返回 `None`。
    fn next(&mut self) -> Option<Self::Item> {
        self.rx.recv().ok()
    }
}

fn produce<R: Read>(mut source: R, tx: SyncSender<Result<Quartet>>) {
    let mut byte = [0u8; 1];
    loop {
        match source.read(&mut byte) {
            Ok(0) => break,
            Ok(_) => {
                for q in quartet::split(byte[0]) {
                    if tx.send(Ok(q)).is_err() {
                        // 消费者已停止
                        return;
                    }
                }
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                let _ = tx.send(Err(StegError::PayloadRead(e)));
                return;
            }
        }
    }
    log::trace!("payload producer reached end of input");
}
