use std::thread;

use anyhow::Context;
use crossbeam_channel::{Receiver, Sender};
use crossbeam_utils::sync::WaitGroup;

use crate::request::{IoRequest, IoResult};

/// 后台 IO 调度器
///
/// - 内部的 dispatch 线程接收加载请求，把任务分发到 rayon 线程池
/// - crossbeam channel 负责请求与结果的传递
/// - 结果只通过 `try_recv_result` 在持有者线程上取出
///
/// Drop 时先关闭请求 channel，dispatch 线程等待已分发的任务全部结束后退出，
/// 然后 join 该线程。
pub struct IoDispatcher {
    request_sender: Option<Sender<IoRequest>>,
    result_receiver: Receiver<IoResult>,

    dispatch_thread: Option<thread::JoinHandle<()>>,
}

// new & init
impl IoDispatcher {
    /// `num_threads` 为 0 时由 rayon 决定线程数
    pub fn new(num_threads: usize) -> anyhow::Result<Self> {
        let (req_tx, req_rx) = crossbeam_channel::unbounded::<IoRequest>();
        let (res_tx, res_rx) = crossbeam_channel::unbounded::<IoResult>();

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|index| format!("Oryn-IO-{}", index))
            .build()
            .context("create io thread pool")?;

        let dispatch_thread = thread::Builder::new()
            .name("Oryn-IO-Dispatcher".to_string())
            .spawn(move || {
                let wait_group = WaitGroup::new();

                while let Ok(req) = req_rx.recv() {
                    let _span = tracy_client::span!("IoDispatcher::dispatch");

                    let res_tx = res_tx.clone();
                    let wg_task = wait_group.clone();

                    pool.spawn(move || {
                        let IoRequest { target, job } = req;
                        let payload = job.run();
                        if let Err(e) = &payload {
                            log::warn!("io job for {:?} failed: {:#}", target, e);
                        }
                        // 持有者已经不再接收时直接丢弃
                        let _ = res_tx.send(IoResult { target, payload });
                        drop(wg_task);
                    });
                }

                wait_group.wait();
            })
            .context("spawn io dispatcher thread")?;

        log::info!("io dispatcher started");
        Ok(Self {
            request_sender: Some(req_tx),
            result_receiver: res_rx,
            dispatch_thread: Some(dispatch_thread),
        })
    }
}

// tools
impl IoDispatcher {
    pub fn request(&self, req: IoRequest) {
        if let Some(sender) = &self.request_sender
            && let Err(e) = sender.send(req)
        {
            log::error!("failed to send io request: {}", e);
        }
    }

    pub fn try_recv_result(&self) -> Option<IoResult> {
        self.result_receiver.try_recv().ok()
    }

    /// 等待已分发的任务全部完成，返回还没有取出的结果
    pub fn join(mut self) -> Vec<IoResult> {
        self.shutdown();
        self.result_receiver.try_iter().collect()
    }
}

// destroy
impl IoDispatcher {
    fn shutdown(&mut self) {
        let Some(thread) = self.dispatch_thread.take() else {
            return;
        };
        // 先关闭 channel，否则 dispatch 线程的 recv 永远不返回
        self.request_sender = None;

        log::info!("io dispatcher shutting down, waiting for in-flight jobs");
        if thread.join().is_err() {
            log::error!("failed to join io dispatcher thread");
        }
        log::info!("io dispatcher stopped");
    }
}

impl Drop for IoDispatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}
