use crate::protocol::{Engine, WorkerRequest, WorkerResponse};
use anyhow::{Context, Result};
use chromakit_core::{log_error, log_info, EngineConfig};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

enum WorkerCommand {
    Request(WorkerRequest),
    Shutdown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WorkerStats {
    pub handled: u64,
    pub failed: u64,
    pub last_latency_ms: f64,
}

/// Owns an [`Engine`] on a dedicated thread. Requests go in over one
/// channel, responses come back on another in the same order.
pub struct EngineWorker {
    request_tx: Sender<WorkerCommand>,
    response_rx: Receiver<WorkerResponse>,
    stats: Arc<Mutex<WorkerStats>>,
    thread: Option<thread::JoinHandle<()>>,
}

impl EngineWorker {
    pub fn spawn(config: EngineConfig) -> Result<Self> {
        let (request_tx, request_rx) = unbounded();
        let (response_tx, response_rx) = unbounded();
        let stats = Arc::new(Mutex::new(WorkerStats::default()));

        let worker_stats = Arc::clone(&stats);
        let handle = thread::Builder::new()
            .name("chromakit-engine".to_string())
            .spawn(move || {
                Self::run(Engine::new(config), request_rx, response_tx, worker_stats);
            })
            .context("Failed to spawn engine worker thread")?;

        Ok(Self {
            request_tx,
            response_rx,
            stats,
            thread: Some(handle),
        })
    }

    fn run(
        engine: Engine,
        requests: Receiver<WorkerCommand>,
        responses: Sender<WorkerResponse>,
        stats: Arc<Mutex<WorkerStats>>,
    ) {
        log_info!("Engine worker started");

        while let Ok(cmd) = requests.recv() {
            match cmd {
                WorkerCommand::Request(request) => {
                    let started = Instant::now();
                    let response = engine.handle(request);

                    {
                        let mut stats = stats.lock();
                        stats.handled += 1;
                        if response.is_error() {
                            stats.failed += 1;
                        }
                        stats.last_latency_ms = started.elapsed().as_secs_f64() * 1000.0;
                    }

                    if responses.send(response).is_err() {
                        log_error!("Response channel closed, stopping engine worker");
                        break;
                    }
                }
                WorkerCommand::Shutdown => break,
            }
        }

        log_info!("Engine worker stopped");
    }

    pub fn submit(&self, request: WorkerRequest) -> Result<()> {
        self.request_tx
            .send(WorkerCommand::Request(request))
            .map_err(|_| anyhow::anyhow!("Engine worker is not running"))
    }

    /// Next response, blocking until one is available.
    pub fn recv(&self) -> Result<WorkerResponse> {
        self.response_rx
            .recv()
            .map_err(|_| anyhow::anyhow!("Engine worker exited"))
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<WorkerResponse>> {
        match self.response_rx.recv_timeout(timeout) {
            Ok(response) => Ok(Some(response)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => anyhow::bail!("Engine worker exited"),
        }
    }

    /// Submit and wait for the matching response.
    pub fn call(&self, request: WorkerRequest) -> Result<WorkerResponse> {
        self.submit(request)?;
        self.recv()
    }

    pub fn stats(&self) -> WorkerStats {
        *self.stats.lock()
    }
}

impl Drop for EngineWorker {
    fn drop(&mut self) {
        let _ = self.request_tx.send(WorkerCommand::Shutdown);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}
