pub mod protocol;
pub mod settings;
pub mod worker;

pub use protocol::{Engine, WorkerRequest, WorkerResponse};
pub use settings::{AppSettings, Settings};
pub use worker::{EngineWorker, WorkerStats};
