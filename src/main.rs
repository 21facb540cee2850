use anyhow::{Context, Result};
use chromakit::{EngineWorker, Settings, WorkerRequest, WorkerResponse};
use chromakit_core::{log_info, log_warn};
use std::io::{self, BufRead, Write};

fn main() -> Result<()> {
    let result = run_app();
    let _ = chromakit_core::logger::finalize_logs();
    result
}

fn run_app() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let stream_logs = args.contains(&"--stream-logs".to_string());

    let settings = Settings::new()?;
    let app_settings = settings.load()?;

    if stream_logs {
        tracing_subscriber::fmt()
            .with_writer(io::stderr)
            .with_target(false)
            .init();
    }

    chromakit_core::logger::init_logger(
        settings.logs_dir.clone(),
        "chromakit",
        app_settings.log_retention_count,
        stream_logs,
    )?;

    log_info!("Chromakit started");
    if let Some(log_path) = chromakit_core::logger::get_log_path() {
        log_info!("Log file: {}", log_path.display());
    }
    if stream_logs {
        log_info!("Streaming mode enabled via --stream-logs");
    } else {
        log_info!("Buffered mode - logs will be written to file on exit");
    }

    let worker = EngineWorker::spawn(app_settings.engine)?;
    serve(&worker, io::stdin().lock(), io::stdout().lock())?;

    let stats = worker.stats();
    log_info!(
        "Handled {} requests ({} failed)",
        stats.handled,
        stats.failed
    );
    Ok(())
}

/// One JSON request per input line, one JSON response per output line.
fn serve<R: BufRead, W: Write>(worker: &EngineWorker, input: R, mut output: W) -> Result<()> {
    for line in input.lines() {
        let line = line.context("Failed to read request line")?;
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<WorkerRequest>(&line) {
            Ok(request) => worker.call(request)?,
            Err(e) => {
                log_warn!("Malformed request: {}", e);
                WorkerResponse::error(0, "invalid", format!("Malformed request: {}", e))
            }
        };

        serde_json::to_writer(&mut output, &response).context("Failed to write response")?;
        output.write_all(b"\n").context("Failed to write response")?;
        output.flush().context("Failed to flush output")?;
    }
    Ok(())
}
