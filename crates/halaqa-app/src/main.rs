use std::io::Write;

use halaqa_app::config::build_generator;
use halaqa_app::runner::run_batch;
use halaqa_calendar::SystemClock;
use halaqa_core::config::load_config;

fn main() -> anyhow::Result<()> {
    let log_level = halaqa_app::logging::init();
    let config = load_config()?;

    if let Err(err) = log_level.apply(&config.logging.level) {
        tracing::warn!(error = %err, "Keeping bootstrap log filter");
    }
    tracing::debug!(config = ?config, "Configuration loaded");

    let generator = build_generator(&config, SystemClock)?;
    let report = run_batch(&config, &generator)?;

    tracing::info!(
        tenants = report.outcomes.len(),
        created = report.created(),
        failed = report.failed(),
        "Writing batch report"
    );

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &report)?;
    writeln!(stdout)?;

    Ok(())
}
