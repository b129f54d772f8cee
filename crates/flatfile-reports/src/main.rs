mod bootstrap;
mod commands;

use anyhow::Result;
use reports_core::settings::{ReportConfig, Settings};

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("flatfile-reports v{} starting", env!("CARGO_PKG_VERSION"));

    let config = ReportConfig::load(settings.config.as_deref())?;
    tracing::debug!("Config: {:?}", config);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    commands::run(&settings, config, &mut out)
}
