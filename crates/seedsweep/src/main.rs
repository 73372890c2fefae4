use clap::Parser;
use seedsweep::{Cli, SweepSettings, commands, init_logging};
use std::path::PathBuf;

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".seedsweep")
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let data_dir = cli.data_dir.unwrap_or_else(default_data_dir);

    init_logging(&data_dir, &cli.log_level)?;

    let config_path = cli
        .config
        .unwrap_or_else(|| SweepSettings::path(&data_dir));
    let settings = SweepSettings::load(&config_path)?;

    let mut stdout = std::io::stdout().lock();
    commands::run(cli.command, &settings, &config_path, &mut stdout)?;

    tracing::info!("seedsweep finished");
    Ok(())
}
