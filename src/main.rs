use ampy::adapters::prompt::InquireChooser;
use ampy::utils::logger;
use ampy::{
    AmpyProfile, BoardFinder, CliConfig, Command, DotEnv, LogOptions, SerialportOpener,
    Settings,
};
use anyhow::Context;
use clap::Parser;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    let cwd = std::env::current_dir().context("cannot determine the current directory")?;

    let settings = match load_settings(&cli, &cwd) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("Configuration failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };
    tracing::debug!("Resolved settings: {:?}", settings);

    if let Err(e) = dispatch(&cli, &settings).await {
        tracing::error!(
            "Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = e.exit_code();
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

fn load_settings(cli: &CliConfig, cwd: &std::path::Path) -> ampy::Result<Settings> {
    let dotenv = DotEnv::discover(cwd)?;
    let profile = AmpyProfile::load(cli.config.as_deref(), cwd)?;
    Settings::resolve(&cli.overrides(), &dotenv, profile.as_ref())
}

async fn dispatch(cli: &CliConfig, settings: &Settings) -> ampy::Result<()> {
    let opener = SerialportOpener;
    let finder = BoardFinder::new(opener, settings.discovery_options());
    let port = settings.port.as_deref();

    match &cli.command {
        Command::Devices { json, .. } => {
            let mut stdout = std::io::stdout().lock();
            ampy::app::devices::run(&finder, port, *json, &mut stdout).await?;
        }
        Command::Logs {
            reset, duration, ..
        } => {
            let board = ampy::app::logs::select_board(&finder, &InquireChooser, port).await?;

            // until a board is chosen Ctrl-C keeps its default meaning and ends the process
            let stop = Arc::new(AtomicBool::new(false));
            let watcher = Arc::clone(&stop);
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    watcher.store(true, Ordering::Relaxed);
                }
            });

            let options = LogOptions {
                timestamps: settings.timestamps,
                reset: *reset,
                duration: duration.map(Duration::from_secs),
            };
            ampy::app::logs::run(Arc::new(opener), &board, options, stop).await?;
        }
    }

    Ok(())
}
