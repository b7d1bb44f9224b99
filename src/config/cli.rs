use crate::config::Overrides;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "ampy")]
#[command(about = "Manage micropython boards attached over USB serial", version)]
pub struct CliConfig {
    /// Name of serial port for connected board
    #[arg(long, short = 'p', env = "AMPY_PORT", global = true)]
    pub port: Option<String>,

    /// Baud rate for the serial connection [default: 115200]
    #[arg(long, short = 'b', env = "AMPY_BAUD", global = true)]
    pub baud: Option<u32>,

    /// Path to a TOML profile (defaults to ./ampy.toml when present)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List all micropython boards attached via USB serial port.
    ///
    /// Will soft-reset all devices when run.
    Devices {
        /// Print the boards as a JSON array
        #[arg(long)]
        json: bool,

        /// Probe every serial port, not only USB ones
        #[arg(long)]
        all_ports: bool,
    },

    /// Stream logs from device.
    Logs {
        /// Prefix every line with the local time it arrived
        #[arg(long, short = 't')]
        timestamps: bool,

        /// Soft reset the board before streaming
        #[arg(long, short = 'r')]
        reset: bool,

        /// Stop after this many seconds
        #[arg(long, short = 'd')]
        duration: Option<u64>,
    },
}

impl CliConfig {
    pub fn overrides(&self) -> Overrides {
        let mut overrides = Overrides {
            port: self.port.clone(),
            baud: self.baud,
            ..Overrides::default()
        };

        match &self.command {
            Command::Devices { all_ports, .. } => {
                overrides.all_ports = all_ports.then_some(true);
            }
            Command::Logs { timestamps, .. } => {
                overrides.timestamps = timestamps.then_some(true);
            }
        }

        overrides
    }
}
