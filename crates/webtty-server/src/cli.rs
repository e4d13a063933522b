use std::path::PathBuf;

use clap::Parser;
use webtty_config::{LogLevel, WebTtyConfig};

#[derive(Debug, Parser)]
#[command(name = "webtty", about = "Share a terminal over WebSocket", version)]
pub struct Args {
    /// Config file (default: $WEBTTY_CONFIG or <config dir>/webtty/config.toml).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address to bind.
    #[arg(short, long)]
    pub address: Option<String>,

    /// Port to listen on.
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Let clients type into the terminal.
    #[arg(short = 'w', long)]
    pub permit_write: bool,

    /// Window title sent to clients.
    #[arg(long)]
    pub title: Option<String>,

    /// Seconds clients wait before reconnecting (0 disables).
    #[arg(long)]
    pub reconnect: Option<u32>,

    /// Log level when RUST_LOG is unset.
    #[arg(long, value_parser = parse_log_level)]
    pub log_level: Option<LogLevel>,

    /// Print the effective config as JSON and exit.
    #[arg(long)]
    pub print_config: bool,

    /// Program and arguments to run instead of the configured command.
    #[arg(trailing_var_arg = true)]
    pub command: Vec<String>,
}

impl Args {
    /// Command-line flags win over the config file.
    pub fn apply(&self, config: &mut WebTtyConfig) {
        if let Some(address) = &self.address {
            config.server.address = address.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if self.permit_write {
            config.session.permit_write = true;
        }
        if let Some(title) = &self.title {
            config.session.title = title.clone();
        }
        if let Some(reconnect) = self.reconnect {
            config.session.reconnect = reconnect;
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
        if let Some((program, args)) = self.command.split_first() {
            config.command.program = program.clone();
            config.command.args = args.to_vec();
        }
    }
}

fn parse_log_level(s: &str) -> Result<LogLevel, String> {
    match s.to_ascii_lowercase().as_str() {
        "trace" => Ok(LogLevel::Trace),
        "debug" => Ok(LogLevel::Debug),
        "info" => Ok(LogLevel::Info),
        "warn" => Ok(LogLevel::Warn),
        "error" => Ok(LogLevel::Error),
        other => Err(format!("unknown log level '{other}'")),
    }
}
