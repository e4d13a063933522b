//! webtty: serve a terminal program to WebSocket clients.
//!
//! Each accepted connection gets its own PTY running the configured command,
//! bridged to the socket by a `webtty::Session`.

mod cli;
mod connection;
mod master;
mod pending;
mod settings;
mod slave;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::fmt::format::{DefaultFields, Format};
use tracing_subscriber::fmt::SubscriberBuilder;
use tracing_subscriber::EnvFilter;
use tokio_util::sync::CancellationToken;
use webtty_audit::{AuditReporter, HttpAuditSink};
use webtty_common::WebTtyError;
use webtty_config::{LogLevel, WebTtyConfig};

use crate::cli::Args;
use crate::connection::{handle_connection, ConnectionLimit, ServerContext};
use crate::slave::PtyCommand;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // The global level may come from the file, so loading logs through a
    // temporary subscriber at the command-line level.
    let loaded = tracing::subscriber::with_default(
        log_builder(args.log_level.unwrap_or_default()).finish(),
        || webtty_config::load_config(args.config.as_deref()),
    );
    let level = args
        .log_level
        .or_else(|| loaded.as_ref().ok().map(|c| c.logging.level))
        .unwrap_or_default();
    log_builder(level).init();

    let mut config = match loaded {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load config");
            return ExitCode::FAILURE;
        }
    };
    args.apply(&mut config);

    if args.print_config {
        println!("{}", webtty_config::config_to_json(&config));
        return ExitCode::SUCCESS;
    }
    tracing::debug!(config = %webtty_config::config_to_json(&config), "Effective config");

    match serve(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Server stopped");
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` wins; otherwise our crates log at `level`.
fn log_builder(level: LogLevel) -> SubscriberBuilder<DefaultFields, Format, EnvFilter> {
    tracing_subscriber::fmt().with_env_filter(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directives(level).into()),
    )
}

fn default_directives(level: LogLevel) -> String {
    let level = level.as_str();
    format!("webtty={level},webtty_server={level},webtty_config={level},webtty_audit={level}")
}

async fn serve(config: WebTtyConfig) -> Result<(), WebTtyError> {
    webtty_config::validation::validate(&config)?;

    let command = PtyCommand::from_config(&config.command);
    let options = settings::session_options(&config.session, &command)?;

    let audit = if config.audit.enabled {
        let sink = HttpAuditSink::new(
            &config.audit.endpoint,
            Duration::from_secs(u64::from(config.audit.timeout_secs)),
        )
        .map_err(|e| WebTtyError::Network(e.to_string()))?;
        tracing::info!(endpoint = %sink.endpoint(), "Command auditing enabled");
        let (reporter, _task) = AuditReporter::spawn(Arc::new(sink));
        Some(reporter)
    } else {
        None
    };

    let shutdown = CancellationToken::new();
    let ctx = Arc::new(ServerContext {
        initial_size: settings::initial_size(&config.session),
        command,
        options,
        audit,
        cluster: config.audit.cluster.clone(),
        limit: ConnectionLimit::new(config.server.max_connections as usize),
        shutdown: shutdown.clone(),
    });

    let addr = config.server.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(
        address = %addr,
        program = %ctx.command.program,
        permit_write = config.session.permit_write,
        "webtty listening"
    );

    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown requested");
            signal_token.cancel();
        }
    });

    loop {
        let accepted = tokio::select! {
            _ = shutdown.cancelled() => break,
            accepted = listener.accept() => accepted,
        };
        match accepted {
            Ok((stream, peer)) => {
                let ctx = Arc::clone(&ctx);
                tokio::spawn(async move {
                    handle_connection(stream, peer, ctx).await;
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "TCP accept error");
            }
        }
    }

    // Sessions see the cancellation through their child tokens; give them a
    // moment to kill their processes.
    let deadline = tokio::time::Instant::now() + SHUTDOWN_GRACE;
    while ctx.limit.active() > 0 && tokio::time::Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    tracing::info!(remaining = ctx.limit.active(), "webtty stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Write};
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn default_directives_cover_every_crate() {
        let directives = default_directives(LogLevel::Debug);
        for target in ["webtty=", "webtty_server=", "webtty_config=", "webtty_audit="] {
            assert!(directives.contains(&format!("{target}debug")), "{directives}");
        }
    }

    #[test]
    fn config_loading_is_logged_at_startup_level() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nport = 9000\n").unwrap();

        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(default_directives(LogLevel::Info)))
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let config = tracing::subscriber::with_default(subscriber, || {
            webtty_config::load_config(Some(&path))
        })
        .unwrap();
        assert_eq!(config.server.port, 9000);

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("loaded config from"), "{output}");
    }
}
