//! Local process on a PTY as a session slave.

use std::collections::HashMap;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread;

use async_trait::async_trait;
use portable_pty::{native_pty_system, Child, CommandBuilder, MasterPty, PtySize};
use tokio::sync::mpsc;
use webtty::{Slave, TerminalSize};
use webtty_common::WebTtyError;
use webtty_config::CommandConfig;

use crate::pending::Pending;

/// Size used when neither the config nor the client has picked one yet.
pub const DEFAULT_SIZE: TerminalSize = TerminalSize {
    columns: 80,
    rows: 24,
};

const READ_CHUNK: usize = 4096;
const OUTPUT_QUEUE: usize = 32;

/// Inherited by the child; everything else in the server's environment is dropped.
const ALLOWED_ENV_VARS: &[&str] = &[
    "HOME",
    "USER",
    "LOGNAME",
    "SHELL",
    "PATH",
    "LANG",
    "LC_ALL",
    "LC_CTYPE",
    "TMPDIR",
    "TZ",
];

/// What to run on each connection's PTY.
#[derive(Debug, Clone, PartialEq)]
pub struct PtyCommand {
    pub program: String,
    pub args: Vec<String>,
    pub env: HashMap<String, String>,
    pub cwd: Option<PathBuf>,
}

impl PtyCommand {
    /// An empty `program` means the user's shell.
    pub fn from_config(config: &CommandConfig) -> Self {
        let program = if config.program.is_empty() {
            default_shell()
        } else {
            config.program.clone()
        };
        Self {
            program,
            args: config.args.clone(),
            env: config.env.clone(),
            cwd: config.working_directory.as_ref().map(PathBuf::from),
        }
    }

    fn builder(&self) -> CommandBuilder {
        let mut cmd = CommandBuilder::new(&self.program);
        cmd.args(&self.args);

        cmd.env_clear();
        for key in ALLOWED_ENV_VARS {
            if let Ok(val) = std::env::var(key) {
                cmd.env(key, val);
            }
        }
        cmd.env("TERM", "xterm-256color");
        for (key, val) in &self.env {
            cmd.env(key, val);
        }

        if let Some(cwd) = &self.cwd {
            cmd.cwd(cwd);
        }
        cmd
    }
}

/// `$SHELL`, falling back to `/bin/sh`.
pub fn default_shell() -> String {
    std::env::var("SHELL")
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "/bin/sh".to_string())
}

/// A child process attached to a PTY.
///
/// A dedicated thread does the blocking PTY reads and forwards chunks over a
/// channel; the channel closes when the child's output reaches EOF.
pub struct PtySlave {
    reader: tokio::sync::Mutex<Reader>,
    writer: Arc<Mutex<Box<dyn Write + Send>>>,
    master: Mutex<Box<dyn MasterPty + Send>>,
    child: Arc<Mutex<Box<dyn Child + Send + Sync>>>,
}

struct Reader {
    rx: mpsc::Receiver<Vec<u8>>,
    pending: Pending,
}

impl PtySlave {
    pub fn spawn(command: &PtyCommand, size: TerminalSize) -> Result<Self, WebTtyError> {
        let pair = native_pty_system()
            .openpty(pty_size(size))
            .map_err(|e| WebTtyError::Terminal(format!("Failed to open PTY: {e}")))?;

        let child = pair.slave.spawn_command(command.builder()).map_err(|e| {
            WebTtyError::Terminal(format!("Failed to spawn '{}': {e}", command.program))
        })?;
        drop(pair.slave);

        let writer = pair
            .master
            .take_writer()
            .map_err(|e| WebTtyError::Terminal(format!("Failed to take PTY writer: {e}")))?;
        let mut reader = pair
            .master
            .try_clone_reader()
            .map_err(|e| WebTtyError::Terminal(format!("Failed to clone PTY reader: {e}")))?;

        let (tx, rx) = mpsc::channel::<Vec<u8>>(OUTPUT_QUEUE);
        thread::Builder::new()
            .name("pty-reader".to_string())
            .spawn(move || {
                let mut buf = [0u8; READ_CHUNK];
                loop {
                    match reader.read(&mut buf) {
                        Ok(0) => break,
                        Ok(n) => {
                            if tx.blocking_send(buf[..n].to_vec()).is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            tracing::debug!("PTY reader error: {e}");
                            break;
                        }
                    }
                }
            })?;

        tracing::debug!(program = %command.program, columns = size.columns, rows = size.rows, "PTY spawned");

        Ok(Self {
            reader: tokio::sync::Mutex::new(Reader {
                rx,
                pending: Pending::default(),
            }),
            writer: Arc::new(Mutex::new(writer)),
            master: Mutex::new(pair.master),
            child: Arc::new(Mutex::new(child)),
        })
    }

    /// Kill the child and reap it. Safe to call after it has already exited.
    pub async fn terminate(&self) {
        let child = Arc::clone(&self.child);
        let reaped = tokio::task::spawn_blocking(move || {
            let Ok(mut child) = child.lock() else {
                return;
            };
            if let Err(e) = child.kill() {
                tracing::debug!("PTY kill error (may already be dead): {e}");
            }
            match child.wait() {
                Ok(status) => tracing::debug!(exit_code = status.exit_code(), "PTY child exited"),
                Err(e) => tracing::debug!("PTY wait error: {e}"),
            }
        })
        .await;
        if let Err(e) = reaped {
            tracing::warn!(error = %e, "PTY reaper task failed");
        }
    }
}

#[async_trait]
impl Slave for PtySlave {
    async fn read(&self, buf: &mut [u8]) -> io::Result<usize> {
        let mut reader = self.reader.lock().await;
        loop {
            if !reader.pending.is_empty() {
                return Ok(reader.pending.copy_to(buf));
            }
            match reader.rx.recv().await {
                Some(chunk) => reader.pending.fill(chunk),
                None => return Ok(0),
            }
        }
    }

    async fn write(&self, data: &[u8]) -> io::Result<usize> {
        let writer = Arc::clone(&self.writer);
        let data = data.to_vec();
        tokio::task::spawn_blocking(move || -> io::Result<usize> {
            let mut writer = writer
                .lock()
                .map_err(|_| io::Error::other("PTY writer lock poisoned"))?;
            writer.write_all(&data)?;
            writer.flush()?;
            Ok(data.len())
        })
        .await
        .map_err(io::Error::other)?
    }

    async fn resize(&self, columns: u16, rows: u16) -> io::Result<()> {
        let master = self
            .master
            .lock()
            .map_err(|_| io::Error::other("PTY master lock poisoned"))?;
        master
            .resize(pty_size(TerminalSize::new(columns, rows)))
            .map_err(|e| io::Error::other(format!("PTY resize failed: {e}")))
    }
}

fn pty_size(size: TerminalSize) -> PtySize {
    PtySize {
        rows: size.rows,
        cols: size.columns,
        pixel_width: 0,
        pixel_height: 0,
    }
}
