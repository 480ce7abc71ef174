//! Camera capability. The camera plus barcode decoder pair is opaque to the
//! rest of the app: activating it yields decoded payload strings on the main
//! context until the session is dropped.

use std::process::Stdio;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

use crate::utils;

#[derive(Debug, Error)]
pub enum CameraError {
    #[error("scanner command is empty")]
    EmptyCommand,
}

/// Stream of decoded QR payloads from the device camera.
pub trait CameraFeed {
    fn activate(&self, sink: glib::Sender<String>) -> CameraSession;
}

/// A running camera activation. Dropping it stops the stream and the helper
/// process behind it.
pub struct CameraSession {
    stop: Option<tokio::sync::oneshot::Sender<()>>,
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }
}

/// Camera feed backed by a `zbarcam`-style helper that prints one decoded
/// payload per stdout line.
pub struct ZbarCamera {
    program: String,
    args: Vec<String>,
}

impl ZbarCamera {
    pub fn from_command(command: &str) -> Result<Self, CameraError> {
        let mut parts = utils::split_command(command);
        if parts.is_empty() {
            return Err(CameraError::EmptyCommand);
        }
        let program = parts.remove(0);
        Ok(Self {
            program,
            args: parts,
        })
    }
}

impl CameraFeed for ZbarCamera {
    fn activate(&self, sink: glib::Sender<String>) -> CameraSession {
        let (stop_tx, mut stop_rx) = tokio::sync::oneshot::channel::<()>();
        let program = self.program.clone();
        let args = self.args.clone();
        utils::spawn_async(async move {
            let mut child = match Command::new(&program)
                .args(&args)
                .stdout(Stdio::piped())
                .spawn()
            {
                Ok(child) => child,
                Err(err) => {
                    log::error!("failed to start scanner `{}`: {}", program, err);
                    return;
                }
            };
            let Some(stdout) = child.stdout.take() else {
                let _ = child.kill().await;
                return;
            };
            let mut lines = BufReader::new(stdout).lines();
            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    line = lines.next_line() => match line {
                        Ok(Some(payload)) => {
                            let payload = payload.trim().to_string();
                            if payload.is_empty() {
                                continue;
                            }
                            if sink.send(payload).is_err() {
                                break;
                            }
                        }
                        Ok(None) => {
                            log::warn!("scanner `{}` exited", program);
                            break;
                        }
                        Err(err) => {
                            log::error!("scanner read failed: {}", err);
                            break;
                        }
                    },
                }
            }
            let _ = child.kill().await;
        });
        CameraSession {
            stop: Some(stop_tx),
        }
    }
}
