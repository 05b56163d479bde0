use std::time::Duration;

use adev_core::command_stream::{capture_command, is_tool_installed};
use adev_core::error::{AdevError, Result};
use tracing::debug;

use super::{resolve_ipv4, Prober};

const PING: &str = "ping";

/// Probes with the operating system's `ping`; no raw-socket privileges needed.
#[derive(Debug, Clone)]
pub struct CommandProber {
    timeout: Duration,
}

impl CommandProber {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn ping_args(&self, target: &str) -> Vec<String> {
        if cfg!(windows) {
            vec![
                "-n".into(),
                "1".into(),
                "-w".into(),
                self.timeout.as_millis().to_string(),
                target.into(),
            ]
        } else {
            // -W takes whole seconds on Linux
            let seconds = self.timeout.as_secs_f64().ceil().max(1.0) as u64;
            vec![
                "-c".into(),
                "1".into(),
                "-W".into(),
                seconds.to_string(),
                target.into(),
            ]
        }
    }
}

impl Prober for CommandProber {
    fn probe(&self, address: &str) -> Result<bool> {
        let Some(target) = resolve_ipv4(address)? else {
            return Ok(false);
        };
        if !is_tool_installed(PING) {
            return Err(AdevError::Probe(format!(
                "'{PING}' is not installed or not on PATH"
            )));
        }

        let args = self.ping_args(&target.to_string());
        match capture_command(PING, &args) {
            Ok((success, _)) => {
                debug!("ping {} -> {}", target, success);
                Ok(success)
            }
            Err(AdevError::Dependency(msg)) => Err(AdevError::Probe(msg)),
            Err(e) => Err(AdevError::Probe(e.to_string())),
        }
    }
}
