//! Display presence detection.

use std::time::Duration;

use regex::Regex;
use tokio::process::Command;

use crate::config::{ConfigError, DisplayConfig, DisplayPresence};

/// How to decide whether a screen is attached.
#[derive(Debug, Clone)]
pub enum PresenceProbe {
    Always,
    Never,
    /// Run a command and match its stdout, e.g. `tvservice -s` against
    /// `^state 0x.*a$` for an HDMI screen. A command still running after
    /// `timeout` is killed and the display counts as absent.
    Command {
        program: String,
        args: Vec<String>,
        pattern: Regex,
        timeout: Duration,
    },
}

impl PresenceProbe {
    /// Build the probe described by the display configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `presence = "command"` is set
    /// without a command or with an invalid pattern.
    pub fn from_config(config: &DisplayConfig) -> Result<Self, ConfigError> {
        match config.presence {
            DisplayPresence::Always => Ok(Self::Always),
            DisplayPresence::Never => Ok(Self::Never),
            DisplayPresence::Command => {
                let (program, args) =
                    config
                        .probe_command
                        .split_first()
                        .ok_or_else(|| ConfigError::InvalidValue {
                            field: "display.probe_command".to_string(),
                            reason: "must name a program when presence = \"command\"".to_string(),
                        })?;
                let pattern =
                    Regex::new(&config.probe_pattern).map_err(|e| ConfigError::InvalidValue {
                        field: "display.probe_pattern".to_string(),
                        reason: e.to_string(),
                    })?;
                Ok(Self::Command {
                    program: program.clone(),
                    args: args.to_vec(),
                    pattern,
                    timeout: config.timeout(),
                })
            }
        }
    }

    /// Check for a display. A probe command that cannot run, or does not
    /// finish in time, counts as absent.
    pub async fn check(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Command {
                program,
                args,
                pattern,
                timeout,
            } => {
                let mut command = Command::new(program);
                command.args(args).kill_on_drop(true);

                match tokio::time::timeout(*timeout, command.output()).await {
                    Ok(Ok(output)) => {
                        let stdout = String::from_utf8_lossy(&output.stdout);
                        stdout.lines().any(|line| pattern.is_match(line.trim()))
                    }
                    Ok(Err(e)) => {
                        tracing::debug!(program = %program, error = %e, "Display probe failed to run");
                        false
                    }
                    Err(_) => {
                        tracing::warn!(
                            program = %program,
                            timeout = ?timeout,
                            "Display probe timed out"
                        );
                        false
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command_config(command: &[&str], pattern: &str) -> DisplayConfig {
        DisplayConfig {
            presence: DisplayPresence::Command,
            probe_command: command.iter().map(|s| (*s).to_string()).collect(),
            probe_pattern: pattern.to_string(),
            ..DisplayConfig::default()
        }
    }

    #[tokio::test]
    async fn test_always_and_never() {
        assert!(PresenceProbe::Always.check().await);
        assert!(!PresenceProbe::Never.check().await);
    }

    #[test]
    fn test_command_requires_program() {
        let config = command_config(&[], "^state");
        let result = PresenceProbe::from_config(&config);
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_command_rejects_bad_pattern() {
        let config = command_config(&["true"], "(unclosed");
        let result = PresenceProbe::from_config(&config);
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_output_matches_pattern() {
        let config = command_config(&["echo", "state 0x12000a"], "^state 0x.*a$");
        let probe = PresenceProbe::from_config(&config).unwrap();
        assert!(probe.check().await);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_output_without_match() {
        let config = command_config(&["echo", "state 0x120002 [TV is off]"], "^state 0x.*a$");
        let probe = PresenceProbe::from_config(&config).unwrap();
        assert!(!probe.check().await);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_hanging_command_times_out_as_absent() {
        let config = DisplayConfig {
            timeout_ms: 100,
            ..command_config(&["sleep", "5"], ".*")
        };
        let probe = PresenceProbe::from_config(&config).unwrap();

        let present = tokio::time::timeout(Duration::from_secs(2), probe.check())
            .await
            .expect("probe should give up on its own");
        assert!(!present);
    }

    #[tokio::test]
    async fn test_missing_program_counts_as_absent() {
        let config = command_config(&["definitely-not-a-real-probe-binary"], ".*");
        let probe = PresenceProbe::from_config(&config).unwrap();
        assert!(!probe.check().await);
    }
}
