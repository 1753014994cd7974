// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.
//
// Settings live in `config.json` inside the data directory unless a path is
// given explicitly. A missing file means "use the defaults"; a file that
// exists but does not parse is a hard error.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PrintsweepError, Result};
use crate::types::{ProtocolEntry, ProtocolTable};

/// Name of the config file inside the data directory.
pub const CONFIG_FILE: &str = "config.json";

/// How a print job reaches a discovered printer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    /// Hand the file to the local spooler command (`lp -d <host> <file>`).
    #[default]
    Spooler,
    /// Stream the file straight to port 9100.
    Raw,
    /// Submit through an RFC 1179 exchange on port 515.
    Lpr,
}

impl FromStr for DispatchMode {
    type Err = PrintsweepError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spooler" | "lp" => Ok(Self::Spooler),
            "raw" | "jetdirect" => Ok(Self::Raw),
            "lpr" | "lpd" => Ok(Self::Lpr),
            other => Err(PrintsweepError::Config(format!(
                "unknown dispatch mode {other:?} (expected spooler, raw, or lpr)"
            ))),
        }
    }
}

/// Persistent scanner and dispatcher settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Protocols probed on every host.
    pub protocols: Vec<ProtocolEntry>,
    /// Connect timeout for a single probe, in milliseconds.
    pub connect_timeout_ms: u64,
    /// Capacity of the channel between probes and the aggregator.
    pub result_channel_capacity: usize,
    /// Upper bound on probes in flight. `None` launches every probe at once.
    pub max_in_flight: Option<usize>,
    /// Directory the test document is picked from.
    pub document_dir: PathBuf,
    /// File extensions eligible for printing, without the dot.
    pub document_extensions: Vec<String>,
    /// How jobs are sent.
    pub dispatch_mode: DispatchMode,
    /// Spooler executable used in `Spooler` mode.
    pub spooler_command: String,
    /// Where the run log is written.
    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            protocols: ProtocolTable::printers().iter().cloned().collect(),
            connect_timeout_ms: 3_000,
            result_channel_capacity: 100,
            max_in_flight: None,
            document_dir: PathBuf::from("."),
            document_extensions: vec!["pdf".into()],
            dispatch_mode: DispatchMode::Spooler,
            spooler_command: "lp".into(),
            log_file: PathBuf::from("printer_scan_and_print.log"),
        }
    }
}

impl AppConfig {
    /// Load the config at `path`, falling back to defaults when it is absent.
    pub fn load(path: &Path) -> Result<Self> {
        let data = match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        let config: Self = serde_json::from_str(&data).map_err(|e| {
            PrintsweepError::Config(format!("{}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Check the settings that can't be expressed in the type system.
    pub fn validate(&self) -> Result<()> {
        self.protocol_table()?;
        if self.connect_timeout_ms == 0 {
            return Err(PrintsweepError::Config(
                "connect_timeout_ms must be greater than zero".into(),
            ));
        }
        if self.result_channel_capacity == 0 {
            return Err(PrintsweepError::Config(
                "result_channel_capacity must be greater than zero".into(),
            ));
        }
        if self.max_in_flight == Some(0) {
            return Err(PrintsweepError::Config(
                "max_in_flight must be greater than zero when set".into(),
            ));
        }
        if self.spooler_command.trim().is_empty() {
            return Err(PrintsweepError::Config("spooler_command is empty".into()));
        }
        Ok(())
    }

    pub fn protocol_table(&self) -> Result<ProtocolTable> {
        ProtocolTable::new(self.protocols.clone())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

/// Return the application data directory.
///
/// Uses `$XDG_DATA_HOME/printsweep`, then `~/.local/share/printsweep`, and
/// `/tmp/printsweep` as a last resort. The directory is not created.
pub fn data_dir() -> PathBuf {
    let base = if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg)
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".local").join("share")
    } else {
        PathBuf::from("/tmp")
    };
    base.join("printsweep")
}

/// Default location of the config file.
pub fn default_config_path() -> PathBuf {
    data_dir().join(CONFIG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_behaviour() {
        let config = AppConfig::default();
        assert_eq!(config.connect_timeout(), Duration::from_secs(3));
        assert_eq!(config.result_channel_capacity, 100);
        assert_eq!(config.max_in_flight, None);
        assert_eq!(config.dispatch_mode, DispatchMode::Spooler);
        assert_eq!(config.spooler_command, "lp");
        assert_eq!(config.protocol_table().expect("valid"), ProtocolTable::printers());
        config.validate().expect("defaults are valid");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = AppConfig::load(&dir.path().join("absent.json")).expect("load");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{ "connect_timeout_ms": 750, "dispatch_mode": "raw" }"#)
            .expect("write");

        let config = AppConfig::load(&path).expect("load");
        assert_eq!(config.connect_timeout(), Duration::from_millis(750));
        assert_eq!(config.dispatch_mode, DispatchMode::Raw);
        assert_eq!(config.result_channel_capacity, 100);
        assert_eq!(config.protocols.len(), 4);
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "{ not json").expect("write");
        assert!(matches!(
            AppConfig::load(&path),
            Err(PrintsweepError::Config(_))
        ));
    }

    #[test]
    fn duplicate_protocols_in_file_are_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(
            &path,
            r#"{ "protocols": [ { "name": "IPP", "port": 631 }, { "name": "IPP", "port": 632 } ] }"#,
        )
        .expect("write");
        assert!(matches!(
            AppConfig::load(&path),
            Err(PrintsweepError::Config(_))
        ));
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let config = AppConfig {
            result_channel_capacity: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join(CONFIG_FILE);
        let config = AppConfig {
            max_in_flight: Some(256),
            dispatch_mode: DispatchMode::Lpr,
            document_extensions: vec!["pdf".into(), "ps".into()],
            ..Default::default()
        };
        config.save(&path).expect("save");
        assert_eq!(AppConfig::load(&path).expect("load"), config);
    }

    #[test]
    fn dispatch_mode_parses_aliases() {
        assert_eq!("LP".parse::<DispatchMode>().expect("lp"), DispatchMode::Spooler);
        assert_eq!("jetdirect".parse::<DispatchMode>().expect("raw"), DispatchMode::Raw);
        assert_eq!("lpd".parse::<DispatchMode>().expect("lpr"), DispatchMode::Lpr);
        assert!("fax".parse::<DispatchMode>().is_err());
    }
}
