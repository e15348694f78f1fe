// ── Configuration ─────────────────────────────────────────────────────────────
//
// Reads `fileio.json` from the working directory, or the file named by
// `FILEIO_CONFIG`.  Every field is optional; a missing default file means
// built-in defaults.
// No `unsafe` — pure safe Rust + serde_json.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{
    error::{FileIoError, Result},
    transfer::DEFAULT_CAPACITY,
};

// ── Format version ────────────────────────────────────────────────────────────

const CONFIG_VERSION: u32 = 1;

/// Environment variable naming an explicit config file.
pub(crate) const CONFIG_ENV: &str = "FILEIO_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "fileio.json";

// ── On-disk types ─────────────────────────────────────────────────────────────

/// Which implementation performs the write / read / show sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Variant {
    /// System DLLs loaded on demand, entry points resolved by name.
    #[default]
    Native,
    /// `std::fs` streams and the linked message box.
    Stream,
}

/// Root of the JSON config file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct Config {
    pub(crate) version: u32,
    /// File written and read back, relative to the working directory.
    pub(crate) path: PathBuf,
    /// Text written to the file.
    pub(crate) payload: String,
    /// Append a NUL byte after the payload on write.
    pub(crate) terminator: bool,
    /// Transfer buffer size in bytes, terminator included.
    pub(crate) capacity: usize,
    /// Dialog title.
    pub(crate) title: String,
    pub(crate) variant: Variant,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            path: PathBuf::from("TestFile.txt"),
            payload: "Ola mundo!".to_owned(),
            terminator: false,
            capacity: DEFAULT_CAPACITY,
            title: "File contents".to_owned(),
            variant: Variant::Native,
        }
    }
}

impl Config {
    /// The exact bytes written to the file.
    pub(crate) fn payload_bytes(&self) -> Vec<u8> {
        let mut bytes = self.payload.as_bytes().to_vec();
        if self.terminator {
            bytes.push(0);
        }
        bytes
    }

    /// Reject values the transfer cannot honour.
    fn validate(self) -> Result<Self> {
        if self.version != CONFIG_VERSION {
            return Err(FileIoError::ConfigInvalid(format!(
                "unsupported version {} (expected {CONFIG_VERSION})",
                self.version
            )));
        }
        if self.capacity < 2 {
            return Err(FileIoError::ConfigInvalid(format!(
                "capacity {} leaves no room for data and terminator",
                self.capacity
            )));
        }
        // A read reserves one byte, so the payload must fit in capacity - 1
        // to come back whole.
        let len = self.payload_bytes().len();
        if len >= self.capacity {
            return Err(FileIoError::ConfigInvalid(format!(
                "payload of {len} bytes needs a capacity of at least {}",
                len + 1
            )));
        }
        if self.payload.contains('\0') {
            return Err(FileIoError::ConfigInvalid(
                "payload must not contain NUL characters".to_owned(),
            ));
        }
        Ok(self)
    }
}

// ── Load ──────────────────────────────────────────────────────────────────────

/// Return the config path and whether it was named explicitly.
pub(crate) fn config_path() -> (PathBuf, bool) {
    match std::env::var_os(CONFIG_ENV) {
        Some(p) => (PathBuf::from(p), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    }
}

/// Load and validate the configuration.
pub(crate) fn load() -> Result<Config> {
    let (path, explicit) = config_path();
    load_from(&path, explicit)
}

/// Load `path`.  A missing file is an error only when `explicit`.
pub(crate) fn load_from(path: &Path, explicit: bool) -> Result<Config> {
    match fs::read(path) {
        Ok(data) => parse(&data).map_err(|e| match e {
            FileIoError::ConfigParse { source, .. } => FileIoError::ConfigParse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound && !explicit => Config::default().validate(),
        Err(source) => Err(FileIoError::ConfigRead {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Parse and validate config JSON.
pub(crate) fn parse(data: &[u8]) -> Result<Config> {
    let config: Config =
        serde_json::from_slice(data).map_err(|source| FileIoError::ConfigParse {
            path: PathBuf::new(),
            source,
        })?;
    config.validate()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
