// ── Safety policy ────────────────────────────────────────────────────────────
// Unsafe code is forbidden everywhere except `platform::win32` (Win32 FFI and
// runtime symbol resolution).  Each unsafe block in that module MUST carry a
// `// SAFETY:` comment.
#![deny(unsafe_code)]

mod app;
mod config;
mod error;
mod lifecycle;
mod notify;
mod platform;
mod transfer;

use std::{io::Write, process::ExitCode};

use log::{error, info};

use crate::{
    config::{Config, Variant},
    error::Result,
    notify::UserChoice,
    platform::stream::StreamProvider,
};

fn main() -> ExitCode {
    init_logging();

    match run() {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn run() -> Result<UserChoice> {
    let config = config::load()?;
    info!(
        "Writing {} bytes to {} ({:?} variant).",
        config.payload_bytes().len(),
        config.path.display(),
        config.variant
    );

    match config.variant {
        Variant::Native => run_native(&config),
        Variant::Stream => app::run(&StreamProvider, &config),
    }
}

#[cfg(windows)]
fn run_native(config: &Config) -> Result<UserChoice> {
    app::run(&platform::win32::Win32Provider, config)
}

#[cfg(not(windows))]
fn run_native(_config: &Config) -> Result<UserChoice> {
    Err(error::FileIoError::ModuleLoadFailed {
        module: "kernel32.dll".to_owned(),
        source: std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "system modules can only be loaded on Windows",
        ),
    })
}

/// Status lines go to stdout as plain text; `RUST_LOG` overrides the level.
fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stdout)
        .format(|buf, record| match record.level() {
            log::Level::Info => writeln!(buf, "{}", record.args()),
            level => writeln!(buf, "{level}: {}", record.args()),
        })
        .init();
}
