// ── Pipeline ──────────────────────────────────────────────────────────────────
//
// The whole program: write the payload, read it back, decode it, show it.
// Steps run strictly in order and the first failure ends the run; a failed
// write skips the read, a failed read skips the dialog.  No global state:
// every step borrows the provider and loads what it needs itself.

use log::{info, warn};

use crate::{
    config::Config,
    error::Result,
    notify::{Notifier, UserChoice},
    platform::CapabilityProvider,
    transfer::FileTransfer,
};

/// Run write → read → decode → notify against `provider`.
pub(crate) fn run<P: CapabilityProvider>(provider: &P, config: &Config) -> Result<UserChoice> {
    let mut transfer = FileTransfer::new(provider, config.capacity);

    transfer.write(&config.path, &config.payload_bytes())?;
    let buffer = transfer.read(&config.path)?;
    if buffer.is_empty() {
        warn!("{} is empty.", config.path.display());
    }

    let text = buffer.text()?;
    info!("Decoded {} characters.", text.chars().count());

    info!("Showing the file contents in the dialog...");
    Notifier::new(provider, config.title.as_str()).present(text)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
