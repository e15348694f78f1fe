// ── Notifier ──────────────────────────────────────────────────────────────────
//
// Presents text in an OK/Cancel dialog and reports which option the user
// chose.  The dialog itself belongs to the provider's display capability.

use log::{info, warn};

use crate::{
    error::Result,
    lifecycle::{Lifecycle, Phase},
    platform::{CapabilityProvider, DisplayApi},
};

/// Choice code for the OK button (`IDOK`).
pub(crate) const CONFIRMED_CODE: i32 = 1;

/// What the user did with the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UserChoice {
    /// Pressed OK.
    Confirmed,
    /// Pressed Cancel, closed the window, or the dialog never appeared.
    Dismissed,
}

impl UserChoice {
    /// Map a raw dialog code.  Only `IDOK` confirms.
    pub(crate) fn from_code(code: i32) -> Self {
        if code == CONFIRMED_CODE {
            Self::Confirmed
        } else {
            Self::Dismissed
        }
    }
}

/// Shows payloads through a provider's display capability.
pub(crate) struct Notifier<'p, P> {
    provider: &'p P,
    title: String,
    #[cfg(test)]
    last: Option<Lifecycle>,
}

impl<'p, P: CapabilityProvider> Notifier<'p, P> {
    pub(crate) fn new(provider: &'p P, title: impl Into<String>) -> Self {
        Self {
            provider,
            title: title.into(),
            #[cfg(test)]
            last: None,
        }
    }

    /// Lifecycle of the most recent `present`.
    #[cfg(test)]
    pub(crate) fn last_lifecycle(&self) -> Option<&Lifecycle> {
        self.last.as_ref()
    }

    /// Show `text` and wait for the user's choice.
    pub(crate) fn present(&mut self, text: &str) -> Result<UserChoice> {
        let mut life = Lifecycle::begin("notify");
        let outcome = self.present_with(&mut life, text);
        life.settle(&outcome);
        #[cfg(test)]
        {
            self.last = Some(life);
        }

        let choice = outcome?;
        match choice {
            UserChoice::Confirmed => info!("You clicked OK."),
            UserChoice::Dismissed => info!("You clicked Cancel."),
        }
        Ok(choice)
    }

    fn present_with(&self, life: &mut Lifecycle, text: &str) -> Result<UserChoice> {
        life.advance(Phase::Loading);
        let display = self.provider.load_display()?;

        life.advance(Phase::Ready);
        life.advance(Phase::Operating);
        let code = display.show(text, &self.title);
        if code == 0 {
            warn!("dialog could not be shown; treating as dismissed");
        }

        life.advance(Phase::Closing);
        Ok(UserChoice::from_code(code))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
