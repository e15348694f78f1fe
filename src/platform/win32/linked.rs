// ── Statically linked dialog ──────────────────────────────────────────────────
//
// The stream variant shows its dialog the ordinary way: `MessageBoxW` bound at
// link time through the windows crate, no runtime resolution.

#![allow(unsafe_code)]

use windows::{
    core::PCWSTR,
    Win32::{
        Foundation::HWND,
        UI::WindowsAndMessaging::{MessageBoxW, MB_ICONINFORMATION, MB_OKCANCEL},
    },
};

use super::to_wide;
use crate::platform::DisplayApi;

/// `MessageBoxW` imported at link time.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct LinkedMessageBox;

impl DisplayApi for LinkedMessageBox {
    fn show(&self, text: &str, title: &str) -> i32 {
        let text_wide = to_wide(text);
        let title_wide = to_wide(title);

        // SAFETY: text_wide and title_wide are valid null-terminated UTF-16
        // strings that remain allocated for the duration of the MessageBoxW
        // call.  HWND::default() (null) means the dialog has no owner window.
        unsafe {
            MessageBoxW(
                HWND::default(),
                PCWSTR(text_wide.as_ptr()),
                PCWSTR(title_wide.as_ptr()),
                MB_OKCANCEL | MB_ICONINFORMATION,
            )
        }
        .0
    }
}
