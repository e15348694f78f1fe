// ── user32 dialog entry point ─────────────────────────────────────────────────
//
// `MessageBoxW` resolved from `user32.dll` for a single notification.

#![allow(unsafe_code)]

use windows::{core::PCWSTR, Win32::Foundation::HWND};

use super::{
    consts::{MB_ICONINFORMATION, MB_OKCANCEL},
    library::{Library, RawEntryPoint},
    to_wide,
};
use crate::{error::Result, platform::DisplayApi};

const MODULE: &str = "user32.dll";

type MessageBoxWFn = unsafe extern "system" fn(
    HWND,   // hWnd (owner; null here)
    PCWSTR, // lpText
    PCWSTR, // lpCaption
    u32,    // uType
) -> i32;

/// `MessageBoxW` resolved from `user32.dll`.
pub(crate) struct User32 {
    message_box: MessageBoxWFn,
    _module: Library,
}

impl User32 {
    pub(crate) fn load() -> Result<Self> {
        let module = Library::acquire(MODULE)?;
        let message_box = module.entry_point("MessageBoxW")?;

        // SAFETY: the export named MessageBoxW has the WINAPI prototype
        // declared above; the pointer stays valid while `module` is owned by
        // the returned value.
        let message_box =
            unsafe { std::mem::transmute::<RawEntryPoint, MessageBoxWFn>(message_box) };

        Ok(Self {
            message_box,
            _module: module,
        })
    }
}

impl DisplayApi for User32 {
    fn show(&self, text: &str, title: &str) -> i32 {
        let text_wide = to_wide(text);
        let title_wide = to_wide(title);

        // SAFETY: text_wide and title_wide are valid null-terminated UTF-16
        // strings that remain allocated for the duration of the call.
        // HWND::default() (null) means the dialog has no owner window.
        unsafe {
            (self.message_box)(
                HWND::default(),
                PCWSTR(text_wide.as_ptr()),
                PCWSTR(title_wide.as_ptr()),
                MB_OKCANCEL | MB_ICONINFORMATION,
            )
        }
    }
}
