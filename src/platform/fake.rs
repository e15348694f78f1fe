// ── In-memory provider (tests only) ───────────────────────────────────────────
//
// Stands in for the native provider: files live in a map, modules are
// counted instead of loaded, and every failure branch can be forced.  The
// ledger lets tests prove that each acquired module is released exactly once
// and each opened handle is closed exactly once.

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    io,
    path::{Path, PathBuf},
    rc::Rc,
    sync::{Mutex, OnceLock},
    thread::{self, ThreadId},
};

use log::{Level, LevelFilter, Log, Metadata, Record};

use crate::{
    error::{FileIoError, Result},
    platform::{
        report_loaded, report_resolved, CapabilityProvider, Direction, DisplayApi,
        FileSystemApi, OpenMode,
    },
    transfer::ByteBuffer,
};

pub(crate) const FILES_MODULE: &str = "kernel32.dll";
pub(crate) const DISPLAY_MODULE: &str = "user32.dll";

const FILE_SYMBOLS: [&str; 4] = ["CreateFileW", "ReadFile", "WriteFile", "CloseHandle"];
const DISPLAY_SYMBOLS: [&str; 1] = ["MessageBoxW"];

/// `IDOK`
pub(crate) const CODE_OK: i32 = 1;
/// `IDCANCEL`
pub(crate) const CODE_CANCEL: i32 = 2;

/// Shared bookkeeping and fake file contents.
#[derive(Debug, Default)]
pub(crate) struct Ledger {
    pub(crate) acquired: Cell<usize>,
    pub(crate) released: Cell<usize>,
    pub(crate) opened: Cell<usize>,
    pub(crate) closed: Cell<usize>,
    pub(crate) presented: RefCell<Vec<String>>,
    files: RefCell<HashMap<PathBuf, Vec<u8>>>,
}

impl Ledger {
    fn bump(cell: &Cell<usize>) {
        cell.set(cell.get() + 1);
    }
}

/// Failure injection knobs.  All off by default.
#[derive(Debug, Clone, Default)]
pub(crate) struct Faults {
    /// `acquire` fails for this module name.
    pub(crate) module: Option<&'static str>,
    /// Symbol resolution fails for this name.
    pub(crate) symbol: Option<&'static str>,
    /// Every read and write fails after the handle opened.
    pub(crate) transfer: bool,
    /// Writes report one byte fewer than requested.
    pub(crate) short_write: bool,
    /// A file disappears as soon as its write handle closes, as if deleted
    /// by another process.
    pub(crate) vanish_after_write: bool,
    /// A file's contents are replaced as soon as its write handle closes.
    pub(crate) tamper_after_write: Option<&'static [u8]>,
}

/// In-memory `CapabilityProvider`.
#[derive(Debug)]
pub(crate) struct FakeProvider {
    pub(crate) ledger: Rc<Ledger>,
    pub(crate) faults: Faults,
    /// Code `MessageBoxW` "returns".
    pub(crate) choice_code: i32,
}

impl Default for FakeProvider {
    fn default() -> Self {
        Self {
            ledger: Rc::default(),
            faults: Faults::default(),
            choice_code: CODE_OK,
        }
    }
}

impl FakeProvider {
    pub(crate) fn with_faults(faults: Faults) -> Self {
        Self {
            faults,
            ..Self::default()
        }
    }

    pub(crate) fn with_choice(code: i32) -> Self {
        Self {
            choice_code: code,
            ..Self::default()
        }
    }

    pub(crate) fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.ledger.files.borrow().get(path.as_ref()).cloned()
    }

    pub(crate) fn insert(&self, path: impl Into<PathBuf>, bytes: &[u8]) {
        self.ledger.files.borrow_mut().insert(path.into(), bytes.to_vec());
    }

    pub(crate) fn remove(&self, path: impl AsRef<Path>) {
        self.ledger.files.borrow_mut().remove(path.as_ref());
    }

    /// True when every acquired module has been released.
    pub(crate) fn balanced(&self) -> bool {
        self.ledger.acquired.get() == self.ledger.released.get()
            && self.ledger.opened.get() == self.ledger.closed.get()
    }

    fn acquire(&self, name: &'static str, symbols: &[&'static str]) -> Result<FakeModule> {
        if self.faults.module == Some(name) {
            return Err(FileIoError::ModuleLoadFailed {
                module: name.to_owned(),
                source: io::Error::from(io::ErrorKind::NotFound),
            });
        }
        Ledger::bump(&self.ledger.acquired);
        report_loaded(name);
        let module = FakeModule {
            name,
            ledger: Rc::clone(&self.ledger),
        };
        for symbol in symbols {
            module.resolve(symbol, self.faults.symbol)?;
        }
        Ok(module)
    }
}

/// A counted stand-in for a loaded DLL.  Dropping it records the release.
#[derive(Debug)]
pub(crate) struct FakeModule {
    name: &'static str,
    ledger: Rc<Ledger>,
}

impl FakeModule {
    fn resolve(&self, symbol: &str, missing: Option<&str>) -> Result<()> {
        if missing == Some(symbol) {
            return Err(FileIoError::SymbolResolutionFailed {
                module: self.name.to_owned(),
                symbol: symbol.to_owned(),
            });
        }
        report_resolved(symbol, self.name);
        Ok(())
    }
}

impl Drop for FakeModule {
    fn drop(&mut self) {
        Ledger::bump(&self.ledger.released);
    }
}

/// Handle to a fake file.
#[derive(Debug)]
pub(crate) struct FakeHandle {
    path: PathBuf,
    mode: OpenMode,
}

/// File capability loaded from the fake provider.
#[derive(Debug)]
pub(crate) struct FakeFiles {
    module: FakeModule,
    faults: Faults,
}

impl FileSystemApi for FakeFiles {
    type Handle = FakeHandle;

    fn open_or_create(&self, path: &Path, mode: OpenMode) -> Result<FakeHandle> {
        let mut files = self.module.ledger.files.borrow_mut();
        match mode {
            OpenMode::ReadExisting if !files.contains_key(path) => {
                return Err(FileIoError::HandleInvalid {
                    path: path.to_path_buf(),
                    mode,
                    source: io::Error::from(io::ErrorKind::NotFound),
                });
            }
            OpenMode::ReadExisting => {}
            OpenMode::CreateAlways => {
                files.insert(path.to_path_buf(), Vec::new());
            }
        }
        Ledger::bump(&self.module.ledger.opened);
        Ok(FakeHandle {
            path: path.to_path_buf(),
            mode,
        })
    }

    fn transfer(
        &self,
        handle: &mut FakeHandle,
        buffer: &mut ByteBuffer,
        direction: Direction,
    ) -> Result<usize> {
        if self.faults.transfer {
            return Err(FileIoError::TransferFailed {
                direction,
                source: io::Error::from(io::ErrorKind::Other),
            });
        }
        let mut files = self.module.ledger.files.borrow_mut();
        let file = files.get_mut(&handle.path).ok_or_else(|| FileIoError::TransferFailed {
            direction,
            source: io::Error::from(io::ErrorKind::NotFound),
        })?;
        match direction {
            Direction::Read => {
                let window = buffer.read_window();
                let n = window.len().min(file.len());
                window[..n].copy_from_slice(&file[..n]);
                buffer.set_len(n);
                Ok(n)
            }
            Direction::Write => {
                let mut bytes = buffer.as_bytes();
                if self.faults.short_write && !bytes.is_empty() {
                    bytes = &bytes[..bytes.len() - 1];
                }
                file.extend_from_slice(bytes);
                Ok(bytes.len())
            }
        }
    }

    fn close(&self, handle: FakeHandle) {
        Ledger::bump(&self.module.ledger.closed);
        if handle.mode != OpenMode::CreateAlways {
            return;
        }
        let mut files = self.module.ledger.files.borrow_mut();
        if self.faults.vanish_after_write {
            files.remove(&handle.path);
        } else if let Some(bytes) = self.faults.tamper_after_write {
            files.insert(handle.path, bytes.to_vec());
        }
    }
}

/// Display capability loaded from the fake provider.
#[derive(Debug)]
pub(crate) struct FakeDisplay {
    module: FakeModule,
    code: i32,
}

impl DisplayApi for FakeDisplay {
    fn show(&self, text: &str, _title: &str) -> i32 {
        self.module.ledger.presented.borrow_mut().push(text.to_owned());
        self.code
    }
}

impl CapabilityProvider for FakeProvider {
    type Files = FakeFiles;
    type Display = FakeDisplay;

    fn load_files(&self) -> Result<FakeFiles> {
        let module = self.acquire(FILES_MODULE, &FILE_SYMBOLS)?;
        Ok(FakeFiles {
            module,
            faults: self.faults.clone(),
        })
    }

    fn load_display(&self) -> Result<FakeDisplay> {
        let module = self.acquire(DISPLAY_MODULE, &DISPLAY_SYMBOLS)?;
        Ok(FakeDisplay {
            module,
            code: self.choice_code,
        })
    }
}

// ── Log capture ───────────────────────────────────────────────────────────────
//
// A process-wide logger that records every line together with the thread
// that emitted it, then forwards to `env_logger` so `RUST_LOG` still works.
// Tests run one per thread, so filtering by thread keeps them apart.

struct CaptureLogger {
    inner: env_logger::Logger,
    lines: Mutex<Vec<(ThreadId, Level, String)>>,
}

impl Log for CaptureLogger {
    fn enabled(&self, _: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push((thread::current().id(), record.level(), record.args().to_string()));
        }
        if self.inner.matches(record) {
            self.inner.log(record);
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

static CAPTURE: OnceLock<CaptureLogger> = OnceLock::new();

/// Install the capturing logger.  Safe to call from every test.
pub(crate) fn capture_logs() {
    let logger = CAPTURE.get_or_init(|| CaptureLogger {
        inner: env_logger::builder().is_test(true).build(),
        lines: Mutex::default(),
    });
    if log::set_logger(logger).is_ok() {
        log::set_max_level(LevelFilter::Trace);
    }
}

/// Lines logged so far by the calling thread, oldest first.
pub(crate) fn captured_on_this_thread() -> Vec<(Level, String)> {
    let me = thread::current().id();
    CAPTURE
        .get()
        .and_then(|logger| logger.lines.lock().ok())
        .map(|lines| {
            lines
                .iter()
                .filter(|(id, ..)| *id == me)
                .map(|(_, level, line)| (*level, line.clone()))
                .collect()
        })
        .unwrap_or_default()
}
