/// fileio build script.
///
/// The native variant loads `kernel32.dll` and `user32.dll` at runtime, so it
/// only exists on Windows.  Other targets still build (the stream variant and
/// the test suite are portable) but get a warning so nobody mistakes the
/// resulting binary for the full program.
fn main() {
    let target_os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    if target_os != "windows" {
        println!(
            "cargo:warning=fileio: target {target_os:?} has no Win32 modules; \
             the native variant will report ModuleLoadFailed at runtime"
        );
    }

    // Only re-run the build script when it changes.
    println!("cargo:rerun-if-changed=build.rs");
}
