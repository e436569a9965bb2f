//! Non-fatal diagnostics (§7: malformed record).
//!
//! A warning is printed and the offending record is skipped; it never
//! changes a stage's exit code.

/// Print a warning to standard error.
///
/// Mirrors `original_source/utils.py`'s `warn`, which just writes to
/// `sys.stderr`; this pipeline has no use for colored warnings (only
/// `error:` gets that treatment in `tw-cli`), so a plain `eprintln!` is
/// enough.
#[macro_export]
macro_rules! warn {
    ($($tts:tt)*) => {
        eprintln!($($tts)*)
    };
}
