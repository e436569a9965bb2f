//! A small, span-free error type shared by every stage.
//!
//! Grounded on `typst`'s `diag.rs`: an [`EcoString`]-based result alias plus
//! a `bail!` macro for early returns. This pipeline has no source spans, so
//! only the string half of `typst`'s diagnostic machinery survives.

use ecow::EcoString;

/// The result type returned by anything that can fail fatally (§7: malformed
/// graphic, invalid flag value, collaborator failure).
pub type StrResult<T> = Result<T, EcoString>;

/// Construct an [`EcoString`] error and return it from the enclosing
/// function.
#[macro_export]
macro_rules! bail {
    ($($tts:tt)*) => {
        return Err(::ecow::eco_format!($($tts)*))
    };
}
