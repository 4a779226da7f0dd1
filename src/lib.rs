//! # `numguard` - Diagnostics & Safe Allocation for Numerical Code
//!
//! A fail-fast diagnostics substrate for numerically sensitive programs. A
//! violated invariant in numeric code is never handled, only reported: continuing
//! past a corrupted allocation or an invalid kernel matrix is worse than stopping.
//!
//! ## Key Features
//!
//! - **Always-on checks**: [`enforce!`], [`enforce_msg!`], [`enforce_linalg!`] and
//!   friends stay active in release builds, unlike `assert!`.
//! - **Safe containers**: `*_safe_alloc`, `*_safe_memcpy` and `*_safe_free` wrap the
//!   linear-algebra backend and turn its failure signals into diagnostics.
//! - **Diagnostic modes**: debug, no-check, strict, quiet, legacy and a targeted
//!   issue number, carried by [`DiagnosticOptions`].
//! - **Kernel validation**: [`validate_K!`] checks symmetry, eigenvalues and
//!   positive definiteness of the kernel matrix.
//!
//! ## Architecture
//!
//! The library never terminates the process. Every fatal path produces a
//! [`Failure`] with a [`Severity`], a message and the [`SourceSite`] it was raised
//! at; the caller propagates it with `?`. At the application boundary
//! [`Diagnostics::exit_on_failure`] renders the failure and exits with the status
//! the severity dictates:
//!
//! | Severity     | Raised by                            | Exit status |
//! |--------------|--------------------------------------|-------------|
//! | `Invariant`  | `enforce*` checks                    | 1           |
//! | `Abort`      | [`fail_at_msg`]                      | 1           |
//! | `Library`    | backend allocation/copy failures     | 1           |
//! | `StrictFail` | advisories in strict mode            | 1           |
//! | `Logic`      | [`fail_msg`]                         | 5           |
//!
//! Warnings and debug messages are advisories: they are written through the
//! context's [`DiagnosticSink`] and never fail, unless strict mode upgrades them.
//!
//! ## Example
//!
//! ```rust
//! use numguard::{enforce_msg, matrix_safe_free, DiagnosticOptions, Diagnostics, Failure};
//!
//! fn scale(diag: &Diagnostics, rows: usize, cols: usize) -> Result<f64, Failure> {
//!     enforce_msg!(rows > 0 && cols > 0, "empty design matrix")?;
//!     let mut x = diag.matrix_safe_alloc(rows, cols)?;
//!     x.fill(0.5);
//!     let total: f64 = x.as_slice().iter().sum();
//!     matrix_safe_free!(diag, Some(x))?;
//!     Ok(total)
//! }
//!
//! let mut options = DiagnosticOptions::new();
//! options.set_strict_mode(true);
//! let diag = Diagnostics::new(options);
//! assert_eq!(scale(&diag, 2, 2).unwrap(), 2.0);
//! assert_eq!(scale(&diag, 0, 2).unwrap_err().exit_code(), 1);
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

#[macro_use]
mod log;

pub mod diagnostics;
pub mod enforce;
pub mod failure;
pub mod linalg;
pub mod options;
pub mod report;
pub mod safe;
pub mod tokenize;
pub mod validate;

pub use diagnostics::Diagnostics;
pub use enforce::round4;
pub use failure::{fail_at_msg, fail_msg, Failure, Severity, SourceSite};
pub use linalg::{DenseBackend, LinalgBackend, LinalgStatus, Matrix, Vector};
pub use options::{DiagnosticOptions, OptionsError};
pub use report::{DiagnosticSink, MemorySink, StdSink, Stream};
pub use tokenize::Tokens;
pub use validate::{KernelValidator, SymmetricPsdValidator};

// Failures travel through `?` on every checked call; keep them small.
const _: () = {
    use core::mem;

    assert!(mem::size_of::<SourceSite>() <= mem::size_of::<usize>() * 6);
    assert!(mem::size_of::<Failure>() <= mem::size_of::<usize>() * 10);
};
