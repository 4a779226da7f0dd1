//! Always-on invariant checks.
//!
//! `enforce!` works like `assert!` but is active in every build profile, and instead
//! of panicking it evaluates to `Result<(), Failure>` so the caller propagates the
//! violation with `?`. The process is terminated only at the application boundary.
//!
//! ```rust
//! use numguard::{enforce, enforce_msg, Failure};
//!
//! fn mean(xs: &[f64]) -> Result<f64, Failure> {
//!     enforce!(!xs.is_empty())?;
//!     let sum: f64 = xs.iter().sum();
//!     enforce_msg!(sum.is_finite(), "sum is not finite")?;
//!     Ok(sum / xs.len() as f64)
//! }
//!
//! assert_eq!(mean(&[1.0, 3.0]).unwrap(), 2.0);
//! assert!(mean(&[]).is_err());
//! ```

use std::path::Path;

use num_traits::{PrimInt, WrappingMul};

use crate::failure::{Failure, SourceSite};
use crate::linalg::{strerror, LinalgBackend, StatusCode};

/// Bare name of the enclosing function, as a `&'static str`.
#[macro_export]
macro_rules! function_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::core::any::type_name::<T>()
        }
        $crate::failure::trim_function_name(type_name_of(f))
    }};
}

/// The [`SourceSite`](crate::SourceSite) of the macro invocation.
#[macro_export]
macro_rules! site {
    () => {
        $crate::SourceSite::new(::core::file!(), ::core::line!(), $crate::function_name!())
    };
}

/// Fails with the expression text when `expr` is false.
#[macro_export]
macro_rules! enforce {
    ($expr:expr $(,)?) => {
        $crate::enforce::ensure($expr, || {
            $crate::Failure::enforce(::core::stringify!($expr), $crate::site!())
        })
    };
}

/// Fails with `msg` when `expr` is false.
#[macro_export]
macro_rules! enforce_msg {
    ($expr:expr, $msg:expr $(,)?) => {
        $crate::enforce::ensure($expr, || {
            $crate::Failure::enforce(::std::string::ToString::to_string(&$msg), $crate::site!())
        })
    };
}

/// Like [`enforce_msg!`] for an owned or borrowed `String` message.
#[macro_export]
macro_rules! enforce_str {
    ($expr:expr, $msg:expr $(,)?) => {
        $crate::enforce_msg!($expr, $msg)
    };
}

/// Fails with the error string of a non-zero status `expr`.
///
/// The one-argument form uses the standard status table; `enforce_linalg!(diag, expr)`
/// asks the context's [`LinalgBackend`](crate::LinalgBackend) for the string.
#[macro_export]
macro_rules! enforce_linalg {
    ($expr:expr $(,)?) => {
        $crate::enforce::ensure_status($expr, || $crate::site!())
    };
    ($diag:expr, $expr:expr $(,)?) => {
        $crate::enforce::ensure_status_with($diag.backend(), $expr, || $crate::site!())
    };
}

/// When `path` is non-empty, fails unless the file exists.
#[macro_export]
macro_rules! enforce_file_exists {
    ($path:expr, $msg:expr $(,)?) => {
        $crate::enforce::ensure_file_exists(
            &$path,
            ::core::stringify!($path),
            &::std::string::ToString::to_string(&$msg),
            || $crate::site!(),
        )
    };
}

/// Multiplies two integers, failing with `multiply integer overflow` if the
/// product does not fit. Evaluates to `Result<T, Failure>` holding the product.
#[macro_export]
macro_rules! check_int_mult_overflow {
    ($m:expr, $n:expr $(,)?) => {
        $crate::enforce::check_int_mult_overflow($m, $n, || $crate::site!())
    };
}

/// Debug-build message, printed only in debug mode.
///
/// Compiles to nothing in release builds.
#[macro_export]
macro_rules! debug_msg {
    ($diag:expr, $($arg:tt)+) => {{
        #[cfg(debug_assertions)]
        $diag.debug_at(&::std::format!($($arg)+), $crate::site!());
    }};
}

/// Warning, suppressed in quiet mode. Debug builds add the source location.
#[macro_export]
macro_rules! warning_msg {
    ($diag:expr, $($arg:tt)+) => {{
        #[cfg(debug_assertions)]
        $diag.warning_at(&::std::format!($($arg)+), ::core::option::Option::Some($crate::site!()));
        #[cfg(not(debug_assertions))]
        $diag.warning_at(&::std::format!($($arg)+), ::core::option::Option::None);
    }};
}

/// Enforces `expr` only while `issue` is the active issue number.
///
/// Always `Ok(())` in release builds.
#[macro_export]
macro_rules! assert_issue {
    ($diag:expr, $issue:expr, $expr:expr $(,)?) => {{
        #[cfg(debug_assertions)]
        let checked = if $diag.is_issue($issue) {
            $crate::enforce_msg!($expr, "FAIL: ISSUE assert")
        } else {
            ::core::result::Result::<(), $crate::Failure>::Ok(())
        };
        #[cfg(not(debug_assertions))]
        let checked = ::core::result::Result::<(), $crate::Failure>::Ok(());
        checked
    }};
}

/// `Ok(())` if `condition` holds, otherwise the lazily built failure.
#[inline]
pub fn ensure(condition: bool, failure: impl FnOnce() -> Failure) -> Result<(), Failure> {
    if condition {
        Ok(())
    } else {
        Err(failure())
    }
}

/// `Ok(())` for a zero status, otherwise an enforce failure with the status description.
#[inline]
pub fn ensure_status(
    status: impl StatusCode,
    site: impl FnOnce() -> SourceSite,
) -> Result<(), Failure> {
    match status.status_code() {
        0 => Ok(()),
        code => Err(Failure::enforce(strerror(code), site())),
    }
}

/// [`ensure_status`] with the message taken from `backend`.
#[inline]
pub fn ensure_status_with(
    backend: &dyn LinalgBackend,
    status: impl StatusCode,
    site: impl FnOnce() -> SourceSite,
) -> Result<(), Failure> {
    match status.status_code() {
        0 => Ok(()),
        code => Err(Failure::enforce(backend.strerror(code), site())),
    }
}

/// Backs [`enforce_file_exists!`]: an empty path passes, otherwise the file must exist.
pub fn ensure_file_exists(
    path: &impl AsRef<Path>,
    expr: &str,
    msg: &str,
    site: impl FnOnce() -> SourceSite,
) -> Result<(), Failure> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() || path.exists() {
        return Ok(());
    }
    Err(Failure::enforce(
        format!("{expr} {}: {msg}", path.display()),
        site(),
    ))
}

/// Wrapping multiply plus the `x / m == n` recovery test.
///
/// # Errors
/// Fails with `multiply integer overflow` when the product does not fit in `T`.
pub fn check_int_mult_overflow<T>(
    m: T,
    n: T,
    site: impl FnOnce() -> SourceSite,
) -> Result<T, Failure>
where
    T: PrimInt + WrappingMul,
{
    let x = m.wrapping_mul(&n);
    if m.is_zero() || x.checked_div(&m) == Some(n) {
        Ok(x)
    } else {
        Err(Failure::enforce("multiply integer overflow", site()))
    }
}

/// Rounds to four decimal places.
#[inline]
pub fn round4(f: f64) -> f64 {
    (f * 10000.0).round() / 10000.0
}
