//! Failure taxonomy for the fail-fast paths.
//!
//! Nothing in this crate terminates the process. Every unrecoverable condition is
//! turned into a [`Failure`] that carries its [`Severity`], the message and the
//! [`SourceSite`] it was raised at. The application boundary decides what to do with
//! it, normally through [`Diagnostics::exit_on_failure`](crate::Diagnostics::exit_on_failure).

use core::fmt;
use core::panic::Location;

use crate::report::Stream;

/// Where a diagnostic was raised: file, line and enclosing function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceSite {
    /// Source file, as reported by `file!()` or [`Location::file`].
    pub file: &'static str,
    /// One-based line number.
    pub line: u32,
    /// Bare name of the enclosing function (`"<unknown>"` when not captured).
    pub function: &'static str,
}

impl SourceSite {
    /// Creates a site from explicit parts.
    pub const fn new(file: &'static str, line: u32, function: &'static str) -> Self {
        Self { file, line, function }
    }

    /// Captures the caller's file and line through `#[track_caller]`.
    ///
    /// The function name cannot be recovered from [`Location`], so the caller names it.
    #[track_caller]
    pub fn caller(function: &'static str) -> Self {
        let location = Location::caller();
        Self::new(location.file(), location.line(), function)
    }
}

impl fmt::Display for SourceSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at line {} in {}",
            self.file, self.line, self.function
        )
    }
}

/// Reduces a `type_name` path such as `my_crate::module::func::{{closure}}::f`
/// to the bare function name `func`.
///
/// Used by [`function_name!`](crate::function_name); not meant to be called directly.
#[doc(hidden)]
pub fn trim_function_name(path: &'static str) -> &'static str {
    let mut path = path.strip_suffix("::f").unwrap_or(path);
    while let Some(stripped) = path.strip_suffix("::{{closure}}") {
        path = stripped;
    }
    match path.rfind("::") {
        Some(idx) => &path[idx + 2..],
        None => path,
    }
}

/// Class of an unrecoverable condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// An always-on `enforce` check failed.
    Invariant,
    /// A located abort raised through [`fail_at_msg`].
    Abort,
    /// The linear-algebra backend refused an allocation or reported a non-zero status.
    Library,
    /// A logic or configuration failure raised through [`fail_msg`].
    Logic,
    /// An advisory condition upgraded to fatal by strict mode.
    StrictFail,
}

impl Severity {
    /// Process exit status the boundary handler uses for this severity.
    pub const fn exit_code(self) -> i32 {
        match self {
            Severity::Logic => 5,
            Severity::Invariant | Severity::Abort | Severity::Library | Severity::StrictFail => 1,
        }
    }

    /// Output stream the failure is rendered on.
    ///
    /// Enforce-style failures go to standard output, the rest to standard error.
    pub const fn stream(self) -> Stream {
        match self {
            Severity::Invariant | Severity::Library => Stream::Stdout,
            Severity::Abort | Severity::Logic | Severity::StrictFail => Stream::Stderr,
        }
    }
}

/// An unrecoverable diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    severity: Severity,
    message: String,
    site: SourceSite,
}

impl Failure {
    /// Creates a failure of an explicit severity.
    pub fn new(severity: Severity, message: impl Into<String>, site: SourceSite) -> Self {
        Self {
            severity,
            message: message.into(),
            site,
        }
    }

    /// An `enforce` failure; `message` is the expression text or the caller's message.
    pub fn enforce(message: impl Into<String>, site: SourceSite) -> Self {
        Self::new(Severity::Invariant, message, site)
    }

    /// A backend failure.
    pub fn library(message: impl Into<String>, site: SourceSite) -> Self {
        Self::new(Severity::Library, message, site)
    }

    /// An advisory that strict mode turned fatal.
    pub fn strict(message: impl Into<String>, site: SourceSite) -> Self {
        Self::new(Severity::StrictFail, message, site)
    }

    /// Severity of this failure.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// The message without decoration.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Where the failure was raised.
    pub fn site(&self) -> SourceSite {
        self.site
    }

    /// Shorthand for `self.severity().exit_code()`.
    pub fn exit_code(&self) -> i32 {
        self.severity.exit_code()
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let SourceSite { file, line, function } = self.site;
        match self.severity {
            Severity::Invariant | Severity::Library => write!(
                f,
                "ERROR: Enforce failed for {} in {file} at line {line} in {function}",
                self.message
            ),
            Severity::Abort => write!(f, "{} in {file} at line {line}", self.message),
            Severity::Logic => write!(f, "**** FAILED: {}", self.message),
            Severity::StrictFail => write!(
                f,
                "**** STRICT FAIL: {} in {file} at line {line} in {function}",
                self.message
            ),
        }
    }
}

impl std::error::Error for Failure {}

/// Logic/configuration failure; exits with status 5 at the boundary.
#[track_caller]
pub fn fail_msg(msg: impl Into<String>) -> Failure {
    Failure::new(Severity::Logic, msg, SourceSite::caller("<unknown>"))
}

/// Failure attributed to an explicit source location; exits with status 1.
pub fn fail_at_msg(file: &'static str, line: u32, msg: impl Into<String>) -> Failure {
    Failure::new(Severity::Abort, msg, SourceSite::new(file, line, "<unknown>"))
}
