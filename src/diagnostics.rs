//! The diagnostics context.
//!
//! A [`Diagnostics`] value bundles the mode flags with the collaborators every
//! check needs: where output goes, which linear-algebra backend allocates
//! containers and which validator inspects the kernel matrix. It is built once at
//! startup and passed down; code that cannot thread it may install one process-wide.

use core::fmt;
use std::process;
use std::sync::{Arc, OnceLock};

use crate::failure::{Failure, SourceSite};
use crate::linalg::{DenseBackend, LinalgBackend, StatusCode};
use crate::options::DiagnosticOptions;
use crate::report::{DiagnosticSink, StdSink, Stream};
use crate::validate::{KernelValidator, SymmetricPsdValidator};

static GLOBAL: OnceLock<Diagnostics> = OnceLock::new();

/// Mode flags plus output, backend and validator.
pub struct Diagnostics {
    options: DiagnosticOptions,
    sink: Arc<dyn DiagnosticSink>,
    backend: Arc<dyn LinalgBackend>,
    validator: Arc<dyn KernelValidator>,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new(DiagnosticOptions::default())
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Diagnostics {
    /// A context writing to the standard streams with the dense backend and the
    /// symmetric/PSD kernel validator.
    pub fn new(options: DiagnosticOptions) -> Self {
        Self {
            options,
            sink: Arc::new(StdSink),
            backend: Arc::new(DenseBackend::new()),
            validator: Arc::new(SymmetricPsdValidator::default()),
        }
    }

    /// Replaces the output sink.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Replaces the linear-algebra backend.
    #[must_use]
    pub fn with_backend(mut self, backend: Arc<dyn LinalgBackend>) -> Self {
        self.backend = backend;
        self
    }

    /// Replaces the kernel validator.
    #[must_use]
    pub fn with_validator(mut self, validator: Arc<dyn KernelValidator>) -> Self {
        self.validator = validator;
        self
    }

    /// Installs `self` as the process-wide context.
    ///
    /// # Errors
    /// A context can be installed only once; later attempts hand the rejected
    /// context back.
    pub fn install(self) -> Result<&'static Diagnostics, Diagnostics> {
        GLOBAL.set(self)?;
        trace_event!(debug, "process-wide diagnostics installed");
        Ok(Self::global())
    }

    /// The process-wide context; a default one if none was installed.
    pub fn global() -> &'static Diagnostics {
        GLOBAL.get_or_init(Diagnostics::default)
    }

    /// The mode flags.
    pub fn options(&self) -> &DiagnosticOptions {
        &self.options
    }

    /// The linear-algebra backend.
    pub fn backend(&self) -> &dyn LinalgBackend {
        self.backend.as_ref()
    }

    pub(crate) fn validator(&self) -> &dyn KernelValidator {
        self.validator.as_ref()
    }

    /// See [`DiagnosticOptions::is_debug_mode`].
    pub fn is_debug_mode(&self) -> bool {
        self.options.is_debug_mode()
    }

    /// See [`DiagnosticOptions::is_no_check_mode`].
    pub fn is_no_check_mode(&self) -> bool {
        self.options.is_no_check_mode()
    }

    /// See [`DiagnosticOptions::is_check_mode`].
    pub fn is_check_mode(&self) -> bool {
        self.options.is_check_mode()
    }

    /// See [`DiagnosticOptions::is_strict_mode`].
    pub fn is_strict_mode(&self) -> bool {
        self.options.is_strict_mode()
    }

    /// See [`DiagnosticOptions::is_quiet_mode`].
    pub fn is_quiet_mode(&self) -> bool {
        self.options.is_quiet_mode()
    }

    /// See [`DiagnosticOptions::is_issue`].
    pub fn is_issue(&self, issue: u32) -> bool {
        self.options.is_issue(issue)
    }

    /// See [`DiagnosticOptions::is_legacy_mode`].
    pub fn is_legacy_mode(&self) -> bool {
        self.options.is_legacy_mode()
    }

    /// Writes a debug line when debug mode is on.
    ///
    /// Normally reached through [`debug_msg!`](crate::debug_msg), which also
    /// compiles the call away in release builds.
    pub fn debug_at(&self, msg: &str, site: SourceSite) {
        if self.options.is_debug_mode() {
            self.sink
                .write_line(Stream::Stderr, &format!("**** DEBUG: {msg} in {site}"));
        }
    }

    /// Writes a warning unless quiet mode is on. `site` adds the location suffix.
    pub fn warning_at(&self, msg: &str, site: Option<SourceSite>) {
        if self.options.is_quiet_mode() {
            return;
        }
        trace_event!(debug, text = msg, "diagnostic warning");
        let line = match site {
            Some(site) => format!("**** WARNING: {msg} in {site}"),
            None => format!("**** WARNING: {msg}"),
        };
        self.sink.write_line(Stream::Stderr, &line);
    }

    /// Writes a warning attributed to an explicit file and line.
    pub fn warning_at_msg(&self, file: &str, line: u32, msg: &str) {
        if !self.options.is_quiet_mode() {
            trace_event!(debug, file, line, text = msg, "diagnostic warning");
            self.sink.write_line(
                Stream::Stderr,
                &format!("**** WARNING: {msg} in {file} at line {line}"),
            );
        }
    }

    /// The warning-or-fatal policy point.
    ///
    /// With `strict` false the message is written as a warning (unless quiet) and
    /// `Ok` is returned; with `strict` true a [`Severity::StrictFail`](crate::Severity::StrictFail)
    /// failure is returned instead.
    ///
    /// # Errors
    /// Returns the strict failure when `strict` is set.
    pub fn warnfail_at_msg(&self, strict: bool, site: SourceSite, msg: &str) -> Result<(), Failure> {
        if strict {
            return Err(Failure::strict(msg, site));
        }
        self.warning_at(msg, Some(site));
        Ok(())
    }

    /// Turns a backend status into a library failure unless it is zero.
    ///
    /// # Errors
    /// Returns a [`Severity::Library`](crate::Severity::Library) failure carrying
    /// the backend's description of the code.
    pub fn check_status(&self, status: impl StatusCode, site: SourceSite) -> Result<(), Failure> {
        match status.status_code() {
            0 => Ok(()),
            code => Err(Failure::library(self.backend.strerror(code), site)),
        }
    }

    /// Renders a failure on its stream.
    pub fn report_failure(&self, failure: &Failure) {
        let site = failure.site();
        trace_event!(
            debug,
            severity = ?failure.severity(),
            file = site.file,
            line = site.line,
            function = site.function,
            "{}",
            failure.message()
        );
        #[cfg(not(feature = "tracing"))]
        let _ = site;
        self.sink
            .write_line(failure.severity().stream(), &failure.to_string());
    }

    /// Fail-fast boundary: unwraps `result`, or reports the failure and exits the
    /// process with its status code.
    pub fn exit_on_failure<T>(&self, result: Result<T, Failure>) -> T {
        match result {
            Ok(value) => value,
            Err(failure) => {
                self.report_failure(&failure);
                process::exit(failure.exit_code())
            }
        }
    }
}
