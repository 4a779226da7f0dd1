//! Diagnostic mode flags.
//!
//! The flags are plain data: they are set once at startup (command line or a JSON
//! config file) and then handed to a [`Diagnostics`](crate::Diagnostics) context,
//! which every check reads them through.
//!
//! `no_check` and `strict` compose independently. `no_check` skips optional
//! validation work (kernel validation, NaN scans on free); `strict` decides whether
//! an advisory that is still raised is a warning or a failure.

use core::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Process-wide diagnostic configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiagnosticOptions {
    debug: bool,
    no_check: bool,
    strict: bool,
    quiet: bool,
    /// Active issue number; 0 when no issue is targeted.
    issue: u32,
    legacy: bool,
}

impl DiagnosticOptions {
    /// All flags off, no active issue.
    pub const fn new() -> Self {
        Self {
            debug: false,
            no_check: false,
            strict: false,
            quiet: false,
            issue: 0,
            legacy: false,
        }
    }

    /// Parses options from a JSON document. Missing fields keep their defaults.
    ///
    /// # Errors
    /// Returns the parser error for malformed JSON or unknown fields.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reads and parses a JSON options file.
    ///
    /// # Errors
    /// Returns [`OptionsError::Io`] if the file cannot be read and
    /// [`OptionsError::Parse`] if it is not a valid options document.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, OptionsError> {
        let text = fs::read_to_string(path).map_err(OptionsError::Io)?;
        Self::from_json_str(&text).map_err(OptionsError::Parse)
    }

    /// Enables or disables debug output.
    pub fn set_debug_mode(&mut self, setting: bool) {
        self.debug = setting;
    }

    /// Enables or disables no-check mode (skip optional validation).
    pub fn set_no_check_mode(&mut self, setting: bool) {
        self.no_check = setting;
    }

    /// Enables or disables strict mode (advisories become failures).
    pub fn set_strict_mode(&mut self, setting: bool) {
        self.strict = setting;
    }

    /// Enables or disables quiet mode (warnings are suppressed).
    pub fn set_quiet_mode(&mut self, setting: bool) {
        self.quiet = setting;
    }

    /// Sets the active issue number.
    pub fn set_issue(&mut self, issue: u32) {
        self.issue = issue;
    }

    /// Enables or disables legacy mode.
    pub fn set_legacy_mode(&mut self, setting: bool) {
        self.legacy = setting;
    }

    /// Whether debug output is enabled.
    pub const fn is_debug_mode(&self) -> bool {
        self.debug
    }

    /// Whether optional validation is disabled.
    pub const fn is_no_check_mode(&self) -> bool {
        self.no_check
    }

    /// Whether optional validation runs; the negation of [`is_no_check_mode`](Self::is_no_check_mode).
    pub const fn is_check_mode(&self) -> bool {
        !self.no_check
    }

    /// Whether advisories are fatal.
    pub const fn is_strict_mode(&self) -> bool {
        self.strict
    }

    /// Whether warnings are suppressed.
    pub const fn is_quiet_mode(&self) -> bool {
        self.quiet
    }

    /// True only if `issue` is exactly the active issue number.
    pub const fn is_issue(&self, issue: u32) -> bool {
        self.issue == issue
    }

    /// The active issue number.
    pub const fn issue(&self) -> u32 {
        self.issue
    }

    /// Whether legacy mode is enabled.
    pub const fn is_legacy_mode(&self) -> bool {
        self.legacy
    }
}

/// Errors raised while loading [`DiagnosticOptions`] from a file.
#[derive(Debug)]
pub enum OptionsError {
    /// The file could not be read.
    Io(io::Error),
    /// The file is not a valid options document.
    Parse(serde_json::Error),
}

impl fmt::Display for OptionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionsError::Io(err) => write!(f, "cannot read diagnostic options: {err}"),
            OptionsError::Parse(err) => write!(f, "invalid diagnostic options: {err}"),
        }
    }
}

impl std::error::Error for OptionsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OptionsError::Io(err) => Some(err),
            OptionsError::Parse(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let opts = DiagnosticOptions::default();
        assert_eq!(opts, DiagnosticOptions::new());
        assert!(!opts.is_debug_mode());
        assert!(opts.is_check_mode());
        assert!(!opts.is_strict_mode());
        assert!(!opts.is_quiet_mode());
        assert!(!opts.is_legacy_mode());
        assert_eq!(opts.issue(), 0);
    }

    #[test]
    fn test_setters_store_verbatim() {
        let mut opts = DiagnosticOptions::new();
        opts.set_debug_mode(true);
        opts.set_no_check_mode(true);
        opts.set_strict_mode(true);
        opts.set_quiet_mode(true);
        opts.set_legacy_mode(true);
        opts.set_issue(26);

        assert!(opts.is_debug_mode());
        assert!(opts.is_no_check_mode());
        assert!(!opts.is_check_mode());
        assert!(opts.is_strict_mode());
        assert!(opts.is_quiet_mode());
        assert!(opts.is_legacy_mode());
        assert!(opts.is_issue(26));

        opts.set_strict_mode(false);
        assert!(!opts.is_strict_mode());
    }

    #[test]
    fn test_is_issue_exact_match() {
        let mut opts = DiagnosticOptions::new();
        opts.set_issue(188);
        assert!(opts.is_issue(188));
        assert!(!opts.is_issue(187));
        assert!(!opts.is_issue(189));
        assert!(!opts.is_issue(0));
    }

    #[test]
    fn test_json_partial_document() {
        let opts = DiagnosticOptions::from_json_str(r#"{ "strict": true, "issue": 7 }"#).unwrap();
        assert!(opts.is_strict_mode());
        assert!(opts.is_issue(7));
        assert!(!opts.is_debug_mode());
        assert!(opts.is_check_mode());
    }

    #[test]
    fn test_json_rejects_unknown_fields() {
        assert!(DiagnosticOptions::from_json_str(r#"{ "verbose": true }"#).is_err());
    }

    #[test]
    fn test_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "quiet": true, "no_check": true }}"#).unwrap();
        let opts = DiagnosticOptions::from_json_file(file.path()).unwrap();
        assert!(opts.is_quiet_mode());
        assert!(opts.is_no_check_mode());
    }

    #[test]
    fn test_json_file_missing() {
        let err = DiagnosticOptions::from_json_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, OptionsError::Io(_)));
        assert!(err.to_string().starts_with("cannot read diagnostic options"));
    }

    #[test]
    fn test_json_round_trip_field_names() {
        let mut opts = DiagnosticOptions::new();
        opts.set_legacy_mode(true);
        let json = serde_json::to_value(opts).unwrap();
        assert_eq!(json["legacy"], true);
        assert_eq!(json["no_check"], false);
        assert_eq!(json["issue"], 0);
    }
}
