//! Runs in its own process: the global context can be installed only once.

use numguard::{DiagnosticOptions, Diagnostics};

#[test]
fn test_install_once() {
    let mut options = DiagnosticOptions::new();
    options.set_legacy_mode(true);
    options.set_issue(5);

    let installed = Diagnostics::new(options).install().unwrap();
    assert!(installed.is_legacy_mode());
    assert!(Diagnostics::global().is_issue(5));

    let rejected = Diagnostics::default().install().unwrap_err();
    assert!(!rejected.is_legacy_mode());
    assert!(Diagnostics::global().is_legacy_mode());
}
