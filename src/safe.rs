//! Safe allocate/copy/free wrappers around the linear-algebra backend.
//!
//! Each wrapper converts the backend's failure signal into a [`Failure`]:
//! a refused allocation names the requested shape, a non-zero copy status carries
//! the backend's error string. Freeing goes through [`matrix_safe_free!`] /
//! [`vector_safe_free!`], which record the caller's location for the trace log.
//!
//! ```rust
//! use numguard::{matrix_safe_free, Diagnostics, Failure};
//!
//! fn run(diag: &Diagnostics) -> Result<(), Failure> {
//!     let mut a = diag.matrix_safe_alloc(3, 3)?;
//!     a.fill(1.5);
//!     let mut b = diag.matrix_safe_alloc(3, 3)?;
//!     diag.matrix_safe_memcpy(&mut b, &a)?;
//!     matrix_safe_free!(diag, Some(a))?;
//!     matrix_safe_free!(diag, Some(b))?;
//!     Ok(())
//! }
//!
//! run(&Diagnostics::default()).unwrap();
//! ```

use crate::diagnostics::Diagnostics;
use crate::failure::{Failure, SourceSite};
use crate::linalg::{Matrix, Vector};

/// Frees an `Option<Matrix>` through a [`Diagnostics`], recording the call site.
#[macro_export]
macro_rules! matrix_safe_free {
    ($diag:expr, $matrix:expr $(,)?) => {
        $diag.matrix_safe_free_at($matrix, $crate::site!())
    };
}

/// Frees an `Option<Vector>` through a [`Diagnostics`], recording the call site.
#[macro_export]
macro_rules! vector_safe_free {
    ($diag:expr, $vector:expr $(,)?) => {
        $diag.vector_safe_free_at($vector, $crate::site!())
    };
}

impl Diagnostics {
    /// Allocates a `rows x cols` matrix.
    ///
    /// # Errors
    /// Returns a library failure naming the dimensions if the backend refuses; a
    /// zero dimension is reported as such rather than as exhausted memory.
    #[track_caller]
    pub fn matrix_safe_alloc(&self, rows: usize, cols: usize) -> Result<Matrix, Failure> {
        let site = SourceSite::caller("matrix_safe_alloc");
        match self.backend().alloc_matrix(rows, cols) {
            Some(matrix) => {
                trace_event!(trace, rows, cols, file = site.file, line = site.line, "matrix allocated");
                Ok(matrix)
            }
            None if rows == 0 || cols == 0 => Err(Failure::library(
                format!("cannot allocate a {rows}x{cols} matrix: dimensions must be positive integers"),
                site,
            )),
            None => Err(Failure::library(
                format!("not enough memory to allocate a {rows}x{cols} matrix"),
                site,
            )),
        }
    }

    /// Copies `src` into `dest`.
    ///
    /// # Errors
    /// Returns a library failure with the backend's error string on a non-zero status.
    #[track_caller]
    pub fn matrix_safe_memcpy(&self, dest: &mut Matrix, src: &Matrix) -> Result<(), Failure> {
        let site = SourceSite::caller("matrix_safe_memcpy");
        let status = self.backend().copy_matrix(dest, src);
        self.check_status(status, site)
    }

    /// Releases a matrix. Prefer [`matrix_safe_free!`].
    ///
    /// `None` is a no-op, except in strict mode where it takes the strict failure
    /// path. In check mode the matrix is scanned for NaN before release; the
    /// backend releases it whatever the scan finds.
    ///
    /// # Errors
    /// Returns a strict failure for a null free or a NaN-carrying matrix in strict mode.
    pub fn matrix_safe_free_at(&self, matrix: Option<Matrix>, site: SourceSite) -> Result<(), Failure> {
        let Some(matrix) = matrix else {
            return self.null_free(site, "attempt to free a null matrix");
        };
        let scanned = if self.is_check_mode() && matrix.has_nan() {
            self.warnfail_at_msg(self.is_strict_mode(), site, "matrix contains NaN")
        } else {
            Ok(())
        };
        trace_event!(
            trace,
            rows = matrix.rows(),
            cols = matrix.cols(),
            file = site.file,
            line = site.line,
            function = site.function,
            "matrix freed"
        );
        self.backend().free_matrix(matrix);
        scanned
    }

    /// Allocates a vector of length `len`.
    ///
    /// # Errors
    /// Returns a library failure naming the length if the backend refuses.
    #[track_caller]
    pub fn vector_safe_alloc(&self, len: usize) -> Result<Vector, Failure> {
        let site = SourceSite::caller("vector_safe_alloc");
        match self.backend().alloc_vector(len) {
            Some(vector) => {
                trace_event!(trace, len, file = site.file, line = site.line, "vector allocated");
                Ok(vector)
            }
            None if len == 0 => Err(Failure::library(
                "cannot allocate a vector of length 0: length must be a positive integer",
                site,
            )),
            None => Err(Failure::library(
                format!("not enough memory to allocate a vector of length {len}"),
                site,
            )),
        }
    }

    /// Copies `src` into `dest`.
    ///
    /// # Errors
    /// Returns a library failure with the backend's error string on a non-zero status.
    #[track_caller]
    pub fn vector_safe_memcpy(&self, dest: &mut Vector, src: &Vector) -> Result<(), Failure> {
        let site = SourceSite::caller("vector_safe_memcpy");
        let status = self.backend().copy_vector(dest, src);
        self.check_status(status, site)
    }

    /// Releases a vector. Prefer [`vector_safe_free!`].
    ///
    /// # Errors
    /// Returns a strict failure for a null free or a NaN-carrying vector in strict mode.
    pub fn vector_safe_free_at(&self, vector: Option<Vector>, site: SourceSite) -> Result<(), Failure> {
        let Some(vector) = vector else {
            return self.null_free(site, "attempt to free a null vector");
        };
        let scanned = if self.is_check_mode() && vector.has_nan() {
            self.warnfail_at_msg(self.is_strict_mode(), site, "vector contains NaN")
        } else {
            Ok(())
        };
        trace_event!(
            trace,
            len = vector.len(),
            file = site.file,
            line = site.line,
            function = site.function,
            "vector freed"
        );
        self.backend().free_vector(vector);
        scanned
    }

    fn null_free(&self, site: SourceSite, msg: &str) -> Result<(), Failure> {
        if self.is_strict_mode() {
            self.warnfail_at_msg(true, site, msg)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failure::Severity;
    use crate::linalg::{DenseBackend, LinalgBackend, LinalgStatus};
    use crate::options::DiagnosticOptions;
    use crate::report::{MemorySink, Stream};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Dense backend that counts releases.
    #[derive(Default)]
    struct CountingBackend {
        freed: AtomicUsize,
    }

    impl CountingBackend {
        fn freed(&self) -> usize {
            self.freed.load(Ordering::SeqCst)
        }
    }

    impl LinalgBackend for CountingBackend {
        fn alloc_matrix(&self, rows: usize, cols: usize) -> Option<Matrix> {
            DenseBackend::new().alloc_matrix(rows, cols)
        }

        fn alloc_vector(&self, len: usize) -> Option<Vector> {
            DenseBackend::new().alloc_vector(len)
        }

        fn copy_matrix(&self, dest: &mut Matrix, src: &Matrix) -> LinalgStatus {
            DenseBackend::new().copy_matrix(dest, src)
        }

        fn copy_vector(&self, dest: &mut Vector, src: &Vector) -> LinalgStatus {
            DenseBackend::new().copy_vector(dest, src)
        }

        fn free_matrix(&self, matrix: Matrix) {
            self.freed.fetch_add(1, Ordering::SeqCst);
            drop(matrix);
        }

        fn free_vector(&self, vector: Vector) {
            self.freed.fetch_add(1, Ordering::SeqCst);
            drop(vector);
        }
    }

    fn context(options: DiagnosticOptions) -> (Diagnostics, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        (Diagnostics::new(options).with_sink(sink.clone()), sink)
    }

    fn strict() -> DiagnosticOptions {
        let mut options = DiagnosticOptions::new();
        options.set_strict_mode(true);
        options
    }

    #[test]
    fn test_alloc_failure_names_dimensions() {
        let diag = Diagnostics::default().with_backend(Arc::new(DenseBackend::with_element_limit(4)));
        let failure = diag.matrix_safe_alloc(3, 3).unwrap_err();
        assert_eq!(failure.severity(), Severity::Library);
        assert_eq!(failure.exit_code(), 1);
        assert_eq!(failure.message(), "not enough memory to allocate a 3x3 matrix");
        assert!(failure.site().file.ends_with("safe.rs"));

        let failure = diag.vector_safe_alloc(5).unwrap_err();
        assert_eq!(failure.message(), "not enough memory to allocate a vector of length 5");
    }

    #[test]
    fn test_memcpy_shape_mismatch() {
        let diag = Diagnostics::default();
        let src = diag.matrix_safe_alloc(2, 2).unwrap();
        let mut dest = diag.matrix_safe_alloc(2, 3).unwrap();
        let failure = diag.matrix_safe_memcpy(&mut dest, &src).unwrap_err();
        assert_eq!(failure.message(), "matrix/vector sizes are not conformant");
        assert_eq!(failure.site().function, "matrix_safe_memcpy");
    }

    #[test]
    fn test_null_free_silent_unless_strict() {
        let (diag, sink) = context(DiagnosticOptions::new());
        assert!(matrix_safe_free!(diag, None).is_ok());
        assert!(vector_safe_free!(diag, None).is_ok());
        assert!(sink.is_empty());

        let (diag, _sink) = context(strict());
        let failure = matrix_safe_free!(diag, None).unwrap_err();
        assert_eq!(failure.severity(), Severity::StrictFail);
        assert_eq!(failure.message(), "attempt to free a null matrix");
        assert_eq!(failure.site().function, "test_null_free_silent_unless_strict");
        assert!(vector_safe_free!(diag, None).is_err());
    }

    #[test]
    fn test_nan_on_free_warns_in_check_mode() {
        let (diag, sink) = context(DiagnosticOptions::new());
        let mut m = diag.matrix_safe_alloc(2, 2).unwrap();
        *m.get_mut(0, 1).unwrap() = f64::NAN;
        assert!(matrix_safe_free!(diag, Some(m)).is_ok());
        let lines = sink.lines_on(Stream::Stderr);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("**** WARNING: matrix contains NaN in "));
    }

    #[test]
    fn test_nan_on_free_fatal_when_strict() {
        let (diag, _sink) = context(strict());
        let mut v = diag.vector_safe_alloc(3).unwrap();
        *v.get_mut(2).unwrap() = f64::NAN;
        let failure = vector_safe_free!(diag, Some(v)).unwrap_err();
        assert_eq!(failure.message(), "vector contains NaN");
    }

    #[test]
    fn test_no_check_skips_nan_scan_even_when_strict() {
        let mut options = strict();
        options.set_no_check_mode(true);
        let (diag, sink) = context(options);
        let mut m = diag.matrix_safe_alloc(1, 1).unwrap();
        *m.get_mut(0, 0).unwrap() = f64::NAN;
        assert!(matrix_safe_free!(diag, Some(m)).is_ok());
        assert!(sink.is_empty());
        // Strict still governs the null-free advisory.
        assert!(matrix_safe_free!(diag, None).is_err());
    }

    #[test]
    fn test_strict_nan_free_still_releases_through_backend() {
        let backend = Arc::new(CountingBackend::default());
        let (diag, _sink) = context(strict());
        let diag = diag.with_backend(backend.clone());

        let mut m = diag.matrix_safe_alloc(2, 2).unwrap();
        *m.get_mut(0, 0).unwrap() = f64::NAN;
        let failure = matrix_safe_free!(diag, Some(m)).unwrap_err();
        assert_eq!(failure.severity(), Severity::StrictFail);
        assert_eq!(failure.message(), "matrix contains NaN");
        assert_eq!(backend.freed(), 1);

        let mut v = diag.vector_safe_alloc(2).unwrap();
        *v.get_mut(1).unwrap() = f64::NAN;
        assert!(vector_safe_free!(diag, Some(v)).is_err());
        assert_eq!(backend.freed(), 2);

        let v = diag.vector_safe_alloc(2).unwrap();
        assert!(vector_safe_free!(diag, Some(v)).is_ok());
        assert_eq!(backend.freed(), 3);
    }

    #[test]
    fn test_zero_sized_alloc_names_the_cause() {
        let diag = Diagnostics::default();
        let failure = diag.matrix_safe_alloc(0, 3).unwrap_err();
        assert_eq!(failure.severity(), Severity::Library);
        assert_eq!(
            failure.message(),
            "cannot allocate a 0x3 matrix: dimensions must be positive integers"
        );
        let failure = diag.vector_safe_alloc(0).unwrap_err();
        assert_eq!(
            failure.message(),
            "cannot allocate a vector of length 0: length must be a positive integer"
        );
    }
}
