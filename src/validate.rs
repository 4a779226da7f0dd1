//! Validation of the kernel matrix `K`.
//!
//! [`validate_K!`](crate::validate_K) forwards the call site to
//! [`Diagnostics::validate_k`], which hands the matrix to the context's
//! [`KernelValidator`]. The validator reports through
//! [`Diagnostics::warnfail_at_msg`], so strict mode decides whether a finding is a
//! warning or a failure.

use crate::diagnostics::Diagnostics;
use crate::failure::{Failure, SourceSite};
use crate::linalg::Matrix;

/// Validates `K` through a [`Diagnostics`], recording the call site.
#[macro_export]
macro_rules! validate_K {
    ($diag:expr, $k:expr $(,)?) => {
        $diag.validate_k($k, $crate::site!())
    };
}

/// Checks a kernel matrix.
pub trait KernelValidator: Send + Sync {
    /// Inspects `k`, reporting findings through `diag`.
    ///
    /// # Errors
    /// Returns a failure for findings that are fatal under the current options.
    fn validate(&self, diag: &Diagnostics, k: &Matrix, site: SourceSite) -> Result<(), Failure>;
}

impl Diagnostics {
    /// Runs the configured kernel validator on `k`. Prefer [`validate_K!`](crate::validate_K).
    ///
    /// # Errors
    /// Propagates the validator's failure.
    pub fn validate_k(&self, k: &Matrix, site: SourceSite) -> Result<(), Failure> {
        trace_event!(debug, rows = k.rows(), cols = k.cols(), function = site.function, "validating K");
        self.validator().validate(self, k, site)
    }
}

/// Symmetry, eigenvalue and positive-definiteness checks, run in check mode only.
///
/// A non-square `K` is always an invariant failure since none of the other
/// checks apply to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymmetricPsdValidator {
    /// Absolute tolerance for `|K[i][j] - K[j][i]|`.
    pub symmetry_tolerance: f64,
    /// Eigenvalues below `-eigen_tolerance` are reported.
    pub eigen_tolerance: f64,
    /// Sweep limit of the Jacobi eigenvalue iteration.
    pub max_sweeps: usize,
}

impl Default for SymmetricPsdValidator {
    fn default() -> Self {
        Self {
            symmetry_tolerance: 1e-5,
            eigen_tolerance: 1e-5,
            max_sweeps: 64,
        }
    }
}

impl KernelValidator for SymmetricPsdValidator {
    fn validate(&self, diag: &Diagnostics, k: &Matrix, site: SourceSite) -> Result<(), Failure> {
        if !k.is_square() {
            return Err(Failure::enforce("K is not square", site));
        }
        if !diag.is_check_mode() {
            return Ok(());
        }
        let strict = diag.is_strict_mode();

        if !is_symmetric(k, self.symmetry_tolerance) {
            diag.warnfail_at_msg(strict, site, "K is not symmetric")?;
        }
        let eigenvalues = symmetric_eigenvalues(k, self.max_sweeps);
        if eigenvalues.iter().any(|&e| e < -self.eigen_tolerance) {
            diag.warnfail_at_msg(strict, site, "K has small or negative eigenvalues")?;
        }
        if !is_positive_definite(k) {
            diag.warnfail_at_msg(strict, site, "K is not positive definite")?;
        }
        Ok(())
    }
}

/// True if `m` is square and equal to its transpose within `tolerance`.
pub fn is_symmetric(m: &Matrix, tolerance: f64) -> bool {
    if !m.is_square() {
        return false;
    }
    let n = m.rows();
    let a = m.as_slice();
    (0..n).all(|i| (i + 1..n).all(|j| (a[i * n + j] - a[j * n + i]).abs() <= tolerance))
}

/// Eigenvalues of the symmetric part `(M + M^T) / 2` by cyclic Jacobi rotation,
/// in ascending order. `m` must be square.
pub fn symmetric_eigenvalues(m: &Matrix, max_sweeps: usize) -> Vec<f64> {
    let n = m.rows();
    let src = m.as_slice();
    let mut a: Vec<f64> = (0..n * n)
        .map(|idx| {
            let (i, j) = (idx / n, idx % n);
            0.5 * (src[i * n + j] + src[j * n + i])
        })
        .collect();

    let scale: f64 = a.iter().map(|x| x * x).sum();
    for _ in 0..max_sweeps {
        let off: f64 = (0..n)
            .flat_map(|i| (0..n).filter(move |&j| j != i).map(move |j| (i, j)))
            .map(|(i, j)| a[i * n + j] * a[i * n + j])
            .sum();
        if off <= f64::EPSILON * f64::EPSILON * scale {
            break;
        }
        for p in 0..n {
            for q in p + 1..n {
                rotate(&mut a, n, p, q);
            }
        }
    }

    let mut eigenvalues: Vec<f64> = (0..n).map(|i| a[i * n + i]).collect();
    eigenvalues.sort_by(f64::total_cmp);
    eigenvalues
}

/// One Jacobi rotation `A <- J^T A J` zeroing `A[p][q]`.
fn rotate(a: &mut [f64], n: usize, p: usize, q: usize) {
    let apq = a[p * n + q];
    if apq == 0.0 {
        return;
    }
    let theta = (a[q * n + q] - a[p * n + p]) / (2.0 * apq);
    let t = if theta.abs() > 1e150 {
        0.5 / theta
    } else {
        theta.signum() / (theta.abs() + theta.mul_add(theta, 1.0).sqrt())
    };
    let c = 1.0 / t.mul_add(t, 1.0).sqrt();
    let s = t * c;

    for k in 0..n {
        let akp = a[k * n + p];
        let akq = a[k * n + q];
        a[k * n + p] = c * akp - s * akq;
        a[k * n + q] = s * akp + c * akq;
    }
    for k in 0..n {
        let apk = a[p * n + k];
        let aqk = a[q * n + k];
        a[p * n + k] = c * apk - s * aqk;
        a[q * n + k] = s * apk + c * aqk;
    }
}

/// True if a Cholesky factorisation of the lower triangle of `m` succeeds.
pub fn is_positive_definite(m: &Matrix) -> bool {
    if !m.is_square() {
        return false;
    }
    let n = m.rows();
    let a = m.as_slice();
    let mut l = vec![0.0_f64; n * n];
    for j in 0..n {
        let diag = a[j * n + j] - (0..j).map(|k| l[j * n + k] * l[j * n + k]).sum::<f64>();
        if diag.is_nan() || diag <= 0.0 {
            return false;
        }
        let ljj = diag.sqrt();
        l[j * n + j] = ljj;
        for i in j + 1..n {
            let dot: f64 = (0..j).map(|k| l[i * n + k] * l[j * n + k]).sum();
            l[i * n + j] = (a[i * n + j] - dot) / ljj;
        }
    }
    true
}
