//! Backend status codes.
//!
//! The numbering and wording follow the classic GSL errno table so that messages
//! stay recognisable to users of the numerical tools built on top of it.

use core::fmt;

/// Status returned by backend operations. `Success` is the only zero value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
#[allow(missing_docs)]
pub enum LinalgStatus {
    Success = 0,
    Failure = -1,
    Continue = -2,
    Edom = 1,
    Erange = 2,
    Efault = 3,
    Einval = 4,
    Efailed = 5,
    Efactor = 6,
    Esanity = 7,
    Enomem = 8,
    Ebadfunc = 9,
    Erunaway = 10,
    Emaxiter = 11,
    Ezerodiv = 12,
    Ebadtol = 13,
    Etol = 14,
    Eundrflw = 15,
    Eovrflw = 16,
    Eloss = 17,
    Eround = 18,
    Ebadlen = 19,
    Enotsqr = 20,
    Esing = 21,
    Ediverge = 22,
    Eunsup = 23,
    Eunimpl = 24,
    Ecache = 25,
    Etable = 26,
    Enoprog = 27,
    Enoprogj = 28,
    Etolf = 29,
    Etolx = 30,
    Etolg = 31,
    Eof = 32,
}

const ALL: [LinalgStatus; 35] = [
    LinalgStatus::Success,
    LinalgStatus::Failure,
    LinalgStatus::Continue,
    LinalgStatus::Edom,
    LinalgStatus::Erange,
    LinalgStatus::Efault,
    LinalgStatus::Einval,
    LinalgStatus::Efailed,
    LinalgStatus::Efactor,
    LinalgStatus::Esanity,
    LinalgStatus::Enomem,
    LinalgStatus::Ebadfunc,
    LinalgStatus::Erunaway,
    LinalgStatus::Emaxiter,
    LinalgStatus::Ezerodiv,
    LinalgStatus::Ebadtol,
    LinalgStatus::Etol,
    LinalgStatus::Eundrflw,
    LinalgStatus::Eovrflw,
    LinalgStatus::Eloss,
    LinalgStatus::Eround,
    LinalgStatus::Ebadlen,
    LinalgStatus::Enotsqr,
    LinalgStatus::Esing,
    LinalgStatus::Ediverge,
    LinalgStatus::Eunsup,
    LinalgStatus::Eunimpl,
    LinalgStatus::Ecache,
    LinalgStatus::Etable,
    LinalgStatus::Enoprog,
    LinalgStatus::Enoprogj,
    LinalgStatus::Etolf,
    LinalgStatus::Etolx,
    LinalgStatus::Etolg,
    LinalgStatus::Eof,
];

impl LinalgStatus {
    /// Numeric code.
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Maps a numeric code back to a status, if it is a known one.
    pub fn from_code(code: i32) -> Option<Self> {
        ALL.iter().copied().find(|status| status.code() == code)
    }

    /// True for [`LinalgStatus::Success`].
    pub const fn is_success(self) -> bool {
        matches!(self, LinalgStatus::Success)
    }

    /// Human-readable description.
    pub const fn description(self) -> &'static str {
        match self {
            LinalgStatus::Success => "success",
            LinalgStatus::Failure => "failure",
            LinalgStatus::Continue => "the iteration has not converged yet",
            LinalgStatus::Edom => "input domain error",
            LinalgStatus::Erange => "output range error",
            LinalgStatus::Efault => "invalid pointer",
            LinalgStatus::Einval => "invalid argument supplied by user",
            LinalgStatus::Efailed => "generic failure",
            LinalgStatus::Efactor => "factorization failed",
            LinalgStatus::Esanity => "sanity check failed - shouldn't happen",
            LinalgStatus::Enomem => "malloc failed",
            LinalgStatus::Ebadfunc => "problem with user-supplied function",
            LinalgStatus::Erunaway => "iterative process is out of control",
            LinalgStatus::Emaxiter => "exceeded max number of iterations",
            LinalgStatus::Ezerodiv => "tried to divide by zero",
            LinalgStatus::Ebadtol => {
                "specified tolerance is invalid or theoretically unattainable"
            }
            LinalgStatus::Etol => "failed to reach the specified tolerance",
            LinalgStatus::Eundrflw => "underflow",
            LinalgStatus::Eovrflw => "overflow",
            LinalgStatus::Eloss => "loss of accuracy",
            LinalgStatus::Eround => "roundoff error",
            LinalgStatus::Ebadlen => "matrix/vector sizes are not conformant",
            LinalgStatus::Enotsqr => "matrix not square",
            LinalgStatus::Esing => "singularity or extremely bad function behavior detected",
            LinalgStatus::Ediverge => "integral or series is divergent",
            LinalgStatus::Eunsup => {
                "the required feature is not supported by this hardware platform"
            }
            LinalgStatus::Eunimpl => "the requested feature is not (yet) implemented",
            LinalgStatus::Ecache => "the cache limit has been exceeded",
            LinalgStatus::Etable => "the table limit has been exceeded",
            LinalgStatus::Enoprog => "iteration is not making progress towards solution",
            LinalgStatus::Enoprogj => "jacobian evaluations are not improving the solution",
            LinalgStatus::Etolf => "cannot reach the specified tolerance in F",
            LinalgStatus::Etolx => "cannot reach the specified tolerance in X",
            LinalgStatus::Etolg => "cannot reach the specified tolerance in gradient",
            LinalgStatus::Eof => "end of file",
        }
    }
}

impl fmt::Display for LinalgStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Translates any status code, known or not, into a message.
pub fn strerror(code: i32) -> &'static str {
    LinalgStatus::from_code(code).map_or("unknown error code", LinalgStatus::description)
}

/// Values that can be interpreted as a backend status code.
pub trait StatusCode {
    /// The numeric status; zero means success.
    fn status_code(&self) -> i32;
}

impl StatusCode for i32 {
    fn status_code(&self) -> i32 {
        *self
    }
}

impl StatusCode for LinalgStatus {
    fn status_code(&self) -> i32 {
        self.code()
    }
}
