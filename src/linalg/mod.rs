//! Dense numeric containers and the library seam they are allocated through.

pub mod backend;
pub mod dense;
pub mod status;

pub use backend::{DenseBackend, LinalgBackend};
pub use dense::{Matrix, Vector};
pub use status::{strerror, LinalgStatus, StatusCode};
