//! Internal logging shim over `tracing`.
//!
//! With the `tracing` feature disabled every event compiles away.

macro_rules! trace_event {
    ($level:ident, $($arg:tt)+) => {{
        #[cfg(feature = "tracing")]
        ::tracing::$level!($($arg)+);
    }};
}
