//! Thin wrappers over `tracing` so every crate logs through the same targets.
//!
//! The cli formatter keys its symbols off these targets: `success!` lines get
//! the `[+]` marker, plain `info!` lines get `[~]`.

pub const SUCCESS_TARGET: &str = "oucount::success";
pub const PRINT_TARGET: &str = "oucount::print";

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::__tracing::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::__tracing::info!(target: $crate::log::SUCCESS_TARGET, $($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::__tracing::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::__tracing::error!($($arg)*)
    };
}
