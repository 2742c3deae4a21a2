pub mod config;
pub mod name;
pub mod plot;
pub mod result;
pub mod util;

/// Benchmark family that carries a thread count in its name
pub const DEFAULT_THREADED_VARIANT: &str = "StdThread";
