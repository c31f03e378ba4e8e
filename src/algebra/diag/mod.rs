mod access;
mod convert;
mod core;
mod engine;
mod matrix_math;
mod multiply;
mod setdiagonal;
pub use self::engine::*;

cfg_if::cfg_if! {
    if #[cfg(feature = "serde")] {
        mod json;
        pub use self::json::*;
    }
}
