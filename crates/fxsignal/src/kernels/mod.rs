//! Computation kernels shared across indicators.
//!
//! - [`scan`]: affine-map prefix scan reformulating the EMA recursion, with a
//!   chunked parallel evaluator behind the `parallel` feature.

pub mod scan;

#[cfg(feature = "parallel")]
pub use scan::ema_parallel;
pub use scan::{ema_scan, prefix_compose, Affine};
