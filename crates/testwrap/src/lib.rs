//! Top-level facade crate for testwrap.
//!
//! Re-exports the core primitives and the runner library so users can depend on a single crate.

pub mod core {
    pub use testwrap_core::*;
}

pub mod runner {
    pub use testwrap_runner::*;
}
