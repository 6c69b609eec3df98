//! testwrap runner library entry.
//!
//! Wires configuration, package discovery, the subprocess seam and the
//! execution modes into the `testwrap` binary. Integration tests drive
//! [`app::Wrapper`] directly with a fake [`exec::ToolRunner`].

pub mod app;
pub mod cli;
pub mod config;
pub mod discover;
pub mod exec;
pub mod modes;
