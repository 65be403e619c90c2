//! Command implementations for the markguard CLI
//!
//! Each command lives in its own module and returns the process exit status.

pub mod check;
pub mod config;
pub mod install;
pub mod run;
pub mod version;
