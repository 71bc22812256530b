//! dashvar command-line host
//!
//! Loads the template variables of a dashboard file, applies one editor
//! operation and writes the dashboard back.
//!
//! # Quick Start
//!
//! ```text
//! dashvar list dashboard.json
//! dashvar add dashboard.json query
//! dashvar duplicate dashboard.json query0
//! dashvar move dashboard.json --from 0 --to 2
//! dashvar change-type dashboard.yaml env textbox --output out.yaml
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod commands;
pub mod dashboard;

pub use commands::{apply, load_config, CommandError, Operation};
pub use dashboard::{Dashboard, Format};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
