//! Maintenance utilities for the GPS tracker firmware tree.
//!
//! Two independent tools live here: an emoji cleaner for the C sources and a
//! version synchronizer that keeps `VERSION`, `version.h` and the README badge
//! in agreement. Both binaries are thin wrappers around these modules.
pub mod cleaner;
pub mod cli;
pub mod config;
pub mod emoji;
pub mod logging;
pub mod paths;
pub mod staging;
pub mod sync;
pub mod util;
pub mod version;
