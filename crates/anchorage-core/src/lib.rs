//! Core resource model for anchorage.
//!
//! This crate defines the control-plane resources anchorage provisions
//! (vector indexes, index endpoints, deployments, long-running
//! operations), their strongly typed resource names, and the
//! display-name filter used to look them up.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod filter;
pub mod model;

pub use error::{Error, Result};
pub use filter::DisplayNameFilter;
