//! Integration tests for the LTE NAS codec
#![allow(missing_docs)]
//!
//! This crate drives `lte-nas` and `lte-common` together through complete
//! EPS procedures, the way an MME or UE would exchange the PDUs.
//!
//! # Components
//!
//! - [`test_fixtures`] - Subscriber profile and message builders
//! - [`test_utils`] - Logging setup, hex helpers and round-trip assertions
//!
//! # Test Categories
//!
//! 1. **Attach** - Attach request/accept/complete with piggybacked ESM
//! 2. **Tracking Area Update** - Periodic and normal TAU exchanges
//! 3. **Bearer Management** - Dedicated bearers, modification and release
//! 4. **Robustness** - Truncated and corrupted PDUs
//! 5. **Configuration** - The YAML-configured codec facade

pub mod test_fixtures;
pub mod test_utils;

#[cfg(test)]
mod attach_flow;
#[cfg(test)]
mod bearer_management;
#[cfg(test)]
mod codec_config;
#[cfg(test)]
mod tracking_area_update;
#[cfg(test)]
mod truncation;

pub use test_fixtures::TestSubscriber;
pub use test_utils::{init_test_logging, TestResult};
