//! Core domain models for verguard
//!
//! This module contains the fundamental types used throughout the application:
//! - Application identifiers
//! - Version-currency results
//! - Gate decisions and outcomes

mod app_id;
mod outcome;
mod status;

pub use app_id::AppId;
pub use outcome::{GateDecision, GateOutcome};
pub use status::{LocalSource, VersionStatus};
