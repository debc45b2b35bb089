//! verguard - run a command only when a newer npm package version is published
//!
//! This library provides the core functionality for version-gated runs:
//! - Local version discovery (node_modules, package-lock.json, package.json)
//! - npm registry dist-tag lookups
//! - The version gate deciding between skipping and running a delegated action

pub mod action;
pub mod check;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod gate;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod progress;
pub mod registry;
pub mod version;
