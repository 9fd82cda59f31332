//! Core types for Hop.
//!
//! This crate contains shared data structures that are used across all Hop crates:
//! - Navigation actions and query-field edits
//! - Configuration types
//! - Error types

mod action;
mod config;
mod error;

pub use action::{available_actions, CaretEdit, NavAction};
pub use config::{
    config_dir, config_path, AppearanceConfig, ExclusionConfig, GrowthConfig, HopConfig,
    QueryFieldConfig, ResultsConfig,
};
pub use error::ConfigError;
