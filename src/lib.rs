//! Strata scaffolds project directories by layering templates.
//! Templates may build on parent templates, carry default substitution data,
//! exclude files from copying and expand file names and contents.

/// Template application orchestration
pub mod applier;

/// Command-line interface module for the Strata application
pub mod cli;

/// Parent resolution and cycle protection
pub mod composition;

/// Configuration handling for Strata templates (.strata.yml)
pub mod config;

/// Fixed file names and locations
pub mod constants;

/// Tree copying with name expansion and no-clobber policy
pub mod copier;

/// Default and user supplied substitution data
pub mod data;

/// Error types and handling for the Strata application
pub mod error;

/// Pre and post copy hooks
pub mod hooks;

pub mod logger;

/// Exclude and parse pattern resolution
pub mod pattern;

/// User input and interaction handling
pub mod prompt;

/// Expansion engine for names and contents
pub mod renderer;
