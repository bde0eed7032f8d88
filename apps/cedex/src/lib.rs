//! # cedex
//!
//! Command-line front end of the cedex export engine.
//!
//! The binary owns everything the engine refuses to touch: the clock, the
//! host name, the project GUID, configuration files and logging.

pub mod cli;
pub mod config;
