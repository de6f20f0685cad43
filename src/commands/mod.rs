//! CLI Commands Module
//!
//! This module contains all CLI subcommand implementations. `doctor` talks to
//! the platform; `config` is local only.

pub mod config;
pub mod doctor;
