//! CLI subcommand modules.
//!
//! This module contains the implementations for all exceed CLI subcommands.

pub(crate) mod build;
pub(crate) mod describe;
pub(crate) mod figures;
