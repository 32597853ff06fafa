//! CLI library components for the beneficiary report tool.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod render;
