//! CLI commands

pub mod cache;
pub mod config;
pub mod tabs;
