// ABOUTME: Library root for scriptgen-release - exposes the pipeline pieces for testing.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod error;
pub mod operator;
pub mod pipeline;
pub mod release_host;
pub mod report;
pub mod share;
pub mod smoke;
pub mod step;
pub mod types;
pub mod workspace;
