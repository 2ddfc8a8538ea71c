//! Bootstraps Flux instances inside cluster resource manager allocations.
//!
//! The command line tool reads a jobspec, detects the resource manager of
//! the host (or uses the configured one), and submits a job that starts a
//! Flux instance running the jobspec.

pub mod commands;
pub mod config;
pub mod input;
