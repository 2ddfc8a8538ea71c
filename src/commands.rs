//! Implementation of fluxboot CLI commands.

pub mod bootstrap;
