//! Shared plumbing for the heatlink command-line tools.

#![forbid(unsafe_code)]

pub mod common;
