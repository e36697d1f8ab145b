//! myks-lib: target resolution and rendering for myks
//!
//! This crate provides the pieces behind the `myks` command line:
//! - `target`: turning positional arguments into render targets
//! - `detect`: Smart Mode change detection from a git working tree
//! - `globe`: discovering, rendering and cleaning up environments
//! - `config`: layered configuration from file, environment and flags
//! - `run`: the pipeline connecting them

pub mod config;
pub mod consts;
pub mod detect;
pub mod globe;
pub mod run;
pub mod target;
pub mod util;
