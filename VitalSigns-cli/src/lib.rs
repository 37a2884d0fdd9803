//! Console front end for patient vital-sign visits

pub mod cli;
pub mod console;
pub mod export;
pub mod logging;

pub use cli::{dispatch, Cli, Command};
