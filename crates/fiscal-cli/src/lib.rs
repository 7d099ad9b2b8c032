//! Library side of the `fiscal` command line tool.

pub mod config;
pub mod logging;
