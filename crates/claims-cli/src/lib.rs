//! Library components of the `claims` command-line tool.

pub mod logging;
pub mod pipeline;
