//! GCode Parser
//!
//! Minimal recognition of the commands the filters rewrite. Everything else
//! on a line is left for the caller to copy through untouched.

pub mod matcher;
pub mod number;

pub use matcher::{MoveKind, MoveMatcher};
pub use number::{match_number, parse_number};
