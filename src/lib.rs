//! Extracts album metadata from the entries of a feedly board.
//!
//! - [`feedly`] - API client, stream filters and pagination
//! - [`album`] - per-origin title parsing
//! - [`board`] - board lookup → stream walk → parse
//! - [`config`] - config file and credentials

pub mod album;
pub mod board;
pub mod config;
pub mod feedly;
