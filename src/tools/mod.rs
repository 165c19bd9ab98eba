//! MCP tool inputs for fieldwork.
//!
//! This module contains the input types for the MCP tools that expose
//! the appointment fetcher and report submitter.

mod inputs;

pub use inputs::*;
