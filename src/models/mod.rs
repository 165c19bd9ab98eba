//! Data models for the Movidesk API and the local appointment view.
//!
//! This module contains the remote ticket projection, the local appointment
//! and worklist types, and the ticket update payload.

mod appointment;
mod ticket;
mod update;

pub use appointment::*;
pub use ticket::*;
pub use update::*;
