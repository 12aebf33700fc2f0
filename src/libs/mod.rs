//! Core library modules for the lapse application.
//!
//! - **Timer core**: time entry model and elapsed calculation (`entry`),
//!   state machine (`tracker`), polling driver (`ticker`)
//! - **Store**: the six-operation contract (`store`) and its in-memory
//!   implementation (`memory`)
//! - **Infrastructure**: clock injection, configuration, data storage,
//!   messaging
//! - **Presentation**: formatting and table views

pub mod clock;
pub mod config;
pub mod data_storage;
pub mod entry;
pub mod formatter;
pub mod memory;
pub mod messages;
pub mod store;
pub mod ticker;
pub mod tracker;
pub mod view;
