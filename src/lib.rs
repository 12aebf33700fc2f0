//! # Lapse - task time tracking with pause/resume timers
//!
//! A command-line core for tracking time entries against tasks: a
//! pause/resume state machine, an elapsed-time calculator, and a polling
//! driver that keeps displayed times current against a pluggable store.
//!
//! ## Features
//!
//! - **Timer Lifecycle**: Start, pause, resume, stop and reset per-task
//!   time entries
//! - **Live Elapsed Display**: One cancellable tick per running entry,
//!   recomputed from timestamps so repeated ticks never drift
//! - **Store Reconciliation**: Periodic and on-demand refresh of the active
//!   set, guarded against overlapping fetches
//! - **Pluggable Store**: Six asynchronous operations any backend can
//!   implement; an in-memory store ships with the crate
//!
//! ## Usage
//!
//! ```rust,no_run
//! use lapse::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod commands;
pub mod libs;
