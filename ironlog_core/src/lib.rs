#![forbid(unsafe_code)]

//! Core domain model and business logic for the Ironlog workout tracker.
//!
//! This crate provides:
//! - Domain types (sets, exercises, workouts, templates, feed posts)
//! - The live-session state machine with its timers
//! - Derived metrics (volume, PRs, level, weekly streak)
//! - The workout finalizer
//! - Persistence (JSONL history, PR table, templates, profile)

pub mod types;
pub mod error;
pub mod clock;
pub mod timer;
pub mod metrics;
pub mod format;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod session;
pub mod finalize;
pub mod store;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Rejection, Result};
pub use types::*;
pub use clock::{Clock, ManualClock, SystemClock};
pub use catalog::{build_default_catalog, get_default_catalog};
pub use config::{Config, PlanSetPolicy};
pub use session::{Session, SessionEvent, SessionState, DEFAULT_REST_SECONDS};
pub use finalize::{finish_workout, FinishOutcome};
pub use store::{FileStore, MemoryStore, Store};
pub use export::export_history_csv;
