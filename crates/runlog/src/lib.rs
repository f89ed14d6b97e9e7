//! `runlog` - A personal run-log editor
//!
//! This library provides the run record, the in-memory run log, the entry
//! form and list rendering, and the slot storage the log is persisted in.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod form;
pub mod log;
pub mod logging;
pub mod render;
pub mod run;
pub mod shell;
pub mod storage;

pub use config::Config;
pub use dispatch::{Editor, Outcome};
pub use error::{Error, Result};
pub use form::{FormField, RunForm};
pub use log::RunLog;
pub use logging::init_logging;
pub use render::{render, Action, ControlId, RunTable};
pub use run::Run;
pub use storage::{MemorySlotStore, RunStorage, SlotStore, SqliteSlotStore};
