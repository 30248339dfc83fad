//! `rollbook` - A single-user student record manager
//!
//! This library provides a bounded in-memory store of student records keyed
//! by roll number, a flat binary codec that persists the whole store to a
//! local file, and the interactive shell that drives both.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod logging;
pub mod record;
pub mod shell;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use record::{Marks, RecordUpdate, StudentRecord};
pub use shell::Shell;
pub use store::RecordStore;
