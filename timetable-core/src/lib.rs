//! Timetable Client Core Library
//!
//! Keeps in-memory mirrors of the timetable backend's collections in sync
//! with the REST API, projects them into view models and encodes the
//! timetable for export.

pub mod config;
pub mod controller;
pub mod error;
pub mod export;
pub mod forms;
pub mod gateway;
pub mod navigation;
pub mod notify;
pub mod store;
pub mod types;
pub mod view;

// Re-export core types and error handling
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use types::*;

/// Commonly used items
pub mod prelude {
    pub use crate::{
        config::*, controller::*, export::*, forms::*, gateway::*, navigation::*, notify::*,
        store::*, types::*, view::*,
    };
}
