//! Project board with Kanban and Gantt views.
//!
//! The views are driven by two pure computations: [`model::build_timeline`]
//! lays out the Gantt day grid, and [`model::partition_by_status`] splits tasks
//! into board columns. Status moves travel back to the [`model::Project`] store
//! as [`model::StatusChange`] intents.

pub mod app;
pub mod config;
pub mod error;
pub mod io;
pub mod logging;
pub mod model;
pub mod ui;

pub use error::{ParseStatusError, StoreError};
