//! Data assembly and view selection for the election results dashboard.
//!
//! The crate loads three independent documents (municipality boundaries,
//! urban-unit boundaries and the results table), keeps the UI selection, and
//! shapes the active dataset into chart and map inputs. Drawing is left to
//! the presentation layer.

pub mod dashboard;
pub mod format;
pub mod loader;
pub mod model;
pub mod prelude;
pub mod telemetry;
pub mod view;

pub use dashboard::{Dashboard, Event, Panel, Screen};
pub use prelude::{DataSource, LoadError, LoadResult, SourceKind};
