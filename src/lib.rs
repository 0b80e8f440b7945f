//! Core library for CNE, the Shadows of Doubt CIT Names Editor.
//! Loads a CIT city file, gathers its editable names into categories, and writes
//! edits back to every place each name is stored.

mod document;
mod error;
mod gui;
pub mod normalize;
mod progress;
mod registry;
mod scan;
mod session;
pub mod statics;
mod value;

pub use document::{CitFormat, LineEnding, LoadedCity};
pub use error::CitError;
pub use gui::run_gui;
pub use progress::{LoadEvent, Reveal};
pub use registry::{BackRef, Category, Registry, RegistryEntry};
pub use scan::{ScanConfig, ScanResult, scan_entities, unique_names};
pub use session::{CityEditor, Session};
pub use value::{CitNumber, CitValue, PathSegment, ValuePath};
