//! Pedestrian path network of the campus

pub mod accessibility;
pub mod aliases;
pub mod components;
pub mod network;

pub use accessibility::AccessibilityRegistry;
pub use aliases::{AliasTable, normalize_name};
pub use components::{AccessTag, CampusNode, PathEdge};
pub use network::{CampusGraph, IndexedPoint};
