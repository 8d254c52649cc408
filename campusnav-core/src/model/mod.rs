//! Data model for campus routing
//!
//! Contains the walking graph, accessibility tags and destination aliases.

pub mod campus;
pub mod campus_model;
mod coordinate;

pub use campus_model::{CampusModel, CampusModelMeta, GraphStats};
pub use coordinate::Coordinate;

pub use campus::{
    AccessTag, AccessibilityRegistry, AliasTable, CampusGraph, CampusNode, PathEdge,
};
