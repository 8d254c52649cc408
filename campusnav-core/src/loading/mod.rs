//! This module is responsible for loading the campus node tables
//! and building the routing model from them.

mod builder;
mod config;
mod sources;

pub use builder::create_campus_model;
pub use config::{AccessRule, CampusGraphConfig, EdgeSplit};
pub use sources::{GraphSources, NodeTable, PoiTable};
