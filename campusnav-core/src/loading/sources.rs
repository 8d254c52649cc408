//! Node and edge tables consumed by the graph builder

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::{Coordinate, Error};

/// Nodes with their connecting edges, as found in the network and manual tables
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeTable {
    #[serde(default)]
    pub nodes: BTreeMap<String, Coordinate>,
    #[serde(default)]
    pub edges: Vec<(String, String)>,
}

/// Point-of-interest entrances and the names they are known by
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PoiTable {
    #[serde(default)]
    pub nodes: BTreeMap<String, Coordinate>,
    /// Destination name -> entrance node id
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

/// The three inputs of graph construction
#[derive(Debug, Clone, Default)]
pub struct GraphSources {
    /// Automatically extracted path network
    pub network: NodeTable,
    /// Hand-authored connectors
    pub manual: NodeTable,
    /// Destination entrances
    pub pois: PoiTable,
}

impl GraphSources {
    /// Read the three tables from JSON files
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be opened or does not match the schema
    pub fn from_json_files(network: &Path, manual: &Path, pois: &Path) -> Result<Self, Error> {
        Ok(Self {
            network: read_json(network)?,
            manual: read_json(manual)?,
            pois: read_json(pois)?,
        })
    }
}

fn read_json<T>(path: &Path) -> Result<T, Error>
where
    T: for<'de> Deserialize<'de>,
{
    let file = File::open(path).map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("Failed to open file '{}': {}", path.display(), e),
        )
    })?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| Error::InvalidData(format!("{}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_table_schema() {
        let table: NodeTable = serde_json::from_str(
            r#"{
                "nodes": {"a": {"lat": 40.1, "lng": 22.9}, "b": {"lat": 40.2, "lng": 22.8}},
                "edges": [["a", "b"]]
            }"#,
        )
        .unwrap();
        assert_eq!(table.nodes.len(), 2);
        assert_eq!(table.nodes["a"], Coordinate::new(40.1, 22.9));
        assert_eq!(table.edges, vec![("a".to_string(), "b".to_string())]);
    }

    #[test]
    fn test_poi_table_defaults() {
        let table: PoiTable = serde_json::from_str(r#"{"nodes": {}}"#).unwrap();
        assert!(table.aliases.is_empty());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let missing = Path::new("/nonexistent/campusnav/network.json");
        let err = GraphSources::from_json_files(missing, missing, missing).unwrap_err();
        assert!(matches!(err, Error::IoError(_)));
    }
}
