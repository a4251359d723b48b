//! Static network data: where it comes from and how it is parsed.
//!
//! Each network kind is described by two CSV files, a node list
//! (`key,lon,lat[,name,country]`) and an edge list (`from,to[,passage]`).
//! A copy of both networks is compiled into the library; a data directory can
//! override it.

use std::env;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::network::NetworkKind;

/// Environment variable naming a directory with network CSV files.
pub const ENV_DATA_DIR: &str = "SEAROUTE_DATA_DIR";

const BUNDLED_MARNET_NODES: &str = include_str!("../data/marnet_nodes.csv");
const BUNDLED_MARNET_EDGES: &str = include_str!("../data/marnet_edges.csv");
const BUNDLED_PORTS_NODES: &str = include_str!("../data/ports_nodes.csv");
const BUNDLED_PORTS_EDGES: &str = include_str!("../data/ports_edges.csv");

/// One row of a node file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub key: String,
    pub lon: f64,
    pub lat: f64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// One row of an edge file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub passage: Option<String>,
}

/// Raw records for one network, before the graph is built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkData {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
}

impl NetworkData {
    /// Parse node and edge CSV data.
    pub fn from_readers<N: Read, E: Read>(kind: NetworkKind, nodes: N, edges: E) -> Result<Self> {
        Ok(Self {
            nodes: read_records(kind, kind.nodes_file(), nodes)?,
            edges: read_records(kind, kind.edges_file(), edges)?,
        })
    }

    /// Append a node. Handy for building small networks in code.
    pub fn node(mut self, key: &str, lon: f64, lat: f64) -> Self {
        self.nodes.push(NodeRecord {
            key: key.to_string(),
            lon,
            lat,
            name: None,
            country: None,
        });
        self
    }

    /// Append a named port node.
    pub fn port(mut self, key: &str, lon: f64, lat: f64, name: &str, country: &str) -> Self {
        self.nodes.push(NodeRecord {
            key: key.to_string(),
            lon,
            lat,
            name: Some(name.to_string()),
            country: Some(country.to_string()),
        });
        self
    }

    /// Append an edge, optionally tagged with a passage identifier.
    pub fn edge(mut self, from: &str, to: &str, passage: Option<&str>) -> Self {
        self.edges.push(EdgeRecord {
            from: from.to_string(),
            to: to.to_string(),
            passage: passage.map(str::to_string),
        });
        self
    }
}

fn read_records<T, R>(kind: NetworkKind, file: &str, reader: R) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut csv_reader = ReaderBuilder::new().trim(Trim::Fields).from_reader(reader);
    csv_reader
        .deserialize()
        .collect::<std::result::Result<Vec<T>, _>>()
        .map_err(|err| Error::NetworkBuild {
            kind,
            message: format!("failed to parse {file}: {err}"),
        })
}

/// Where network data is loaded from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DataSource {
    /// Data compiled into the library.
    #[default]
    Bundled,
    /// A directory containing the network CSV files.
    Directory(PathBuf),
}

impl DataSource {
    /// Resolve the data source.
    ///
    /// The resolution order is:
    /// 1. Explicit `dir` argument when provided.
    /// 2. `SEAROUTE_DATA_DIR` environment variable.
    /// 3. The platform data directory, when it holds network files.
    /// 4. The bundled data.
    pub fn resolve(dir: Option<&Path>) -> Self {
        if let Some(explicit) = dir {
            return DataSource::Directory(explicit.to_path_buf());
        }

        if let Some(env_dir) = env::var_os(ENV_DATA_DIR) {
            return DataSource::Directory(PathBuf::from(env_dir));
        }

        if let Some(platform) = default_data_dir() {
            if platform.join(NetworkKind::Marnet.nodes_file()).is_file() {
                return DataSource::Directory(platform);
            }
        }

        DataSource::Bundled
    }

    /// Read the raw records for `kind`.
    pub fn load(&self, kind: NetworkKind) -> Result<NetworkData> {
        match self {
            DataSource::Bundled => {
                let (nodes, edges) = match kind {
                    NetworkKind::Marnet => (BUNDLED_MARNET_NODES, BUNDLED_MARNET_EDGES),
                    NetworkKind::Ports => (BUNDLED_PORTS_NODES, BUNDLED_PORTS_EDGES),
                };
                NetworkData::from_readers(kind, nodes.as_bytes(), edges.as_bytes())
            }
            DataSource::Directory(dir) => {
                let nodes = open(kind, &dir.join(kind.nodes_file()))?;
                let edges = open(kind, &dir.join(kind.edges_file()))?;
                debug!(%kind, dir = %dir.display(), "loading network data from directory");
                NetworkData::from_readers(kind, nodes, edges)
            }
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Bundled => f.write_str("bundled"),
            DataSource::Directory(dir) => write!(f, "{}", dir.display()),
        }
    }
}

/// Platform-specific data directory (e.g. `~/.local/share/searoute`).
pub fn default_data_dir() -> Option<PathBuf> {
    ProjectDirs::from("org", "searoute", "searoute").map(|dirs| dirs.data_dir().to_path_buf())
}

fn open(kind: NetworkKind, path: &Path) -> Result<fs::File> {
    fs::File::open(path).map_err(|err| Error::NetworkBuild {
        kind,
        message: format!("cannot read {}: {err}", path.display()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(kind: NetworkKind, nodes: &str, edges: &str) -> Result<NetworkData> {
        NetworkData::from_readers(kind, nodes.as_bytes(), edges.as_bytes())
    }

    #[test]
    fn bundled_data_parses() {
        for kind in NetworkKind::ALL {
            let data = DataSource::Bundled.load(kind).unwrap();
            assert!(!data.nodes.is_empty(), "{kind} nodes");
            assert!(!data.edges.is_empty(), "{kind} edges");
        }
    }

    #[test]
    fn empty_optional_columns_become_none() {
        let nodes = "key,lon,lat,name,country\nA, 1.0 , 2.0 ,Alpha Port,XX\nB,3.0,4.0,,\n";
        let edges = "from,to,passage\nA,B,\nA,B,suez\n";
        let data = parse(NetworkKind::Ports, nodes, edges).unwrap();
        assert_eq!(data.nodes[0].name.as_deref(), Some("Alpha Port"));
        assert_eq!(data.nodes[0].lon, 1.0);
        assert_eq!(data.nodes[1].name, None);
        assert_eq!(data.edges[0].passage, None);
        assert_eq!(data.edges[1].passage.as_deref(), Some("suez"));
    }

    #[test]
    fn node_files_without_port_columns_parse() {
        let nodes = "key,lon,lat\nA,1,2\n";
        let edges = "from,to\n";
        let data = parse(NetworkKind::Marnet, nodes, edges).unwrap();
        assert_eq!(data.nodes.len(), 1);
        assert!(data.edges.is_empty());
    }

    #[test]
    fn malformed_rows_report_file() {
        let nodes = "key,lon,lat\nA,east,2\n";
        let err = parse(NetworkKind::Marnet, nodes, "from,to\n").unwrap_err();
        assert!(err.to_string().contains("marnet_nodes.csv"));
    }

    #[test]
    fn missing_directory_files_fail() {
        let dir = tempfile::tempdir().unwrap();
        let source = DataSource::Directory(dir.path().to_path_buf());
        let err = source.load(NetworkKind::Marnet).unwrap_err();
        assert_eq!(err.kind(), "network_build");
        assert!(err.to_string().contains("marnet"));
    }

    #[test]
    fn explicit_directory_wins() {
        let dir = Path::new("/tmp/searoute-data");
        assert_eq!(
            DataSource::resolve(Some(dir)),
            DataSource::Directory(dir.to_path_buf())
        );
    }
}
