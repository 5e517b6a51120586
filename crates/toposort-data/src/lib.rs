//! Loading and saving graph definition files.
//!
//! A graph file (RON, JSON, or TOML) holds a [`schema::GraphFile`]: an
//! optional key path and sort mode, plus entries and/or declared nodes and
//! dependencies.

pub mod loader;
pub mod schema;

use std::path::Path;
use toposort_core::{Graph, SortResult};

pub use loader::{DataLoadError, Format};
pub use schema::GraphFile;

/// Load a graph from a file, choosing the format by extension.
pub fn load_graph(path: &Path) -> Result<Graph, DataLoadError> {
    let file: GraphFile = loader::deserialize_file(path)?;
    into_graph(file, path)
}

/// Parse a graph from text in a known format.
pub fn parse_graph(content: &str, format: Format) -> Result<Graph, DataLoadError> {
    let label = Path::new("<inline>");
    let file: GraphFile = loader::deserialize_str(content, format, label)?;
    into_graph(file, label)
}

/// Find `{name}.ron|toml|json` in `dir` and load it.
pub fn load_named_graph(dir: &Path, name: &str) -> Result<Graph, DataLoadError> {
    let path = loader::require_data_file(dir, name)?;
    load_graph(&path)
}

/// Load a graph file and sort it with the mode it declares (grouped if none).
pub fn sort_file(path: &Path) -> Result<SortResult, DataLoadError> {
    let file: GraphFile = loader::deserialize_file(path)?;
    let mode = file.mode.unwrap_or_default();
    Ok(into_graph(file, path)?.sort(mode))
}

/// Write the declarative form of `graph` to `path`.
pub fn save_graph(path: &Path, graph: &Graph) -> Result<(), DataLoadError> {
    loader::serialize_file(path, &GraphFile::from_graph(graph))
}

fn into_graph(file: GraphFile, path: &Path) -> Result<Graph, DataLoadError> {
    file.into_graph().map_err(|source| DataLoadError::Graph {
        file: path.to_path_buf(),
        source,
    })
}
