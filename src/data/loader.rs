//! Analysis File Loader
//! Reads an analysis JSON document into the chart and navigator views.

use crate::data::{AnalysisTree, EvalData, TreeReport};
use serde::Deserialize;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid analysis JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("\"nodes\" must be a list")]
    NodesNotList,
}

/// Both views of one analysis document.
#[derive(Debug, Clone, Default)]
pub struct AnalysisDocument {
    pub path: Option<PathBuf>,
    pub evals: EvalData,
    /// `None` when the file only carries `{index, cp}` pairs.
    pub tree: Option<AnalysisTree>,
    pub report: Option<TreeReport>,
}

impl AnalysisDocument {
    pub fn from_value(value: Value) -> Result<Self, LoaderError> {
        // An absent list is an empty chart; a non-list is a malformed file.
        if value.get("nodes").is_some_and(|nodes| !nodes.is_array()) {
            return Err(LoaderError::NodesNotList);
        }

        let evals = EvalData::deserialize(&value)?;
        let tree = match AnalysisTree::deserialize(&value) {
            Ok(tree) => Some(tree),
            Err(e) => {
                info!(reason = %e, "document is chart-only; navigator disabled");
                None
            }
        };

        let report = tree.as_ref().map(|t| {
            let report = t.validate();
            Self::log_report(&report);
            report
        });

        Ok(Self {
            path: None,
            evals,
            tree,
            report,
        })
    }

    fn log_report(report: &TreeReport) {
        for id in &report.duplicate_ids {
            warn!(%id, "duplicate node id");
        }
        for (parent, child) in &report.dangling_links {
            warn!(%parent, %child, "next_ids references a missing node");
        }
        for (index, ids) in &report.shared_indices {
            warn!(index, nodes = ids.len(), "index shared by several nodes; index lookup picks the first");
        }
    }
}

/// Loads analysis documents from disk.
pub struct DataLoader;

impl DataLoader {
    /// Load a JSON file.
    #[tracing::instrument]
    pub fn load_json(path: &Path) -> Result<AnalysisDocument, LoaderError> {
        let file = File::open(path).map_err(|source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let value: Value = serde_json::from_reader(BufReader::new(file))?;

        let mut doc = AnalysisDocument::from_value(value)?;
        doc.path = Some(path.to_path_buf());

        info!(
            points = doc.evals.nodes.len(),
            tree = doc.tree.is_some(),
            "loaded analysis document"
        );
        Ok(doc)
    }

    /// Parse a JSON string.
    pub fn load_str(json: &str) -> Result<AnalysisDocument, LoaderError> {
        let value: Value = serde_json::from_str(json)?;
        AnalysisDocument::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_only_document_has_no_tree() {
        let doc = DataLoader::load_str(r#"{ "nodes": [ { "index": 0, "cp": 10 } ] }"#).unwrap();
        assert_eq!(doc.evals.nodes.len(), 1);
        assert!(doc.tree.is_none());
        assert!(doc.report.is_none());
    }

    #[test]
    fn full_document_loads_both_views() {
        let json = r#"{ "nodes": [
            { "id": 1, "index": 0, "sfen": "a", "cp": 5000, "move": "", "next_ids": [2], "pv": [] },
            { "id": 2, "index": 1, "sfen": "b", "move": "7g7f", "next_ids": [], "pv": [] }
        ] }"#;
        let doc = DataLoader::load_str(json).unwrap();
        assert_eq!(doc.evals.nodes[0].cp, Some(5000));
        assert_eq!(doc.evals.nodes[1].cp, None);
        assert_eq!(doc.tree.as_ref().unwrap().nodes.len(), 2);
        assert!(doc.report.unwrap().is_clean());
    }

    #[test]
    fn missing_nodes_loads_as_empty_chart() {
        let doc = DataLoader::load_str("{}").unwrap();
        assert!(doc.evals.nodes.is_empty());
        assert!(doc.tree.is_none());

        let doc = DataLoader::load_str(r#"{ "meta": {} }"#).unwrap();
        assert!(doc.evals.nodes.is_empty());
    }

    #[test]
    fn malformed_documents_are_errors() {
        assert!(matches!(
            DataLoader::load_str(r#"{ "nodes": 3 }"#),
            Err(LoaderError::NodesNotList)
        ));
        assert!(matches!(
            DataLoader::load_str("not json"),
            Err(LoaderError::Json(_))
        ));
    }

    #[test]
    fn load_json_reports_missing_file() {
        let path = std::env::temp_dir().join("sfen_viewer_missing_file.json");
        let err = DataLoader::load_json(&path).unwrap_err();
        assert!(matches!(err, LoaderError::Io { .. }));
    }

    #[test]
    fn load_json_reads_file() {
        let path = std::env::temp_dir().join(format!(
            "sfen_viewer_loader_{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{ "nodes": [ { "index": 3, "cp": -20 } ] }"#).unwrap();
        let doc = DataLoader::load_json(&path).unwrap();
        assert_eq!(doc.path.as_deref(), Some(path.as_path()));
        assert_eq!(doc.evals.nodes[0].index, 3);
        std::fs::remove_file(&path).ok();
    }
}
