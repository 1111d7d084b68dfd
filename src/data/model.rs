//! Analysis Document Model
//! Serde types for the evaluation list and the position tree.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Node identifier. Analysis files use integers, hand-written trees often use strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeId {
    Int(i64),
    Text(String),
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Int(n) => write!(f, "{}", n),
            NodeId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for NodeId {
    fn from(n: i64) -> Self {
        NodeId::Int(n)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId::Text(s.to_string())
    }
}

/// One point of the evaluation chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalNode {
    pub index: i64,
    /// Unevaluated nodes carry `null` or omit the field.
    #[serde(default, deserialize_with = "rounded_cp")]
    pub cp: Option<i64>,
}

/// Engines report integers, but hand-edited files sometimes carry `12.5`.
fn rounded_cp<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.map(|v| v.round() as i64))
}

/// Chart input: `{ "nodes": [ { "index", "cp" }, ... ] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvalData {
    #[serde(default)]
    pub nodes: Vec<EvalNode>,
}

/// A single analyzed position in the move tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionNode {
    pub id: NodeId,
    pub index: i64,
    #[serde(default)]
    pub sfen: String,
    #[serde(default)]
    pub cp: Option<f64>,
    #[serde(rename = "move", default)]
    pub move_label: String,
    #[serde(default)]
    pub next_ids: Vec<NodeId>,
    #[serde(default)]
    pub pv: Vec<String>,
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GamePlayers {
    #[serde(default)]
    pub black_player: Option<String>,
    #[serde(default)]
    pub white_player: Option<String>,
}

/// Document-level metadata written by the kifu conversion step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMeta {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub data: GamePlayers,
}

/// Navigator input: a flat node list linked by `next_ids`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisTree {
    #[serde(default)]
    pub meta: Option<DocumentMeta>,
    pub nodes: Vec<PositionNode>,
}

/// Data-integrity findings for a tree. None of these are fatal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeReport {
    pub node_count: usize,
    pub duplicate_ids: Vec<NodeId>,
    /// `(parent, missing child)` pairs.
    pub dangling_links: Vec<(NodeId, NodeId)>,
    /// Indices shared by more than one node, with the ids that share them.
    pub shared_indices: Vec<(i64, Vec<NodeId>)>,
    pub branch_points: usize,
}

impl TreeReport {
    pub fn is_clean(&self) -> bool {
        self.duplicate_ids.is_empty() && self.dangling_links.is_empty()
    }
}

impl AnalysisTree {
    pub fn root(&self) -> Option<&PositionNode> {
        self.nodes.first()
    }

    /// First node whose `index` matches.
    pub fn find_by_index(&self, index: i64) -> Option<&PositionNode> {
        self.nodes.iter().find(|n| n.index == index)
    }

    pub fn find_by_id(&self, id: &NodeId) -> Option<&PositionNode> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn find_by_sfen(&self, sfen: &str) -> Option<&PositionNode> {
        self.nodes.iter().find(|n| n.sfen == sfen)
    }

    /// Check id uniqueness, link resolution and index sharing.
    pub fn validate(&self) -> TreeReport {
        let mut seen: HashSet<&NodeId> = HashSet::new();
        let mut duplicate_ids = Vec::new();
        for node in &self.nodes {
            if !seen.insert(&node.id) {
                duplicate_ids.push(node.id.clone());
            }
        }

        let known = &seen;
        let dangling_links = self
            .nodes
            .iter()
            .flat_map(move |n| {
                n.next_ids
                    .iter()
                    .filter(move |id| !known.contains(id))
                    .map(move |id| (n.id.clone(), id.clone()))
            })
            .collect();

        let mut by_index: HashMap<i64, Vec<NodeId>> = HashMap::new();
        for node in &self.nodes {
            by_index.entry(node.index).or_default().push(node.id.clone());
        }
        let mut shared_indices: Vec<(i64, Vec<NodeId>)> = by_index
            .into_iter()
            .filter(|(_, ids)| ids.len() > 1)
            .collect();
        shared_indices.sort_by_key(|(index, _)| *index);

        TreeReport {
            node_count: self.nodes.len(),
            duplicate_ids,
            dangling_links,
            shared_indices,
            branch_points: self.nodes.iter().filter(|n| n.next_ids.len() > 1).count(),
        }
    }

    /// Nodes along every root-to-leaf path. Cycles are cut at the first revisit.
    pub fn paths(&self) -> Vec<Vec<&PositionNode>> {
        let Some(root) = self.root() else {
            return Vec::new();
        };
        let mut out = Vec::new();
        let mut stack: Vec<Vec<&PositionNode>> = vec![vec![root]];

        while let Some(path) = stack.pop() {
            let Some(last) = path.last() else { continue };
            let children: Vec<&PositionNode> = last
                .next_ids
                .iter()
                .filter_map(|id| self.find_by_id(id))
                .filter(|child| !path.iter().any(|p| p.id == child.id))
                .collect();

            if children.is_empty() {
                out.push(path);
                continue;
            }
            for child in children.into_iter().rev() {
                let mut next = path.clone();
                next.push(child);
                stack.push(next);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn branching_tree() -> AnalysisTree {
        serde_json::from_value(json!({
            "nodes": [
                { "id": 1, "index": 0, "sfen": "s0", "move": "", "next_ids": [2, 3], "pv": [] },
                { "id": 2, "index": 1, "sfen": "s1a", "move": "7g7f", "next_ids": [4], "pv": [] },
                { "id": 3, "index": 1, "sfen": "s1b", "move": "2g2f", "next_ids": [], "pv": [] },
                { "id": 4, "index": 2, "sfen": "s2", "move": "3c3d", "next_ids": [], "pv": [] }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn node_ids_accept_numbers_and_strings() {
        let ids: Vec<NodeId> = serde_json::from_value(json!([7, "b-12"])).unwrap();
        assert_eq!(ids, vec![NodeId::Int(7), NodeId::Text("b-12".into())]);
        assert_eq!(ids[0].to_string(), "7");
        assert_eq!(ids[1].to_string(), "b-12");
    }

    #[test]
    fn eval_data_defaults_to_empty_nodes() {
        let data: EvalData = serde_json::from_value(json!({})).unwrap();
        assert!(data.nodes.is_empty());
    }

    #[test]
    fn eval_node_tolerates_null_cp() {
        let data: EvalData = serde_json::from_value(json!({
            "nodes": [ { "index": 0, "cp": null }, { "index": 1 }, { "index": 2, "cp": -40 } ]
        }))
        .unwrap();
        let cps: Vec<Option<i64>> = data.nodes.iter().map(|n| n.cp).collect();
        assert_eq!(cps, vec![None, None, Some(-40)]);
    }

    #[test]
    fn eval_node_rounds_fractional_cp() {
        let node: EvalNode = serde_json::from_value(json!({ "index": 4, "cp": 12.5 })).unwrap();
        assert_eq!(node.cp, Some(13));
    }

    #[test]
    fn position_node_reads_original_pipeline_shape() {
        let tree: AnalysisTree = serde_json::from_value(json!({
            "meta": { "id": "game.kif", "data": { "black_player": "Sente", "white_player": "Gote" } },
            "nodes": [{
                "id": 100, "move": "7g7f", "index": 0,
                "sfen": "lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL b - 1",
                "cp": 35, "pv": ["a", "b"], "next_ids": [101], "comment": "opening"
            }]
        }))
        .unwrap();
        let node = &tree.nodes[0];
        assert_eq!(node.move_label, "7g7f");
        assert_eq!(node.cp, Some(35.0));
        assert_eq!(node.comment, "opening");
        let meta = tree.meta.unwrap();
        assert_eq!(meta.data.black_player.as_deref(), Some("Sente"));
    }

    #[test]
    fn lookups_resolve_first_match() {
        let tree = branching_tree();
        assert_eq!(tree.find_by_index(1).unwrap().id, NodeId::Int(2));
        assert_eq!(tree.find_by_id(&NodeId::Int(3)).unwrap().sfen, "s1b");
        assert_eq!(tree.find_by_sfen("s2").unwrap().index, 2);
        assert!(tree.find_by_sfen("missing").is_none());
    }

    #[test]
    fn validate_reports_dangling_and_shared_indices() {
        let mut tree = branching_tree();
        tree.nodes[3].next_ids.push(NodeId::Int(99));
        let report = tree.validate();
        assert_eq!(report.node_count, 4);
        assert!(report.duplicate_ids.is_empty());
        assert_eq!(report.dangling_links, vec![(NodeId::Int(4), NodeId::Int(99))]);
        assert_eq!(
            report.shared_indices,
            vec![(1, vec![NodeId::Int(2), NodeId::Int(3)])]
        );
        assert_eq!(report.branch_points, 1);
        assert!(!report.is_clean());
    }

    #[test]
    fn validate_flags_duplicate_ids() {
        let mut tree = branching_tree();
        tree.nodes[2].id = NodeId::Int(2);
        assert_eq!(tree.validate().duplicate_ids, vec![NodeId::Int(2)]);
    }

    #[test]
    fn index_is_unique_along_each_reachable_path() {
        let tree = branching_tree();
        let paths = tree.paths();
        assert_eq!(paths.len(), 2);
        for path in paths {
            let mut seen = HashSet::new();
            for node in path {
                assert!(seen.insert(node.index), "index {} repeated on a path", node.index);
            }
        }
    }
}
