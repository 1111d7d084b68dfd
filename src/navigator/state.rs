//! Navigator State
//! Cursor, history stack and PV mode for walking an analysis tree.
//!
//! The state holds no reference to the tree: every derivation and every
//! transition that needs node data takes the tree as an argument, so the
//! same state can be rendered by any front end.

use crate::data::{AnalysisTree, NodeId, PositionNode};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug, PartialEq)]
pub enum NavigatorError {
    #[error("Analysis tree has no nodes")]
    EmptyTree,
}

/// How the active node is resolved from the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeLookup {
    /// First node whose `index` equals the current index. Branches that
    /// share an index resolve to whichever node comes first in the file.
    #[default]
    ByIndex,
    /// The node named by the top history entry.
    ById,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub index: i64,
    pub id: NodeId,
}

/// Non-blocking messages shown next to the controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    MultipleNextMoves { candidates: usize },
    PvModeActive,
}

impl Notice {
    pub fn message(&self) -> String {
        match self {
            Notice::MultipleNextMoves { candidates } => format!(
                "Multiple next moves ({}). Please select from the list below.",
                candidates
            ),
            Notice::PvModeActive => "PV Mode active. Navigating PV path.".to_string(),
        }
    }
}

/// Outcome of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Moved,
    Stayed,
    /// Several continuations exist; the caller must pick one.
    AwaitingChoice,
}

/// Requests emitted by navigator widgets.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigatorAction {
    Previous,
    Next,
    GoTo { index: i64, id: NodeId },
    SetPvMode(bool),
    DismissNotice,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NavigatorState {
    current_index: i64,
    mode_pv: bool,
    history: Vec<HistoryEntry>,
    lookup: NodeLookup,
    awaiting_choice: bool,
    notice: Option<Notice>,
}

impl NavigatorState {
    /// Mount on a tree: cursor and history start at the first node.
    pub fn new(tree: &AnalysisTree, lookup: NodeLookup) -> Result<Self, NavigatorError> {
        let root = tree.root().ok_or(NavigatorError::EmptyTree)?;
        Ok(Self {
            current_index: root.index,
            mode_pv: false,
            history: vec![HistoryEntry {
                index: root.index,
                id: root.id.clone(),
            }],
            lookup,
            awaiting_choice: false,
            notice: None,
        })
    }

    pub fn current_index(&self) -> i64 {
        self.current_index
    }

    pub fn mode_pv(&self) -> bool {
        self.mode_pv
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn lookup(&self) -> NodeLookup {
        self.lookup
    }

    pub fn awaiting_choice(&self) -> bool {
        self.awaiting_choice
    }

    pub fn notice(&self) -> Option<Notice> {
        self.notice
    }

    pub fn current_node<'a>(&self, tree: &'a AnalysisTree) -> Option<&'a PositionNode> {
        match self.lookup {
            NodeLookup::ByIndex => tree.find_by_index(self.current_index),
            NodeLookup::ById => self.history.last().and_then(|e| tree.find_by_id(&e.id)),
        }
    }

    /// Children of the current node in `next_ids` order. Unresolvable ids
    /// stay in the list as `None`.
    pub fn next_options<'a>(&self, tree: &'a AnalysisTree) -> Option<Vec<Option<&'a PositionNode>>> {
        let node = self.current_node(tree)?;
        Some(node.next_ids.iter().map(|id| tree.find_by_id(id)).collect())
    }

    pub fn go_to(&mut self, new_index: i64, node_id: NodeId) {
        debug!(from = self.current_index, to = new_index, id = %node_id, "go to");
        self.current_index = new_index;
        self.history.push(HistoryEntry {
            index: new_index,
            id: node_id,
        });
        self.clear_choice();
    }

    pub fn go_previous(&mut self) -> Step {
        if self.history.len() <= 1 {
            return Step::Stayed;
        }
        self.history.pop();
        if let Some(top) = self.history.last() {
            self.current_index = top.index;
        }
        debug!(to = self.current_index, depth = self.history.len(), "go previous");
        self.clear_choice();
        Step::Moved
    }

    pub fn go_next(&mut self, tree: &AnalysisTree) -> Step {
        let Some(options) = self.next_options(tree) else {
            return Step::Stayed;
        };

        match options.as_slice() {
            [] => Step::Stayed,
            [Some(only)] => {
                let (index, id) = (only.index, only.id.clone());
                self.go_to(index, id);
                Step::Moved
            }
            [None] => {
                warn!(index = self.current_index, "only next_id does not resolve");
                Step::Stayed
            }
            many => {
                self.awaiting_choice = true;
                self.notice = Some(Notice::MultipleNextMoves {
                    candidates: many.len(),
                });
                Step::AwaitingChoice
            }
        }
    }

    /// Follow the principal variation one ply: jump to the node whose
    /// SFEN equals `pv[1]`.
    pub fn go_pv(&mut self, tree: &AnalysisTree) -> Step {
        let Some(pv) = self.current_node(tree).map(|n| &n.pv) else {
            return Step::Stayed;
        };
        if pv.len() < 2 {
            return Step::Stayed;
        }

        self.notice = Some(Notice::PvModeActive);
        match tree.find_by_sfen(&pv[1]) {
            Some(next) => {
                let (index, id) = (next.index, next.id.clone());
                self.go_to(index, id);
                Step::Moved
            }
            None => {
                debug!(sfen = %pv[1], "pv position not in tree");
                Step::Stayed
            }
        }
    }

    pub fn handle_next(&mut self, tree: &AnalysisTree) -> Step {
        if self.mode_pv {
            self.go_pv(tree)
        } else {
            self.go_next(tree)
        }
    }

    pub fn set_mode_pv(&mut self, on: bool) {
        self.mode_pv = on;
        if !on && self.notice == Some(Notice::PvModeActive) {
            self.notice = None;
        }
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn apply(&mut self, action: NavigatorAction, tree: &AnalysisTree) -> Step {
        match action {
            NavigatorAction::Previous => self.go_previous(),
            NavigatorAction::Next => self.handle_next(tree),
            NavigatorAction::GoTo { index, id } => {
                self.go_to(index, id);
                Step::Moved
            }
            NavigatorAction::SetPvMode(on) => {
                self.set_mode_pv(on);
                Step::Stayed
            }
            NavigatorAction::DismissNotice => {
                self.dismiss_notice();
                Step::Stayed
            }
        }
    }

    fn clear_choice(&mut self) {
        self.awaiting_choice = false;
        if matches!(self.notice, Some(Notice::MultipleNextMoves { .. })) {
            self.notice = None;
        }
    }
}
