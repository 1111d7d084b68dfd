//! Data module - analysis document loading and parsing

mod loader;
mod model;
mod sfen;

pub use loader::{AnalysisDocument, DataLoader, LoaderError};
pub use model::{
    AnalysisTree, DocumentMeta, EvalData, EvalNode, GamePlayers, NodeId, PositionNode, TreeReport,
};
pub use sfen::{Piece, Side, SfenBoard, SfenError, BOARD_SIZE};
