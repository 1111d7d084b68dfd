//! Navigator module - tree navigation state

mod state;

pub use state::{
    HistoryEntry, NavigatorAction, NavigatorError, NavigatorState, NodeLookup, Notice, Step,
};
