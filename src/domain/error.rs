//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::node::NodeId;

/// Boxed error returned by a failing event listener.
pub type ListenerError = Box<dyn std::error::Error + Send + Sync>;

/// Domain errors represent operations the tree cannot carry out.
///
/// Lookups that merely miss (`get_node_by_path`, `find_node_by_condition`,
/// `remove`) report absence through `Option`/`bool` instead.
#[derive(Error, Debug)]
pub enum TreeError {
    #[error("unknown node: {0}")]
    UnknownNode(NodeId),

    #[error("listener for event '{event}' failed at {node}: {source}")]
    Listener {
        event: String,
        node: NodeId,
        #[source]
        source: ListenerError,
    },
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;
