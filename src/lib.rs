//! Named-node trees with path-addressed lookup, tree literal conversion and
//! events that bubble from a node up through its ancestors.
//!
//! ```
//! use nodetree::NodeArena;
//!
//! let mut arena: NodeArena<String, u32> = NodeArena::new();
//! let root = arena.create_node("root".into(), None);
//! let dir = arena.create_child(root, "dir1".into(), Some(1)).unwrap();
//! let file = arena.create_child(dir, "file1".into(), Some(2)).unwrap();
//!
//! assert_eq!(arena.path(file).unwrap(), ["root", "dir1", "file1"]);
//! assert_eq!(arena.get_node_by_path(root, ["dir1", "file1"]), Some(file));
//! assert!(arena.remove(root, ["dir1", "file1"]));
//! assert!(arena.get(dir).unwrap().is_leaf());
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;

pub use domain::{
    Event, ListenerResult, NodeArena, NodeId, NodeRef, TreeError, TreeNode, TreeRecord, TreeResult,
};
