//! Domain layer: the node tree, its events and its interchange format
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod display;
pub mod error;
pub mod event;
pub mod node;
pub mod record;

pub use arena::{Ancestors, NodeArena, PostOrderIter, PreOrderIter};
pub use error::{ListenerError, TreeError, TreeResult};
pub use event::{Event, EventListeners, Listener, ListenerResult};
pub use node::{NodeId, NodeRef, TreeNode};
pub use record::TreeRecord;
