//! Node handles and per-node storage.

use std::fmt;
use std::hash::Hash;

use generational_arena::Index;
use indexmap::{Equivalent, IndexMap};

use crate::domain::arena::NodeArena;
use crate::domain::event::EventListeners;

/// Handle of a node inside a [`NodeArena`].
///
/// Generational: once a node is discarded its id never resolves again, even
/// if the arena slot gets reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(Index);

impl NodeId {
    pub(crate) fn new(index: Index) -> Self {
        NodeId(index)
    }

    pub(crate) fn index(self) -> Index {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.0.into_raw_parts();
        write!(f, "#{}.{}", slot, generation)
    }
}

/// A named vertex: payload, ordered children, parent link and listeners.
pub struct TreeNode<K, T, P = ()> {
    name: K,
    /// Payload owned by the node
    pub data: Option<T>,
    /// Parent node, None for roots
    pub(crate) parent: Option<NodeId>,
    /// Children by name, in insertion order
    pub(crate) children: IndexMap<K, NodeId>,
    pub(crate) listeners: EventListeners<K, T, P>,
}

impl<K, T, P> TreeNode<K, T, P>
where
    K: Eq + Hash + Clone,
{
    pub(crate) fn new(name: K, data: Option<T>) -> Self {
        Self {
            name,
            data,
            parent: None,
            children: IndexMap::new(),
            listeners: EventListeners::default(),
        }
    }

    pub fn name(&self) -> &K {
        &self.name
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child ids in insertion order.
    pub fn children(&self) -> impl DoubleEndedIterator<Item = NodeId> + '_ {
        self.children.values().copied()
    }

    pub fn child<Q>(&self, name: &Q) -> Option<NodeId>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.children.get(name).copied()
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

impl<K: fmt::Debug, T: fmt::Debug, P> fmt::Debug for TreeNode<K, T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeNode")
            .field("name", &self.name)
            .field("data", &self.data)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("listeners", &self.listeners)
            .finish()
    }
}

/// Borrowed view of one node together with the arena it lives in.
///
/// Handed to search predicates and traversal callbacks so they can look at
/// names, data and relatives without juggling ids.
pub struct NodeRef<'a, K, T, P = ()> {
    arena: &'a NodeArena<K, T, P>,
    id: NodeId,
    node: &'a TreeNode<K, T, P>,
}

impl<K, T, P> Clone for NodeRef<'_, K, T, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, T, P> Copy for NodeRef<'_, K, T, P> {}

impl<'a, K, T, P> NodeRef<'a, K, T, P>
where
    K: Eq + Hash + Clone,
{
    pub(crate) fn new(arena: &'a NodeArena<K, T, P>, id: NodeId, node: &'a TreeNode<K, T, P>) -> Self {
        Self { arena, id, node }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &'a K {
        self.node.name()
    }

    pub fn data(&self) -> Option<&'a T> {
        self.node.data.as_ref()
    }

    pub fn node(&self) -> &'a TreeNode<K, T, P> {
        self.node
    }

    pub fn parent(&self) -> Option<NodeRef<'a, K, T, P>> {
        self.node.parent.and_then(|id| self.arena.node(id))
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a, K, T, P>> + 'a {
        let arena = self.arena;
        let node = self.node;
        node.children().filter_map(move |id| arena.node(id))
    }

    pub fn child<Q>(&self, name: &Q) -> Option<NodeRef<'a, K, T, P>>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.node.child(name).and_then(|id| self.arena.node(id))
    }

    pub fn is_root(&self) -> bool {
        self.node.is_root()
    }

    pub fn is_leaf(&self) -> bool {
        self.node.is_leaf()
    }

    /// Names from the root down to this node, inclusive.
    pub fn path(&self) -> Vec<K> {
        let mut path: Vec<K> = self
            .arena
            .ancestors(self.id)
            .filter_map(|id| self.arena.get(id).map(|n| n.name().clone()))
            .collect();
        path.reverse();
        path
    }
}

impl<K: fmt::Debug, T: fmt::Debug, P> fmt::Debug for NodeRef<'_, K, T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("name", &self.node.name)
            .field("data", &self.node.data)
            .finish()
    }
}
