use std::hash::Hash;

use generational_arena::Arena;
use indexmap::Equivalent;
use tracing::{debug, instrument, trace};

use crate::domain::error::{TreeError, TreeResult};
use crate::domain::node::{NodeId, NodeRef, TreeNode};

/// Arena-backed storage for named-node trees.
///
/// Nodes are addressed by [`NodeId`] and every tree operation is dispatched
/// *at* a node: the id of a root stands for its whole tree. One arena can hold
/// any number of independent trees; nodes start out standalone and are
/// linked with [`NodeArena::add_child`].
///
/// Walks (path, root, lookup, traversal, emission) run on explicit stacks or
/// parent-pointer loops, so tree depth is not limited by the call stack.
pub struct NodeArena<K, T, P = ()> {
    arena: Arena<TreeNode<K, T, P>>,
}

impl<K, T, P> Default for NodeArena<K, T, P> {
    fn default() -> Self {
        Self {
            arena: Arena::new(),
        }
    }
}

impl<K, T, P> std::fmt::Debug for NodeArena<K, T, P>
where
    K: std::fmt::Debug,
    T: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.arena.iter().map(|(idx, node)| (NodeId::new(idx), node)))
            .finish()
    }
}

impl<K, T, P> NodeArena<K, T, P>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: Arena::with_capacity(capacity),
        }
    }

    /// Number of live nodes across all trees in the arena.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains(id.index())
    }

    /// Creates a standalone node: no parent, no children, no listeners.
    #[instrument(level = "trace", skip(self, name, data))]
    pub fn create_node(&mut self, name: K, data: Option<T>) -> NodeId {
        let id = NodeId::new(self.arena.insert(TreeNode::new(name, data)));
        trace!(%id, "created node");
        id
    }

    /// Creates a node and links it under `parent`.
    pub fn create_child(&mut self, parent: NodeId, name: K, data: Option<T>) -> TreeResult<NodeId> {
        self.ensure(parent)?;
        let child = self.create_node(name, data);
        self.attach(parent, child);
        Ok(child)
    }

    pub fn get(&self, id: NodeId) -> Option<&TreeNode<K, T, P>> {
        self.arena.get(id.index())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut TreeNode<K, T, P>> {
        self.arena.get_mut(id.index())
    }

    /// Read handle for `id`, None when the id is stale.
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_, K, T, P>> {
        self.get(id).map(|node| NodeRef::new(self, id, node))
    }

    pub fn name(&self, id: NodeId) -> Option<&K> {
        self.get(id).map(|n| n.name())
    }

    pub fn data(&self, id: NodeId) -> Option<&T> {
        self.get(id).and_then(|n| n.data.as_ref())
    }

    /// Replaces the payload of `id`, returning the previous one.
    pub fn set_data(&mut self, id: NodeId, data: Option<T>) -> TreeResult<Option<T>> {
        let node = self.get_mut(id).ok_or(TreeError::UnknownNode(id))?;
        Ok(std::mem::replace(&mut node.data, data))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Child ids of `id` in insertion order; empty for stale ids.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.get(id).into_iter().flat_map(|n| n.children())
    }

    pub fn child<Q>(&self, id: NodeId, name: &Q) -> Option<NodeId>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.get(id).and_then(|n| n.child(name))
    }

    /// Ids of every node that currently has no parent.
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.arena
            .iter()
            .filter(|(_, node)| node.parent.is_none())
            .map(|(idx, _)| NodeId::new(idx))
    }

    /// `id` followed by its parent, grandparent, ... up to the root.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_, K, T, P> {
        Ancestors {
            arena: self,
            next: self.contains(id).then_some(id),
        }
    }

    /// Names from the root down to `id`, inclusive.
    #[instrument(level = "trace", skip(self))]
    pub fn path(&self, id: NodeId) -> TreeResult<Vec<K>> {
        let node = self.node(id).ok_or(TreeError::UnknownNode(id))?;
        Ok(node.path())
    }

    /// The parentless ancestor of `id` (possibly `id` itself).
    #[instrument(level = "trace", skip(self))]
    pub fn root(&self, id: NodeId) -> TreeResult<NodeId> {
        self.ancestors(id).last().ok_or(TreeError::UnknownNode(id))
    }

    /// Number of ancestors of `id`; zero for a root.
    pub fn depth(&self, id: NodeId) -> TreeResult<usize> {
        self.ensure(id)?;
        Ok(self.ancestors(id).count() - 1)
    }

    /// Number of levels in the subtree rooted at `id`; one for a leaf.
    #[instrument(level = "debug", skip(self))]
    pub fn height(&self, id: NodeId) -> TreeResult<usize> {
        self.ensure(id)?;
        let mut max_height = 0;
        let mut stack = vec![(id, 1)];

        while let Some((current, level)) = stack.pop() {
            max_height = max_height.max(level);
            stack.extend(self.children(current).map(|child| (child, level + 1)));
        }

        Ok(max_height)
    }

    /// Leaf ids of the subtree rooted at `id`, in pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaves(&self, id: NodeId) -> Vec<NodeId> {
        self.iter(id)
            .filter(|node| node.is_leaf())
            .map(|node| node.id())
            .collect()
    }

    /// Links `child` under `parent` by the child's name.
    ///
    /// A sibling that already uses the name is replaced in place (its slot in
    /// the ordering is kept) and becomes a standalone root. A child that is
    /// attached elsewhere is first detached from its previous parent, so a
    /// node is never reachable from two parents.
    ///
    /// No cycle check is made: linking a node under one of its own
    /// descendants is the caller's mistake and makes upward walks loop.
    #[instrument(level = "debug", skip(self))]
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> TreeResult<()> {
        self.ensure(parent)?;
        self.ensure(child)?;
        self.attach(parent, child);
        Ok(())
    }

    /// Body of `add_child` for ids known to be live.
    pub(crate) fn attach(&mut self, parent: NodeId, child: NodeId) {
        let (name, previous_parent) = match self.get(child) {
            Some(node) => (node.name().clone(), node.parent),
            None => return,
        };
        if previous_parent.is_some_and(|p| p != parent) {
            debug!(%child, "re-parenting: detaching from previous parent");
            self.unlink(child);
        }

        let displaced = match self.get_mut(parent) {
            Some(node) => node.children.insert(name, child),
            None => return,
        };
        if let Some(old) = displaced.filter(|&old| old != child) {
            debug!(%old, %child, "same-named child replaced, old child is now a root");
            if let Some(node) = self.get_mut(old) {
                node.parent = None;
            }
        }

        if let Some(node) = self.get_mut(child) {
            node.parent = Some(parent);
        }
    }

    /// Detaches `id` from its parent; false for roots and stale ids.
    ///
    /// The detached node keeps its subtree and becomes the root of an
    /// independent tree in the same arena.
    pub fn unlink(&mut self, id: NodeId) -> bool {
        let (name, parent) = match self.get(id) {
            Some(node) => match node.parent {
                Some(parent) => (node.name().clone(), parent),
                None => return false,
            },
            None => return false,
        };

        if let Some(parent_node) = self.get_mut(parent) {
            if parent_node.children.get(&name) == Some(&id) {
                parent_node.children.shift_remove(&name);
            }
        }
        if let Some(node) = self.get_mut(id) {
            node.parent = None;
        }
        trace!(%id, %parent, "unlinked");
        true
    }

    /// Path-addressed detach.
    ///
    /// An empty path targets `id` itself (roots cannot remove themselves);
    /// otherwise the path is resolved downwards from `id`. Returns false when
    /// nothing was detached, leaving the tree unchanged.
    #[instrument(level = "debug", skip(self, path))]
    pub fn remove<'q, I, Q>(&mut self, id: NodeId, path: I) -> bool
    where
        I: IntoIterator<Item = &'q Q>,
        Q: ?Sized + Hash + Equivalent<K> + 'q,
    {
        self.detach(id, path).is_some()
    }

    /// Like [`NodeArena::remove`], but returns the detached node.
    pub fn detach<'q, I, Q>(&mut self, id: NodeId, path: I) -> Option<NodeId>
    where
        I: IntoIterator<Item = &'q Q>,
        Q: ?Sized + Hash + Equivalent<K> + 'q,
    {
        let target = self.get_node_by_path(id, path)?;
        self.unlink(target).then_some(target)
    }

    /// Detaches `id` and frees its whole subtree from the arena.
    ///
    /// Returns the number of freed nodes; every id into the subtree is stale
    /// afterwards.
    #[instrument(level = "debug", skip(self))]
    pub fn discard(&mut self, id: NodeId) -> TreeResult<usize> {
        self.ensure(id)?;
        self.unlink(id);
        let doomed: Vec<NodeId> = self.iter(id).map(|node| node.id()).collect();
        for node in &doomed {
            self.arena.remove(node.index());
        }
        debug!(%id, freed = doomed.len(), "discarded subtree");
        Ok(doomed.len())
    }

    /// Resolves `path` downwards from `id`; the empty path yields `id`.
    ///
    /// Never follows parent links.
    pub fn get_node_by_path<'q, I, Q>(&self, id: NodeId, path: I) -> Option<NodeId>
    where
        I: IntoIterator<Item = &'q Q>,
        Q: ?Sized + Hash + Equivalent<K> + 'q,
    {
        let mut current = self.get(id).map(|_| id)?;
        for segment in path {
            current = self.child(current, segment)?;
        }
        Some(current)
    }

    /// First node of the pre-order walk from `id` matching `predicate`.
    #[instrument(level = "trace", skip(self, predicate))]
    pub fn find_node_by_condition<F>(&self, id: NodeId, mut predicate: F) -> Option<NodeId>
    where
        F: FnMut(&NodeRef<'_, K, T, P>) -> bool,
    {
        self.iter(id).find(|node| predicate(node)).map(|node| node.id())
    }

    /// Calls `callback` once per node of the subtree, in pre-order.
    pub fn traverse<F>(&self, id: NodeId, mut callback: F)
    where
        F: FnMut(NodeRef<'_, K, T, P>),
    {
        for node in self.iter(id) {
            callback(node);
        }
    }

    /// Pre-order walk handing out mutable nodes, e.g. to rewrite payloads.
    pub fn traverse_mut<F>(&mut self, id: NodeId, mut callback: F)
    where
        F: FnMut(NodeId, &mut TreeNode<K, T, P>),
    {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.arena.get_mut(current.index()) {
                callback(current, &mut *node);
                // Push children in reverse order for left-to-right traversal
                stack.extend(node.children.values().rev().copied());
            }
        }
    }

    pub fn iter(&self, id: NodeId) -> PreOrderIter<'_, K, T, P> {
        PreOrderIter::new(self, id)
    }

    pub fn iter_postorder(&self, id: NodeId) -> PostOrderIter<'_, K, T, P> {
        PostOrderIter::new(self, id)
    }

    fn ensure(&self, id: NodeId) -> TreeResult<()> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(TreeError::UnknownNode(id))
        }
    }
}

pub struct Ancestors<'a, K, T, P> {
    arena: &'a NodeArena<K, T, P>,
    next: Option<NodeId>,
}

impl<K, T, P> Iterator for Ancestors<'_, K, T, P>
where
    K: Eq + Hash + Clone,
{
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.arena.parent(current);
        Some(current)
    }
}

pub struct PreOrderIter<'a, K, T, P> {
    arena: &'a NodeArena<K, T, P>,
    stack: Vec<NodeId>,
}

impl<'a, K, T, P> PreOrderIter<'a, K, T, P> {
    fn new(arena: &'a NodeArena<K, T, P>, start: NodeId) -> Self {
        Self {
            arena,
            stack: vec![start],
        }
    }
}

impl<'a, K, T, P> Iterator for PreOrderIter<'a, K, T, P>
where
    K: Eq + Hash + Clone,
{
    type Item = NodeRef<'a, K, T, P>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(node) = self.arena.node(current) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.node().children().rev());
                return Some(node);
            }
        }
        None
    }
}

pub struct PostOrderIter<'a, K, T, P> {
    arena: &'a NodeArena<K, T, P>,
    stack: Vec<(NodeId, bool)>,
}

impl<'a, K, T, P> PostOrderIter<'a, K, T, P> {
    fn new(arena: &'a NodeArena<K, T, P>, start: NodeId) -> Self {
        Self {
            arena,
            stack: vec![(start, false)],
        }
    }
}

impl<'a, K, T, P> Iterator for PostOrderIter<'a, K, T, P>
where
    K: Eq + Hash + Clone,
{
    type Item = NodeRef<'a, K, T, P>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.node(current) {
                if visited {
                    return Some(node);
                }
                self.stack.push((current, true));
                self.stack
                    .extend(node.node().children().rev().map(|child| (child, false)));
            }
        }
        None
    }
}
