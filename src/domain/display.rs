//! Text rendering of subtrees via `termtree`.

use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;

use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::NodeArena;
use crate::domain::error::{TreeError, TreeResult};
use crate::domain::node::{NodeId, NodeRef};

impl<K, T, P> NodeArena<K, T, P>
where
    K: Eq + Hash + Clone,
{
    /// Renders the subtree at `id`, labelling each node with `label`.
    #[instrument(level = "debug", skip(self, label))]
    pub fn to_tree_with<F>(&self, id: NodeId, mut label: F) -> TreeResult<Tree<String>>
    where
        F: FnMut(&NodeRef<'_, K, T, P>) -> String,
    {
        let mut built: HashMap<NodeId, Tree<String>> = HashMap::new();
        for node in self.iter_postorder(id) {
            let leaves: Vec<_> = node
                .node()
                .children()
                .filter_map(|child| built.remove(&child))
                .collect();
            built.insert(node.id(), Tree::new(label(&node)).with_leaves(leaves));
        }
        built.remove(&id).ok_or(TreeError::UnknownNode(id))
    }

    /// Renders the subtree at `id` as `name` or `name: data` lines.
    pub fn to_tree_string(&self, id: NodeId) -> TreeResult<Tree<String>>
    where
        K: Display,
        T: Display,
    {
        self.to_tree_with(id, |node| match node.data() {
            Some(data) => format!("{}: {}", node.name(), data),
            None => node.name().to_string(),
        })
    }
}
