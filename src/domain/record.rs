//! Tree literals: the plain nested `name`/`data`/`children` interchange format.

use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::arena::NodeArena;
use crate::domain::error::{TreeError, TreeResult};
use crate::domain::node::NodeId;

/// Nested record mirroring a subtree.
///
/// In JSON, an absent `data` is omitted and an absent `children` reads as
/// an empty list:
///
/// ```json
/// { "name": "Root", "data": "Root Data", "children": [ { "name": "Child" } ] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeRecord<K, T> {
    pub name: K,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default)]
    pub children: Vec<TreeRecord<K, T>>,
}

impl<K, T> TreeRecord<K, T> {
    pub fn new(name: K, data: Option<T>) -> Self {
        Self {
            name,
            data,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = TreeRecord<K, T>>) -> Self {
        self.children.extend(children);
        self
    }

    /// Number of records in this literal, itself included.
    pub fn size(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(record) = stack.pop() {
            count += 1;
            stack.extend(record.children.iter());
        }
        count
    }
}

impl<K, T, P> NodeArena<K, T, P>
where
    K: Eq + Hash + Clone,
{
    /// Snapshot of the subtree at `id`, children in insertion order.
    #[instrument(level = "debug", skip(self))]
    pub fn to_record(&self, id: NodeId) -> TreeResult<TreeRecord<K, T>>
    where
        T: Clone,
    {
        // Post-order guarantees every child record exists before its parent's.
        let mut built: HashMap<NodeId, TreeRecord<K, T>> = HashMap::new();
        for node in self.iter_postorder(id) {
            let children = node
                .node()
                .children()
                .filter_map(|child| built.remove(&child))
                .collect();
            built.insert(
                node.id(),
                TreeRecord {
                    name: node.name().clone(),
                    data: node.data().cloned(),
                    children,
                },
            );
        }
        built.remove(&id).ok_or(TreeError::UnknownNode(id))
    }

    /// Builds a fresh tree from `record` and returns its root.
    ///
    /// Children are linked with the same rules as `add_child`, in array
    /// order, so sibling order matches the literal.
    #[instrument(level = "debug", skip(self, record))]
    pub fn from_record(&mut self, record: TreeRecord<K, T>) -> NodeId {
        let TreeRecord {
            name,
            data,
            children,
        } = record;
        let root = self.create_node(name, data);

        let mut stack = vec![(root, children)];
        while let Some((parent, children)) = stack.pop() {
            for child in children {
                let TreeRecord {
                    name,
                    data,
                    children,
                } = child;
                let id = self.create_node(name, data);
                self.attach(parent, id);
                stack.push((id, children));
            }
        }

        root
    }
}
