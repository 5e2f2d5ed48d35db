//! FILENAME: core/group-engine/src/tree.rs
//! Group Tree - Multi-level grouping of flat records.
//!
//! Every record walks the group-by columns from outermost to innermost. At
//! each level it joins the child group carrying its value for that column,
//! creating the group on first sight, and finally becomes a leaf of the
//! innermost group reached.
//!
//! Sibling groups appear in the order their key was first seen. Each builder
//! node keeps a hash index from key to child position, so lookup is a probe
//! while iteration stays in insertion order.

use engine::{GroupValue, Record};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::definition::{GroupByField, GroupOrdering, SortOrder};

// ============================================================================
// TREE STRUCTURES
// ============================================================================

/// A node of the group tree. The synthetic root is not represented; the
/// tree is the ordered list of its children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GroupNode {
    /// All records below share `key` at this node's level.
    Group {
        key: GroupValue,
        children: Vec<GroupNode>,
    },
    /// A single record.
    Leaf { record: Record },
}

impl GroupNode {
    pub fn is_group(&self) -> bool {
        matches!(self, GroupNode::Group { .. })
    }

    /// Children of a group; a leaf has none.
    pub fn children(&self) -> &[GroupNode] {
        match self {
            GroupNode::Group { children, .. } => children,
            GroupNode::Leaf { .. } => &[],
        }
    }

    pub fn key(&self) -> Option<&GroupValue> {
        match self {
            GroupNode::Group { key, .. } => Some(key),
            GroupNode::Leaf { .. } => None,
        }
    }

    pub fn record(&self) -> Option<&Record> {
        match self {
            GroupNode::Group { .. } => None,
            GroupNode::Leaf { record } => Some(record),
        }
    }

    /// Number of leaf records at or below this node.
    pub fn leaf_count(&self) -> usize {
        match self {
            GroupNode::Group { children, .. } => children.iter().map(GroupNode::leaf_count).sum(),
            GroupNode::Leaf { .. } => 1,
        }
    }

    /// Appends every leaf record at or below this node, in display order.
    pub fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a Record>) {
        match self {
            GroupNode::Group { children, .. } => {
                for child in children {
                    child.collect_leaves(out);
                }
            }
            GroupNode::Leaf { record } => out.push(record),
        }
    }
}

/// Leaf records of a whole tree, in display order.
pub fn tree_leaves(nodes: &[GroupNode]) -> Vec<&Record> {
    let mut out = Vec::new();
    for node in nodes {
        node.collect_leaves(&mut out);
    }
    out
}

/// Mutable node used while grouping. Converted into `GroupNode`s at the end.
#[derive(Debug)]
struct NodeBuilder {
    key: GroupValue,
    groups: Vec<NodeBuilder>,
    index: FxHashMap<GroupValue, usize>,
    leaves: Vec<Record>,
}

impl NodeBuilder {
    fn new(key: GroupValue) -> Self {
        NodeBuilder {
            key,
            groups: Vec::new(),
            index: FxHashMap::default(),
            leaves: Vec::new(),
        }
    }

    /// Returns the child group for `key`, appending it if unseen.
    fn child_mut(&mut self, key: GroupValue) -> &mut NodeBuilder {
        let position = match self.index.get(&key) {
            Some(&position) => position,
            None => {
                let position = self.groups.len();
                self.index.insert(key.clone(), position);
                self.groups.push(NodeBuilder::new(key));
                position
            }
        };
        &mut self.groups[position]
    }

    fn into_children(self) -> Vec<GroupNode> {
        // A node holds either groups or leaves, never both: every record
        // descends through the full column list before it is attached.
        let mut children: Vec<GroupNode> = self
            .groups
            .into_iter()
            .map(NodeBuilder::into_node)
            .collect();
        children.extend(self.leaves.into_iter().map(|record| GroupNode::Leaf { record }));
        children
    }

    fn into_node(self) -> GroupNode {
        let key = self.key.clone();
        GroupNode::Group {
            key,
            children: self.into_children(),
        }
    }
}

// ============================================================================
// GROUPING
// ============================================================================

/// Builds the group tree of `records` keyed by `group_by_columns` (internal
/// names, outermost first). Returns the children of the implicit root.
///
/// With no columns every record is a top-level leaf. Groups at every level
/// are in first-occurrence order and records keep their input order.
pub fn build_group_tree<S: AsRef<str>>(records: &[Record], group_by_columns: &[S]) -> Vec<GroupNode> {
    let mut root = NodeBuilder::new(GroupValue::Empty);

    for record in records {
        let mut node = &mut root;
        for column in group_by_columns {
            let key = GroupValue::from(record.get(column.as_ref()));
            node = node.child_mut(key);
        }
        node.leaves.push(record.clone());
    }

    root.into_children()
}

/// Sorts sibling groups at every level by key, using the sort order of the
/// field that produced the level. The sort is stable and leaves are never
/// reordered. Levels beyond `orders` keep their current order.
pub fn sort_group_tree(nodes: &mut [GroupNode], orders: &[SortOrder]) {
    let Some((order, deeper)) = orders.split_first() else {
        return;
    };

    nodes.sort_by(|a, b| match (a.key(), b.key()) {
        (Some(ka), Some(kb)) => match order {
            SortOrder::Ascending => ka.compare(kb),
            SortOrder::Descending => kb.compare(ka),
        },
        _ => std::cmp::Ordering::Equal,
    });

    for node in nodes.iter_mut() {
        if let GroupNode::Group { children, .. } = node {
            sort_group_tree(children, deeper);
        }
    }
}

/// Groups records by resolved group-by fields using the configured ordering.
pub fn group_records(
    records: &[Record],
    group_by: &[GroupByField],
    ordering: GroupOrdering,
) -> Vec<GroupNode> {
    let columns: Vec<&str> = group_by.iter().map(|f| f.name.as_str()).collect();
    let mut tree = build_group_tree(records, &columns);

    if ordering == GroupOrdering::Sorted {
        let orders: Vec<SortOrder> = group_by.iter().map(|f| f.sort_order).collect();
        sort_group_tree(&mut tree, &orders);
    }

    tree
}
