//! Order-statistics tree over a recency ordering.
//!
//! Stores nodes in a flat arena and links them by `NodeId`, giving stable
//! handles and O(1) navigation without per-node heap allocation. A pre-order
//! walk (root, then left subtree, then right subtree) visits addresses from
//! most- to least-recently referenced; the root is always the most recent.
//! Every node caches its subtree size, so the pre-order position of a node
//! is a walk up the parent chain instead of a traversal.
//!
//! ## Architecture
//!
//! ```text
//!   arena (Vec<Node>)
//!   ┌────────┬──────────────────────────────────────────────────────┐
//!   │ NodeId │ Node { address, parent, left, right, count }         │
//!   ├────────┼──────────────────────────────────────────────────────┤
//!   │ id_0   │ { 0xA000, parent: Some(id_3), left: None, .. }       │
//!   │ id_1   │ { 0xB000, parent: Some(id_2), left: None, .. }       │
//!   │ id_2   │ { 0xC000, parent: Some(id_3), left: Some(id_1), .. } │
//!   │ id_3   │ { 0xD000, parent: None, left: id_2, right: id_0 }    │
//!   └────────┴──────────────────────────────────────────────────────┘
//!
//!   root ─► [0xD000]            pre-order: D000, C000, B000, A000
//!            /      \           (most recent ─► least recent)
//!       [0xC000]  [0xA000]
//!        /
//!    [0xB000]
//! ```
//!
//! ## Operations
//! - `push_recent(address)`: splice a new node in as the root; the old tree
//!   stays reachable in unchanged pre-order
//! - `rank(id)`: 1-based pre-order position, from cached subtree counts
//! - `promote(id)`: move-to-root preserving the pre-order of all other nodes
//!
//! ## Performance
//! - `push_recent`: O(left-spine length), amortised low
//! - `rank` / `promote`: O(depth)
//! - Nodes are never freed individually; `clear()` drops the whole arena.
//!
//! `debug_validate_invariants()` is available in debug/test builds.

#[cfg(debug_assertions)]
use crate::error::InvariantError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
struct Node {
    address: u64,
    parent: Option<NodeId>,
    left: Option<NodeId>,
    right: Option<NodeId>,
    count: u64,
}

#[derive(Debug, Default)]
/// Arena-backed tree whose pre-order is the recency order of its addresses.
pub struct RecencyTree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl RecencyTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
        }
    }

    /// Creates an empty tree with reserved node capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            root: None,
        }
    }

    /// Returns the number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the most recently referenced node, if any.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Returns the address stored at `id`.
    pub fn address(&self, id: NodeId) -> Option<u64> {
        self.nodes.get(id.0).map(|node| node.address)
    }

    /// Drops every node.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    /// Creates a node for `address` and splices it in as the new root.
    ///
    /// The previous tree remains reachable in unchanged pre-order: the old
    /// root becomes the new node's left child, and the new node's empty
    /// right subtree is filled by stealing down the old root's left spine.
    pub fn push_recent(&mut self, address: u64) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            address,
            parent: None,
            left: None,
            right: None,
            count: 1,
        });
        if let Some(old_root) = self.root {
            self.splice_root(id, old_root);
        }
        self.root = Some(id);
        id
    }

    /// Returns the 1-based pre-order position of `id`.
    ///
    /// Equals the node's current stack distance: one plus the number of
    /// distinct addresses referenced since its last reference.
    pub fn rank(&self, id: NodeId) -> u64 {
        let mut pos: u64 = 1;
        let mut cur = id;
        while let Some(parent) = self.nodes[cur.0].parent {
            if self.nodes[parent.0].right == Some(cur) {
                pos += 1 + self.subtree_count(self.nodes[parent.0].left);
            } else {
                pos += 1;
            }
            cur = parent;
        }
        pos
    }

    /// Moves `id` to the root, preserving the recency pre-order of all
    /// other nodes.
    ///
    /// Iterates until the node reaches the root: a node with at most one
    /// child is unlinked (its child takes its place) and re-enters as the
    /// root; a node with two children rotates up past its parent. Each step
    /// strictly reduces the node's depth and recounts only the affected
    /// nodes.
    pub fn promote(&mut self, id: NodeId) {
        while let Some(parent) = self.nodes[id.0].parent {
            let left = self.nodes[id.0].left;
            let right = self.nodes[id.0].right;
            if left.is_none() || right.is_none() {
                let child = left.or(right);
                if self.nodes[parent.0].left == Some(id) {
                    self.set_left(parent, child);
                } else {
                    self.set_right(parent, child);
                }
                self.recount_to_root(parent);

                let Some(old_root) = self.root else { break };
                let node = &mut self.nodes[id.0];
                node.parent = None;
                node.left = None;
                node.right = None;
                node.count = 1;
                self.splice_root(id, old_root);
            } else {
                self.rotate_up(id, parent);
            }
        }
        self.root = Some(id);
    }

    /// Returns the addresses in pre-order (most- to least-recent).
    pub fn preorder_addresses(&self) -> Vec<u64> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = Vec::new();
        if let Some(root) = self.root {
            stack.push(root);
        }
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.0];
            out.push(node.address);
            if let Some(right) = node.right {
                stack.push(right);
            }
            if let Some(left) = node.left {
                stack.push(left);
            }
        }
        out
    }

    /// Validates the recency and count invariants (debug-only).
    #[cfg(debug_assertions)]
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.nodes.is_empty() {
            return match self.root {
                None => Ok(()),
                Some(id) => Err(InvariantError::new(format!(
                    "empty tree has root {:?}",
                    id
                ))),
            };
        }
        let root = self
            .root
            .ok_or_else(|| InvariantError::new("non-empty tree has no root"))?;
        if self.nodes[root.0].parent.is_some() {
            return Err(InvariantError::new("root has a parent"));
        }

        let mut visited = 0usize;
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            visited += 1;
            let node = &self.nodes[id.0];
            let mut expected = 1;
            for child in [node.left, node.right].into_iter().flatten() {
                if self.nodes[child.0].parent != Some(id) {
                    return Err(InvariantError::new(format!(
                        "node {:?}: child {:?} has parent {:?}",
                        id, child, self.nodes[child.0].parent
                    )));
                }
                expected += self.nodes[child.0].count;
                stack.push(child);
            }
            if node.count != expected {
                return Err(InvariantError::new(format!(
                    "node {:?}: count {} != 1 + children ({})",
                    id,
                    node.count,
                    expected - 1
                )));
            }
        }
        if visited != self.nodes.len() {
            return Err(InvariantError::new(format!(
                "reached {} nodes, arena holds {}",
                visited,
                self.nodes.len()
            )));
        }
        Ok(())
    }

    #[cfg(debug_assertions)]
    pub fn debug_validate_invariants(&self) {
        self.check_invariants().unwrap();
    }

    fn subtree_count(&self, id: Option<NodeId>) -> u64 {
        id.map_or(0, |id| self.nodes[id.0].count)
    }

    fn set_left(&mut self, parent: NodeId, child: Option<NodeId>) {
        self.nodes[parent.0].left = child;
        if let Some(child) = child {
            self.nodes[child.0].parent = Some(parent);
        }
    }

    fn set_right(&mut self, parent: NodeId, child: Option<NodeId>) {
        self.nodes[parent.0].right = child;
        if let Some(child) = child {
            self.nodes[child.0].parent = Some(parent);
        }
    }

    fn recount(&mut self, id: NodeId) {
        let count =
            1 + self.subtree_count(self.nodes[id.0].left) + self.subtree_count(self.nodes[id.0].right);
        self.nodes[id.0].count = count;
    }

    fn recount_to_root(&mut self, from: NodeId) {
        let mut cur = Some(from);
        while let Some(id) = cur {
            self.recount(id);
            cur = self.nodes[id.0].parent;
        }
    }

    /// Attaches the tree rooted at `old_root` under `id`, keeping pre-order.
    ///
    /// `id` must be detached (no parent, no children). The old root becomes
    /// the left child; the right subtree is filled by stealing down the old
    /// root's left spine, each spine node handing its right subtree up and
    /// taking a replacement from its own left child.
    fn splice_root(&mut self, id: NodeId, old_root: NodeId) {
        self.set_left(id, Some(old_root));
        let mut taker = id;
        let mut donor = old_root;
        loop {
            if let Some(right) = self.nodes[donor.0].right {
                self.nodes[donor.0].right = None;
                self.set_right(taker, Some(right));
                match self.nodes[donor.0].left {
                    Some(left) => {
                        taker = donor;
                        donor = left;
                    },
                    None => break,
                }
            } else {
                let left = self.nodes[donor.0].left;
                self.nodes[donor.0].left = None;
                self.set_right(taker, left);
                break;
            }
        }
        // Counts changed only along the walked spine; the deepest donor's
        // parent links lead back to `id`.
        self.recount_to_root(donor);
    }

    /// Swaps `id` with its parent, moving it one level up.
    fn rotate_up(&mut self, id: NodeId, parent: NodeId) {
        let grandparent = self.nodes[parent.0].parent;
        let left = self.nodes[id.0].left;
        let right = self.nodes[id.0].right;

        if self.nodes[parent.0].left == Some(id) {
            let parent_right = self.nodes[parent.0].right;
            self.set_left(id, Some(parent));
            self.set_right(id, parent_right);
            self.set_left(parent, left);
            self.set_right(parent, right);
        } else {
            self.set_left(id, Some(parent));
            self.set_right(parent, left);
        }

        match grandparent {
            None => self.nodes[id.0].parent = None,
            Some(gp) => {
                if self.nodes[gp.0].left == Some(parent) {
                    self.set_left(gp, Some(id));
                } else {
                    self.set_right(gp, Some(id));
                }
            },
        }

        self.recount(parent);
        self.recount(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with(addresses: &[u64]) -> (RecencyTree, Vec<NodeId>) {
        let mut tree = RecencyTree::new();
        let ids = addresses
            .iter()
            .map(|&address| tree.push_recent(address))
            .collect();
        (tree, ids)
    }

    #[test]
    fn push_recent_orders_preorder_most_recent_first() {
        let (tree, _) = tree_with(&[10, 20, 30, 40]);
        assert_eq!(tree.preorder_addresses(), vec![40, 30, 20, 10]);
        tree.debug_validate_invariants();
    }

    #[test]
    fn rank_matches_preorder_position() {
        let (tree, ids) = tree_with(&[10, 20, 30, 40]);
        assert_eq!(tree.rank(ids[3]), 1);
        assert_eq!(tree.rank(ids[2]), 2);
        assert_eq!(tree.rank(ids[1]), 3);
        assert_eq!(tree.rank(ids[0]), 4);
    }

    #[test]
    fn promote_moves_node_to_front_and_keeps_rest_in_order() {
        let (mut tree, ids) = tree_with(&[10, 20, 30, 40]);
        tree.promote(ids[1]);
        assert_eq!(tree.preorder_addresses(), vec![20, 40, 30, 10]);
        assert_eq!(tree.rank(ids[1]), 1);
        tree.debug_validate_invariants();
    }

    #[test]
    fn promote_root_is_a_noop() {
        let (mut tree, ids) = tree_with(&[10, 20, 30]);
        tree.promote(ids[2]);
        assert_eq!(tree.preorder_addresses(), vec![30, 20, 10]);
        tree.debug_validate_invariants();
    }

    #[test]
    fn promote_agrees_with_move_to_front_model() {
        let mut tree = RecencyTree::new();
        let mut model: Vec<u64> = Vec::new();
        let mut ids = Vec::new();
        for address in 1..=12u64 {
            ids.push(tree.push_recent(address));
            model.insert(0, address);
        }

        // Deterministic churn touching leaves, spine nodes, and the root.
        for &touch in &[5u64, 3, 9, 5, 12, 1, 7, 7, 2, 11, 4, 9, 6, 1] {
            let id = ids[(touch - 1) as usize];
            let expected_rank = model.iter().position(|&a| a == touch).unwrap() as u64 + 1;
            assert_eq!(tree.rank(id), expected_rank, "rank of {touch}");

            tree.promote(id);
            let pos = model.iter().position(|&a| a == touch).unwrap();
            model.remove(pos);
            model.insert(0, touch);

            assert_eq!(tree.preorder_addresses(), model, "after touching {touch}");
            tree.debug_validate_invariants();
        }
    }

    #[test]
    fn clear_resets_tree() {
        let (mut tree, _) = tree_with(&[1, 2, 3]);
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.root(), None);
        assert!(tree.preorder_addresses().is_empty());

        let id = tree.push_recent(99);
        assert_eq!(tree.rank(id), 1);
    }

    #[test]
    fn address_lookup() {
        let (tree, ids) = tree_with(&[0xA, 0xB]);
        assert_eq!(tree.address(ids[0]), Some(0xA));
        assert_eq!(tree.address(ids[1]), Some(0xB));
        assert_eq!(tree.address(NodeId(17)), None);
    }
}
