//! Binary search trees with stable node identity
//!
//! Both tree engines keep their nodes in a [`TreeArena`]: a map from an
//! auto-incrementing [`NodeId`] to the node, with children stored as ids.
//! Ids are assigned at creation and never reused until [`TreeArena::clear`],
//! so a highlight that refers to a removed node simply finds nothing.
//!
//! - [`bst`]: plain binary search tree
//! - [`avl`]: self-balancing AVL tree
//!
//! # Two passes
//!
//! Mutation and layout are separate walks over the same tree. The engines
//! mutate and snapshot with whatever positions the nodes currently carry,
//! then run [`TreeArena::relayout`] once at the end of the call so only the
//! final snapshot shows the tidy layout.

pub mod avl;
pub mod bst;

use crate::constants::{CANVAS_WIDTH, LEVEL_HEIGHT, TREE_TOP};
use crate::snapshot::{EdgeView, GraphStep, NodeView, Point};
use rustc_hash::FxHashMap;
use std::ops::{Index, IndexMut};

pub type NodeId = usize;

/// A single tree node
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub value: i32,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
    pub id: NodeId,
    /// Last computed canvas position; may be stale mid-operation
    pub position: Point,
    /// Subtree height (leaf = 1); maintained by the AVL engine only
    pub height: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Where a subtree hangs: the root slot or one side of a parent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    Root,
    Child(NodeId, Side),
}

/// Tidy-tree layout parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeLayout {
    pub canvas_width: f64,
    pub level_height: f64,
    pub top: f64,
}

impl Default for TreeLayout {
    fn default() -> Self {
        TreeLayout {
            canvas_width: CANVAS_WIDTH,
            level_height: LEVEL_HEIGHT,
            top: TREE_TOP,
        }
    }
}

impl TreeLayout {
    pub fn root_position(&self) -> Point {
        Point::new(self.canvas_width / 2.0, self.top)
    }

    /// Horizontal distance between a node at `depth` and its children
    pub fn offset_at(&self, depth: usize) -> f64 {
        self.canvas_width / 2f64.powi(depth as i32 + 2)
    }
}

/// Node storage shared by the tree engines
#[derive(Debug, Clone, Default)]
pub struct TreeArena {
    nodes: FxHashMap<NodeId, TreeNode>,
    root: Option<NodeId>,
    next_id: NodeId,
    layout: TreeLayout,
}

impl Index<NodeId> for TreeArena {
    type Output = TreeNode;

    fn index(&self, id: NodeId) -> &TreeNode {
        self.nodes
            .get(&id)
            .unwrap_or_else(|| panic!("dangling tree node id {}", id))
    }
}

impl IndexMut<NodeId> for TreeArena {
    fn index_mut(&mut self, id: NodeId) -> &mut TreeNode {
        self.nodes
            .get_mut(&id)
            .unwrap_or_else(|| panic!("dangling tree node id {}", id))
    }
}

impl TreeArena {
    pub fn new(layout: TreeLayout) -> Self {
        TreeArena {
            layout,
            ..Default::default()
        }
    }

    pub fn layout(&self) -> &TreeLayout {
        &self.layout
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(&id)
    }

    /// Drop every node and restart id assignment
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.next_id = 0;
    }

    /// Create a detached leaf
    pub fn alloc(&mut self, value: i32, position: Point) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        self.nodes.insert(
            id,
            TreeNode {
                value,
                left: None,
                right: None,
                id,
                position,
                height: 1,
            },
        );
        id
    }

    pub fn free(&mut self, id: NodeId) -> Option<TreeNode> {
        self.nodes.remove(&id)
    }

    /// The subtree currently hanging from `link`
    pub fn child(&self, link: Link) -> Option<NodeId> {
        match link {
            Link::Root => self.root,
            Link::Child(parent, Side::Left) => self[parent].left,
            Link::Child(parent, Side::Right) => self[parent].right,
        }
    }

    /// Hang `child` from `link`, replacing whatever was there
    pub fn attach(&mut self, link: Link, child: Option<NodeId>) {
        match link {
            Link::Root => self.root = child,
            Link::Child(parent, Side::Left) => self[parent].left = child,
            Link::Child(parent, Side::Right) => self[parent].right = child,
        }
    }

    /// Provisional position for a new child of `parent`, derived from the
    /// parent's current position only
    pub fn child_position(&self, parent: NodeId, depth: usize, side: Side) -> Point {
        let origin = self[parent].position;
        let offset = self.layout.offset_at(depth);
        let x = match side {
            Side::Left => origin.x - offset,
            Side::Right => origin.x + offset,
        };
        Point::new(x, origin.y + self.layout.level_height)
    }

    /// Leftmost node of the subtree rooted at `id`
    pub fn find_min(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self[id].left {
            id = left;
        }
        id
    }

    pub fn find(&self, value: i32) -> Option<NodeId> {
        let mut current = self.root;
        while let Some(id) = current {
            let node = &self[id];
            current = match value.cmp(&node.value) {
                std::cmp::Ordering::Less => node.left,
                std::cmp::Ordering::Greater => node.right,
                std::cmp::Ordering::Equal => return Some(id),
            };
        }
        None
    }

    // ========== Height bookkeeping ==========

    pub fn height(&self, id: Option<NodeId>) -> i32 {
        id.map_or(0, |id| self[id].height)
    }

    pub fn update_height(&mut self, id: NodeId) {
        let node = &self[id];
        let height = 1 + self.height(node.left).max(self.height(node.right));
        self[id].height = height;
    }

    pub fn balance_factor(&self, id: NodeId) -> i32 {
        let node = &self[id];
        self.height(node.left) - self.height(node.right)
    }

    // ========== Layout pass ==========

    /// Recompute every node position from the root down
    pub fn relayout(&mut self) {
        if let Some(root) = self.root {
            let origin = self.layout.root_position();
            let offset = self.layout.offset_at(0);
            self.relayout_from(root, 0, origin.x, offset);
        }
    }

    fn relayout_from(&mut self, id: NodeId, depth: usize, x: f64, offset: f64) {
        let y = self.layout.top + depth as f64 * self.layout.level_height;
        self[id].position = Point::new(x, y);

        let (left, right) = (self[id].left, self[id].right);
        if let Some(left) = left {
            self.relayout_from(left, depth + 1, x - offset, offset / 2.0);
        }
        if let Some(right) = right {
            self.relayout_from(right, depth + 1, x + offset, offset / 2.0);
        }
    }

    // ========== Snapshot pass ==========

    /// Describe the current tree (pre-order) with default colors
    pub fn snapshot(&self, message: impl Into<String>) -> GraphStep {
        let mut step = GraphStep::new(message);
        if let Some(root) = self.root {
            self.populate(root, &mut step);
        }
        step
    }

    fn populate(&self, id: NodeId, step: &mut GraphStep) {
        let node = &self[id];
        step.nodes
            .push(NodeView::new(node.id, node.value.to_string(), node.position));

        for child in [node.left, node.right].into_iter().flatten() {
            step.edges.push(EdgeView::new(node.id, child));
            self.populate(child, step);
        }
    }

    // ========== Structure queries ==========

    pub fn inorder(&self) -> Vec<i32> {
        let mut values = Vec::with_capacity(self.len());
        let mut stack = Vec::new();
        let mut current = self.root;
        while current.is_some() || !stack.is_empty() {
            while let Some(id) = current {
                stack.push(id);
                current = self[id].left;
            }
            if let Some(id) = stack.pop() {
                values.push(self[id].value);
                current = self[id].right;
            }
        }
        values
    }

    /// True when every node respects strict BST ordering
    pub fn is_search_tree(&self) -> bool {
        self.inorder().windows(2).all(|pair| pair[0] < pair[1])
    }

    /// True when every balance factor is within [-1, 1] and the stored
    /// heights match the real ones
    pub fn is_balanced(&self) -> bool {
        self.checked_height(self.root).is_some()
    }

    fn checked_height(&self, id: Option<NodeId>) -> Option<i32> {
        let Some(id) = id else {
            return Some(0);
        };
        let node = &self[id];
        let left = self.checked_height(node.left)?;
        let right = self.checked_height(node.right)?;
        let height = 1 + left.max(right);
        ((left - right).abs() <= 1 && node.height == height).then_some(height)
    }

    /// Number of levels below and including the root
    pub fn depth(&self) -> usize {
        fn depth_of(arena: &TreeArena, id: Option<NodeId>) -> usize {
            id.map_or(0, |id| {
                1 + depth_of(arena, arena[id].left).max(depth_of(arena, arena[id].right))
            })
        }
        depth_of(self, self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_tree() -> TreeArena {
        // 10 with children 5 and 15
        let mut arena = TreeArena::default();
        let root = arena.alloc(10, Point::default());
        let left = arena.alloc(5, Point::default());
        let right = arena.alloc(15, Point::default());
        arena.attach(Link::Root, Some(root));
        arena.attach(Link::Child(root, Side::Left), Some(left));
        arena.attach(Link::Child(root, Side::Right), Some(right));
        arena
    }

    #[test]
    fn test_relayout_halves_offsets() {
        let mut arena = small_tree();
        arena.relayout();

        let root = arena.root().unwrap();
        let left = arena[root].left.unwrap();
        let right = arena[root].right.unwrap();

        assert_eq!(arena[root].position, Point::new(600.0, 50.0));
        assert_eq!(arena[left].position, Point::new(300.0, 130.0));
        assert_eq!(arena[right].position, Point::new(900.0, 130.0));
    }

    #[test]
    fn test_snapshot_is_preorder_with_edges() {
        let arena = small_tree();
        let step = arena.snapshot("tree");

        let labels: Vec<&str> = step.nodes.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(labels, vec!["10", "5", "15"]);
        assert_eq!(step.edges.len(), 2);
        assert!(step.edges.iter().all(|e| e.from == arena.root().unwrap()));
    }

    #[test]
    fn test_ids_not_reused_until_clear() {
        let mut arena = small_tree();
        arena.free(2);
        let id = arena.alloc(20, Point::default());
        assert_eq!(id, 3);

        arena.clear();
        assert!(arena.is_empty());
        assert_eq!(arena.alloc(1, Point::default()), 0);
    }

    #[test]
    fn test_queries() {
        let arena = small_tree();
        assert_eq!(arena.inorder(), vec![5, 10, 15]);
        assert!(arena.is_search_tree());
        assert_eq!(arena.find(15), Some(2));
        assert_eq!(arena.find(7), None);
        assert_eq!(arena.find_min(0), 1);
        assert_eq!(arena.depth(), 2);
    }
}
