//! Self-balancing AVL tree engine
//!
//! Insert and remove follow the BST search, then retrace bottom-up along the
//! return path. At each ancestor the height is recomputed and the balance
//! factor (`height(left) - height(right)`) checked:
//!
//! - `> 1`: left-heavy. A left child leaning right is first rotated left
//!   (left-right case), then the node is rotated right.
//! - `< -1`: right-heavy, mirrored.
//!
//! Each rotation records a before and an after snapshot with the old layout.
//! Positions are only recomputed once the whole call has finished.
//!
//! Deletion retraces every ancestor of the removed node since it can
//! unbalance several levels at once.

use super::{Link, NodeId, Side, TreeArena, TreeLayout};
use crate::snapshot::{History, Paint, Point};
use std::cmp::Ordering;

/// AVL tree that records a history for every mutation
#[derive(Debug, Clone, Default)]
pub struct Avl {
    arena: TreeArena,
}

impl Avl {
    pub fn new(layout: TreeLayout) -> Self {
        Avl {
            arena: TreeArena::new(layout),
        }
    }

    pub fn arena(&self) -> &TreeArena {
        &self.arena
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn contains(&self, value: i32) -> bool {
        self.arena.find(value).is_some()
    }

    pub fn inorder(&self) -> Vec<i32> {
        self.arena.inorder()
    }

    /// Height of the whole tree (empty = 0)
    pub fn height(&self) -> i32 {
        self.arena.height(self.arena.root())
    }

    /// True when the tree satisfies both BST order and the AVL balance bound
    pub fn is_valid(&self) -> bool {
        self.arena.is_search_tree() && self.arena.is_balanced()
    }

    /// Remove every node. Ids handed out before this call become invalid.
    pub fn clear(&mut self) {
        self.arena.clear();
    }

    pub fn insert(&mut self, value: i32) -> History {
        let mut history = History::new();
        history.push(self.arena.snapshot(format!("Inserting {}", value)));

        let origin = self.arena.layout().root_position();
        let Some(new_id) = self.insert_at(Link::Root, value, 0, origin, &mut history) else {
            return history;
        };

        self.arena.relayout();
        let mut done = self
            .arena
            .snapshot(format!("Inserted {}. Balancing complete.", value));
        done.highlight(new_id, Paint::Green);
        history.push(done);

        debug_assert!(self.is_valid());
        history
    }

    pub fn remove(&mut self, value: i32) -> History {
        let mut history = History::new();
        history.push(
            self.arena
                .snapshot(format!("Attempting to remove {}", value)),
        );

        if !self.remove_at(Link::Root, value, &mut history) {
            return history;
        }

        self.arena.relayout();
        let message = if self.arena.is_empty() {
            format!("Removed {}. Tree is empty.", value)
        } else {
            format!("Removed {}. Final check.", value)
        };
        history.push(self.arena.snapshot(message));

        debug_assert!(self.is_valid());
        history
    }

    fn insert_at(
        &mut self,
        link: Link,
        value: i32,
        depth: usize,
        position: Point,
        history: &mut History,
    ) -> Option<NodeId> {
        let Some(id) = self.arena.child(link) else {
            let id = self.arena.alloc(value, position);
            self.arena.attach(link, Some(id));

            let mut step = self
                .arena
                .snapshot(format!("Found spot. Inserting {}", value));
            step.highlight(id, Paint::Green);
            if let Link::Child(parent, _) = link {
                step.highlight_edge(parent, id, Paint::Green);
            }
            history.push(step);
            return Some(id);
        };

        let current = self.arena[id].value;
        let mut visit = self.arena.snapshot(format!("Comparing with {}", current));
        visit.highlight(id, Paint::Yellow);
        history.push(visit);

        let side = match value.cmp(&current) {
            Ordering::Less => Side::Left,
            Ordering::Greater => Side::Right,
            Ordering::Equal => {
                let mut exists = self
                    .arena
                    .snapshot(format!("Value {} already exists.", value));
                exists.highlight(id, Paint::Red);
                history.push(exists);
                return None;
            }
        };

        let position = self.arena.child_position(id, depth, side);
        let inserted = self.insert_at(Link::Child(id, side), value, depth + 1, position, history);
        if inserted.is_some() {
            self.rebalance(link, id, history);
        }
        inserted
    }

    fn remove_at(&mut self, link: Link, value: i32, history: &mut History) -> bool {
        let Some(id) = self.arena.child(link) else {
            history.push(
                self.arena
                    .snapshot(format!("Value {} not found.", value)),
            );
            return false;
        };

        let current = self.arena[id].value;
        let mut visit = self.arena.snapshot(format!("Comparing with {}", current));
        visit.highlight(id, Paint::Yellow);
        history.push(visit);

        let side = match value.cmp(&current) {
            Ordering::Less => Side::Left,
            Ordering::Greater => Side::Right,
            Ordering::Equal => {
                self.remove_found(link, id, history);
                return true;
            }
        };

        let removed = self.remove_at(Link::Child(id, side), value, history);
        if removed {
            self.rebalance(link, id, history);
        }
        removed
    }

    fn remove_found(&mut self, link: Link, id: NodeId, history: &mut History) {
        let mut found = self
            .arena
            .snapshot(format!("Found node {}", self.arena[id].value));
        found.highlight(id, Paint::Red);
        history.push(found);

        match (self.arena[id].left, self.arena[id].right) {
            // The spliced-in child is already a valid AVL subtree
            (None, child) | (child, None) => {
                self.arena.free(id);
                self.arena.attach(link, child);
            }
            (Some(_), Some(right)) => {
                let mut search = self
                    .arena
                    .snapshot("Node has two children. Finding inorder successor...");
                search.highlight(id, Paint::Red);
                history.push(search);

                let successor = self.arena.find_min(right);
                let successor_value = self.arena[successor].value;

                let mut found_successor = self
                    .arena
                    .snapshot(format!("Found successor: {}", successor_value));
                found_successor.highlight(successor, Paint::Green);
                history.push(found_successor);

                self.arena[id].value = successor_value;

                let mut copy = self
                    .arena
                    .snapshot(format!("Copying value {} to node", successor_value));
                copy.highlight(id, Paint::Green);
                history.push(copy);

                self.remove_at(Link::Child(id, Side::Right), successor_value, history);
                self.rebalance(link, id, history);
            }
        }
    }

    /// Recompute the height of `id` (hanging from `link`) and rotate if it
    /// is out of balance
    fn rebalance(&mut self, link: Link, id: NodeId, history: &mut History) {
        self.arena.update_height(id);
        let factor = self.arena.balance_factor(id);
        let value = self.arena[id].value;

        let mut check = self.arena.snapshot(format!(
            "Checking balance at node {}. Factor: {}",
            value, factor
        ));
        check.highlight(id, Paint::Cyan);
        history.push(check);

        if factor > 1 {
            if let Some(left) = self.arena[id].left {
                if self.arena.balance_factor(left) < 0 {
                    history.push(self.arena.snapshot(format!(
                        "Left-Right case. Performing Left rotation on {}",
                        self.arena[left].value
                    )));
                    self.rotate_left(Link::Child(id, Side::Left), left, history);
                }
            }
            history.push(self.arena.snapshot(format!(
                "Left-Left case. Performing Right rotation on {}",
                value
            )));
            self.rotate_right(link, id, history);
        } else if factor < -1 {
            if let Some(right) = self.arena[id].right {
                if self.arena.balance_factor(right) > 0 {
                    history.push(self.arena.snapshot(format!(
                        "Right-Left case. Performing Right rotation on {}",
                        self.arena[right].value
                    )));
                    self.rotate_right(Link::Child(id, Side::Right), right, history);
                }
            }
            history.push(self.arena.snapshot(format!(
                "Right-Right case. Performing Left rotation on {}",
                value
            )));
            self.rotate_left(link, id, history);
        }
    }

    /// Rotate the subtree rooted at `y` right; its left child takes its place
    fn rotate_right(&mut self, link: Link, y: NodeId, history: &mut History) -> NodeId {
        let Some(x) = self.arena[y].left else {
            return y;
        };

        let mut before = self.arena.snapshot(format!(
            "Before Right Rotation on {}",
            self.arena[y].value
        ));
        before.highlight(y, Paint::Red);
        history.push(before);

        let inner = self.arena[x].right;
        self.arena[x].right = Some(y);
        self.arena[y].left = inner;
        self.arena.attach(link, Some(x));

        self.arena.update_height(y);
        self.arena.update_height(x);

        let mut after = self
            .arena
            .snapshot("After Right Rotation (re-calculating layout...)");
        after.highlight(x, Paint::Green);
        history.push(after);
        x
    }

    /// Rotate the subtree rooted at `x` left; its right child takes its place
    fn rotate_left(&mut self, link: Link, x: NodeId, history: &mut History) -> NodeId {
        let Some(y) = self.arena[x].right else {
            return x;
        };

        let mut before = self.arena.snapshot(format!(
            "Before Left Rotation on {}",
            self.arena[x].value
        ));
        before.highlight(x, Paint::Red);
        history.push(before);

        let inner = self.arena[y].left;
        self.arena[y].left = Some(x);
        self.arena[x].right = inner;
        self.arena.attach(link, Some(y));

        self.arena.update_height(x);
        self.arena.update_height(y);

        let mut after = self
            .arena
            .snapshot("After Left Rotation (re-calculating layout...)");
        after.highlight(y, Paint::Green);
        history.push(after);
        y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_of(values: &[i32]) -> Avl {
        let mut avl = Avl::default();
        for &v in values {
            avl.insert(v);
        }
        avl
    }

    fn messages(history: &History) -> Vec<&str> {
        history.iter().map(|s| s.message()).collect()
    }

    #[test]
    fn test_ascending_inserts_rotate_left() {
        let mut avl = tree_of(&[10, 20]);
        let history = avl.insert(30);
        let msgs = messages(&history);

        assert!(msgs.contains(&"Right-Right case. Performing Left rotation on 10"));
        assert!(msgs.contains(&"Before Left Rotation on 10"));
        assert_eq!(avl.arena()[avl.arena().root().unwrap()].value, 20);
        assert_eq!(avl.height(), 2);
        assert!(avl.is_valid());
    }

    #[test]
    fn test_left_right_case_double_rotation() {
        let mut avl = tree_of(&[30, 10]);
        let history = avl.insert(20);
        let msgs = messages(&history);

        let lr = msgs
            .iter()
            .position(|m| m.starts_with("Left-Right case"))
            .expect("left-right case announced");
        let ll = msgs
            .iter()
            .position(|m| m.starts_with("Left-Left case"))
            .expect("right rotation announced");
        assert!(lr < ll);
        assert_eq!(avl.arena()[avl.arena().root().unwrap()].value, 20);
        assert_eq!(avl.inorder(), vec![10, 20, 30]);
        assert!(avl.is_valid());
    }

    #[test]
    fn test_rotation_snapshots_keep_old_layout() {
        let mut avl = tree_of(&[10, 20]);
        let history = avl.insert(30);

        let after = history
            .iter()
            .find(|s| s.message().starts_with("After Left Rotation"))
            .and_then(|s| s.as_graph())
            .unwrap();
        // 20 is the new subtree root but still sits where it was drawn before
        let twenty = after.nodes.iter().find(|n| n.label == "20").unwrap();
        assert_eq!(twenty.position, Point::new(900.0, 130.0));
        assert_eq!(after.nodes[0].label, "20");

        let last = history.last().unwrap().as_graph().unwrap();
        let twenty = last.nodes.iter().find(|n| n.label == "20").unwrap();
        assert_eq!(twenty.position, Point::new(600.0, 50.0));
    }

    #[test]
    fn test_remove_rebalances_multiple_levels() {
        let values = [50, 25, 75, 10, 30, 60, 80, 5, 15, 27, 55, 1];
        let mut avl = tree_of(&values);
        assert!(avl.is_valid());

        let history = avl.remove(80);
        assert!(!avl.contains(80));
        assert!(avl.is_valid());
        assert_eq!(history.last().unwrap().message(), "Removed 80. Final check.");
    }

    #[test]
    fn test_remove_two_children_keeps_balance() {
        let mut avl = tree_of(&[40, 20, 60, 10, 30, 50, 70, 65]);
        avl.remove(60);

        assert_eq!(avl.inorder(), vec![10, 20, 30, 40, 50, 65, 70]);
        assert!(avl.is_valid());
    }

    #[test]
    fn test_remove_last_node_empties_tree() {
        let mut avl = tree_of(&[7]);
        let history = avl.remove(7);

        assert!(avl.is_empty());
        assert_eq!(history.last().unwrap().message(), "Removed 7. Tree is empty.");
    }

    #[test]
    fn test_absent_and_duplicate_leave_structure() {
        let mut avl = tree_of(&[3, 1, 4, 5, 9, 2, 6]);
        let before = avl.arena().snapshot("x");

        let missing = avl.remove(8);
        assert_eq!(missing.last().unwrap().message(), "Value 8 not found.");
        assert_eq!(avl.arena().snapshot("x"), before);

        let duplicate = avl.insert(4);
        assert_eq!(
            duplicate.last().unwrap().message(),
            "Value 4 already exists."
        );
        assert_eq!(avl.arena().snapshot("x"), before);
    }

    #[test]
    fn test_sequential_inserts_stay_logarithmic() {
        let mut avl = Avl::default();
        for v in 0..127 {
            avl.insert(v);
            assert!(avl.is_valid(), "invalid after inserting {}", v);
        }
        assert_eq!(avl.height(), 7);
    }
}
