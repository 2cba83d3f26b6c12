//! Plain binary search tree engine
//!
//! Every node visited on the way down produces a "Comparing" snapshot. A new
//! node takes its position straight from its parent (half the parent's
//! offset per level); the whole layout is recomputed once after each
//! structural change, so only the final snapshot of a call is tidy.

use super::{Link, NodeId, Side, TreeArena, TreeLayout};
use crate::snapshot::{History, Paint, Point};
use std::cmp::Ordering;

/// Binary search tree that records a history for every mutation
#[derive(Debug, Clone, Default)]
pub struct Bst {
    arena: TreeArena,
}

impl Bst {
    pub fn new(layout: TreeLayout) -> Self {
        Bst {
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

    /// Remove every node. Ids handed out before this call become invalid.
    pub fn clear(&mut self) {
        self.arena.clear();
    }

    /// Insert `value`, recording the search path and the new node
    pub fn insert(&mut self, value: i32) -> History {
        let mut history = History::new();
        history.push(self.arena.snapshot(format!("Inserting {}", value)));

        let origin = self.arena.layout().root_position();
        let Some(new_id) = self.insert_at(Link::Root, value, 0, origin, &mut history) else {
            return history;
        };

        self.arena.relayout();
        let mut done = self.arena.snapshot(format!("Inserted {}", value));
        done.highlight(new_id, Paint::Green);
        history.push(done);
        history
    }

    /// Remove `value`, recording the search and any successor swap
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
        history.push(self.arena.snapshot(format!("Removed {}", value)));
        history
    }

    /// Returns the id of the created node, or `None` for a duplicate
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
        self.insert_at(Link::Child(id, side), value, depth + 1, position, history)
    }

    /// Returns whether a node was removed below `link`
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

        match value.cmp(&current) {
            Ordering::Less => self.remove_at(Link::Child(id, Side::Left), value, history),
            Ordering::Greater => self.remove_at(Link::Child(id, Side::Right), value, history),
            Ordering::Equal => {
                self.remove_found(link, id, history);
                true
            }
        }
    }

    fn remove_found(&mut self, link: Link, id: NodeId, history: &mut History) {
        let mut found = self
            .arena
            .snapshot(format!("Found node {}", self.arena[id].value));
        found.highlight(id, Paint::Red);
        history.push(found);

        match (self.arena[id].left, self.arena[id].right) {
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
                copy.highlight(successor, Paint::Yellow);
                history.push(copy);

                self.remove_at(Link::Child(id, Side::Right), successor_value, history);
            }
        }
    }
}
