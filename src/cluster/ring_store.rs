//! Ordered placement of virtual points plus the per-node index of the points
//! each node owns.
//!
//! The store is not synchronised; [`crate::cluster::ring::HashRing`] wraps it
//! in its lock. Every mutation keeps the two views in step: a position is in a
//! node's list iff the ring maps that position to the node.
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tracing::debug;

use crate::cluster::hashing::HashFunction;
use crate::cluster::node::Node;

struct NodeSlot {
    node: Arc<Node>,
    positions: Vec<u64>,
}

#[derive(Default)]
pub struct RingStore {
    //for ordered access of virtual point hashes
    ring: BTreeMap<u64, Arc<Node>>,
    slots: HashMap<String, NodeSlot>,
}

/// Token hashed to place one virtual point. The node id comes last so the
/// numeric prefix can never be confused with part of the id.
pub fn virtual_point_token(outer: u32, inner: u32, node_id: &str) -> String {
    format!("{}#{}#{}", outer, inner, node_id)
}

impl RingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places `point_multiplier * weight` points for the node, replacing any
    /// points a node with the same id held before. Returns the number of
    /// points the node owns afterwards.
    ///
    /// A position that collides with an existing point is overwritten; the
    /// previous owner loses that position from its list.
    pub fn insert_node(&mut self, node: Arc<Node>, point_multiplier: u32, hasher: &dyn HashFunction) -> usize {
        self.remove_node(&node.id);

        let weight = node.weight.get();
        let mut owned = Vec::with_capacity(point_multiplier as usize * weight as usize);
        for outer in 0..point_multiplier {
            for inner in 0..weight {
                let position = hasher.hash_str(&virtual_point_token(outer, inner, &node.id));
                match self.ring.insert(position, Arc::clone(&node)) {
                    None => owned.push(position),
                    Some(previous) if previous.id == node.id => {
                        debug!(node_id = %node.id, position, "virtual point collided with itself");
                    }
                    Some(previous) => {
                        debug!(node_id = %node.id, displaced = %previous.id, position, "virtual point collision");
                        if let Some(slot) = self.slots.get_mut(&previous.id) {
                            slot.positions.retain(|p| *p != position);
                        }
                        owned.push(position);
                    }
                }
            }
        }

        let count = owned.len();
        self.slots.insert(node.id.clone(), NodeSlot { node, positions: owned });
        count
    }

    /// Erases every point of the node. Returns the removed node, `None` when
    /// the id is unknown.
    pub fn remove_node(&mut self, node_id: &str) -> Option<Arc<Node>> {
        let slot = self.slots.remove(node_id)?;
        for position in &slot.positions {
            if self.ring.get(position).is_some_and(|owner| owner.id == node_id) {
                self.ring.remove(position);
            }
        }
        Some(slot.node)
    }

    /// Owner of the smallest position >= `key`, wrapping to the smallest
    /// position overall.
    pub fn successor(&self, key: u64) -> Option<&Arc<Node>> {
        self.ring
            .range(key..)
            .next()
            .or_else(|| self.ring.iter().next())
            .map(|(_, node)| node)
    }

    pub fn point_count(&self) -> usize {
        self.ring.len()
    }

    pub fn node_count(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    pub fn contains_node(&self, node_id: &str) -> bool {
        self.slots.contains_key(node_id)
    }

    pub fn node(&self, node_id: &str) -> Option<&Arc<Node>> {
        self.slots.get(node_id).map(|slot| &slot.node)
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    pub fn positions_of(&self, node_id: &str) -> Option<&[u64]> {
        self.slots.get(node_id).map(|slot| slot.positions.as_slice())
    }

    pub fn points_per_node(&self) -> impl Iterator<Item = (&str, usize)> {
        self.slots
            .iter()
            .map(|(id, slot)| (id.as_str(), slot.positions.len()))
    }

    /// Ring entries in ascending position order.
    pub fn entries(&self) -> impl Iterator<Item = (u64, &Arc<Node>)> {
        self.ring.iter().map(|(position, node)| (*position, node))
    }

    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let mut indexed = 0;
        for (id, slot) in &self.slots {
            for position in &slot.positions {
                let owner = self.ring.get(position).expect("indexed position missing from ring");
                assert_eq!(&owner.id, id, "position {} owned by {} but indexed under {}", position, owner.id, id);
            }
            indexed += slot.positions.len();
        }
        assert_eq!(indexed, self.ring.len(), "ring and side index disagree on point count");
    }
}
