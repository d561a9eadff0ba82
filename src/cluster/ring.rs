//! Contains the implementation for routing requests to weighted backend nodes.
use std::collections::{BTreeMap, HashMap};
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, trace};

use crate::cluster::hashing::{Fnv1a, HashFunction};
use crate::cluster::load::LoadTable;
use crate::cluster::node::{Node, Request};
use crate::cluster::ring_config::{RingConfig, DEFAULT_STATE_SAMPLE_SIZE};
use crate::cluster::ring_state::RingState;
use crate::cluster::ring_store::RingStore;
use crate::error::ring_error::RingError;

struct RingInner {
    store: RingStore,
    loads: LoadTable,
}

/// Consistent hash ring shared between any number of threads.
///
/// One mutex guards the ring store, its side index and the load table
/// together, so every operation observes and leaves the three consistent.
/// Operations are serializable; none blocks on anything but the lock.
pub struct HashRing {
    inner: Mutex<RingInner>,
    point_multiplier: u32,
    state_sample_size: usize,
    hasher: Box<dyn HashFunction>,
}

impl HashRing {
    pub fn new(point_multiplier: u32) -> Result<Self, RingError> {
        Self::with_hasher(point_multiplier, Box::new(Fnv1a))
    }

    pub fn with_hasher(point_multiplier: u32, hasher: Box<dyn HashFunction>) -> Result<Self, RingError> {
        let config = RingConfig::default().with_point_multiplier(point_multiplier);
        config.validate()?;
        Ok(Self::build(&config, hasher))
    }

    pub fn from_config(config: &RingConfig) -> Result<Self, RingError> {
        config.validate()?;
        Ok(Self::build(config, config.hash_algorithm.build()))
    }

    fn build(config: &RingConfig, hasher: Box<dyn HashFunction>) -> Self {
        Self {
            inner: Mutex::new(RingInner {
                store: RingStore::new(),
                loads: LoadTable::new(),
            }),
            point_multiplier: config.point_multiplier,
            state_sample_size: config.state_sample_size,
            hasher,
        }
    }

    // Critical sections never panic midway through a mutation, so a poisoned
    // lock still guards consistent state.
    fn lock(&self) -> MutexGuard<'_, RingInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn point_multiplier(&self) -> u32 {
        self.point_multiplier
    }

    /// Adds a node, fully replacing any node with the same id. The node's
    /// load counter starts at zero unless it already has history.
    pub fn add_node(&self, node: Node) {
        let node = Arc::new(node);
        let mut inner = self.lock();
        let replaced = inner.store.contains_node(&node.id);
        let points = inner
            .store
            .insert_node(Arc::clone(&node), self.point_multiplier, self.hasher.as_ref());
        inner.loads.ensure(&node.id);
        debug!(node_id = %node.id, weight = node.weight.get(), points, replaced, "added node to ring");
    }

    /// Removes a node and all of its points. Unknown ids are ignored. The
    /// node's load counter is kept.
    pub fn remove_node(&self, node: impl AsRef<str>) -> Option<Arc<Node>> {
        let node_id = node.as_ref();
        let removed = self.lock().store.remove_node(node_id);
        if removed.is_some() {
            debug!(%node_id, "removed node from ring");
        }
        removed
    }

    /// Routes a request without side effects. `None` means the ring is
    /// empty.
    pub fn assign(&self, request: &Request) -> Option<Arc<Node>> {
        let inner = self.lock();
        self.route(&inner, &request.routing_key())
    }

    pub fn get_assigned_node(&self, request: &Request) -> Option<Arc<Node>> {
        self.assign(request)
    }

    /// Routes an arbitrary key with the same successor rule as requests.
    pub fn assign_key(&self, key: &str) -> Option<Arc<Node>> {
        let inner = self.lock();
        self.route(&inner, key)
    }

    /// Routes a request and charges it to the chosen node's load counter.
    pub fn handle_request(&self, request: &Request) -> Option<Arc<Node>> {
        let mut inner = self.lock();
        let node = self.route(&inner, &request.routing_key())?;
        let load = inner.loads.increment(&node.id);
        trace!(request_id = %request.id, node_id = %node.id, load, "handled request");
        Some(node)
    }

    fn route(&self, inner: &RingInner, key: &str) -> Option<Arc<Node>> {
        let position = self.hasher.hash_str(key);
        inner.store.successor(position).cloned()
    }

    pub fn snapshot_loads(&self) -> HashMap<String, u64> {
        self.lock().loads.snapshot()
    }

    /// Resets live nodes' counters to zero and drops counters of nodes no
    /// longer on the ring.
    pub fn clear_loads(&self) {
        let mut inner = self.lock();
        let RingInner { store, loads } = &mut *inner;
        loads.clear(|id| store.contains_node(id));
    }

    /// Drops the counter of a departed node. Live nodes keep theirs and
    /// yield `None`.
    pub fn forget_load(&self, node_id: &str) -> Option<u64> {
        let mut inner = self.lock();
        if inner.store.contains_node(node_id) {
            return None;
        }
        inner.loads.forget(node_id)
    }

    pub fn describe_ring_state(&self) -> RingState {
        let inner = self.lock();
        let sample_size = if self.state_sample_size == 0 {
            DEFAULT_STATE_SAMPLE_SIZE
        } else {
            self.state_sample_size
        };
        RingState {
            total_points: inner.store.point_count(),
            points_per_node: inner
                .store
                .points_per_node()
                .map(|(id, points)| (id.to_string(), points))
                .collect(),
            sample: inner
                .store
                .entries()
                .take(sample_size)
                .map(|(position, node)| (position, node.id.clone()))
                .collect(),
            loads: inner.loads.snapshot().into_iter().collect::<BTreeMap<_, _>>(),
        }
    }

    /// Renders one snapshot of the ring into `sink` and hands it back.
    pub fn write_ring_state<W: io::Write>(&self, sink: &mut W) -> io::Result<RingState> {
        let state = self.describe_ring_state();
        write!(sink, "{}", state)?;
        Ok(state)
    }

    pub fn point_count(&self) -> usize {
        self.lock().store.point_count()
    }

    pub fn node_count(&self) -> usize {
        self.lock().store.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().store.is_empty()
    }

    pub fn contains_node(&self, node_id: &str) -> bool {
        self.lock().store.contains_node(node_id)
    }

    pub fn node(&self, node_id: &str) -> Option<Arc<Node>> {
        self.lock().store.node(node_id).cloned()
    }

    pub fn node_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.lock().store.node_ids().map(str::to_string).collect();
        ids.sort();
        ids
    }

    /// Ring positions owned by the node, in placement order.
    pub fn node_positions(&self, node_id: &str) -> Option<Vec<u64>> {
        self.lock().store.positions_of(node_id).map(<[u64]>::to_vec)
    }

    #[cfg(test)]
    fn assert_consistent(&self) {
        self.lock().store.assert_consistent();
    }
}
