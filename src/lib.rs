//! Weighted consistent-hashing ring for routing requests to backend nodes.
//!
//! Nodes occupy `point_multiplier * weight` virtual points on a 64-bit ring.
//! A request is routed to the owner of the first point at or after the hash
//! of its composite key, wrapping past the end of the ring. Membership
//! changes only move the requests whose points were gained or lost.
pub mod cluster;
pub mod error;

pub use crate::cluster::hashing::{Fnv1a, HashAlgorithm, HashFunction, XxHash};
pub use crate::cluster::node::{Node, Request};
pub use crate::cluster::ring::HashRing;
pub use crate::cluster::ring_config::RingConfig;
pub use crate::cluster::ring_state::RingState;
pub use crate::error::ring_error::RingError;
