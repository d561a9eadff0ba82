use std::num::NonZeroU32;

/// A node is a backend the ring routes to. It bundles the identifier used for
/// placement, the address callers connect to and the weight controlling its
/// share of virtual points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: String,
    //opaque to the ring, only handed back to callers
    pub address: String,
    pub weight: NonZeroU32,
}

impl Node {
    pub fn new(id: impl Into<String>, address: impl Into<String>) -> Node {
        Self::with_weight(id, address, NonZeroU32::MIN)
    }

    pub fn with_weight(id: impl Into<String>, address: impl Into<String>, weight: NonZeroU32) -> Node {
        Self {
            id: id.into(),
            address: address.into(),
            weight,
        }
    }
}

impl AsRef<str> for Node {
    fn as_ref(&self) -> &str {
        &self.id
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.id, self.address)
    }
}

/// An incoming request. The ring never interprets the fields, it only hashes
/// them together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub id: String,
    pub service_id: String,
    pub method: String,
}

impl Request {
    pub fn new(id: impl Into<String>, service_id: impl Into<String>, method: impl Into<String>) -> Request {
        Self {
            id: id.into(),
            service_id: service_id.into(),
            method: method.into(),
        }
    }

    /// Pipe-delimited composite of all three fields. Hashing every field
    /// spreads requests that share an id pattern.
    pub fn routing_key(&self) -> String {
        format!("{}|{}|{}", self.id, self.service_id, self.method)
    }
}
