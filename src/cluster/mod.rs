pub mod hashing;
pub mod load;
pub mod node;
pub mod ring;
pub mod ring_config;
pub mod ring_state;
pub mod ring_store;
