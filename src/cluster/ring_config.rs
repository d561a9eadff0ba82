use crate::cluster::hashing::HashAlgorithm;
use crate::error::ring_error::RingError;

pub const DEFAULT_POINT_MULTIPLIER: u32 = 100;
pub const DEFAULT_STATE_SAMPLE_SIZE: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingConfig {
    /// Virtual points per unit of node weight.
    pub point_multiplier: u32,
    pub hash_algorithm: HashAlgorithm,
    //how many ring entries describe_ring_state lists
    pub state_sample_size: usize,
}

impl RingConfig {
    pub fn new(point_multiplier: u32, hash_algorithm: HashAlgorithm, state_sample_size: usize) -> Self {
        Self {
            point_multiplier,
            hash_algorithm,
            state_sample_size,
        }
    }

    pub fn new_default() -> Self {
        Self {
            point_multiplier: DEFAULT_POINT_MULTIPLIER,
            hash_algorithm: HashAlgorithm::Fnv1a,
            state_sample_size: DEFAULT_STATE_SAMPLE_SIZE,
        }
    }

    pub fn with_point_multiplier(mut self, point_multiplier: u32) -> Self {
        self.point_multiplier = point_multiplier;
        self
    }

    pub fn validate(&self) -> Result<(), RingError> {
        if self.point_multiplier == 0 {
            return Err(RingError::InvalidConfiguration(
                "point multiplier must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for RingConfig {
    fn default() -> Self {
        Self::new_default()
    }
}
