use serde::{Deserialize, Serialize};

use crate::error::{ChainError, ChainResult};

/// Default segment capacity `L`.
pub const DEFAULT_SEGMENT_CAPACITY: usize = 10;

/// Default number of live segments `K`.
pub const DEFAULT_LIVE_SEGMENTS: usize = 3;

/// Shape parameters of an article index chain.
///
/// Both values are fixed for the lifetime of a chain. Opening an existing
/// chain with a different configuration is not supported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Maximum number of items in a persisted segment (`L`).
    pub segment_capacity: usize,
    /// Number of live segments at the head of the chain (`K`).
    pub live_segments: usize,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            segment_capacity: DEFAULT_SEGMENT_CAPACITY,
            live_segments: DEFAULT_LIVE_SEGMENTS,
        }
    }
}

impl ChainConfig {
    /// Build a validated configuration.
    pub fn new(segment_capacity: usize, live_segments: usize) -> ChainResult<Self> {
        let config = Self {
            segment_capacity,
            live_segments,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the chain algorithms cannot run with.
    pub fn validate(&self) -> ChainResult<()> {
        if self.segment_capacity == 0 {
            return Err(ChainError::InvalidConfig(
                "segment_capacity must be at least 1".into(),
            ));
        }
        if self.live_segments == 0 {
            return Err(ChainError::InvalidConfig(
                "live_segments must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Target size of a segment after it receives a rebalance transfer:
    /// `L - floor((L - 1) / K)`.
    pub fn archive_divisor(&self) -> usize {
        self.segment_capacity - (self.segment_capacity - 1) / self.live_segments
    }

    /// Ranks up to this value receive one extra item per transfer:
    /// `(L - 1) mod K`.
    pub fn archive_modulo(&self) -> usize {
        (self.segment_capacity - 1) % self.live_segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = ChainConfig::default();
        assert_eq!(c.segment_capacity, 10);
        assert_eq!(c.live_segments, 3);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn archive_formula_defaults() {
        let c = ChainConfig::default();
        assert_eq!(c.archive_divisor(), 7);
        assert_eq!(c.archive_modulo(), 0);
    }

    #[test]
    fn archive_formula_small() {
        let c = ChainConfig::new(3, 2).unwrap();
        assert_eq!(c.archive_divisor(), 2);
        assert_eq!(c.archive_modulo(), 0);

        let c = ChainConfig::new(8, 3).unwrap();
        assert_eq!(c.archive_divisor(), 6);
        assert_eq!(c.archive_modulo(), 1);
    }

    #[test]
    fn zero_values_rejected() {
        assert!(matches!(
            ChainConfig::new(0, 3),
            Err(ChainError::InvalidConfig(_))
        ));
        assert!(matches!(
            ChainConfig::new(10, 0),
            Err(ChainError::InvalidConfig(_))
        ));
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let c: ChainConfig = toml::from_str("segment_capacity = 4").unwrap();
        assert_eq!(c.segment_capacity, 4);
        assert_eq!(c.live_segments, DEFAULT_LIVE_SEGMENTS);
    }
}
