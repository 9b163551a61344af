//! Sampler configuration

use thiserror::Error;

/// Errors raised when building a sampler
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SamplerError {
    #[error("Invalid sampler configuration: {0}")]
    InvalidConfig(String),
}

pub type SamplerResult<T> = Result<T, SamplerError>;

/// Sampler configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SamplerConfig {
    /// Maximum number of sampled edges (`k`)
    pub max_samples: usize,
    /// Relative size of the waiting room, in `[0, 1)`
    pub alpha: f64,
    /// Seed of the sampler's random source; drawn at random when unset
    pub seed: Option<u64>,
    /// Clamp counters at zero on deletions (fully dynamic sampler only)
    pub lower_bound: bool,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            max_samples: 35_000,
            alpha: 0.1,
            seed: None,
            lower_bound: true,
        }
    }
}

impl SamplerConfig {
    pub fn new(max_samples: usize, alpha: f64) -> Self {
        Self {
            max_samples,
            alpha,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_lower_bound(mut self, lower_bound: bool) -> Self {
        self.lower_bound = lower_bound;
        self
    }

    /// Check `k >= 2` and `alpha` in `[0, 1)`
    pub fn validate(&self) -> SamplerResult<()> {
        if self.max_samples < 2 {
            return Err(SamplerError::InvalidConfig(format!(
                "maximum number of samples must be at least 2, got {}",
                self.max_samples
            )));
        }
        if !self.alpha.is_finite() || !(0.0..1.0).contains(&self.alpha) {
            return Err(SamplerError::InvalidConfig(format!(
                "waiting room fraction must be in [0, 1), got {}",
                self.alpha
            )));
        }
        Ok(())
    }

    /// The configured seed, or a fresh random one
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }

    /// `floor(k * alpha)`
    pub fn waiting_room_capacity(&self) -> usize {
        (self.max_samples as f64 * self.alpha).floor() as usize
    }

    /// `k - floor(k * alpha)`, at least 1 for a valid config
    pub fn reservoir_capacity(&self) -> usize {
        self.max_samples - self.waiting_room_capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacities_split_budget() {
        let config = SamplerConfig::new(35_000, 0.1);
        assert_eq!(config.waiting_room_capacity(), 3_500);
        assert_eq!(config.reservoir_capacity(), 31_500);

        let config = SamplerConfig::new(10, 0.0);
        assert_eq!(config.waiting_room_capacity(), 0);
        assert_eq!(config.reservoir_capacity(), 10);

        let config = SamplerConfig::new(2, 0.99);
        assert_eq!(config.waiting_room_capacity(), 1);
        assert_eq!(config.reservoir_capacity(), 1);
    }

    #[test]
    fn test_seed_resolution() {
        assert_eq!(SamplerConfig::default().seed, None);
        assert_eq!(SamplerConfig::new(10, 0.1).with_seed(4).resolve_seed(), 4);
    }

    #[test]
    fn test_validate_rejects_bad_parameters() {
        assert!(SamplerConfig::new(2, 0.5).validate().is_ok());
        assert!(SamplerConfig::new(1, 0.5).validate().is_err());
        assert!(SamplerConfig::new(10, 1.0).validate().is_err());
        assert!(SamplerConfig::new(10, -0.1).validate().is_err());
        assert!(SamplerConfig::new(10, f64::NAN).validate().is_err());
    }
}
