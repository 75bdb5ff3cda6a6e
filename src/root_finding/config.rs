//! Simulation configuration.
//!
//! [`SimulationCfg`] — engine-wide settings
//! ├ `precision`  : decimal places used before the first `start`
//! ├ `resolution` : samples per [`IterationSnapshot`](super::report::IterationSnapshot)
//! └ `max_iter`   : default iteration cap for [`Simulation::run`](super::simulation::Simulation::run)
//!
//! `start` always receives its own precision; the configured one only
//! describes the state of a fresh, not-yet-started simulation.

use super::errors::ConfigError;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SimulationCfg {
    precision:  u32,
    resolution: usize,
    max_iter:   usize,
}

impl SimulationCfg {
    pub const DEFAULT_PRECISION:  u32   = 6;
    pub const DEFAULT_RESOLUTION: usize = 400;
    pub const DEFAULT_MAX_ITER:   usize = 100;

    #[must_use]
    pub fn new() -> Self { Self::default() }

    // getters
    #[inline] #[must_use] pub fn precision(&self)  -> u32   { self.precision }
    #[inline] #[must_use] pub fn resolution(&self) -> usize { self.resolution }
    #[inline] #[must_use] pub fn max_iter(&self)   -> usize { self.max_iter }

    pub fn set_precision(mut self, v: u32) -> Self { self.precision = v; self }

    pub fn set_resolution(mut self, v: usize) -> Result<Self, ConfigError> {
        if v < 2 {
            return Err(ConfigError::InvalidResolution { got: v });
        }
        self.resolution = v;
        Ok(self)
    }

    pub fn set_max_iter(mut self, v: usize) -> Result<Self, ConfigError> {
        if v == 0 {
            return Err(ConfigError::InvalidMaxIter { got: v });
        }
        self.max_iter = v;
        Ok(self)
    }
}

impl Default for SimulationCfg {
    fn default() -> Self {
        Self {
            precision:  Self::DEFAULT_PRECISION,
            resolution: Self::DEFAULT_RESOLUTION,
            max_iter:   Self::DEFAULT_MAX_ITER,
        }
    }
}
