//! Store configuration parameters.

use std::error::Error;
use std::fmt;

/// Configuration for a [`SparseRowArray`](crate::SparseRowArray).
///
/// Controls row padding and the fixed-block growth of the three flat
/// buffers. Validated at construction; immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    /// Padding unit, in slots.
    ///
    /// Every present row is given space rounded up to a multiple of this
    /// value (minimum one unit), so a run of single-slot pushes only
    /// stretches the row once per unit. Default: 16. Must be non-zero.
    pub pad_unit: usize,

    /// Growth block of the data buffer, in slots.
    ///
    /// The data buffer grows by whole blocks rather than by doubling.
    /// Default: 10_000 (40 KB of 32-bit codes). Must be non-zero.
    pub data_growth_step: usize,

    /// Growth block of the index and length tables, in rows.
    ///
    /// Default: 10_000. Must be non-zero.
    pub row_growth_step: usize,

    /// Data buffer capacity allocated at construction, in slots.
    pub initial_data_capacity: usize,

    /// Index and length table capacity allocated at construction, in rows.
    pub initial_row_capacity: usize,
}

impl StoreConfig {
    /// Default padding unit.
    pub const DEFAULT_PAD_UNIT: usize = 16;

    /// Default data buffer growth block.
    pub const DEFAULT_DATA_GROWTH_STEP: usize = 10_000;

    /// Default index/length table growth block.
    pub const DEFAULT_ROW_GROWTH_STEP: usize = 10_000;

    /// Default initial data capacity.
    pub const DEFAULT_INITIAL_DATA_CAPACITY: usize = 10_000;

    /// Default initial row capacity.
    pub const DEFAULT_INITIAL_ROW_CAPACITY: usize = 10_000;

    /// Create a config with default values for every parameter.
    pub fn new() -> Self {
        Self {
            pad_unit: Self::DEFAULT_PAD_UNIT,
            data_growth_step: Self::DEFAULT_DATA_GROWTH_STEP,
            row_growth_step: Self::DEFAULT_ROW_GROWTH_STEP,
            initial_data_capacity: Self::DEFAULT_INITIAL_DATA_CAPACITY,
            initial_row_capacity: Self::DEFAULT_INITIAL_ROW_CAPACITY,
        }
    }

    /// Check the structural invariants of this config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pad_unit == 0 {
            return Err(ConfigError::ZeroPadUnit);
        }
        if self.data_growth_step == 0 {
            return Err(ConfigError::ZeroGrowthStep { buffer: "data" });
        }
        if self.row_growth_step == 0 {
            return Err(ConfigError::ZeroGrowthStep { buffer: "row" });
        }
        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors detected by [`StoreConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `pad_unit` is zero.
    ZeroPadUnit,
    /// A growth step is zero.
    ZeroGrowthStep {
        /// Which buffer family the step belongs to (`"data"` or `"row"`).
        buffer: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroPadUnit => write!(f, "pad_unit must be at least 1"),
            Self::ZeroGrowthStep { buffer } => {
                write!(f, "{buffer} growth step must be at least 1")
            }
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert_eq!(StoreConfig::default().validate(), Ok(()));
        assert_eq!(StoreConfig::default().pad_unit, 16);
    }

    #[test]
    fn zero_pad_unit_rejected() {
        let config = StoreConfig {
            pad_unit: 0,
            ..StoreConfig::new()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroPadUnit));
    }

    #[test]
    fn zero_growth_steps_rejected() {
        let data = StoreConfig {
            data_growth_step: 0,
            ..StoreConfig::new()
        };
        assert_eq!(
            data.validate(),
            Err(ConfigError::ZeroGrowthStep { buffer: "data" })
        );

        let rows = StoreConfig {
            row_growth_step: 0,
            ..StoreConfig::new()
        };
        let err = rows.validate().unwrap_err();
        assert_eq!(err.to_string(), "row growth step must be at least 1");
    }

    #[test]
    fn zero_initial_capacity_is_valid() {
        let config = StoreConfig {
            initial_data_capacity: 0,
            initial_row_capacity: 0,
            ..StoreConfig::new()
        };
        assert!(config.validate().is_ok());
    }
}
