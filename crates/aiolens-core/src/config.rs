//! Analysis configuration

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// Percent weight given to the AIO side when blending scores (0-100)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Balance(u8);

impl Balance {
    pub const DEFAULT: Balance = Balance(50);

    pub fn new(value: i64) -> Result<Self> {
        if (0..=100).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(AnalysisError::InvalidBalance(value))
        }
    }

    /// Percent weight on AIO
    pub fn aio_percent(self) -> u8 {
        self.0
    }

    /// Weight applied to the SEO total, `(100 - balance) / 100`
    pub fn seo_weight(self) -> f64 {
        f64::from(100 - self.0) / 100.0
    }

    /// Weight applied to the AIO total, `balance / 100`
    pub fn aio_weight(self) -> f64 {
        f64::from(self.0) / 100.0
    }
}

impl Default for Balance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<i64> for Balance {
    type Error = AnalysisError;

    fn try_from(value: i64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Balance> for u8 {
    fn from(balance: Balance) -> Self {
        balance.0
    }
}

/// Tunables for one analysis run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub balance: Balance,
}

impl AnalysisConfig {
    pub fn with_balance(balance: Balance) -> Self {
        Self { balance }
    }
}
