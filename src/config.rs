//! Run configuration.
//!
//! The optimizer is parameterized by a YAML document with three sections,
//! matching the layout consumed by the comparison driver:
//!
//! ```yaml
//! system:
//!   M: 4                  # access points
//!   K: 3                  # users
//!   N: 4                  # antennas per access point
//!   p_max_dbm: 30.0       # per-AP transmit power ceiling
//!   noise_power_dbm: -94.0
//!   bandwidth: 10.0e6     # Hz
//!
//! algorithm:
//!   pop_size: 30
//!   max_cycle: 100
//!   limit: 20             # stagnation limit before a scout reset
//!   psi: 1.0              # gbest attraction factor (guided variant)
//!
//! simulation:             # optional
//!   n_realizations: 1
//!   seed: 42
//! ```
//!
//! Validation happens once, up front: a config that passes [`Config::validate`]
//! cannot fail the optimizer mid-run.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::result::{Error, Result};

/// Physical system parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Number of access points.
    #[serde(rename = "M")]
    pub m: usize,
    /// Number of users.
    #[serde(rename = "K")]
    pub k: usize,
    /// Antennas per access point.
    #[serde(rename = "N")]
    pub n: usize,
    /// Per-AP transmit power ceiling in dBm.
    pub p_max_dbm: f64,
    /// Receiver noise power in dBm.
    pub noise_power_dbm: f64,
    /// System bandwidth in Hz. Not used by the rate formula (rates are in
    /// bit/s/Hz) but carried so consumers can scale to bit/s.
    pub bandwidth: f64,
}

/// Colony parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmConfig {
    /// Number of food sources (candidate solutions) maintained.
    pub pop_size: usize,
    /// Number of full employed/onlooker/scout/memorize cycles to run.
    pub max_cycle: usize,
    /// Trials without improvement before a scout resets an individual.
    pub limit: u32,
    /// Upper bound of the per-entry gbest attraction draw, typically in
    /// [0, 1.5]. Only the guided variant reads it.
    #[serde(default = "default_psi")]
    pub psi: f64,
}

fn default_psi() -> f64 {
    1.0
}

/// Monte-Carlo driver parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Independent channel realizations to average over.
    pub n_realizations: usize,
    /// Fixed RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> SimulationConfig {
        SimulationConfig {
            n_realizations: 1,
            seed: None,
        }
    }
}

/// Full run configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Physical system parameters.
    pub system: SystemConfig,
    /// Colony parameters.
    pub algorithm: AlgorithmConfig,
    /// Monte-Carlo driver parameters.
    #[serde(default)]
    pub simulation: SimulationConfig,
}

impl Config {
    /// Parses a configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Config> {
        let config: Config = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
        let text = fs::read_to_string(path)?;
        Config::from_yaml_str(&text)
    }

    /// Dimensions of the solution space as an `(M, K, N)` triple.
    pub fn dims(&self) -> (usize, usize, usize) {
        (self.system.m, self.system.k, self.system.n)
    }

    /// Rejects degenerate parameter values.
    ///
    /// Runs implicitly on every load; call it directly when building a
    /// `Config` in code.
    pub fn validate(&self) -> Result<()> {
        if self.system.m == 0 {
            return Err(Error::Config("M (access points) must be at least 1".into()));
        }
        if self.system.k == 0 {
            return Err(Error::Config("K (users) must be at least 1".into()));
        }
        if self.system.n == 0 {
            return Err(Error::Config("N (antennas per AP) must be at least 1".into()));
        }
        if self.system.bandwidth <= 0.0 {
            return Err(Error::Config("bandwidth must be positive".into()));
        }
        // Partner selection draws a second, distinct member.
        if self.algorithm.pop_size < 2 {
            return Err(Error::Config("pop_size must be at least 2".into()));
        }
        if self.algorithm.max_cycle == 0 {
            return Err(Error::Config("max_cycle must be at least 1".into()));
        }
        if self.algorithm.limit == 0 {
            return Err(Error::Config("limit must be at least 1".into()));
        }
        if !self.algorithm.psi.is_finite() || self.algorithm.psi < 0.0 {
            return Err(Error::Config("psi must be finite and non-negative".into()));
        }
        if self.simulation.n_realizations == 0 {
            return Err(Error::Config("n_realizations must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_yaml() -> &'static str {
        "
system:
  M: 4
  K: 3
  N: 4
  p_max_dbm: 30.0
  noise_power_dbm: -94.0
  bandwidth: 10.0e6

algorithm:
  pop_size: 30
  max_cycle: 100
  limit: 20
  psi: 1.0

simulation:
  n_realizations: 2
  seed: 42
"
    }

    #[test]
    fn parses_full_document() {
        let config = Config::from_yaml_str(base_yaml()).unwrap();
        assert_eq!(config.dims(), (4, 3, 4));
        assert_eq!(config.algorithm.pop_size, 30);
        assert_eq!(config.algorithm.limit, 20);
        assert_eq!(config.simulation.seed, Some(42));
    }

    #[test]
    fn simulation_section_is_optional() {
        let yaml = "
system: { M: 2, K: 2, N: 2, p_max_dbm: 30.0, noise_power_dbm: -90.0, bandwidth: 1.0e6 }
algorithm: { pop_size: 10, max_cycle: 5, limit: 3 }
";
        let config = Config::from_yaml_str(yaml).unwrap();
        assert_eq!(config.simulation.n_realizations, 1);
        assert_eq!(config.simulation.seed, None);
        // psi falls back to its default when the key is absent.
        assert_eq!(config.algorithm.psi, 1.0);
    }

    #[test]
    fn rejects_degenerate_values() {
        let mut config = Config::from_yaml_str(base_yaml()).unwrap();
        config.algorithm.pop_size = 1;
        assert!(config.validate().is_err());

        let mut config = Config::from_yaml_str(base_yaml()).unwrap();
        config.algorithm.max_cycle = 0;
        assert!(config.validate().is_err());

        let mut config = Config::from_yaml_str(base_yaml()).unwrap();
        config.system.n = 0;
        assert!(config.validate().is_err());

        let mut config = Config::from_yaml_str(base_yaml()).unwrap();
        config.algorithm.psi = -0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn parse_error_is_reported() {
        assert!(matches!(
            Config::from_yaml_str("system: ["),
            Err(crate::Error::Parse(_))
        ));
    }
}
