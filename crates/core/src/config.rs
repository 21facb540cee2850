use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Tunables for an engine instance. Every field has a default so partial
/// JSON files are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum simulated RGB distance for two colors to count as distinguishable
    pub distinguish_threshold: f64,
    /// Entries kept by each CVD simulator cache (0 disables caching)
    pub cvd_cache_capacity: usize,
    /// Candidates tried per slot by the accessible palette generator before falling back
    pub palette_max_attempts: usize,
    /// Tint generated grays with the primary hue instead of pure neutrals
    pub gray_mix_primary: bool,
    /// Perceived brightness below which a color is treated as dark
    pub dark_text_threshold: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            distinguish_threshold: 20.0,
            cvd_cache_capacity: 4096,
            palette_max_attempts: 12,
            gray_mix_primary: false,
            dark_text_threshold: 128,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.distinguish_threshold.is_finite() || self.distinguish_threshold < 0.0 {
            anyhow::bail!(
                "distinguish_threshold {} must be a non-negative number",
                self.distinguish_threshold
            );
        }
        if self.palette_max_attempts == 0 {
            anyhow::bail!("palette_max_attempts must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{ "distinguish_threshold": 35.5 }"#).unwrap();
        assert_eq!(config.distinguish_threshold, 35.5);
        assert_eq!(config.cvd_cache_capacity, 4096);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_attempts() {
        let config: EngineConfig = serde_json::from_str(r#"{ "palette_max_attempts": 0 }"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_negative_threshold() {
        let config = EngineConfig {
            distinguish_threshold: -1.0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
