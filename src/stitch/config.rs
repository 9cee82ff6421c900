//! Pipeline configuration.

use serde::{Deserialize, Serialize};

use super::error::StitchError;

/// Window and overlap settings for one pipeline run.
///
/// Missing keys take their defaults when deserialized, so a JSON document
/// only needs the values it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StitchConfig {
    /// Longest sub-sequence sent to the predictor in one request.
    pub max_window: usize,
    /// Residues shared by adjacent interior windows.
    pub min_overlap: usize,
    /// Overlap used when chunk positions leave no overlap at all.
    pub fallback_overlap: usize,
    /// Overlap assumed when chunk positions are unknown.
    pub estimated_overlap: usize,
    /// Fit a pure translation instead of failing on overlaps too small or
    /// flat for a rotation fit.
    pub translation_fallback: bool,
}

impl Default for StitchConfig {
    fn default() -> Self {
        Self {
            max_window: 400,
            min_overlap: 50,
            fallback_overlap: 10,
            estimated_overlap: 50,
            translation_fallback: false,
        }
    }
}

impl StitchConfig {
    pub fn new(max_window: usize, min_overlap: usize) -> Self {
        Self {
            max_window,
            min_overlap,
            ..Default::default()
        }
    }

    /// Load from a JSON document and validate.
    pub fn from_json_str(json: &str) -> Result<Self, StitchError> {
        let config: StitchConfig = serde_json::from_str(json)
            .map_err(|e| StitchError::InvalidConfig(format!("could not parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), StitchError> {
        if self.min_overlap < 1 {
            return Err(StitchError::InvalidConfig(
                "min_overlap must be at least 1".to_string(),
            ));
        }
        if self.max_window <= self.min_overlap {
            return Err(StitchError::InvalidConfig(format!(
                "max_window ({}) must exceed min_overlap ({})",
                self.max_window, self.min_overlap
            )));
        }
        if self.fallback_overlap < 1 || self.estimated_overlap < 1 {
            return Err(StitchError::InvalidConfig(
                "fallback_overlap and estimated_overlap must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(StitchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_from_json_partial_override() {
        let config = StitchConfig::from_json_str(r#"{"max_window": 256, "min_overlap": 32}"#)
            .unwrap();
        assert_eq!(config.max_window, 256);
        assert_eq!(config.min_overlap, 32);
        assert_eq!(config.fallback_overlap, 10);
        assert!(!config.translation_fallback);
    }

    #[test]
    fn test_validate_rejects_bad_windows() {
        assert!(matches!(
            StitchConfig::new(50, 50).validate(),
            Err(StitchError::InvalidConfig(_))
        ));
        assert!(matches!(
            StitchConfig::new(50, 0).validate(),
            Err(StitchError::InvalidConfig(_))
        ));
        assert!(StitchConfig::from_json_str("{not json").is_err());
    }
}
