//! Navigation configuration.
//!
//! Loaded once at bootstrap, usually from a TOML table:
//!
//! ```toml
//! animated = true
//! diagnostics_capacity = 64
//!
//! [sheet]
//! detents = ["medium", "large"]
//! prefers_grabber_visible = false
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::presentation::SheetConfig;

/// Default for [`NavConfig::animated`].
pub const DEFAULT_ANIMATED: bool = true;

/// Default for [`NavConfig::diagnostics_capacity`].
pub const DEFAULT_DIAGNOSTICS_CAPACITY: usize = 64;

/// Host-wide navigation settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Whether stack changes and presentations ask the host to animate
    pub animated: bool,
    /// Entries retained by the diagnostic channel
    pub diagnostics_capacity: usize,
    /// Sheet options used by `present_sheet` when none are given
    pub sheet: SheetConfig,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            animated: DEFAULT_ANIMATED,
            diagnostics_capacity: DEFAULT_DIAGNOSTICS_CAPACITY,
            sheet: SheetConfig::default(),
        }
    }
}

impl NavConfig {
    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: NavConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }

    /// Check the constraints serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.diagnostics_capacity == 0 {
            return Err(ConfigError::Invalid(
                "diagnostics_capacity must be at least 1".to_string(),
            ));
        }
        if self.sheet.detents.is_empty() {
            return Err(ConfigError::Invalid(
                "sheet.detents must list at least one detent".to_string(),
            ));
        }
        Ok(())
    }

    /// Disable animations (tests, reduced-motion hosts).
    pub fn without_animation(mut self) -> Self {
        self.animated = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::Detent;

    #[test]
    fn test_empty_document_gives_defaults() {
        assert_eq!(NavConfig::from_toml_str("").unwrap(), NavConfig::default());
    }

    #[test]
    fn test_partial_document() {
        let config = NavConfig::from_toml_str(
            r#"
            animated = false

            [sheet]
            detents = ["large", { height = 320 }]
            prefers_grabber_visible = true
            "#,
        )
        .unwrap();
        assert!(!config.animated);
        assert_eq!(config.sheet.detents, vec![Detent::Large, Detent::Height(320)]);
        assert!(config.sheet.prefers_grabber_visible);
        assert_eq!(config.diagnostics_capacity, DEFAULT_DIAGNOSTICS_CAPACITY);
    }

    #[test]
    fn test_round_trip() {
        let config = NavConfig::default().without_animation();
        let text = config.to_toml_string().unwrap();
        assert_eq!(NavConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let err = NavConfig::from_toml_str("diagnostics_capacity = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_empty_detents() {
        let err = NavConfig::from_toml_str("[sheet]\ndetents = []").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_unknown_detent() {
        let err = NavConfig::from_toml_str("[sheet]\ndetents = [\"tiny\"]").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
