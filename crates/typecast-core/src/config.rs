//! Engine construction options

use serde::{Deserialize, Serialize};

/// Which built-in registries a new engine starts with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Install the standard converter set
    pub install_builtin_converters: bool,
    /// Install the standard validation rules
    pub install_builtin_rules: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            install_builtin_converters: true,
            install_builtin_rules: true,
        }
    }
}

impl EngineConfig {
    /// Start with empty registries
    pub fn bare() -> Self {
        Self {
            install_builtin_converters: false,
            install_builtin_rules: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default_to_true() {
        let config: EngineConfig = serde_json::from_str(r#"{"install_builtin_rules": false}"#).unwrap();
        assert!(config.install_builtin_converters);
        assert!(!config.install_builtin_rules);
    }
}
