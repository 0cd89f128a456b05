//! Binding configuration.

/// How host modules are attached to guest calls.
///
/// With the `serde` feature this can be deserialized from the embedding
/// application's own configuration; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct BindingConfig {
    /// Name of the guest export that holds its linear memory.
    pub memory_export: String,
    /// Turn an error recorded during a call into a trap instead of logging
    /// it and returning the best-effort result.
    pub trap_on_error: bool,
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            memory_export: "memory".to_string(),
            trap_on_error: false,
        }
    }
}

impl BindingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn memory_export(mut self, name: impl Into<String>) -> Self {
        self.memory_export = name.into();
        self
    }

    pub fn trap_on_error(mut self, trap: bool) -> Self {
        self.trap_on_error = trap;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_standard_memory_export() {
        let config = BindingConfig::new();
        assert_eq!(config.memory_export, "memory");
        assert!(!config.trap_on_error);
        assert!(config.trap_on_error(true).trap_on_error);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_config_deserializes() -> Result<(), serde_json::Error> {
        let config: BindingConfig = serde_json::from_str(r#"{"trap_on_error": true}"#)?;
        assert_eq!(
            config,
            BindingConfig {
                memory_export: "memory".to_string(),
                trap_on_error: true,
            }
        );
        Ok(())
    }
}
