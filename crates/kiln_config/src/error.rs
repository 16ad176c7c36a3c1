//! Error types for configuration loading and validation.

/// Errors that can occur when loading or validating a `kiln.toml` configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading `kiln.toml`.
    #[error("failed to read kiln.toml: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse kiln.toml: {0}")]
    ParseError(String),

    /// A required field is missing or empty.
    #[error("kiln.toml is missing required field {0}")]
    MissingField(String),

    /// A configuration value failed validation.
    #[error("invalid kiln.toml: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use crate::load_config_from_str;

    fn message(toml: &str) -> String {
        load_config_from_str(toml).unwrap_err().to_string()
    }

    #[test]
    fn engine_outside_data_dir_names_the_engine() {
        let toml = r#"
[engine]
name = "../escape"
"#;
        assert_eq!(
            message(toml),
            "invalid kiln.toml: engine.name '../escape' must be a single directory name"
        );
    }

    #[test]
    fn skip_policy_with_missing_inputs_is_explained() {
        let toml = r#"
[build]
skip = ["input_missing"]
"#;
        assert_eq!(
            message(toml),
            "invalid kiln.toml: build.skip cannot name input_missing; missing inputs are never built"
        );
    }

    #[test]
    fn empty_shader_input_names_its_index() {
        let toml = r#"
[[shaders]]
input = "a.sc"
stage = "vertex"

[[shaders]]
input = ""
stage = "fragment"
"#;
        assert_eq!(
            message(toml),
            "kiln.toml is missing required field shaders[1].input"
        );
    }

    #[test]
    fn explicit_output_with_variants_is_rejected() {
        let toml = r#"
[[shaders]]
input = "a.sc"
stage = "vertex"
output = "a.bin"
variants = ["SKINNED", "INSTANCED"]
"#;
        assert_eq!(
            message(toml),
            "invalid kiln.toml: shaders[0] sets an explicit output but lists 2 variants"
        );
    }

    #[test]
    fn parse_error_mentions_kiln_toml() {
        assert!(message("[engine").starts_with("failed to parse kiln.toml:"));
    }
}
