//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::KilnConfig;
use kiln_common::BuildStatus;
use std::path::Path;

/// File name of the project configuration.
pub const CONFIG_FILE_NAME: &str = "kiln.toml";

/// Loads and validates a `kiln.toml` configuration from a project directory.
///
/// Reads `<project_dir>/kiln.toml`, parses it, and validates the result.
pub fn load_config(project_dir: &Path) -> Result<KilnConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE_NAME);
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `kiln.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<KilnConfig, ConfigError> {
    let config: KilnConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that required fields are present and values are consistent.
fn validate_config(config: &KilnConfig) -> Result<(), ConfigError> {
    let engine = &config.engine.name;
    if engine.is_empty() {
        return Err(ConfigError::MissingField("engine.name".to_string()));
    }
    if engine.contains(['/', '\\']) || engine == "." || engine == ".." {
        return Err(ConfigError::ValidationError(format!(
            "engine.name '{engine}' must be a single directory name"
        )));
    }
    if config.shader.platform.is_empty() {
        return Err(ConfigError::MissingField("shader.platform".to_string()));
    }
    if config.build.skip.contains(BuildStatus::InputMissing) {
        return Err(ConfigError::ValidationError(
            "build.skip cannot name input_missing; missing inputs are never built".to_string(),
        ));
    }

    for (i, shader) in config.shaders.iter().enumerate() {
        if shader.input.is_empty() {
            return Err(ConfigError::MissingField(format!("shaders[{i}].input")));
        }
        if shader.output.is_some() && shader.variants.len() > 1 {
            return Err(ConfigError::ValidationError(format!(
                "shaders[{i}] sets an explicit output but lists {} variants",
                shader.variants.len()
            )));
        }
    }
    for (i, texture) in config.textures.iter().enumerate() {
        if texture.input.is_empty() {
            return Err(ConfigError::MissingField(format!("textures[{i}].input")));
        }
    }
    for (i, cubemap) in config.cubemaps.iter().enumerate() {
        if cubemap.input.is_empty() {
            return Err(ConfigError::MissingField(format!("cubemaps[{i}].input")));
        }
        if cubemap.output.is_empty() {
            return Err(ConfigError::MissingField(format!("cubemaps[{i}].output")));
        }
    }
    Ok(())
}
