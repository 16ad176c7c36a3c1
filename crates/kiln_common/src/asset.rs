//! Asset kinds and the semantic roles that drive tool flags.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The pipeline stage a shader source compiles for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShaderStage {
    /// Vertex shader.
    Vertex,
    /// Fragment (pixel) shader.
    Fragment,
    /// Compute shader.
    Compute,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
            ShaderStage::Compute => "compute",
        })
    }
}

/// The material slot a texture fills.
///
/// Only [`TextureRole::BaseColor`] holds display-encoded color data; normal
/// maps get their own compression mode and every other role is linear.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureRole {
    /// Albedo / diffuse color.
    BaseColor,
    /// Tangent-space normal map.
    Normal,
    /// Ambient occlusion.
    Occlusion,
    /// Surface roughness.
    Roughness,
    /// Metalness.
    Metallic,
    /// Emissive color.
    Emissive,
    /// Terrain height data.
    Elevation,
}

impl TextureRole {
    /// Returns `true` if texels hold gamma-encoded color rather than data.
    pub fn is_display_encoded(self) -> bool {
        self == TextureRole::BaseColor
    }
}

impl fmt::Display for TextureRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TextureRole::BaseColor => "base_color",
            TextureRole::Normal => "normal",
            TextureRole::Occlusion => "occlusion",
            TextureRole::Roughness => "roughness",
            TextureRole::Metallic => "metallic",
            TextureRole::Emissive => "emissive",
            TextureRole::Elevation => "elevation",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_base_color_is_display_encoded() {
        assert!(TextureRole::BaseColor.is_display_encoded());
        for role in [
            TextureRole::Normal,
            TextureRole::Occlusion,
            TextureRole::Roughness,
            TextureRole::Metallic,
            TextureRole::Emissive,
            TextureRole::Elevation,
        ] {
            assert!(!role.is_display_encoded(), "{role} should be linear");
        }
    }

    #[test]
    fn serde_names_match_display() {
        let role: TextureRole = serde_json::from_str(r#""base_color""#).unwrap();
        assert_eq!(role, TextureRole::BaseColor);
        assert_eq!(role.to_string(), "base_color");

        let stage: ShaderStage = serde_json::from_str(r#""fragment""#).unwrap();
        assert_eq!(stage, ShaderStage::Fragment);
        assert_eq!(stage.to_string(), "fragment");
    }
}
