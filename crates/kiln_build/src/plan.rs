//! Expansion of the `kiln.toml` asset manifest into build requests.

use std::fmt;
use std::path::{Path, PathBuf};

use kiln_common::{ShaderStage, TextureRole};
use kiln_config::{resolve_path, KilnConfig, ResolvedPaths};

use crate::paths::{shader_output_path, texture_output_path};

/// One (input, output) pair to hand to the builder, with the asset kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetRequest {
    /// A shader permutation.
    Shader {
        /// Pipeline stage.
        stage: ShaderStage,
        /// Shader source.
        input: PathBuf,
        /// Compiled binary.
        output: PathBuf,
        /// Uber option define, `None` for the default permutation.
        variant: Option<String>,
    },
    /// A texture to compress.
    Texture {
        /// Material slot.
        role: TextureRole,
        /// Source image.
        input: PathBuf,
        /// Compressed texture.
        output: PathBuf,
    },
    /// An environment map to filter.
    Cubemap {
        /// Source environment map.
        input: PathBuf,
        /// Filtered radiance cubemap.
        output: PathBuf,
    },
}

impl AssetRequest {
    /// The source asset.
    pub fn input(&self) -> &Path {
        match self {
            AssetRequest::Shader { input, .. }
            | AssetRequest::Texture { input, .. }
            | AssetRequest::Cubemap { input, .. } => input,
        }
    }

    /// The artifact the tool writes.
    pub fn output(&self) -> &Path {
        match self {
            AssetRequest::Shader { output, .. }
            | AssetRequest::Texture { output, .. }
            | AssetRequest::Cubemap { output, .. } => output,
        }
    }

    /// Short asset kind name used in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            AssetRequest::Shader { .. } => "shader",
            AssetRequest::Texture { .. } => "texture",
            AssetRequest::Cubemap { .. } => "cubemap",
        }
    }
}

impl fmt::Display for AssetRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetRequest::Shader {
                stage,
                input,
                variant: Some(variant),
                ..
            } => write!(f, "{stage} shader {} [{variant}]", input.display()),
            AssetRequest::Shader { stage, input, .. } => {
                write!(f, "{stage} shader {}", input.display())
            }
            AssetRequest::Texture { role, input, .. } => {
                write!(f, "{role} texture {}", input.display())
            }
            AssetRequest::Cubemap { input, .. } => write!(f, "cubemap {}", input.display()),
        }
    }
}

/// Every request named by a project manifest, in manifest order:
/// shaders, then textures, then cubemaps.
#[derive(Debug, Clone, Default)]
pub struct BuildPlan {
    requests: Vec<AssetRequest>,
}

impl BuildPlan {
    /// Expands the manifest, resolving paths against the project root.
    ///
    /// A shader with no variants, or with an empty variant, yields the
    /// default permutation. Outputs not given explicitly follow the
    /// naming conventions in [`crate::paths`].
    pub fn from_config(config: &KilnConfig, paths: &ResolvedPaths) -> Self {
        let mut requests = Vec::new();

        for shader in &config.shaders {
            let input = resolve_path(&paths.root, &shader.input);
            let variants: Vec<Option<&str>> = if shader.variants.is_empty() {
                vec![None]
            } else {
                shader
                    .variants
                    .iter()
                    .map(|v| Some(v.as_str()).filter(|v| !v.is_empty()))
                    .collect()
            };
            for variant in variants {
                let output = match &shader.output {
                    Some(output) => resolve_path(&paths.root, output),
                    None => shader_output_path(&paths.shader_output_dir, &input, variant),
                };
                requests.push(AssetRequest::Shader {
                    stage: shader.stage,
                    input: input.clone(),
                    output,
                    variant: variant.map(str::to_string),
                });
            }
        }

        for texture in &config.textures {
            let input = resolve_path(&paths.root, &texture.input);
            let output = match &texture.output {
                Some(output) => resolve_path(&paths.root, output),
                None => texture_output_path(&paths.texture_output_dir, &input),
            };
            requests.push(AssetRequest::Texture {
                role: texture.role,
                input,
                output,
            });
        }

        for cubemap in &config.cubemaps {
            requests.push(AssetRequest::Cubemap {
                input: resolve_path(&paths.root, &cubemap.input),
                output: resolve_path(&paths.root, &cubemap.output),
            });
        }

        Self { requests }
    }

    /// The requests in order.
    pub fn requests(&self) -> &[AssetRequest] {
        &self.requests
    }

    /// Number of requests.
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Returns `true` if the manifest names no assets.
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}
