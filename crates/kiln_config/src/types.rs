//! Configuration types deserialized from `kiln.toml`.

use kiln_common::{ShaderStage, SkipPolicy, TextureRole};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};

/// The top-level configuration parsed from `kiln.toml`.
///
/// Every section is optional; an empty file yields a usable configuration
/// with the default tool names, output directories, and skip policy.
#[derive(Debug, Default, Deserialize)]
pub struct KilnConfig {
    /// Engine identity (names the cache subdirectory).
    #[serde(default)]
    pub engine: EngineConfig,
    /// External tool locations.
    #[serde(default)]
    pub tools: ToolsConfig,
    /// Shader compilation settings.
    #[serde(default)]
    pub shader: ShaderConfig,
    /// Texture compression settings.
    #[serde(default)]
    pub texture: TextureConfig,
    /// Stamp cache location and encoding.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Build policy (skip set, tool failure handling).
    #[serde(default)]
    pub build: BuildConfig,
    /// Shader sources to build with `kiln build`.
    #[serde(default)]
    pub shaders: Vec<ShaderAsset>,
    /// Texture sources to build with `kiln build`.
    #[serde(default)]
    pub textures: Vec<TextureAsset>,
    /// Environment maps to filter with `kiln build`.
    #[serde(default)]
    pub cubemaps: Vec<CubemapAsset>,
}

/// Engine identity.
#[derive(Debug, Deserialize)]
pub struct EngineConfig {
    /// Engine name; the cache lives at `<data dir>/<name>/modifyTimeCache.bin`.
    #[serde(default = "default_engine_name")]
    pub name: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name: default_engine_name(),
        }
    }
}

fn default_engine_name() -> String {
    "Kiln".to_string()
}

/// Locations of the external compiler tools.
///
/// Executables resolve to `<dir>/<name>` plus the platform executable suffix.
#[derive(Debug, Deserialize)]
pub struct ToolsConfig {
    /// Directory holding the tool binaries, relative to the project root.
    #[serde(default = "default_tools_dir")]
    pub dir: String,
    /// Shader compiler executable name.
    #[serde(default = "default_shader_compiler")]
    pub shader_compiler: String,
    /// Texture compressor executable name.
    #[serde(default = "default_texture_compiler")]
    pub texture_compiler: String,
    /// Cubemap filter executable name.
    #[serde(default = "default_cubemap_filter")]
    pub cubemap_filter: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            dir: default_tools_dir(),
            shader_compiler: default_shader_compiler(),
            texture_compiler: default_texture_compiler(),
            cubemap_filter: default_cubemap_filter(),
        }
    }
}

fn default_tools_dir() -> String {
    "tools".to_string()
}

fn default_shader_compiler() -> String {
    "shaderc".to_string()
}

fn default_texture_compiler() -> String {
    "texturec".to_string()
}

fn default_cubemap_filter() -> String {
    "cmft".to_string()
}

/// Shader compilation settings.
#[derive(Debug, Deserialize)]
pub struct ShaderConfig {
    /// Target platform passed to `--platform` (defaults to the host).
    #[serde(default = "default_platform")]
    pub platform: String,
    /// Root directory for compiled shader binaries.
    #[serde(default = "default_shader_output_dir")]
    pub output_dir: String,
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self {
            platform: default_platform(),
            output_dir: default_shader_output_dir(),
        }
    }
}

fn default_platform() -> String {
    host_platform().to_string()
}

fn default_shader_output_dir() -> String {
    "build/shaders".to_string()
}

/// Returns the shader compiler's name for the platform Kiln is running on.
pub fn host_platform() -> &'static str {
    match std::env::consts::OS {
        "macos" => "osx",
        "windows" => "windows",
        "android" => "android",
        "ios" => "ios",
        _ => "linux",
    }
}

/// Texture compression settings.
#[derive(Debug, Deserialize)]
pub struct TextureConfig {
    /// Root directory for compressed textures.
    #[serde(default = "default_texture_output_dir")]
    pub output_dir: String,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            output_dir: default_texture_output_dir(),
        }
    }
}

fn default_texture_output_dir() -> String {
    "build/textures".to_string()
}

/// Stamp cache location and encoding.
#[derive(Debug, Default, Deserialize)]
pub struct CacheConfig {
    /// Explicit cache file path, overriding the per-user data directory.
    #[serde(default)]
    pub path: Option<String>,
    /// On-disk encoding of the cache.
    #[serde(default)]
    pub format: CacheFormatKind,
}

/// On-disk encoding of the stamp cache.
#[derive(Debug, Default, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CacheFormatKind {
    /// `path=timestamp` lines (default).
    #[default]
    Text,
    /// Checksummed length-prefixed records.
    Binary,
}

/// Build policy.
#[derive(Debug, Default, Deserialize)]
pub struct BuildConfig {
    /// Statuses that suppress task creation (default `["stable"]`).
    #[serde(default)]
    pub skip: SkipPolicy,
    /// Stop the drain at the first tool that exits non-zero.
    ///
    /// When `false` the failure is logged, the input is left uncommitted so
    /// it is retried next run, and the remaining tasks still run.
    #[serde(default)]
    pub fail_on_tool_error: bool,
}

/// A shader source listed in the project manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct ShaderAsset {
    /// Path to the shader source, relative to the project root.
    pub input: String,
    /// Pipeline stage.
    pub stage: ShaderStage,
    /// Uber option variants to compile, as a string or a list. An empty
    /// entry (or no entry at all) compiles the default permutation.
    #[serde(default, deserialize_with = "deserialize_string_or_vec")]
    pub variants: Vec<String>,
    /// Explicit output path; only valid with at most one variant.
    #[serde(default)]
    pub output: Option<String>,
}

/// A texture source listed in the project manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct TextureAsset {
    /// Path to the source image, relative to the project root.
    pub input: String,
    /// Material slot the texture fills.
    pub role: TextureRole,
    /// Explicit output path; defaults to `<texture.output_dir>/<stem>.dds`.
    #[serde(default)]
    pub output: Option<String>,
}

/// An environment map listed in the project manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct CubemapAsset {
    /// Path to the source environment map, relative to the project root.
    pub input: String,
    /// Path of the filtered cubemap.
    pub output: String,
}

/// Deserializes a field that can be either a single string or a list of strings.
///
/// Allows `variants = "ALBEDO"` as well as `variants = ["", "ALBEDO"]`.
fn deserialize_string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut vec = Vec::new();
            while let Some(val) = seq.next_element::<String>()? {
                vec.push(val);
            }
            Ok(vec)
        }
    }

    deserializer.deserialize_any(StringOrVec)
}
