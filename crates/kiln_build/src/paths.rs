//! Output naming conventions for compiled artifacts.

use std::path::{Path, PathBuf};

/// Extension of compiled shader binaries.
pub const SHADER_OUTPUT_EXTENSION: &str = "bin";

/// Extension of compressed textures.
pub const TEXTURE_OUTPUT_EXTENSION: &str = "dds";

/// Returns `<root>/<stem>[_<variant>].bin` for a shader source.
///
/// The default permutation (no variant, or an empty one) has no suffix.
pub fn shader_output_path(root: &Path, input: &Path, variant: Option<&str>) -> PathBuf {
    let mut name = file_stem(input);
    if let Some(variant) = variant.filter(|v| !v.is_empty()) {
        name.push('_');
        name.push_str(variant);
    }
    name.push('.');
    name.push_str(SHADER_OUTPUT_EXTENSION);
    root.join(name)
}

/// Returns `<root>/<stem>.dds` for a texture source.
pub fn texture_output_path(root: &Path, input: &Path) -> PathBuf {
    root.join(format!("{}.{TEXTURE_OUTPUT_EXTENSION}", file_stem(input)))
}

fn file_stem(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
