//! Path resolution: anchoring relative `kiln.toml` paths at the project root.

use crate::types::KilnConfig;
use std::path::{Path, PathBuf};

/// Project directories with every relative path joined onto the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    /// The directory containing `kiln.toml`.
    pub root: PathBuf,
    /// Directory holding the external tool binaries.
    pub tools_dir: PathBuf,
    /// Root directory for compiled shader binaries.
    pub shader_output_dir: PathBuf,
    /// Root directory for compressed textures.
    pub texture_output_dir: PathBuf,
    /// Explicit cache file, if the configuration overrides the default.
    pub cache_path: Option<PathBuf>,
}

/// Resolves every configured directory against `root`.
///
/// Absolute paths in the configuration are kept as they are.
pub fn resolve_paths(config: &KilnConfig, root: &Path) -> ResolvedPaths {
    ResolvedPaths {
        root: root.to_path_buf(),
        tools_dir: resolve_path(root, &config.tools.dir),
        shader_output_dir: resolve_path(root, &config.shader.output_dir),
        texture_output_dir: resolve_path(root, &config.texture.output_dir),
        cache_path: config.cache.path.as_deref().map(|p| resolve_path(root, p)),
    }
}

/// Joins `path` onto `root` unless it is already absolute.
pub fn resolve_path(root: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_from_str;

    #[test]
    fn defaults_are_under_root() {
        let config = load_config_from_str("").unwrap();
        let resolved = resolve_paths(&config, Path::new("/work/game"));
        assert_eq!(resolved.tools_dir, PathBuf::from("/work/game/tools"));
        assert_eq!(
            resolved.shader_output_dir,
            PathBuf::from("/work/game/build/shaders")
        );
        assert_eq!(
            resolved.texture_output_dir,
            PathBuf::from("/work/game/build/textures")
        );
        assert!(resolved.cache_path.is_none());
    }

    #[test]
    fn cache_override_is_resolved() {
        let toml = r#"
[cache]
path = ".kiln/stamps.bin"
"#;
        let config = load_config_from_str(toml).unwrap();
        let resolved = resolve_paths(&config, Path::new("/work/game"));
        assert_eq!(
            resolved.cache_path,
            Some(PathBuf::from("/work/game/.kiln/stamps.bin"))
        );
    }

    #[test]
    fn absolute_paths_pass_through() {
        let absolute = std::env::temp_dir().join("kiln-tools");
        let resolved = resolve_path(Path::new("/work/game"), absolute.to_str().unwrap());
        assert_eq!(resolved, absolute);
    }
}
