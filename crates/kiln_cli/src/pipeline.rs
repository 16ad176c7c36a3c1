//! Shared pipeline helpers for CLI commands.
//!
//! Contains project root resolution, configuration loading, and builder
//! construction used by every command.

use std::path::{Path, PathBuf};

use kiln_build::{open_cache, BuilderOptions, ResourceBuilder};
use kiln_cache::BuildCache;
use kiln_common::SkipPolicy;
use kiln_config::{load_config_from_str, resolve_paths, KilnConfig, ResolvedPaths, CONFIG_FILE_NAME};

use crate::GlobalArgs;

/// A loaded project: its configuration and resolved directories.
pub struct Project {
    /// Parsed `kiln.toml`.
    pub config: KilnConfig,
    /// Directories anchored at the project root.
    pub paths: ResolvedPaths,
}

impl Project {
    /// Opens the stamp cache this project uses.
    pub fn open_cache(&self) -> Result<BuildCache, Box<dyn std::error::Error>> {
        Ok(open_cache(&self.config, &self.paths)?)
    }

    /// Creates a builder over this project's cache and tools.
    ///
    /// With `force`, the skip policy is emptied so every existing input is
    /// rebuilt.
    pub fn builder(&self, force: bool) -> Result<ResourceBuilder, Box<dyn std::error::Error>> {
        let mut options = BuilderOptions::from_config(&self.config, &self.paths);
        if force {
            options.skip = SkipPolicy::rebuild_all();
        }
        Ok(ResourceBuilder::new(self.open_cache()?, options))
    }
}

/// Walks up from `start` looking for the nearest directory containing `kiln.toml`.
///
/// Returns the directory containing `kiln.toml`, or an error if none is found.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE_NAME).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find {CONFIG_FILE_NAME} in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Resolves the configuration file from global CLI args.
///
/// If `--config` is specified, uses that path (file → itself, dir → its
/// `kiln.toml`). Otherwise walks up from the current directory looking for
/// `kiln.toml`. The returned path is absolute.
pub fn resolve_config_file(global: &GlobalArgs) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let file = if let Some(ref config_path) = global.config {
        let p = std::path::absolute(config_path)?;
        if p.is_dir() {
            p.join(CONFIG_FILE_NAME)
        } else {
            p
        }
    } else {
        find_project_root(&std::env::current_dir()?)?.join(CONFIG_FILE_NAME)
    };
    Ok(file)
}

/// Loads the project named by the global CLI args.
pub fn load_project(global: &GlobalArgs) -> Result<Project, Box<dyn std::error::Error>> {
    load_project_file(&resolve_config_file(global)?)
}

/// Loads the project whose configuration lives at `config_file`. The
/// project root is the directory containing the file.
pub fn load_project_file(config_file: &Path) -> Result<Project, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(config_file)
        .map_err(|e| format!("cannot read {}: {e}", config_file.display()))?;
    let config = load_config_from_str(&content)?;
    let root = config_file
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let paths = resolve_paths(&config, &root);
    Ok(Project { config, paths })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global(config: Option<&Path>) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            color: false,
            config: config.map(|p| p.display().to_string()),
        }
    }

    #[test]
    fn finds_root_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("kiln.toml"), "").unwrap();
        let nested = dir.path().join("assets").join("shaders");
        std::fs::create_dir_all(&nested).unwrap();
        assert_eq!(find_project_root(&nested).unwrap(), dir.path());
    }

    #[test]
    fn missing_config_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = find_project_root(dir.path());
        // A kiln.toml above the temp directory would make this succeed.
        if let Err(e) = err {
            assert!(e.to_string().contains("could not find kiln.toml"));
        }
    }

    #[test]
    fn config_flag_accepts_file_or_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("custom.toml");
        std::fs::write(&file, "").unwrap();
        assert_eq!(resolve_config_file(&global(Some(&file))).unwrap(), file);
        assert_eq!(
            resolve_config_file(&global(Some(dir.path()))).unwrap(),
            dir.path().join("kiln.toml")
        );
    }

    #[test]
    fn project_paths_are_anchored_at_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("kiln.toml");
        std::fs::write(
            &file,
            "[shader]\noutput_dir = \"out/sh\"\n[cache]\npath = \"stamps.txt\"\n",
        )
        .unwrap();
        let project = load_project(&global(Some(&file))).unwrap();
        assert_eq!(project.paths.root, dir.path());
        assert_eq!(project.paths.shader_output_dir, dir.path().join("out/sh"));

        let cache = project.open_cache().unwrap();
        assert_eq!(cache.path(), dir.path().join("stamps.txt"));
    }

    #[test]
    fn force_empties_skip_policy() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("kiln.toml");
        std::fs::write(&file, "[cache]\npath = \"stamps.txt\"\n").unwrap();
        let project = load_project_file(&file).unwrap();
        let builder = project.builder(true).unwrap();
        assert_eq!(builder.options().skip, SkipPolicy::rebuild_all());
    }

    #[test]
    fn invalid_config_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("kiln.toml");
        std::fs::write(&file, "[engine]\nname = \"\"\n").unwrap();
        assert!(load_project_file(&file).is_err());
    }
}
