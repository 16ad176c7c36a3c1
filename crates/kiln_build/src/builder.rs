//! The resource builder: staleness checks, task submission, and draining.
//!
//! A [`ResourceBuilder`] owns the stamp cache and the task queue for its
//! whole lifetime. Collaborators ask it for builds; it classifies the input,
//! consults the skip policy, and queues a tool invocation when needed.
//! [`ResourceBuilder::drain`] runs the queue in order and, once it is empty,
//! commits the newly observed stamps and persists the cache.

use std::path::{Path, PathBuf};

use kiln_cache::{default_cache_path, BinaryFormat, BuildCache, CacheError, TextFormat};
use kiln_common::{BuildStatus, ShaderStage, SkipPolicy, TextureRole};
use kiln_config::{CacheFormatKind, KilnConfig, ResolvedPaths};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::cubemap::cubemap_task;
use crate::error::BuildError;
use crate::plan::AssetRequest;
use crate::queue::TaskQueue;
use crate::runner::{ProcessRunner, SystemRunner, TaskOutcome};
use crate::shader::shader_task;
use crate::task::BuildTask;
use crate::texture::texture_task;
use crate::tools::ToolPaths;

/// Settings the builder needs besides the cache.
#[derive(Debug, Clone)]
pub struct BuilderOptions {
    /// Tool executables.
    pub tools: ToolPaths,
    /// Shader target platform.
    pub platform: String,
    /// Statuses that do not produce a task.
    pub skip: SkipPolicy,
    /// Stop draining at the first failing tool.
    pub fail_on_tool_error: bool,
}

impl BuilderOptions {
    /// Builds options from a loaded configuration.
    pub fn from_config(config: &KilnConfig, paths: &ResolvedPaths) -> Self {
        Self {
            tools: ToolPaths::in_dir(&paths.tools_dir, &config.tools),
            platform: config.shader.platform.clone(),
            skip: config.build.skip.clone(),
            fail_on_tool_error: config.build.fail_on_tool_error,
        }
    }
}

/// Opens the stamp cache a configuration points at.
///
/// Uses `cache.path` when set, otherwise the per-user data directory for the
/// configured engine name.
pub fn open_cache(config: &KilnConfig, paths: &ResolvedPaths) -> Result<BuildCache, CacheError> {
    let path = match &paths.cache_path {
        Some(path) => path.clone(),
        None => default_cache_path(&config.engine.name)?,
    };
    let cache = match config.cache.format {
        CacheFormatKind::Text => BuildCache::load_or_create_with(&path, Box::new(TextFormat)),
        CacheFormatKind::Binary => BuildCache::load_or_create_with(&path, Box::new(BinaryFormat)),
    };
    Ok(cache)
}

/// A task whose tool did not finish successfully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedTask {
    /// The tool that ran.
    pub executable: PathBuf,
    /// The source asset it was building.
    pub input: PathBuf,
    /// The artifact it should have written.
    pub output: PathBuf,
    /// Exit code, or `None` if the process was killed.
    pub exit_code: Option<i32>,
}

impl FailedTask {
    fn new(task: &BuildTask, outcome: TaskOutcome) -> Self {
        Self {
            executable: task.executable().to_path_buf(),
            input: task.input().to_path_buf(),
            output: task.output().to_path_buf(),
            exit_code: match outcome {
                TaskOutcome::Exited(code) => Some(code),
                _ => None,
            },
        }
    }
}

/// Summary of one [`ResourceBuilder::drain`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DrainReport {
    /// Tasks handed to the runner.
    pub executed: usize,
    /// Tasks whose tool failed; their inputs were not committed.
    pub failed: Vec<FailedTask>,
    /// Stamps merged into the committed cache.
    pub committed: usize,
}

impl DrainReport {
    /// Returns `true` if every executed tool succeeded.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Incremental build orchestrator.
///
/// Dropping the builder commits and saves the cache, but only when the queue
/// is empty and the last drain was not aborted; tasks that never ran leave
/// their inputs uncommitted.
pub struct ResourceBuilder<R: ProcessRunner = SystemRunner> {
    cache: BuildCache,
    queue: TaskQueue,
    options: BuilderOptions,
    runner: R,
    /// Set when a drain stopped on an error; cleared by the next drain that
    /// runs to completion.
    aborted: bool,
}

impl ResourceBuilder<SystemRunner> {
    /// Creates a builder that spawns real tool processes.
    pub fn new(cache: BuildCache, options: BuilderOptions) -> Self {
        Self::with_runner(cache, options, SystemRunner)
    }
}

impl<R: ProcessRunner> ResourceBuilder<R> {
    /// Creates a builder that executes tasks with `runner`.
    pub fn with_runner(cache: BuildCache, options: BuilderOptions, runner: R) -> Self {
        Self {
            cache,
            queue: TaskQueue::new(),
            options,
            runner,
            aborted: false,
        }
    }

    /// Classifies `input` → `output` without queueing anything.
    ///
    /// Changed inputs are still recorded as pending, exactly as a build
    /// request would record them.
    pub fn check_status(&mut self, input: &Path, output: &Path) -> BuildStatus {
        self.cache.check_status(&absolute(input), &absolute(output))
    }

    /// Queues a shader compile if the input is stale. Returns `true` if a
    /// task was queued.
    pub fn request_shader_build(
        &mut self,
        stage: ShaderStage,
        input: &Path,
        output: &Path,
        variant: Option<&str>,
    ) -> bool {
        let (input, output) = (absolute(input), absolute(output));
        if !self.needs_build(&input, &output) {
            return false;
        }
        let task = shader_task(
            &self.options.tools.shader_compiler,
            &self.options.platform,
            stage,
            &input,
            &output,
            variant,
        );
        self.submit(task);
        true
    }

    /// Queues a texture compression if the input is stale. Returns `true`
    /// if a task was queued.
    pub fn request_texture_build(&mut self, role: TextureRole, input: &Path, output: &Path) -> bool {
        let (input, output) = (absolute(input), absolute(output));
        if !self.needs_build(&input, &output) {
            return false;
        }
        let task = texture_task(&self.options.tools.texture_compiler, role, &input, &output);
        self.submit(task);
        true
    }

    /// Queues a cubemap filter run if the input is stale. Returns `true` if
    /// a task was queued.
    pub fn request_cubemap_build(&mut self, input: &Path, output: &Path) -> bool {
        let (input, output) = (absolute(input), absolute(output));
        if !self.needs_build(&input, &output) {
            return false;
        }
        let task = cubemap_task(&self.options.tools.cubemap_filter, &input, &output);
        self.submit(task);
        true
    }

    /// Dispatches a manifest request to the matching `request_*` method.
    pub fn request(&mut self, request: &AssetRequest) -> bool {
        match request {
            AssetRequest::Shader {
                stage,
                input,
                output,
                variant,
            } => self.request_shader_build(*stage, input, output, variant.as_deref()),
            AssetRequest::Texture {
                role,
                input,
                output,
            } => self.request_texture_build(*role, input, output),
            AssetRequest::Cubemap { input, output } => self.request_cubemap_build(input, output),
        }
    }

    fn needs_build(&mut self, input: &Path, output: &Path) -> bool {
        let status = self.cache.check_status(input, output);
        if self.options.skip.skips(status) {
            debug!("skipping {} ({status})", input.display());
            return false;
        }
        true
    }

    /// Appends a task to the queue.
    pub fn submit(&mut self, task: BuildTask) {
        debug!("queued {task}");
        self.queue.submit(task);
    }

    /// The tasks waiting for the next drain.
    pub fn pending_tasks(&self) -> &TaskQueue {
        &self.queue
    }

    /// Runs every queued task in order, then commits and saves the cache.
    ///
    /// Draining an empty queue does nothing. A tool that fails to start or
    /// exits unsuccessfully has every stamp of its input invalidated, so the
    /// input is rebuilt next run even if the tool left a partial output
    /// behind. Unless `fail_on_tool_error` is set the drain carries on after
    /// a failing tool. A spawn failure (or a tool failure with
    /// `fail_on_tool_error`) stops the drain, leaves the remaining tasks
    /// queued, and commits nothing, neither now nor when the builder is
    /// dropped, until a later drain completes.
    ///
    /// A cache that cannot be written is logged and not reported as an error.
    pub fn drain(&mut self) -> Result<DrainReport, BuildError> {
        let mut report = DrainReport::default();
        if self.queue.is_empty() {
            return Ok(report);
        }

        info!("running {} build tasks", self.queue.len());
        while let Some(task) = self.queue.pop() {
            debug!("running {task}");
            let outcome = match self.runner.run(&task) {
                Ok(outcome) => outcome,
                Err(source) => {
                    error!(
                        "failed to spawn {}: {source}",
                        task.executable().display()
                    );
                    self.cache.invalidate(task.input());
                    self.aborted = true;
                    return Err(BuildError::Spawn {
                        executable: task.executable().to_path_buf(),
                        source,
                    });
                }
            };
            report.executed += 1;
            if outcome.succeeded() {
                continue;
            }

            error!(
                "{} failed to build {}: {outcome}",
                task.executable().display(),
                task.input().display()
            );
            self.cache.invalidate(task.input());
            report.failed.push(FailedTask::new(&task, outcome));
            if self.options.fail_on_tool_error {
                self.aborted = true;
                return Err(BuildError::ToolFailed {
                    executable: task.executable().to_path_buf(),
                    input: task.input().to_path_buf(),
                    outcome,
                });
            }
        }

        self.aborted = false;
        report.committed = self.cache.table().pending_entries().len();
        if let Err(e) = self.cache.commit_and_save() {
            warn!("{e}; changed inputs will be rebuilt next run");
        }
        Ok(report)
    }

    /// Forgets every cached stamp. The next commit rewrites the cache file,
    /// so every input is rebuilt on the following run.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Deletes the cache file. Returns `false` if there was none.
    ///
    /// The in-memory stamps are kept; combine with
    /// [`ResourceBuilder::clear_cache`] to forget them as well.
    pub fn delete_cache_file(&mut self) -> Result<bool, BuildError> {
        Ok(self.cache.delete_file()?)
    }

    /// The stamp cache.
    pub fn cache(&self) -> &BuildCache {
        &self.cache
    }

    /// The options this builder was created with.
    pub fn options(&self) -> &BuilderOptions {
        &self.options
    }

    /// The process runner.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// The process runner, mutably (to script test doubles).
    pub fn runner_mut(&mut self) -> &mut R {
        &mut self.runner
    }
}

impl<R: ProcessRunner> Drop for ResourceBuilder<R> {
    fn drop(&mut self) {
        if self.aborted || !self.queue.is_empty() {
            warn!(
                "build stopped with {} tasks left; leaving changed inputs uncommitted",
                self.queue.len()
            );
            if self.cache.is_dirty() {
                if let Err(e) = self.cache.save() {
                    warn!("{e}; failed inputs may be skipped next run");
                }
            }
            return;
        }
        if let Err(e) = self.cache.commit_and_save() {
            warn!("{e}; changed inputs will be rebuilt next run");
        }
    }
}

/// Makes `path` absolute against the current directory so cache keys do
/// not depend on how the caller spelled the path.
fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|e| {
        warn!("cannot make {} absolute: {e}", path.display());
        path.to_path_buf()
    })
}
