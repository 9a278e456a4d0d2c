use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::spec::form::FormConfiguration;

/// Task identifiers known out of the box.
pub const DEFAULT_TASK_TYPES: [&str; 3] = ["new-project", "add-feature", "generate-guide"];

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("no configuration found for task type: {0}")]
    NotFound(String),
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration for {task}")]
    Parse {
        task: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to load configuration for {task}: {reason}")]
    Source { task: String, reason: String },
}

/// Resolves a [`FormConfiguration`] for a task identifier.
pub trait ConfigLoader {
    fn load_config(&self, task: &str) -> Result<FormConfiguration, LoaderError>;

    fn available_task_types(&self) -> Vec<String>;

    fn is_valid_task_type(&self, task: &str) -> bool {
        self.available_task_types().iter().any(|known| known == task)
    }
}

fn default_task_types() -> Vec<String> {
    DEFAULT_TASK_TYPES.iter().map(|task| task.to_string()).collect()
}

/// Serves configurations from an in-memory map.
#[derive(Debug, Clone, Default)]
pub struct StaticConfigLoader {
    configs: BTreeMap<String, FormConfiguration>,
}

impl StaticConfigLoader {
    pub fn new(configs: BTreeMap<String, FormConfiguration>) -> Self {
        Self { configs }
    }

    pub fn insert(&mut self, task: impl Into<String>, config: FormConfiguration) {
        self.configs.insert(task.into(), config);
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load_config(&self, task: &str) -> Result<FormConfiguration, LoaderError> {
        self.configs
            .get(task)
            .cloned()
            .ok_or_else(|| LoaderError::NotFound(task.to_string()))
    }

    fn available_task_types(&self) -> Vec<String> {
        self.configs.keys().cloned().collect()
    }
}

/// Delegates to a caller-supplied function.
pub struct FnConfigLoader<F> {
    source: F,
    task_types: Vec<String>,
}

impl<F> FnConfigLoader<F>
where
    F: Fn(&str) -> Result<FormConfiguration, LoaderError>,
{
    pub fn new(source: F) -> Self {
        Self {
            source,
            task_types: default_task_types(),
        }
    }

    pub fn with_task_types(mut self, task_types: Vec<String>) -> Self {
        self.task_types = task_types;
        self
    }
}

impl<F> ConfigLoader for FnConfigLoader<F>
where
    F: Fn(&str) -> Result<FormConfiguration, LoaderError>,
{
    fn load_config(&self, task: &str) -> Result<FormConfiguration, LoaderError> {
        (self.source)(task)
    }

    fn available_task_types(&self) -> Vec<String> {
        self.task_types.clone()
    }
}

/// Reads `<root>/<task>.json`.
#[derive(Debug, Clone)]
pub struct DirConfigLoader {
    root: PathBuf,
}

impl DirConfigLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, task: &str) -> PathBuf {
        self.root.join(format!("{task}.json"))
    }
}

impl ConfigLoader for DirConfigLoader {
    fn load_config(&self, task: &str) -> Result<FormConfiguration, LoaderError> {
        // Task names come from users; keep them inside the root.
        if task.is_empty() || task.contains(['/', '\\']) || task.starts_with('.') {
            return Err(LoaderError::NotFound(task.to_string()));
        }
        let path = self.path_for(task);
        if !path.is_file() {
            return Err(LoaderError::NotFound(task.to_string()));
        }
        let raw = fs::read_to_string(&path).map_err(|source| LoaderError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(task, path = %path.display(), "loading form configuration");
        serde_json::from_str(&raw).map_err(|source| LoaderError::Parse {
            task: task.to_string(),
            source,
        })
    }

    fn available_task_types(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(&self.root) else {
            return Vec::new();
        };
        let mut tasks = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|path| {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .map(String::from)
            })
            .collect::<Vec<_>>();
        tasks.sort();
        tasks
    }
}
