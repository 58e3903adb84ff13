use crate::areas::database::Database;
use crate::areas::refs::{HEAD_REF_NAME, Refs};
use crate::areas::workspace::Workspace;
use crate::artifacts::config::Config;
use crate::errors::GitError;
use anyhow::Context;
use std::cell::{RefCell, RefMut};
use std::path::{Path, PathBuf};

/// Name of the metadata directory inside a worktree
pub const GIT_DIR_NAME: &str = ".git";

/// Ref that `HEAD` points to in a new repository
pub const DEFAULT_BRANCH_REF: &str = "refs/heads/master";

const DEFAULT_DESCRIPTION: &str =
    "Unnamed repository; edit this file 'description' to name the repository.\n";

const SUPPORTED_FORMAT_VERSION: &str = "0";

pub struct Repository {
    worktree: Box<Path>,
    git_dir: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    config: Config,
    database: Database,
    workspace: Workspace,
    refs: Refs,
}

impl Repository {
    /// Open the repository whose worktree is `path`
    pub fn open(path: &Path, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let worktree = path
            .canonicalize()
            .with_context(|| format!("Unable to access {:?}", path))?;
        let git_dir = worktree.join(GIT_DIR_NAME);

        if !git_dir.is_dir() {
            return Err(GitError::NotARepository(worktree).into());
        }

        let config_path = git_dir.join("config");
        if !config_path.is_file() {
            return Err(GitError::ConfigMissing(config_path).into());
        }

        let config = Config::read(&config_path)?;
        let version = config
            .get("core", "repositoryformatversion")
            .unwrap_or_default();
        if version.trim() != SUPPORTED_FORMAT_VERSION {
            return Err(GitError::UnsupportedFormatVersion(version.to_string()).into());
        }

        Self::assemble(worktree, git_dir, config, writer)
    }

    /// Create a new repository at `path` and return it opened
    ///
    /// The worktree may already exist (it must be a directory); its `.git` must be absent
    /// or empty.
    pub fn create(path: &Path, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        if path.exists() {
            if !path.is_dir() {
                return Err(GitError::PathNotDirectory(path.to_path_buf()).into());
            }
        } else {
            std::fs::create_dir_all(path)
                .with_context(|| format!("Unable to create worktree at {:?}", path))?;
        }

        let worktree = path
            .canonicalize()
            .with_context(|| format!("Unable to access {:?}", path))?;
        let git_dir = worktree.join(GIT_DIR_NAME);

        if git_dir.exists() {
            if !git_dir.is_dir() {
                return Err(GitError::PathNotDirectory(git_dir).into());
            }
            if std::fs::read_dir(&git_dir)?.next().is_some() {
                return Err(GitError::PathNotEmpty(git_dir).into());
            }
        }

        let repository = Self::assemble(worktree, git_dir, Config::repository_default(), writer)?;

        for dir in ["branches", "objects", "refs/tags", "refs/heads"] {
            repository.repo_dir(dir, true)?;
        }

        if let Some(description_path) = repository.repo_file("description", true)? {
            std::fs::write(&description_path, DEFAULT_DESCRIPTION).with_context(|| {
                format!("Unable to write description at {:?}", description_path)
            })?;
        }

        repository
            .refs
            .update_symref(HEAD_REF_NAME, DEFAULT_BRANCH_REF)?;

        if let Some(config_path) = repository.repo_file("config", true)? {
            repository.config.write(&config_path)?;
        }

        tracing::debug!(git_dir = %repository.git_dir.display(), "initialized repository");

        Ok(repository)
    }

    /// Open the closest repository at or above `path`
    pub fn discover(path: &Path, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let start = path
            .canonicalize()
            .with_context(|| format!("Unable to access {:?}", path))?;

        match start
            .ancestors()
            .find(|dir| dir.join(GIT_DIR_NAME).is_dir())
        {
            Some(worktree) => {
                tracing::debug!(worktree = %worktree.display(), "discovered repository");
                Self::open(worktree, writer)
            }
            None => Err(GitError::NotARepository(start).into()),
        }
    }

    fn assemble(
        worktree: PathBuf,
        git_dir: PathBuf,
        config: Config,
        writer: Box<dyn std::io::Write>,
    ) -> anyhow::Result<Self> {
        let database = Database::new(git_dir.join("objects").into_boxed_path());
        let workspace = Workspace::new(worktree.clone().into_boxed_path());
        let refs = Refs::new(git_dir.clone().into_boxed_path())?;

        Ok(Repository {
            worktree: worktree.into_boxed_path(),
            git_dir: git_dir.into_boxed_path(),
            writer: RefCell::new(writer),
            config,
            database,
            workspace,
            refs,
        })
    }

    /// Path of `relative` inside the metadata directory
    pub fn repo_path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.git_dir.join(relative)
    }

    /// Path of the directory `relative` inside the metadata directory
    ///
    /// Returns `None` when it does not exist and `mkdir` is false.
    pub fn repo_dir(
        &self,
        relative: impl AsRef<Path>,
        mkdir: bool,
    ) -> anyhow::Result<Option<PathBuf>> {
        let path = self.repo_path(relative);

        if path.exists() {
            return if path.is_dir() {
                Ok(Some(path))
            } else {
                Err(GitError::PathNotDirectory(path).into())
            };
        }

        if mkdir {
            std::fs::create_dir_all(&path)
                .with_context(|| format!("Unable to create directory {:?}", path))?;
            Ok(Some(path))
        } else {
            Ok(None)
        }
    }

    /// Path of the file `relative` inside the metadata directory, with its parent ensured
    pub fn repo_file(
        &self,
        relative: impl AsRef<Path>,
        mkdir: bool,
    ) -> anyhow::Result<Option<PathBuf>> {
        let relative = relative.as_ref();
        let parent = relative.parent().unwrap_or_else(|| Path::new(""));

        Ok(self
            .repo_dir(parent, mkdir)?
            .map(|_| self.repo_path(relative)))
    }

    pub fn worktree(&self) -> &Path {
        &self.worktree
    }

    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn format_version(&self) -> Option<&str> {
        self.config.get("core", "repositoryformatversion")
    }

    pub fn is_bare(&self) -> bool {
        self.config.get("core", "bare") == Some("true")
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }
}
