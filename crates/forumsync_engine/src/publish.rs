use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use forumsync_core::RenderedDocument;
use sync_logging::{sync_debug, sync_info};

use crate::git::{redact_url, Git};
use crate::persist::{ContentWriter, PersistError};

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error("failed to clear scratch directory {path:?}: {source}")]
    Scratch {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to run git {subcommand}: {source}")]
    GitSpawn {
        subcommand: String,
        #[source]
        source: io::Error,
    },
    #[error("git {subcommand} failed ({status}): {stderr}")]
    GitFailed {
        subcommand: String,
        status: ExitStatus,
        stderr: String,
    },
}

/// Destination for rendered documents.
pub trait PublishSink {
    /// Writes the documents and returns how many were written.
    fn publish(&mut self, documents: &[RenderedDocument]) -> Result<usize, PublishError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitIdentity {
    pub name: String,
    pub email: String,
}

/// Where and how documents are committed.
#[derive(Clone, PartialEq, Eq)]
pub struct GitTarget {
    pub repo_url: String,
    pub branch: String,
    /// Relative to the working copy root.
    pub content_dir: PathBuf,
    /// Local working copy; removed and re-cloned on every publish.
    pub scratch_dir: PathBuf,
    pub identity: CommitIdentity,
}

impl fmt::Debug for GitTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitTarget")
            .field("repo_url", &redact_url(&self.repo_url))
            .field("branch", &self.branch)
            .field("content_dir", &self.content_dir)
            .field("scratch_dir", &self.scratch_dir)
            .field("identity", &self.identity)
            .finish()
    }
}

pub fn commit_message(count: usize) -> String {
    format!("Auto-import {count} threads from Discourse")
}

/// Publishes into a fresh shallow clone of the content repository, then
/// commits and pushes.
///
/// Nothing here is transactional: a failed push leaves the local commit in
/// the scratch directory and the remote untouched.
#[derive(Debug, Clone)]
pub struct GitPublishSink {
    target: GitTarget,
    git: Git,
}

impl GitPublishSink {
    pub fn new(target: GitTarget) -> Self {
        Self {
            target,
            git: Git::new(),
        }
    }

    fn prepare_working_copy(&self) -> Result<(), PublishError> {
        let scratch = &self.target.scratch_dir;
        if scratch.exists() {
            sync_debug!("Removing previous scratch directory {scratch:?}");
            fs::remove_dir_all(scratch).map_err(|source| PublishError::Scratch {
                path: scratch.clone(),
                source,
            })?;
        }
        sync_info!(
            "Cloning {} ({}) into {scratch:?}",
            redact_url(&self.target.repo_url),
            self.target.branch
        );
        self.git.run(
            "clone",
            [
                OsStr::new("--depth=1"),
                OsStr::new("--single-branch"),
                OsStr::new("--branch"),
                OsStr::new(&self.target.branch),
                OsStr::new(&self.target.repo_url),
                scratch.as_os_str(),
            ],
        )?;
        Ok(())
    }
}

impl PublishSink for GitPublishSink {
    fn publish(&mut self, documents: &[RenderedDocument]) -> Result<usize, PublishError> {
        self.prepare_working_copy()?;

        let scratch = &self.target.scratch_dir;
        let writer = ContentWriter::new(scratch.join(&self.target.content_dir))?;
        let mut written = 0;
        for document in documents {
            writer.write_document(document)?;
            sync_info!("Saved: {}", document.filename);
            written += 1;
        }

        if written == 0 {
            sync_info!("No threads were processed; nothing to commit");
            return Ok(0);
        }

        let repo = self.git.in_dir(scratch);
        let identity = &self.target.identity;
        repo.run("config", ["user.name", identity.name.as_str()])?;
        repo.run("config", ["user.email", identity.email.as_str()])?;
        repo.run("add", ["."])?;
        if repo.run("status", ["--porcelain"])?.trim().is_empty() {
            sync_info!("Working copy unchanged after writing {written} document(s); skipping commit");
            return Ok(written);
        }
        repo.run("commit", ["-m", commit_message(written).as_str()])?;
        let refspec = format!("HEAD:{}", self.target.branch);
        repo.run("push", ["origin", refspec.as_str()])?;

        sync_info!(
            "Pushed {written} document(s) to {} ({})",
            redact_url(&self.target.repo_url),
            self.target.branch
        );
        Ok(written)
    }
}

/// Writes documents into a plain directory; no version control involved.
#[derive(Debug, Clone)]
pub struct LocalDirSink {
    dir: PathBuf,
}

impl LocalDirSink {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

impl PublishSink for LocalDirSink {
    fn publish(&mut self, documents: &[RenderedDocument]) -> Result<usize, PublishError> {
        let writer = ContentWriter::new(self.dir.clone())?;
        for document in documents {
            let path = writer.write_document(document)?;
            sync_info!("Saved: {path:?}");
        }
        Ok(documents.len())
    }
}
