use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Command;

use sync_logging::sync_debug;
use url::Url;

use crate::PublishError;

/// Thin wrapper over the `git` CLI. Every call blocks until the command exits.
#[derive(Debug, Clone)]
pub struct Git {
    program: OsString,
    workdir: Option<PathBuf>,
}

impl Default for Git {
    fn default() -> Self {
        Self {
            program: OsString::from("git"),
            workdir: None,
        }
    }
}

impl Git {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs subsequent commands as `git -C {dir} ...`.
    pub fn in_dir(&self, dir: &Path) -> Self {
        Self {
            program: self.program.clone(),
            workdir: Some(dir.to_path_buf()),
        }
    }

    /// Runs `git {subcommand} {args..}` and returns its stdout.
    pub fn run<I, S>(&self, subcommand: &str, args: I) -> Result<String, PublishError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<OsString> = args.into_iter().map(|a| a.as_ref().to_owned()).collect();
        sync_debug!(
            "git {subcommand} {}",
            args.iter()
                .map(|a| redact_url(&a.to_string_lossy()))
                .collect::<Vec<_>>()
                .join(" ")
        );

        let mut command = Command::new(&self.program);
        if let Some(dir) = &self.workdir {
            command.arg("-C").arg(dir);
        }
        command
            .arg(subcommand)
            .args(&args)
            .env("GIT_TERMINAL_PROMPT", "0");

        let output = command.output().map_err(|source| PublishError::GitSpawn {
            subcommand: subcommand.to_string(),
            source,
        })?;
        if !output.status.success() {
            return Err(PublishError::GitFailed {
                subcommand: subcommand.to_string(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Strips user info from a URL so it can be logged. Non-URLs pass through.
pub fn redact_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) if !url.username().is_empty() || url.password().is_some() => {
            let _ = url.set_username("");
            let _ = url.set_password(None);
            url.to_string()
        }
        _ => raw.to_string(),
    }
}
