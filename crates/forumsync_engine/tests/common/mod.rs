#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;

use forumsync_engine::{CommitIdentity, GitTarget};
use tempfile::TempDir;

pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

fn git(dir: &Path, args: &[&str]) -> String {
    let out = Command::new("git")
        .current_dir(dir)
        .args(args)
        .output()
        .expect("spawn git");
    assert!(
        out.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    String::from_utf8_lossy(&out.stdout).into_owned()
}

/// A bare repository with one seed commit on `main`, plus room for a scratch clone.
pub struct RemoteRepo {
    temp: TempDir,
    pub bare: PathBuf,
}

impl RemoteRepo {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let bare = temp.path().join("remote.git");
        let seed = temp.path().join("seed");
        let bare_str = bare.to_str().unwrap();
        let seed_str = seed.to_str().unwrap();

        git(temp.path(), &["init", "--bare", bare_str]);
        git(temp.path(), &["init", seed_str]);
        std::fs::create_dir_all(seed.join("content/posts")).unwrap();
        std::fs::write(seed.join("content/posts/.keep"), "").unwrap();
        std::fs::write(seed.join("README.md"), "site\n").unwrap();
        git(&seed, &["add", "."]);
        git(
            &seed,
            &[
                "-c",
                "user.name=Seed",
                "-c",
                "user.email=seed@example.com",
                "-c",
                "commit.gpgsign=false",
                "commit",
                "-m",
                "seed",
            ],
        );
        git(&seed, &["push", bare_str, "HEAD:refs/heads/main"]);

        Self { temp, bare }
    }

    pub fn url(&self) -> String {
        format!("file://{}", self.bare.display())
    }

    pub fn scratch_dir(&self) -> PathBuf {
        self.temp.path().join("scratch")
    }

    pub fn target(&self) -> GitTarget {
        GitTarget {
            repo_url: self.url(),
            branch: "main".to_string(),
            content_dir: PathBuf::from("content/posts"),
            scratch_dir: self.scratch_dir(),
            identity: CommitIdentity {
                name: "Discourse Bot".to_string(),
                email: "bot@example.com".to_string(),
            },
        }
    }

    /// Commit subjects on `main`, newest first.
    pub fn subjects(&self) -> Vec<String> {
        let git_dir = format!("--git-dir={}", self.bare.display());
        git(self.temp.path(), &[&git_dir, "log", "--format=%s", "main"])
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn file_on_main(&self, path: &str) -> String {
        let git_dir = format!("--git-dir={}", self.bare.display());
        git(self.temp.path(), &[&git_dir, "show", &format!("main:{path}")])
    }

    pub fn author_on_main(&self) -> String {
        let git_dir = format!("--git-dir={}", self.bare.display());
        git(
            self.temp.path(),
            &[&git_dir, "log", "-1", "--format=%an <%ae>", "main"],
        )
        .trim()
        .to_string()
    }
}
