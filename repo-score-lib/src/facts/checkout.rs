//! Scratch checkouts of a repository
//!
//! A checkout lives at `<base>/repo-score/<owner>/<name>`. The path is stable per
//! repository, so two concurrent runs against the same repository must not share a base.

use super::RepoSpec;
use crate::Result;
use core::time::Duration;
use ohno::{IntoAppError, bail};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tokio::process::Command;

const LOG_TARGET: &str = "  checkout";

const GIT_TIMEOUT: Duration = Duration::from_mins(5);

/// Directory a repository is checked out into.
#[must_use]
pub fn checkout_dir(base: &Path, repo: &RepoSpec) -> PathBuf {
    base.join("repo-score").join(sanitize(repo.owner())).join(sanitize(repo.name()))
}

/// Shallow, single-branch clone of `repo_url` into `dest`.
pub async fn shallow_clone(repo_url: &str, dest: &Path) -> Result<()> {
    let start_time = std::time::Instant::now();
    let dest_str = dest.to_str().into_app_err("invalid UTF-8 in checkout path")?;

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).into_app_err_with(|| format!("could not create directory '{}'", parent.display()))?;
    }

    log::info!(target: LOG_TARGET, "Cloning '{repo_url}'");
    let output = run_git_with_timeout(&["clone", "--depth", "1", "--single-branch", "--no-tags", repo_url, dest_str]).await?;
    check_git_output(&output, "git clone")?;

    log::debug!(target: LOG_TARGET, "Cloned '{repo_url}' in {:.3}s", start_time.elapsed().as_secs_f64());
    Ok(())
}

/// Remove a checkout directory. A directory that does not exist is not an error.
pub fn remove_checkout(dir: &Path) -> io::Result<()> {
    match fs::remove_dir_all(dir) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

/// Make `component` safe to use as one path segment. Never returns an empty string.
fn sanitize(component: &str) -> String {
    let sanitized: String = component
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') { c } else { '_' })
        .collect();

    match sanitized.trim_start_matches('.') {
        "" => "_".to_string(),
        trimmed => trimmed.to_string(),
    }
}

fn check_git_output(output: &std::process::Output, operation: &str) -> Result<()> {
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("{operation} failed: {}", stderr.trim());
    }
    Ok(())
}

async fn run_git_with_timeout(args: &[&str]) -> Result<std::process::Output> {
    let child = Command::new("git")
        .args(args)
        .env("GIT_TERMINAL_PROMPT", "0")
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .into_app_err("could not spawn git command")?;

    match tokio::time::timeout(GIT_TIMEOUT, child.wait_with_output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(e)) => Err(e).into_app_err_with(|| format!("'git {}' failed to run", args.join(" "))),
        Err(_) => {
            bail!("'git {}' timed out after {} seconds", args.join(" "), GIT_TIMEOUT.as_secs());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::{ExitStatus, Output};

    fn exit_status(code: i32) -> ExitStatus {
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            ExitStatus::from_raw(code << 8)
        }

        #[cfg(windows)]
        {
            use std::os::windows::process::ExitStatusExt;
            ExitStatus::from_raw(code.cast_unsigned())
        }
    }

    #[test]
    fn test_check_git_output_success() {
        let output = Output {
            status: exit_status(0),
            stdout: vec![],
            stderr: vec![],
        };

        check_git_output(&output, "git clone").unwrap();
    }

    #[test]
    fn test_check_git_output_failure_includes_stderr() {
        let output = Output {
            status: exit_status(128),
            stdout: vec![],
            stderr: b"fatal: repository not found\n".to_vec(),
        };

        let error_msg = check_git_output(&output, "git clone").unwrap_err().to_string();
        assert!(error_msg.contains("git clone failed"));
        assert!(error_msg.contains("repository not found"));
    }

    #[test]
    fn test_checkout_dir_is_per_repository() {
        let base = Path::new("/scratch");
        let a = checkout_dir(base, &RepoSpec::new("owner", "one").unwrap());
        let b = checkout_dir(base, &RepoSpec::new("owner", "two").unwrap());

        assert_ne!(a, b);
        assert!(a.ends_with("repo-score/owner/one"));
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("my.repo-name_1"), "my.repo-name_1");
        assert_eq!(sanitize("../evil"), "_evil");
        assert_eq!(sanitize("a b"), "a_b");
        assert_eq!(sanitize("..."), "_");
        assert_eq!(sanitize(""), "_");
    }

    #[test]
    fn test_dot_only_name_stays_below_owner() {
        let base = Path::new("/scratch");
        let dir = checkout_dir(base, &RepoSpec::new("owner", "...").unwrap());

        assert_eq!(dir, base.join("repo-score").join("owner").join("_"));
        assert_ne!(dir, base.join("repo-score").join("owner"));
    }

    #[test]
    fn test_remove_checkout_missing_is_ok() {
        let tmp = tempfile::tempdir().unwrap();
        remove_checkout(&tmp.path().join("never-created")).unwrap();
    }

    #[test]
    fn test_remove_checkout_removes_tree() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("checkout");
        fs::create_dir_all(dir.join("nested")).unwrap();
        fs::write(dir.join("nested/file.txt"), "x").unwrap();

        remove_checkout(&dir).unwrap();
        assert!(!dir.exists());
    }
}
