use std::fmt::Display;
use std::path::PathBuf;
use std::process::Command;

use anyhow::{anyhow, bail, Context};
use chrono::{Local, TimeZone};

pub const COMMIT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Resolves when a revision was committed.
pub trait CommitDates {
    fn commit_date(&self, revision: &str) -> anyhow::Result<Option<String>>;
}

/// Commit date lookup disabled.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NoCommitDates;

impl CommitDates for NoCommitDates {
    fn commit_date(&self, _revision: &str) -> anyhow::Result<Option<String>> {
        Ok(None)
    }
}

/// Reads commit dates from a local git repository via the `git` executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitCommitDates {
    repository: PathBuf,
}

impl GitCommitDates {
    pub fn new(repository: impl Into<PathBuf>) -> Self {
        Self { repository: repository.into() }
    }
}

impl CommitDates for GitCommitDates {
    #[tracing::instrument(level = "debug", skip(self), fields(repository=?self.repository))]
    fn commit_date(&self, revision: &str) -> anyhow::Result<Option<String>> {
        if revision.is_empty() || revision.starts_with('-') {
            bail!("not a revision: {:?}", revision);
        }

        let output = Command::new("git")
            .arg("-C")
            .arg(&self.repository)
            .args(["show", "-s", "--format=%ct", revision])
            .output()
            .context("failed to run git")?;

        if !output.status.success() {
            bail!("git show failed: {}", String::from_utf8_lossy(&output.stderr).trim());
        }

        let rep = String::from_utf8(output.stdout)?;
        let secs: i64 = rep.trim().parse().with_context(|| format!("unexpected commit time {:?}", rep))?;
        format_commit_time(&Local, secs).map(Some)
    }
}

pub fn format_commit_time<Tz>(tz: &Tz, secs: i64) -> anyhow::Result<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let time = tz
        .timestamp_opt(secs, 0)
        .single()
        .ok_or_else(|| anyhow!("invalid commit timestamp: {}", secs))?;
    Ok(time.format(COMMIT_DATE_FORMAT).to_string())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use claim::*;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_format_commit_time() {
        assert_eq!(assert_ok!(format_commit_time(&Utc, 0)), "1970-01-01 00:00:00");
        assert_eq!(assert_ok!(format_commit_time(&Utc, 1_651_572_000)), "2022-05-03 10:00:00");
    }

    #[test]
    fn test_no_commit_dates() {
        assert_none!(assert_ok!(NoCommitDates.commit_date("abc123")));
    }

    #[test]
    fn test_git_rejects_option_like_revision() {
        let git = GitCommitDates::new(".");
        assert_err!(git.commit_date("--all"));
        assert_err!(git.commit_date(""));
    }
}
