//! Log file rotation.

use std::fs;
use std::path::{Path, PathBuf};

use jiff::{Timestamp, tz::TimeZone};

use crate::logger::LoggerError;
use crate::logger::config::{RotationConfig, RotationStrategy};

/// Decides when the active file rolls over and prunes old files.
///
/// Rotated files are named `<stem>.<YYYYmmdd_HHMMSS>-<nnn>.<ext>` next to the
/// active file, so lexical order is chronological order.
pub struct Rotator {
    config: RotationConfig,
    period_start: Timestamp,
}

impl Rotator {
    pub fn new(config: RotationConfig) -> Self {
        Self::starting_at(config, Timestamp::now())
    }

    pub fn starting_at(config: RotationConfig, period_start: Timestamp) -> Self {
        Self {
            config,
            period_start,
        }
    }

    pub fn should_rotate(&self, current_size: u64, now: Timestamp) -> bool {
        match self.config.strategy {
            RotationStrategy::Size => current_size >= self.config.max_size,
            RotationStrategy::Time(unit) => unit
                .next_after(self.period_start)
                .is_some_and(|due| now >= due),
        }
    }

    /// Moves `active` aside and removes rotated files beyond `max_files`.
    pub fn rotate(&mut self, active: &Path, now: Timestamp) -> Result<PathBuf, LoggerError> {
        let target = rotated_path(active, now);
        if active.exists() {
            fs::rename(active, &target)?;
        }
        self.period_start = now;
        self.prune(active)?;
        Ok(target)
    }

    /// Rotated siblings of `active`, oldest first.
    pub fn rotated_files(active: &Path) -> Result<Vec<PathBuf>, LoggerError> {
        let dir = match active.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let (stem, ext) = split_name(active)?;
        let prefix = format!("{}.", stem);
        let suffix = ext.map(|e| format!(".{}", e));

        let mut files: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                path.as_path() != active
                    && name.starts_with(&prefix)
                    && suffix.as_ref().is_none_or(|s| name.ends_with(s.as_str()))
            })
            .collect();
        files.sort();
        Ok(files)
    }

    fn prune(&self, active: &Path) -> Result<(), LoggerError> {
        let keep = self.config.max_files.saturating_sub(1);
        let files = Self::rotated_files(active)?;
        let excess = files.len().saturating_sub(keep);
        for old in files.iter().take(excess) {
            fs::remove_file(old)?;
        }
        Ok(())
    }
}

fn split_name(path: &Path) -> Result<(String, Option<String>), LoggerError> {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| LoggerError::rotation(format!("no file name in {}", path.display())))?;
    let ext = path.extension().map(|e| e.to_string_lossy().into_owned());
    Ok((stem, ext))
}

fn rotated_path(active: &Path, now: Timestamp) -> PathBuf {
    let stamp = now.to_zoned(TimeZone::UTC).strftime("%Y%m%d_%H%M%S").to_string();
    let stem = active
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "log".to_string());
    let ext = active.extension().map(|e| e.to_string_lossy().into_owned());

    let name = |n: u32| {
        let tag = format!("{}-{:03}", stamp, n);
        match &ext {
            Some(ext) => format!("{}.{}.{}", stem, tag, ext),
            None => format!("{}.{}", stem, tag),
        }
    };

    let mut n = 0;
    let mut candidate = active.with_file_name(name(n));
    while candidate.exists() {
        n += 1;
        candidate = active.with_file_name(name(n));
    }
    candidate
}
