use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::env::TargetEnv;
use crate::error::Error;
use crate::model::LoadReport;
use crate::parser::{is_ignored_line, parse_line};

const DEFAULT_FILE: &str = ".env";

/// Load `.env` from the current working directory into the process
/// environment.
///
/// # Safety
///
/// Mutates the process environment. The caller must ensure no other threads
/// concurrently read or write it; call this close to the start of `main`.
pub unsafe fn dotenv() -> Result<LoadReport, Error> {
    unsafe { from_filename(DEFAULT_FILE) }
}

/// Load a dotenv file by name from the current working directory into the
/// process environment.
///
/// # Safety
///
/// Same contract as [`dotenv`].
pub unsafe fn from_filename(name: &str) -> Result<LoadReport, Error> {
    unsafe { from_path(PathBuf::from(name)) }
}

/// Load a dotenv file from a specific path into the process environment.
///
/// # Safety
///
/// Same contract as [`dotenv`].
pub unsafe fn from_path(path: impl AsRef<Path>) -> Result<LoadReport, Error> {
    let mut loader = EnvLoader::new()
        .path(path)
        .target(unsafe { TargetEnv::process() });
    loader.load()
}

/// Load multiple dotenv files into the process environment, stopping at the
/// first file that cannot be read.
///
/// # Safety
///
/// Same contract as [`dotenv`].
pub unsafe fn from_paths<I, P>(paths: I) -> Result<LoadReport, Error>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut loader = EnvLoader::new()
        .paths(paths)
        .target(unsafe { TargetEnv::process() });
    loader.load()
}

/// Read `.env` from the current working directory into a map without
/// touching the process environment.
pub fn read() -> Result<BTreeMap<String, String>, Error> {
    read_from_paths([DEFAULT_FILE])
}

/// Read one dotenv file into a map without touching the process environment.
pub fn read_from_path(path: impl AsRef<Path>) -> Result<BTreeMap<String, String>, Error> {
    read_from_paths([path])
}

/// Read multiple dotenv files into one map. Later files overwrite earlier
/// files' keys; keys that already carry a value in the live process
/// environment are excluded per file.
pub fn read_from_paths<I, P>(paths: I) -> Result<BTreeMap<String, String>, Error>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    // Sound despite the process target: the read path never writes it.
    let loader = EnvLoader::new()
        .paths(paths)
        .target(unsafe { TargetEnv::process() });
    loader.read()
}

/// Builder-style dotenv loader.
///
/// Defaults to an in-memory target, which makes [`EnvLoader::load`] safe and
/// side-effect free; route through [`TargetEnv::process`] (or the `unsafe`
/// convenience functions) to reach the real environment.
#[derive(Debug, Clone, Default)]
pub struct EnvLoader {
    paths: Vec<PathBuf>,
    target: TargetEnv,
}

impl EnvLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        self.paths.push(path.as_ref().to_path_buf());
        self
    }

    pub fn paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.paths
            .extend(paths.into_iter().map(|path| path.as_ref().to_path_buf()));
        self
    }

    pub fn target(mut self, target: TargetEnv) -> Self {
        self.target = target;
        self
    }

    pub fn target_env(&self) -> &TargetEnv {
        &self.target
    }

    pub fn target_env_mut(&mut self) -> &mut TargetEnv {
        &mut self.target
    }

    pub fn into_target(self) -> TargetEnv {
        self.target
    }

    /// Load every configured file into the target environment, in order.
    ///
    /// Each file is applied before the next one is read, so a key taken from
    /// an earlier file blocks the same key in later files, exactly like a
    /// pre-existing environment variable. The first unreadable file aborts
    /// the operation; files loaded before it keep their effect.
    pub fn load(&mut self) -> Result<LoadReport, Error> {
        let mut report = LoadReport::default();

        for path in self.effective_paths() {
            let entries = read_file(&path, &self.target, &mut report)?;
            report.files_read += 1;

            for (key, value) in entries {
                self.target.set_var(&key, &value);
                report.loaded += 1;
            }
        }

        Ok(report)
    }

    /// Read every configured file into one merged map without writing the
    /// target. Later files overwrite earlier files' keys; per-file exclusion
    /// of already-set keys still applies.
    pub fn read(&self) -> Result<BTreeMap<String, String>, Error> {
        let mut merged = BTreeMap::new();
        let mut report = LoadReport::default();

        for path in self.effective_paths() {
            let entries = read_file(&path, &self.target, &mut report)?;
            merged.extend(entries);
        }

        Ok(merged)
    }

    fn effective_paths(&self) -> Vec<PathBuf> {
        if self.paths.is_empty() {
            vec![PathBuf::from(DEFAULT_FILE)]
        } else {
            self.paths.clone()
        }
    }
}

/// Read one file into a map of surviving entries.
///
/// Ignorable lines are skipped, unparsable lines are dropped with a debug
/// event, and keys the target already has a value for are excluded at read
/// time. Within the file the last occurrence of a key wins. Only I/O
/// failures propagate.
fn read_file(
    path: &Path,
    target: &TargetEnv,
    report: &mut LoadReport,
) -> Result<BTreeMap<String, String>, Error> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut entries = BTreeMap::new();
    for line in content.split('\n') {
        if is_ignored_line(line) {
            continue;
        }

        match parse_line(line) {
            Ok((key, value)) => {
                if target.has_value(&key) {
                    debug!(%key, path = %path.display(), "skipping already-set key");
                    report.skipped_existing += 1;
                    continue;
                }
                entries.insert(key, value);
            }
            Err(err) => {
                debug!(%err, line, path = %path.display(), "skipping unparsable line");
            }
        }
    }

    debug!(path = %path.display(), entries = entries.len(), "read dotenv file");
    Ok(entries)
}
