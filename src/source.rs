//! Vector sources: anything that can enumerate named test-vector
//! entries and hand out their raw content.
//!
//! The CAVP aggregator only needs an ordered stream of (name, content)
//! pairs; where those bytes live (a directory, an unpacked archive, a
//! fixture baked into a test) stays behind [`VectorSource`]. Content is
//! read lazily so unrecognized files are never loaded.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{HarnessError, Result};

/// One named entry of a vector source.
#[derive(Debug, Clone)]
pub struct Entry {
    name: String,
    backing: Backing,
}

#[derive(Debug, Clone)]
enum Backing {
    Path(PathBuf),
    Text(String),
}

impl Entry {
    pub fn from_path(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            name,
            backing: Backing::Path(path),
        }
    }

    pub fn from_text(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            backing: Backing::Text(content.into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> Result<String> {
        match &self.backing {
            Backing::Path(path) => fs::read_to_string(path).map_err(|source| HarnessError::Read {
                path: path.clone(),
                source,
            }),
            Backing::Text(text) => Ok(text.clone()),
        }
    }
}

pub trait VectorSource {
    /// Enumerates all entries in a deterministic order.
    fn entries(&self) -> Result<Vec<Entry>>;
}

/// A directory of vector files, walked recursively, entries sorted by
/// path so runs are reproducible.
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn collect(&self, dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
        let entries = fs::read_dir(dir).map_err(|source| HarnessError::Read {
            path: dir.to_path_buf(),
            source,
        })?;
        for entry in entries {
            let entry = entry.map_err(|source| HarnessError::Read {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if path.is_dir() {
                self.collect(&path, out)?;
            } else {
                out.push(path);
            }
        }
        Ok(())
    }
}

impl VectorSource for DirSource {
    fn entries(&self) -> Result<Vec<Entry>> {
        let mut paths = Vec::new();
        self.collect(&self.root, &mut paths)?;
        paths.sort();
        Ok(paths.into_iter().map(Entry::from_path).collect())
    }
}

/// In-memory source, used by the test suites and handy for callers that
/// already hold the vector text (e.g. archive readers).
pub struct MemorySource {
    entries: Vec<Entry>,
}

impl MemorySource {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self { entries }
    }
}

impl VectorSource for MemorySource {
    fn entries(&self) -> Result<Vec<Entry>> {
        Ok(self.entries.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dir_source_walks_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.rsp"), "two").unwrap();
        fs::write(dir.path().join("a.rsp"), "one").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("c.rsp"), "three").unwrap();

        let entries = DirSource::new(dir.path()).entries().unwrap();
        let names: Vec<_> = entries.iter().map(Entry::name).collect();
        assert_eq!(names, ["a.rsp", "b.rsp", "c.rsp"]);
        assert_eq!(entries[0].content().unwrap(), "one");
    }

    #[test]
    fn missing_directory_is_an_error() {
        let source = DirSource::new("/definitely/not/here");
        assert!(source.entries().is_err());
    }
}
