//! Discovery of reference-molecule repositories on disk.
//!
//! A repository is a directory of `.lgf` files, one per reference
//! molecule; the file stem is the reference id. Discovery is treated as
//! a plain directory listing; there is no manifest or index.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// One reference molecule of a repository: its id and the path to its
/// exchange-format file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceMolecule {
    pub id: String,
    pub path: PathBuf,
}

/// A scanned repository: a name and an ordered listing of reference
/// molecules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub name: String,
    pub references: Vec<ReferenceMolecule>,
}

impl Repository {
    /// Scans `root/name` for `.lgf` files. References are sorted by id
    /// so a build's fan-out (and therefore its aggregate order) is
    /// reproducible across runs.
    pub fn scan(root: &Path, name: &str) -> io::Result<Self> {
        let dir = root.join(name);
        let mut references = Vec::new();

        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("lgf") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            references.push(ReferenceMolecule {
                id: stem.to_string(),
                path: path.clone(),
            });
        }

        references.sort_by(|a, b| a.id.cmp(&b.id));

        Ok(Self {
            name: name.to_string(),
            references,
        })
    }

    /// Whether `root/name` exists as a directory, checked during request
    /// validation before any classification or process spawn.
    pub fn exists(root: &Path, name: &str) -> bool {
        root.join(name).is_dir()
    }
}

/// Lists the repository names available under `root`, sorted.
pub fn list_repositories(root: &Path) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    fn touch(path: &Path, content: &str) {
        let mut file = File::create(path).unwrap();
        write!(file, "{}", content).unwrap();
    }

    #[test]
    fn scan_keeps_only_lgf_files_and_sorts_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let repo = dir.path().join("lipids");
        fs::create_dir(&repo).unwrap();
        touch(&repo.join("300.lgf"), "@nodes\n");
        touch(&repo.join("100.lgf"), "@nodes\n");
        touch(&repo.join("notes.txt"), "ignored");

        let scanned = Repository::scan(dir.path(), "lipids").unwrap();
        let ids: Vec<&str> = scanned.references.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["100", "300"]);
    }

    #[test]
    fn scan_of_missing_repository_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Repository::scan(dir.path(), "nope").is_err());
        assert!(!Repository::exists(dir.path(), "nope"));
    }

    #[test]
    fn list_repositories_returns_sorted_directory_names() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sugars")).unwrap();
        fs::create_dir(dir.path().join("lipids")).unwrap();
        touch(&dir.path().join("stray.lgf"), "");

        let names = list_repositories(dir.path()).unwrap();
        assert_eq!(names, vec!["lipids", "sugars"]);
    }
}
