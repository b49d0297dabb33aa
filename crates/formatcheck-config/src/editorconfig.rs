//! `.editorconfig` lookup.
//!
//! Files are discovered by walking from a document's directory towards the
//! filesystem root, stopping after a file that declares `root = true`.
//! Sections from farther files apply first so nearer files win, and within a
//! file later sections win over earlier ones.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use formatcheck_options::{ConventionError, ConventionProvider, ConventionSnapshot};
use globset::{GlobBuilder, GlobMatcher};

const EDITORCONFIG_FILE_NAME: &str = ".editorconfig";

/// Convention provider backed by `.editorconfig` files, parsed once per
/// directory and shared across documents.
#[derive(Debug, Default)]
pub struct EditorConfigProvider {
    cache: Mutex<HashMap<PathBuf, Option<Arc<EditorConfigFile>>>>,
}

impl EditorConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn file_in(&self, dir: &Path) -> Result<Option<Arc<EditorConfigFile>>, ConventionError> {
        if let Some(cached) = self
            .cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(dir)
        {
            return Ok(cached.clone());
        }

        let path = dir.join(EDITORCONFIG_FILE_NAME);
        let parsed = match fs::read_to_string(&path) {
            Ok(contents) => Some(Arc::new(EditorConfigFile::parse(&path, &contents)?)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(source) => return Err(ConventionError::Io { path, source }),
        };

        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(dir.to_path_buf(), parsed.clone());
        Ok(parsed)
    }
}

impl ConventionProvider for EditorConfigProvider {
    fn load(&self, path: &Path) -> Result<ConventionSnapshot, ConventionError> {
        let absolute = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());

        let mut files = Vec::new();
        for dir in absolute.ancestors().skip(1) {
            if let Some(file) = self.file_in(dir)? {
                let is_root = file.root;
                files.push((dir, file));
                if is_root {
                    break;
                }
            }
        }

        let mut snapshot = ConventionSnapshot::new();
        for (dir, file) in files.iter().rev() {
            let Ok(relative) = absolute.strip_prefix(dir) else {
                continue;
            };
            snapshot = snapshot.merged_with(&file.properties_for(relative));
        }
        Ok(snapshot)
    }
}

#[derive(Debug)]
struct EditorConfigFile {
    root: bool,
    sections: Vec<Section>,
}

#[derive(Debug)]
struct Section {
    matcher: GlobMatcher,
    properties: Vec<(String, String)>,
}

impl EditorConfigFile {
    fn parse(path: &Path, contents: &str) -> Result<Self, ConventionError> {
        let mut root = false;
        let mut sections: Vec<Section> = Vec::new();

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(header) = line.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
                sections.push(Section {
                    matcher: compile_section_glob(path, header)?,
                    properties: Vec::new(),
                });
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim().to_ascii_lowercase();
            let value = value.trim().to_string();

            match sections.last_mut() {
                Some(section) => section.properties.push((key, value)),
                None if key == "root" => root = value.eq_ignore_ascii_case("true"),
                None => {}
            }
        }

        Ok(EditorConfigFile { root, sections })
    }

    fn properties_for(&self, relative: &Path) -> ConventionSnapshot {
        self.sections
            .iter()
            .filter(|section| section.matcher.is_match(relative))
            .flat_map(|section| section.properties.iter().cloned())
            .collect()
    }
}

fn compile_section_glob(path: &Path, header: &str) -> Result<GlobMatcher, ConventionError> {
    let pattern = match header.strip_prefix('/') {
        Some(anchored) => anchored.to_string(),
        None if header.contains('/') => header.to_string(),
        None => format!("**/{header}"),
    };

    GlobBuilder::new(&pattern)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|err| ConventionError::Pattern {
            path: path.to_path_buf(),
            pattern: header.to_string(),
            message: err.to_string(),
        })
}
