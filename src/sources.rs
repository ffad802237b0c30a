use std::collections::HashSet;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use ignore::WalkBuilder;
use log::{debug, info};

use crate::error::{GistError, Result};

/// Display filename to content, in first-seen order.
///
/// Inserting a name that is already present replaces its content but keeps
/// its position, so two sources sharing a base filename collapse to one entry
/// holding the later content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileMap {
    entries: Vec<(String, String)>,
}

impl FileMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<String>) {
        let name = name.into();
        let content = content.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = content,
            None => self.entries.push((name, content)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, content)| content.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, content)| (name.as_str(), content.as_str()))
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    fn rename_single(&mut self, name: &str) {
        if let [(existing, _)] = self.entries.as_mut_slice() {
            *existing = name.to_string();
        }
    }
}

/// Builds the file map from glob patterns, or from `stdin` when there are none.
pub fn collect_sources<R: Read>(patterns: &[String], override_filename: &str, stdin: R) -> Result<FileMap> {
    let file_map = if patterns.is_empty() {
        read_stdin(override_filename, stdin)?
    } else {
        let paths = resolve_patterns(patterns)?;
        if paths.is_empty() {
            return Err(GistError::NoValidSources);
        }
        let mut file_map = read_files(&paths)?;
        if !override_filename.is_empty() && file_map.len() == 1 {
            file_map.rename_single(override_filename);
        }
        file_map
    };

    if file_map.is_empty() {
        return Err(GistError::AllSourcesEmpty);
    }
    info!("collected {} file(s): {:?}", file_map.len(), file_map.names());
    Ok(file_map)
}

/// Expands every pattern and keeps the regular files, first occurrence wins.
pub fn resolve_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for pattern in patterns {
        for path in expand_pattern(pattern)? {
            if !path.is_file() {
                debug!("skipping {}: not a regular file", path.display());
                continue;
            }
            if seen.insert(path.clone()) {
                files.push(path);
            }
        }
    }

    Ok(files)
}

/// Expands one filesystem glob. Matches within the pattern come back sorted by
/// file name; a pattern without metacharacters names at most one path.
pub fn expand_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    if !has_glob_meta(pattern) {
        let path = PathBuf::from(pattern);
        return Ok(if path.exists() { vec![path] } else { Vec::new() });
    }

    let (base, remainder) = split_base(pattern);
    let matcher = compile(pattern, &remainder)?;
    let allows_hidden = remainder.split('/').any(|component| component.starts_with('.'));
    let max_depth = if remainder.contains("**") {
        None
    } else {
        Some(remainder.split('/').filter(|c| !c.is_empty()).count())
    };
    let walk_root = base.clone().unwrap_or_else(|| PathBuf::from("."));

    let mut builder = WalkBuilder::new(&walk_root);
    builder
        .standard_filters(false)
        .follow_links(true)
        .max_depth(max_depth)
        .sort_by_file_name(|a, b| a.cmp(b));

    let mut matches = Vec::new();
    for result in builder.build() {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                debug!("skipping unreadable entry under {}: {err}", walk_root.display());
                continue;
            }
        };
        if entry.depth() == 0 {
            continue;
        }
        let relative = match entry.path().strip_prefix(&walk_root) {
            Ok(relative) => relative,
            Err(_) => continue,
        };
        if !allows_hidden && is_hidden(relative) {
            continue;
        }
        if matcher.is_match(relative) {
            matches.push(match &base {
                Some(base) => base.join(relative),
                None => relative.to_path_buf(),
            });
        }
    }

    Ok(matches)
}

fn has_glob_meta(text: &str) -> bool {
    text.contains(['*', '?', '['])
}

// Braces are plain characters in a filesystem glob; globset would read them
// as alternation.
fn escape_braces(remainder: &str) -> String {
    let mut escaped = String::with_capacity(remainder.len());
    let mut in_class = false;
    for c in remainder.chars() {
        match c {
            '[' if !in_class => {
                in_class = true;
                escaped.push(c);
            }
            ']' if in_class => {
                in_class = false;
                escaped.push(c);
            }
            '{' | '}' if !in_class => {
                escaped.push('[');
                escaped.push(c);
                escaped.push(']');
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Splits a pattern into its literal leading directory and the glob part.
fn split_base(pattern: &str) -> (Option<PathBuf>, String) {
    let components: Vec<&str> = pattern.split('/').collect();
    let first_glob = components
        .iter()
        .position(|component| has_glob_meta(component))
        .unwrap_or(components.len());

    let remainder = components[first_glob..].join("/");
    let base = components[..first_glob].join("/");
    let base = if base.is_empty() && pattern.starts_with('/') {
        Some(PathBuf::from("/"))
    } else if base.is_empty() {
        None
    } else {
        Some(PathBuf::from(base))
    };
    (base, remainder)
}

fn compile(pattern: &str, remainder: &str) -> Result<GlobMatcher> {
    GlobBuilder::new(&escape_braces(remainder))
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|source| GistError::Pattern {
            pattern: pattern.to_string(),
            source,
        })
}

fn is_hidden(relative: &Path) -> bool {
    relative
        .components()
        .any(|component| component.as_os_str().to_string_lossy().starts_with('.'))
}

fn read_files(paths: &[PathBuf]) -> Result<FileMap> {
    let mut file_map = FileMap::new();

    for path in paths {
        let contents = fs::read_to_string(path).map_err(|source| GistError::Read {
            path: path.clone(),
            source,
        })?;
        if contents.is_empty() {
            debug!("skipping {}: empty", path.display());
            continue;
        }
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        if file_map.get(&filename).is_some() {
            debug!("{} replaces an earlier {filename}", path.display());
        }
        file_map.insert(filename, contents);
    }

    Ok(file_map)
}

fn read_stdin<R: Read>(filename: &str, mut stdin: R) -> Result<FileMap> {
    let mut contents = String::new();
    stdin.read_to_string(&mut contents).map_err(GistError::Stdin)?;
    if contents.is_empty() {
        return Err(GistError::EmptyStdin);
    }

    let mut file_map = FileMap::new();
    file_map.insert(filename, contents);
    Ok(file_map)
}
