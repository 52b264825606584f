use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::config::{LOW_LEVEL_KEYWORD, MODULE_SUFFIX, PACKAGES_ROOT};

// =============================================================================
// File Tree
// =============================================================================

/// Directory listing from the package index, keyed by path segment.
pub type FileTree = BTreeMap<String, FileNode>;

/// Entry of a package file tree.
///
/// Any object with a `size` key is a file; other objects are directories.
/// Non-object nodes are read as empty directories.
#[derive(Clone, Debug, PartialEq)]
pub enum FileNode {
    File {
        #[allow(dead_code)]
        size: Value,
    },
    Dir(FileTree),
}

impl FileNode {
    fn from_value(value: Value) -> Self {
        match value {
            Value::Object(mut map) => match map.remove("size") {
                Some(size) => Self::File { size },
                None => Self::Dir(
                    map.into_iter()
                        .map(|(name, node)| (name, Self::from_value(node)))
                        .collect(),
                ),
            },
            _ => Self::Dir(FileTree::new()),
        }
    }
}

impl<'de> Deserialize<'de> for FileNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

// =============================================================================
// Lenient Fields
// =============================================================================

/// A list of strings; a lone string is a one-element list, anything else
/// (including `null`) is empty. Non-string items are dropped.
fn lenient_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        Value::String(s) => vec![s],
        _ => Vec::new(),
    })
}

/// Optional text; numbers and booleans are stringified, other values dropped.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

fn lenient_name<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    lenient_text(deserializer).map(Option::unwrap_or_default)
}

fn lenient_tree<'de, D: Deserializer<'de>>(deserializer: D) -> Result<FileTree, D::Error> {
    Ok(match FileNode::deserialize(deserializer)? {
        FileNode::Dir(tree) => tree,
        FileNode::File { .. } => FileTree::new(),
    })
}

// =============================================================================
// Package
// =============================================================================

/// Which sidebar listing a package belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tier {
    HighLevel,
    LowLevel,
}

/// Package entry from `packages/index.json`.
///
/// Every field tolerates missing, `null` or mistyped values so one odd
/// manifest cannot take down the whole index.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Package {
    /// Package name (filled from the index key when absent)
    #[serde(default, deserialize_with = "lenient_name")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub version: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub license: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub contributors: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub dependencies: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub keywords: Vec<String>,
    /// Directories (relative to the package root) holding module sources
    #[serde(default, deserialize_with = "lenient_list")]
    pub lib: Vec<String>,
    #[serde(default, deserialize_with = "lenient_tree")]
    pub files: FileTree,
    /// Inline readme markdown used by the package summaries
    #[serde(default, deserialize_with = "lenient_text")]
    pub readme: Option<String>,
}

impl Package {
    pub fn is_low_level(&self) -> bool {
        self.keywords.iter().any(|k| k == LOW_LEVEL_KEYWORD)
    }

    pub fn tier(&self) -> Tier {
        if self.is_low_level() {
            Tier::LowLevel
        } else {
            Tier::HighLevel
        }
    }

    /// Author followed by contributors.
    pub fn authors(&self) -> Vec<String> {
        self.author
            .iter()
            .chain(self.contributors.iter())
            .cloned()
            .collect()
    }

    /// Module names across all `lib` roots, sorted ascending.
    ///
    /// A module is any `.js` file under a root; its name is the path relative
    /// to the root with the suffix removed (`content/worker.js` -> `content/worker`).
    pub fn modules(&self) -> Vec<String> {
        let mut modules = Vec::new();
        for root in &self.lib {
            if let Some(tree) = self.dir(root) {
                collect_modules(tree, "", &mut modules);
            }
        }
        modules.sort();
        modules
    }

    /// Check that `path` names a file (not a directory) in the package tree.
    ///
    /// Empty segments (`/README.md`, `docs//a.md`) never match.
    pub fn has_file(&self, path: &str) -> bool {
        if path.split('/').any(str::is_empty) {
            return false;
        }
        let (dir, file) = match path.rsplit_once('/') {
            Some((dir, file)) => (self.dir(dir), file),
            None => (Some(&self.files), path),
        };
        matches!(dir.and_then(|d| d.get(file)), Some(FileNode::File { .. }))
    }

    /// URL of a file inside this package. Does not check existence.
    pub fn file_url(&self, filename: &str) -> String {
        format!("{}/{}/{}", PACKAGES_ROOT, self.name, filename)
    }

    /// Walk `path` segment by segment, returning the directory it names.
    fn dir(&self, path: &str) -> Option<&FileTree> {
        let mut current = &self.files;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            match current.get(segment) {
                Some(FileNode::Dir(children)) => current = children,
                _ => return None,
            }
        }
        Some(current)
    }
}

fn collect_modules(tree: &FileTree, prefix: &str, out: &mut Vec<String>) {
    for (name, node) in tree {
        match node {
            FileNode::File { .. } => {
                if let Some(stem) = name.strip_suffix(MODULE_SUFFIX) {
                    out.push(format!("{}{}", prefix, stem));
                }
            }
            FileNode::Dir(children) => {
                collect_modules(children, &format!("{}{}/", prefix, name), out);
            }
        }
    }
}

// =============================================================================
// Package Index
// =============================================================================

/// All packages of the deployment, keyed (and therefore sorted) by name.
///
/// Loaded once at startup and never modified afterwards.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PackageIndex {
    packages: BTreeMap<String, Package>,
}

impl PackageIndex {
    /// Parse `packages/index.json`.
    ///
    /// Fails only when the document is not a JSON object. Entries that are
    /// not objects are skipped with a warning.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let entries: BTreeMap<String, Value> = serde_json::from_str(json)?;
        let mut packages = BTreeMap::new();
        for (key, entry) in entries {
            match serde_json::from_value::<Package>(entry) {
                Ok(mut package) => {
                    if package.name.is_empty() {
                        package.name = key.clone();
                    }
                    packages.insert(key, package);
                }
                Err(e) => tracing::warn!(package = %key, error = %e, "skipping malformed package"),
            }
        }
        Ok(Self { packages })
    }

    pub fn get(&self, name: &str) -> Option<&Package> {
        self.packages.get(name)
    }

    /// Packages of one tier, sorted by name.
    pub fn packages(&self, tier: Tier) -> impl Iterator<Item = &Package> {
        self.packages.values().filter(move |p| p.tier() == tier)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}
