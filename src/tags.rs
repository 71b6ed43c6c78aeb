//! Tag specifications and dataset identifiers.
//!
//! A tag specification selects which `language,feature_pos` datasets participate, e.g.
//! `English,number_noun|German,all`. Matching is case-insensitive and `all` is a wildcard
//! at either position.
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::Error;

const WILDCARD: &str = "all";

/// Allowed feature_pos tags for a language.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Allowed {
    any: bool,
    tags: HashSet<String>,
}

impl Allowed {
    fn add(&mut self, feature_pos: &str) {
        if feature_pos == WILDCARD {
            self.any = true;
        } else {
            self.tags.insert(feature_pos.to_string());
        }
    }

    fn permits(&self, feature_pos: &str) -> bool {
        self.any || self.tags.contains(feature_pos)
    }
}

/// Parsed tag specification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSpec {
    wildcard: bool,
    /// `all,<feature_pos>` entries, applying to every language.
    any_language: Allowed,
    per_language: HashMap<String, Allowed>,
}

impl TagSpec {
    /// Spec that permits everything.
    pub fn all() -> Self {
        Self {
            wildcard: true,
            ..Default::default()
        }
    }

    /// Parse a `|`-separated list of `language,feature_pos` pairs.
    ///
    /// An empty specification permits everything.
    pub fn parse(spec: &str) -> Result<Self, Error> {
        let spec = spec.trim().to_lowercase();
        if spec.is_empty() {
            return Ok(Self::all());
        }

        let mut tags = Self::default();
        for entry in spec.split('|') {
            let (language, feature_pos) = entry
                .split_once(',')
                .map(|(l, fp)| (l.trim(), fp.trim()))
                .filter(|(l, fp)| !l.is_empty() && !fp.is_empty() && !fp.contains(','))
                .ok_or_else(|| Error::InvalidTagSpec(entry.to_string()))?;

            match (language, feature_pos) {
                (WILDCARD, WILDCARD) => tags.wildcard = true,
                (WILDCARD, fp) => tags.any_language.add(fp),
                (lang, fp) => tags
                    .per_language
                    .entry(lang.to_string())
                    .or_default()
                    .add(fp),
            }
        }
        Ok(tags)
    }

    /// Returns true if the `language`/`feature_pos` couple is selected (case-insensitive).
    pub fn permits(&self, language: &str, feature_pos: &str) -> bool {
        if self.wildcard {
            return true;
        }
        let language = language.to_lowercase();
        let feature_pos = feature_pos.to_lowercase();

        self.any_language.permits(&feature_pos)
            || self
                .per_language
                .get(&language)
                .map_or(false, |allowed| allowed.permits(&feature_pos))
    }

    pub fn permits_group(&self, group: &GroupId) -> bool {
        self.permits(&group.language, &group.feature_pos())
    }
}

impl FromStr for TagSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// What a candidate path points to, which sets where the language and feature_pos segments are.
///
/// - `Dir`: `.../feature_pos/language`
/// - `File`: `.../feature_pos/language/file`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathRole {
    Dir,
    File,
}

impl PathRole {
    fn back_offset(&self) -> usize {
        match self {
            PathRole::Dir => 1,
            PathRole::File => 2,
        }
    }
}

/// Language and feature_pos segments of `path`, counted from its end.
fn tag_segments(path: &Path, role: PathRole) -> Option<(String, String)> {
    let segments: Vec<String> = path
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    let offset = role.back_offset();
    if segments.len() < offset + 1 {
        return None;
    }
    let language = segments[segments.len() - offset].clone();
    let feature_pos = segments[segments.len() - offset - 1].clone();
    Some((language, feature_pos))
}

/// Keep the paths that are permitted by `tags`.
pub fn select<P: AsRef<Path>>(tags: &TagSpec, paths: Vec<P>, role: PathRole) -> Vec<P> {
    paths
        .into_iter()
        .filter(|path| {
            tag_segments(path.as_ref(), role)
                .map_or(false, |(language, feature_pos)| {
                    tags.permits(&language, &feature_pos)
                })
        })
        .collect()
}

/// Identifies a feature/POS group of a language.
///
/// Parsed once from a dataset directory (`.../feature_pos/language`).
/// `feature` and `pos` keep the casing of the directory name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId {
    pub language: String,
    pub feature: String,
    pub pos: String,
}

impl GroupId {
    pub fn new(language: &str, feature: &str, pos: &str) -> Self {
        Self {
            language: language.to_string(),
            feature: feature.to_string(),
            pos: pos.to_string(),
        }
    }

    /// Parse a dataset directory path.
    pub fn from_dir(dir: &Path) -> Result<Self, Error> {
        let (language, feature_pos) = tag_segments(dir, PathRole::Dir)
            .ok_or_else(|| Error::InvalidLayout(dir.to_path_buf()))?;
        let (feature, pos) = feature_pos
            .split_once('_')
            .filter(|(feature, pos)| !feature.is_empty() && !pos.is_empty())
            .ok_or_else(|| Error::InvalidLayout(dir.to_path_buf()))?;
        Ok(Self::new(&language, feature, pos))
    }

    /// `feature_pos` directory name.
    pub fn feature_pos(&self) -> String {
        format!("{}_{}", self.feature, self.pos)
    }

    /// Relative `feature_pos/language` path.
    pub fn rel_dir(&self) -> PathBuf {
        [self.feature_pos(), self.language.clone()].iter().collect()
    }

    /// Relative `feature_pos/language/file` key, the format used by [crate::models::ModelIndex].
    pub fn tag_path(&self, file_name: &str) -> String {
        format!("{}/{}/{}", self.feature_pos(), self.language, file_name)
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.language, self.feature, self.pos)
    }
}
