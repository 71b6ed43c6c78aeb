/*! Dataset and treebank discovery.

Probe data is laid out as `<root>/<feature_pos>/<language>/{train,dev,test,posthoc}.tsv`.
Every leaf directory of the root is a dataset group, identified by a [GroupId].

Treebanks are looked up by language name among the directories of the treebank root
(e.g. `ud-treebanks-v2.12/UD_English-EWT`).
!*/
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use walkdir::WalkDir;

use crate::error::Error;
use crate::normalize::normalize;
use crate::tags::{GroupId, TagSpec};

/// Split kinds, in processing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Split {
    Train,
    Dev,
    Test,
    Posthoc,
}

impl Split {
    pub fn file_name(&self) -> &'static str {
        match self {
            Split::Train => "train.tsv",
            Split::Dev => "dev.tsv",
            Split::Test => "test.tsv",
            Split::Posthoc => "posthoc.tsv",
        }
    }
}

/// Split files of a dataset group. Missing files are [None].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitFiles {
    pub train: Option<PathBuf>,
    pub dev: Option<PathBuf>,
    /// either `test.tsv` or `posthoc.tsv`
    pub test: Option<PathBuf>,
    pub test_split: Option<Split>,
}

impl SplitFiles {
    /// Look for split files in `dir`.
    pub fn in_dir(dir: &Path, posthoc: bool) -> Self {
        let existing = |split: Split| {
            let path = dir.join(split.file_name());
            if path.is_file() {
                Some(path)
            } else {
                debug!("no {} in {:?}", split.file_name(), dir);
                None
            }
        };
        let test_split = if posthoc { Split::Posthoc } else { Split::Test };
        let test = existing(test_split);

        Self {
            train: existing(Split::Train),
            dev: existing(Split::Dev),
            test_split: test.as_ref().map(|_| test_split),
            test,
        }
    }

    /// Existing splits, train first.
    pub fn iter(&self) -> impl Iterator<Item = (Split, &Path)> {
        let test_split = self.test_split.unwrap_or(Split::Test);
        [
            (Split::Train, self.train.as_deref()),
            (Split::Dev, self.dev.as_deref()),
            (test_split, self.test.as_deref()),
        ]
        .into_iter()
        .filter_map(|(split, path)| path.map(|p| (split, p)))
    }

    pub fn is_empty(&self) -> bool {
        self.train.is_none() && self.dev.is_none() && self.test.is_none()
    }
}

/// A feature/POS group of a language, with its split files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetGroup {
    pub id: GroupId,
    pub dir: PathBuf,
    pub files: SplitFiles,
}

/// Directories below `root` (included) that have no subdirectories.
///
/// Results are sorted.
pub fn leaf_dirs(root: &Path) -> Result<Vec<PathBuf>, Error> {
    let mut dirs = BTreeSet::new();
    let mut parents = HashSet::new();
    for entry in WalkDir::new(root) {
        let entry = entry?;
        if !entry.file_type().is_dir() {
            continue;
        }
        if entry.depth() > 0 {
            if let Some(parent) = entry.path().parent() {
                parents.insert(parent.to_path_buf());
            }
        }
        dirs.insert(entry.into_path());
    }
    Ok(dirs.into_iter().filter(|dir| !parents.contains(dir)).collect())
}

/// Dataset groups of `root` that are permitted by `tags`.
///
/// Leaf directories that don't follow the layout are skipped with a warning,
/// as are groups without any split file.
pub fn dataset_groups(
    root: &Path,
    tags: &TagSpec,
    posthoc: bool,
) -> Result<Vec<DatasetGroup>, Error> {
    let mut groups = Vec::new();
    for dir in leaf_dirs(root)? {
        let id = match GroupId::from_dir(&dir) {
            Ok(id) => id,
            Err(e) => {
                warn!("skipping dataset directory: {}", e);
                continue;
            }
        };
        if !tags.permits_group(&id) {
            continue;
        }
        let files = SplitFiles::in_dir(&dir, posthoc);
        if files.is_empty() {
            warn!("[{}] no split files in {:?}", id.language, dir);
            continue;
        }
        groups.push(DatasetGroup { id, dir, files });
    }
    Ok(groups)
}

/// Partition groups by language.
pub fn group_by_language(groups: Vec<DatasetGroup>) -> BTreeMap<String, Vec<DatasetGroup>> {
    let mut by_language: BTreeMap<String, Vec<DatasetGroup>> = BTreeMap::new();
    for group in groups {
        by_language
            .entry(group.id.language.clone())
            .or_default()
            .push(group);
    }
    by_language
}

/// Language name as spelled in treebank directory names.
fn treebank_language(language: &str) -> String {
    language.to_lowercase().replace("bokmal", "bokmaal")
}

/// CoNLL-U files of every treebank directory whose name contains `language`.
///
/// Names are compared once normalized (`Norwegian-Bokmal` matches `UD_Norwegian-Bokmaal`).
pub fn treebank_files(root: &Path, language: &str) -> Result<Vec<PathBuf>, Error> {
    let language = normalize(&treebank_language(language));
    if language.is_empty() {
        return Ok(Vec::new());
    }

    let in_treebank = |dir: &Path| {
        dir.components().any(|c| {
            normalize(&c.as_os_str().to_string_lossy())
                .as_str()
                .contains(language.as_str())
        })
    };

    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension() != Some(OsStr::new("conllu")) {
            continue;
        }
        // only directories below the root are treebank names
        let rel = path.strip_prefix(root).unwrap_or(path);
        if rel.parent().map_or(false, |dir| in_treebank(dir)) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn discover_groups() {
        let root = tempfile::tempdir().unwrap();
        let data = root.path();
        touch(&data.join("number_noun/English/train.tsv"));
        touch(&data.join("number_noun/English/dev.tsv"));
        touch(&data.join("number_noun/English/test.tsv"));
        touch(&data.join("number_noun/German/train.tsv"));
        touch(&data.join("case_noun/German/posthoc.tsv"));
        fs::create_dir_all(data.join("tense_verb/French")).unwrap();
        fs::create_dir_all(data.join("broken/French")).unwrap();

        let groups = dataset_groups(data, &TagSpec::all(), false).unwrap();
        let ids: Vec<String> = groups.iter().map(|g| g.id.to_string()).collect();
        assert_eq!(ids, vec!["English/number/noun", "German/number/noun"]);

        let english = &groups[0].files;
        let splits: Vec<Split> = english.iter().map(|(split, _)| split).collect();
        assert_eq!(splits, vec![Split::Train, Split::Dev, Split::Test]);
        assert_eq!(groups[1].files.dev, None);

        let posthoc = dataset_groups(data, &TagSpec::parse("german,all").unwrap(), true).unwrap();
        assert_eq!(posthoc.len(), 2);
        let case = posthoc.iter().find(|g| g.id.feature == "case").unwrap();
        assert_eq!(case.files.test_split, Some(Split::Posthoc));
        assert_eq!(case.files.iter().count(), 1);

        let by_language = group_by_language(groups);
        assert_eq!(by_language.keys().collect::<Vec<_>>(), vec!["English", "German"]);
    }

    #[test]
    fn find_treebanks() {
        let root = tempfile::tempdir().unwrap();
        let tb = root.path().join("ud-treebanks-v2.12");
        touch(&tb.join("UD_English-EWT/en_ewt-ud-train.conllu"));
        touch(&tb.join("UD_English-EWT/en_ewt-ud-dev.conllu"));
        touch(&tb.join("UD_English-EWT/README.md"));
        touch(&tb.join("UD_English-GUM/en_gum-ud-test.conllu"));
        touch(&tb.join("UD_German-HDT/de_hdt-ud-train.conllu"));
        touch(&tb.join("UD_Norwegian-Bokmaal/no_bokmaal-ud-train.conllu"));

        let english = treebank_files(root.path(), "English").unwrap();
        assert_eq!(english.len(), 3);
        assert!(english.iter().all(|p| p.extension().unwrap() == "conllu"));

        let bokmal = treebank_files(root.path(), "Norwegian-Bokmal").unwrap();
        assert_eq!(bokmal.len(), 1);

        assert!(treebank_files(root.path(), "Basque").unwrap().is_empty());
    }

    #[test]
    fn treebank_root_with_pattern_characters() {
        let root = tempfile::tempdir().unwrap();
        let tb = root.path().join("ud[v2.12]*");
        touch(&tb.join("UD_English-EWT/en_ewt-ud-train.conllu"));
        touch(&tb.join("UD_English-EWT/nested/en_ewt-ud-dev.conllu"));
        touch(&tb.join("english.conllu"));

        let english = treebank_files(&tb, "English").unwrap();
        assert_eq!(
            english,
            vec![
                tb.join("UD_English-EWT/en_ewt-ud-train.conllu"),
                tb.join("UD_English-EWT/nested/en_ewt-ud-dev.conllu"),
            ]
        );
    }

    #[test]
    fn leaves_only() {
        let root = tempfile::tempdir().unwrap();
        touch(&root.path().join("a/b/train.tsv"));
        fs::create_dir_all(root.path().join("a/c")).unwrap();
        fs::create_dir_all(root.path().join("d")).unwrap();

        let leaves = leaf_dirs(root.path()).unwrap();
        assert_eq!(
            leaves,
            vec![
                root.path().join("a/b"),
                root.path().join("a/c"),
                root.path().join("d")
            ]
        );
        assert!(leaf_dirs(&root.path().join("missing")).is_err());
    }
}
