/*! Trained model lookup.

Training runs leave one directory per model in the experiment directory, containing
`result.yaml`, `config.yaml` and `model`. The [ModelIndex] maps a dataset's tag path
(`feature_pos/language/train.tsv`) to the newest model directory trained on it.
!*/
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use log::{debug, info, warn};
use serde::Deserialize;

use crate::error::Error;
use crate::layout::{self, DatasetGroup, Split};
use crate::tags::{select, PathRole, TagSpec};

const RESULT_FILE: &str = "result.yaml";
const CONFIG_FILE: &str = "config.yaml";
const MODEL_FILE: &str = "model";

/// Probing configuration, as used to launch trainings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ProbingConfig {
    pub experiment_dir: PathBuf,
}

impl ProbingConfig {
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        Ok(serde_yaml::from_reader(File::open(path)?)?)
    }
}

/// Configuration saved alongside a trained model.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ModelConfig {
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub experiment_dir: Option<PathBuf>,
    pub train_file: String,
    #[serde(default)]
    pub dev_file: Option<String>,
    #[serde(default)]
    pub dev_acc: Option<f64>,
}

impl ModelConfig {
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        Ok(serde_yaml::from_reader(File::open(path)?)?)
    }
}

/// Last three segments of a dataset path, e.g. `number_noun/English/train.tsv`.
pub fn tag_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').collect();
    segments[segments.len().saturating_sub(3)..].join("/")
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelEntry {
    pub dir: PathBuf,
    pub created: SystemTime,
    pub config: ModelConfig,
}

/// Newest model directory per training file.
#[derive(Debug, Default)]
pub struct ModelIndex {
    models: HashMap<String, ModelEntry>,
}

/// Creation time of `path`, or modification time on platforms that don't record creation.
fn creation_time(path: &Path) -> Result<SystemTime, Error> {
    let meta = std::fs::metadata(path)?;
    Ok(meta.created().or_else(|_| meta.modified())?)
}

impl ModelIndex {
    /// Scan leaf directories of `experiment_dir`, keeping models whose training file is selected by `tags`.
    ///
    /// Directories with missing artifacts are ignored, unreadable configs are skipped with a warning.
    pub fn build(experiment_dir: &Path, tags: &TagSpec) -> Result<Self, Error> {
        let mut index = Self::default();
        for dir in layout::leaf_dirs(experiment_dir)? {
            let artifacts = [RESULT_FILE, CONFIG_FILE, MODEL_FILE];
            if !artifacts.iter().all(|f| dir.join(f).is_file()) {
                continue;
            }

            let entry = creation_time(&dir.join(MODEL_FILE)).and_then(|created| {
                let config = ModelConfig::from_path(&dir.join(CONFIG_FILE))?;
                Ok(ModelEntry {
                    dir: dir.clone(),
                    created,
                    config,
                })
            });

            match entry {
                Ok(entry) => index.insert(entry),
                Err(e) => warn!("skipping model directory {:?}: {}", dir, e),
            }
        }

        let keys: Vec<String> = index.models.keys().cloned().collect();
        let kept = select(tags, keys, PathRole::File);
        index.models.retain(|key, _| kept.contains(key));

        info!("found {} trained models in {:?}", index.len(), experiment_dir);
        Ok(index)
    }

    /// Insert `entry`, unless a newer model is already known for the same training file.
    pub fn insert(&mut self, entry: ModelEntry) {
        let key = tag_path(&entry.config.train_file);
        debug!("model {:?} trained on {}", entry.dir, key);
        match self.models.get(&key) {
            Some(existing) if existing.created >= entry.created => (),
            _ => {
                self.models.insert(key, entry);
            }
        }
    }

    pub fn get(&self, tag_path: &str) -> Option<&ModelEntry> {
        self.models.get(tag_path)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

/// A test (or posthoc) file paired with the model to evaluate on it.
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceTarget {
    pub group: DatasetGroup,
    pub model_dir: PathBuf,
    pub model_name: Option<String>,
    pub test_file: PathBuf,
}

/// Pair dataset groups of `data_root` with their trained model.
///
/// Groups without a model or without a test file are left out.
pub fn plan_inference(
    data_root: &Path,
    tags: &TagSpec,
    index: &ModelIndex,
    posthoc: bool,
) -> Result<Vec<InferenceTarget>, Error> {
    let mut targets = Vec::new();
    for group in layout::dataset_groups(data_root, tags, posthoc)? {
        let key = group.id.tag_path(Split::Train.file_name());
        let (model, test_file) = match (index.get(&key), group.files.test.clone()) {
            (Some(model), Some(test_file)) => (model, test_file),
            (None, _) => {
                debug!("[{}] no model trained on {}", group.id.language, key);
                continue;
            }
            (_, None) => {
                debug!("[{}] no test file for {}", group.id.language, group.id);
                continue;
            }
        };
        targets.push(InferenceTarget {
            model_dir: model.dir.clone(),
            model_name: model.config.model_name.clone(),
            test_file,
            group,
        });
    }
    Ok(targets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;

    fn model_dir(root: &Path, name: &str, train_file: &str, model_name: &str) -> PathBuf {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(RESULT_FILE), "dev_acc: 0.9\n").unwrap();
        fs::write(
            dir.join(CONFIG_FILE),
            format!(
                "model_name: {}\ntrain_file: {}\ndev_file: dev.tsv\ndev_acc: 0.9\nlayer: 6\n",
                model_name, train_file
            ),
        )
        .unwrap();
        fs::write(dir.join(MODEL_FILE), "weights").unwrap();
        dir
    }

    fn entry(dir: &str, train_file: &str, secs: u64) -> ModelEntry {
        ModelEntry {
            dir: PathBuf::from(dir),
            created: SystemTime::UNIX_EPOCH + Duration::from_secs(secs),
            config: ModelConfig {
                model_name: None,
                experiment_dir: None,
                train_file: train_file.to_string(),
                dev_file: None,
                dev_acc: None,
            },
        }
    }

    #[test]
    fn tag_paths() {
        assert_eq!(
            tag_path("/home/u/output/data/number_noun/English/train.tsv"),
            "number_noun/English/train.tsv"
        );
        assert_eq!(tag_path("English/train.tsv"), "English/train.tsv");
    }

    #[test]
    fn newest_model_wins() {
        let mut index = ModelIndex::default();
        let train = "/data/number_noun/English/train.tsv";
        index.insert(entry("exp/0001", train, 10));
        index.insert(entry("exp/0003", train, 30));
        index.insert(entry("exp/0002", train, 20));
        index.insert(entry("exp/0004", "/data/case_noun/German/train.tsv", 5));

        assert_eq!(index.len(), 2);
        assert_eq!(
            index.get("number_noun/English/train.tsv").unwrap().dir,
            PathBuf::from("exp/0003")
        );
    }

    #[test]
    fn build_and_plan() {
        let root = tempfile::tempdir().unwrap();
        let exp = root.path().join("exps");
        let data = root.path().join("data");

        let english_train = "/abs/data/number_noun/English/train.tsv";
        model_dir(&exp, "0001", english_train, "bert-base-multilingual-cased");
        model_dir(&exp, "0002", "/abs/data/case_noun/German/train.tsv", "xlm-roberta-base");
        // missing model artifact
        let incomplete = exp.join("0003");
        fs::create_dir_all(&incomplete).unwrap();
        fs::write(incomplete.join(CONFIG_FILE), "train_file: x/y/z.tsv\n").unwrap();
        // broken config
        let broken = exp.join("0004");
        fs::create_dir_all(&broken).unwrap();
        for f in [RESULT_FILE, MODEL_FILE] {
            fs::write(broken.join(f), "").unwrap();
        }
        fs::write(broken.join(CONFIG_FILE), "model_name: [unclosed\n").unwrap();

        let all = ModelIndex::build(&exp, &TagSpec::all()).unwrap();
        assert_eq!(all.len(), 2);

        let english = TagSpec::parse("english,all").unwrap();
        let index = ModelIndex::build(&exp, &english).unwrap();
        assert_eq!(index.len(), 1);

        for group in ["number_noun/English", "case_noun/German"] {
            let dir = data.join(group);
            fs::create_dir_all(&dir).unwrap();
            for f in ["train.tsv", "dev.tsv", "test.tsv"] {
                fs::write(dir.join(f), "").unwrap();
            }
        }

        let targets = plan_inference(&data, &TagSpec::all(), &index, false).unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].model_dir, exp.join("0001"));
        assert_eq!(
            targets[0].model_name.as_deref(),
            Some("bert-base-multilingual-cased")
        );
        assert_eq!(targets[0].test_file, data.join("number_noun/English/test.tsv"));

        // no posthoc files
        assert!(plan_inference(&data, &TagSpec::all(), &all, true)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn probing_config() {
        let root = tempfile::tempdir().unwrap();
        let path = root.path().join("transformer_probing.yaml");
        fs::write(&path, "experiment_dir: /home/u/workdir/exps/morph\nepochs: 200\n").unwrap();
        let config = ProbingConfig::from_path(&path).unwrap();
        assert_eq!(config.experiment_dir, PathBuf::from("/home/u/workdir/exps/morph"));
    }
}
