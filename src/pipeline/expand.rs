//! Dataset expansion pipeline
//!
//! For each language of the probe data:
//!
//! 1. Every treebank file of the language is parsed into a single [DependencyIndex].
//! 1. For each selected feature/POS group, the train, dev and test splits are processed in that order:
//!   1. The probe split is read and joined with the index, yielding [ExtractedRow]s
//!      (see [crate::extraction::extract]).
//!   1. The feature values observed on the train split become the vocabulary of the dev and test splits.
//!   1. Extractions that yield nothing, or that have a too low match rate, are discarded.
//!   1. The remaining ones are written to `<dst>/<feature_pos>/<language>/<split>.tsv`,
//!      verbatim or randomized.
//!
//! Languages are independent and processed concurrently.
//!
//! [ExtractedRow]: crate::extraction::ExtractedRow
use std::path::PathBuf;

use log::{debug, error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::error::Error;
use crate::extraction::{extract_path, TagVocabulary};
use crate::filtering::{Filter, MatchRate};
use crate::io::reader::DependencyIndex;
use crate::io::writer::{emit, EmitMode};
use crate::layout::{self, DatasetGroup, Split};
use crate::pipeline::pipeline::Pipeline;
use crate::tags::TagSpec;

/// Outcome of an expansion run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandSummary {
    /// written dataset files
    pub written: Vec<PathBuf>,
    /// discarded or unreadable splits
    pub discarded: usize,
    /// splits whose dataset file couldn't be written
    pub failed_splits: usize,
    /// languages without treebank files
    pub skipped_languages: Vec<String>,
    /// languages whose processing failed
    pub failed_languages: Vec<String>,
}

impl ExpandSummary {
    fn merge(&mut self, other: ExpandSummary) {
        self.written.extend(other.written);
        self.discarded += other.discarded;
        self.failed_splits += other.failed_splits;
        self.skipped_languages.extend(other.skipped_languages);
        self.failed_languages.extend(other.failed_languages);
    }
}

pub struct Expand {
    probes: PathBuf,
    treebanks: PathBuf,
    dst: PathBuf,
    tags: TagSpec,
    mode: EmitMode,
    filter: MatchRate,
    seed: Option<u64>,
}

impl Expand {
    pub fn new(
        probes: PathBuf,
        treebanks: PathBuf,
        dst: PathBuf,
        tags: TagSpec,
        mode: EmitMode,
    ) -> Self {
        debug!("expanding {:?} with {:?} into {:?}", probes, treebanks, dst);
        Self {
            probes,
            treebanks,
            dst,
            tags,
            mode,
            filter: MatchRate::default(),
            seed: None,
        }
    }

    pub fn with_filter(mut self, filter: MatchRate) -> Self {
        self.filter = filter;
        self
    }

    /// Seed randomized datasets. Each language gets its own generator.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    fn rng(&self, language_nb: usize) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(language_nb as u64)),
            None => StdRng::from_entropy(),
        }
    }

    /// Process the splits of a group, train first.
    ///
    /// Splits that can't be read or written are logged and counted in the summary.
    fn process_group(
        &self,
        index: &DependencyIndex,
        group: &DatasetGroup,
        rng: &mut StdRng,
    ) -> ExpandSummary {
        let id = &group.id;
        let mut summary = ExpandSummary::default();
        let mut vocabulary: Option<TagVocabulary> = None;

        for (split, path) in group.files.iter() {
            let extracted = extract_path(index, path, vocabulary.as_ref(), &id.pos, &id.feature);
            let extraction = match extracted {
                Ok(extraction) => extraction,
                Err(e) => {
                    error!("[{}] could not read {:?}: {}", id.language, path, e);
                    summary.discarded += 1;
                    continue;
                }
            };

            info!(
                "[{}] expanded {}/{} sentences (match rate: {:.2}%) from {:?}",
                id.language,
                extraction.matched,
                extraction.total,
                extraction.match_rate(),
                path
            );

            if split == Split::Train {
                debug!(
                    "[{}] {} vocabulary: {:?}",
                    id.language,
                    id,
                    extraction.observed.iter().collect::<Vec<_>>()
                );
                vocabulary = Some(extraction.observed.clone());
            }

            if !self.filter.detect(&extraction) {
                warn!(
                    "[{}] discarding {:?}: {} rows, match rate {:.2}% (min. {:.2}%)",
                    id.language,
                    path,
                    extraction.rows.len(),
                    extraction.match_rate(),
                    self.filter.min_rate()
                );
                summary.discarded += 1;
                continue;
            }

            let dst = self.dst.join(id.rel_dir()).join(split.file_name());
            info!("[{}] writing {} rows to {:?}", id.language, extraction.rows.len(), dst);
            match emit(&extraction.rows, &dst, self.mode, rng) {
                Ok(_) => summary.written.push(dst),
                Err(e) => {
                    error!("[{}] could not write {:?}: {}", id.language, dst, e);
                    summary.failed_splits += 1;
                }
            }
        }

        summary
    }

    /// Index the language treebanks then process every group.
    fn process_language(
        &self,
        language: &str,
        groups: &[DatasetGroup],
        rng: &mut StdRng,
    ) -> Result<ExpandSummary, Error> {
        let mut summary = ExpandSummary::default();

        let treebank_files = layout::treebank_files(&self.treebanks, language)?;
        if treebank_files.is_empty() {
            warn!("[{}] no treebank found in {:?}", language, self.treebanks);
            summary.skipped_languages.push(language.to_string());
            return Ok(summary);
        }

        info!("[{}] reading {} treebank files", language, treebank_files.len());
        let index = DependencyIndex::from_paths(&treebank_files);

        for (nb, group) in groups.iter().enumerate() {
            info!(
                "[{}] {}/{}: feature {}, PoS {}",
                language,
                nb + 1,
                groups.len(),
                group.id.feature,
                group.id.pos
            );
            summary.merge(self.process_group(&index, group, rng));
        }

        info!("[{}] done", language);
        Ok(summary)
    }
}

impl Pipeline<ExpandSummary> for Expand {
    fn run(&self) -> Result<ExpandSummary, Error> {
        let groups = layout::dataset_groups(&self.probes, &self.tags, false)?;
        if groups.is_empty() {
            warn!("no dataset selected in {:?}", self.probes);
        }
        let by_language: Vec<(String, Vec<DatasetGroup>)> =
            layout::group_by_language(groups).into_iter().collect();

        let results: Vec<(String, Result<ExpandSummary, Error>)> = by_language
            .into_par_iter()
            .enumerate()
            .map(|(nb, (language, groups))| {
                let mut rng = self.rng(nb);
                let result = self.process_language(&language, &groups, &mut rng);
                (language, result)
            })
            .collect();

        let mut summary = ExpandSummary::default();
        for (language, result) in results {
            match result {
                Ok(language_summary) => summary.merge(language_summary),
                Err(e) => {
                    error!("[{}] {}", language, e);
                    summary.failed_languages.push(language);
                }
            }
        }

        info!(
            "{} dataset files written, {} splits discarded, {} failed",
            summary.written.len(),
            summary.discarded,
            summary.failed_splits
        );
        Ok(summary)
    }
}
