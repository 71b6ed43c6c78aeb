/*! Matching and extraction.

Probe sentences are joined with treebank sentences on their [SentenceKey](crate::normalize::SentenceKey).
For each matched sentence, every dependency edge whose dependent carries the requested feature
and part of speech yields an [ExtractedRow].

A [TagVocabulary] computed on the train split restricts the feature values that are extracted
from the dev and test splits, so that no label is seen at test time that wasn't seen at training.
!*/
use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::io::reader::{DependencyIndex, DependencySentence, ProbeSplit, TokenEdge};

/// An extracted supervised example.
///
/// Field order is the order of the columns of expanded datasets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRow {
    /// whitespace-joined treebank tokens
    pub sentence: String,
    pub head: String,
    pub head_index: usize,
    /// feature value of the dependent
    pub value: String,
    /// `dependent_index - head_index`
    pub distance: i64,
    pub dependent: String,
    pub dependent_index: usize,
    pub relation: String,
    /// number of treebank tokens of the sentence, not written to datasets.
    #[serde(skip)]
    pub nb_tokens: usize,
}

impl ExtractedRow {
    fn new(sentence: &DependencySentence, joined: &str, edge: &TokenEdge, value: &str) -> Self {
        Self {
            sentence: joined.to_string(),
            head: edge.head.clone(),
            head_index: edge.head_index,
            value: value.to_string(),
            distance: edge.dependent_index as i64 - edge.head_index as i64,
            dependent: edge.dependent.clone(),
            dependent_index: edge.dependent_index,
            relation: edge.relation.clone(),
            nb_tokens: sentence.tokens.len(),
        }
    }
}

/// Feature values observed on a train split.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagVocabulary(BTreeSet<String>);

impl TagVocabulary {
    pub fn insert(&mut self, value: &str) {
        self.0.insert(value.to_string());
    }

    pub fn contains(&self, value: &str) -> bool {
        self.0.contains(value)
    }

    /// An empty vocabulary permits every value.
    pub fn permits(&self, value: &str) -> bool {
        self.0.is_empty() || self.0.contains(value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for TagVocabulary {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self(iter.into_iter().map(String::from).collect())
    }
}

/// Result of the extraction of a probe split.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub rows: Vec<ExtractedRow>,
    pub observed: TagVocabulary,
    /// probe sentences that yielded at least one row
    pub matched: usize,
    /// distinct probe sentences
    pub total: usize,
}

impl Extraction {
    /// Percentage of probe sentences that yielded at least one row.
    pub fn match_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.matched as f64 / self.total as f64 * 100.0
        }
    }
}

/// Rows of a single treebank sentence.
fn sentence_rows(
    sentence: &DependencySentence,
    vocabulary: Option<&TagVocabulary>,
    pos: &str,
    feature: &str,
) -> Vec<(ExtractedRow, String)> {
    let joined = sentence.joined_tokens();
    sentence
        .edges
        .iter()
        .filter(|edge| edge.pos.eq_ignore_ascii_case(pos))
        .filter_map(|edge| edge.feature(feature).map(|value| (edge, value)))
        .filter(|(_, value)| vocabulary.map_or(true, |v| v.permits(value)))
        .map(|(edge, value)| {
            let row = ExtractedRow::new(sentence, &joined, edge, value);
            (row, value.to_string())
        })
        .collect()
}

/// Extract rows for `feature`/`pos` from the probe sentences found in `index`.
///
/// Without `vocabulary` (or with an empty one), every feature value is accepted.
/// Rows follow probe order, then the treebank edge order.
pub fn extract(
    index: &DependencyIndex,
    probes: &ProbeSplit,
    vocabulary: Option<&TagVocabulary>,
    pos: &str,
    feature: &str,
) -> Extraction {
    let mut extraction = Extraction {
        total: probes.len(),
        ..Default::default()
    };

    for (key, _) in probes.iter() {
        let Some(sentence) = index.get(key) else {
            continue;
        };
        let rows = sentence_rows(sentence, vocabulary, pos, feature);
        if rows.is_empty() {
            continue;
        }
        extraction.matched += 1;
        for (row, value) in rows {
            extraction.observed.insert(&value);
            extraction.rows.push(row);
        }
    }
    extraction
}

/// Read the probe split at `path` and [extract] it.
pub fn extract_path(
    index: &DependencyIndex,
    path: &Path,
    vocabulary: Option<&TagVocabulary>,
    pos: &str,
    feature: &str,
) -> Result<Extraction, Error> {
    let probes = ProbeSplit::from_path(path)?;
    Ok(extract(index, &probes, vocabulary, pos, feature))
}
