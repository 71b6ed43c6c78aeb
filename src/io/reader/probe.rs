//! Morphological probe split reading.
//!
//! Probe splits (`train.tsv`, `dev.tsv`, `test.tsv`, `posthoc.tsv`) are tab-separated:
//!
//! ```text
//! Tolles ( Fisch - ) Restaurant direkt am Luitjensee gelegen .	Tolles	0	Neut
//! ```
//!
//! sentence, target token, target index, gold label.
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use log::warn;

use crate::error::Error;
use crate::normalize::{normalize, SentenceKey};

/// One line of a probe split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRecord {
    pub sentence: String,
    pub target: Option<String>,
    pub target_index: Option<usize>,
    pub label: Option<String>,
}

impl ProbeRecord {
    pub fn new(sentence: &str) -> Self {
        Self {
            sentence: sentence.to_string(),
            target: None,
            target_index: None,
            label: None,
        }
    }

    /// Returns [None] on lines that have no sentence.
    fn from_record(record: &StringRecord) -> Option<Self> {
        let field = |idx: usize| {
            record
                .get(idx)
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(String::from)
        };

        let sentence = field(0)?;
        Some(Self {
            sentence,
            target: field(1),
            target_index: field(2).and_then(|idx| idx.parse().ok()),
            label: field(3),
        })
    }

    pub fn key(&self) -> SentenceKey {
        normalize(&self.sentence)
    }
}

/// Probe records of a split, keyed by [SentenceKey].
///
/// Keys keep the order in which they first appeared, and a later line with the same key
/// replaces the earlier record.
#[derive(Debug, Default)]
pub struct ProbeSplit {
    records: Vec<(SentenceKey, ProbeRecord)>,
    positions: HashMap<SentenceKey, usize>,
}

impl ProbeSplit {
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        Self::from_reader(File::open(path)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, Error> {
        let mut reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(reader);

        let mut split = Self::default();
        for record in reader.records() {
            if let Some(record) = ProbeRecord::from_record(&record?) {
                split.insert(record);
            }
        }
        Ok(split)
    }

    /// Add `record`. Records whose sentence has an empty key are skipped.
    pub fn insert(&mut self, record: ProbeRecord) {
        let key = record.key();
        if key.is_empty() {
            warn!("skipping probe sentence without key: {:?}", record.sentence);
            return;
        }
        match self.positions.get(&key) {
            Some(&pos) => self.records[pos].1 = record,
            None => {
                self.positions.insert(key.clone(), self.records.len());
                self.records.push((key, record));
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SentenceKey, &ProbeRecord)> {
        self.records.iter().map(|(key, record)| (key, record))
    }

    /// Number of distinct sentences.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
