//! CoNLL-U treebank parsing
//!
//! Parses CoNLL-U files into a [DependencyIndex], keyed by the normalized `# text` of each sentence.
//!
//! ```text
//! # sent_id = train-5
//! # text = A verseny több szinten folyik.
//! 1	A	a	DET	_	Definite=Def|PronType=Art	2	det	_	_
//! 2	verseny	verseny	NOUN	_	Case=Nom|Number=Sing	5	nsubj	_	_
//! 3	több	több	DET	_	Definite=Ind|PronType=Ind	4	det	_	_
//! 4	szinten	szint	NOUN	_	Case=Sup|Number=Sing	5	obl	_	_
//! 5	folyik	folyik	VERB	_	Mood=Ind|Number=Sing|Tense=Pres	0	root	_	SpaceAfter=No
//! 6	.	.	PUNCT	_	_	5	punct	_	_
//! ```
//!
//! CoNLL-U format: https://universaldependencies.org/format.html
use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use itertools::Itertools;
use log::{debug, error, info, warn};

use super::BlockReader;
use crate::error::Error;
use crate::normalize::{normalize, SentenceKey};

const TEXT_COMMENT: &str = "# text =";
const NB_FIELDS: usize = 10;

// CoNLL-U columns
const ID: usize = 0;
const FORM: usize = 1;
const UPOS: usize = 3;
const FEATS: usize = 5;
const HEAD: usize = 6;
const DEPREL: usize = 7;

/// A dependent token linked to its head.
///
/// Indices are 0-based positions in the sentence tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenEdge {
    pub dependent: String,
    pub dependent_index: usize,
    pub pos: String,
    /// raw `Key=Value|Key=Value` features of the dependent.
    pub feats: String,
    pub head: String,
    pub head_index: usize,
    pub relation: String,
}

impl TokenEdge {
    /// Value of the `name` feature of the dependent (case-insensitive on the key).
    ///
    /// Feature pairs without a `=` separator are skipped.
    pub fn feature(&self, name: &str) -> Option<&str> {
        for pair in self.feats.split('|') {
            match pair.split_once('=') {
                Some((key, value)) if key.eq_ignore_ascii_case(name) => return Some(value),
                Some(_) => (),
                None if pair.is_empty() || pair == "_" => (),
                None => warn!("ignoring malformed feature {:?} of {:?}", pair, self.dependent),
            }
        }
        None
    }
}

/// One treebank sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySentence {
    /// original text, from the `# text =` comment.
    pub text: String,
    pub tokens: Vec<String>,
    /// edges in treebank order, root and head-less tokens excluded.
    pub edges: Vec<TokenEdge>,
}

impl DependencySentence {
    /// Whitespace-joined tokens.
    pub fn joined_tokens(&self) -> String {
        self.tokens.iter().join(" ")
    }

    pub fn key(&self) -> SentenceKey {
        normalize(&self.text)
    }
}

/// Returns true on positive integer ids, which rules out multiword ranges (`1-2`) and empty nodes (`1.1`).
fn is_token_id(field: &str) -> bool {
    !field.is_empty()
        && field.bytes().all(|b| b.is_ascii_digit())
        && field.bytes().any(|b| b != b'0')
}

/// Parse a sentence block (comments and token lines, without blank lines).
///
/// Fails if the block has no `# text =` comment or if a token line doesn't have 10 fields.
/// Heads that can't be resolved in the block are skipped with a warning.
pub fn parse_block<S: AsRef<str>>(lines: &[S]) -> Result<DependencySentence, Error> {
    let (comments, data): (Vec<&str>, Vec<&str>) = lines
        .iter()
        .map(AsRef::as_ref)
        .partition(|line| line.starts_with('#'));

    let text = comments
        .iter()
        .find_map(|line| line.strip_prefix(TEXT_COMMENT))
        .map(|text| text.trim().to_string())
        .ok_or_else(|| {
            Error::MalformedRecord(format!(
                "no text comment in block starting with {:?}",
                comments.first().or(data.first()).copied().unwrap_or_default()
            ))
        })?;

    let mut rows = Vec::with_capacity(data.len());
    for line in data {
        let fields: Vec<&str> = line.split('\t').collect();
        if !is_token_id(fields[ID]) {
            continue;
        }
        if fields.len() < NB_FIELDS {
            return Err(Error::MalformedRecord(format!(
                "expected {} fields, found {} in {:?} ({:?})",
                NB_FIELDS,
                fields.len(),
                line,
                text
            )));
        }
        rows.push(fields);
    }

    let tokens: Vec<String> = rows.iter().map(|fields| fields[FORM].to_string()).collect();

    let mut edges = Vec::with_capacity(rows.len());
    for (dependent_index, fields) in rows.iter().enumerate() {
        if fields[HEAD] == "_" || fields[DEPREL] == "root" {
            continue;
        }

        // 1-based head resolved against the whole block
        let head_index = match fields[HEAD].parse::<usize>() {
            Ok(head) if head > 0 && head <= tokens.len() => head - 1,
            _ => {
                warn!(
                    "unresolved head {:?} for token {:?} in {:?}",
                    fields[HEAD], fields[FORM], text
                );
                continue;
            }
        };

        edges.push(TokenEdge {
            dependent: fields[FORM].to_string(),
            dependent_index,
            pos: fields[UPOS].to_string(),
            feats: fields[FEATS].to_string(),
            head: tokens[head_index].clone(),
            head_index,
            relation: fields[DEPREL].to_string(),
        });
    }

    Ok(DependencySentence {
        text,
        tokens,
        edges,
    })
}

/// Per-language index of treebank sentences.
///
/// A sentence whose key is already present replaces the previous one.
#[derive(Debug, Default)]
pub struct DependencyIndex {
    sentences: HashMap<SentenceKey, DependencySentence>,
}

impl DependencyIndex {
    /// Build the index from every readable file of `paths`.
    ///
    /// Files that can't be read are logged and skipped.
    pub fn from_paths<P: AsRef<Path>>(paths: &[P]) -> Self {
        let mut index = Self::default();
        for path in paths {
            let path = path.as_ref();
            match index.add_path(path) {
                Ok(nb) => debug!("{} sentences read from {:?}", nb, path),
                Err(e) => error!("could not read treebank file {:?}: {}", path, e),
            }
        }
        info!("indexed {} treebank sentences", index.len());
        index
    }

    /// Add sentences of a CoNLL-U file.
    pub fn add_path(&mut self, path: &Path) -> Result<usize, Error> {
        self.add_blocks(BlockReader::from_path(path)?)
    }

    /// Add sentences from a block reader.
    ///
    /// Malformed blocks are skipped with a warning.
    /// Returns the number of added sentences.
    pub fn add_blocks<T: BufRead>(&mut self, blocks: BlockReader<T>) -> Result<usize, Error> {
        let mut nb_added = 0;
        for block in blocks {
            match parse_block(&block?) {
                Ok(sentence) => {
                    if self.insert(sentence) {
                        nb_added += 1;
                    }
                }
                Err(e) => warn!("skipping sentence: {}", e),
            }
        }
        Ok(nb_added)
    }

    /// Index `sentence`. Sentences with an empty key are not indexed, and false is returned.
    pub fn insert(&mut self, sentence: DependencySentence) -> bool {
        let key = sentence.key();
        if key.is_empty() {
            debug!("not indexing sentence without key: {:?}", sentence.text);
            return false;
        }
        self.sentences.insert(key, sentence);
        true
    }

    pub fn get(&self, key: &SentenceKey) -> Option<&DependencySentence> {
        self.sentences.get(key)
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}
