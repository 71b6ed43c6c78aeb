/*! Expanded and randomized dataset writers.

Both writers produce tab-separated rows without header or quoting.

- [ExpandedWriter] writes [ExtractedRow]s verbatim.
- [RandomizedWriter] keeps sentence, head and feature value, then replaces the dependency
  fields with a random token index and `_` placeholders.
!*/
use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::{QuoteStyle, ReaderBuilder, WriterBuilder};
use log::debug;
use rand::Rng;

use super::WriterTrait;
use crate::error::Error;
use crate::extraction::ExtractedRow;

const PLACEHOLDER: &str = "_";

/// Kind of dataset to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitMode {
    Expanded,
    Randomized,
}

fn tsv_writer<W: Write>(inner: W) -> csv::Writer<W> {
    WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quote_style(QuoteStyle::Never)
        .from_writer(inner)
}

pub struct ExpandedWriter<W: Write> {
    tsv: csv::Writer<W>,
}

impl<W: Write> ExpandedWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            tsv: tsv_writer(inner),
        }
    }
}

impl<W: Write> WriterTrait for ExpandedWriter<W> {
    type Item = ExtractedRow;

    fn write(&mut self, rows: &[ExtractedRow]) -> Result<(), Error> {
        for row in rows {
            self.write_single(row)?;
        }
        Ok(())
    }

    fn write_single(&mut self, row: &ExtractedRow) -> Result<(), Error> {
        Ok(self.tsv.serialize(row)?)
    }

    fn flush(&mut self) -> Result<(), Error> {
        Ok(self.tsv.flush()?)
    }
}

/// Writes randomized control rows.
///
/// The random index is uniformly drawn in `[0, nb_tokens)` of the row sentence.
pub struct RandomizedWriter<'r, W: Write, R: Rng> {
    tsv: csv::Writer<W>,
    rng: &'r mut R,
}

impl<'r, W: Write, R: Rng> RandomizedWriter<'r, W, R> {
    pub fn new(inner: W, rng: &'r mut R) -> Self {
        Self {
            tsv: tsv_writer(inner),
            rng,
        }
    }

    /// Fields of the randomized version of `row`.
    fn randomize(&mut self, row: &ExtractedRow) -> [String; 8] {
        let random_index = self.rng.gen_range(0..row.nb_tokens.max(1));
        [
            row.sentence.clone(),
            row.head.clone(),
            row.head_index.to_string(),
            row.value.clone(),
            random_index.to_string(),
            PLACEHOLDER.to_string(),
            PLACEHOLDER.to_string(),
            PLACEHOLDER.to_string(),
        ]
    }
}

impl<'r, W: Write, R: Rng> WriterTrait for RandomizedWriter<'r, W, R> {
    type Item = ExtractedRow;

    fn write(&mut self, rows: &[ExtractedRow]) -> Result<(), Error> {
        for row in rows {
            self.write_single(row)?;
        }
        Ok(())
    }

    fn write_single(&mut self, row: &ExtractedRow) -> Result<(), Error> {
        let fields = self.randomize(row);
        Ok(self.tsv.write_record(&fields)?)
    }

    fn flush(&mut self) -> Result<(), Error> {
        Ok(self.tsv.flush()?)
    }
}

/// Write `rows` into `dst`, creating parent directories if needed.
///
/// Nothing is created when `rows` is empty.
/// Returns the number of written rows.
pub fn emit<R: Rng>(
    rows: &[ExtractedRow],
    dst: &Path,
    mode: EmitMode,
    rng: &mut R,
) -> Result<usize, Error> {
    if rows.is_empty() {
        debug!("no rows to write to {:?}", dst);
        return Ok(0);
    }

    if let Some(parent) = dst.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(dst)?;

    match mode {
        EmitMode::Expanded => {
            let mut writer = ExpandedWriter::new(file);
            writer.write(rows)?;
            writer.flush()?;
        }
        EmitMode::Randomized => {
            let mut writer = RandomizedWriter::new(file, rng);
            writer.write(rows)?;
            writer.flush()?;
        }
    }

    debug!("{} rows written to {:?}", rows.len(), dst);
    Ok(rows.len())
}

/// Read back an expanded dataset file.
///
/// Token counts aren't stored, so [ExtractedRow::nb_tokens] is 0 on read rows.
pub fn read_rows(src: &Path) -> Result<Vec<ExtractedRow>, Error> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quoting(false)
        .from_path(src)?;

    let rows = reader.deserialize().collect::<Result<Vec<ExtractedRow>, _>>()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rows() -> Vec<ExtractedRow> {
        vec![
            ExtractedRow {
                sentence: "The cat sat .".to_string(),
                head: "sat".to_string(),
                head_index: 2,
                value: "Sing".to_string(),
                distance: -1,
                dependent: "cat".to_string(),
                dependent_index: 1,
                relation: "nsubj".to_string(),
                nb_tokens: 4,
            },
            ExtractedRow {
                sentence: "\"Dogs\" bark loudly .".to_string(),
                head: "bark".to_string(),
                head_index: 1,
                value: "Plur".to_string(),
                distance: -1,
                dependent: "\"Dogs\"".to_string(),
                dependent_index: 0,
                relation: "nsubj".to_string(),
                nb_tokens: 4,
            },
        ]
    }

    #[test]
    fn expanded_verbatim() {
        let mut buf = Vec::new();
        {
            let mut writer = ExpandedWriter::new(&mut buf);
            writer.write(&rows()).unwrap();
            writer.flush().unwrap();
        }
        let content = String::from_utf8(buf).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next(),
            Some("The cat sat .\tsat\t2\tSing\t-1\tcat\t1\tnsubj")
        );
        assert_eq!(
            lines.next(),
            Some("\"Dogs\" bark loudly .\tbark\t1\tPlur\t-1\t\"Dogs\"\t0\tnsubj")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn emit_then_read() {
        let dst = tempfile::tempdir().unwrap();
        let path = dst.path().join("number_noun/English/train.tsv");
        let mut rng = StdRng::seed_from_u64(0);

        let written = emit(&rows(), &path, EmitMode::Expanded, &mut rng).unwrap();
        assert_eq!(written, 2);
        let expected: Vec<ExtractedRow> = rows()
            .into_iter()
            .map(|row| ExtractedRow { nb_tokens: 0, ..row })
            .collect();
        assert_eq!(read_rows(&path).unwrap(), expected);
    }

    #[test]
    fn randomized_rows() {
        let dst = tempfile::tempdir().unwrap();
        let path = dst.path().join("random/train.tsv");
        let mut rng = StdRng::seed_from_u64(42);

        // repeat rows to exercise the random range
        let source: Vec<ExtractedRow> = rows().into_iter().cycle().take(200).collect();
        emit(&source, &path, EmitMode::Randomized, &mut rng).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), source.len());

        for (line, row) in lines.iter().zip(source.iter()) {
            let fields: Vec<&str> = line.split('\t').collect();
            assert_eq!(fields.len(), 8);
            assert_eq!(fields[0], row.sentence);
            assert_eq!(fields[1], row.head);
            assert_eq!(fields[2], row.head_index.to_string());
            assert_eq!(fields[3], row.value);
            let idx: usize = fields[4].parse().unwrap();
            assert!(idx < row.nb_tokens);
            assert_eq!(&fields[5..], &["_", "_", "_"]);
        }
    }

    #[test]
    fn random_index_within_treebank_tokens() {
        // tokens: "Học sinh", "học", "bài", "."
        let row = ExtractedRow {
            sentence: "Học sinh học bài .".to_string(),
            head: "học".to_string(),
            head_index: 1,
            value: "Sing".to_string(),
            distance: -1,
            dependent: "Học sinh".to_string(),
            dependent_index: 0,
            relation: "nsubj".to_string(),
            nb_tokens: 4,
        };
        let mut rng = StdRng::seed_from_u64(3);
        let mut buf = Vec::new();
        {
            let mut writer = RandomizedWriter::new(&mut buf, &mut rng);
            for _ in 0..500 {
                writer.write_single(&row).unwrap();
            }
            writer.flush().unwrap();
        }
        let content = String::from_utf8(buf).unwrap();
        let indices: Vec<usize> = content
            .lines()
            .map(|line| line.split('\t').nth(4).unwrap().parse().unwrap())
            .collect();
        assert_eq!(indices.len(), 500);
        assert!(indices.iter().all(|&idx| idx < 4));
        assert!(indices.contains(&3));
    }

    #[test]
    fn empty_rows_not_written() {
        let dst = tempfile::tempdir().unwrap();
        let path = dst.path().join("English/dev.tsv");
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(emit(&[], &path, EmitMode::Expanded, &mut rng).unwrap(), 0);
        assert!(!path.exists());
        assert!(!path.parent().unwrap().exists());
    }
}
