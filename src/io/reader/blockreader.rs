/*! Block reading

Both CoNLL-U treebanks and a lot of other annotated corpora are made of
records separated by blank lines. [BlockReader] implements [Iterator] over those records.
!*/
use std::{
    fs::File,
    io::{BufRead, BufReader, Lines},
    path::{Path, PathBuf},
};

use crate::error::Error;

/// Reader that yields sequences of lines that are separated by blank lines.
///
/// Lines only made of whitespace count as blank. Consecutive blank lines never
/// produce empty blocks.
#[derive(Debug)]
pub struct BlockReader<T> {
    path: PathBuf,
    lines: Lines<T>,
}

impl BlockReader<BufReader<File>> {
    pub fn from_path(src: &Path) -> Result<Self, Error> {
        let file = File::open(src)?;
        Ok(Self {
            path: src.to_path_buf(),
            lines: BufReader::new(file).lines(),
        })
    }
}

impl<T: BufRead> BlockReader<T> {
    /// Wrap an already opened buffered reader.
    pub fn new(reader: T) -> Self {
        Self {
            path: PathBuf::new(),
            lines: reader.lines(),
        }
    }
}

impl<T> BlockReader<T> {
    /// Source path, empty when built from a reader.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<T: BufRead> Iterator for BlockReader<T> {
    type Item = Result<Vec<String>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut block = Vec::new();
        for line in self.lines.by_ref() {
            match line {
                Ok(line) if line.trim().is_empty() => {
                    // cut at blank line
                    if !block.is_empty() {
                        return Some(Ok(block));
                    }
                }
                Ok(line) => block.push(line),
                Err(e) => return Some(Err(Error::Io(e))),
            }
        }

        // close eventual last block
        if block.is_empty() {
            None
        } else {
            Some(Ok(block))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_iter() {
        let content = Cursor::new(
            "aaa
bbb
ccc

record 2
this is record 2
end of record 2


bye!
record 3",
        );

        let expected = vec![
            vec!["aaa", "bbb", "ccc"],
            vec!["record 2", "this is record 2", "end of record 2"],
            vec!["bye!", "record 3"],
        ];

        let blocks: Vec<Vec<String>> = BlockReader::new(content)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(blocks, expected);
    }

    #[test]
    fn test_iter_single_record() {
        let content = Cursor::new("\n\naaa\nbbb\n\n   \n");
        let blocks: Vec<Vec<String>> = BlockReader::new(content)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(blocks, vec![vec!["aaa", "bbb"]]);
    }

    #[test]
    fn test_empty() {
        let mut reader = BlockReader::new(Cursor::new(""));
        assert!(reader.next().is_none());
    }
}
