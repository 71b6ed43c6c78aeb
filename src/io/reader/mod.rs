/*! Corpus reading utilities

- [BlockReader] iterates over blank-line separated blocks of any buffered reader,
- [conllu] builds a [DependencyIndex] out of treebank files,
- [probe] reads probe splits into a [ProbeSplit].
!*/
mod blockreader;
pub mod conllu;
pub mod probe;

pub use blockreader::BlockReader;
pub use conllu::{DependencyIndex, DependencySentence, TokenEdge};
pub use probe::{ProbeRecord, ProbeSplit};
