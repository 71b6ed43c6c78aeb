/*!
# Dataset writing

Extracted rows are written as tab-separated files, either verbatim ([ExpandedWriter])
or as a randomized control set ([RandomizedWriter]). [emit] picks the writer, creates
parent directories and never creates a file for an empty row set.
!*/
mod dataset;
mod writertrait;
pub use dataset::{emit, read_rows, EmitMode, ExpandedWriter, RandomizedWriter};
pub use writertrait::WriterTrait;
