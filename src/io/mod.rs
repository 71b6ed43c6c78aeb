/*!
# IO utilities

Treebank and probe split loading, expanded dataset saving.
!*/
pub mod reader;
pub mod writer;
