/*! Filtering utilities

Filters implement [Filter] and return `true` on items that are kept.

- [MatchRate] decides whether the extraction of a split is written or discarded.
!*/
mod filter;
mod split;

pub use filter::Filter;
pub use split::MatchRate;
