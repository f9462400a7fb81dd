//! An ordered, multi-valued associative container built on a
//! probabilistic skip list, with bounded range queries and a
//! secondary-index "speed table" layer composed from several lists.

mod arena;
mod error;
mod iter;
mod level;
mod node;
mod query;
mod skiplist;
mod table;

pub use error::SkipListError;
pub use iter::Iter;
pub use level::{level_for_max_nodes, GeometricLevelGenerator, LevelGenerator};
pub use query::Query;
pub use skiplist::{Inserted, SkipList};
pub use table::{RowId, Table};
