//! A probabilistic ordered index of unique keys whose levels are closed by
//! boundary nodes that mirror the smallest and largest keys.

mod error;
pub mod opt;
pub mod skiplist;
pub mod util;

pub use error::{Error, IResult};
pub use opt::Options;
pub use skiplist::{Iter, Removed, SkipList};
pub use util::comparator::{BytewiseComparator, Comparator, FnComparator, NaturalComparator, ReverseComparator};
