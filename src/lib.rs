pub mod errors;
pub mod result;
pub mod model;
pub mod comparator;
pub mod sequence;
pub(crate) mod storage;
pub(crate) mod node;
pub mod query;

pub use comparator::{Comparator, converted, equals};
pub use errors::QueryError;
pub use model::{Acquisition, ViewInfo};
pub use query::{IntoQuery, Query, copy_from, from, from_shared, move_from};
pub use result::QueryResult;
pub use sequence::{InlineSequence, Sequence, INLINE_CAPACITY};
pub use storage::{SharedSequence, shared};
