use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("no element matches the comparator")]
    NotFound,
    #[error("query handle is empty and the output sequence has no empty form")]
    InvalidHandle,
    #[error("shared source sequence was dropped")]
    SourceDropped,
    #[error("position {position} is out of bounds for source of length {len}")]
    StalePosition {
        position: usize,
        len: usize,
    },
}
