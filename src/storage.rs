use super::{
    errors::QueryError,
    model::Acquisition,
};
use parking_lot::RwLock;
use std::sync::{Arc, Weak};

/// Caller-owned sequence that queries observe live instead of copying.
///
/// A query keeps only a weak reference: dropping the last `SharedSequence` makes
/// every query over it fail with [`QueryError::SourceDropped`].
pub type SharedSequence<T> = Arc<RwLock<Vec<T>>>;

pub fn shared<T>(items: Vec<T>) -> SharedSequence<T> {
    Arc::new(RwLock::new(items))
}

// Source - базовое хранилище root-узла

pub(crate) enum Source<'a, T> {
    Borrowed(&'a [T]),
    Shared(Weak<RwLock<Vec<T>>>),
    Owned {
        items: Vec<T>,
        origin: Acquisition,
    },
}

impl<'a, T> Source<'a, T> {
    pub fn acquisition(&self) -> Acquisition {
        match self {
            Self::Borrowed(_) => Acquisition::Borrowed,
            Self::Shared(_) => Acquisition::Shared,
            Self::Owned { origin, .. } => *origin,
        }
    }

    pub fn is_valid(&self) -> bool {
        match self {
            Self::Shared(source) => source.strong_count() > 0,
            Self::Borrowed(_) | Self::Owned { .. } => true,
        }
    }

    /// Runs `f` over the current content of the storage.
    ///
    /// A shared source stays read-locked while `f` runs.
    pub fn with_items<R, E, F>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&[T]) -> Result<R, E>,
        E: From<QueryError>,
    {
        match self {
            Self::Borrowed(items) => f(*items),
            Self::Owned { items, .. } => f(items.as_slice()),
            Self::Shared(source) => {
                let Some(source) = source.upgrade() else {
                    tracing::warn!(target: "linq_view", "shared source sequence was dropped");
                    return Err(QueryError::SourceDropped.into());
                };
                let guard = source.read();
                f(guard.as_slice())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn len_of<T>(source: &Source<'_, T>) -> Result<usize, QueryError> {
        source.with_items(|items| Ok(items.len()))
    }

    #[test]
    fn test_borrowed_source_reads_slice() {
        let items = vec![1, 2, 3];
        let source = Source::Borrowed(&items[..]);
        assert_eq!(source.acquisition(), Acquisition::Borrowed);
        assert_eq!(len_of(&source), Ok(3));
        assert!(source.is_valid());
    }

    #[test]
    fn test_shared_source_is_live() {
        let items = shared(vec![1, 2, 3, 4]);
        let source = Source::Shared(Arc::downgrade(&items));
        assert_eq!(len_of(&source), Ok(4));
        items.write().pop();
        assert_eq!(len_of(&source), Ok(3));
    }

    #[test]
    fn test_shared_source_dropped() {
        let items = shared(vec![1, 2, 3]);
        let source = Source::Shared(Arc::downgrade(&items));
        drop(items);
        assert!(!source.is_valid());
        assert_eq!(len_of(&source), Err(QueryError::SourceDropped));
    }

    #[test]
    fn test_owned_source_keeps_origin() {
        let source: Source<'static, i32> = Source::Owned {
            items: vec![1],
            origin: Acquisition::Moved,
        };
        assert_eq!(source.acquisition(), Acquisition::Moved);
        assert!(source.acquisition().is_owned());
    }
}
