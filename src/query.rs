use super::{
    comparator::Comparator,
    errors::QueryError,
    model::{Acquisition, ViewInfo},
    node::{Node, Scan},
    result::QueryResult,
    sequence::Sequence,
    storage::{SharedSequence, Source},
};
use std::{
    collections::{LinkedList, VecDeque},
    fmt,
    sync::Arc,
};

// Query - handle узла цепочки

/// Shared handle to one node of a query chain.
///
/// Every chain operation returns a new `Query`; cloning a `Query` clones the handle,
/// never the data. A `Query` may be empty (see [`Query::empty`]); an empty handle
/// behaves as an empty view except for conversions into sequences that cannot be
/// empty, which fail with [`QueryError::InvalidHandle`].
pub struct Query<'a, T> {
    node: Option<Arc<Node<'a, T>>>,
}

/// Zero-copy query over a borrowed slice.
pub fn from<'a, T>(items: &'a [T]) -> Query<'a, T> {
    Query::from_node(Node::Root(Source::Borrowed(items)))
}

/// Zero-copy live query over a caller-owned shared sequence.
///
/// Evaluations read the sequence as it is at that moment; the query does not keep it
/// alive.
///
/// Filtered views store positions, not elements. Only a position past the end of the
/// sequence is detected ([`QueryError::StalePosition`]); removing or inserting elements
/// before a stored position makes the view resolve to whatever element now sits there.
/// Call [`Query::force_evaluate`] on the filtered view to freeze it before mutating.
pub fn from_shared<'a, T>(items: &SharedSequence<T>) -> Query<'a, T> {
    Query::from_node(Node::Root(Source::Shared(Arc::downgrade(items))))
}

/// Query over a private copy of `items`.
pub fn copy_from<'a, 's, T, I>(items: I) -> Query<'a, T>
where
    I: IntoIterator<Item = &'s T>,
    T: Clone + 's,
{
    Query::owned(items.into_iter().cloned().collect(), Acquisition::Copied)
}

/// Query that takes ownership of `items`.
pub fn move_from<'a, T, I>(items: I) -> Query<'a, T>
where
    I: IntoIterator<Item = T>,
{
    Query::owned(items.into_iter().collect(), Acquisition::Moved)
}

impl<'a, T> Query<'a, T> {
    fn from_node(node: Node<'a, T>) -> Self {
        Self {
            node: Some(Arc::new(node)),
        }
    }

    fn owned(items: Vec<T>, origin: Acquisition) -> Self {
        if origin == Acquisition::Materialized {
            tracing::debug!(target: "linq_view", len = items.len(), "materialized view");
        }
        Self::from_node(Node::Root(Source::Owned { items, origin }))
    }

    pub fn empty() -> Self {
        Self { node: None }
    }

    pub fn has_node(&self) -> bool {
        self.node.is_some()
    }

    /// `false` for an empty handle or when the shared source was dropped.
    pub fn is_valid(&self) -> bool {
        self.node
            .as_ref()
            .is_some_and(|node| node.root().is_valid())
    }

    pub fn acquisition(&self) -> Option<Acquisition> {
        self.node.as_ref().map(|node| node.root().acquisition())
    }

    pub fn depth(&self) -> usize {
        self.node.as_ref().map_or(0, |node| node.depth())
    }

    pub fn len(&self) -> QueryResult<usize> {
        match &self.node {
            Some(node) => node.view_len(),
            None => Ok(0),
        }
    }

    pub fn is_empty(&self) -> QueryResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Positions of the current view in the root storage.
    pub fn positions(&self) -> QueryResult<Vec<usize>> {
        match &self.node {
            Some(node) => node.with_view(|view| Ok(view.positions().collect())),
            None => Ok(Vec::new()),
        }
    }

    pub fn view_info(&self) -> QueryResult<ViewInfo> {
        self.node
            .as_ref()
            .ok_or(QueryError::InvalidHandle)?
            .view_info()
    }

    // Chain operations

    /// Keeps the elements matching `comparator`, in their current order.
    ///
    /// Nothing is copied: the new view stores the positions of the matches and keeps
    /// this view alive as its parent.
    pub fn filter<C>(&self, comparator: C) -> QueryResult<Self>
    where
        C: Comparator<T>,
    {
        let Some(node) = &self.node else {
            return Ok(Self::empty());
        };
        let (parent_len, positions) = node.with_view(|view| -> QueryResult<_> {
            Ok((view.len(), view.filter_positions(&comparator)?))
        })?;
        Ok(Self::filtered(node, parent_len, positions))
    }

    /// Like [`filter`](Self::filter) for fallible predicates.
    ///
    /// The first error returned by `predicate` is returned unchanged.
    pub fn try_filter<E, P>(&self, predicate: P) -> Result<Self, E>
    where
        P: Fn(&T) -> Result<bool, E>,
        E: From<QueryError>,
    {
        let Some(node) = &self.node else {
            return Ok(Self::empty());
        };
        let (parent_len, positions) = node.with_view(|view| -> Result<_, E> {
            Ok((view.len(), view.try_filter_positions(&predicate)?))
        })?;
        Ok(Self::filtered(node, parent_len, positions))
    }

    fn filtered(node: &Arc<Node<'a, T>>, parent_len: usize, positions: Vec<usize>) -> Self {
        tracing::trace!(
            target: "linq_view",
            parent_len,
            matched = positions.len(),
            depth = node.depth() + 1,
            "filtered view"
        );
        Self::from_node(Node::Filtered {
            parent: Arc::clone(node),
            positions,
        })
    }

    /// Transforms every element of the view into a new, owned sequence.
    ///
    /// The result no longer refers to this view's storage.
    pub fn select<U, F>(&self, mut transform: F) -> QueryResult<Query<'a, U>>
    where
        F: FnMut(&T) -> U,
    {
        let Some(node) = &self.node else {
            return Ok(Query::empty());
        };
        let items = node.with_view(|view| -> QueryResult<Vec<U>> {
            let view = view.checked()?;
            let mut items = Vec::with_capacity(view.len());
            items.extend(view.items().map(&mut transform));
            Ok(items)
        })?;
        Ok(Query::owned(items, Acquisition::Materialized))
    }

    /// Like [`select`](Self::select) for fallible transforms.
    pub fn try_select<U, E, F>(&self, mut transform: F) -> Result<Query<'a, U>, E>
    where
        F: FnMut(&T) -> Result<U, E>,
        E: From<QueryError>,
    {
        let Some(node) = &self.node else {
            return Ok(Query::empty());
        };
        let items = node.with_view(|view| -> Result<Vec<U>, E> {
            let view = view.checked()?;
            let mut items = Vec::with_capacity(view.len());
            for item in view.items() {
                items.push(transform(item)?);
            }
            Ok(items)
        })?;
        Ok(Query::owned(items, Acquisition::Materialized))
    }

    /// Transforms the view straight into the output sequence `S`.
    pub fn select_into<S, U, F>(&self, mut transform: F) -> QueryResult<S>
    where
        S: Sequence<U>,
        F: FnMut(&T) -> U,
    {
        let Some(node) = &self.node else {
            return S::empty().ok_or(QueryError::InvalidHandle);
        };
        node.with_view(|view| -> QueryResult<S> {
            let view = view.checked()?;
            Ok(S::from_view(view.len(), view.items().map(&mut transform)))
        })
    }

    // Terminal operations

    fn find<C>(&self, comparator: &C, scan: Scan) -> QueryResult<Option<T>>
    where
        C: Comparator<T>,
        T: Clone,
    {
        match &self.node {
            Some(node) => node.with_view(|view| Ok(view.find(comparator, scan)?.cloned())),
            None => Ok(None),
        }
    }

    pub fn first<C>(&self, comparator: C) -> QueryResult<T>
    where
        C: Comparator<T>,
        T: Clone,
    {
        self.find(&comparator, Scan::Forward)?
            .ok_or(QueryError::NotFound)
    }

    pub fn last<C>(&self, comparator: C) -> QueryResult<T>
    where
        C: Comparator<T>,
        T: Clone,
    {
        self.find(&comparator, Scan::Backward)?
            .ok_or(QueryError::NotFound)
    }

    pub fn first_or_default<C>(&self, comparator: C) -> QueryResult<T>
    where
        C: Comparator<T>,
        T: Clone + Default,
    {
        Ok(self.find(&comparator, Scan::Forward)?.unwrap_or_default())
    }

    pub fn last_or_default<C>(&self, comparator: C) -> QueryResult<T>
    where
        C: Comparator<T>,
        T: Clone + Default,
    {
        Ok(self.find(&comparator, Scan::Backward)?.unwrap_or_default())
    }

    pub fn any<C>(&self, comparator: C) -> QueryResult<bool>
    where
        C: Comparator<T>,
    {
        match &self.node {
            Some(node) => node.with_view(|view| view.any(&comparator)),
            None => Ok(false),
        }
    }

    pub fn all<C>(&self, comparator: C) -> QueryResult<bool>
    where
        C: Comparator<T>,
    {
        match &self.node {
            Some(node) => node.with_view(|view| view.all(&comparator)),
            None => Ok(true),
        }
    }

    #[inline]
    pub fn contains<C>(&self, comparator: C) -> QueryResult<bool>
    where
        C: Comparator<T>,
    {
        self.any(comparator)
    }

    pub fn count<C>(&self, comparator: C) -> QueryResult<usize>
    where
        C: Comparator<T>,
    {
        match &self.node {
            Some(node) => node.with_view(|view| view.count(&comparator)),
            None => Ok(0),
        }
    }

    // Materialization

    /// Copies the current filtered view into private storage.
    ///
    /// Use it before mutating a source the view depends on. A root has nothing
    /// deferred and returns the same node; to freeze a whole shared source, filter
    /// it first or use [`copy_from`].
    pub fn force_evaluate(&self) -> QueryResult<Self>
    where
        T: Clone,
    {
        match self.node.as_deref() {
            None => Ok(Self::empty()),
            Some(Node::Root(_)) => Ok(self.clone()),
            Some(node) => {
                let items = node.with_view(|view| -> QueryResult<Vec<T>> {
                    Ok(view.checked()?.items().cloned().collect())
                })?;
                Ok(Self::owned(items, Acquisition::Materialized))
            }
        }
    }

    /// Builds the output sequence `S` from the current view.
    ///
    /// Recomputed on every call. An empty handle converts into `S::empty()`.
    pub fn to_sequence<S>(&self) -> QueryResult<S>
    where
        S: Sequence<T>,
        T: Clone,
    {
        let Some(node) = &self.node else {
            return S::empty().ok_or(QueryError::InvalidHandle);
        };
        node.with_view(|view| -> QueryResult<S> {
            let view = view.checked()?;
            Ok(S::from_view(view.len(), view.items().cloned()))
        })
    }

    pub fn to_vec(&self) -> QueryResult<Vec<T>>
    where
        T: Clone,
    {
        self.to_sequence()
    }

    /// Snapshot of the current view; same as [`to_vec`](Self::to_vec).
    #[inline]
    pub fn get(&self) -> QueryResult<Vec<T>>
    where
        T: Clone,
    {
        self.to_vec()
    }
}

impl<T> Clone for Query<'_, T> {
    fn clone(&self) -> Self {
        Self {
            node: self.node.clone(),
        }
    }
}

impl<T> Default for Query<'_, T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> fmt::Debug for Query<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("acquisition", &self.acquisition())
            .field("depth", &self.depth())
            .field("valid", &self.is_valid())
            .finish()
    }
}

macro_rules! impl_try_from_query {
    ($($sequence:ident),*) => {
        $(
            impl<T: Clone> TryFrom<&Query<'_, T>> for $sequence<T> {
                type Error = QueryError;

                fn try_from(query: &Query<'_, T>) -> QueryResult<Self> {
                    query.to_sequence()
                }
            }

            impl<T: Clone> TryFrom<Query<'_, T>> for $sequence<T> {
                type Error = QueryError;

                fn try_from(query: Query<'_, T>) -> QueryResult<Self> {
                    query.to_sequence()
                }
            }
        )*
    };
}

impl_try_from_query!(Vec, VecDeque, LinkedList);

// Traits

pub trait IntoQuery {
    type Item;

    fn into_query<'a>(self) -> Query<'a, Self::Item>;
}

impl<T> IntoQuery for Vec<T> {
    type Item = T;

    fn into_query<'a>(self) -> Query<'a, T> {
        move_from(self)
    }
}

impl<T> IntoQuery for VecDeque<T> {
    type Item = T;

    fn into_query<'a>(self) -> Query<'a, T> {
        move_from(self)
    }
}

impl<T> IntoQuery for LinkedList<T> {
    type Item = T;

    fn into_query<'a>(self) -> Query<'a, T> {
        move_from(self)
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_root_force_evaluate_shares_node() {
        let query = move_from(vec![1, 2, 3]);
        let evaluated = query.force_evaluate().unwrap();
        let (Some(left), Some(right)) = (&query.node, &evaluated.node) else {
            panic!("expected both handles to hold a node");
        };
        assert!(Arc::ptr_eq(left, right));
    }

    #[test]
    fn test_filter_keeps_parent_alive() {
        let query = move_from(vec![1, 2, 3, 4]);
        let filtered = query.filter(|n| n % 2 == 0).unwrap();
        let Some(root) = &query.node else {
            panic!("expected a node");
        };
        assert_eq!(Arc::strong_count(root), 2);
        drop(query);
        assert_eq!(filtered.to_vec(), Ok(vec![2, 4]));
    }

    #[test]
    fn test_clone_shares_node() {
        let items = [1, 2, 3];
        let query = from(&items[..]);
        let copy = query.clone();
        let (Some(left), Some(right)) = (&query.node, &copy.node) else {
            panic!("expected both handles to hold a node");
        };
        assert!(Arc::ptr_eq(left, right));
    }

    #[test]
    fn test_select_materializes() {
        let items = vec![1, 2, 3];
        let selected = from(&items).select(|n| n * 10).unwrap();
        assert_eq!(selected.acquisition(), Some(Acquisition::Materialized));
        assert_eq!(selected.depth(), 0);
        assert_eq!(selected.to_vec(), Ok(vec![10, 20, 30]));
    }

    #[test]
    fn test_debug_empty_handle() {
        let query: Query<'static, i32> = Query::default();
        let text = format!("{:?}", query);
        assert!(text.contains("acquisition: None"));
        assert!(text.contains("valid: false"));
    }
}
