use smallvec::{Array, SmallVec};
use std::collections::{LinkedList, VecDeque};

/// Inline capacity of [`InlineSequence`].
pub const INLINE_CAPACITY: usize = 8;

/// Output sequence that keeps up to [`INLINE_CAPACITY`] elements without a heap allocation.
pub type InlineSequence<T> = SmallVec<[T; INLINE_CAPACITY]>;

/// A concrete sequence type a view can be converted into.
///
/// `with_capacity` is only a hint: types without a reservation API ignore it.
/// `empty` is what an empty [`Query`](crate::Query) converts into; a type that cannot
/// represent an empty sequence returns `None` and the conversion fails with
/// [`QueryError::InvalidHandle`](crate::QueryError::InvalidHandle).
pub trait Sequence<T>: Sized {
    fn with_capacity(n: usize) -> Self;

    fn push(&mut self, item: T);

    fn empty() -> Option<Self> {
        Some(Self::with_capacity(0))
    }

    // Заполнение из view с известной длиной
    fn from_view<I>(len: usize, items: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut output = Self::with_capacity(len);
        for item in items {
            output.push(item);
        }
        output
    }
}

impl<T> Sequence<T> for Vec<T> {
    fn with_capacity(n: usize) -> Self {
        Vec::with_capacity(n)
    }

    fn push(&mut self, item: T) {
        Vec::push(self, item);
    }
}

impl<T> Sequence<T> for VecDeque<T> {
    fn with_capacity(n: usize) -> Self {
        VecDeque::with_capacity(n)
    }

    fn push(&mut self, item: T) {
        self.push_back(item);
    }
}

impl<T> Sequence<T> for LinkedList<T> {
    fn with_capacity(_n: usize) -> Self {
        LinkedList::new()
    }

    fn push(&mut self, item: T) {
        self.push_back(item);
    }
}

impl<A> Sequence<A::Item> for SmallVec<A>
where
    A: Array,
{
    fn with_capacity(n: usize) -> Self {
        SmallVec::with_capacity(n)
    }

    fn push(&mut self, item: A::Item) {
        SmallVec::push(self, item);
    }
}

impl Sequence<char> for String {
    fn with_capacity(n: usize) -> Self {
        // most chars are expected to be ASCII
        String::with_capacity(n)
    }

    fn push(&mut self, item: char) {
        String::push(self, item);
    }
}
