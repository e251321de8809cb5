//! Single-element predicates used by every chain operation.
//!
//! Any `Fn(&T) -> bool` is a [`Comparator`]. Literal and convertible values are turned
//! into comparators with [`equals`] and [`converted`]:
//!
//! ```
//! use linq_view::{from, comparator::{equals, converted}};
//!
//! let numbers = vec![1_i64, 2, 3, 4];
//! let query = from(&numbers);
//! assert_eq!(query.count(equals(3_i64)).unwrap(), 1);
//! assert_eq!(query.count(converted::<i64, _>(3_i32)).unwrap(), 1);
//! assert_eq!(query.count(|n: &i64| n % 2 == 0).unwrap(), 2);
//! ```

use super::{
    errors::QueryError,
    result::QueryResult,
};

pub trait Comparator<T>: Fn(&T) -> bool {
    /// Applies the comparator to the element at `position` of `storage`.
    ///
    /// Positions are plain indices, so a position that no longer fits the storage
    /// is reported as [`QueryError::StalePosition`] instead of being read.
    #[inline]
    fn matches_at(&self, storage: &[T], position: usize) -> QueryResult<bool> {
        storage
            .get(position)
            .map(|item| self(item))
            .ok_or(QueryError::StalePosition {
                position,
                len: storage.len(),
            })
    }
}

impl<T, F> Comparator<T> for F where F: Fn(&T) -> bool {}

/// Equality against a literal value.
pub fn equals<T>(value: T) -> impl Fn(&T) -> bool + Clone
where
    T: PartialEq + Clone,
{
    move |item: &T| *item == value
}

/// Equality against a value of a type convertible into `T`.
///
/// The conversion runs once, here, not per element.
pub fn converted<T, V>(value: V) -> impl Fn(&T) -> bool + Clone
where
    V: Into<T>,
    T: PartialEq + Clone,
{
    equals(value.into())
}

pub fn not<T, C>(comparator: C) -> impl Fn(&T) -> bool
where
    C: Fn(&T) -> bool,
{
    move |item: &T| !comparator(item)
}

pub fn and<T, A, B>(left: A, right: B) -> impl Fn(&T) -> bool
where
    A: Fn(&T) -> bool,
    B: Fn(&T) -> bool,
{
    move |item: &T| left(item) && right(item)
}

pub fn or<T, A, B>(left: A, right: B) -> impl Fn(&T) -> bool
where
    A: Fn(&T) -> bool,
    B: Fn(&T) -> bool,
{
    move |item: &T| left(item) || right(item)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Sample {
        value: i32,
    }

    impl From<i32> for Sample {
        fn from(value: i32) -> Self {
            Self { value }
        }
    }

    #[test]
    fn test_equals_literal() {
        let is_three = equals(3);
        assert!(is_three(&3));
        assert!(!is_three(&4));
    }

    #[test]
    fn test_converted_value_built_once() {
        let is_three = converted::<Sample, _>(3);
        assert!(is_three(&Sample { value: 3 }));
        assert!(!is_three(&Sample { value: 1 }));
    }

    #[test]
    fn test_closure_is_comparator() {
        let even = |n: &i32| n % 2 == 0;
        let storage = [1, 2, 3, 4];
        assert_eq!(even.matches_at(&storage, 1), Ok(true));
        assert_eq!(even.matches_at(&storage, 2), Ok(false));
    }

    #[test]
    fn test_matches_at_out_of_bounds() {
        let storage = [1, 2, 3];
        let result = equals(3).matches_at(&storage, 3);
        assert_eq!(result, Err(QueryError::StalePosition { position: 3, len: 3 }));
    }

    #[test]
    fn test_combinators() {
        let even = |n: &i32| n % 2 == 0;
        let big = |n: &i32| *n > 2;
        let both = and(even, big);
        let either = or(even, big);
        let odd = not(even);
        assert!(both(&4));
        assert!(!both(&2));
        assert!(either(&2));
        assert!(either(&3));
        assert!(!either(&1));
        assert!(odd(&1));
        assert!(!odd(&2));
    }
}
