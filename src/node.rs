use super::{
    comparator::Comparator,
    errors::QueryError,
    model::ViewInfo,
    storage::Source,
};
use std::{
    iter::Copied,
    ops::Range,
    slice,
    sync::Arc,
};

// Node - узел цепочки запроса
//
// Root хранит источник, Filtered хранит только позиции в хранилище root-а
// и ссылку на родителя. Позиции всегда строго возрастают.

pub(crate) enum Node<'a, T> {
    Root(Source<'a, T>),
    Filtered {
        parent: Arc<Node<'a, T>>,
        positions: Vec<usize>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scan {
    Forward,
    Backward,
}

impl<'a, T> Node<'a, T> {
    pub fn root(&self) -> &Source<'a, T> {
        let mut node = self;
        loop {
            match node {
                Self::Root(source) => return source,
                Self::Filtered { parent, .. } => node = parent.as_ref(),
            }
        }
    }

    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut node = self;
        while let Self::Filtered { parent, .. } = node {
            depth += 1;
            node = parent.as_ref();
        }
        depth
    }

    pub fn positions(&self) -> Option<&[usize]> {
        match self {
            Self::Root(_) => None,
            Self::Filtered { positions, .. } => Some(positions.as_slice()),
        }
    }

    /// Length of the view, validated against the current storage.
    pub fn view_len(&self) -> Result<usize, QueryError> {
        self.with_view(|view| Ok(view.checked()?.len()))
    }

    pub fn view_info(&self) -> Result<ViewInfo, QueryError> {
        let acquisition = self.root().acquisition();
        let depth = self.depth();
        self.with_view(|view| {
            let view = view.checked()?;
            Ok(ViewInfo {
                acquisition,
                source_len: view.source_len(),
                view_len: view.len(),
                depth,
            })
        })
    }

    /// Runs `f` over the current view of this node.
    pub fn with_view<R, E, F>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(View<'_, T>) -> Result<R, E>,
        E: From<QueryError>,
    {
        let positions = self.positions();
        self.root().with_items(|items| f(View { items, positions }))
    }
}

// View - элементы root-а, видимые через позиции узла

pub(crate) struct View<'v, T> {
    items: &'v [T],
    positions: Option<&'v [usize]>,
}

impl<'v, T> View<'v, T> {
    pub fn len(&self) -> usize {
        match self.positions {
            Some(positions) => positions.len(),
            None => self.items.len(),
        }
    }

    pub fn positions(&self) -> Positions<'v> {
        match self.positions {
            Some(positions) => Positions::Listed(positions.iter().copied()),
            None => Positions::All(0..self.items.len()),
        }
    }

    /// Verifies that every position still fits the storage.
    ///
    /// Positions are strictly increasing, so checking the last one is enough.
    pub fn checked(self) -> Result<CheckedView<'v, T>, QueryError> {
        let last = self.positions.and_then(|positions| positions.last().copied());
        if let Some(position) = last {
            if position >= self.items.len() {
                tracing::warn!(
                    target: "linq_view",
                    position,
                    len = self.items.len(),
                    "stale position in view"
                );
                return Err(QueryError::StalePosition {
                    position,
                    len: self.items.len(),
                });
            }
        }
        Ok(CheckedView { view: self })
    }

    pub fn filter_positions<C>(&self, comparator: &C) -> Result<Vec<usize>, QueryError>
    where
        C: Comparator<T>,
    {
        let mut matched = Vec::new();
        for position in self.positions() {
            if comparator.matches_at(self.items, position)? {
                matched.push(position);
            }
        }
        Ok(matched)
    }

    pub fn try_filter_positions<E, P>(&self, predicate: &P) -> Result<Vec<usize>, E>
    where
        P: Fn(&T) -> Result<bool, E>,
        E: From<QueryError>,
    {
        let mut matched = Vec::new();
        for position in self.positions() {
            let item = self.items.get(position).ok_or(QueryError::StalePosition {
                position,
                len: self.items.len(),
            })?;
            if predicate(item)? {
                matched.push(position);
            }
        }
        Ok(matched)
    }

    pub fn find<C>(&self, comparator: &C, scan: Scan) -> Result<Option<&'v T>, QueryError>
    where
        C: Comparator<T>,
    {
        let mut positions = self.positions();
        loop {
            let next = match scan {
                Scan::Forward => positions.next(),
                Scan::Backward => positions.next_back(),
            };
            let Some(position) = next else {
                return Ok(None);
            };
            if comparator.matches_at(self.items, position)? {
                return Ok(self.items.get(position));
            }
        }
    }

    pub fn any<C>(&self, comparator: &C) -> Result<bool, QueryError>
    where
        C: Comparator<T>,
    {
        for position in self.positions() {
            if comparator.matches_at(self.items, position)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn all<C>(&self, comparator: &C) -> Result<bool, QueryError>
    where
        C: Comparator<T>,
    {
        for position in self.positions() {
            if !comparator.matches_at(self.items, position)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    pub fn count<C>(&self, comparator: &C) -> Result<usize, QueryError>
    where
        C: Comparator<T>,
    {
        let mut count = 0;
        for position in self.positions() {
            if comparator.matches_at(self.items, position)? {
                count += 1;
            }
        }
        Ok(count)
    }
}

pub(crate) struct CheckedView<'v, T> {
    view: View<'v, T>,
}

impl<'v, T> CheckedView<'v, T> {
    pub fn len(&self) -> usize {
        self.view.len()
    }

    pub fn source_len(&self) -> usize {
        self.view.items.len()
    }

    pub fn items(&self) -> impl DoubleEndedIterator<Item = &'v T> + ExactSizeIterator + use<'v, T> {
        let items = self.view.items;
        // все позиции проверены в View::checked
        self.view.positions().map(move |position| &items[position])
    }
}

// Positions - итератор позиций view

pub(crate) enum Positions<'v> {
    All(Range<usize>),
    Listed(Copied<slice::Iter<'v, usize>>),
}

impl Iterator for Positions<'_> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        match self {
            Self::All(range) => range.next(),
            Self::Listed(positions) => positions.next(),
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Self::All(range) => range.size_hint(),
            Self::Listed(positions) => positions.size_hint(),
        }
    }
}

impl DoubleEndedIterator for Positions<'_> {
    #[inline]
    fn next_back(&mut self) -> Option<usize> {
        match self {
            Self::All(range) => range.next_back(),
            Self::Listed(positions) => positions.next_back(),
        }
    }
}

impl ExactSizeIterator for Positions<'_> {}
