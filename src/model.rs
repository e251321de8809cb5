use std::fmt::Display;

/// How a root node obtained its sequence. Fixed for the lifetime of the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquisition {
    /// Zero-copy borrow of a caller slice.
    Borrowed,
    /// Zero-copy live view of a caller-owned [`SharedSequence`](crate::SharedSequence).
    Shared,
    /// Private duplicate of caller data.
    Copied,
    /// Storage transferred from the caller.
    Moved,
    /// Built by evaluating a previous view (`force_evaluate`, `select`).
    Materialized,
}

impl Acquisition {
    pub fn is_owned(&self) -> bool {
        matches!(self, Self::Copied | Self::Moved | Self::Materialized)
    }
}

impl Display for Acquisition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Borrowed => "borrowed",
            Self::Shared => "shared",
            Self::Copied => "copied",
            Self::Moved => "moved",
            Self::Materialized => "materialized",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewInfo {
    pub acquisition: Acquisition,
    pub source_len: usize,
    pub view_len: usize,
    // number of filter steps between this view and its root
    pub depth: usize,
}

impl ViewInfo {
    // Доля элементов источника, попавших в текущий view
    pub fn selectivity(&self) -> f64 {
        if self.source_len == 0 {
            return 1.0;
        }
        self.view_len as f64 / self.source_len as f64
    }

    pub fn is_full_view(&self) -> bool {
        self.view_len == self.source_len
    }
}

impl Display for ViewInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ViewInfo {{ acquisition: {}, source: {}, view: {}, depth: {} }}",
            self.acquisition,
            self.source_len,
            self.view_len,
            self.depth
        )
    }
}
