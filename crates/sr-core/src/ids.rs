//! Strongly typed, zero-cost identifier wrappers.
//!
//! Ids are supplied by the caller when nodes and edges are added, so they are
//! arbitrary `u32` values rather than dense indices.  All IDs are
//! `Copy + Ord + Hash`; the numeric order is the tie-break order used by the
//! route planner.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Raw integer value.
            #[inline(always)]
            pub fn get(self) -> $inner {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$inner> for $name {
            #[inline(always)]
            fn from(raw: $inner) -> $name {
                $name(raw)
            }
        }
    };
}

typed_id! {
    /// Identifier of a road-network node (intersection, landmark, shelter…).
    pub struct NodeId(u32);
}

typed_id! {
    /// Identifier of a road-network edge.  An undirected edge keeps a single
    /// id even though it is traversable in both directions.
    pub struct EdgeId(u32);
}
