//! Strongly typed identifier wrappers.
//!
//! `NodeId` carries the road network's own node identifier, so it is signed:
//! source nodes are positive and nodes inserted by edge splitting are
//! negative.  `EdgeId` is a slot in the graph's edge arena.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
        #[serde(transparent)]
        $vis struct $name(pub $inner);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$inner> for $name {
            #[inline(always)]
            fn from(raw: $inner) -> Self {
                $name(raw)
            }
        }
    };
}

typed_id! {
    /// Identifier of a road-network node.
    pub struct NodeId(i64);
}

typed_id! {
    /// Slot of an edge in a `RoadGraph` arena.  Stable for the lifetime of
    /// the graph value; removed edges leave their slot empty.
    pub struct EdgeId(u32);
}

impl NodeId {
    /// `true` for nodes created by splitting an edge rather than imported
    /// from the road-network source.
    #[inline]
    pub fn is_synthetic(self) -> bool {
        self.0 < 0
    }
}

impl EdgeId {
    /// Cast to `usize` for direct use as a `Vec` index.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<usize> for EdgeId {
    type Error = std::num::TryFromIntError;
    fn try_from(n: usize) -> Result<EdgeId, Self::Error> {
        u32::try_from(n).map(EdgeId)
    }
}
