//! Index newtypes for graph entities.
//!
//! Nodes and edges are addressed by dense `u32` indices into the CSR
//! arrays.  Wrapping the integer keeps a node id from landing where an edge
//! id belongs, at zero runtime cost.  `u32::MAX` doubles as the "not
//! present" marker, so parent and lookup arrays can be bulk-initialised and
//! an unset entry is unmistakable when it leaks into a log line.

use std::fmt;

// Both id spaces are u32: a routable road network stays far below 4.3
// billion nodes or edges.
macro_rules! index_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
        pub struct $name(pub u32);

        impl $name {
            /// Marker for "not present": the parent of a search root, or a
            /// missed edge lookup.
            pub const INVALID: $name = $name(u32::MAX);

            /// The id as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            // Freshly allocated id arrays start out visibly unset.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if *self == Self::INVALID {
                    write!(f, "{}(-)", stringify!($name))
                } else {
                    write!(f, "{}({})", stringify!($name), self.0)
                }
            }
        }
    };
}

index_type! {
    /// A node of the road graph.
    NodeId
}

index_type! {
    /// A directed edge; also the position in the CSR head/weight arrays.
    EdgeId
}
