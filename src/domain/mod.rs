//! Domain layer: the concept tree and its construction
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod error;
pub mod fallback;
pub mod normalize;
pub mod tree;

pub use error::DomainError;
pub use fallback::{diagnostic_tree, placeholder_tree};
pub use normalize::{normalize, MAX_DEPTH};
pub use tree::{ConceptNode, ConceptTree, NodeId};
