//! conceptmap: concept visualization core.
//!
//! Turns a concept description into a normalized [`domain::ConceptTree`]
//! (via an external mind-map service or a local fallback), computes a
//! deterministic tidy-tree [`layout`], layers interactive view state on top
//! ([`view::Viewer`]), and rasterizes the result for image [`export`].

pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod export;
pub mod infrastructure;
pub mod layout;
pub mod render;
pub mod service;
pub mod util;
pub mod view;

pub use domain::{ConceptTree, DomainError};
pub use view::Viewer;
