//! Infrastructure layer: process and clipboard boundaries
//!
//! This layer implements the capability traits the core is tested against.

pub mod error;
pub mod traits;

pub use error::{InfraError, InfraResult};
pub use traits::{ClipboardWriter, CommandClipboard, CommandRunner, RealCommandRunner};
