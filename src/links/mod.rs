//! Symlink reconciliation for library trees.

mod error;
mod reconciler;

pub use error::LinkError;
pub use reconciler::{create_link, is_broken, sweep_broken};
