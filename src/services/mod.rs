//! Core logic: reconciliation, application, and the facade tying them to a
//! catalog and a registry.

pub mod applier;
pub mod reconciler;
mod toggler;

#[cfg(test)]
pub(crate) mod test_support;

pub use applier::apply;
pub use reconciler::{compute_state, reconcile, reconcile_all};
pub use toggler::Toggler;
