//! Reduces a parsed session into per-player and per-session totals, and
//! merges players that share an identity.
mod reconcile;
mod summary;

pub use reconcile::{
    AliasContribution, IdentitySummary, ReconcileConflict, Reconciliation, reconcile,
};
pub use summary::{PlayerSummary, SessionSummary};
