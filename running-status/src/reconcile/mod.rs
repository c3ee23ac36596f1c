//! Reconciliation of a scheduled itinerary with a live feed.
//!
//! The pipeline is pure and synchronous:
//!
//! 1. [`MatchIndex::build`] lines live records and the current-location
//!    pointer up with the itinerary.
//! 2. [`classify`] assigns each stop a [`StopStatus`].
//! 3. [`annotate`] derives per-leg delay annotations.
//! 4. [`reconcile`] assembles the display view.
//!
//! Nothing here performs I/O or returns an error. Callers that run several
//! lookups concurrently are responsible for discarding stale results (see
//! [`crate::sequence`]).

mod classify;
mod delay;
mod matcher;
mod view;

pub use classify::{Classification, StopStatus, Tier, classify};
pub use delay::{DelayAnnotation, Leg, Verdict, annotate};
pub use matcher::MatchIndex;
pub use view::{CurrentLocationView, DisplayStatus, StatusView, StopView, reconcile};
