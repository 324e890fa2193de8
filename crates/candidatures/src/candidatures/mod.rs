//! Candidature records and the observable store that loads, filters and mutates them.

pub mod domain;
pub mod filters;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{Candidature, CandidatureId, Commentaire};
pub use filters::{FilterMap, FilterPlan};
pub use store::{CandidatureError, CandidatureStore, ResourceState, Verb, COLLECTION};
