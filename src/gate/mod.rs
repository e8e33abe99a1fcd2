//! Retrieval-quality gate.
//!
//! Given score-ranked candidates from the vector index, [`decide`] picks an information
//! sourcing strategy ([`RoutingDecision`]) and [`assemble`] builds the [`AnswerContext`]
//! handed to the generator.
//!
//! # Caller Contract
//!
//! `RetrievalResult::candidates` must already be sorted by score, descending, with ties in
//! retrieval order. The gate never re-sorts: it reads the top score and truncates a prefix.
//! Feeding unsorted input still yields a decision, just not one that reflects retrieval
//! quality.
//!
//! Nothing here performs I/O. The network-bound collaborators live in
//! [`crate::vectordb`], [`crate::fallback`] and [`crate::generation`], and the
//! degrade-on-failure policy lives in [`crate::pipeline`].

pub mod config;
pub mod error;
pub mod escalation;
pub mod policy;
pub mod types;


pub use config::GateConfig;
pub use error::GateError;
pub use escalation::{EscalationConfig, GENERAL_KNOWLEDGE_INDICATORS, escalate};
pub use policy::{RetrievalGate, assemble, decide};
pub use types::{
    AnswerContext, Candidate, Provenance, RetrievalResult, RoutingDecision, SourceOrigin,
};
