//! Eligibility matching and ranking engine for student exam and scholarship
//! opportunities.
//!
//! The engine is a pure computation over immutable snapshots: a validated
//! [`matching::StudentProfile`] and a candidate set of verified
//! [`matching::Opportunity`] records supplied by upstream collaborators. It
//! owns no persistence and performs no network I/O.

pub mod config;
pub mod error;
pub mod ingest;
pub mod matching;
pub mod telemetry;
