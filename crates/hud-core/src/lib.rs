//! Core domain models for hud
//!
//! This crate contains:
//! - Domain models (agents, sessions, transcripts, stats)
//! - The shared error type for gateway reads
//!
//! Everything here is plain data; reading and redacting live in the
//! `hud-store` and `hud-redact` crates.

pub mod agent;
pub mod error;
pub mod session;
pub mod stats;

pub use agent::{
    AgentDetail, AgentIdentity, AgentRecord, AgentStatus, AgentSummary, CAPABILITY_LIMIT,
    capabilities_from_persona,
};
pub use error::{Error, Result};
pub use session::{SessionInfo, SessionSummary, TranscriptEntry};
pub use stats::{AgentTotals, CronTotals, StatsReport, sum_usage};
