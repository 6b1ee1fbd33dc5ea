//! Gateway state readers for hud
//!
//! This crate contains:
//! - [`GatewayStore`]: typed, redacted reads over a gateway base dir
//! - [`views`]: the derived read models the CLI prints
//!
//! Redaction happens at read time, so no caller above this crate ever
//! holds unredacted gateway state.

pub mod store;
pub mod views;

pub use store::{GatewayStore, IdentityDocs, StoreConfig, main_session_key};
pub use views::{agent_detail, agent_overview, gateway_stats, recent_activity, session_list};
