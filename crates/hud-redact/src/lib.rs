//! Deep secret redaction for gateway state
//!
//! Everything read from an agent gateway's on-disk state goes through
//! here before it is shown anywhere. Two entry points share one
//! table-driven [`DetectionPolicy`]:
//! - [`Redactor::redact`] walks a parsed JSON tree
//! - [`Redactor::redact_text`] scrubs free text such as transcript lines
//!
//! Detection is best effort. The shape table targets well-known token
//! formats plus bare 40+ char hex; it will not catch every credential
//! and will occasionally flag an innocent digest. Treat the output as
//! less sensitive, not proven clean.

pub mod patterns;
pub mod redactor;

pub use patterns::{Anchor, SECRET_SHAPES, SENSITIVE_KEYS, SecretShape};
pub use redactor::{
    DEFAULT_MAX_DEPTH, DetectionPolicy, MIN_SECRET_LEN, PolicyError, REDACTION_MARKER, Redactor,
};
