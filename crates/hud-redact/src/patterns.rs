//! Built-in detection tables: sensitive key names and secret value shapes.
//!
//! Policy is data. Adding a key or a shape means adding a table entry
//! here (or extending the policy at runtime), never touching traversal
//! code.

/// How a shape applies to a whole string value.
///
/// `Value` shapes must cover the entire string. `Prefix` shapes only
/// need to match from the start (a JWT carries an arbitrary signature
/// tail).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Value,
    Prefix,
}

/// A secret value shape: a label for diagnostics plus a regex body.
///
/// Bodies are written unanchored. The policy compiler anchors them for
/// whole-value matching and word-boundary-guards them for free-text
/// scanning.
pub struct SecretShape {
    pub label: &'static str,
    pub pattern: &'static str,
    pub anchor: Anchor,
}

/// Built-in secret shapes, applied in order.
///
/// Deliberately small and prefix-driven. The bare hex entry will flag
/// legitimate 40+ char digests; losing the occasional commit hash is
/// preferred over leaking a credential.
pub static SECRET_SHAPES: &[SecretShape] = &[
    SecretShape {
        label: "openai-key",
        pattern: r"sk-[a-zA-Z0-9]{20,}",
        anchor: Anchor::Value,
    },
    SecretShape {
        label: "nvidia-key",
        pattern: r"nvapi-[a-zA-Z0-9_-]{20,}",
        anchor: Anchor::Value,
    },
    SecretShape {
        label: "github-pat",
        pattern: r"ghp_[a-zA-Z0-9]{20,}",
        anchor: Anchor::Value,
    },
    SecretShape {
        label: "github-oauth",
        pattern: r"gho_[a-zA-Z0-9]{20,}",
        anchor: Anchor::Value,
    },
    SecretShape {
        label: "slack-token",
        pattern: r"xox[bpsa]-[a-zA-Z0-9-]{20,}",
        anchor: Anchor::Value,
    },
    SecretShape {
        label: "telegram-bot-token",
        pattern: r"[0-9]+:AA[A-Za-z0-9_-]{30,}",
        anchor: Anchor::Value,
    },
    SecretShape {
        label: "brave-search-key",
        pattern: r"BSA[a-zA-Z0-9]{20,}",
        anchor: Anchor::Value,
    },
    SecretShape {
        label: "hex-token",
        pattern: r"[a-f0-9]{40,}",
        anchor: Anchor::Value,
    },
    SecretShape {
        label: "jwt",
        pattern: r"eyJ[a-zA-Z0-9_-]+\.[a-zA-Z0-9_-]+",
        anchor: Anchor::Prefix,
    },
];

/// Key names whose values are suppressed wholesale, in normalized form
/// (lowercase, with `.`, `-` and `_` stripped). `api_key`, `Api-Key`
/// and `apikey` all land on the same entry.
pub static SENSITIVE_KEYS: &[&str] = &[
    "apikey",
    "bottoken",
    "token",
    "password",
    "secret",
    "authtoken",
    "privatekey",
    "accesstoken",
    "refreshtoken",
    "clientsecret",
];
