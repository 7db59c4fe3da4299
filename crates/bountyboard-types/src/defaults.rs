//! Built-in defaults shared by the storage-owning crates and the config layer.
//!
//! Keys are part of the persisted format: data written by one build must be
//! found by the next, so change them only with a migration.

/// Storage key of the session record.
pub const SESSION_KEY: &str = "bountyboard-auth";

/// Storage key of the bookmark set.
pub const BOOKMARKS_KEY: &str = "bountyboard-bookmarks";

/// Storage key prefix for winner drafts; the bounty id is appended.
pub const WINNERS_PREFIX: &str = "bountyboard-winners-";

/// Path fragments where a 401 means "wrong code", not "expired session".
pub const NO_REFRESH_PATHS: &[&str] = &["/verify-code", "/verify-totp", "/2fa/verify"];

/// Request timeout in seconds.
pub const TIMEOUT_SECS: u64 = 30;
