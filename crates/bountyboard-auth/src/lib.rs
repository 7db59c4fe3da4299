//! Session token store.
//!
//! The [`TokenStore`] is the single owner of the signed-in session: access
//! token, refresh token and cached user. It keeps an in-memory copy and a
//! durable record, and falls back to the durable record whenever memory is
//! empty. Nothing here touches the network.
//!
//! # Components
//!
//! - [`SessionProvider`] - the seam the HTTP client depends on
//! - [`TokenStore`] - storage-backed implementation
//! - [`InMemorySession`] - test double that counts refreshes and logouts

pub mod error;
pub mod memory;
pub mod record;
pub mod store;

pub use error::{AuthError, Result};
pub use memory::InMemorySession;
pub use record::SessionRecord;
pub use store::{DEFAULT_SESSION_KEY, SessionProvider, SharedSessionProvider, TokenStore};
