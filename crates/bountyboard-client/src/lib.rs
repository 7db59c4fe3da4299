//! HTTP client for the bountyboard backend.
//!
//! Requests carry the session's access token as a bearer credential. When
//! the backend answers 401 the client refreshes the session through
//! `POST /api/auth/refresh` on a separate, non-intercepted HTTP client and
//! resubmits the original request once with the new token. If the refresh
//! fails the session is logged out and the original error is returned.
//!
//! Verification endpoints (`/verify-code`, `/verify-totp`, `/2fa/verify`)
//! are exempt: a 401 there means the code was wrong.
//!
//! # Example
//!
//! ```no_run
//! use bountyboard_client::{BountyClient, LoginOutcome, Result};
//!
//! # async fn example() -> Result<()> {
//! let client = BountyClient::builder()
//!     .base_url("http://localhost:4000")
//!     .build()?;
//!
//! match client.auth().login("ada@example.com", "hunter2").await? {
//!     LoginOutcome::Authenticated(session) => println!("hello {:?}", session.user),
//!     LoginOutcome::VerificationRequired { email } => println!("check {}", email),
//!     LoginOutcome::TwoFactorRequired { .. } => println!("enter your 2FA code"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod error;
pub mod tokens;
pub mod types;

pub use client::{BountyClient, ClientBuilder, DEFAULT_NO_REFRESH_PATHS, REFRESH_PATH};
pub use error::{Error, Result};
pub use tokens::{TokenPair, normalize_tokens};
pub use types::{ListQuery, LoginOutcome, SelectWinnersRequest, WinnerSubmission};
