//! # API Module
//!
//! HTTP endpoints for the short-lived local web server SpotiM3U runs during
//! authentication. The server exists only to receive Spotify's OAuth
//! redirect; it is started by the `auth` command and never during a sync.
//!
//! ## Endpoints
//!
//! - [`callback`] - Handles the OAuth redirect from Spotify's authorization
//!   server and completes the PKCE flow by exchanging the authorization code
//!   for an access token.
//! - [`health`] - Returns application status and version, handy for checking
//!   that the callback server actually came up on the configured address.
//!
//! Both handlers are plain async functions wired into an
//! [Axum](https://docs.rs/axum) router by [`crate::server`].

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
