//! # Spotify Integration Module
//!
//! This module is the integration layer between SpotiM3U and the Spotify Web
//! API. It handles authentication, track search and every playlist mutation
//! the reconciler needs, abstracting the HTTP requests, OAuth flow and API
//! quirks behind a small Rust interface.
//!
//! ## Core Modules
//!
//! - [`auth`] - OAuth 2.0 PKCE (Proof Key for Code Exchange) flow: code
//!   verifier/challenge generation, browser launch, local callback server
//!   hand-off, token exchange and persistence. PKCE needs no client secret,
//!   so only the application's client id is ever stored.
//! - [`search`] - Track search with the structured `field:value` query
//!   grammar, plus the sentinel-aware resolver that maps local tag triples
//!   to Spotify track ids with a MusicBrainz transliteration fallback.
//! - [`playlist`] - The playlist mutation surface: paginated item listing,
//!   batch remove, batch append, single-range reorder and cover image
//!   upload. Implements the reconciler's [`crate::reconcile::RemotePlaylist`]
//!   trait.
//!
//! ## API Coverage
//!
//! - `GET /search` - structured track search
//! - `GET /playlists/{id}/tracks` - paginated item listing (100 per page)
//! - `DELETE /playlists/{id}/tracks` - batch remove, all occurrences
//! - `POST /playlists/{id}/tracks` - batch append, order preserving
//! - `PUT /playlists/{id}/tracks` - single-range move
//! - `PUT /playlists/{id}/images` - base64 JPEG cover upload
//! - `POST /api/token` - token exchange and refresh
//!
//! ## Error Handling
//!
//! Rate limiting (429) is respected via the `Retry-After` header and
//! transient 502 responses are retried with a delay, in line with the rest
//! of the application's HTTP handling. Other errors are propagated as
//! `reqwest::Error`; the search-based resolver additionally downgrades
//! transport failures to the `unavailable` sentinel because a missed lookup
//! must never abort a run.

pub mod auth;
pub mod playlist;
pub mod search;
