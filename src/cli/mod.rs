//! # CLI Module
//!
//! The command-line interface layer for SpotiM3U. It implements the
//! user-facing commands and coordinates between the local catalog managers,
//! the resolver and the reconciler.
//!
//! ## Commands
//!
//! - [`auth`] - Initiates the Spotify OAuth authentication flow with PKCE
//!   security
//! - [`sync`] - Walks a directory of M3U/M3U8 files, refreshes the local
//!   catalog, resolves Spotify track ids and reconciles the remote playlists
//! - [`playlists`] - Displays the playlist registry as a table, including
//!   the editable remote name/id/artwork columns
//!
//! ## Error Handling Philosophy
//!
//! Each command is a `pub async fn` that logs through the crate's colored
//! macros and never returns an error to `main`: per-playlist and per-file
//! problems are warnings that leave the rest of the run intact, while
//! unusable configuration terminates via `error!`.

mod auth;
mod playlists;
mod sync;

pub use auth::auth;
pub use playlists::list_playlists;
pub use sync::SyncOptions;
pub use sync::sync;
