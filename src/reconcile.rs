//! Remote playlist reconciliation.
//!
//! Brings a remote playlist's track sequence into exact correspondence (set
//! and order) with a local target sequence, using only the primitives the
//! remote service exposes: paginated listing, batch remove, batch append and
//! a single-range move. The three phases always run in the fixed order
//! prune -> add -> reorder: pruning must precede adding so a removed id
//! cannot collide with an appended one, and adding must precede reordering
//! so every target id has a position to move to.
//!
//! Reordering is deliberately conservative: after every move the remote
//! sequence is fetched again instead of bookkeeping indices locally, because
//! a single move shifts an unspecified range of other indices and the remote
//! service's shift semantics are versioned state this client does not
//! control. That costs one list call per out-of-place track and buys
//! correctness.
//!
//! The reconciler never logs; it returns a [`ReconcileReport`] that the CLI
//! layer turns into log lines. Phases are not transactional: when the
//! reorder preconditions fail only the reorder phase is skipped, and the
//! prune/add calls that already ran stand.

use std::collections::HashSet;

use crate::{Res, utils};

/// Batch ceiling shared by the list, remove and append primitives.
pub const PAGE_LIMIT: usize = 100;

/// The remote mutation surface the reconciler runs against.
///
/// Implemented by the Spotify client and, in tests, by an in-memory fake.
/// `list_tracks` returns the full concatenated sequence (the implementation
/// pages through the listing endpoint); the mutators take at most
/// [`PAGE_LIMIT`] ids per call.
pub trait RemotePlaylist {
    /// Full ordered track-id sequence of the playlist.
    async fn list_tracks(&mut self, playlist_id: &str) -> Res<Vec<String>>;

    /// Removes every occurrence of each id. At most [`PAGE_LIMIT`] ids.
    async fn remove_tracks(&mut self, playlist_id: &str, ids: &[String]) -> Res<()>;

    /// Appends ids at the end, preserving the given order. At most
    /// [`PAGE_LIMIT`] ids.
    async fn append_tracks(&mut self, playlist_id: &str, ids: &[String]) -> Res<()>;

    /// Moves the single track at `from` to before index `to`.
    async fn move_track(&mut self, playlist_id: &str, from: usize, to: usize) -> Res<()>;
}

/// Why the reorder phase was skipped. Prune and add results still stand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderSkip {
    CountMismatch { remote: usize, target: usize },
    SetMismatch,
}

/// Outcome of one reconciliation run. All counts are distinct ids.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    pub pruned: usize,
    pub added: usize,
    pub moved: usize,
    pub reorder_skipped: Option<ReorderSkip>,
}

impl ReconcileReport {
    /// True when the remote playlist already matched the target and no
    /// mutation call was issued.
    pub fn is_noop(&self) -> bool {
        self.pruned == 0 && self.added == 0 && self.moved == 0 && self.reorder_skipped.is_none()
    }
}

/// Reconciles the remote playlist with `target`.
///
/// Aborts before issuing any call when `target` contains duplicate ids,
/// since duplicate ids make the reorder moves ambiguous. Otherwise prunes
/// `remote \ target`, appends `target \ remote` in target order, and walks
/// the target left to right moving each out-of-place track into position.
/// Running this twice against an unchanged target is a no-op.
pub async fn reconcile<R: RemotePlaylist>(
    remote: &mut R,
    playlist_id: &str,
    target: &[String],
) -> Res<ReconcileReport> {
    if utils::has_duplicate_ids(target) {
        return Err("duplicate remote track ids in target sequence".into());
    }

    let current = remote.list_tracks(playlist_id).await?;

    let mut report = ReconcileReport::default();
    report.pruned = prune(remote, playlist_id, target, &current).await?;
    report.added = add_missing(remote, playlist_id, target, &current).await?;
    reorder(remote, playlist_id, target, &mut report).await?;

    Ok(report)
}

/// Removes every remote id absent from the target, in listing order,
/// batched. Duplicate occurrences collapse into one remove since the remote
/// primitive removes all occurrences of an id.
async fn prune<R: RemotePlaylist>(
    remote: &mut R,
    playlist_id: &str,
    target: &[String],
    current: &[String],
) -> Res<usize> {
    let keep: HashSet<&str> = target.iter().map(String::as_str).collect();
    let mut to_prune: Vec<String> = current
        .iter()
        .filter(|id| !keep.contains(id.as_str()))
        .cloned()
        .collect();
    utils::dedup_preserving_order(&mut to_prune);

    for chunk in to_prune.chunks(PAGE_LIMIT) {
        remote.remove_tracks(playlist_id, chunk).await?;
    }

    Ok(to_prune.len())
}

/// Appends every target id the remote playlist does not carry yet, in
/// target order, batched.
async fn add_missing<R: RemotePlaylist>(
    remote: &mut R,
    playlist_id: &str,
    target: &[String],
    current: &[String],
) -> Res<usize> {
    let present: HashSet<&str> = current.iter().map(String::as_str).collect();
    let to_add: Vec<String> = target
        .iter()
        .filter(|id| !present.contains(id.as_str()))
        .cloned()
        .collect();

    for chunk in to_add.chunks(PAGE_LIMIT) {
        remote.append_tracks(playlist_id, chunk).await?;
    }

    Ok(to_add.len())
}

/// Moves every out-of-place track to its target position, refetching the
/// remote sequence after each move. Requires the post-prune/add sequence to
/// match the target in length and membership; on mismatch the phase is
/// skipped and the reason recorded.
async fn reorder<R: RemotePlaylist>(
    remote: &mut R,
    playlist_id: &str,
    target: &[String],
    report: &mut ReconcileReport,
) -> Res<()> {
    let mut current = remote.list_tracks(playlist_id).await?;

    if current.len() != target.len() {
        report.reorder_skipped = Some(ReorderSkip::CountMismatch {
            remote: current.len(),
            target: target.len(),
        });
        return Ok(());
    }

    let current_set: HashSet<&str> = current.iter().map(String::as_str).collect();
    let target_set: HashSet<&str> = target.iter().map(String::as_str).collect();
    if current_set != target_set {
        report.reorder_skipped = Some(ReorderSkip::SetMismatch);
        return Ok(());
    }

    for (position, want) in target.iter().enumerate() {
        let Some(found_at) = current.iter().position(|id| id == want) else {
            continue;
        };

        if found_at != position {
            remote.move_track(playlist_id, found_at, position).await?;
            report.moved += 1;
            current = remote.list_tracks(playlist_id).await?;
        }
    }

    Ok(())
}
