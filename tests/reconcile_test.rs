use spotim3u::Res;
use spotim3u::reconcile::{PAGE_LIMIT, ReconcileReport, RemotePlaylist, ReorderSkip, reconcile};

// Helper function to build an id sequence from string literals
fn ids(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

/// In-memory playlist implementing the remote mutation surface with the same
/// semantics as the Spotify endpoints: remove drops every occurrence of an
/// id, append preserves order, and a move removes the track at `from` and
/// re-inserts it before the element that sat at index `to`.
struct FakeRemote {
    tracks: Vec<String>,
    list_calls: usize,
    remove_calls: usize,
    append_calls: usize,
    move_calls: usize,
}

impl FakeRemote {
    fn with_tracks(raw: &[&str]) -> Self {
        Self {
            tracks: ids(raw),
            list_calls: 0,
            remove_calls: 0,
            append_calls: 0,
            move_calls: 0,
        }
    }

    fn mutation_calls(&self) -> usize {
        self.remove_calls + self.append_calls + self.move_calls
    }
}

impl RemotePlaylist for FakeRemote {
    async fn list_tracks(&mut self, _playlist_id: &str) -> Res<Vec<String>> {
        self.list_calls += 1;
        Ok(self.tracks.clone())
    }

    async fn remove_tracks(&mut self, _playlist_id: &str, remove: &[String]) -> Res<()> {
        assert!(remove.len() <= PAGE_LIMIT, "remove batch exceeds page limit");
        self.remove_calls += 1;
        self.tracks.retain(|id| !remove.contains(id));
        Ok(())
    }

    async fn append_tracks(&mut self, _playlist_id: &str, add: &[String]) -> Res<()> {
        assert!(add.len() <= PAGE_LIMIT, "append batch exceeds page limit");
        self.append_calls += 1;
        self.tracks.extend_from_slice(add);
        Ok(())
    }

    async fn move_track(&mut self, _playlist_id: &str, from: usize, to: usize) -> Res<()> {
        self.move_calls += 1;
        let track = self.tracks.remove(from);
        let insert_at = if from < to { to - 1 } else { to };
        self.tracks.insert(insert_at, track);
        Ok(())
    }
}

#[tokio::test]
async fn test_matching_playlist_is_a_noop() {
    let mut remote = FakeRemote::with_tracks(&["a", "b", "c"]);
    let target = ids(&["a", "b", "c"]);

    let report = reconcile(&mut remote, "pl", &target).await.unwrap();

    assert!(report.is_noop());
    assert_eq!(report, ReconcileReport::default());
    assert_eq!(remote.mutation_calls(), 0);
    assert_eq!(remote.tracks, target);
}

#[tokio::test]
async fn test_reconcile_is_idempotent() {
    let mut remote = FakeRemote::with_tracks(&["x", "c", "a"]);
    let target = ids(&["a", "b", "c"]);

    let first = reconcile(&mut remote, "pl", &target).await.unwrap();
    assert!(!first.is_noop());
    assert_eq!(remote.tracks, target);

    // A second run against the converged playlist must not mutate anything
    let second = reconcile(&mut remote, "pl", &target).await.unwrap();
    assert!(second.is_noop());
    assert_eq!(remote.tracks, target);
}

#[tokio::test]
async fn test_duplicate_target_ids_abort_before_any_call() {
    let mut remote = FakeRemote::with_tracks(&["a", "b"]);
    let target = ids(&["a", "b", "a"]);

    let result = reconcile(&mut remote, "pl", &target).await;

    assert!(result.is_err());
    assert_eq!(remote.list_calls, 0);
    assert_eq!(remote.mutation_calls(), 0);
    assert_eq!(remote.tracks, ids(&["a", "b"]));
}

#[tokio::test]
async fn test_prune_removes_exactly_the_extraneous_tracks() {
    let mut remote = FakeRemote::with_tracks(&["x", "a", "y", "b"]);
    let target = ids(&["a", "b"]);

    let report = reconcile(&mut remote, "pl", &target).await.unwrap();

    assert_eq!(report.pruned, 2);
    assert_eq!(report.added, 0);
    assert_eq!(report.reorder_skipped, None);
    assert_eq!(remote.tracks, target);
}

#[tokio::test]
async fn test_add_appends_missing_tracks_in_target_order() {
    let mut remote = FakeRemote::with_tracks(&["a"]);
    let target = ids(&["a", "b", "c"]);

    let report = reconcile(&mut remote, "pl", &target).await.unwrap();

    assert_eq!(report.pruned, 0);
    assert_eq!(report.added, 2);
    assert_eq!(report.moved, 0);
    assert_eq!(remote.tracks, target);
}

#[tokio::test]
async fn test_prune_then_add_then_reorder() {
    // One stale track, one missing track, and the survivors out of order
    let mut remote = FakeRemote::with_tracks(&["x", "a", "b"]);
    let target = ids(&["a", "b", "c"]);

    let report = reconcile(&mut remote, "pl", &target).await.unwrap();

    assert_eq!(report.pruned, 1);
    assert_eq!(report.added, 1);
    assert_eq!(report.reorder_skipped, None);
    assert_eq!(remote.tracks, target);
}

#[tokio::test]
async fn test_reversed_playlist_converges_with_moves_only() {
    let mut remote = FakeRemote::with_tracks(&["c", "b", "a"]);
    let target = ids(&["a", "b", "c"]);

    let report = reconcile(&mut remote, "pl", &target).await.unwrap();

    assert_eq!(report.pruned, 0);
    assert_eq!(report.added, 0);
    assert_eq!(report.moved, 2);
    assert_eq!(remote.tracks, target);
}

#[tokio::test]
async fn test_arbitrary_remote_state_converges() {
    let mut remote = FakeRemote::with_tracks(&["d", "c", "x", "a"]);
    let target = ids(&["a", "b", "c", "d"]);

    let report = reconcile(&mut remote, "pl", &target).await.unwrap();

    assert_eq!(report.pruned, 1);
    assert_eq!(report.added, 1);
    assert_eq!(report.reorder_skipped, None);
    assert_eq!(remote.tracks, target);
}

#[tokio::test]
async fn test_remote_duplicates_skip_reorder_but_keep_prune_and_add() {
    // The remote carries a duplicate of a wanted id. Pruning only removes ids
    // absent from the target, so the duplicate survives and the length
    // precondition of the reorder phase fails.
    let mut remote = FakeRemote::with_tracks(&["a", "a", "x", "b"]);
    let target = ids(&["b", "a"]);

    let report = reconcile(&mut remote, "pl", &target).await.unwrap();

    assert_eq!(report.pruned, 1);
    assert_eq!(report.added, 0);
    assert_eq!(report.moved, 0);
    assert_eq!(
        report.reorder_skipped,
        Some(ReorderSkip::CountMismatch {
            remote: 3,
            target: 2
        })
    );
    // The prune result stands even though reordering was skipped
    assert_eq!(remote.tracks, ids(&["a", "a", "b"]));
}

#[tokio::test]
async fn test_large_append_is_batched() {
    let mut remote = FakeRemote::with_tracks(&[]);
    let target: Vec<String> = (0..205).map(|i| format!("track{:03}", i)).collect();

    let report = reconcile(&mut remote, "pl", &target).await.unwrap();

    assert_eq!(report.added, 205);
    assert_eq!(report.moved, 0);
    assert_eq!(remote.append_calls, 3);
    assert_eq!(remote.tracks, target);
}

#[tokio::test]
async fn test_refetch_happens_after_every_move() {
    let mut remote = FakeRemote::with_tracks(&["c", "b", "a"]);
    let target = ids(&["a", "b", "c"]);

    let report = reconcile(&mut remote, "pl", &target).await.unwrap();

    // One initial list, one pre-reorder list, one refetch per move
    assert_eq!(remote.list_calls, 2 + report.moved);
}
