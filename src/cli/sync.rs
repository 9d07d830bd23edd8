use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use walkdir::WalkDir;

use crate::{
    error, info,
    management::{PlaylistRegistryManager, TrackTableManager, merge_track_table},
    reconcile::{self, ReorderSkip},
    spotify::{playlist::SpotifyPlaylist, search},
    success, tags,
    types::{PlaylistRecord, RemoteId, TrackTags},
    utils::{self, PathRewrite},
    warning,
};

pub struct SyncOptions {
    pub folder: String,
    pub cache_only: bool,
    pub force_update: bool,
    pub update_art: bool,
    pub replace_from: Option<String>,
    pub replace_to: Option<String>,
    pub use_regex: bool,
}

/// Runs a full sync pass over every playlist file under the given folder.
///
/// Playlists are processed strictly one after another; within a playlist the
/// order is: scan tags, merge with the on-disk table, resolve missing ids,
/// persist, then (unless cache-only) reconcile the remote playlist and
/// optionally push artwork. A failing playlist is logged and skipped, the
/// run continues with the next one.
pub async fn sync(opts: SyncOptions) {
    let replace_from = opts.replace_from.clone().unwrap_or_default();
    let replace_to = if replace_from.is_empty() {
        String::new()
    } else {
        opts.replace_to.clone().unwrap_or_default()
    };

    let rewrite = match PathRewrite::new(&replace_from, &replace_to, opts.use_regex) {
        Ok(rewrite) => rewrite,
        Err(e) => error!("{}", e),
    };

    let playlist_files = discover_playlists(Path::new(&opts.folder));
    if playlist_files.is_empty() {
        warning!("No .m3u/.m3u8 files found under {}", opts.folder);
        return;
    }

    if let Err(e) = async_fs::create_dir_all("artwork").await {
        warning!("Cannot create artwork directory: {}", e);
    }

    // Register every discovered playlist up front so the user can fill in
    // remote ids for all of them after a single cache-only run.
    let registry = PlaylistRegistryManager::new();
    let discovered: Vec<PlaylistRecord> = playlist_files
        .iter()
        .map(|p| PlaylistRecord::new(&utils::playlist_stem(p)))
        .collect();
    let records = match registry.register(discovered).await {
        Ok(records) => records,
        Err(e) => error!("Cannot update playlist registry: {}", e),
    };

    if opts.cache_only {
        info!("Cache-only mode is enabled");
    }

    for path in &playlist_files {
        let local_name = utils::playlist_stem(path);
        let Some(record) = records.iter().find(|r| r.local_name == local_name) else {
            continue;
        };

        info!("Processing playlist '{}'", local_name);
        process_playlist(path, record, &rewrite, &opts).await;
    }
}

/// Recursively collects all M3U/M3U8 files under `root`, sorted by path for
/// a stable processing order.
fn discover_playlists(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("m3u") || ext.eq_ignore_ascii_case("m3u8"))
                .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

async fn process_playlist(
    path: &Path,
    record: &PlaylistRecord,
    rewrite: &PathRewrite,
    opts: &SyncOptions,
) {
    let fresh = match scan_playlist_file(path, rewrite).await {
        Ok(fresh) => fresh,
        Err(e) => {
            warning!("Cannot read playlist file '{}': {}", path.display(), e);
            return;
        }
    };

    let table = TrackTableManager::new(&record.label());
    let on_disk = match table.load().await {
        Ok(on_disk) => on_disk,
        Err(e) => {
            warning!("Cannot load track table for [{}]: {}", record.label(), e);
            return;
        }
    };

    let mut merged = merge_track_table(fresh, &on_disk);

    let pb = ProgressBar::new(merged.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("{bar:40.blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb.set_message("Resolving track ids...");

    let mut searcher = search::SpotifySearch;
    for track in merged.iter_mut() {
        track.remote_track_id = search::resolve_track_id(
            &mut searcher,
            track.title.as_deref(),
            track.artist.as_deref(),
            track.album.as_deref(),
            &track.remote_track_id,
            opts.force_update,
        )
        .await;
        pb.inc(1);
    }
    pb.finish_and_clear();

    if let Err(e) = table.persist(&merged).await {
        warning!("Cannot persist track table for [{}]: {}", record.label(), e);
        return;
    }

    let target = utils::target_sequence(&merged);
    if utils::has_duplicate_ids(&target) {
        warning!(
            "Dupe track IDs detected in '{}', processing skipped",
            path.display()
        );
        return;
    }

    if opts.cache_only {
        return;
    }

    let RemoteId::Id(playlist_id) = &record.remote_id else {
        warning!(
            "[{}]: No remote playlist id set, edit the registry to enable syncing",
            record.label()
        );
        return;
    };

    let mut remote = match SpotifyPlaylist::connect().await {
        Ok(remote) => remote,
        Err(e) => {
            error!("Failed to load token. Please run spotim3u auth\n Error: {}", e);
        }
    };

    info!("[{}]: Started processing", record.label());

    match reconcile::reconcile(&mut remote, playlist_id, &target).await {
        Ok(report) => {
            if report.is_noop() {
                success!("[{}]: Already in sync", record.label());
            } else {
                success!(
                    "[{}]: Pruned {}, added {}, moved {}",
                    record.label(),
                    report.pruned,
                    report.added,
                    report.moved
                );
            }

            match report.reorder_skipped {
                Some(ReorderSkip::CountMismatch { remote, target }) => warning!(
                    "[{}]: Track number mismatch ({} remote vs {} local), reordering failed",
                    record.label(),
                    remote,
                    target
                ),
                Some(ReorderSkip::SetMismatch) => warning!(
                    "[{}]: Tracks mismatch, reordering failed",
                    record.label()
                ),
                None => {}
            }
        }
        Err(e) => {
            warning!("[{}]: Reconciliation failed: {}", record.label(), e);
            return;
        }
    }

    if opts.update_art {
        update_artwork(&mut remote, record, playlist_id).await;
    }

    info!("[{}]: Finished processing", record.label());
}

/// Reads the playlist file and extracts tags for every referenced audio
/// file that exists after path rewriting. Unreadable audio files are logged
/// and skipped; the playlist file itself failing to read is an error.
async fn scan_playlist_file(
    path: &Path,
    rewrite: &PathRewrite,
) -> Result<Vec<TrackTags>, std::io::Error> {
    let content = async_fs::read_to_string(path).await?;

    let mut found = Vec::new();
    for line in content.lines() {
        let candidate = rewrite.apply(line.trim());
        let candidate = Path::new(&candidate);
        if !candidate.is_file() {
            continue;
        }

        match tags::extract(candidate) {
            Ok(tags) => found.push(tags),
            Err(e) => warning!("Skipping unreadable file '{}': {}", candidate.display(), e),
        }
    }

    Ok(found)
}

async fn update_artwork(remote: &mut SpotifyPlaylist, record: &PlaylistRecord, playlist_id: &str) {
    match utils::read_artwork_base64(&record.artwork_path).await {
        Some(image) => match remote.upload_cover(playlist_id, &image).await {
            Ok(()) => success!("[{}]: Updated artwork", record.label()),
            Err(e) => warning!("[{}]: Artwork upload failed: {}", record.label(), e),
        },
        None => warning!(
            "[{}]: Artwork fetching failed (missing or larger than {} KiB)",
            record.label(),
            utils::ARTWORK_MAX_BYTES / 1024
        ),
    }
}
