//! Release import from JSON.
//!
//! Input format: an array of releases, each with a track list:
//!
//! ```json
//! [
//!   {
//!     "title": "Discovery",
//!     "artist": "Daft Punk",
//!     "tracks": [
//!       { "position": 1, "title": "One More Time", "isrc": "GBDUW0000059", "duration_secs": 320 }
//!     ]
//!   }
//! ]
//! ```

use std::path::Path;

use serde::Deserialize;
use tokio::runtime::Runtime;
use tracing::info;

use crate::db;
use crate::error::{Error, Result, ResultExt};

#[derive(Debug, Deserialize)]
struct ImportRelease {
    title: String,
    #[serde(default)]
    artist: Option<String>,
    #[serde(default)]
    tracks: Vec<ImportTrack>,
}

#[derive(Debug, Deserialize)]
struct ImportTrack {
    position: i64,
    title: String,
    #[serde(default)]
    isrc: Option<String>,
    #[serde(default)]
    duration_secs: Option<i64>,
}

/// Import releases and tracks from a JSON file into the database.
pub fn cmd_import(rt: &Runtime, path: &Path, db_path: &Path) -> anyhow::Result<()> {
    let releases = read_import_file(path)?;

    rt.block_on(async {
        let pool = db::init_db(&db::db_url(Some(db_path)))
            .await
            .with_context(format!("initializing database at {}", db_path.display()))?;

        let mut track_count = 0usize;
        for release in &releases {
            let release_id =
                db::insert_release(&pool, &release.title, release.artist.as_deref())
                    .await
                    .with_context(format!("inserting release '{}'", release.title))?;

            for track in &release.tracks {
                db::insert_track(
                    &pool,
                    release_id,
                    track.position,
                    &track.title,
                    track.isrc.as_deref(),
                    track.duration_secs,
                )
                .await
                .with_context(format!("inserting track '{}'", track.title))?;
                track_count += 1;
            }

            info!(release_id, title = %release.title, tracks = release.tracks.len(), "Imported release");
        }

        println!(
            "Imported {} releases ({} tracks) into {}",
            releases.len(),
            track_count,
            db_path.display()
        );
        Ok::<_, Error>(())
    })?;

    Ok(())
}

fn read_import_file(path: &Path) -> Result<Vec<ImportRelease>> {
    let contents = std::fs::read_to_string(path)
        .with_context(format!("reading import file {}", path.display()))?;

    serde_json::from_str(&contents)
        .map_err(|e| Error::invalid_input(format!("malformed import file: {e}")))
}
