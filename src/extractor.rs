use std::io::Write;
use std::path::PathBuf;

use log::{debug, info, warn};

use crate::clients::{
    entities::{Playlist, Track, TrackRecord},
    errors::Result,
};
use crate::duration::format_millis;
use crate::graph::PlaylistGraph;

/// Where playlist items come from
pub trait PlaylistSource {
    /// Fetch the playlist name and all of its items, in playlist order
    fn fetch_playlist(&self, playlist_id: &str) -> impl Future<Output = Result<Playlist>>;
}

/// Outcome of one extraction run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionReport {
    pub playlist_name: String,
    pub items: usize,
    pub tracks_written: usize,
    pub skipped: usize,
    pub triples: usize,
    pub output: PathBuf,
    /// Tracks written, in playlist order
    pub tracks: Vec<Track>,
}

// Turns one playlist into a graph file
pub struct Extractor<S> {
    source: S,
}

impl<S: PlaylistSource> Extractor<S> {
    pub fn new(source: S) -> Self {
        Extractor { source }
    }

    /// Fetch `playlist_id`, convert its tracks and write the graph to `output`.
    ///
    /// Nothing is written if fetching fails. Malformed items are skipped and counted.
    pub async fn extract(&self, playlist_id: &str, output: PathBuf) -> Result<ExtractionReport> {
        info!("Starting extraction of playlist {playlist_id} ...");
        let playlist = self.source.fetch_playlist(playlist_id).await?;
        let items = playlist.records.len();
        info!("Playlist {:?} has {items} items", playlist.name);

        let (tracks, skipped) = valid_tracks(playlist.records);

        let graph = PlaylistGraph::new()?;
        for track in &tracks {
            debug!("Adding track {} ({})", track.name, track.uri);
            graph.insert_track(track)?;
        }
        let triples = graph.len()?;
        graph.save(&output).await?;

        if skipped > 0 {
            warn!("Skipped {skipped} malformed playlist items");
        }
        info!(
            "Extraction completed. {} tracks, {triples} triples written to {output:?}",
            tracks.len()
        );

        Ok(ExtractionReport {
            playlist_name: playlist.name,
            items,
            tracks_written: tracks.len(),
            skipped,
            triples,
            output,
            tracks,
        })
    }
}

/// Print one block per track: name, first artist, album and `M:SS` duration
pub fn write_track_listing<W: Write>(out: &mut W, tracks: &[Track]) -> Result<()> {
    for track in tracks {
        writeln!(out, "Track Name: {}", track.name)?;
        writeln!(out, "Artist: {}", track.artist.name)?;
        writeln!(out, "Album: {}", track.album.name)?;
        writeln!(out, "Duration: {}", format_millis(track.duration_ms))?;
        writeln!(out, "---")?;
    }
    Ok(())
}

// Keep the records that convert cleanly; count the rest
fn valid_tracks(records: Vec<TrackRecord>) -> (Vec<Track>, usize) {
    let mut skipped = 0;
    let tracks = records
        .into_iter()
        .filter_map(|record| match Track::try_from(record) {
            Ok(track) => Some(track),
            Err(e) => {
                warn!("Skipping playlist item: {e}");
                skipped += 1;
                None
            }
        })
        .collect();
    (tracks, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::entities::RecordRef;
    use crate::clients::errors::Error;
    use crate::queries;
    use assert_fs::TempDir;

    struct FakeSource {
        playlist: Option<Playlist>,
    }

    impl PlaylistSource for FakeSource {
        async fn fetch_playlist(&self, _playlist_id: &str) -> Result<Playlist> {
            self.playlist
                .clone()
                .ok_or_else(|| Error::ConfigurationError("invalid client".into()))
        }
    }

    fn record(id: &str, artist: Option<&str>, ms: i64) -> TrackRecord {
        TrackRecord {
            uri: Some(format!("spotify:track:{id}")),
            name: format!("Song {id}"),
            duration_ms: Some(ms),
            artists: artist
                .map(|a| RecordRef {
                    uri: Some(format!("spotify:artist:{a}")),
                    name: format!("Artist {a}"),
                })
                .into_iter()
                .collect(),
            album: Some(RecordRef {
                uri: Some("spotify:album:1".into()),
                name: "Album 1".into(),
            }),
        }
    }

    #[tokio::test]
    async fn skips_malformed_items_and_writes_the_rest() {
        let source = FakeSource {
            playlist: Some(Playlist {
                name: "Wedding".into(),
                records: vec![
                    record("a", Some("X"), 210_000),
                    record("b", None, 255_000),
                    TrackRecord::default(),
                    record("c", Some("Y"), 120_000),
                ],
            }),
        };
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("skips.rdf");
        let report = Extractor::new(source)
            .extract("wedding", output.clone())
            .await
            .unwrap();

        assert_eq!(report.items, 4);
        assert_eq!(report.tracks_written, 2);
        assert_eq!(report.skipped, 2);

        let graph = PlaylistGraph::load(&output).unwrap();
        assert_eq!(queries::total_songs(&graph).unwrap(), 2);
        assert_eq!(graph.len().unwrap(), report.triples);

        let mut listing = Vec::new();
        write_track_listing(&mut listing, &report.tracks).unwrap();
        assert_eq!(
            String::from_utf8(listing).unwrap(),
            "Track Name: Song a\nArtist: Artist X\nAlbum: Album 1\nDuration: 3:30\n---\n\
             Track Name: Song c\nArtist: Artist Y\nAlbum: Album 1\nDuration: 2:00\n---\n"
        );
    }

    #[tokio::test]
    async fn invalid_iri_skips_only_that_item() {
        let mut bad = record("bad", Some("X"), 180_000);
        bad.uri = Some("not an iri".into());
        let source = FakeSource {
            playlist: Some(Playlist {
                name: "Wedding".into(),
                records: vec![
                    record("a", Some("X"), 210_000),
                    bad,
                    record("c", Some("Y"), 120_000),
                ],
            }),
        };
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("iri.rdf");
        let report = Extractor::new(source)
            .extract("wedding", output.clone())
            .await
            .unwrap();

        assert_eq!(report.tracks_written, 2);
        assert_eq!(report.skipped, 1);
        let graph = PlaylistGraph::load(&output).unwrap();
        assert_eq!(queries::total_songs(&graph).unwrap(), 2);
    }

    #[tokio::test]
    async fn failed_fetch_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("failed.rdf");
        let result = Extractor::new(FakeSource { playlist: None })
            .extract("wedding", output.clone())
            .await;
        assert!(result.is_err());
        assert!(!output.exists());
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[tokio::test]
    async fn replaces_previous_file() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("replace.rdf");
        std::fs::write(&output, "stale").unwrap();
        let source = FakeSource {
            playlist: Some(Playlist {
                name: "Empty".into(),
                records: vec![],
            }),
        };
        let report = Extractor::new(source)
            .extract("empty", output.clone())
            .await
            .unwrap();
        assert_eq!(report.tracks_written, 0);
        let graph = PlaylistGraph::load(&output).unwrap();
        assert!(graph.is_empty().unwrap());
    }
}
