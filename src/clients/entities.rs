use oxigraph::model::NamedNode;

use crate::clients::errors::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artist {
    pub uri: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Album {
    pub uri: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub uri: String,
    pub name: String,
    pub duration_ms: u64,
    pub artist: Artist, // first listed artist only
    pub album: Album,
}

impl Track {
    /// Length of the track in whole seconds, sub-second part dropped
    pub fn duration_secs(&self) -> u64 {
        self.duration_ms / 1000
    }
}

// Artist or album reference as the API returned it. Local files have no URI.
#[derive(Debug, Clone, Default)]
pub struct RecordRef {
    pub uri: Option<String>,
    pub name: String,
}

/// Raw playlist item before validation
#[derive(Debug, Clone, Default)]
pub struct TrackRecord {
    pub uri: Option<String>,
    pub name: String,
    pub duration_ms: Option<i64>,
    pub artists: Vec<RecordRef>,
    pub album: Option<RecordRef>,
}

/// Playlist as fetched from the API, items in playlist order
#[derive(Debug, Clone, Default)]
pub struct Playlist {
    pub name: String,
    pub records: Vec<TrackRecord>,
}

impl TryFrom<TrackRecord> for Track {
    type Error = Error;

    fn try_from(record: TrackRecord) -> Result<Self, Self::Error> {
        let label = if record.name.is_empty() {
            "<unnamed>".to_string()
        } else {
            record.name.clone()
        };
        let malformed = |reason: &str| Error::MalformedRecord(label.clone(), reason.to_string());

        // Identities become graph nodes, so they must be valid IRIs
        let iri = |uri: Option<String>, what: &str| match uri {
            Some(uri) if NamedNode::new(uri.as_str()).is_ok() => Ok(uri),
            Some(uri) => Err(malformed(&format!("invalid {what} uri {uri:?}"))),
            None => Err(malformed(&format!("missing {what} uri"))),
        };

        let uri = iri(record.uri, "track")?;
        let duration_ms = record
            .duration_ms
            .ok_or_else(|| malformed("missing duration"))
            .and_then(|ms| u64::try_from(ms).map_err(|_| malformed("negative duration")))?;

        let artist = record
            .artists
            .into_iter()
            .next()
            .ok_or_else(|| malformed("no artists listed"))?;
        let artist = Artist {
            uri: iri(artist.uri, "artist")?,
            name: artist.name,
        };

        let album = record.album.ok_or_else(|| malformed("missing album"))?;
        let album = Album {
            uri: iri(album.uri, "album")?,
            name: album.name,
        };

        Ok(Track {
            uri,
            name: record.name,
            duration_ms,
            artist,
            album,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> TrackRecord {
        TrackRecord {
            uri: Some("spotify:track:1".into()),
            name: "Song A".into(),
            duration_ms: Some(210_500),
            artists: vec![
                RecordRef {
                    uri: Some("spotify:artist:x".into()),
                    name: "Artist X".into(),
                },
                RecordRef {
                    uri: Some("spotify:artist:z".into()),
                    name: "Featured Z".into(),
                },
            ],
            album: Some(RecordRef {
                uri: Some("spotify:album:1".into()),
                name: "Album 1".into(),
            }),
        }
    }

    #[test]
    fn keeps_first_artist_only() {
        let track = Track::try_from(record()).unwrap();
        assert_eq!(track.artist.name, "Artist X");
        assert_eq!(track.album.uri, "spotify:album:1");
        assert_eq!(track.duration_secs(), 210);
    }

    #[test]
    fn rejects_record_without_artists() {
        let mut rec = record();
        rec.artists.clear();
        let err = Track::try_from(rec).unwrap_err();
        assert!(matches!(err, Error::MalformedRecord(name, _) if name == "Song A"));
    }

    #[test]
    fn rejects_local_file_without_uris() {
        let mut rec = record();
        rec.album = Some(RecordRef {
            uri: None,
            name: "Local Files".into(),
        });
        assert!(Track::try_from(rec).is_err());

        let mut rec = record();
        rec.uri = None;
        assert!(Track::try_from(rec).is_err());
    }

    #[test]
    fn rejects_uris_that_are_not_iris() {
        let mut rec = record();
        rec.uri = Some("not an iri".into());
        let err = Track::try_from(rec).unwrap_err();
        assert!(err.to_string().contains("invalid track uri"));

        let mut rec = record();
        rec.artists[0].uri = Some("spotify:artist:<x>".into());
        assert!(Track::try_from(rec).is_err());
    }

    #[test]
    fn rejects_missing_or_negative_duration() {
        let mut rec = record();
        rec.duration_ms = None;
        assert!(Track::try_from(rec).is_err());

        let mut rec = record();
        rec.duration_ms = Some(-1);
        assert!(Track::try_from(rec).is_err());
    }
}
