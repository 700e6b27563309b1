use std::path::PathBuf;

use log::debug;

use crate::clients::{
    entities::{Playlist, RecordRef, TrackRecord},
    errors::Result,
};
use crate::config::Settings;
use crate::extractor::PlaylistSource;
use futures::stream::TryStreamExt;
use rspotify::{
    AuthCodeSpotify, Config, Credentials, OAuth,
    model::{FullTrack, PlayableItem, PlaylistId, PlaylistItem},
    prelude::*,
    scopes,
};

impl From<FullTrack> for TrackRecord {
    fn from(track: FullTrack) -> TrackRecord {
        TrackRecord {
            uri: track.id.map(|id| id.uri()),
            name: track.name,
            duration_ms: Some(track.duration.num_milliseconds()),
            artists: track
                .artists
                .into_iter()
                .map(|artist| RecordRef {
                    uri: artist.id.map(|id| id.uri()),
                    name: artist.name,
                })
                .collect(),
            album: Some(RecordRef {
                uri: track.album.id.map(|id| id.uri()),
                name: track.album.name,
            }),
        }
    }
}

impl From<PlaylistItem> for TrackRecord {
    fn from(item: PlaylistItem) -> TrackRecord {
        match item.track {
            Some(PlayableItem::Track(track)) => TrackRecord::from(track),
            // Episodes and tracks removed from the catalog carry nothing to emit
            _ => TrackRecord {
                name: "<non-track item>".to_string(),
                ..Default::default()
            },
        }
    }
}

pub struct SpotifyClient {
    pub spotify: AuthCodeSpotify,
}

impl SpotifyClient {
    pub fn new(spotify: AuthCodeSpotify) -> Self {
        SpotifyClient { spotify }
    }

    // Authorize the Spotify client via CLI prompt and OAuth flow
    // This function requires the `cli` feature enabled.
    pub async fn authorize_client(&self) -> Result<()> {
        debug!("Starting Spotify authorization ...");
        let url = self.spotify.get_authorize_url(false)?;
        // Reuses the cached token when it is still valid
        self.spotify.prompt_for_token(&url).await?;
        let user = self.spotify.me().await?;
        debug!("Authenticated as user: {:?}", user.display_name);
        Ok(())
    }

    /// Build a client from already validated settings, read-only playlist scope
    pub fn from_settings(settings: &Settings) -> Self {
        let creds = Credentials::new(&settings.client_id, &settings.client_secret);
        let oauth = OAuth {
            redirect_uri: settings.redirect_uri.clone(),
            scopes: scopes!("playlist-read-private"),
            ..Default::default()
        };

        let cache_path = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp")) // Fallback to /tmp if cache directory can't be determined
            .join(".playlist_rdf_spotify_cache");

        let spotify = AuthCodeSpotify::with_config(
            creds,
            oauth,
            Config {
                token_cached: true,
                cache_path,
                ..Default::default()
            },
        );

        Self::new(spotify)
    }
}

impl PlaylistSource for SpotifyClient {
    // Walks every page of the playlist, keeping playlist order
    async fn fetch_playlist(&self, playlist_id: &str) -> Result<Playlist> {
        let id = PlaylistId::from_id_or_uri(playlist_id)?;

        let playlist = self.spotify.playlist(id.clone(), None, None).await?;
        debug!("Fetched playlist metadata for {:?}", playlist.name);

        let records: Vec<TrackRecord> = self
            .spotify
            .playlist_items(id, None, None)
            .map_ok(TrackRecord::from)
            .try_collect()
            .await?;

        Ok(Playlist {
            name: playlist.name,
            records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::entities::Track;
    use serde_json::{Value, json};

    fn full_track(track_id: Value, artist_id: Value, album_id: Value, is_local: bool) -> Value {
        json!({
            "album": {
                "album_type": "album",
                "artists": [],
                "external_urls": {},
                "href": null,
                "id": album_id,
                "images": [],
                "name": "Purple Rain"
            },
            "artists": [
                { "external_urls": {}, "href": null, "id": artist_id, "name": "Prince" },
                { "external_urls": {}, "href": null, "id": null, "name": "The Revolution" }
            ],
            "disc_number": 1,
            "duration_ms": 521_000,
            "explicit": false,
            "external_ids": {},
            "external_urls": {},
            "href": null,
            "id": track_id,
            "is_local": is_local,
            "name": "Purple Rain",
            "popularity": 70,
            "preview_url": null,
            "track_number": 9,
            "type": "track"
        })
    }

    fn playlist_item(track: Value) -> PlaylistItem {
        serde_json::from_value(json!({
            "added_at": null,
            "added_by": null,
            "is_local": false,
            "track": track
        }))
        .unwrap()
    }

    #[test]
    fn full_track_maps_to_uris_and_first_artist() {
        let track: FullTrack = serde_json::from_value(full_track(
            json!("54X78diSLoUDI3joC2bjMz"),
            json!("5a2EaR3hamoenG9rDuVn8j"),
            json!("7nXJ5k4XgRj5OLg9m8V3zc"),
            false,
        ))
        .unwrap();

        let record = TrackRecord::from(track);
        assert_eq!(record.uri.as_deref(), Some("spotify:track:54X78diSLoUDI3joC2bjMz"));
        assert_eq!(record.duration_ms, Some(521_000));
        assert_eq!(record.artists.len(), 2);

        let track = Track::try_from(record).unwrap();
        assert_eq!(track.artist.uri, "spotify:artist:5a2EaR3hamoenG9rDuVn8j");
        assert_eq!(track.artist.name, "Prince");
        assert_eq!(track.album.uri, "spotify:album:7nXJ5k4XgRj5OLg9m8V3zc");
        assert_eq!(track.duration_secs(), 521);
    }

    #[test]
    fn local_file_has_no_uri_and_is_skipped() {
        let item = playlist_item(full_track(Value::Null, Value::Null, Value::Null, true));
        let record = TrackRecord::from(item);
        assert_eq!(record.uri, None);
        assert_eq!(record.name, "Purple Rain");
        assert!(Track::try_from(record).is_err());
    }

    #[test]
    fn episode_and_removed_items_are_skipped() {
        let episode = playlist_item(json!({
            "type": "episode",
            "id": "512ojhOuo1ktJprKbVcKyQ",
            "name": "Some show",
            "duration_ms": 1_800_000
        }));
        let removed = playlist_item(Value::Null);

        for item in [episode, removed] {
            let record = TrackRecord::from(item);
            assert_eq!(record.uri, None);
            assert_eq!(record.name, "<non-track item>");
            assert!(Track::try_from(record).is_err());
        }
    }
}
