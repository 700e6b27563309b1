//! Dispatches one catalog query and prints its answer.

use std::io::Write;

use clap::ValueEnum;
use log::{debug, info};
use serde::Serialize;
use serde_json::json;

use crate::clients::errors::{Error, Result};
use crate::duration::{format_seconds, format_verbose, parse_min_sec};
use crate::graph::PlaylistGraph;
use crate::prompt::ArtistSelector;
use crate::queries::{self, QueryKind, Song};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human readable lines
    #[default]
    Text,
    /// One JSON document
    Json,
}

/// A validated query invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub kind: QueryKind,
    /// Threshold in seconds, present only for `longer_than`
    pub min_seconds: Option<u64>,
    pub format: OutputFormat,
}

impl QueryRequest {
    /// Check the arguments before anything runs.
    ///
    /// `longer_than` needs a `M:SS` threshold. Other queries ignore it.
    pub fn new(kind: QueryKind, min_duration: Option<&str>, format: OutputFormat) -> Result<Self> {
        let min_seconds = match (kind, min_duration) {
            (QueryKind::LongerThan, Some(threshold)) => Some(parse_min_sec(threshold)?),
            (QueryKind::LongerThan, None) => {
                return Err(Error::UserInput(
                    "--min-duration is required for the 'longer_than' query".to_string(),
                ));
            }
            (_, Some(threshold)) => {
                debug!("Ignoring --min-duration {threshold:?} for {kind:?}");
                None
            }
            (_, None) => None,
        };
        Ok(Self {
            kind,
            min_seconds,
            format,
        })
    }
}

fn print_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn print_lines<W: Write, T>(out: &mut W, rows: &[T], line: impl Fn(&T) -> String) -> Result<()> {
    if rows.is_empty() {
        writeln!(out, "No results.")?;
    }
    for row in rows {
        writeln!(out, "{}", line(row))?;
    }
    Ok(())
}

fn song_line(song: &Song) -> String {
    format!("{}: {}", song.title, format_seconds(song.seconds))
}

fn print_songs<W: Write>(out: &mut W, songs: &[Song], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_lines(out, songs, song_line),
        OutputFormat::Json => print_json(out, &songs),
    }
}

fn print_single<W: Write>(
    out: &mut W,
    label: &str,
    song: Option<&Song>,
    format: OutputFormat,
) -> Result<()> {
    match (format, song) {
        (OutputFormat::Json, _) => print_json(out, &song),
        (OutputFormat::Text, Some(song)) => {
            writeln!(
                out,
                "{label} Song: {}, Duration: {}",
                song.title,
                format_seconds(song.seconds)
            )?;
            Ok(())
        }
        (OutputFormat::Text, None) => {
            writeln!(out, "No results.")?;
            Ok(())
        }
    }
}

/// Run the query named by `request` against `graph`, writing the answer to `out`.
///
/// `selector` is only consulted by `by_artist`, and only when the graph lists
/// at least one artist.
pub fn run_query<W: Write, S: ArtistSelector>(
    graph: &PlaylistGraph,
    request: &QueryRequest,
    out: &mut W,
    selector: &mut S,
) -> Result<()> {
    info!("Running query {:?}", request.kind);
    let format = request.format;

    match request.kind {
        QueryKind::Duration => {
            let total = queries::total_duration(graph)?;
            match format {
                OutputFormat::Text => {
                    writeln!(out, "Total Playlist Duration: {}", format_verbose(total))?;
                }
                OutputFormat::Json => print_json(
                    out,
                    &json!({ "total_seconds": total, "formatted": format_seconds(total) }),
                )?,
            }
        }
        QueryKind::TotalSongs => {
            let total = queries::total_songs(graph)?;
            match format {
                OutputFormat::Text => writeln!(out, "Total Number of Songs: {total}")?,
                OutputFormat::Json => print_json(out, &json!({ "total_songs": total }))?,
            }
        }
        QueryKind::Length => print_songs(out, &queries::songs_by_length(graph)?, format)?,
        QueryKind::Longest => {
            print_single(out, "Longest", queries::longest_song(graph)?.as_ref(), format)?;
        }
        QueryKind::Shortest => {
            print_single(out, "Shortest", queries::shortest_song(graph)?.as_ref(), format)?;
        }
        QueryKind::LongerThan => {
            let min_seconds = request.min_seconds.ok_or_else(|| {
                Error::UserInput("--min-duration is required for the 'longer_than' query".into())
            })?;
            print_songs(out, &queries::songs_longer_than(graph, min_seconds)?, format)?;
        }
        QueryKind::Album => {
            let rows = queries::songs_by_album(graph)?;
            match format {
                OutputFormat::Text => {
                    print_lines(out, &rows, |r| format!("{}: {}", r.album, r.title))?;
                }
                OutputFormat::Json => print_json(out, &rows)?,
            }
        }
        QueryKind::Artist => {
            let rows = queries::songs_by_artist(graph)?;
            match format {
                OutputFormat::Text => {
                    print_lines(out, &rows, |r| format!("{}: {}", r.artist, r.title))?;
                }
                OutputFormat::Json => print_json(out, &rows)?,
            }
        }
        QueryKind::ByAppearance => {
            let rows = queries::artists_by_appearance(graph)?;
            match format {
                OutputFormat::Text => {
                    print_lines(out, &rows, |r| format!("{}: {} songs", r.artist, r.songs))?;
                }
                OutputFormat::Json => print_json(out, &rows)?,
            }
        }
        QueryKind::ByArtist => songs_of_selected_artist(graph, out, selector, format)?,
    }
    Ok(())
}

fn songs_of_selected_artist<W: Write, S: ArtistSelector>(
    graph: &PlaylistGraph,
    out: &mut W,
    selector: &mut S,
    format: OutputFormat,
) -> Result<()> {
    let artists = queries::all_artists(graph)?;
    if artists.is_empty() {
        writeln!(out, "No artists found.")?;
        return Ok(());
    }

    let Some(artist) = selector.select(&artists)?.and_then(|i| artists.get(i)) else {
        writeln!(out, "No artist matches the answer given.")?;
        return Ok(());
    };
    let titles = queries::songs_for_artist(graph, artist)?;

    match format {
        OutputFormat::Text => {
            writeln!(out, "Songs by {artist}:")?;
            for title in &titles {
                writeln!(out, " - {title}")?;
            }
        }
        OutputFormat::Json => print_json(out, &json!({ "artist": artist, "songs": titles }))?,
    }
    Ok(())
}
