//! The fixed catalog of playlist questions, each one a SPARQL query.
//!
//! Every function is read-only and returns typed rows; printing is left to
//! the runner. Durations are compared and summed as integers.

use clap::ValueEnum;
use oxigraph::model::{Literal, Term};
use oxigraph::sparql::QuerySolution;
use serde::Serialize;

use crate::clients::errors::{Error, Result};
use crate::graph::{PREFIXES, PlaylistGraph};

/// Names of the available queries, as accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum QueryKind {
    /// Total playlist duration
    Duration,
    /// Number of songs
    TotalSongs,
    /// Songs sorted by length, longest first
    Length,
    /// The longest song
    Longest,
    /// The shortest song
    Shortest,
    /// Songs longer than --min-duration
    LongerThan,
    /// Songs listed by album
    Album,
    /// Songs listed by artist
    Artist,
    /// Artists by number of songs
    ByAppearance,
    /// Songs of one artist picked interactively
    ByArtist,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Song {
    pub title: String,
    pub seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlbumSong {
    pub album: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistSong {
    pub artist: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistCount {
    pub artist: String,
    pub songs: u64,
}

// Durations that are not non-negative xsd:integer values are left out of every
// duration query
const VALID_DURATION: &str =
    "    FILTER (DATATYPE(?duration) = xsd:integer && ?duration >= 0)\n";

const SONGS_WITH_LENGTH: &str = "
SELECT ?songTitle ?duration
WHERE {
    ?track a schema:MusicRecording ;
        schema:name ?songTitle ;
        schema:duration ?duration .
";

fn string_of(solution: &QuerySolution, var: &str) -> Result<String> {
    match solution.get(var) {
        Some(Term::Literal(lit)) => Ok(lit.value().to_string()),
        Some(other) => Err(Error::UnexpectedResult(format!(
            "?{var} is not a literal: {other}"
        ))),
        None => Err(Error::UnexpectedResult(format!("?{var} is unbound"))),
    }
}

fn number_of(solution: &QuerySolution, var: &str) -> Result<u64> {
    let value = string_of(solution, var)?;
    value.parse().map_err(|_| {
        Error::UnexpectedResult(format!("?{var} is not a non-negative integer: {value}"))
    })
}

fn songs(graph: &PlaylistGraph, sparql: &str) -> Result<Vec<Song>> {
    graph
        .select(sparql)?
        .iter()
        .map(|row| {
            Ok(Song {
                title: string_of(row, "songTitle")?,
                seconds: number_of(row, "duration")?,
            })
        })
        .collect()
}

/// Sum of all track durations, in seconds
pub fn total_duration(graph: &PlaylistGraph) -> Result<u64> {
    let sparql = format!(
        "{PREFIXES}
SELECT (SUM(?duration) AS ?total)
WHERE {{
    ?track a schema:MusicRecording ;
        schema:duration ?duration .
{VALID_DURATION}}}"
    );
    match graph.select(&sparql)?.first() {
        // SUM over no rows still yields one solution with 0
        Some(row) if row.get("total").is_some() => number_of(row, "total"),
        _ => Ok(0),
    }
}

/// Number of `MusicRecording` subjects
pub fn total_songs(graph: &PlaylistGraph) -> Result<u64> {
    let sparql = format!(
        "{PREFIXES}
SELECT (COUNT(DISTINCT ?track) AS ?totalSongs)
WHERE {{
    ?track a schema:MusicRecording .
}}"
    );
    match graph.select(&sparql)?.first() {
        Some(row) => number_of(row, "totalSongs"),
        None => Ok(0),
    }
}

/// All songs, longest first; ties by title
pub fn songs_by_length(graph: &PlaylistGraph) -> Result<Vec<Song>> {
    songs(
        graph,
        &format!(
            "{PREFIXES}{SONGS_WITH_LENGTH}{VALID_DURATION}}}\nORDER BY DESC(?duration) ASC(?songTitle)"
        ),
    )
}

/// First entry of [`songs_by_length`]
pub fn longest_song(graph: &PlaylistGraph) -> Result<Option<Song>> {
    let found = songs(
        graph,
        &format!(
            "{PREFIXES}{SONGS_WITH_LENGTH}{VALID_DURATION}}}\nORDER BY DESC(?duration) ASC(?songTitle)\nLIMIT 1"
        ),
    )?;
    Ok(found.into_iter().next())
}

/// Last entry of [`songs_by_length`]
pub fn shortest_song(graph: &PlaylistGraph) -> Result<Option<Song>> {
    let found = songs(
        graph,
        &format!(
            "{PREFIXES}{SONGS_WITH_LENGTH}{VALID_DURATION}}}\nORDER BY ASC(?duration) DESC(?songTitle)\nLIMIT 1"
        ),
    )?;
    Ok(found.into_iter().next())
}

/// Songs strictly longer than `min_seconds`, in [`songs_by_length`] order
pub fn songs_longer_than(graph: &PlaylistGraph, min_seconds: u64) -> Result<Vec<Song>> {
    songs(
        graph,
        &format!(
            "{PREFIXES}{SONGS_WITH_LENGTH}{VALID_DURATION}    FILTER (?duration > {min_seconds})\n}}\nORDER BY DESC(?duration) ASC(?songTitle)"
        ),
    )
}

pub fn songs_by_album(graph: &PlaylistGraph) -> Result<Vec<AlbumSong>> {
    let sparql = format!(
        "{PREFIXES}
SELECT ?albumTitle ?songTitle
WHERE {{
    ?track a schema:MusicRecording ;
        schema:name ?songTitle ;
        schema:inAlbum ?album .
    ?album schema:name ?albumTitle .
}}
ORDER BY ?albumTitle ?songTitle"
    );
    graph
        .select(&sparql)?
        .iter()
        .map(|row| {
            Ok(AlbumSong {
                album: string_of(row, "albumTitle")?,
                title: string_of(row, "songTitle")?,
            })
        })
        .collect()
}

pub fn songs_by_artist(graph: &PlaylistGraph) -> Result<Vec<ArtistSong>> {
    let sparql = format!(
        "{PREFIXES}
SELECT ?artistName ?songTitle
WHERE {{
    ?track a schema:MusicRecording ;
        schema:name ?songTitle ;
        schema:byArtist ?artist .
    ?artist schema:name ?artistName .
}}
ORDER BY ?artistName ?songTitle"
    );
    graph
        .select(&sparql)?
        .iter()
        .map(|row| {
            Ok(ArtistSong {
                artist: string_of(row, "artistName")?,
                title: string_of(row, "songTitle")?,
            })
        })
        .collect()
}

/// Song count per artist, most frequent first.
///
/// Artists are grouped by identity, so two artists sharing a name are listed
/// separately.
pub fn artists_by_appearance(graph: &PlaylistGraph) -> Result<Vec<ArtistCount>> {
    let sparql = format!(
        "{PREFIXES}
SELECT ?artistName (COUNT(?track) AS ?numSongs)
WHERE {{
    ?track a schema:MusicRecording ;
        schema:byArtist ?artist .
    ?artist schema:name ?artistName .
}}
GROUP BY ?artist ?artistName
ORDER BY DESC(?numSongs) ASC(?artistName)"
    );
    graph
        .select(&sparql)?
        .iter()
        .map(|row| {
            Ok(ArtistCount {
                artist: string_of(row, "artistName")?,
                songs: number_of(row, "numSongs")?,
            })
        })
        .collect()
}

/// Distinct artist names, ascending
pub fn all_artists(graph: &PlaylistGraph) -> Result<Vec<String>> {
    let sparql = format!(
        "{PREFIXES}
SELECT DISTINCT ?artistName
WHERE {{
    ?track a schema:MusicRecording ;
        schema:byArtist ?artist .
    ?artist schema:name ?artistName .
}}
ORDER BY ASC(?artistName)"
    );
    graph
        .select(&sparql)?
        .iter()
        .map(|row| string_of(row, "artistName"))
        .collect()
}

/// Titles of every song credited to an artist named `artist`, ascending
pub fn songs_for_artist(graph: &PlaylistGraph, artist: &str) -> Result<Vec<String>> {
    // Literal's Display produces a correctly escaped SPARQL string
    let name = Literal::new_simple_literal(artist);
    let sparql = format!(
        "{PREFIXES}
SELECT ?songTitle
WHERE {{
    ?track a schema:MusicRecording ;
        schema:name ?songTitle ;
        schema:byArtist ?artist .
    ?artist schema:name {name} .
}}
ORDER BY ASC(?songTitle)"
    );
    graph
        .select(&sparql)?
        .iter()
        .map(|row| string_of(row, "songTitle"))
        .collect()
}
