//! RDF graph of playlist tracks, backed by an in-memory oxigraph store.
//!
//! Each track becomes a `schema:MusicRecording` linked to one artist and one
//! album. Track length is stored as an `xsd:integer` count of whole seconds so
//! SPARQL can order, filter and sum it numerically.

use std::io::BufReader;
use std::path::{Path, PathBuf};

use log::{debug, info};
use oxigraph::io::{RdfFormat, RdfSerializer};
use oxigraph::model::vocab::{rdf, xsd};
use oxigraph::model::{GraphName, GraphNameRef, Literal, NamedNode, Quad, Term};
use oxigraph::sparql::{QueryResults, QuerySolution};
use oxigraph::store::Store;

use crate::clients::entities::Track;
use crate::clients::errors::{Error, Result};

/// Namespace exposing the track vocabulary
pub const SCHEMA: &str = "http://schema.org/";
/// Source namespace, bound in the output only
pub const SPOTIFY: &str = "http://www.spotify.com/ontologies/";

/// SPARQL prologue shared by every catalog query
pub const PREFIXES: &str = "PREFIX schema: <http://schema.org/>\nPREFIX xsd: <http://www.w3.org/2001/XMLSchema#>\n";

// schema.org terms emitted per track
struct Vocab {
    music_recording: NamedNode,
    name: NamedNode,
    duration: NamedNode,
    by_artist: NamedNode,
    in_album: NamedNode,
}

impl Vocab {
    fn new() -> Result<Self> {
        let term = |local: &str| NamedNode::new(format!("{SCHEMA}{local}"));
        Ok(Self {
            music_recording: term("MusicRecording")?,
            name: term("name")?,
            duration: term("duration")?,
            by_artist: term("byArtist")?,
            in_album: term("inAlbum")?,
        })
    }
}

/// A playlist graph; the value every query runs against
pub struct PlaylistGraph {
    store: Store,
    vocab: Vocab,
}

impl PlaylistGraph {
    pub fn new() -> Result<Self> {
        Ok(Self {
            store: Store::new()?,
            vocab: Vocab::new()?,
        })
    }

    pub fn from_tracks(tracks: &[Track]) -> Result<Self> {
        let graph = Self::new()?;
        for track in tracks {
            graph.insert_track(track)?;
        }
        Ok(graph)
    }

    /// Emit the seven triples describing `track`, its artist and its album.
    pub fn insert_track(&self, track: &Track) -> Result<()> {
        let v = &self.vocab;
        let track_node = NamedNode::new(track.uri.as_str())?;
        let artist_node = NamedNode::new(track.artist.uri.as_str())?;
        let album_node = NamedNode::new(track.album.uri.as_str())?;
        let seconds = Literal::new_typed_literal(track.duration_secs().to_string(), xsd::INTEGER);

        let triples: [(&NamedNode, NamedNode, Term); 7] = [
            (&track_node, rdf::TYPE.into_owned(), v.music_recording.clone().into()),
            (&track_node, v.name.clone(), Literal::new_simple_literal(&track.name).into()),
            (&track_node, v.duration.clone(), seconds.into()),
            (&track_node, v.by_artist.clone(), artist_node.clone().into()),
            (&artist_node, v.name.clone(), Literal::new_simple_literal(&track.artist.name).into()),
            (&track_node, v.in_album.clone(), album_node.clone().into()),
            (&album_node, v.name.clone(), Literal::new_simple_literal(&track.album.name).into()),
        ];

        for (subject, predicate, object) in triples {
            self.store.insert(&Quad::new(
                subject.clone(),
                predicate,
                object,
                GraphName::DefaultGraph,
            ))?;
        }
        Ok(())
    }

    /// Number of triples in the graph
    pub fn len(&self) -> Result<usize> {
        Ok(self.store.len()?)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.store.is_empty()?)
    }

    /// Serialize the graph as Turtle with the `schema` and `spotify` prefixes bound.
    pub fn to_turtle(&self) -> Result<Vec<u8>> {
        let serializer = RdfSerializer::from_format(RdfFormat::Turtle)
            .with_prefix("spotify", SPOTIFY)?
            .with_prefix("schema", SCHEMA)?;
        Ok(self
            .store
            .dump_graph_to_writer(GraphNameRef::DefaultGraph, serializer, Vec::new())?)
    }

    /// Write the graph to `path`, replacing any previous file.
    ///
    /// The data goes to a sibling temporary file first and is renamed into
    /// place, so an interrupted run leaves the old file (or nothing) behind.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let data = self.to_turtle()?;
        let tmp = temp_path(path);
        tokio::fs::write(&tmp, &data).await?;
        if let Err(e) = tokio::fs::rename(&tmp, path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        info!("Wrote {} bytes of Turtle to {path:?}", data.len());
        Ok(())
    }

    /// Parse a Turtle file into a fresh graph.
    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|e| {
            Error::IoError(std::io::Error::new(
                e.kind(),
                format!("cannot open graph file {}: {e}", path.display()),
            ))
        })?;
        let graph = Self::new()?;
        graph
            .store
            .load_from_reader(RdfFormat::Turtle, BufReader::new(file))?;
        debug!("Loaded {} triples from {path:?}", graph.len()?);
        Ok(graph)
    }

    /// Parse Turtle held in memory into a fresh graph.
    pub fn from_turtle(data: &[u8]) -> Result<Self> {
        let graph = Self::new()?;
        graph.store.load_from_reader(RdfFormat::Turtle, data)?;
        Ok(graph)
    }

    /// Run a SPARQL SELECT and collect its solutions.
    pub fn select(&self, sparql: &str) -> Result<Vec<QuerySolution>> {
        debug!("Running SPARQL query:\n{sparql}");
        match self.store.query(sparql)? {
            QueryResults::Solutions(solutions) => Ok(solutions.collect::<Result<Vec<_>, _>>()?),
            _ => Err(Error::UnexpectedResult(
                "expected SELECT solutions".to_string(),
            )),
        }
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
