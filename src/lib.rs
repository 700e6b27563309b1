//! Playlist RDF - Turn a Spotify playlist into an RDF graph and query it
//!
//! The extractor fetches one playlist and writes its tracks as a Turtle file.
//! The query runner loads that file and answers a fixed set of questions
//! about it with SPARQL.

/// Client modules for interacting with external services
pub mod clients;
/// Environment configuration for the extractor
pub mod config;
pub mod duration;
/// Playlist fetching and graph writing
pub mod extractor;
pub mod graph;
/// Interactive artist selection
pub mod prompt;
pub mod queries;
/// Query dispatch and output
pub mod runner;
