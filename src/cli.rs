use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::info;
use playlist_rdf::clients::SpotifyClient;
use playlist_rdf::clients::errors::Result;
use playlist_rdf::config::{DEFAULT_GRAPH_FILE, SettingsBuilder};
use playlist_rdf::extractor::{Extractor, write_track_listing};
use playlist_rdf::graph::PlaylistGraph;
use playlist_rdf::prompt::stdin_selector;
use playlist_rdf::queries::QueryKind;
use playlist_rdf::runner::{OutputFormat, QueryRequest, run_query};

#[derive(Parser)]
#[command(name = "playlist-rdf")]
#[command(version, about = "Turn a Spotify playlist into an RDF graph and query it with SPARQL", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a playlist from Spotify and write it as a Turtle graph
    Extract {
        /// Playlist id or URI, overrides SPOTIFY_PLAYLIST_ID
        #[arg(long)]
        playlist_id: Option<String>,
        /// Where to write the graph
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Answer one question about a previously extracted graph
    Query {
        /// Which question to answer
        #[arg(short, long, value_enum)]
        query: QueryKind,
        /// Threshold for longer_than, as minutes:seconds
        #[arg(long, alias = "min_duration", value_name = "M:SS")]
        min_duration: Option<String>,
        /// Graph file written by `extract`
        #[arg(short, long, default_value = DEFAULT_GRAPH_FILE)]
        graph: PathBuf,
        /// Print plain text lines or one JSON document
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            playlist_id,
            output,
        } => extract_playlist(playlist_id, output).await,
        Commands::Query {
            query,
            min_duration,
            graph,
            format,
        } => {
            // Arguments are checked before the graph is touched
            let request = QueryRequest::new(query, min_duration.as_deref(), format)?;
            let graph = PlaylistGraph::load(&graph)?;
            let mut out = std::io::stdout().lock();
            run_query(&graph, &request, &mut out, &mut stdin_selector())
        }
    }
}

async fn extract_playlist(playlist_id: Option<String>, output: Option<PathBuf>) -> Result<()> {
    info!("Building config ...");
    // Configuration errors surface here, before any network call
    let settings = SettingsBuilder::new()
        .playlist_id(playlist_id)
        .output(output)
        .build()?;

    info!("Authorizing Spotify client ...");
    let spotify = SpotifyClient::from_settings(&settings);
    // CLI prompt may be shown on this call
    spotify.authorize_client().await?;

    let report = Extractor::new(spotify)
        .extract(&settings.playlist_id, settings.output.clone())
        .await?;

    let mut out = std::io::stdout().lock();
    writeln!(out, "Playlist Name: {}", report.playlist_name)?;
    writeln!(out, "Total Tracks: {}", report.items)?;
    write_track_listing(&mut out, &report.tracks)?;
    if report.skipped > 0 {
        writeln!(out, "Skipped {} items without complete track data", report.skipped)?;
    }
    writeln!(out, "RDF data generated and saved to {}", report.output.display())?;
    Ok(())
}
