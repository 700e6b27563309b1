//! Interactive artist selection for the `by_artist` query.

use std::io::{BufRead, Write};

use crate::clients::errors::Result;

/// Picks one artist out of a listing
pub trait ArtistSelector {
    /// Return the index into `artists` the user chose, or `None` if the answer
    /// matched nothing. Never called with an empty listing.
    fn select(&mut self, artists: &[String]) -> Result<Option<usize>>;
}

/// Map an answer to an index.
///
/// An exact name wins, then a 1-based position in the listing, then a name
/// compared case-insensitively.
pub fn resolve_selection(artists: &[String], input: &str) -> Option<usize> {
    let answer = input.trim();
    if answer.is_empty() {
        return None;
    }
    if let Some(exact) = artists.iter().position(|a| a == answer) {
        return Some(exact);
    }
    if let Ok(position) = answer.parse::<usize>()
        && (1..=artists.len()).contains(&position)
    {
        return Some(position - 1);
    }
    artists.iter().position(|a| a.eq_ignore_ascii_case(answer))
}

/// Prints the numbered listing to `output` and reads one line from `input`
pub struct LineSelector<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineSelector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> ArtistSelector for LineSelector<R, W> {
    fn select(&mut self, artists: &[String]) -> Result<Option<usize>> {
        writeln!(self.output, "Artists:")?;
        for (i, artist) in artists.iter().enumerate() {
            writeln!(self.output, "{}. {artist}", i + 1)?;
        }
        write!(
            self.output,
            "Enter the artist's name or number from the list above: "
        )?;
        self.output.flush()?;

        let mut answer = String::new();
        self.input.read_line(&mut answer)?;
        Ok(resolve_selection(artists, &answer))
    }
}

/// Selector bound to the process terminal
pub fn stdin_selector() -> LineSelector<std::io::StdinLock<'static>, std::io::Stdout> {
    LineSelector::new(std::io::stdin().lock(), std::io::stdout())
}
