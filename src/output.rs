use std::io::{self, Write};

use anyhow::{Context, Result};
use arboard::Clipboard;
use log::warn;

use crate::error::GistError;

pub fn write_url<W: Write>(out: &mut W, url: &str, suppress_newline: bool) -> io::Result<()> {
    if suppress_newline {
        write!(out, "{url}")?;
    } else {
        writeln!(out, "{url}")?;
    }
    out.flush()
}

/// Prints the URL and, if asked, mirrors it to the clipboard. Only the write
/// to `out` can fail the run.
pub fn handle_output<W: Write>(
    out: &mut W,
    url: &str,
    suppress_newline: bool,
    to_clipboard: bool,
) -> Result<(), GistError> {
    write_url(out, url, suppress_newline).map_err(GistError::Output)?;
    if to_clipboard {
        if let Err(err) = copy_to_clipboard(url) {
            warn!("{err:#}");
        }
    }
    Ok(())
}

fn copy_to_clipboard(url: &str) -> Result<()> {
    let mut clipboard = Clipboard::new().context("Failed to open the clipboard")?;
    clipboard
        .set_text(url.to_string())
        .context("Failed to copy the URL to the clipboard")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_ends_with_exactly_one_newline() {
        let mut out = Vec::new();
        handle_output(&mut out, "https://git.example/xyz", false, false).unwrap();
        assert_eq!(out, b"https://git.example/xyz\n");
    }

    #[test]
    fn suppressed_newline_leaves_bare_url() {
        let mut out = Vec::new();
        handle_output(&mut out, "https://git.example/xyz", true, false).unwrap();
        assert_eq!(out, b"https://git.example/xyz");
    }
}
