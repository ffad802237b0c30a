//! Publish files or standard input as a GitHub gist.
//!
//! The run is a straight line: collect sources, create the gist, optionally
//! shorten its URL, print the result. Any failure ends the run.

pub mod args;
pub mod credentials;
pub mod error;
pub mod gist;
pub mod output;
pub mod shorten;
pub mod sources;

#[cfg(test)]
mod test_server;

use std::io::{self, Read, Write};
use std::time::Duration;

use log::warn;
use reqwest::blocking::Client;
use reqwest::redirect::Policy;

pub use args::{Args, Endpoints, RequestConfig};
pub use credentials::AccessToken;
pub use error::{GistError, Result};
pub use gist::{GistApi, GistPayload, GitHubGists, PublishResult};
pub use shorten::{GitIo, UrlShortener};
pub use sources::FileMap;

const USER_AGENT: &str = concat!("quickgist/", env!("CARGO_PKG_VERSION"));

/// Shared blocking client for both outbound calls. Redirects are not followed
/// because the shortener answers with a `Location` header we need to read.
pub fn http_client(timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .redirect(Policy::none())
        .build()?;
    Ok(client)
}

/// Runs the pipeline against the real endpoints, reading the token from the
/// environment and writing the URL to standard output.
pub fn publish(args: &Args) -> Result<()> {
    let token = AccessToken::from_env()?;
    let endpoints = args.endpoints();
    let client = http_client(endpoints.timeout)?;
    let gists = GitHubGists::new(client.clone(), endpoints.api_url, token);
    let shortener = GitIo::new(client, endpoints.shortener_url);

    let stdin = io::stdin();
    let stdout = io::stdout();
    run(&args.request(), stdin.lock(), &mut stdout.lock(), &gists, &shortener)?;
    Ok(())
}

/// Collects, publishes, shortens and prints. Returns the printed URL.
pub fn run<R: Read, W: Write>(
    config: &RequestConfig,
    stdin: R,
    out: &mut W,
    gists: &dyn GistApi,
    shortener: &dyn UrlShortener,
) -> Result<String> {
    let files = sources::collect_sources(&config.source_patterns, &config.override_filename, stdin)?;
    let payload = GistPayload::new(&config.description, !config.is_private, files);
    let published = gists.create(&payload)?;

    let url = shorten::finalize_url(shortener, &published.canonical_url, config.use_long_url)
        .map_err(|err| {
            // The gist is not rolled back; point the user at it.
            warn!("gist was created at {}", published.canonical_url);
            err
        })?;

    output::handle_output(out, &url, config.suppress_newline, config.copy_to_clipboard)?;
    Ok(url)
}
