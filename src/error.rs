use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GistError {
    #[error("set the GIST_TOKEN environment variable to your GitHub personal access token")]
    MissingToken,

    #[error("the sources you specified are invalid")]
    NoValidSources,

    #[error("the source you specified is empty")]
    EmptyStdin,

    #[error("the source file(s) you specified are empty")]
    AllSourcesEmpty,

    #[error("invalid source pattern {pattern}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read standard input: {0}")]
    Stdin(#[source] std::io::Error),

    #[error("error posting gist: {0}")]
    Publish(String),

    #[error("error shortening {0}")]
    Shorten(String),

    #[error("http request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to write output: {0}")]
    Output(#[source] std::io::Error),
}

impl GistError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            GistError::MissingToken => 3,
            GistError::NoValidSources
            | GistError::EmptyStdin
            | GistError::AllSourcesEmpty
            | GistError::Pattern { .. }
            | GistError::Read { .. }
            | GistError::Stdin(_) => 4,
            GistError::Publish(_) | GistError::Shorten(_) | GistError::Transport(_) => 5,
            GistError::Output(_) => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, GistError>;
