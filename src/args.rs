use std::ffi::OsString;
use std::time::Duration;

use clap::{ArgAction, Parser};

pub const DEFAULT_API_URL: &str = "https://api.github.com/gists";
pub const DEFAULT_SHORTENER_URL: &str = "https://git.io";

const EPILOG: &str = "\
Examples:
    $ quickgist file.txt
    $ quickgist -d \"some files\" file.txt src/*.py
    $ cat foo | quickgist -f foo.txt
    $ quickgist -l -nl notes.md | pbcopy

Notes:
    Please define an environment variable GIST_TOKEN with your
    GitHub personal access token (a .env file in the current
    directory is also read).

    $ export GIST_TOKEN=\"YOUR_TOKEN_HERE\"";

/// Quick gist posting tool.
#[derive(Parser, Debug)]
#[command(
    name = "quickgist",
    author,
    version,
    about,
    long_about = None,
    disable_version_flag = true,
    after_help = EPILOG
)]
pub struct Args {
    /// Gist content sources, ex: test.txt, test1.txt test2.txt, 'test/*.txt'.
    pub sources: Vec<String>,

    /// Gist filename, used for stdin or to override a single input filename.
    #[arg(short = 'f', long = "filename", value_name = "NAME", default_value = "")]
    pub filename: String,

    /// Gist description.
    #[arg(short = 'd', long = "description", value_name = "TEXT", default_value = "")]
    pub description: String,

    /// Create a private (secret) gist.
    #[arg(short = 'p', long = "private")]
    pub private: bool,

    /// Print the long gist URL instead of shortening it.
    #[arg(short = 'l', long = "long-url")]
    pub long_url: bool,

    /// Do not print a trailing newline after the URL (also accepted as -nl).
    #[arg(long = "nl")]
    pub no_newline: bool,

    /// Also copy the URL to the clipboard.
    #[arg(short = 'c', long = "copy")]
    pub copy: bool,

    /// HTTP timeout in seconds for each request.
    #[arg(long, value_name = "SECS", env = "QUICKGIST_TIMEOUT", default_value_t = 30)]
    pub timeout: u64,

    #[arg(long, hide = true, env = "QUICKGIST_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    #[arg(long, hide = true, env = "QUICKGIST_SHORTENER_URL", default_value = DEFAULT_SHORTENER_URL)]
    pub shortener_url: String,

    /// Print version.
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    pub version: Option<bool>,
}

/// Everything the pipeline needs to know about one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestConfig {
    pub source_patterns: Vec<String>,
    pub override_filename: String,
    pub description: String,
    pub is_private: bool,
    pub use_long_url: bool,
    pub suppress_newline: bool,
    pub copy_to_clipboard: bool,
}

/// Where the two outbound requests go and how long they may take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub api_url: String,
    pub shortener_url: String,
    pub timeout: Duration,
}

impl Args {
    /// Parses the process arguments, accepting the single-dash `-nl` spelling.
    pub fn parse_normalized() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }

    pub fn request(&self) -> RequestConfig {
        RequestConfig {
            source_patterns: self.sources.clone(),
            override_filename: self.filename.clone(),
            description: self.description.clone(),
            is_private: self.private,
            use_long_url: self.long_url,
            suppress_newline: self.no_newline,
            copy_to_clipboard: self.copy,
        }
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints {
            api_url: self.api_url.clone(),
            shortener_url: self.shortener_url.clone(),
            timeout: Duration::from_secs(self.timeout),
        }
    }
}

/// Rewrites `-nl` to `--nl` so clap does not read it as `-n -l`.
/// Arguments after `--` are left alone.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut positional_only = false;
    args.into_iter()
        .map(|arg| {
            let arg = arg.into();
            if positional_only {
                return arg;
            }
            if arg == "--" {
                positional_only = true;
                arg
            } else if arg == "-nl" {
                OsString::from("--nl")
            } else {
                arg
            }
        })
        .collect()
}
