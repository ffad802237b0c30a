use log::{debug, info};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::credentials::AccessToken;
use crate::error::{GistError, Result};
use crate::sources::FileMap;

/// Request body for `POST /gists`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GistPayload {
    pub description: String,
    pub public: bool,
    #[serde(serialize_with = "serialize_files")]
    pub files: FileMap,
}

impl GistPayload {
    pub fn new(description: &str, public: bool, files: FileMap) -> Self {
        Self {
            description: description.to_string(),
            public,
            files,
        }
    }
}

#[derive(Serialize)]
struct FileContent<'a> {
    content: &'a str,
}

// Written entry by entry so the wire order follows the file map.
fn serialize_files<S: Serializer>(files: &FileMap, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(files.len()))?;
    for (name, content) in files.iter() {
        map.serialize_entry(name, &FileContent { content })?;
    }
    map.end()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishResult {
    pub canonical_url: String,
}

#[derive(Deserialize)]
struct CreatedGist {
    html_url: String,
}

/// Something that can create a gist and report where it lives.
pub trait GistApi {
    fn create(&self, payload: &GistPayload) -> Result<PublishResult>;
}

/// The GitHub REST gist endpoint.
pub struct GitHubGists {
    client: Client,
    url: String,
    token: AccessToken,
}

impl GitHubGists {
    pub fn new(client: Client, url: impl Into<String>, token: AccessToken) -> Self {
        Self {
            client,
            url: url.into(),
            token,
        }
    }
}

impl GistApi for GitHubGists {
    fn create(&self, payload: &GistPayload) -> Result<PublishResult> {
        debug!(
            "posting {} file(s) to {} (public: {})",
            payload.files.len(),
            self.url,
            payload.public
        );
        let response = self
            .client
            .post(&self.url)
            .header(AUTHORIZATION, self.token.header_value())
            .header(ACCEPT, "application/vnd.github+json")
            .json(payload)
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if status != StatusCode::CREATED {
            debug!("gist endpoint answered {status}");
            return Err(GistError::Publish(body));
        }

        let result = parse_created(&body)?;
        info!("created gist {}", result.canonical_url);
        Ok(result)
    }
}

/// Pulls the canonical URL out of a `201 Created` body.
pub fn parse_created(body: &str) -> Result<PublishResult> {
    let created: CreatedGist = serde_json::from_str(body)
        .map_err(|err| GistError::Publish(format!("unexpected response ({err}): {body}")))?;
    Ok(PublishResult {
        canonical_url: created.html_url,
    })
}
