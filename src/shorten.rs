use log::{debug, info};
use reqwest::blocking::Client;
use reqwest::header::LOCATION;
use reqwest::StatusCode;

use crate::error::{GistError, Result};

pub trait UrlShortener {
    fn shorten(&self, url: &str) -> Result<String>;
}

/// A git.io style shortener: form-post the URL, read `Location` off a 201.
pub struct GitIo {
    client: Client,
    endpoint: String,
}

impl GitIo {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

impl UrlShortener for GitIo {
    fn shorten(&self, url: &str) -> Result<String> {
        debug!("shortening {url} via {}", self.endpoint);
        let response = self.client.post(&self.endpoint).form(&[("url", url)]).send()?;

        if response.status() != StatusCode::CREATED {
            debug!("shortener answered {}", response.status());
            return Err(GistError::Shorten(url.to_string()));
        }

        let short = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| GistError::Shorten(url.to_string()))?;
        info!("shortened to {short}");
        Ok(short)
    }
}

/// Returns `url` untouched when `use_long_url` is set, otherwise the short form.
pub fn finalize_url(shortener: &dyn UrlShortener, url: &str, use_long_url: bool) -> Result<String> {
    if use_long_url {
        return Ok(url.to_string());
    }
    shortener.shorten(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::{response, serve};
    use std::cell::RefCell;
    use std::time::Duration;

    fn client() -> Client {
        crate::http_client(Duration::from_secs(5)).unwrap()
    }

    struct Recording {
        calls: RefCell<Vec<String>>,
    }

    impl UrlShortener for Recording {
        fn shorten(&self, url: &str) -> Result<String> {
            self.calls.borrow_mut().push(url.to_string());
            Ok("https://git.example/xyz".to_string())
        }
    }

    #[test]
    fn long_url_skips_the_shortener() {
        let shortener = Recording { calls: RefCell::new(Vec::new()) };

        let url = finalize_url(&shortener, "https://gist.example/abc", true).unwrap();

        assert_eq!(url, "https://gist.example/abc");
        assert!(shortener.calls.borrow().is_empty());
    }

    #[test]
    fn default_goes_through_the_shortener() {
        let shortener = Recording { calls: RefCell::new(Vec::new()) };

        let url = finalize_url(&shortener, "https://gist.example/abc", false).unwrap();

        assert_eq!(url, "https://git.example/xyz");
        assert_eq!(*shortener.calls.borrow(), vec!["https://gist.example/abc".to_string()]);
    }

    #[test]
    fn git_io_form_posts_the_url_and_reads_location() {
        let server = serve(
            "/",
            response("201 Created", &[("Location", "https://git.ex/xyz")], ""),
        );
        let shortener = GitIo::new(client(), server.url.clone());

        let short = shortener.shorten("https://gist.ex/abc").unwrap();
        let request = server.request();

        assert_eq!(short, "https://git.ex/xyz");
        assert!(request.head.starts_with("post / "), "{}", request.head);
        assert!(request.head.contains("content-type: application/x-www-form-urlencoded"));
        assert_eq!(request.body, "url=https%3A%2F%2Fgist.ex%2Fabc");
    }

    #[test]
    fn created_without_location_is_an_error() {
        let server = serve("/", response("201 Created", &[], ""));
        let shortener = GitIo::new(client(), server.url.clone());

        let err = shortener.shorten("https://gist.ex/abc").unwrap_err();
        server.request();

        assert_eq!(err.to_string(), "error shortening https://gist.ex/abc");
    }

    #[test]
    fn redirects_are_reported_not_followed() {
        // Following this would hit a dead port and surface as a transport error.
        let server = serve(
            "/",
            response("302 Found", &[("Location", "http://127.0.0.1:1/")], ""),
        );
        let shortener = GitIo::new(client(), server.url.clone());

        let err = shortener.shorten("https://gist.ex/abc").unwrap_err();
        server.request();

        assert!(matches!(err, GistError::Shorten(_)));
    }
}
