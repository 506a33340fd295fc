//! # IMDB Integration Module
//!
//! Resolves and downloads posters from IMDB for a single title identifier.
//! The module is the only place that knows about IMDB page layout; the rest
//! of the crate only sees the [`PosterProvider`] trait and its `PosterSet`.
//!
//! ## Retrieval Flow
//!
//! ```text
//! GET <base>/tt0111161/                 title page
//!     ├── <title>                       -> movie title
//!     └── mediaviewer/rm...             -> media viewer link
//! GET <base>/tt0111161/mediaviewer/...  media viewer page
//!     └── <img src=...>                 -> poster candidates
//! GET <candidate src>                   image bytes
//! ```
//!
//! Every request is made once. A non-success status, a transport error or a
//! page without the expected markers fails the identifier; the caller
//! decides whether that aborts anything (the pipeline never does).
//!
//! ## Configuration
//!
//! The base URL, `User-Agent` and request timeout come from
//! [`crate::config::Settings`]. IMDB rejects requests without a browser-like
//! user agent, so the default mimics one.
//!
//! Downloaded images are shrunk to the configured thumbnail box (145x400 by
//! default) before they are handed out; see [`thumbnail::shrink_to_fit`].
//! Bytes that do not decode as an image fail the identifier with
//! [`FetchError::Malformed`]. With thumbnailing turned off the bytes are
//! passed through exactly as served.

pub mod scrape;
pub mod thumbnail;

use std::{fmt, future::Future};

use reqwest::{Client, Response, StatusCode, Url, header::CONTENT_TYPE};

use crate::{
    config::Settings,
    types::{Identifier, Poster, PosterSet},
};

/// Source of poster images, keyed by identifier.
///
/// Implemented by [`ImdbProvider`] for real runs and by stubs in tests.
pub trait PosterProvider {
    fn fetch(&self, identifier: &Identifier) -> impl Future<Output = Result<PosterSet, FetchError>>;
}

#[derive(Debug)]
pub enum FetchError {
    /// The server answered 404 for this URL.
    NotFound(String),
    Http(reqwest::Error),
    /// A page was fetched but did not contain what we scrape for.
    Malformed(String),
    NoPoster,
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(url) => write!(f, "not found: {url}"),
            Self::Http(err) => write!(f, "request failed: {err}"),
            Self::Malformed(msg) => write!(f, "unexpected page content: {msg}"),
            Self::NoPoster => write!(f, "no poster image found"),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(err) => Some(err),
            Self::NotFound(_) | Self::Malformed(_) | Self::NoPoster => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Http(err)
    }
}

/// Title page details needed to find the posters.
#[derive(Debug, Clone)]
pub struct MovieMetadata {
    pub identifier: Identifier,
    pub url: String,
    pub media_url: String,
    pub title: Option<String>,
}

pub struct ImdbProvider {
    client: Client,
    base_url: String,
    candidates: u32,
    thumbnail: Option<(u32, u32)>,
}

impl ImdbProvider {
    pub fn new(settings: &Settings) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(settings.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.clone(),
            candidates: settings.candidates.max(1),
            thumbnail: settings.thumbnail,
        })
    }

    pub fn title_url(&self, identifier: &Identifier) -> String {
        format!("{base}{identifier}/", base = self.base_url)
    }

    /// Loads the title page and locates the media viewer page.
    pub async fn resolve(&self, identifier: &Identifier) -> Result<MovieMetadata, FetchError> {
        let url = self.title_url(identifier);
        let html = self.get(&url).await?.text().await?;

        let media_path = scrape::extract_media_path(&html)
            .ok_or_else(|| FetchError::Malformed(format!("no media viewer link on {url}")))?;

        Ok(MovieMetadata {
            identifier: identifier.clone(),
            media_url: format!("{url}{media_path}"),
            title: scrape::extract_title(&html),
            url,
        })
    }

    /// Lists poster image URLs on the media viewer page, absolute and in page order.
    pub async fn candidate_urls(&self, metadata: &MovieMetadata) -> Result<Vec<String>, FetchError> {
        let html = self.get(&metadata.media_url).await?.text().await?;
        let page = Url::parse(&metadata.media_url)
            .map_err(|e| FetchError::Malformed(format!("{}: {e}", metadata.media_url)))?;

        let urls = scrape::extract_image_sources(&html)
            .into_iter()
            .filter_map(|src| page.join(&src).ok())
            .map(|u| u.to_string())
            .collect();
        Ok(urls)
    }

    async fn download(&self, url: &str) -> Result<Poster, FetchError> {
        let response = self.get(url).await?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?;

        if bytes.is_empty() {
            return Err(FetchError::Malformed(format!("empty image at {url}")));
        }

        let extension = scrape::extension_from_url(url)
            .or_else(|| content_type.as_deref().and_then(scrape::extension_from_content_type))
            .unwrap_or_else(|| "jpg".to_string());

        let bytes = match self.thumbnail {
            Some((width, height)) => thumbnail::shrink_to_fit(&bytes, &extension, width, height)?,
            None => bytes.to_vec(),
        };

        Ok(Poster {
            bytes,
            extension,
            source_url: url.to_string(),
        })
    }

    async fn get(&self, url: &str) -> Result<Response, FetchError> {
        let response = self.client.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(url.to_string()));
        }
        Ok(response.error_for_status()?)
    }
}

impl PosterProvider for ImdbProvider {
    async fn fetch(&self, identifier: &Identifier) -> Result<PosterSet, FetchError> {
        let metadata = self.resolve(identifier).await?;
        let urls = self.candidate_urls(&metadata).await?;
        if urls.is_empty() {
            return Err(FetchError::NoPoster);
        }

        let mut posters = Vec::new();
        for url in urls.iter().take(self.candidates as usize) {
            posters.push(self.download(url).await?);
        }

        Ok(PosterSet {
            title: metadata.title,
            posters,
        })
    }
}
