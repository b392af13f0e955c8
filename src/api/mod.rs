pub mod error;

use anyhow::{Context, Result};
use clap::ValueEnum;
use reqwest::blocking::Client;
use strum_macros::{Display, EnumIter};

use crate::internal::cache::DiskCache;
use crate::internal::models::{self, Item, StoryIds};
use error::{ApiError, DecodeError, FetchError};

pub const HN_API_BASE_URL: &str = "https://hacker-news.firebaseio.com/v0/";

/// Story rankings published by the API. None of them is ever cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter, ValueEnum)]
#[strum(serialize_all = "lowercase")]
pub enum StoryListType {
    #[default]
    Top,
    New,
    Best,
    Ask,
    Show,
    Job,
}

impl StoryListType {
    fn as_api_str(&self) -> &str {
        match self {
            Self::Top => "topstories",
            Self::New => "newstories",
            Self::Best => "beststories",
            Self::Ask => "askstories",
            Self::Show => "showstories",
            Self::Job => "jobstories",
        }
    }
}

/// Blocking client for the Hacker News API with an on-disk body cache.
///
/// Item bodies are cached forever: stories and comments are treated as
/// immutable once published, so a cached item is never refreshed. Story
/// rankings and `maxitem` always go to the network.
#[derive(Clone)]
pub struct ApiService {
    client: Client,
    base_url: String,
    cache: DiskCache,
}

impl ApiService {
    /// `base_url` is the versioned API root, e.g. `https://host/v0/`.
    pub fn new(base_url: impl Into<String>, cache: DiskCache) -> Result<Self> {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let client = Client::builder()
            .user_agent(concat!("ycnews/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url,
            cache,
        })
    }

    pub fn item_url(&self, id: u64) -> String {
        format!("{}item/{}.json", self.base_url, id)
    }

    pub fn story_list_url(&self, list_type: StoryListType) -> String {
        format!("{}{}.json", self.base_url, list_type.as_api_str())
    }

    pub fn max_item_url(&self) -> String {
        format!("{}maxitem.json", self.base_url)
    }

    /// GET `locator`, answering from the disk cache when `use_cache` is set
    /// and an entry exists. Fresh bodies are stored only when `use_cache` is set.
    pub fn fetch(&self, locator: &str, use_cache: bool) -> Result<Vec<u8>, FetchError> {
        if use_cache && let Some(bytes) = self.cache.get(locator) {
            return Ok(bytes);
        }

        let bytes = self.download(locator)?;
        if use_cache {
            self.cache.set(locator, &bytes);
        }
        Ok(bytes)
    }

    /// Fetch a single item by id.
    ///
    /// A cached body that no longer decodes is dropped and fetched again from
    /// the network; only bodies that decode are written back.
    pub fn fetch_item(&self, id: u64) -> Result<Item, ApiError> {
        let url = self.item_url(id);

        if let Some(bytes) = self.cache.get(&url) {
            match models::decode_item(&url, &bytes) {
                Ok(item) => return Ok(item),
                Err(e) => {
                    tracing::warn!(id, error = %e, "discarding undecodable cache entry");
                    self.cache.invalidate(&url);
                }
            }
        }

        let bytes = self.download(&url)?;
        let item = models::decode_item(&url, &bytes)?;
        self.cache.set(&url, &bytes);
        Ok(item)
    }

    /// Fetch the current ranking for `list_type`.
    pub fn fetch_story_ids(&self, list_type: StoryListType) -> Result<StoryIds, ApiError> {
        let url = self.story_list_url(list_type);
        let bytes = self.fetch(&url, false)?;
        Ok(models::decode_story_ids(&url, &bytes)?)
    }

    /// Id of the most recently created item.
    pub fn fetch_max_item(&self) -> Result<u64, ApiError> {
        let url = self.max_item_url();
        let bytes = self.fetch(&url, false)?;
        serde_json::from_slice(&bytes).map_err(|source| {
            ApiError::Decode(DecodeError::Malformed {
                locator: url.clone(),
                source,
            })
        })
    }

    fn download(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        tracing::debug!(url, "GET");
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let bytes = resp.bytes().map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })?;
        Ok(bytes.to_vec())
    }
}
