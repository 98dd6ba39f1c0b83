//! HTTP word finder client
//!
//! Queries a public anagram search API, sorted by points and grouped by
//! word length.

use super::{WordSource, WordSourceError};
use crate::core::{LetterSet, MIN_WORD_LENGTH};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use serde::de::Error as _;
use std::time::Duration;
use tracing::debug;

/// Default search endpoint
pub const DEFAULT_URL: &str = "https://fly.wordfinderapi.com/api/search";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
const PAGE_SIZE: &str = "200";
const DICTIONARY: &str = "all_en";

const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:134.0) Gecko/20100101 Firefox/134.0";

/// Blocking client for the word finder API
pub struct WordFinderApi {
    client: Client,
    url: String,
}

impl WordFinderApi {
    /// Create a client for the given search endpoint
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built (TLS backend
    /// initialisation failure).
    pub fn new(url: impl Into<String>) -> Result<Self, WordSourceError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(browser_headers())
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl WordSource for WordFinderApi {
    fn lookup(&self, letters: &LetterSet) -> Result<Vec<String>, WordSourceError> {
        let letters = letters.to_string();
        debug!(%letters, url = %self.url, "querying word finder");

        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("letters", letters.as_str()),
                ("word_sorting", "points"),
                ("group_by_length", "true"),
                ("page_size", PAGE_SIZE),
                ("dictionary", DICTIONARY),
            ])
            .send()?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(WordSourceError::Status(status.as_u16()));
        }

        parse_search_response(&response.text()?)
    }
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/json, text/plain, */*"),
    );
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US;q=0.5,en;q=0.3"),
    );
    headers.insert("Sec-GPC", HeaderValue::from_static("1"));
    headers.insert("Sec-Fetch-Dest", HeaderValue::from_static("empty"));
    headers.insert("Sec-Fetch-Mode", HeaderValue::from_static("cors"));
    headers.insert("Sec-Fetch-Site", HeaderValue::from_static("cross-site"));
    headers
}

#[derive(Deserialize)]
struct SearchResponse {
    word_pages: Option<Vec<WordPage>>,
}

#[derive(Deserialize)]
struct WordPage {
    length: PageLength,
    word_list: Vec<WordEntry>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PageLength {
    Number(u64),
    Text(String),
}

impl PageLength {
    fn value(&self) -> Result<usize, WordSourceError> {
        match self {
            Self::Number(n) => Ok(*n as usize),
            Self::Text(text) => text.trim().parse().map_err(|_| {
                WordSourceError::Malformed(serde_json::Error::custom(format!(
                    "page length `{text}` is not a number"
                )))
            }),
        }
    }
}

#[derive(Deserialize)]
struct WordEntry {
    word: String,
}

/// Flatten the grouped pages into one ranked list
///
/// Pages are visited in response order, words in page order. Pages for
/// lengths below [`MIN_WORD_LENGTH`] are skipped.
fn parse_search_response(body: &str) -> Result<Vec<String>, WordSourceError> {
    let response: SearchResponse = serde_json::from_str(body)?;
    let pages = response
        .word_pages
        .ok_or(WordSourceError::MissingField("word_pages"))?;

    let mut words = Vec::new();
    for page in pages {
        if page.length.value()? < MIN_WORD_LENGTH {
            continue;
        }
        words.extend(page.word_list.into_iter().map(|entry| entry.word));
    }
    Ok(words)
}
