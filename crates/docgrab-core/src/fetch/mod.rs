//! HTTP GETs over libcurl.
//!
//! Two shapes: a page fetched into memory for parsing, and a file streamed
//! into a part file and moved to its final name. Both follow redirects and
//! go through the retry policy. Blocking; call from `spawn_blocking` when
//! used from async code.

mod parse;

pub use parse::ResponseHead;

use crate::config::DocgrabConfig;
use crate::retry::{run_with_retry, FetchError, RetryPolicy};
use crate::storage::PartFile;
use crate::url_model::derive_filename;
use std::path::{Path, PathBuf};
use std::time::Duration;

const MAX_REDIRECTS: u32 = 10;

/// A page body held in memory.
#[derive(Debug, Clone)]
pub struct Fetched {
    /// URL after redirects.
    pub effective_url: String,
    pub head: ResponseHead,
    pub body: String,
}

/// How a downloaded file gets its name.
#[derive(Debug, Clone, Copy)]
pub enum FileNaming<'a> {
    /// Use this name as is.
    Fixed(&'a str),
    /// `Content-Disposition`, then the effective URL's path, then `default`.
    FromResponse { default: &'a str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Downloaded {
    pub path: PathBuf,
    pub bytes: u64,
    pub effective_url: String,
}

#[derive(Debug, Clone)]
pub struct HttpClient {
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::from_config(&DocgrabConfig::default())
    }
}

impl HttpClient {
    pub fn from_config(cfg: &DocgrabConfig) -> Self {
        Self {
            user_agent: cfg.http.user_agent.clone(),
            connect_timeout: Duration::from_secs(cfg.http.connect_timeout_secs),
            timeout: Duration::from_secs(cfg.http.timeout_secs),
            retry: cfg.retry_policy(),
        }
    }

    /// Same client, but every call finishes within `within` and is tried
    /// once.
    pub fn bounded(&self, within: Duration) -> Self {
        Self {
            user_agent: self.user_agent.clone(),
            connect_timeout: self.connect_timeout.min(within),
            timeout: self.timeout.min(within),
            retry: RetryPolicy::none(),
        }
    }

    fn easy(&self, url: &str) -> Result<curl::easy::Easy, FetchError> {
        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.useragent(&self.user_agent)?;
        easy.follow_location(true)?;
        easy.max_redirections(MAX_REDIRECTS)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;
        Ok(easy)
    }

    /// GETs `url` into memory. Invalid UTF-8 is replaced, not rejected.
    pub fn fetch_page(&self, url: &str) -> Result<Fetched, FetchError> {
        run_with_retry(&self.retry, || self.fetch_page_once(url))
    }

    fn fetch_page_once(&self, url: &str) -> Result<Fetched, FetchError> {
        let mut easy = self.easy(url)?;
        let mut headers = Vec::new();
        let mut body = Vec::new();
        {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                parse::collect_header_line(&mut headers, data);
                true
            })?;
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(FetchError::Http(code));
        }
        let effective_url = easy.effective_url()?.unwrap_or(url).to_string();
        tracing::debug!(%url, %effective_url, bytes = body.len(), "page fetched");
        Ok(Fetched {
            effective_url,
            head: parse::parse_headers(&headers),
            body: String::from_utf8_lossy(&body).into_owned(),
        })
    }

    /// GETs `url` into a part file in `dir` and moves it to its final name.
    /// `dir` must exist. Nothing is left behind on failure.
    pub fn download_to(
        &self,
        url: &str,
        dir: &Path,
        naming: FileNaming<'_>,
    ) -> Result<Downloaded, FetchError> {
        run_with_retry(&self.retry, || self.download_once(url, dir, naming))
    }

    fn download_once(
        &self,
        url: &str,
        dir: &Path,
        naming: FileNaming<'_>,
    ) -> Result<Downloaded, FetchError> {
        let mut easy = self.easy(url)?;
        let mut part = PartFile::create_in(dir)?;
        let mut headers = Vec::new();
        let mut write_err = None;
        let performed = {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                parse::collect_header_line(&mut headers, data);
                true
            })?;
            transfer.write_function(|data| match part.write_chunk(data) {
                Ok(()) => Ok(data.len()),
                Err(e) => {
                    write_err = Some(e);
                    // Short count makes curl abort the transfer.
                    Ok(0)
                }
            })?;
            transfer.perform()
        };
        if let Some(e) = write_err {
            return Err(FetchError::Storage(e));
        }
        performed?;

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(FetchError::Http(code));
        }
        let effective_url = easy.effective_url()?.unwrap_or(url).to_string();
        let head = parse::parse_headers(&headers);
        let filename = match naming {
            FileNaming::Fixed(name) => name.to_string(),
            FileNaming::FromResponse { default } => {
                derive_filename(&effective_url, head.content_disposition.as_deref(), default)
            }
        };

        let bytes = part.written();
        let path = part.finalize(dir, &filename)?;
        tracing::info!(%url, path = %path.display(), bytes, "download complete");
        Ok(Downloaded {
            path,
            bytes,
            effective_url,
        })
    }
}
