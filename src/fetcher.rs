use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::redirect;
use tracing::debug;

/// Anything that can hand back the raw markup of a page.
pub trait PageSource {
    fn fetch(&self, url: &str) -> Result<String>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let redirect_policy = redirect::Policy::custom(|attempt| {
            if attempt.previous().len() > 100 {
                attempt.error("Too many redirects (>100)")
            } else {
                attempt.follow()
            }
        });

        let client = Client::builder()
            .redirect(redirect_policy)
            .build()
            .context("building http client")?;

        Ok(Self { client })
    }
}

impl PageSource for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        debug!(url, "GET");
        self.client
            .get(url)
            .send()
            .and_then(|resp| resp.text())
            .with_context(|| format!("fetching {url}"))
    }
}

/// In-memory pages keyed by URL. Unknown URLs fail like a dead host.
#[cfg(test)]
#[derive(Default)]
pub struct StaticPages {
    pages: std::collections::HashMap<String, String>,
    hits: std::cell::RefCell<Vec<String>>,
}

#[cfg(test)]
impl StaticPages {
    pub fn with(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }

    pub fn hits(&self) -> Vec<String> {
        self.hits.borrow().clone()
    }
}

#[cfg(test)]
impl PageSource for StaticPages {
    fn fetch(&self, url: &str) -> Result<String> {
        self.hits.borrow_mut().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("fetching {url}: connection refused"))
    }
}
