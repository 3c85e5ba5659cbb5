use anyhow::Result;
use tracing::{info, warn};

use crate::archiver;
use crate::config::CrawlerConfig;
use crate::fetcher::PageSource;
use crate::models::{Category, CategoryEntry, CategoryMap};
use crate::parser::{PageLayout, strip_comment_markers};

const LEAF_PREFIX: &str = "catitemid";
const PARENT_PREFIX: &str = "catid";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Leaf,
    Parent,
    Other,
}

/// Query string of a category link, everything after the first `?`.
pub fn query_token(link: &str) -> Option<&str> {
    link.split_once('?').map(|(_, token)| token)
}

pub fn classify(token: &str) -> TokenKind {
    if token.starts_with(LEAF_PREFIX) {
        TokenKind::Leaf
    } else if token.starts_with(PARENT_PREFIX) {
        TokenKind::Parent
    } else {
        TokenKind::Other
    }
}

/// Mapping key of a leaf token: the part after its `=`.
pub fn category_id(token: &str) -> Option<&str> {
    token.split_once('=').map(|(_, id)| id)
}

/// Leaf categories in the order they were discovered.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CategoryHarvest {
    pub categories: Vec<Category>,
}

impl CategoryHarvest {
    pub fn mapping(&self) -> CategoryMap {
        self.categories
            .iter()
            .map(|c| {
                (
                    c.id.clone(),
                    CategoryEntry(c.name.clone(), c.detail_url.clone()),
                )
            })
            .collect()
    }

    pub fn review_list(&self) -> Vec<(String, String)> {
        self.categories
            .iter()
            .map(|c| (c.id.clone(), c.name.clone()))
            .collect()
    }
}

pub struct CategoryHarvester<'a> {
    config: &'a CrawlerConfig,
    source: &'a dyn PageSource,
    layout: &'a dyn PageLayout,
}

impl<'a> CategoryHarvester<'a> {
    pub fn new(
        config: &'a CrawlerConfig,
        source: &'a dyn PageSource,
        layout: &'a dyn PageLayout,
    ) -> Self {
        Self {
            config,
            source,
            layout,
        }
    }

    /// Crawls the portal for leaf categories and rewrites both category artifacts.
    pub fn harvest(&self) -> Result<CategoryHarvest> {
        info!(url = %self.config.portal_url, "fetching category list");
        let page = self.source.fetch(&self.config.portal_url)?;
        let page = strip_comment_markers(&page);

        let mut harvest = CategoryHarvest::default();
        for (name, link) in self.layout.category_links(&page) {
            let Some(token) = query_token(&link) else {
                warn!(%name, %link, "link has no query string, skipping");
                continue;
            };
            match classify(token) {
                TokenKind::Leaf => {
                    info!(%name, "leaf category");
                    harvest.categories.extend(self.leaf(name, token));
                }
                TokenKind::Parent => {
                    info!(%name, "parent category, expanding");
                    let children = self.expand(token)?;
                    harvest.categories.extend(children);
                }
                TokenKind::Other => info!(%name, %link, "not a product category, skipping"),
            }
        }

        archiver::save_review_list(&harvest.review_list(), &self.config.review_list_path())?;
        archiver::save_mapping(&harvest.mapping(), &self.config.mapping_path())?;
        info!(
            count = harvest.categories.len(),
            "category list written to {} and {}",
            self.config.review_list_path().display(),
            self.config.mapping_path().display()
        );
        Ok(harvest)
    }

    fn leaf(&self, name: String, token: &str) -> Option<Category> {
        let Some(id) = category_id(token) else {
            warn!(%name, token, "category token has no id, skipping");
            return None;
        };
        Some(Category {
            id: id.to_string(),
            name,
            detail_url: self.config.leaf_url(token),
        })
    }

    /// One level only: whatever the parent page links to is taken as a leaf.
    fn expand(&self, token: &str) -> Result<Vec<Category>> {
        let page = self.source.fetch(&self.config.listing_url(token))?;
        let children = self
            .layout
            .child_category_links(&page)
            .into_iter()
            .filter_map(|(name, link)| match query_token(&link) {
                Some(child) => self.leaf(name, child),
                None => {
                    warn!(%name, %link, "child link has no query string, skipping");
                    None
                }
            })
            .collect::<Vec<_>>();
        info!(count = children.len(), "sub categories added");
        Ok(children)
    }
}
