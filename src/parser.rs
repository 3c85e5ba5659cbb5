use scraper::{ElementRef, Html, Selector};

use crate::error::CrawlError;
use crate::models::ProductSample;

/// Turns comment delimiters into spaces so markup hidden inside comments gets parsed.
pub fn strip_comment_markers(html: &str) -> String {
    html.replace("<!--", " ").replace("-->", " ")
}

/// Where the interesting bits live on a given portal's pages.
pub trait PageLayout {
    /// Ordered (label, link) pairs from the portal front page.
    fn category_links(&self, html: &str) -> Vec<(String, String)>;
    /// Ordered (label, link) pairs from a parent category's listing page.
    fn child_category_links(&self, html: &str) -> Vec<(String, String)>;
    /// Products in listing order from a category's best-seller page.
    fn products(&self, html: &str) -> Vec<ProductSample>;
}

const CATEGORY_ANCHOR: &str = r#"div[class="catLevel3 yui3-u"] > a"#;
const CHILD_ANCHOR: &str = "div#cl-catproduct > div > h2 > span > a";
const PRODUCT_TITLE: &str = r#"div[class="srp-pdtitle"] > a"#;
const PRODUCT_PRICE: &str = r#"div[class="srp-listprice"] > span:nth-of-type(2)"#;

/// Selectors matching the current markup of the shopping portal.
pub struct PortalLayout {
    category_anchor: Selector,
    child_anchor: Selector,
    product_title: Selector,
    product_price: Selector,
}

impl PortalLayout {
    pub fn new() -> Result<Self, CrawlError> {
        Ok(Self {
            category_anchor: selector(CATEGORY_ANCHOR)?,
            child_anchor: selector(CHILD_ANCHOR)?,
            product_title: selector(PRODUCT_TITLE)?,
            product_price: selector(PRODUCT_PRICE)?,
        })
    }
}

fn selector(css: &str) -> Result<Selector, CrawlError> {
    Selector::parse(css).map_err(|e| CrawlError::InvalidSelector {
        css: css.to_string(),
        reason: format!("{e:?}"),
    })
}

fn text_of(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn anchors(html: &str, sel: &Selector) -> Vec<(String, String)> {
    let doc = Html::parse_document(html);
    doc.select(sel)
        .filter_map(|a| {
            let href = a.value().attr("href")?;
            Some((text_of(a), href.to_string()))
        })
        .collect()
}

impl PageLayout for PortalLayout {
    fn category_links(&self, html: &str) -> Vec<(String, String)> {
        anchors(html, &self.category_anchor)
    }

    fn child_category_links(&self, html: &str) -> Vec<(String, String)> {
        anchors(html, &self.child_anchor)
    }

    fn products(&self, html: &str) -> Vec<ProductSample> {
        let doc = Html::parse_document(html);
        let titles = doc
            .select(&self.product_title)
            .filter_map(|a| a.value().attr("title"))
            .map(|t| t.trim().to_string());
        let prices = doc.select(&self.product_price).map(text_of);

        titles
            .zip(prices)
            .map(|(name, price)| ProductSample { name, price })
            .collect()
    }
}
