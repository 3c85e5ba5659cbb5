use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("category id {0:?} is not in the category mapping")]
    UnknownCategory(String),
    #[error("invalid selector {css:?}: {reason}")]
    InvalidSelector { css: String, reason: String },
    #[error("report output failed: {}", .0.join("; "))]
    ReportFailed(Vec<String>),
}
