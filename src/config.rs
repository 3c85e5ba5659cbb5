use std::path::PathBuf;

pub const PORTAL_URL: &str = "https://tw.buy.yahoo.com";
/// Sort by descending sales, first page only.
pub const SORT_SUFFIX: &str = "&sort=-tsales&pg=1";
pub const ITEM_COUNT: usize = 10;

pub const REVIEW_LIST_FILE: &str = "category_list_options.csv";
pub const MAPPING_FILE: &str = "category_list.json";
pub const CSV_REPORT_FILE: &str = "output_csv.csv";
pub const SPREADSHEET_REPORT_FILE: &str = "output_xls.xlsx";

/// Settings shared by every stage of the crawl. Built once and passed by reference.
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    pub portal_url: String,
    pub sort_suffix: String,
    /// How many best sellers to keep per category.
    pub item_count: usize,
    /// Directory holding the category artifacts and the reports.
    pub work_dir: PathBuf,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            portal_url: PORTAL_URL.to_string(),
            sort_suffix: SORT_SUFFIX.to_string(),
            item_count: ITEM_COUNT,
            work_dir: PathBuf::from("."),
        }
    }
}

impl CrawlerConfig {
    pub fn review_list_path(&self) -> PathBuf {
        self.work_dir.join(REVIEW_LIST_FILE)
    }

    pub fn mapping_path(&self) -> PathBuf {
        self.work_dir.join(MAPPING_FILE)
    }

    pub fn csv_report_path(&self) -> PathBuf {
        self.work_dir.join(CSV_REPORT_FILE)
    }

    pub fn spreadsheet_report_path(&self) -> PathBuf {
        self.work_dir.join(SPREADSHEET_REPORT_FILE)
    }

    /// Best-seller listing for a leaf category token such as `catitemid=123`.
    pub fn leaf_url(&self, token: &str) -> String {
        format!("{}/?{}{}", self.portal_url, token, self.sort_suffix)
    }

    /// Plain listing page of a parent category, used to discover its children.
    pub fn listing_url(&self, token: &str) -> String {
        format!("{}/?{}", self.portal_url, token)
    }

    pub fn sheet_name(&self) -> String {
        format!("Best{}", self.item_count)
    }
}
