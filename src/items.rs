use anyhow::Result;
use tracing::info;

use crate::archiver;
use crate::config::CrawlerConfig;
use crate::error::CrawlError;
use crate::fetcher::PageSource;
use crate::harvester::CategoryHarvester;
use crate::models::CategoryEntry;
use crate::parser::PageLayout;
use crate::report::ReportTable;

pub struct ItemHarvester<'a> {
    config: &'a CrawlerConfig,
    source: &'a dyn PageSource,
    layout: &'a dyn PageLayout,
}

impl<'a> ItemHarvester<'a> {
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

    /// Fetches the best sellers of every selected category, one report row each.
    ///
    /// Every id must be present in the category mapping; a single unknown id
    /// aborts the run before anything is fetched.
    pub fn harvest(&self, selection: &[String]) -> Result<ReportTable> {
        if !archiver::artifacts_present(self.config) {
            info!("category artifacts missing, fetching category list now");
            CategoryHarvester::new(self.config, self.source, self.layout).harvest()?;
        }
        let mapping = archiver::load_mapping(&self.config.mapping_path())?;

        let requested = selection
            .iter()
            .map(|id| {
                mapping
                    .get(id)
                    .map(|entry| (id.as_str(), entry))
                    .ok_or_else(|| CrawlError::UnknownCategory(id.clone()))
            })
            .collect::<Result<Vec<(&str, &CategoryEntry)>, _>>()?;

        let mut table = ReportTable::new(self.config.item_count);
        for (index, (id, entry)) in requested.iter().enumerate() {
            info!(
                "[{}/{}] fetching best sellers of {}",
                index + 1,
                requested.len(),
                entry.name()
            );
            let page = self.source.fetch(entry.detail_url())?;
            let mut products = self.layout.products(&page);
            products.truncate(self.config.item_count);
            table.push_category(id, entry.name(), &products);
        }
        info!(
            rows = table.data_rows().len(),
            columns = table.header().len(),
            "best seller table assembled"
        );
        Ok(table)
    }
}
