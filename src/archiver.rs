use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::CrawlerConfig;
use crate::models::CategoryMap;

pub const REVIEW_HEADER: [&str; 2] = ["CatId", "CatName"];

pub fn artifacts_present(config: &CrawlerConfig) -> bool {
    config.review_list_path().exists() && config.mapping_path().exists()
}

/// Writes the hand-editable `CatId,CatName` list, replacing any previous file.
pub fn save_review_list(rows: &[(String, String)], path: &Path) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(REVIEW_HEADER)?;
    for (id, name) in rows {
        writer.write_record([id, name])?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads back the (possibly trimmed) review list as ordered (id, name) pairs.
pub fn load_review_list(path: &Path) -> Result<Vec<(String, String)>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("reading {}", path.display()))?;
        let Some(id) = record.get(0) else { continue };
        if id == REVIEW_HEADER[0] || id.trim().is_empty() {
            continue;
        }
        let name = record.get(1).unwrap_or_default();
        rows.push((id.to_string(), name.to_string()));
    }
    Ok(rows)
}

pub fn save_mapping(mapping: &CategoryMap, path: &Path) -> Result<()> {
    let json = serde_json::to_string(mapping)?;
    let mut file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    file.write_all(json.as_bytes())?;
    file.write_all(b"\n")?;
    Ok(())
}

pub fn load_mapping(path: &Path) -> Result<CategoryMap> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}
