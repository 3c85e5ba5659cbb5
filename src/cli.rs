use std::io::{BufRead, Write};

use anyhow::Result;
use clap::Parser;
use tracing::info;

use crate::archiver;
use crate::config::CrawlerConfig;
use crate::fetcher::PageSource;
use crate::harvester::CategoryHarvester;
use crate::items::ItemHarvester;
use crate::parser::PageLayout;
use crate::report::{self, OutputFormat};

/// Fetch best-selling items per category from the shopping portal.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// `--cat` refreshes the category list, `--item` fetches best sellers
    /// for the categories left in the category options file
    #[arg(allow_hyphen_values = true)]
    pub action: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Categories,
    Items,
    Unknown(String),
}

impl Action {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "--cat" | "cat" => Self::Categories,
            "--item" | "item" => Self::Items,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// How a run ended when nothing went wrong. `Aborted` maps to a non-zero exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Aborted,
}

/// Wires the crawl stages to the console.
pub struct Session<'a, R, W> {
    pub config: &'a CrawlerConfig,
    pub source: &'a dyn PageSource,
    pub layout: &'a dyn PageLayout,
    pub input: R,
    pub out: W,
}

impl<R: BufRead, W: Write> Session<'_, R, W> {
    pub fn run(&mut self, action: &Action) -> Result<Outcome> {
        match action {
            Action::Categories => {
                writeln!(self.out, "Fetching the category list, please wait...")?;
                self.discover()?;
                Ok(Outcome::Done)
            }
            Action::Items => self.fetch_items(),
            Action::Unknown(raw) => {
                writeln!(
                    self.out,
                    "Unrecognized action {raw:?}, use --cat or --item and try again."
                )?;
                Ok(Outcome::Done)
            }
        }
    }

    fn discover(&self) -> Result<()> {
        CategoryHarvester::new(self.config, self.source, self.layout).harvest()?;
        Ok(())
    }

    fn fetch_items(&mut self) -> Result<Outcome> {
        let review_path = self.config.review_list_path();
        if !review_path.exists() {
            info!("category options file missing, fetching category list now");
            self.discover()?;
            writeln!(
                self.out,
                "Category list fetched. Remove unwanted rows from {} and run --item again.",
                review_path.display()
            )?;
            return Ok(Outcome::Aborted);
        }

        let selected = archiver::load_review_list(&review_path)?;
        writeln!(self.out, "Best sellers will be fetched for these categories:")?;
        for (_, name) in &selected {
            writeln!(self.out, "{name}")?;
        }

        let answer = self.prompt("Fetch items for the categories above (Y / N)? ")?;
        if answer != "Y" && answer != "y" {
            writeln!(self.out, "Process terminated, please try again later.")?;
            return Ok(Outcome::Aborted);
        }

        let ids = selected.into_iter().map(|(id, _)| id).collect::<Vec<_>>();
        let table =
            ItemHarvester::new(self.config, self.source, self.layout).harvest(&ids)?;

        writeln!(self.out, "Data is ready, please select an output option.")?;
        let choice = self.prompt("1. csv, 2. excel, 3. both: ")?;
        let written = report::write_report(
            &table,
            OutputFormat::from_choice(&choice),
            self.config,
            &mut self.out,
        )?;
        for path in written {
            writeln!(self.out, "Wrote {}", path.display())?;
        }
        Ok(Outcome::Done)
    }

    fn prompt(&mut self, question: &str) -> Result<String> {
        write!(self.out, "{question}")?;
        self.out.flush()?;
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::StaticPages;
    use crate::parser::PortalLayout;
    use std::fs;
    use std::io::Cursor;

    const FRONT_PAGE: &str = r#"
        <div class="catLevel3 yui3-u"><a href="/?catitemid=1">Shoes</a></div>
        <div class="catLevel3 yui3-u"><a href="/?catitemid=2">Hats</a></div>
    "#;
    const SHOES_PAGE: &str = r#"
        <div class="srp-pdtitle"><a title="Runner">Runner</a></div>
        <div class="srp-listprice"><span>NT</span><span>$10</span></div>
    "#;

    fn portal() -> StaticPages {
        StaticPages::default()
            .with("http://x", FRONT_PAGE)
            .with("http://x/?catitemid=1&sort=-tsales&pg=1", SHOES_PAGE)
            .with("http://x/?catitemid=2&sort=-tsales&pg=1", "<html></html>")
    }

    fn config(dir: &std::path::Path) -> CrawlerConfig {
        CrawlerConfig {
            portal_url: "http://x".into(),
            item_count: 3,
            work_dir: dir.to_path_buf(),
            ..CrawlerConfig::default()
        }
    }

    fn run(
        config: &CrawlerConfig,
        source: &StaticPages,
        action: &str,
        input: &str,
    ) -> (Outcome, String) {
        let layout = PortalLayout::new().unwrap();
        let mut session = Session {
            config,
            source,
            layout: &layout,
            input: Cursor::new(input.as_bytes().to_vec()),
            out: Vec::new(),
        };
        let outcome = session.run(&Action::parse(action)).unwrap();
        (outcome, String::from_utf8(session.out).unwrap())
    }

    #[test]
    fn action_names() {
        assert_eq!(Action::parse("--cat"), Action::Categories);
        assert_eq!(Action::parse("item"), Action::Items);
        assert_eq!(Action::parse("--all"), Action::Unknown("--all".into()));
    }

    #[test]
    fn args_accept_hyphenated_action() {
        let args = Args::try_parse_from(["best_seller_crawler", "--item"]).unwrap();
        assert_eq!(args.action, "--item");
        assert!(Args::try_parse_from(["best_seller_crawler"]).is_err());
    }

    #[test]
    fn unknown_action_only_prints() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let source = portal();

        let (outcome, out) = run(&config, &source, "--bogus", "");
        assert_eq!(outcome, Outcome::Done);
        assert!(out.contains("Unrecognized action"));
        assert!(source.hits().is_empty());
    }

    #[test]
    fn item_without_options_file_discovers_then_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let source = portal();

        let (outcome, out) = run(&config, &source, "--item", "");
        assert_eq!(outcome, Outcome::Aborted);
        assert!(out.contains("Remove unwanted rows"));
        assert!(archiver::artifacts_present(&config));
        assert_eq!(source.hits(), ["http://x"]);
    }

    #[test]
    fn declining_confirmation_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let source = portal();
        run(&config, &source, "--cat", "");

        let (outcome, out) = run(&config, &source, "--item", "n\n");
        assert_eq!(outcome, Outcome::Aborted);
        assert!(out.contains("Shoes\nHats\n"));
        assert!(!config.csv_report_path().exists());
    }

    #[test]
    fn trimmed_selection_produces_csv_report() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let source = portal();
        run(&config, &source, "--cat", "");
        fs::write(config.review_list_path(), "CatId,CatName\n1,Shoes\n").unwrap();

        let (outcome, out) = run(&config, &source, "--item", "y\n1\n");
        assert_eq!(outcome, Outcome::Done);
        assert!(!out.contains("Hats"));
        assert_eq!(
            fs::read_to_string(config.csv_report_path()).unwrap(),
            "Cat_Id,Cat_Name,No1_Name,No1_Price,No2_Name,No2_Price,No3_Name,No3_Price\n\
             1,Shoes,Runner,$10\n"
        );
    }

    #[test]
    fn unknown_format_choice_prints_table() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let source = portal();
        run(&config, &source, "--cat", "");

        let (outcome, out) = run(&config, &source, "--item", "Y\n9\n");
        assert_eq!(outcome, Outcome::Done);
        assert!(out.contains("1, Shoes, Runner, $10\n2, Hats\n"));
        assert!(!config.csv_report_path().exists());
        assert!(!config.spreadsheet_report_path().exists());
    }

    #[test]
    fn hand_added_unknown_id_fails_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let source = portal();
        run(&config, &source, "--cat", "");
        fs::write(
            config.review_list_path(),
            "CatId,CatName\n1,Shoes\n99,Ghost\n",
        )
        .unwrap();

        let layout = PortalLayout::new().unwrap();
        let mut session = Session {
            config: &config,
            source: &source,
            layout: &layout,
            input: Cursor::new(b"y\n1\n".to_vec()),
            out: Vec::new(),
        };
        assert!(session.run(&Action::Items).is_err());
        assert!(!config.csv_report_path().exists());
    }
}
