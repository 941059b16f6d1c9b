use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use scholar_harvest::analysis::{author_positions, impact_factors, journal_ranks};
use scholar_harvest::config::{find_config_file, get_config, load_config, Config};
use scholar_harvest::models::{
    AuthorPosition, CareerPoint, CitationYearCount, CoauthorEdge, PredictionPoint, Publication,
    PublicationQuery, PublicationSort, ScholarYearTotal, VenueMetric,
};
use scholar_harvest::{ScholarClient, ScholarProfile};
use serde::Serialize;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Scholar Harvest - Extract and analyse Google Scholar citation profiles
#[derive(Parser, Debug)]
#[command(name = "scholar-harvest")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract and analyse Google Scholar citation profiles", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (-v for debug, -vv for trace)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Scholar site mirror to use instead of the configured base URL
    #[arg(long, global = true)]
    mirror: Option<String>,

    /// Log line format
    #[arg(long, value_enum, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (table if TTY, JSON otherwise)
    Auto,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
    /// Plain text format (tab-separated)
    Plain,
}

/// Log line format
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum LogFormat {
    Text,
    Json,
}

/// Publication list order
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum SortKey {
    /// Most cited first
    Citation,
    /// Newest first
    Year,
}

impl From<SortKey> for PublicationSort {
    fn from(key: SortKey) -> Self {
        match key {
            SortKey::Citation => PublicationSort::Citation,
            SortKey::Year => PublicationSort::Year,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show a scholar's profile
    #[command(alias = "p")]
    Profile {
        /// Scholar ID
        id: String,
    },

    /// Print a human-readable profile summary
    Summary {
        /// Scholar ID
        id: String,
    },

    /// Look up a scholar ID by name
    FindId {
        /// Last name
        last: String,

        /// First name
        #[arg(long, short)]
        first: Option<String>,

        /// Pick the candidate whose affiliation contains this text
        #[arg(long, short)]
        affiliation: Option<String>,
    },

    /// List a scholar's publications
    #[command(alias = "pubs")]
    Publications {
        /// Scholar ID
        id: String,

        /// Rows per page (at most 100)
        #[arg(long, default_value_t = 100)]
        page_size: usize,

        /// Listing order
        #[arg(long, value_enum, default_value_t = SortKey::Citation)]
        sort: SortKey,

        /// Offset of the first row
        #[arg(long, default_value_t = 0)]
        start: usize,

        /// Stop paging at this offset
        #[arg(long)]
        stop: Option<usize>,
    },

    /// Yearly citations of a whole profile
    History {
        /// Scholar ID
        id: String,
    },

    /// Yearly citations of one article
    ArticleHistory {
        /// Scholar ID
        id: String,

        /// Publication ID
        pubid: String,
    },

    /// Show the detail page of one publication
    Details {
        /// Scholar ID
        id: String,

        /// Publication ID
        pubid: String,
    },

    /// Fetch complete author lists (at most 50 publications)
    Authors {
        /// Scholar ID
        id: String,

        /// Publication IDs
        #[arg(required = true)]
        pubids: Vec<String>,

        /// Abbreviate given names to initials
        #[arg(long)]
        initials: bool,
    },

    /// Citations by publication year for several scholars
    Compare {
        /// Scholar IDs
        #[arg(required = true)]
        ids: Vec<String>,

        /// Rows per publication page
        #[arg(long, default_value_t = 100)]
        page_size: usize,
    },

    /// Yearly citation histories for several scholars
    Careers {
        /// Scholar IDs
        #[arg(required = true)]
        ids: Vec<String>,

        /// Add years relative to each scholar's first cited year
        #[arg(long)]
        career: bool,
    },

    /// Project a scholar's h-index ten years ahead
    Predict {
        /// Scholar ID
        id: String,

        /// Top venue (repeatable); defaults to the configured list
        #[arg(long = "venue")]
        venues: Vec<String>,
    },

    /// Walk a scholar's coauthor network
    Coauthors {
        /// Scholar ID
        id: String,

        /// Coauthors followed per scholar
        #[arg(long, short, default_value_t = 5)]
        breadth: usize,

        /// Levels beyond the direct coauthors
        #[arg(long, short, default_value_t = 1)]
        depth: usize,
    },

    /// Locate an author in publication author lists
    Position {
        /// Author name (the last word is matched)
        name: String,

        /// Author lists to search
        authors: Vec<String>,

        /// Use the author lists of this scholar's publications
        #[arg(long, conflicts_with = "authors")]
        scholar: Option<String>,
    },

    /// Impact factors of venues
    ImpactFactor {
        /// Venue names
        #[arg(required = true)]
        venues: Vec<String>,
    },

    /// Rankings of venues
    JournalRank {
        /// Venue names
        #[arg(required = true)]
        venues: Vec<String>,
    },

    /// Write a configuration file with the default settings
    InitConfig {
        /// Destination (default: the user config directory)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration from file if specified or found in default locations
    let config_path = cli.config.clone().or_else(find_config_file);
    let config = match &config_path {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?,
        None => get_config(),
    };

    init_tracing(&cli, &config);

    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }

    let format = resolve_format(cli.output);

    if let Commands::InitConfig { path, force } = &cli.command {
        return init_config(path.clone(), *force);
    }

    let mut client = ScholarClient::new(&config)?;
    if let Some(mirror) = &cli.mirror {
        client.set_mirror(mirror)?;
    }

    match cli.command {
        Commands::Profile { id } => {
            let profile = client.profile(&id).await?;
            output_rows(std::slice::from_ref(&profile), format)?;
        }

        Commands::Summary { id } => {
            let profile = client.profile(&id).await?;
            println!("{}", profile);
        }

        Commands::FindId {
            last,
            first,
            affiliation,
        } => {
            let outcome = client
                .search_scholar_id(&last, first.as_deref().unwrap_or_default(), affiliation.as_deref())
                .await?;
            match outcome.value {
                Some(id) => println!("{}", id),
                None => bail!("No scholar ID found"),
            }
        }

        Commands::Publications {
            id,
            page_size,
            sort,
            start,
            stop,
        } => {
            let mut query = PublicationQuery::new()
                .page_size(page_size)
                .sort(sort.into())
                .start(start);
            if let Some(stop) = stop {
                query = query.stop(stop);
            }
            let publications = client.publications(&id, query).await?.into_value();
            output_rows(&publications, format)?;
        }

        Commands::History { id } => {
            let history = client.citation_history(&id).await?;
            output_rows(&history, format)?;
        }

        Commands::ArticleHistory { id, pubid } => {
            let history = client.article_citation_history(&id, &pubid).await?;
            output_rows(&history.series, format)?;
        }

        Commands::Details { id, pubid } => {
            let detail = client.publication_detail(&id, &pubid).await?;
            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&detail)?);
            } else {
                let mut rows: Vec<Field> = detail
                    .fields
                    .iter()
                    .map(|(label, value)| Field::new(label, value))
                    .collect();
                rows.push(Field::new("Abstract", &detail.r#abstract));
                rows.push(Field::new("URL", &detail.url));
                rows.push(Field::new(
                    "Scholar URL",
                    &client.article_scholar_url(&id, &pubid),
                ));
                output_rows(&rows, format)?;
            }
        }

        Commands::Authors {
            id,
            pubids,
            initials,
        } => {
            let authors = client.complete_authors(&id, &pubids, initials).await?;
            let rows: Vec<Field> = pubids
                .iter()
                .zip(&authors)
                .map(|(pubid, authors)| Field::new(pubid, authors))
                .collect();
            output_rows(&rows, format)?;
        }

        Commands::Compare { ids, page_size } => {
            let rows = client.compare_scholars(&ids, page_size).await?;
            output_rows(&rows, format)?;
        }

        Commands::Careers { ids, career } => {
            let rows = client.compare_careers(&ids, career).await?;
            output_rows(&rows, format)?;
        }

        Commands::Predict { id, venues } => {
            let venues = (!venues.is_empty()).then_some(venues.as_slice());
            let outcome = client.predict_h_index(&id, venues).await?;
            output_rows(&outcome.value, format)?;
        }

        Commands::Coauthors { id, breadth, depth } => {
            let edges = client.coauthor_network(&id, breadth, depth).await?;
            output_rows(&edges, format)?;
        }

        Commands::Position {
            name,
            authors,
            scholar,
        } => {
            let author_lists = match scholar {
                Some(id) => client
                    .all_publications(&id)
                    .await?
                    .into_iter()
                    .map(|p| p.author)
                    .collect(),
                None => authors,
            };
            output_rows(&author_positions(&author_lists, &name), format)?;
        }

        Commands::ImpactFactor { venues } => {
            output_rows(&impact_factors(&venues).value, format)?;
        }

        Commands::JournalRank { venues } => {
            output_rows(&journal_ranks(&venues).value, format)?;
        }

        Commands::InitConfig { .. } => unreachable!("handled before the client is built"),
    }

    Ok(())
}

fn init_tracing(cli: &Cli, config: &Config) {
    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };

    let env_filter = if cli.quiet { "error" } else { log_level };

    let json = match cli.log_format {
        Some(format) => format == LogFormat::Json,
        None => config.logging.format.as_deref() == Some("json"),
    };

    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("scholar_harvest={}", env_filter)),
    );

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn init_config(path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => dirs::config_dir()
            .map(|dir| dir.join("scholar-harvest").join("config.toml"))
            .context("No user config directory on this platform; pass --path")?,
    };

    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    Config::default().save_file(&path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn resolve_format(format: OutputFormat) -> OutputFormat {
    if format == OutputFormat::Auto {
        if std::io::stdout().is_terminal() {
            OutputFormat::Table
        } else {
            OutputFormat::Json
        }
    } else {
        format
    }
}

/// A record that can be printed as one table row
trait Tabular: Serialize {
    fn headers() -> Vec<&'static str>;
    fn row(&self) -> Vec<String>;
}

fn output_rows<T: Tabular>(rows: &[T], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json | OutputFormat::Auto => {
            println!("{}", serde_json::to_string_pretty(rows)?);
        }
        OutputFormat::Plain => {
            for row in rows {
                println!("{}", row.row().join("\t"));
            }
        }
        OutputFormat::Table => {
            use comfy_table::{Attribute, Cell, Table};
            let mut table = Table::new();
            table.load_preset(comfy_table::presets::UTF8_FULL);
            table.set_header(T::headers());

            for row in rows {
                let mut cells = row.row().into_iter();
                let mut line = Vec::new();
                if let Some(first) = cells.next() {
                    line.push(Cell::new(truncate(&first, 50)).add_attribute(Attribute::Bold));
                }
                line.extend(cells.map(|c| Cell::new(truncate(&c, 40))));
                table.add_row(line);
            }
            println!("{table}");
        }
    }
    Ok(())
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let head: String = text.chars().take(max - 3).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// A labelled value, for detail pages and author lists
#[derive(Serialize)]
struct Field {
    label: String,
    value: String,
}

impl Field {
    fn new(label: &str, value: &str) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
        }
    }
}

impl Tabular for Field {
    fn headers() -> Vec<&'static str> {
        vec!["Field", "Value"]
    }
    fn row(&self) -> Vec<String> {
        vec![self.label.clone(), self.value.clone()]
    }
}

impl Tabular for ScholarProfile {
    fn headers() -> Vec<&'static str> {
        vec!["Name", "Affiliation", "Citations", "h-index", "i10-index", "Coauthors"]
    }
    fn row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.affiliation.clone(),
            self.total_cites.to_string(),
            self.h_index.to_string(),
            self.i10_index.to_string(),
            self.coauthors.len().to_string(),
        ]
    }
}

impl Tabular for Publication {
    fn headers() -> Vec<&'static str> {
        vec!["Title", "Authors", "Journal", "Number", "Cites", "Year", "Pub ID"]
    }
    fn row(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            self.author.clone(),
            self.journal.clone(),
            self.number.clone(),
            self.cites.to_string(),
            opt(self.year),
            self.pubid.clone(),
        ]
    }
}

impl Tabular for CitationYearCount {
    fn headers() -> Vec<&'static str> {
        vec!["Year", "Cites"]
    }
    fn row(&self) -> Vec<String> {
        vec![self.year.to_string(), self.cites.to_string()]
    }
}

impl Tabular for ScholarYearTotal {
    fn headers() -> Vec<&'static str> {
        vec!["Name", "ID", "Year", "Cites", "Total"]
    }
    fn row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.id.clone(),
            self.year.to_string(),
            self.cites.to_string(),
            self.total.to_string(),
        ]
    }
}

impl Tabular for CareerPoint {
    fn headers() -> Vec<&'static str> {
        vec!["Name", "ID", "Year", "Cites", "Career Year"]
    }
    fn row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.id.clone(),
            self.year.to_string(),
            self.cites.to_string(),
            opt(self.career_year),
        ]
    }
}

impl Tabular for PredictionPoint {
    fn headers() -> Vec<&'static str> {
        vec!["Years Ahead", "h-index"]
    }
    fn row(&self) -> Vec<String> {
        vec![self.years_ahead.to_string(), format!("{:.2}", self.h_index)]
    }
}

impl Tabular for CoauthorEdge {
    fn headers() -> Vec<&'static str> {
        vec!["Author", "Coauthor", "Coauthor ID"]
    }
    fn row(&self) -> Vec<String> {
        vec![
            self.author.clone(),
            self.coauthor.clone(),
            self.coauthor_id.clone().unwrap_or_default(),
        ]
    }
}

impl Tabular for AuthorPosition {
    fn headers() -> Vec<&'static str> {
        vec!["Authors", "Position", "Authors #", "Normalized"]
    }
    fn row(&self) -> Vec<String> {
        vec![
            self.authors.clone(),
            opt(self.position),
            opt(self.n_authors),
            opt(self.position_normalized.map(|p| format!("{:.2}", p))),
        ]
    }
}

impl Tabular for VenueMetric {
    fn headers() -> Vec<&'static str> {
        vec!["Venue", "Value"]
    }
    fn row(&self) -> Vec<String> {
        vec![self.venue.clone(), opt(self.value)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_verbose_and_quiet_flags() {
        let cli = Cli::parse_from(["scholar-harvest", "-vv", "profile", "abc"]);
        assert_eq!(cli.verbose, 2);
        assert!(!cli.quiet);

        let cli = Cli::parse_from(["scholar-harvest", "profile", "abc", "--quiet"]);
        assert!(cli.quiet);
    }

    #[test]
    fn test_cli_output_format() {
        let cli = Cli::parse_from(["scholar-harvest", "-o", "json", "history", "abc"]);
        assert_eq!(cli.output, OutputFormat::Json);
        assert!(matches!(cli.command, Commands::History { id } if id == "abc"));
    }

    #[test]
    fn test_cli_publications_defaults() {
        let cli = Cli::parse_from(["scholar-harvest", "publications", "abc"]);
        match cli.command {
            Commands::Publications {
                page_size,
                sort,
                start,
                stop,
                ..
            } => {
                assert_eq!(page_size, 100);
                assert_eq!(sort, SortKey::Citation);
                assert_eq!(start, 0);
                assert_eq!(stop, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_coauthors_and_mirror() {
        let cli = Cli::parse_from([
            "scholar-harvest",
            "--mirror",
            "https://mirror.example.org",
            "coauthors",
            "abc",
            "-b",
            "3",
            "-d",
            "2",
        ]);
        assert_eq!(cli.mirror.as_deref(), Some("https://mirror.example.org"));
        assert!(matches!(
            cli.command,
            Commands::Coauthors { breadth: 3, depth: 2, .. }
        ));
    }

    #[test]
    fn test_cli_compare_requires_ids() {
        assert!(Cli::try_parse_from(["scholar-harvest", "compare"]).is_err());

        let cli = Cli::parse_from(["scholar-harvest", "compare", "a", "b", "--page-size", "50"]);
        assert!(matches!(cli.command, Commands::Compare { ids, page_size: 50 } if ids.len() == 2));
    }

    #[test]
    fn test_cli_predict_venues() {
        let cli = Cli::parse_from([
            "scholar-harvest",
            "predict",
            "abc",
            "--venue",
            "Nature",
            "--venue",
            "Cell",
        ]);
        assert!(matches!(cli.command, Commands::Predict { venues, .. } if venues == ["Nature", "Cell"]));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 8), "abcde...");
    }

    #[test]
    fn test_rows_match_headers() {
        let publication = Publication::default();
        assert_eq!(publication.row().len(), Publication::headers().len());

        let point = PredictionPoint {
            years_ahead: 1,
            h_index: 3.14159,
        };
        assert_eq!(point.row(), vec!["1", "3.14"]);
    }
}
