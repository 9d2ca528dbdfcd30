use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use newsdesk_core::domain::ErrorKind;
use newsdesk_core::{
    Article, ArticleFilters, ArticleId, ArticleInput, ArticleStore, ArticleStoreBuilder,
    ImageInput, ImageUpload, StoreConfig, StoreError,
};

#[derive(Debug, Parser)]
#[command(name = "newsdesk", about = "Local news article manager")]
struct Cli {
    /// Directory holding the article collection (overrides NEWSDESK_DATA_DIR).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Do not seed sample articles into an empty collection.
    #[arg(long, global = true)]
    no_seed: bool,

    /// Emit logs as JSON.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List articles, newest first.
    List {
        #[arg(long)]
        author: Option<String>,
    },
    /// Show one article as JSON.
    Show {
        id: String,
        /// Include the embedded image data URI.
        #[arg(long)]
        with_image: bool,
    },
    /// Create an article.
    Create(ArticleArgs),
    /// Replace the fields of an article.
    Edit {
        id: String,
        #[command(flatten)]
        article: ArticleArgs,
        /// Clear the stored image.
        #[arg(long, conflicts_with = "image")]
        remove_image: bool,
    },
    /// Delete an article.
    Delete { id: String },
    /// Search title, content and author.
    Search { query: String },
    /// Seed sample articles if the collection is empty.
    Seed,
    /// Collection statistics.
    Stats,
}

#[derive(Debug, Args)]
struct ArticleArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    summary: String,
    #[arg(long)]
    content: String,
    #[arg(long)]
    author: String,
    /// Image file to embed.
    #[arg(long)]
    image: Option<PathBuf>,
}

/// Article as printed by `show` (image omitted unless requested).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ArticleView<'a> {
    #[serde(flatten)]
    article: &'a Article,
    edited: bool,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("'{0}' is not an article id")]
    InvalidId(String),

    #[error("cannot read image {path:?}: {source}")]
    Image {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ArticleArgs {
    fn into_input(self) -> Result<ArticleInput, CliError> {
        let mut input = ArticleInput::new(self.title, self.summary, self.content, self.author);
        if let Some(path) = self.image {
            let bytes = std::fs::read(&path).map_err(|source| CliError::Image {
                path: path.clone(),
                source,
            })?;
            input = input.with_image(ImageInput::Upload(ImageUpload::from_path_and_bytes(
                &path, bytes,
            )));
        }
        Ok(input)
    }
}

fn parse_id(raw: &str) -> Result<ArticleId, CliError> {
    raw.parse()
        .map_err(|_| CliError::InvalidId(raw.to_string()))
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
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

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => tracing::error!(error = %e, "failed to encode output"),
    }
}

fn print_list(articles: &[Article]) {
    if articles.is_empty() {
        println!("(no articles)");
        return;
    }
    for a in articles {
        println!(
            "{}  {}  {:<20}  {}",
            a.id,
            a.created_at.format("%Y-%m-%d %H:%M"),
            a.author,
            a.title
        );
    }
}

async fn run(cli: Cli, store: &ArticleStore) -> Result<(), CliError> {
    match cli.command {
        Command::List { author } => {
            let filters = ArticleFilters {
                search: None,
                author,
            };
            print_list(&store.filter(&filters).await?);
        }
        Command::Show { id, with_image } => {
            let id = parse_id(&id)?;
            match store.get_by_id(&id).await? {
                Some(mut article) => {
                    if !with_image && article.has_image() {
                        article.image = Some("(embedded)".to_string());
                    }
                    let edited = article.was_edited();
                    print_json(&ArticleView {
                        article: &article,
                        edited,
                    });
                }
                None => return Err(StoreError::NotFound(id).into()),
            }
        }
        Command::Create(args) => {
            let article = store.save(args.into_input()?).await?;
            println!("created {}", article.id);
        }
        Command::Edit {
            id,
            article,
            remove_image,
        } => {
            let id = parse_id(&id)?;
            let mut input = article.into_input()?;
            if remove_image {
                input = input.with_image(ImageInput::Remove);
            }
            let updated = store.update(&id, input).await?;
            println!("updated {} at {}", updated.id, updated.updated_at.to_rfc3339());
        }
        Command::Delete { id } => {
            let id = parse_id(&id)?;
            if store.delete(&id).await? {
                println!("deleted {id}");
            } else {
                println!("{id} was already gone");
            }
        }
        Command::Search { query } => {
            print_list(&store.search(&query).await?);
        }
        Command::Seed => {
            let added = store.initialize_default_news().await?;
            println!("seeded {added} articles");
        }
        Command::Stats => {
            print_json(&store.counts().await?);
        }
    }
    Ok(())
}

fn report(err: &CliError) -> ExitCode {
    match err {
        CliError::Store(e) => match e.kind() {
            ErrorKind::Invalid => {
                eprintln!("the article was not saved:");
                if let Some(errors) = e.validation_errors() {
                    for fe in errors.errors() {
                        eprintln!("  {}: {}", fe.field, fe.reason);
                    }
                }
                ExitCode::from(2)
            }
            ErrorKind::Missing => {
                eprintln!("{e}; it may have been deleted");
                ExitCode::from(3)
            }
            ErrorKind::Infrastructure => {
                eprintln!("storage is unavailable, please try again ({e})");
                ExitCode::from(4)
            }
        },
        CliError::InvalidId(_) => {
            eprintln!("{err}");
            ExitCode::from(3)
        }
        CliError::Image { .. } => {
            eprintln!("{err}");
            ExitCode::from(2)
        }
        CliError::Config(_) => {
            eprintln!("{err}");
            ExitCode::from(1)
        }
    }
}

async fn open_store(config: &StoreConfig) -> Result<ArticleStore, CliError> {
    config
        .validate()
        .map_err(|e| CliError::Config(e.to_string()))?;
    let store = ArticleStoreBuilder::from_config(config)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;
    if config.seed_on_open {
        store.initialize_default_news().await?;
    }
    Ok(store)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = StoreConfig::from_env();
    if let Some(dir) = cli.data_dir.clone() {
        config.data_dir = dir;
    }
    if cli.no_seed || matches!(cli.command, Command::Seed) {
        config.seed_on_open = false;
    }
    config.log_json |= cli.log_json;
    init_tracing(config.log_json);
    tracing::debug!(data_dir = %config.data_dir.display(), key = %config.collection_key, "opening store");

    let result = match open_store(&config).await {
        Ok(store) => run(cli, &store).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn edit_rejects_new_image_together_with_remove_image() {
        let result = Cli::try_parse_from([
            "newsdesk", "edit", "news-x", "--title", "t", "--summary", "s", "--content", "c",
            "--author", "a", "--image", "a.png", "--remove-image",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli = Cli::try_parse_from(["newsdesk", "list", "--no-seed", "--author", "Ana"]).unwrap();
        assert!(cli.no_seed);
        assert!(matches!(cli.command, Command::List { author: Some(ref a) } if a == "Ana"));
    }

    #[test]
    fn invalid_id_is_reported_as_cli_error() {
        assert!(matches!(parse_id("garbage"), Err(CliError::InvalidId(_))));
    }
}
