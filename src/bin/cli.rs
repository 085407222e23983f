//! Course Catalog CLI
//!
//! Browse, filter and export a catalog document, and edit it in place.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use course_catalog::{
    catalog::{CatalogEditor, CatalogStore, NewItem, Query},
    error::{AppError, Result},
    export::CsvExporter,
    models::{Config, ExportColumns, Item, LoggingConfig},
    utils::{get_domain, text},
};

/// Course Catalog - browse and maintain a course catalog
#[derive(Parser, Debug)]
#[command(name = "catalog", version, about = "Course catalog browser")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Catalog document (overrides catalog.path)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Language code for titles and tags (overrides catalog.language)
    #[arg(short, long)]
    lang: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List categories and their subcategories
    Categories,

    /// List every course
    List,

    /// List courses matching the given criteria
    Filter(FilterArgs),

    /// Show one course in full
    Show {
        /// Course id
        id: String,
    },

    /// Export matching courses as CSV
    Export {
        #[command(flatten)]
        filter: FilterArgs,

        /// Output file (default: timestamped file in export.dir)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Column set (default: export.columns)
        #[arg(long, value_enum)]
        columns: Option<ColumnsArg>,
    },

    /// Validate configuration and catalog document
    Validate,

    /// Show catalog summary
    Info,

    /// Edit categories
    #[command(subcommand)]
    Category(CategoryCommand),

    /// Edit courses
    #[command(subcommand)]
    Item(ItemCommand),
}

#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Exact category name
    #[arg(long)]
    category: Option<String>,

    /// Exact subcategory name
    #[arg(long)]
    subcategory: Option<String>,

    /// Case-insensitive text in title, provider or tags
    #[arg(long)]
    text: Option<String>,
}

impl From<FilterArgs> for Query {
    fn from(args: FilterArgs) -> Self {
        Query {
            category: args.category,
            subcategory: args.subcategory,
            text: args.text,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ColumnsArg {
    Basic,
    Full,
}

impl From<ColumnsArg> for ExportColumns {
    fn from(arg: ColumnsArg) -> Self {
        match arg {
            ColumnsArg::Basic => ExportColumns::Basic,
            ColumnsArg::Full => ExportColumns::Full,
        }
    }
}

#[derive(Subcommand, Debug)]
enum CategoryCommand {
    /// Add an empty category
    Add { name: String },

    /// Rename a category and replace its subcategories
    Edit {
        name: String,

        /// New name (default: unchanged)
        #[arg(long)]
        rename: Option<String>,

        /// Subcategories, comma separated
        #[arg(long, value_delimiter = ',')]
        subcategories: Vec<String>,
    },

    /// Delete a category and its courses
    Delete { name: String },
}

#[derive(Subcommand, Debug)]
enum ItemCommand {
    /// Add a course
    Add(ItemArgs),

    /// Replace the fields of a course
    Edit {
        id: String,

        #[command(flatten)]
        values: ItemArgs,
    },

    /// Delete a course
    Delete { id: String },
}

#[derive(Args, Debug)]
struct ItemArgs {
    /// English title
    #[arg(long)]
    title: String,

    #[arg(long)]
    category: String,

    #[arg(long)]
    subcategory: String,

    #[arg(long)]
    provider: Option<String>,

    #[arg(long)]
    link: String,

    /// Tags, comma separated
    #[arg(long, value_delimiter = ',')]
    tags: Vec<String>,
}

impl From<ItemArgs> for NewItem {
    fn from(args: ItemArgs) -> Self {
        NewItem {
            title: args.title,
            category: args.category,
            subcategory: args.subcategory,
            provider: args.provider,
            link: args.link,
            tags: args.tags,
        }
    }
}

const TITLE_WIDTH: usize = 44;
const CATEGORY_WIDTH: usize = 14;
const SUBCATEGORY_WIDTH: usize = 12;

/// Initialize logging. `RUST_LOG` wins over `level`.
fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Default level filter: `debug` when verbose, else the configured level,
/// else the built-in default when the config did not load.
fn log_level(loaded: &Result<Config>, verbose: bool) -> String {
    if verbose {
        return "debug".to_string();
    }
    loaded
        .as_ref()
        .map_or(LoggingConfig::default().level, |config| config.logging.level.clone())
}

fn print_table(items: &[&Item], language: &str) {
    println!(
        "{:<8} {} {} {} PROVIDER",
        "ID",
        text::column("TITLE", TITLE_WIDTH),
        text::column("CATEGORY", CATEGORY_WIDTH),
        text::column("SUBCATEGORY", SUBCATEGORY_WIDTH),
    );
    for item in items {
        println!(
            "{:<8} {} {} {} {}",
            item.id,
            text::column(item.resolve_title(language), TITLE_WIDTH),
            text::column(&item.category, CATEGORY_WIDTH),
            text::column(&item.subcategory, SUBCATEGORY_WIDTH),
            item.provider_or_empty(),
        );
    }
    println!("{} course(s)", items.len());
}

fn open_store(path: &Path, language: &str) -> Result<CatalogStore> {
    let mut store = CatalogStore::with_language(language);
    store.load_from_json(path)?;
    Ok(store)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logger first, so a failed config load is reported
    let loaded = Config::load(&cli.config);
    init_logging(&log_level(&loaded, cli.verbose));

    let mut config = loaded.unwrap_or_else(|e| {
        log::warn!(
            "Config load failed from {}: {}. Using defaults.",
            cli.config.display(),
            e
        );
        Config::default()
    });

    if let Some(path) = cli.catalog {
        config.catalog.path = path;
    }
    if let Some(lang) = cli.lang {
        config.catalog.language = lang;
    }

    let catalog_path = config.catalog.path.clone();
    let language = config.catalog.language.clone();
    log::debug!("Catalog: {}, language: {}", catalog_path.display(), language);

    match cli.command {
        Command::Categories => {
            let store = open_store(&catalog_path, &language)?;
            for category in store.list_categories() {
                println!("{}", category.name);
                for subcategory in &category.subcategories {
                    println!("    {subcategory}");
                }
            }
        }

        Command::List => {
            let store = open_store(&catalog_path, &language)?;
            let items: Vec<&Item> = store.list_all().iter().collect();
            print_table(&items, &language);
        }

        Command::Filter(args) => {
            let store = open_store(&catalog_path, &language)?;
            let items = store.query(&args.into());
            print_table(&items, &language);
        }

        Command::Show { id } => {
            let store = open_store(&catalog_path, &language)?;
            let item = store
                .get(&id)
                .ok_or_else(|| AppError::not_found(format!("course '{id}'")))?;

            println!("Id:          {}", item.id);
            println!("Title:       {}", item.resolve_title(&language));
            println!("Category:    {}", item.category);
            println!("Subcategory: {}", item.subcategory);
            println!("Provider:    {}", item.provider_or_empty());
            println!("Link:        {}", item.link);
            if let Some(domain) = get_domain(&item.link) {
                println!("Domain:      {domain}");
            }
            println!("Tags:        {}", item.resolve_tags(&language).join(", "));
        }

        Command::Export {
            filter,
            output,
            columns,
        } => {
            let store = open_store(&catalog_path, &language)?;
            let items = store.query(&filter.into());
            let columns = columns.map(Into::into).unwrap_or(config.export.columns);
            let exporter = CsvExporter::new(columns, language.as_str());

            let path = match output {
                Some(path) => {
                    exporter.export_to_path(items.iter().copied(), &path)?;
                    path
                }
                None => exporter.export_timestamped(
                    items.iter().copied(),
                    &config.export.dir,
                    "courses",
                )?,
            };
            println!("Exported {} course(s) to {}", items.len(), path.display());
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");

            let store = open_store(&catalog_path, &language)?;
            log::info!(
                "✓ Catalog OK ({} categories, {} courses)",
                store.list_categories().len(),
                store.len()
            );
        }

        Command::Info => {
            println!("Config:   {}", cli.config.display());
            println!("Catalog:  {}", catalog_path.display());
            println!("Language: {}", language);

            let store = open_store(&catalog_path, &language)?;
            println!("Courses:  {}", store.len());
            for category in store.list_categories() {
                let count = store.filter(Some(category.name.as_str()), None, None).len();
                println!("    {:<20} {count}", category.name);
            }
        }

        Command::Category(command) => {
            let mut editor = CatalogEditor::open(&catalog_path, &config.catalog.id_prefix)?;
            match command {
                CategoryCommand::Add { name } => {
                    editor.add_category(&name)?;
                    println!("Added category '{name}'");
                }
                CategoryCommand::Edit {
                    name,
                    rename,
                    subcategories,
                } => {
                    let new_name = rename.unwrap_or_else(|| name.clone());
                    editor.edit_category(&name, &new_name, &subcategories)?;
                    println!("Updated category '{new_name}'");
                }
                CategoryCommand::Delete { name } => {
                    let removed = editor.delete_category(&name)?;
                    println!("Deleted category '{name}' and {removed} course(s)");
                }
            }
            editor.save()?;
        }

        Command::Item(command) => {
            let mut editor = CatalogEditor::open(&catalog_path, &config.catalog.id_prefix)?;
            match command {
                ItemCommand::Add(args) => {
                    let id = editor.add_item(&args.into())?;
                    println!("Added course {id}");
                }
                ItemCommand::Edit { id, values } => {
                    editor.edit_item(&id, &values.into())?;
                    println!("Updated course {id}");
                }
                ItemCommand::Delete { id } => {
                    editor.delete_item(&id)?;
                    println!("Deleted course {id}");
                }
            }
            editor.save()?;
        }
    }

    Ok(())
}
