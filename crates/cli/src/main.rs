mod output;

use anyhow::Context;
use clap::{Parser, Subcommand};
use dialoguer::Confirm;
use ntn_core::payloads::{block_text_update, parse_block_payload, parse_filter, TaskProperties};
use ntn_core::{
    append_page_content, clear_page_content, get_page_content, query_database,
    replace_page_content, to_blocks, BlockStore, CoreConfig, NotionClient, NotionId, SearchFilter,
};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ntn")]
#[command(about = "Notion workspace CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search pages and databases
    Search {
        /// Search query
        query: String,
        /// Only return objects of this type: page or database
        #[arg(long = "type", short = 't', value_parser = SearchFilter::from_str)]
        kind: Option<SearchFilter>,
        /// Maximum number of results
        #[arg(long, short = 'l')]
        limit: Option<usize>,
    },
    /// Database operations
    #[command(subcommand)]
    Db(DbCommands),
    /// Page operations
    #[command(subcommand)]
    Page(PageCommands),
    /// Block operations
    #[command(subcommand)]
    Block(BlockCommands),
    /// Task operations
    #[command(subcommand)]
    Task(TaskCommands),
}

#[derive(Subcommand)]
enum DbCommands {
    /// List all databases shared with the integration
    List,
    /// Query a database
    Query {
        /// Database ID or URL
        database_id: String,
        /// Maximum number of rows
        #[arg(long, short = 'l', default_value_t = 50)]
        limit: usize,
        /// Filter object as JSON
        #[arg(long)]
        filter: Option<String>,
    },
}

#[derive(Subcommand)]
enum PageCommands {
    /// Show a page and its content
    Get {
        /// Page ID or URL
        page_id: String,
    },
    /// Append markdown to the end of a page
    Append {
        /// Page ID or URL
        page_id: String,
        /// Markdown file to append
        #[arg(long, short = 'f')]
        file: PathBuf,
    },
    /// Replace a page's content with markdown
    Update {
        /// Page ID or URL
        page_id: String,
        /// Markdown file to use as content
        #[arg(long, short = 'f')]
        file: PathBuf,
        /// Append instead of clearing existing content first
        #[arg(long)]
        no_clear: bool,
    },
    /// Delete all content from a page
    Clear {
        /// Page ID or URL
        page_id: String,
        /// Skip confirmation
        #[arg(long, short = 'f')]
        force: bool,
    },
}

#[derive(Subcommand)]
enum BlockCommands {
    /// Show a single block as JSON
    Get {
        /// Block ID
        block_id: String,
    },
    /// Replace a block's text or send a raw update
    Update {
        /// Block ID
        block_id: String,
        /// New text content; inline markdown is applied
        #[arg(long, short = 'c', conflicts_with = "json", required_unless_present = "json")]
        content: Option<String>,
        /// Raw JSON update, e.g. '{"paragraph": {"rich_text": [...]}}'
        #[arg(long, short = 'j')]
        json: Option<String>,
    },
    /// Delete a single block
    Delete {
        /// Block ID
        block_id: String,
        /// Skip confirmation
        #[arg(long, short = 'f')]
        force: bool,
    },
}

#[derive(Subcommand)]
enum TaskCommands {
    /// Create a task row in a database
    Create {
        /// Task title
        title: String,
        /// Database ID to create the task in
        #[arg(long = "db", short = 'd')]
        database_id: String,
        /// Task status
        #[arg(long, short = 's')]
        status: Option<String>,
    },
    /// Update a task's title or status
    Update {
        /// Task page ID
        page_id: String,
        /// New status
        #[arg(long, short = 's')]
        status: Option<String>,
        /// New title
        #[arg(long, short = 't')]
        title: Option<String>,
        /// Database ID, used to find the title property
        #[arg(long = "db", short = 'd')]
        database_id: Option<String>,
    },
}

/// Entry point for the `ntn` command line.
///
/// # Environment Variables
/// - `NOTION_TOKEN`: integration token (required)
/// - `NOTION_API_URL`: API base URL (default: "https://api.notion.com/v1")
/// - `NOTION_VERSION`: API version header (default: "2022-06-28")
/// - `RUST_LOG`: log filter (default: "ntn=warn")
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ntn=warn,ntn_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("Use 'ntn --help' for commands");
        return Ok(());
    };

    let config = CoreConfig::from_values(
        std::env::var("NOTION_TOKEN").ok(),
        std::env::var("NOTION_API_URL").ok(),
        std::env::var("NOTION_VERSION").ok(),
    )?;
    let client = NotionClient::new(config)?;
    tracing::debug!(api = client.config().api_base_url(), "client ready");

    match command {
        Commands::Search { query, kind, limit } => {
            let results = client.search(&query, kind, limit).await?;
            println!("{}", output::search_results(&results));
        }
        Commands::Db(command) => run_db(&client, command).await?,
        Commands::Page(command) => run_page(&client, command).await?,
        Commands::Block(command) => run_block(&client, command).await?,
        Commands::Task(command) => run_task(&client, command).await?,
    }

    Ok(())
}

async fn run_db(client: &NotionClient, command: DbCommands) -> anyhow::Result<()> {
    match command {
        DbCommands::List => {
            let databases = client.list_databases().await?;
            println!("{}", output::databases(&databases));
        }
        DbCommands::Query {
            database_id,
            limit,
            filter,
        } => {
            let database_id = NotionId::parse(&database_id)?;
            let filter = filter.as_deref().map(parse_filter).transpose()?;
            let schema = client.get_database(&database_id).await?;
            let rows = query_database(client, &database_id, filter.as_ref(), Some(limit)).await?;
            println!("{}", output::database_rows(&rows, &schema));
        }
    }
    Ok(())
}

async fn run_page(client: &NotionClient, command: PageCommands) -> anyhow::Result<()> {
    match command {
        PageCommands::Get { page_id } => {
            let page_id = NotionId::parse(&page_id)?;
            let page = client.get_page(&page_id).await?;
            let content = get_page_content(client, &page_id, None).await?;
            println!("{}", output::page(&page, &content));
        }
        PageCommands::Append { page_id, file } => {
            let page_id = NotionId::parse(&page_id)?;
            let blocks = to_blocks(&read_markdown(&file)?);
            let added = append_page_content(client, &page_id, &blocks).await?;
            println!("Appended {} blocks", added);
            println!("View at: {}", page_id.page_url());
        }
        PageCommands::Update {
            page_id,
            file,
            no_clear,
        } => {
            let page_id = NotionId::parse(&page_id)?;
            let blocks = to_blocks(&read_markdown(&file)?);
            println!("Parsed {} blocks from markdown", blocks.len());
            if no_clear {
                let added = append_page_content(client, &page_id, &blocks).await?;
                println!("Appended {} blocks", added);
            } else {
                let outcome = replace_page_content(client, &page_id, &blocks).await?;
                println!(
                    "Replaced content: deleted {}, added {} blocks",
                    outcome.deleted, outcome.added
                );
            }
            println!("View at: {}", page_id.page_url());
        }
        PageCommands::Clear { page_id, force } => {
            let page_id = NotionId::parse(&page_id)?;
            if !force && !confirm(&format!("Clear all content from page {}?", page_id))? {
                println!("Cancelled");
                return Ok(());
            }
            let deleted = clear_page_content(client, &page_id).await?;
            println!("Deleted {} blocks", deleted);
        }
    }
    Ok(())
}

async fn run_block(client: &NotionClient, command: BlockCommands) -> anyhow::Result<()> {
    match command {
        BlockCommands::Get { block_id } => {
            let block = client.get_block(&NotionId::parse(&block_id)?).await?;
            println!("{}", output::json(&block));
        }
        BlockCommands::Update {
            block_id,
            content,
            json,
        } => {
            let block_id = NotionId::parse(&block_id)?;
            let payload = match (json, content) {
                (Some(raw), _) => parse_block_payload(&raw)?,
                (None, Some(content)) => {
                    let current = client.get_block(&block_id).await?;
                    let kind = current
                        .get("type")
                        .and_then(serde_json::Value::as_str)
                        .unwrap_or_default();
                    block_text_update(kind, &content)?
                }
                (None, None) => anyhow::bail!("either --content or --json is required"),
            };
            let updated = client.update_block(&block_id, &payload).await?;
            println!("Block updated");
            println!("{}", output::json(&updated));
        }
        BlockCommands::Delete { block_id, force } => {
            let block_id = NotionId::parse(&block_id)?;
            if !force && !confirm(&format!("Delete block {}?", block_id))? {
                println!("Cancelled");
                return Ok(());
            }
            client.delete_item(&block_id.to_string()).await?;
            println!("Block deleted");
        }
    }
    Ok(())
}

async fn run_task(client: &NotionClient, command: TaskCommands) -> anyhow::Result<()> {
    match command {
        TaskCommands::Create {
            title,
            database_id,
            status,
        } => {
            let database_id = NotionId::parse(&database_id)?;
            let title_property = client.get_title_property_name(&database_id).await?;
            let mut properties = TaskProperties::new().title(&title_property, &title);
            if let Some(status) = status.as_deref() {
                properties = properties.status(status);
            }
            let created = client
                .create_page(&database_id, properties.into_value(), &[])
                .await?;
            println!(
                "Task created: {}",
                created.get("id").and_then(serde_json::Value::as_str).unwrap_or_default()
            );
        }
        TaskCommands::Update {
            page_id,
            status,
            title,
            database_id,
        } => {
            let page_id = NotionId::parse(&page_id)?;
            let mut properties = TaskProperties::new();
            if let Some(title) = title.as_deref() {
                let title_property = match database_id.as_deref() {
                    Some(id) => client.get_title_property_name(&NotionId::parse(id)?).await?,
                    None => ntn_core::constants::FALLBACK_TITLE_PROPERTY.to_string(),
                };
                properties = properties.title(&title_property, title);
            }
            if let Some(status) = status.as_deref() {
                properties = properties.status(status);
            }
            if properties.is_empty() {
                println!("No changes specified.");
                return Ok(());
            }
            client.update_page(&page_id, &properties.into_value()).await?;
            println!("Task updated: {}", page_id);
        }
    }
    Ok(())
}

fn read_markdown(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read markdown file {}", path.display()))
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_page_update_flags() {
        let cli = Cli::try_parse_from([
            "ntn", "page", "update", "abc", "--file", "notes.md", "--no-clear",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Page(PageCommands::Update { no_clear, file, .. })) => {
                assert!(no_clear);
                assert_eq!(file, PathBuf::from("notes.md"));
            }
            _ => panic!("expected page update"),
        }
    }

    #[test]
    fn test_block_update_requires_content_or_json() {
        assert!(Cli::try_parse_from(["ntn", "block", "update", "abc"]).is_err());
        assert!(Cli::try_parse_from([
            "ntn", "block", "update", "abc", "--content", "x", "--json", "{}"
        ])
        .is_err());
        assert!(Cli::try_parse_from(["ntn", "block", "update", "abc", "--json", "{}"]).is_ok());
    }

    #[test]
    fn test_db_query_default_limit() {
        let cli = Cli::try_parse_from(["ntn", "db", "query", "abc"]).unwrap();
        match cli.command {
            Some(Commands::Db(DbCommands::Query { limit, filter, .. })) => {
                assert_eq!(limit, 50);
                assert!(filter.is_none());
            }
            _ => panic!("expected db query"),
        }
    }

    #[test]
    fn test_search_type_parses_into_filter() {
        let cli = Cli::try_parse_from(["ntn", "search", "roadmap", "--type", "database"]).unwrap();
        match cli.command {
            Some(Commands::Search { kind, .. }) => assert_eq!(kind, Some(SearchFilter::Database)),
            _ => panic!("expected search"),
        }
        assert!(Cli::try_parse_from(["ntn", "search", "roadmap", "--type", "user"]).is_err());
    }
}
