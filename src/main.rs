use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use notion_locator::config::NotionConfig;
use notion_locator::locator::{self, LocatorConfig, DEFAULT_DEPTH_LIMIT};
use notion_locator::models::{BlockId, BlockKind};
use notion_locator::notion::NotionClient;
use notion_locator::tree_render;
use notion_locator::updater::{date_header, key_message, news};

#[derive(Parser)]
#[command(name = "nloc")]
#[command(about = "Locate and update callout blocks on a Notion page")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct PageArgs {
    /// Page ID or URL (defaults to NOTION_PAGE_ID)
    #[arg(short, long)]
    page: Option<BlockId>,
}

#[derive(Args)]
struct SearchArgs {
    /// Phrase identifying the content block (repeatable)
    #[arg(long = "phrase")]
    phrases: Vec<String>,

    /// Block kinds accepted as header, in priority order (repeatable)
    #[arg(long = "header-kind", default_value = "callout")]
    header_kinds: Vec<String>,

    /// Levels below the page searched for the container callout
    #[arg(short, long, default_value_t = DEFAULT_DEPTH_LIMIT)]
    depth: usize,

    /// Fail on fetch errors instead of treating them as empty
    #[arg(long)]
    strict: bool,
}

impl SearchArgs {
    fn to_config(&self) -> LocatorConfig {
        let config = LocatorConfig::default()
            .with_phrases(self.phrases.iter().cloned())
            .with_depth_limit(self.depth)
            .with_header_kinds(
                self.header_kinds
                    .iter()
                    .map(|k| BlockKind::from_tag(k))
                    .collect(),
            );
        if self.strict {
            config.strict()
        } else {
            config
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the container, header and content block IDs as JSON
    Locate {
        #[command(flatten)]
        page: PageArgs,
        #[command(flatten)]
        search: SearchArgs,
    },
    /// Print the page's block tree
    Tree {
        #[command(flatten)]
        page: PageArgs,
        #[arg(short, long, default_value_t = DEFAULT_DEPTH_LIMIT)]
        depth: usize,
    },
    /// Publish a headline into the page's news card
    News {
        #[command(flatten)]
        page: PageArgs,
        #[command(flatten)]
        search: SearchArgs,
        /// Headline text
        #[arg(long)]
        title: String,
        /// Article URL
        #[arg(long)]
        link: String,
    },
    /// Rewrite the date line with today's date (KST)
    DateHeader {
        #[command(flatten)]
        page: PageArgs,
        /// Block to patch when no date line is found
        #[arg(long)]
        fallback: Option<BlockId>,
    },
    /// Write a message into the first paragraph of a callout
    KeyMessage {
        /// Callout block ID
        #[arg(short, long)]
        block: BlockId,
        /// Message text; newlines become stacked lines
        #[arg(short, long)]
        text: String,
    },
}

/// Initialize tracing on stderr so stdout carries only command output.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "notion_locator=info,nloc=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn resolve_page(args: PageArgs, config: &NotionConfig) -> anyhow::Result<BlockId> {
    args.page
        .or_else(|| config.default_page.clone())
        .ok_or_else(|| anyhow::anyhow!("No page given: pass --page or set NOTION_PAGE_ID"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = NotionConfig::from_env()?;
    let client = NotionClient::new(&config)?;

    match cli.command {
        Commands::Locate { page, search } => {
            let page_id = resolve_page(page, &config)?;
            let result = locator::locate(&client, &page_id, &search.to_config()).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Tree { page, depth } => {
            let page_id = resolve_page(page, &config)?;
            let nodes = tree_render::fetch_tree(&client, &page_id, depth).await?;
            print!(
                "{}",
                tree_render::render_tree(&format!("page {}", page_id), &nodes)
            );
        }
        Commands::News {
            page,
            search,
            title,
            link,
        } => {
            let page_id = resolve_page(page, &config)?;
            let item = news::NewsItem { title, link };
            match news::update_daily_news(&client, &page_id, &search.to_config(), &item).await? {
                Some(report) => println!("{}", serde_json::to_string_pretty(&report)?),
                None => anyhow::bail!("Could not find main callout on page {}", page_id),
            }
        }
        Commands::DateHeader { page, fallback } => {
            let page_id = resolve_page(page, &config)?;
            let change = date_header::update_date_header(
                &client,
                &page_id,
                fallback.as_ref(),
                date_header::kst_now(),
            )
            .await?;
            match change {
                Some(change) => println!("{}", serde_json::to_string_pretty(&change)?),
                None => anyhow::bail!("Date block not found on page {}", page_id),
            }
        }
        Commands::KeyMessage { block, text } => {
            let change = key_message::update_key_message(&client, &block, &text).await?;
            println!("{}", serde_json::to_string_pretty(&change)?);
        }
    }

    Ok(())
}
