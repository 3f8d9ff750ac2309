use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tourmap_browse::PaginationController;
use tourmap_client::TourClient;
use tourmap_core::{load_app_config, ContentType, FilterContext, SortOrder, TourItem};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "tourmap")]
#[command(about = "Browse the national tourism catalogue from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List items for an area, optionally narrowed by keyword and category.
    Search {
        /// Keyword to search for; omit to browse by area only.
        #[arg(long)]
        keyword: Option<String>,
        /// Upstream area code (for example 1 for Seoul).
        #[arg(long)]
        area: Option<String>,
        /// Category code (12, 14, 15, 25, 28, 32, 38, 39); repeatable.
        #[arg(long = "category")]
        categories: Vec<String>,
        /// Sort order: "recent" or "name".
        #[arg(long, default_value = "recent")]
        sort: String,
        /// Number of pages to fetch.
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Per-category item counts, optionally scoped to an area.
    Stats {
        #[arg(long)]
        area: Option<String>,
    },
    /// Full detail for one item.
    Detail {
        content_id: String,
        /// Category code of the item, needed for operating information.
        #[arg(long)]
        category: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = load_app_config().context("loading configuration")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    let client = Arc::new(TourClient::new(&config).context("constructing API client")?);

    let cli = Cli::parse();
    match cli.command {
        Commands::Search {
            keyword,
            area,
            categories,
            sort,
            pages,
        } => {
            let context = FilterContext {
                area_code: area,
                content_types: parse_categories(&categories)?,
                keyword,
                sort: parse_sort(&sort)?,
            };
            run_search(client, config.page_size, context, pages).await?;
        }
        Commands::Stats { area } => run_stats(&client, area.as_deref()).await,
        Commands::Detail {
            content_id,
            category,
        } => {
            let category = category.as_deref().map(parse_category).transpose()?;
            run_detail(&client, &content_id, category).await?;
        }
    }

    Ok(())
}

fn parse_category(code: &str) -> anyhow::Result<ContentType> {
    ContentType::from_code(code)
        .with_context(|| format!("unknown category code: {code}"))
}

fn parse_categories(codes: &[String]) -> anyhow::Result<Vec<ContentType>> {
    codes.iter().map(|code| parse_category(code)).collect()
}

fn parse_sort(sort: &str) -> anyhow::Result<SortOrder> {
    match sort {
        "recent" => Ok(SortOrder::Recent),
        "name" => Ok(SortOrder::Name),
        other => anyhow::bail!("unknown sort order: {other} (expected recent or name)"),
    }
}

async fn run_search(
    client: Arc<TourClient>,
    page_size: u32,
    context: FilterContext,
    pages: u32,
) -> anyhow::Result<()> {
    let controller = PaginationController::new(client, page_size);
    controller
        .reset(context)
        .await
        .context("loading first page")?;
    for _ in 1..pages {
        if controller.snapshot().exhausted {
            break;
        }
        controller.load_next().await.context("loading next page")?;
    }

    let snapshot = controller.snapshot();
    for item in &snapshot.items {
        print_item_line(item);
    }
    match snapshot.total_count {
        Some(total) => println!("-- {} of {total} items", snapshot.items.len()),
        None => println!("-- {} items", snapshot.items.len()),
    }
    Ok(())
}

fn print_item_line(item: &TourItem) {
    let position = match item.geo_point() {
        Some(point) => format!("{:.5},{:.5}", point.lat, point.lng),
        None => "no position".to_owned(),
    };
    println!(
        "{}  [{}]  {}  ({position})",
        item.id,
        item.category.label(),
        item.title
    );
}

async fn run_stats(client: &TourClient, area: Option<&str>) {
    let counts = client.category_counts(area).await;
    if counts.is_empty() {
        println!("no counts available");
        return;
    }
    for (category, count) in counts {
        println!("{:<20} {count}", category.label());
    }
}

async fn run_detail(
    client: &TourClient,
    content_id: &str,
    category: Option<ContentType>,
) -> anyhow::Result<()> {
    let common = client
        .detail_common(content_id)
        .await
        .context("fetching common detail")?;
    let Some(common) = common else {
        println!("no item with id {content_id}");
        return Ok(());
    };

    println!("{}", common.title);
    if !common.addr1.is_empty() {
        println!("address: {}", common.addr1);
    }
    if !common.overview.is_empty() {
        println!("\n{}", common.overview);
    }

    if let Some(category) = category {
        if let Some(intro) = client
            .detail_intro(content_id, category)
            .await
            .context("fetching operating information")?
        {
            if !intro.use_time.is_empty() {
                println!("hours: {}", intro.use_time);
            }
            if !intro.rest_date.is_empty() {
                println!("closed: {}", intro.rest_date);
            }
            if !intro.parking.is_empty() {
                println!("parking: {}", intro.parking);
            }
        }
    }

    if let Some(access) = client
        .detail_accessibility(content_id)
        .await
        .context("fetching accessibility detail")?
    {
        if !access.wheelchair.is_empty() {
            println!("wheelchair: {}", access.wheelchair);
        }
        if !access.elevator.is_empty() {
            println!("elevator: {}", access.elevator);
        }
        if !access.braille_block.is_empty() {
            println!("braille block: {}", access.braille_block);
        }
        if !access.guide_dog.is_empty() {
            println!("guide dog: {}", access.guide_dog);
        }
    }

    let images = client
        .detail_images(content_id)
        .await
        .context("fetching images")?;
    if !images.is_empty() {
        println!("\nimages:");
        for image in images {
            println!("  {}", image.origin_img_url);
        }
    }

    Ok(())
}
