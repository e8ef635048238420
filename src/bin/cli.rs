use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use shopfront_store::catalog_view::{self, ProductQuery, SortOrder};
use shopfront_store::checkout;
use shopfront_store::config::Config;
use shopfront_store::engine;
use shopfront_store::services::StaticCatalog;
use shopfront_store::slices::{
    CartAction, CartItem, CatalogAction, FavoritesAction, HistoryAction, ThemeAction,
};
use shopfront_store::store::Store;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Overrides SHOPFRONT_DATA_DIR.
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Overrides SHOPFRONT_NAMESPACE.
    #[arg(short, long)]
    namespace: Option<String>,

    /// JSON catalog file of the form {"products": [...]}.
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Clone)]
enum Commands {
    #[command(subcommand)]
    Cart(CartCommand),
    #[command(subcommand)]
    Likes(LikesCommand),
    #[command(subcommand)]
    Compare(CompareCommand),
    #[command(subcommand)]
    History(HistoryCommand),
    #[command(subcommand)]
    Theme(ThemeCommand),
    #[command(subcommand)]
    Catalog(CatalogCommand),
    Checkout,
    Dump,
}

#[derive(Subcommand, Clone)]
enum CartCommand {
    Show,
    Add {
        id: u64,
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    Inc { id: u64 },
    Dec { id: u64 },
    Remove { id: u64 },
    Clear,
}

#[derive(Subcommand, Clone)]
enum LikesCommand {
    List,
    Toggle { id: u64 },
    Clear,
}

#[derive(Subcommand, Clone)]
enum CompareCommand {
    List,
    Add { id: u64 },
    Max { n: usize },
    Clear,
}

#[derive(Subcommand, Clone)]
enum HistoryCommand {
    List,
    View { id: u64 },
    Remove { id: u64 },
    Clear,
}

#[derive(Subcommand, Clone)]
enum ThemeCommand {
    Show,
    Toggle,
    Set {
        #[arg(action = clap::ArgAction::Set)]
        dark: bool,
    },
}

#[derive(Subcommand, Clone)]
enum CatalogCommand {
    Search {
        #[arg(default_value = "")]
        query: String,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        min_price: Option<f64>,
        #[arg(long)]
        max_price: Option<f64>,
        #[arg(long, value_enum, default_value_t = Sort::Relevance)]
        sort: Sort,
        /// Number of result pages of 8 to show.
        #[arg(long, default_value_t = 1)]
        pages: usize,
    },
    Facets,
}

#[derive(ValueEnum, Clone, Copy)]
enum Sort {
    Relevance,
    PriceAsc,
    PriceDesc,
    Rating,
    Title,
}

impl From<Sort> for SortOrder {
    fn from(sort: Sort) -> Self {
        match sort {
            Sort::Relevance => SortOrder::Relevance,
            Sort::PriceAsc => SortOrder::PriceAsc,
            Sort::PriceDesc => SortOrder::PriceDesc,
            Sort::Rating => SortOrder::RatingDesc,
            Sort::Title => SortOrder::TitleAsc,
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(namespace) = cli.namespace {
        config.namespace = namespace;
    }

    let mut builder = Store::builder().mirror(engine::open(&config)?);
    if let Some(path) = &cli.catalog {
        builder = builder.catalog(Arc::new(StaticCatalog::from_file(path)?));
    }
    let store = builder.build();

    match cli.command {
        Commands::Cart(cmd) => {
            match cmd {
                CartCommand::Show => {}
                CartCommand::Add { id, quantity } => {
                    let product = store.product(id).await?;
                    store.dispatch(CartAction::Add(CartItem::from_product(&product, quantity)));
                }
                CartCommand::Inc { id } => store.dispatch(CartAction::Increase(id)),
                CartCommand::Dec { id } => store.dispatch(CartAction::Decrease(id)),
                CartCommand::Remove { id } => store.dispatch(CartAction::Remove(id)),
                CartCommand::Clear => store.dispatch(CartAction::Clear),
            }
            let cart = store.select(|s| s.cart.clone());
            print_json(&cart.items)?;
            println!("{} items, total {:.2}", cart.item_count(), cart.total());
        }
        Commands::Likes(cmd) => {
            match cmd {
                LikesCommand::List => {}
                LikesCommand::Toggle { id } => store.dispatch(FavoritesAction::ToggleLike(id)),
                LikesCommand::Clear => store.dispatch(FavoritesAction::ClearAllLikes),
            }
            print_json(&store.select(|s| s.likes.liked_products.clone()))?;
        }
        Commands::Compare(cmd) => {
            match cmd {
                CompareCommand::List => {}
                CompareCommand::Add { id } => store.dispatch(FavoritesAction::AddToCompare(id)),
                CompareCommand::Max { n } => store.dispatch(FavoritesAction::SetMaxCompareItems(n)),
                CompareCommand::Clear => store.dispatch(FavoritesAction::ClearAllCompares),
            }
            let likes = store.select(|s| s.likes.clone());
            print_json(&likes.compared_products)?;
            println!("{} of {} slots used", likes.compared_products.len(), likes.max_compare_items);
        }
        Commands::History(cmd) => {
            match cmd {
                HistoryCommand::List => {}
                HistoryCommand::View { id } => {
                    store.open_product(id).await?;
                }
                HistoryCommand::Remove { id } => store.dispatch(HistoryAction::Remove(id)),
                HistoryCommand::Clear => store.dispatch(HistoryAction::Clear),
            }
            for product in store.select(|s| s.product_history.viewed_products.clone()) {
                println!("{:>5}  {}", product.id, product.title);
            }
        }
        Commands::Theme(cmd) => {
            match cmd {
                ThemeCommand::Show => {}
                ThemeCommand::Toggle => store.dispatch(ThemeAction::Toggle),
                ThemeCommand::Set { dark } => store.dispatch(ThemeAction::Set(dark)),
            }
            let dark = store.select(|s| s.theme.dark_mode);
            println!("{}", if dark { "dark" } else { "light" });
        }
        Commands::Catalog(cmd) => {
            store.fetch_all_products().await?;
            match cmd {
                CatalogCommand::Search { query, category, min_price, max_price, sort, pages } => {
                    store.dispatch(CatalogAction::SetSearchQuery(query));
                    for _ in 1..pages.max(1) {
                        store.dispatch(CatalogAction::IncreaseLimit);
                    }
                    let state = store.select(|s| s.products.clone());
                    let filter = ProductQuery {
                        category,
                        min_price,
                        max_price,
                        sort: sort.into(),
                    };
                    let products = catalog_view::apply(&state.filtered_products, &filter);
                    for product in catalog_view::page(&products, state.limit) {
                        println!("{:>5}  {:<40} {:>10.2}", product.id, product.title, product.discounted_price());
                    }
                    println!("{} of {} matching products", state.limit.min(products.len()), products.len());
                }
                CatalogCommand::Facets => {
                    let products = store.select(|s| s.products.products.clone());
                    print_json(&catalog_view::categories(&products))?;
                }
            }
        }
        Commands::Checkout => {
            print_json(&checkout::place_order(&store)?)?;
        }
        Commands::Dump => {
            print_json(&store.state())?;
        }
    }

    Ok(())
}
