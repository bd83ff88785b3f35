use anyhow::{bail, Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use frontrunner::api::HttpTransport;
use frontrunner::config;
use frontrunner::forms::registration::Registration;
use frontrunner::forms::{DeleteOutcome, EntityForm, LoginForm, RegistrationForm, SubmitError};
use frontrunner::model::{ProductDraft, StoreType};
use frontrunner::nav;
use frontrunner::shell::{CliNavigator, Route, TerminalDialogs};
use frontrunner::views::products::fetch_product_image;
use frontrunner::views::{Home, OrdersView, ProductsView, StorefrontsView};
use frontrunner::widgets;

#[derive(Debug, Parser)]
#[command(author, version, about = "Manage FrontRunner products, storefront links and orders")]
struct Args {
    /// Path to YAML config file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Answer yes to every confirmation prompt
    #[arg(long, short = 'y')]
    yes: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Log in and keep the session for later commands
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and log in
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "")]
        business_name: String,
    },
    Logout,
    /// Dashboard preview of products, storefronts and orders
    Home,
    /// Open a menu section by path, e.g. /products
    Open {
        path: String,
    },
    #[command(subcommand)]
    Products(ProductsCommand),
    #[command(subcommand)]
    Storefronts(StorefrontsCommand),
    Orders {
        /// Show one order in detail
        #[arg(long)]
        order: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
enum ProductsCommand {
    List,
    /// Download a product image
    Image {
        path: String,
        #[arg(long)]
        out: PathBuf,
    },
    Add(ProductFields),
    Update {
        id: u64,
        #[command(flatten)]
        fields: ProductFields,
    },
    Delete {
        id: u64,
    },
}

#[derive(Debug, ClapArgs)]
struct ProductFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    description: Option<String>,
    /// Price in dollars, e.g. $12.99
    #[arg(long)]
    price: Option<String>,
    #[arg(long)]
    count: Option<String>,
    /// Repeatable; a leading '#' is added when missing
    #[arg(long = "tag")]
    tags: Vec<String>,
    /// Image file to upload
    #[arg(long)]
    image: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum StorefrontsCommand {
    List,
    Add {
        #[arg(long, default_value = "amazon")]
        store_type: StoreType,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long)]
        api_key: String,
        #[arg(long)]
        api_secret: String,
        #[arg(long, default_value = "")]
        store_id: String,
        #[arg(long, default_value = "")]
        store_url: String,
    },
    Update {
        id: u64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        store_id: Option<String>,
        #[arg(long)]
        store_url: Option<String>,
    },
    Delete {
        id: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let cfg = config::load(Some(&args.config))?;
    cfg.ensure_dirs()?;

    let api = HttpTransport::from_config(&cfg)?;
    let navigator = CliNavigator::default();
    let dialogs = TerminalDialogs { assume_yes: args.yes };

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupted; cancelling pending request");
            on_interrupt.cancel();
        }
    });

    let ctx = Ctx {
        api: &api,
        navigator: &navigator,
        dialogs: &dialogs,
        cancel: &cancel,
    };
    let result = match args.command {
        Command::Login { email, password } => login(&ctx, email, password).await,
        Command::Register {
            email,
            password,
            business_name,
        } => register(&ctx, email, password, business_name).await,
        Command::Logout => {
            nav::logout(ctx.api, ctx.navigator, ctx.cancel).await;
            print_route(&navigator);
            Ok(())
        }
        Command::Home => home(&ctx).await,
        Command::Open { path } => open(&ctx, &path).await,
        Command::Products(cmd) => products(&ctx, cmd).await,
        Command::Storefronts(cmd) => storefronts(&ctx, cmd).await,
        Command::Orders { order } => orders(order),
    };
    if let Err(err) = &result {
        error!(?err, "command failed");
    }
    result
}

struct Ctx<'a> {
    api: &'a HttpTransport,
    navigator: &'a CliNavigator,
    dialogs: &'a TerminalDialogs,
    cancel: &'a CancellationToken,
}

fn print_route(navigator: &CliNavigator) {
    if let Some(route) = navigator.current() {
        println!("-> {route}");
    }
}

/// Print per-field problems before handing the error back.
fn report(err: SubmitError) -> anyhow::Error {
    if let SubmitError::Validation(errors) = &err {
        for (field, message) in errors.iter() {
            println!("  {field}: {message}");
        }
    }
    err.into()
}

async fn login(ctx: &Ctx<'_>, email: String, password: String) -> Result<()> {
    let mut form = LoginForm::new(email, password);
    form.submit(ctx.api, ctx.navigator, ctx.dialogs, ctx.cancel)
        .await
        .map_err(report)?;
    println!("Logged in.");
    print_route(ctx.navigator);
    Ok(())
}

async fn register(
    ctx: &Ctx<'_>,
    email: String,
    password: String,
    business_name: String,
) -> Result<()> {
    let mut form = RegistrationForm::new(Registration {
        email,
        password,
        business_name,
    });
    let result = form.submit(ctx.api, ctx.navigator, ctx.dialogs, ctx.cancel).await;
    print_route(ctx.navigator);
    result.map_err(report)?;
    println!("Account created.");
    Ok(())
}

fn print_menu() {
    let labels: Vec<&str> = nav::NAV_LINKS.iter().map(|l| l.label).collect();
    println!("{}", labels.join(" | "));
}

async fn open(ctx: &Ctx<'_>, path: &str) -> Result<()> {
    let Some(route) = Route::from_path(path) else {
        bail!("unknown page {path}");
    };
    let Some(link) = nav::NAV_LINKS.iter().find(|l| l.route == route) else {
        bail!("{path} is not in the menu");
    };
    nav::follow(ctx.navigator, link);
    print_route(ctx.navigator);
    match route {
        Route::Home => home(ctx).await,
        Route::Products => products(ctx, ProductsCommand::List).await,
        Route::Storefronts => storefronts(ctx, StorefrontsCommand::List).await,
        Route::Orders => orders(None),
        _ => {
            println!("{}: nothing to configure yet.", link.label);
            Ok(())
        }
    }
}

async fn home(ctx: &Ctx<'_>) -> Result<()> {
    let home = Home::load(ctx.api, ctx.cancel).await;
    print_menu();
    println!("My Products");
    if home.products.is_empty() {
        println!("  (none)");
    }
    for p in &home.products {
        println!("  [{}] {}", p.id, p.name);
    }
    println!("My Storefronts");
    if home.storefronts.is_empty() {
        println!("  (none)");
    }
    for s in &home.storefronts {
        println!("  [{}] {}", s.id, s.display_name());
    }
    println!("My Orders");
    for o in &home.orders {
        println!("  {} {} {} {}", o.order_no, o.products, o.total, o.status.as_str());
    }
    Ok(())
}

async fn apply_product_fields(draft: &mut ProductDraft, fields: ProductFields) -> Result<()> {
    if let Some(name) = fields.name {
        draft.name = name;
    }
    if let Some(description) = fields.description {
        draft.description = description;
    }
    if let Some(price) = fields.price {
        draft.price = price;
    }
    if let Some(count) = fields.count {
        draft.count = count;
    }
    if !fields.tags.is_empty() {
        draft.tags = widgets::tags_from_words(&fields.tags);
    }
    if let Some(path) = fields.image {
        draft.image = widgets::image_from_file(&path).await?;
    }
    Ok(())
}

fn print_products(view: &ProductsView) {
    if let Some(empty) = view.empty_state() {
        println!("{} {}", empty.message, empty.action);
        return;
    }
    for tile in view.tiles() {
        println!(
            "[{}] {} {} (x{}) {}",
            tile.id,
            tile.name,
            tile.price,
            tile.count,
            tile.image.as_deref().unwrap_or("-")
        );
        if !tile.description.is_empty() {
            println!("      {}", tile.description);
        }
    }
}

async fn products(ctx: &Ctx<'_>, cmd: ProductsCommand) -> Result<()> {
    if let ProductsCommand::Image { path, out } = &cmd {
        let bytes = fetch_product_image(ctx.api, path, ctx.cancel).await?;
        tokio::fs::write(out, &bytes)
            .await
            .with_context(|| format!("failed to write {}", out.display()))?;
        println!("Saved {} bytes to {}", bytes.len(), out.display());
        return Ok(());
    }

    let mut view = ProductsView::mount(ctx.api, ctx.cancel).await;
    match cmd {
        ProductsCommand::List | ProductsCommand::Image { .. } => {}
        ProductsCommand::Add(fields) => {
            let form = view.open_add();
            apply_product_fields(&mut form.draft, fields).await?;
            println!("{}: {}", form.title(), widgets::image_preview(&form.draft.image));
            view.submit_modal(ctx.api, ctx.dialogs, ctx.cancel)
                .await
                .map_err(report)?;
            println!("Product added.");
        }
        ProductsCommand::Update { id, fields } => {
            let Some(form) = view.open_edit(id) else {
                bail!("no product with id {id}");
            };
            apply_product_fields(&mut form.draft, fields).await?;
            view.submit_modal(ctx.api, ctx.dialogs, ctx.cancel)
                .await
                .map_err(report)?;
            println!("Product {id} updated.");
        }
        ProductsCommand::Delete { id } => {
            if view.open_edit(id).is_none() {
                bail!("no product with id {id}");
            }
            match view.delete_in_modal(ctx.api, ctx.dialogs, ctx.cancel).await? {
                DeleteOutcome::Deleted => println!("Product {id} deleted."),
                DeleteOutcome::Kept => println!("Product {id} kept."),
            }
        }
    }
    print_products(&view);
    Ok(())
}

fn print_storefronts(view: &StorefrontsView) {
    if let Some(empty) = view.empty_state() {
        println!("{} {}", empty.message, empty.action);
        return;
    }
    for tile in view.tiles() {
        println!("[{}] {} ({})", tile.id, tile.title, tile.store_type);
    }
}

async fn storefronts(ctx: &Ctx<'_>, cmd: StorefrontsCommand) -> Result<()> {
    let mut view = StorefrontsView::mount(ctx.api, ctx.cancel).await;
    match cmd {
        StorefrontsCommand::List => {}
        StorefrontsCommand::Add {
            store_type,
            name,
            api_key,
            api_secret,
            store_id,
            store_url,
        } => {
            let form = view.open_add();
            form.draft.store_type = store_type;
            form.draft.store_name = name;
            form.draft.api_key = api_key;
            form.draft.api_secret = api_secret;
            form.draft.store_id = store_id;
            form.draft.store_url = store_url;
            view.submit_modal(ctx.api, ctx.dialogs, ctx.cancel)
                .await
                .map_err(report)?;
            println!("Linked {} storefront.", store_type.label());
        }
        StorefrontsCommand::Update {
            id,
            name,
            store_id,
            store_url,
        } => {
            let Some(form) = view.open_edit(id) else {
                bail!("no storefront with id {id}");
            };
            if let Some(name) = name {
                form.draft.store_name = name;
            }
            if let Some(store_id) = store_id {
                form.draft.store_id = store_id;
            }
            if let Some(store_url) = store_url {
                form.draft.store_url = store_url;
            }
            view.submit_modal(ctx.api, ctx.dialogs, ctx.cancel)
                .await
                .map_err(report)?;
            println!("Storefront {id} updated.");
        }
        StorefrontsCommand::Delete { id } => {
            if view.open_edit(id).is_none() {
                bail!("no storefront with id {id}");
            }
            match view.delete_in_modal(ctx.api, ctx.dialogs, ctx.cancel).await? {
                DeleteOutcome::Deleted => println!("Storefront {id} unlinked."),
                DeleteOutcome::Kept => println!("Storefront {id} kept."),
            }
        }
    }
    print_storefronts(&view);
    Ok(())
}

fn orders(order: Option<String>) -> Result<()> {
    let mut view = OrdersView::default();
    if let Some(order_no) = order {
        if !view.open(&order_no) {
            bail!("no order {order_no}");
        }
        if let Some(row) = view.selected() {
            println!("Order {}", row.order_no);
            println!("  customer:       {}", row.customer);
            println!("  products:       {}", row.products);
            println!("  total:          {}", row.total);
            println!("  date:           {}", row.order_date);
            println!("  status:         {}", row.status.as_str());
            println!("  shipping label: {}", row.shipping_label);
        }
        return Ok(());
    }
    for row in view.rows() {
        println!(
            "{}  {:<12} {:>8}  {}  {:<10} {}",
            row.order_no,
            row.products,
            row.total,
            row.order_date,
            row.status.as_str(),
            row.customer
        );
    }
    Ok(())
}
