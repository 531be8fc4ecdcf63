//! Orders board over static fixtures
//!
//! This example demonstrates:
//! - Wiring a screen from the default configuration
//! - Sharing one query cache between two views of the same entity
//! - Status tabs, search, sorting and pagination
//! - Exporting the filtered set to CSV, workbook and print page
//!
//! Run with `cargo run --example orders_board [output-dir]`.

use anyhow::Context;
use storedesk::prelude::*;
use storedesk::telemetry::{DEFAULT_FILTER, init_tracing};

fn fixtures() -> Value {
    json!([
        {"id": 1001, "customer": "Aziza Karimova", "price": "250000", "payment_method": "card",
         "product": "Kettle", "delivery_method": "courier", "status": "yangi",
         "platform": "telegram", "created_at": "2024-03-01T10:15:00Z"},
        {"id": 1002, "customer": "Bobur Aliyev", "price": 410000, "payment_method": "cash",
         "product": "Blender", "delivery_method": "pickup", "status": "jarayonda",
         "platform": "website", "created_at": "2024-03-02T12:00:00Z"},
        {"id": 1003, "customer": "Dilnoza Rashidova", "price": 99000, "payment_method": "card",
         "product": "Desk lamp", "delivery_method": "courier", "status": "yangi",
         "platform": "instagram", "created_at": "2024-03-03"},
        {"id": 1004, "customer": "Eldor Tursunov", "price": 180000, "payment_method": "click",
         "product": "Iron", "delivery_method": "courier", "status": "yuborilgan",
         "platform": "telegram", "created_at": "2024-03-04T08:30:00Z"},
        {"id": 1005, "customer": "Farrux Nazarov", "price": 150000, "payment_method": "payme",
         "product": "Fan", "delivery_method": "pickup", "status": "yetkazilgan",
         "platform": "website", "created_at": "2024-03-05"},
        {"id": 1006, "customer": "Gulnora Saidova", "price": 64000, "payment_method": "cash",
         "product": "Toaster", "delivery_method": "courier", "status": "bekor qilingan",
         "platform": "telegram", "created_at": "2024-03-06T18:45:00Z"},
        {"id": 1007, "customer": "Husan Qodirov", "price": 320000, "payment_method": "card",
         "product": "Microwave", "delivery_method": "courier", "status": "yangi",
         "platform": "instagram", "created_at": "2024-03-07T09:00:00Z"}
    ])
}

fn print_view(title: &str, view: &ListView<Order>) {
    println!("{}", title);
    println!(
        "   page {}/{} ({} matching)",
        view.pagination.page,
        view.pagination.total_pages.max(1),
        view.total()
    );
    for order in view.rows() {
        println!(
            "   #{:<5} {:<20} {:>10} {:<15} {}",
            order.id,
            order.customer,
            order.price,
            order.status.label(),
            order.created_at
        );
    }
    if let Some(message) = view.empty_state() {
        println!("   ({})", message);
    }
    let tabs: Vec<String> = view
        .tab_counts
        .iter()
        .map(|(tab, count)| format!("{} {}", tab, count))
        .collect();
    println!("   tabs: {}\n", tabs.join(" | "));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing(DEFAULT_FILTER);

    println!("storedesk orders board");
    println!("======================\n");

    let mut config = DashboardConfig::default_config();
    config.endpoints.insert(
        Order::resource_name().to_string(),
        EndpointConfig::new("/orders").static_source(),
    );
    let cache = Arc::new(QueryCache::from_config(&config.cache));
    let client = ApiClient::from_config(&config.api, config.api.session())?;
    let orders = config
        .service::<Order>(&client, fixtures())
        .context("loading order fixtures")?;

    let descriptor = config
        .screen(Order::resource_name())
        .cloned()
        .unwrap_or_else(Order::descriptor);

    // Two views over the same cache: the board and a "new orders" widget
    let mut board = ListScreen::<Order, _>::new(
        descriptor.clone(),
        CachedEntityService::<Order, _>::new(orders.clone(), cache.clone()),
    )
    .with_notice_durations(config.notices.clone())
    .with_exporter(Order::export_columns());
    let mut widget = ListScreen::<Order, _>::new(
        descriptor,
        CachedEntityService::<Order, _>::new(orders, cache.clone()),
    );

    board.load().await?;
    widget.load().await?;
    widget.set_tab(OrderStatus::New.key());

    board.set_page_size(3);
    print_view("All orders, newest first", &board.view());

    board.set_tab(OrderStatus::New.key());
    board.toggle_sort("price");
    print_view("New orders by price", &board.view());

    board.set_search("xyz");
    print_view("Search \"xyz\"", &board.view());
    board.reset_filters();

    let created = board
        .create(json!({
            "customer": "Iroda Yusupova",
            "price": 275000,
            "payment_method": "card",
            "product": "Air fryer",
            "delivery_method": "courier",
            "status": "yangi",
            "platform": "website",
            "created_at": Utc::now().to_rfc3339(),
        }))
        .await?;
    board
        .update(created.id(), json!({"status": "jarayonda"}))
        .await?;
    for notice in board.drain_notices() {
        println!("[{:?}] {}", notice.level, notice.message);
    }

    // The widget sees the mutation through the shared cache without refetching
    widget.reload().await?;
    print_view("\nNew orders widget", &widget.view());

    let out_dir = std::env::args()
        .nth(1)
        .map(std::path::PathBuf::from)
        .unwrap_or_else(std::env::temp_dir);
    let today = Utc::now().date_naive();

    board.select("platform", "telegram");
    for format in [ExportFormat::Csv, ExportFormat::Workbook, ExportFormat::Print] {
        let file = board.export(format, today)?;
        let path = file
            .save_to(&out_dir)
            .with_context(|| format!("saving {}", file.filename))?;
        println!("exported {} bytes to {}", file.bytes.len(), path.display());
    }

    Ok(())
}
