//! Shopping flow against a running Appium endpoint.
//!
//! Demonstrates:
//! - Loading the session config from TOML
//! - Login, product selection, add to cart
//! - Removing from the cart
//! - Price cross-check across list, detail and cart
//!
//! Usage:
//!   cargo run --example shopping_flow
//!   cargo run --example shopping_flow -- --config config/swaglabs.toml
//!   cargo run --example shopping_flow -- --debug

mod common;

// ============================================================================
// Imports
// ============================================================================

use anyhow::{Context, Result, ensure};
use common::Args;
use swaglabs_pages::{ExecutionId, SessionConfig, SessionManager};

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    let args = Args::parse();
    common::init_logging(args.debug);

    let manager = SessionManager::new();
    let execution = ExecutionId::for_current_thread();

    let outcome = run(&args, &manager, &execution).await;
    manager.release(&execution).await;

    if let Err(e) = outcome {
        eprintln!("\n[ERROR] {e:#}");
        std::process::exit(1);
    }
}

async fn run(args: &Args, manager: &SessionManager, execution: &ExecutionId) -> Result<()> {
    println!("=== Swag Labs: Shopping Flow ===\n");

    // ========================================================================
    // Setup
    // ========================================================================

    println!("[Setup] Loading {}...", args.config.display());
    let config = SessionConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    println!("        ✓ Endpoint {}\n", config.server_url());

    let session = manager.acquire(execution, &config).await?;
    println!("        ✓ Session {}\n", session.id());

    // ========================================================================
    // Step 1: Login
    // ========================================================================

    println!("[1] Login as {}", config.username());
    let products = session
        .login_screen()
        .login(config.username(), config.password())
        .await?;
    ensure!(products.is_displayed().await?, "products screen not shown");
    let count = products.item_count().await?;
    ensure!(count >= 1, "no products listed");
    println!("    ✓ {count} products\n");

    // ========================================================================
    // Step 2: Select first item
    // ========================================================================

    let list_name = products.item_name(0).await?.unwrap_or_default();
    let list_price = products.item_price(0).await?.unwrap_or_default();
    println!("[2] Select '{list_name}' ({list_price})");

    let details = products.select_first_item().await?;
    ensure!(details.is_displayed().await?, "details screen not shown");
    let detail_price = details.product_price().await?;
    ensure!(details.product_name().await? == list_name, "detail name differs from {list_name:?}");
    ensure!(detail_price.starts_with('$'), "malformed price {detail_price:?}");
    println!("    ✓ Detail shows {detail_price}\n");

    // ========================================================================
    // Step 3: Add to cart
    // ========================================================================

    println!("[3] Add to cart");
    let cart = details.add_to_cart().await?.open_cart().await?;
    ensure!(cart.item_count().await? == 1, "cart should hold exactly one item");
    ensure!(cart.contains_product(&list_name).await?, "{list_name:?} missing from cart");
    println!("    ✓ Cart holds '{list_name}'\n");

    // ========================================================================
    // Step 4: Remove
    // ========================================================================

    println!("[4] Remove from cart");
    let cart = cart.remove_item(0).await?;
    ensure!(cart.is_empty().await?, "cart not empty after removal");
    println!("    ✓ Cart empty\n");

    // ========================================================================
    // Step 5: Re-add and compare prices
    // ========================================================================

    println!("[5] Re-add and compare prices");
    let details = cart
        .continue_shopping()
        .await?
        .select_first_item()
        .await?
        .add_to_cart()
        .await?;
    let readded_price = details.product_price().await?;
    let cart_price = details
        .open_cart()
        .await?
        .first_item_price()
        .await?
        .unwrap_or_default();

    ensure!(
        list_price == readded_price && readded_price == cart_price,
        "price mismatch: list {list_price}, detail {readded_price}, cart {cart_price}"
    );
    println!("    ✓ {list_price} everywhere\n");

    println!("=== Done ===");
    Ok(())
}
