//! Cart item commands.

use anyhow::{Context as _, Result};
use storefront_cart::cart::{CartChange, CartView};
use storefront_cart::ProductId;

use super::{AddArgs, RemoveArgs, UpdateArgs};
use crate::context::Context;
use crate::output::stock_badge;

/// Show the cart.
pub async fn show(ctx: &Context) -> Result<()> {
    ctx.cart.wait_for_shipping().await;
    ctx.output
        .debug(&format!("Storage: {}", ctx.storage_dir().display()));
    print_cart(&ctx.cart.view(), ctx);
    Ok(())
}

/// Fetch a product from the API and add it.
pub async fn add(args: AddArgs, ctx: &Context) -> Result<()> {
    let id = ProductId::new(args.product_id);
    let product = ctx
        .gateway
        .product(&id)
        .await
        .with_context(|| format!("Failed to load product {}", id))?;
    let title = product.title.clone();

    ctx.cart.add_item(product, args.quantity)?;
    ctx.output
        .success(&format!("Added {} x {}", args.quantity, title));

    finish(ctx).await
}

/// Set a product's quantity.
pub async fn update(args: UpdateArgs, ctx: &Context) -> Result<()> {
    let id = ProductId::new(args.product_id);
    match ctx.cart.update_quantity(&id, args.quantity)? {
        CartChange::Removed => ctx.output.success(&format!("Removed {}", id)),
        CartChange::Unchanged => ctx.output.warn(&format!("{} is not in the cart", id)),
        _ => ctx
            .output
            .success(&format!("{} quantity set to {}", id, args.quantity)),
    }

    finish(ctx).await
}

/// Remove a product.
pub async fn remove(args: RemoveArgs, ctx: &Context) -> Result<()> {
    let id = ProductId::new(args.product_id);
    match ctx.cart.remove_item(&id) {
        CartChange::Unchanged => ctx.output.warn(&format!("{} is not in the cart", id)),
        _ => ctx.output.success(&format!("Removed {}", id)),
    }

    finish(ctx).await
}

/// Empty the cart.
pub async fn clear(ctx: &Context) -> Result<()> {
    ctx.cart.clear();
    ctx.output.success("Cart cleared");

    finish(ctx).await
}

/// Wait for the shipping quote and print the resulting cart.
pub(crate) async fn finish(ctx: &Context) -> Result<()> {
    ctx.cart.wait_for_shipping().await;
    print_cart(&ctx.cart.view(), ctx);
    Ok(())
}

/// Print items and totals.
pub(crate) fn print_cart(view: &CartView, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(view);
        return;
    }

    ctx.output.header("Cart");

    if view.items.is_empty() {
        ctx.output.info("Your cart is empty.");
        return;
    }

    let widths = [16, 28, 5, 10, 10, 14];
    ctx.output
        .table_row(&["ID", "PRODUCT", "QTY", "PRICE", "TOTAL", "STOCK"], &widths);
    for item in &view.items {
        let product = &item.product;
        let quantity = item.cart_quantity.to_string();
        let price = item.unit_price().display();
        let total = item.line_total().display();
        let stock = stock_badge(
            product.available_stock(),
            product.availability.is_stock_tracked(),
        );
        ctx.output.table_row(
            &[
                product.id.as_str(),
                &product.title,
                &quantity,
                &price,
                &total,
                &stock,
            ],
            &widths,
        );
    }

    let totals = &view.totals;
    println!();
    ctx.output.kv("Items", &totals.item_count.to_string());
    ctx.output.kv("Subtotal", &totals.subtotal.display());
    if let Some(coupon) = &view.coupon {
        ctx.output.kv(
            "Discount",
            &format!(
                "-{} ({}, {})",
                totals.discount.display(),
                coupon.code,
                coupon.detail.label()
            ),
        );
    }
    ctx.output.kv("Shipping", &totals.shipping.display());
    ctx.output.kv("Total", &totals.grand_total.display());
}
