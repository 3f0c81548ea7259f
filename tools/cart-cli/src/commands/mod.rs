//! CLI command implementations.

pub mod cart;
pub mod coupon;

use clap::{Args, Subcommand};

/// Arguments for the add command.
#[derive(Args)]
pub struct AddArgs {
    /// Product ID.
    pub product_id: String,

    /// Units to add.
    #[arg(short, long, default_value = "1")]
    pub quantity: i64,
}

/// Arguments for the update command.
#[derive(Args)]
pub struct UpdateArgs {
    /// Product ID.
    pub product_id: String,

    /// New quantity (0 removes the product).
    #[arg(allow_negative_numbers = true)]
    pub quantity: i64,
}

/// Arguments for the remove command.
#[derive(Args)]
pub struct RemoveArgs {
    /// Product ID.
    pub product_id: String,
}

/// Arguments for the coupon command.
#[derive(Args)]
pub struct CouponArgs {
    #[command(subcommand)]
    pub command: CouponCommand,
}

#[derive(Subcommand)]
pub enum CouponCommand {
    /// Validate and apply a coupon code.
    Apply {
        /// Coupon code (case-insensitive).
        code: String,
    },
    /// Remove the applied coupon.
    Remove,
}
