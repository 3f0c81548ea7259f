//! Coupon commands.

use anyhow::Result;

use super::cart::finish;
use super::{CouponArgs, CouponCommand};
use crate::context::Context;

/// Run the coupon command.
pub async fn run(args: CouponArgs, ctx: &Context) -> Result<()> {
    match args.command {
        CouponCommand::Apply { code } => {
            let applied = ctx.cart.apply_coupon(&code).await?;
            ctx.output.success(&format!(
                "Coupon {} applied ({})",
                applied.code,
                applied.detail.label()
            ));
            if let Some(expires_at) = applied.detail.expires_at {
                ctx.output
                    .kv("Expires", &expires_at.format("%Y-%m-%d %H:%M UTC").to_string());
            }
        }
        CouponCommand::Remove => {
            if ctx.cart.remove_coupon() {
                ctx.output.success("Coupon removed");
            } else {
                ctx.output.warn("No coupon was applied");
            }
        }
    }

    finish(ctx).await
}
