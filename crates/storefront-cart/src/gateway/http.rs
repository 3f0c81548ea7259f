//! REST implementation of the gateways.

use crate::cart::{CouponCode, CouponDetail};
use crate::catalog::ProductSnapshot;
use crate::checkout::{OrderConfirmation, OrderRequest};
use crate::config::CartConfig;
use crate::error::GatewayError;
use crate::gateway::{OrderGateway, PricingGateway, ShippingQuote, ShippingQuoteRequest};
use crate::ids::ProductId;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use storefront_fetch::{encode_path_segment, FetchClient, Response};

/// Talks to the storefront API server.
///
/// | call              | request                          |
/// |-------------------|----------------------------------|
/// | validate coupon   | `POST {base}/coupons/validate`   |
/// | shipping quote    | `POST {base}/shipping/quote`     |
/// | place order       | `POST {base}/orders`             |
/// | product           | `GET {base}/products/{id}`       |
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: FetchClient,
}

#[derive(Serialize)]
struct ValidateCouponBody<'a> {
    code: &'a str,
}

impl HttpGateway {
    /// Create a gateway for the API at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(FetchClient::new().with_base_url(base_url))
    }

    /// Use a preconfigured client.
    pub fn with_client(client: FetchClient) -> Self {
        let client = client.with_default_header("Accept", "application/json");
        Self { client }
    }

    /// Create a gateway from configuration.
    pub fn from_config(config: &CartConfig) -> Self {
        Self::with_client(
            FetchClient::new()
                .with_base_url(config.api_base_url.clone())
                .with_timeout(Duration::from_secs(config.request_timeout_secs)),
        )
    }

    /// Fetch the current snapshot of a product.
    pub async fn product(&self, id: &ProductId) -> Result<ProductSnapshot, GatewayError> {
        let response = self
            .client
            .get(product_path(id))
            .send()
            .await?;
        Ok(check(response, "Product not found")?.json()?)
    }
}

#[async_trait]
impl PricingGateway for HttpGateway {
    async fn validate_coupon(&self, code: &CouponCode) -> Result<CouponDetail, GatewayError> {
        let response = self
            .client
            .post("coupons/validate")
            .json(&ValidateCouponBody {
                code: code.as_str(),
            })?
            .send()
            .await?;
        Ok(check(response, "Invalid coupon code")?.json()?)
    }

    async fn quote_shipping(
        &self,
        request: &ShippingQuoteRequest,
    ) -> Result<ShippingQuote, GatewayError> {
        let response = self
            .client
            .post("shipping/quote")
            .json(request)?
            .send()
            .await?;
        Ok(check(response, "Shipping is not available")?.json()?)
    }
}

#[async_trait]
impl OrderGateway for HttpGateway {
    async fn place_order(&self, order: &OrderRequest) -> Result<OrderConfirmation, GatewayError> {
        let response = self.client.post("orders").json(order)?.send().await?;
        Ok(check(response, "Order was rejected")?.json()?)
    }
}

fn product_path(id: &ProductId) -> String {
    format!("products/{}", encode_path_segment(id.as_str()))
}

/// Map a response status onto the gateway error split.
///
/// 4xx means the server refused the request, 5xx means it failed.
fn check(response: Response, rejected: &str) -> Result<Response, GatewayError> {
    if response.is_success() {
        return Ok(response);
    }
    let message = response.error_message();
    if response.is_client_error() {
        Err(GatewayError::Rejected(
            message.unwrap_or_else(|| rejected.to_string()),
        ))
    } else {
        Err(GatewayError::Transport(
            message.unwrap_or_else(|| format!("HTTP {}", response.status)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn response(status: u16, body: &str) -> Response {
        Response::new(status, HashMap::new(), body.as_bytes().to_vec())
    }

    #[test]
    fn test_check_passes_success() {
        assert!(check(response(200, "{}"), "no").is_ok());
    }

    #[test]
    fn test_client_error_is_rejection() {
        let err = check(response(404, r#"{"message": "Coupon not found"}"#), "Invalid coupon code")
            .unwrap_err();
        assert_eq!(err, GatewayError::Rejected("Coupon not found".to_string()));

        let err = check(response(400, ""), "Invalid coupon code").unwrap_err();
        assert_eq!(err, GatewayError::Rejected("Invalid coupon code".to_string()));
    }

    #[test]
    fn test_server_error_is_transport() {
        let err = check(response(503, ""), "Invalid coupon code").unwrap_err();
        assert_eq!(err, GatewayError::Transport("HTTP 503".to_string()));
    }

    #[test]
    fn test_requests_are_relative_to_base() {
        let gateway = HttpGateway::new("http://localhost:8080/api");
        let req = gateway.client.post("coupons/validate");
        assert_eq!(
            req.request().url(),
            "http://localhost:8080/api/coupons/validate"
        );
        assert_eq!(req.request().header_value("Accept"), Some("application/json"));
    }

    #[test]
    fn test_product_id_stays_in_one_segment() {
        assert_eq!(product_path(&ProductId::new("mug")), "products/mug");
        assert_eq!(
            product_path(&ProductId::new("gift/box?v=2#top")),
            "products/gift%2Fbox%3Fv%3D2%23top"
        );
    }
}
