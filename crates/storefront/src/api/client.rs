//! Partshub REST API client implementation.
//!
//! Uses `reqwest` with JSON bodies and a bearer default header. Read-only
//! catalog responses are cached with `moka` for the configured TTL; cart,
//! order, account, and warranty calls always hit the backend.

use std::sync::Arc;

use moka::future::Cache;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use partshub_core::{AccountId, CartLineId, OrderId, ProductId};

use crate::config::{StorefrontConfig, bearer_header_value};
use crate::warranty::LookupMode;

use super::ApiError;
use super::types::{
    AccountDto, AddCartLineRequest, CartLineDto, CategoryDto, CommentDto, CreateOrderRequest,
    CreateOrderResponse, Envelope, NewCommentRequest, NewRatingRequest, OrderDto, Page, ProductDto,
    UpdateAccountRequest, UpdateCartLineRequest, WarrantyRecordDto,
};

/// Remote source of an account's cart rows.
///
/// Implemented by [`ApiClient`]; the reconciler is generic over this trait
/// so tests can substitute a scripted source.
#[allow(async_fn_in_trait)]
pub trait RemoteCartSource {
    /// Fetch the full cart line set for an account.
    async fn fetch_cart(&self, account: AccountId) -> Result<Vec<CartLineDto>, ApiError>;
}

/// Backend operations the checkout orchestrator depends on.
#[allow(async_fn_in_trait)]
pub trait CheckoutBackend {
    /// Create an order from a cart snapshot; returns the order code and the
    /// payment provider redirect URL.
    async fn create_order(
        &self,
        request: &CreateOrderRequest,
    ) -> Result<CreateOrderResponse, ApiError>;

    /// Confirm a successful payment return for an order.
    async fn mark_order_paid(&self, order_code: &str) -> Result<(), ApiError>;

    /// Record a cancelled or failed payment return for an order.
    async fn mark_order_failed(&self, order_code: &str) -> Result<(), ApiError>;
}

/// Cached catalog responses.
#[derive(Clone)]
enum CacheValue {
    Product(Box<ProductDto>),
    Products(Arc<Page<ProductDto>>),
    Categories(Arc<Vec<CategoryDto>>),
}

/// Client for the Partshub REST backend.
///
/// Cheap to clone; all clones share the HTTP connection pool and the
/// catalog cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: Url,
    cache: Cache<String, CacheValue>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the bearer token cannot be encoded as a header
    /// or the HTTP client fails to build.
    pub fn new(config: &StorefrontConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        let auth_value = HeaderValue::from_str(&bearer_header_value(config))
            .map_err(|e| ApiError::Config(format!("invalid API token: {e}")))?;
        headers.insert(AUTHORIZATION, auth_value);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.catalog_cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: config.api_base_url.clone(),
                cache,
            }),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.inner
            .base_url
            .join(path)
            .map_err(|e| ApiError::Config(format!("invalid endpoint {path}: {e}")))
    }

    /// Send a request and unwrap the response envelope.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Envelope<T>, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "backend returned non-success status"
            );
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "failed to parse backend response"
            );
            ApiError::Parse(e)
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        self.execute(self.inner.http.get(url)).await?.into_result()
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Envelope<T>, ApiError> {
        let url = self.endpoint(path)?;
        self.execute(self.inner.http.post(url).json(body)).await
    }

    // =========================================================================
    // Catalog Methods
    // =========================================================================

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn get_product(&self, product_id: ProductId) -> Result<ProductDto, ApiError> {
        let cache_key = format!("product:{product_id}");

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("cache hit for product");
            return Ok(*product);
        }

        let product: ProductDto = self.get(&format!("products/{product_id}")).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Get a paginated product listing, optionally filtered by a search
    /// term or category slug. Only unfiltered pages are cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        page: u32,
        page_size: u32,
        search: Option<&str>,
        category: Option<&str>,
    ) -> Result<Page<ProductDto>, ApiError> {
        let filtered = search.is_some() || category.is_some();
        let cache_key = format!("products:{page}:{page_size}");

        if !filtered
            && let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await
        {
            debug!("cache hit for products");
            return Ok((*products).clone());
        }

        let mut path = format!("products?page={page}&pageSize={page_size}");
        if let Some(term) = search {
            path.push_str(&format!("&search={}", urlencoding::encode(term)));
        }
        if let Some(slug) = category {
            path.push_str(&format!("&category={}", urlencoding::encode(slug)));
        }

        let products: Page<ProductDto> = self.get(&path).await?;

        if !filtered {
            self.inner
                .cache
                .insert(cache_key, CacheValue::Products(Arc::new(products.clone())))
                .await;
        }

        Ok(products)
    }

    /// Get all product categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<CategoryDto>, ApiError> {
        let cache_key = "categories".to_string();

        if let Some(CacheValue::Categories(categories)) = self.inner.cache.get(&cache_key).await {
            debug!("cache hit for categories");
            return Ok((*categories).clone());
        }

        let categories: Vec<CategoryDto> = self.get("categories").await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Categories(Arc::new(categories.clone())))
            .await;

        Ok(categories)
    }

    /// Invalidate all cached catalog data.
    pub async fn invalidate_catalog(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }

    // =========================================================================
    // Cart Methods (not cached - mutable state)
    // =========================================================================

    /// Get all cart rows for an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(account = %account))]
    pub async fn get_cart(&self, account: AccountId) -> Result<Vec<CartLineDto>, ApiError> {
        self.get(&format!("cart/account/{account}")).await
    }

    /// Add a product to an account's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self), fields(account = %account, product_id = %product_id))]
    pub async fn add_cart_line(
        &self,
        account: AccountId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<CartLineDto, ApiError> {
        let request = AddCartLineRequest {
            account_id: account,
            product_id,
            quantity,
        };
        self.post("cart", &request).await?.into_result()
    }

    /// Set the quantity of a cart row.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self), fields(line_id = %line_id))]
    pub async fn update_cart_line(
        &self,
        line_id: CartLineId,
        quantity: u32,
    ) -> Result<CartLineDto, ApiError> {
        let url = self.endpoint(&format!("cart/{line_id}"))?;
        let request = UpdateCartLineRequest { quantity };
        self.execute(self.inner.http.put(url).json(&request))
            .await?
            .into_result()
    }

    /// Remove a cart row.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(line_id = %line_id))]
    pub async fn remove_cart_line(&self, line_id: CartLineId) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("cart/{line_id}"))?;
        self.execute::<serde_json::Value>(self.inner.http.delete(url))
            .await?
            .into_unit()
    }

    /// Remove all cart rows for an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(account = %account))]
    pub async fn clear_cart(&self, account: AccountId) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("cart/account/{account}"))?;
        self.execute::<serde_json::Value>(self.inner.http.delete(url))
            .await?
            .into_unit()
    }

    // =========================================================================
    // Order & Payment Methods
    // =========================================================================

    /// Get one order.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is not found or the request fails.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn get_order(&self, order_id: OrderId) -> Result<OrderDto, ApiError> {
        self.get(&format!("orders/{order_id}")).await
    }

    /// Get an account's order history, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(account = %account))]
    pub async fn list_orders(
        &self,
        account: AccountId,
        page: u32,
        page_size: u32,
    ) -> Result<Page<OrderDto>, ApiError> {
        self.get(&format!(
            "orders/account/{account}?page={page}&pageSize={page_size}"
        ))
        .await
    }

    // =========================================================================
    // Account Methods
    // =========================================================================

    /// Get the authenticated account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn get_current_account(&self) -> Result<AccountDto, ApiError> {
        self.get("accounts/me").await
    }

    /// Update the authenticated account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, update))]
    pub async fn update_current_account(
        &self,
        update: &UpdateAccountRequest,
    ) -> Result<AccountDto, ApiError> {
        let url = self.endpoint("accounts/me")?;
        self.execute(self.inner.http.put(url).json(update))
            .await?
            .into_result()
    }

    // =========================================================================
    // Warranty Methods
    // =========================================================================

    /// Look up warranty records by an identifier.
    ///
    /// Zero matches is a valid outcome and returns an empty vec.
    ///
    /// # Errors
    ///
    /// Returns an error only if the request itself fails.
    #[instrument(skip(self), fields(mode = %mode))]
    pub async fn lookup_warranty(
        &self,
        mode: LookupMode,
        term: &str,
    ) -> Result<Vec<WarrantyRecordDto>, ApiError> {
        let path = format!(
            "warranty?mode={}&term={}",
            mode.query_value(),
            urlencoding::encode(term)
        );
        let url = self.endpoint(&path)?;
        let envelope: Envelope<Vec<WarrantyRecordDto>> =
            self.execute(self.inner.http.get(url)).await?;

        // "not found" is an empty set here, not an error
        match envelope.into_result() {
            Ok(records) => Ok(records),
            Err(ApiError::NotFound(_)) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    // =========================================================================
    // Review Methods
    // =========================================================================

    /// Get comments for a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn list_comments(
        &self,
        product_id: ProductId,
        page: u32,
        page_size: u32,
    ) -> Result<Page<CommentDto>, ApiError> {
        self.get(&format!(
            "comments/product/{product_id}?page={page}&pageSize={page_size}"
        ))
        .await
    }

    /// Post a comment on a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, request))]
    pub async fn add_comment(&self, request: &NewCommentRequest) -> Result<CommentDto, ApiError> {
        self.post("comments", request).await?.into_result()
    }

    /// Post a star rating for a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects it.
    #[instrument(skip(self, request))]
    pub async fn add_rating(&self, request: &NewRatingRequest) -> Result<(), ApiError> {
        self.post::<_, serde_json::Value>("ratings", request)
            .await?
            .into_unit()
    }
}

impl RemoteCartSource for ApiClient {
    async fn fetch_cart(&self, account: AccountId) -> Result<Vec<CartLineDto>, ApiError> {
        self.get_cart(account).await
    }
}

impl CheckoutBackend for ApiClient {
    async fn create_order(
        &self,
        request: &CreateOrderRequest,
    ) -> Result<CreateOrderResponse, ApiError> {
        self.post("orders", request).await?.into_result()
    }

    async fn mark_order_paid(&self, order_code: &str) -> Result<(), ApiError> {
        let path = format!("orders/{}/payment/confirm", urlencoding::encode(order_code));
        self.post::<_, serde_json::Value>(&path, &serde_json::json!({}))
            .await?
            .into_unit()
    }

    async fn mark_order_failed(&self, order_code: &str) -> Result<(), ApiError> {
        let path = format!("orders/{}/payment/cancel", urlencoding::encode(order_code));
        self.post::<_, serde_json::Value>(&path, &serde_json::json!({}))
            .await?
            .into_unit()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::SecretString;
    use std::time::Duration;

    fn test_config() -> StorefrontConfig {
        StorefrontConfig {
            api_base_url: Url::parse("https://api.partshub.test/v1/").unwrap(),
            api_token: SecretString::from("tok_8fj29dkq0a"),
            request_timeout: Duration::from_secs(5),
            catalog_cache_ttl: Duration::from_secs(60),
        }
    }

    #[test]
    fn test_client_builds_from_config() {
        assert!(ApiClient::new(&test_config()).is_ok());
    }

    #[test]
    fn test_endpoint_joins_relative_paths() {
        let client = ApiClient::new(&test_config()).unwrap();
        let url = client.endpoint("products/5").unwrap();
        assert_eq!(url.as_str(), "https://api.partshub.test/v1/products/5");
    }

    #[test]
    fn test_endpoint_encodes_warranty_term() {
        let client = ApiClient::new(&test_config()).unwrap();
        let path = format!(
            "warranty?mode={}&term={}",
            LookupMode::Serial.query_value(),
            urlencoding::encode("SN 01/02")
        );
        let url = client.endpoint(&path).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.partshub.test/v1/warranty?mode=serial&term=SN%2001%2F02"
        );
    }
}
