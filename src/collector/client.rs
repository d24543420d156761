//! Sequential HTTP collector for category listings and shop review feeds

use std::time::Duration;

use rand::Rng;
use reqwest::header;
use reqwest::Client;
use tracing::debug;
use tracing::info;
use tracing::warn;
use url::Url;

use super::extract::brand_name;
use super::extract::category_name;
use super::extract::PageParser;
use crate::config::CollectorConfig;
use crate::config::DelayRange;
use crate::errors::ReviewRagError;
use crate::models::CategoryReviews;
use crate::models::ReviewRecord;
use crate::Result;

/// Walks category → shops → review pages, one request at a time
pub struct ReviewCollector {
    client: Client,
    parser: PageParser,
    base_url: Url,
    config: CollectorConfig,
}

impl ReviewCollector {
    /// Create a collector with the configured browser headers
    ///
    /// # Errors
    /// - Invalid `site_base_url` or header values
    /// - HTTP client build errors
    pub fn new(config: CollectorConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_str(&config.user_agent)
                .map_err(|e| ReviewRagError::ConfigError(format!("collector.user_agent: {e}")))?,
        );
        headers.insert(
            header::ACCEPT_LANGUAGE,
            header::HeaderValue::from_str(&config.accept_language).map_err(|e| {
                ReviewRagError::ConfigError(format!("collector.accept_language: {e}"))
            })?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ReviewRagError::HttpError(e.to_string()))?;

        let base_url = Url::parse(&config.site_base_url)?;

        Ok(Self {
            client,
            parser: PageParser::new()?,
            base_url,
            config,
        })
    }

    /// GET `url` and return the body of a 2xx response
    async fn fetch_page(&self, url: &Url) -> Result<String> {
        debug!("GET {}", url);
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReviewRagError::HttpError(format!("{url} returned {status}")));
        }

        Ok(response.text().await?)
    }

    /// Shop links listed on a category page; empty when the page can't be fetched
    pub async fn discover_shops(&self, category_url: &Url) -> Vec<Url> {
        match self.fetch_page(category_url).await {
            Ok(html) => {
                let shops = self.parser.shop_links(
                    &html,
                    &self.base_url,
                    self.config.max_shops_per_category,
                );
                info!("Found {} shop link(s) on {}", shops.len(), category_url);
                shops
            }
            Err(e) => {
                warn!("Could not scan category page {}: {}", category_url, e);
                Vec::new()
            }
        }
    }

    /// Page through a shop's reviews until the target count is reached, a page
    /// yields nothing, or a fetch fails. Reviews gathered before a failure are kept.
    pub async fn collect_shop(&self, category: &str, shop_url: &Url) -> Vec<ReviewRecord> {
        let brand = brand_name(shop_url);
        let target = self.config.target_reviews_per_shop;
        let mut collected: Vec<ReviewRecord> = Vec::new();
        let mut page_number: u32 = 1;

        info!("Collecting reviews for shop {}", brand);

        while collected.len() < target {
            let mut page_url = shop_url.clone();
            page_url
                .query_pairs_mut()
                .clear()
                .append_pair("page", &page_number.to_string());

            let html = match self.fetch_page(&page_url).await {
                Ok(html) => html,
                Err(e) => {
                    warn!("Stopping {} at page {}: {}", brand, page_number, e);
                    break;
                }
            };

            let page = self.parser.reviews(&html);
            if page.reviews.is_empty() {
                debug!(
                    "Page {} of {} has no parsable reviews ({} cards), stopping",
                    page_number, brand, page.cards
                );
                break;
            }

            let remaining = target - collected.len();
            collected.extend(
                page.reviews
                    .into_iter()
                    .take(remaining)
                    .map(|review| ReviewRecord::new(category, &brand, review.text, review.star_rating)),
            );

            if collected.len() >= target {
                break;
            }
            page_number += 1;
            pause(self.config.page_delay).await;
        }

        info!("Collected {} review(s) for {}", collected.len(), brand);
        collected
    }

    /// All reviews for one category listing URL
    pub async fn collect_category(&self, category_url: &str) -> Result<CategoryReviews> {
        let url = Url::parse(category_url)?;
        let category = category_name(&url)?;
        info!("Scanning category {}", category);

        let shops = self.discover_shops(&url).await;
        let mut records = Vec::new();

        for (idx, shop_url) in shops.iter().enumerate() {
            if idx > 0 {
                pause(self.config.shop_delay).await;
            }
            records.extend(self.collect_shop(&category, shop_url).await);
        }

        Ok(CategoryReviews { category, records })
    }

    /// Every configured category, in order
    pub async fn collect_all(&self) -> Vec<CategoryReviews> {
        let mut categories = Vec::with_capacity(self.config.categories.len());
        for category_url in &self.config.categories {
            match self.collect_category(category_url).await {
                Ok(reviews) => categories.push(reviews),
                Err(e) => warn!("Skipping category {}: {}", category_url, e),
            }
        }
        categories
    }
}

/// Sleep for a random duration within `range`
async fn pause(range: DelayRange) {
    if range.max_secs <= 0.0 {
        return;
    }
    let low = range.min_secs.clamp(0.0, range.max_secs);
    let secs = rand::thread_rng().gen_range(low..=range.max_secs);
    tokio::time::sleep(Duration::from_secs_f64(secs)).await;
}
