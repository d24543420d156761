//! HTML extraction for category listings and review pages
//!
//! Pure functions over page source; nothing here touches the network so the
//! selectors can be checked against saved fixtures.

use regex::Regex;
use scraper::ElementRef;
use scraper::Html;
use scraper::Selector;
use url::Url;

use crate::errors::ReviewRagError;
use crate::Result;

/// Path prefix of shop review pages on the site
pub const SHOP_PATH_PREFIX: &str = "/review/";

/// A review card that yielded a usable star value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedReview {
    pub text: String,
    pub star_rating: u8,
}

/// Everything recovered from one page of a shop's review feed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageReviews {
    /// Number of review cards on the page, parsable or not
    pub cards: usize,
    pub reviews: Vec<ExtractedReview>,
}

/// Compiled selectors for the review site's markup
pub struct PageParser {
    anchors: Selector,
    cards: Selector,
    star_images: Selector,
    rating_attr: Selector,
    body: Selector,
    title: Selector,
    rated_alt: Regex,
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| ReviewRagError::Custom(format!("Invalid selector '{css}': {e}")))
}

impl PageParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            anchors: selector("a[href]")?,
            cards: selector("article")?,
            star_images: selector("img[alt]")?,
            rating_attr: selector("[data-service-review-rating]")?,
            body: selector(r#"p[data-service-review-text-typography="true"]"#)?,
            title: selector(r#"h2[data-service-review-title-typography="true"]"#)?,
            rated_alt: Regex::new(r"Rated (\d) out of 5 stars")
                .map_err(|e| ReviewRagError::Custom(format!("Invalid star pattern: {e}")))?,
        })
    }

    /// Shop page links on a category listing, absolutised against `base`,
    /// de-duplicated in page order and capped at `max`
    pub fn shop_links(&self, html: &str, base: &Url, max: usize) -> Vec<Url> {
        let document = Html::parse_document(html);
        let host = base.host_str().unwrap_or_default();
        let mut links: Vec<Url> = Vec::new();

        for anchor in document.select(&self.anchors) {
            if links.len() >= max {
                break;
            }
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            if !href.starts_with(SHOP_PATH_PREFIX) || (!host.is_empty() && href.contains(host)) {
                continue;
            }
            match base.join(href) {
                Ok(url) if !links.contains(&url) => links.push(url),
                Ok(_) => {}
                Err(e) => tracing::debug!("Ignoring unparsable shop link {}: {}", href, e),
            }
        }

        links
    }

    /// Review cards on one page of a shop's feed.
    ///
    /// Cards without a recoverable 1–5 star value are dropped. Text falls back
    /// to the review title when the body is missing or empty.
    pub fn reviews(&self, html: &str) -> PageReviews {
        let document = Html::parse_document(html);
        let mut page = PageReviews::default();

        for card in document.select(&self.cards) {
            page.cards += 1;
            let Some(star_rating) = self.star_rating(&card) else {
                continue;
            };

            let text = first_text(&card, &self.body)
                .or_else(|| first_text(&card, &self.title))
                .unwrap_or_default();

            page.reviews.push(ExtractedReview { text, star_rating });
        }

        page
    }

    fn star_rating(&self, card: &ElementRef<'_>) -> Option<u8> {
        let from_alt = card.select(&self.star_images).find_map(|img| {
            let alt = img.value().attr("alt")?;
            let caps = self.rated_alt.captures(alt)?;
            caps.get(1)?.as_str().parse::<u8>().ok()
        });

        let stars = from_alt.or_else(|| {
            card.select(&self.rating_attr).find_map(|el| {
                el.value()
                    .attr("data-service-review-rating")?
                    .trim()
                    .parse::<u8>()
                    .ok()
            })
        })?;

        (1..=5).contains(&stars).then_some(stars)
    }
}

/// Whitespace-normalised text of the first match, if non-empty
fn first_text(card: &ElementRef<'_>, selector: &Selector) -> Option<String> {
    let element = card.select(selector).next()?;
    let text = element.text().collect::<Vec<_>>().join(" ");
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    (!normalized.is_empty()).then_some(normalized)
}

/// Last non-empty path segment of a URL, ignoring the query string
pub fn last_path_segment(url: &Url) -> Option<String> {
    url.path_segments()?
        .filter(|segment| !segment.is_empty())
        .last()
        .map(str::to_string)
}

/// Category name from a listing URL, e.g. `.../categories/animals_pets?sort=x` → `animals_pets`
pub fn category_name(category_url: &Url) -> Result<String> {
    last_path_segment(category_url).ok_or_else(|| {
        ReviewRagError::ConfigError(format!("Category URL has no path: {category_url}"))
    })
}

/// Brand identifier from a shop URL, e.g. `.../review/www.chewy.com` → `www.chewy.com`
pub fn brand_name(shop_url: &Url) -> String {
    last_path_segment(shop_url).unwrap_or_else(|| shop_url.to_string())
}
