//! Testing utilities including mock implementations.
//!
//! These let applications (and this crate's own tests) exercise the
//! pipeline without real model or network calls.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{EnrichmentError, FetchError, FetchResult, Result};
use crate::providers::ProviderSpec;
use crate::traits::fetcher::PageFetcher;
use crate::traits::judge::ProductJudge;
use crate::types::category::CategoryProfile;
use crate::types::footprint::{FootprintDetails, FootprintResult};
use crate::types::report::{AttributeGuess, ProductIdentity, ProductImage};

/// A mock page fetcher with canned pages and failure injection.
#[derive(Default)]
pub struct MockFetcher {
    /// Exact-URL pages
    pages: HashMap<String, String>,

    /// Prefix-matched pages (used for "any query against this provider")
    prefix_pages: Vec<(String, String)>,

    /// URLs that should fail
    fail_urls: Vec<String>,

    /// Fail every fetch
    fail_all: bool,

    /// Fetched URLs, in order
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockFetcher {
    /// Create an empty mock fetcher. Unknown URLs return HTTP 404.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` for an exact URL.
    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }

    /// Serve `html` for every query against a provider's search template.
    pub fn with_page_for_all_queries(mut self, spec: &ProviderSpec, html: impl Into<String>) -> Self {
        let prefix = spec
            .search_url
            .split("{query}")
            .next()
            .unwrap_or(&spec.search_url)
            .to_string();
        self.prefix_pages.push((prefix, html.into()));
        self
    }

    /// Make a specific URL fail with a connection error.
    pub fn fail_url(mut self, url: impl Into<String>) -> Self {
        self.fail_urls.push(url.into());
        self
    }

    /// Make every fetch fail with a connection error.
    pub fn fail_all(mut self) -> Self {
        self.fail_all = true;
        self
    }

    /// All URLs fetched so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<String> {
        self.calls.write().unwrap().push(url.to_string());

        if self.fail_all || self.fail_urls.iter().any(|failing| failing == url) {
            return Err(FetchError::Http(Box::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "mock connection refused",
            ))));
        }

        if let Some(html) = self.pages.get(url) {
            return Ok(html.clone());
        }
        if let Some((_, html)) = self
            .prefix_pages
            .iter()
            .find(|(prefix, _)| url.starts_with(prefix.as_str()))
        {
            return Ok(html.clone());
        }

        Err(FetchError::Status {
            status: 404,
            url: url.to_string(),
        })
    }
}

/// Record of a call made to the mock judge.
#[derive(Debug, Clone)]
pub enum MockJudgeCall {
    Identify,
    GuessAttributes,
    Categorize { product_name: String },
    ScoreFootprint { ingredient_count: usize },
}

/// A mock judge with deterministic, configurable responses.
#[derive(Default)]
pub struct MockJudge {
    identity: Option<ProductIdentity>,
    guess: Option<AttributeGuess>,
    profile: Option<CategoryProfile>,
    footprint: Option<FootprintResult>,

    fail_identify: bool,
    fail_guess: bool,
    fail_categorize: bool,
    fail_scoring: bool,

    calls: Arc<RwLock<Vec<MockJudgeCall>>>,
}

impl MockJudge {
    /// Create a mock judge with default responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the identity returned by `identify`.
    pub fn with_identity(mut self, name: impl Into<String>, brand: Option<&str>) -> Self {
        self.identity = Some(ProductIdentity {
            name: name.into(),
            brand: brand.map(str::to_string),
        });
        self
    }

    /// Set the full attribute guess returned by `guess_attributes`.
    pub fn with_guess(mut self, guess: AttributeGuess) -> Self {
        self.guess = Some(guess);
        self
    }

    /// Set only the guessed ingredients (packaging stays empty).
    pub fn with_guessed_ingredients(
        self,
        ingredients: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.with_guess(AttributeGuess {
            ingredients: ingredients.into_iter().map(Into::into).collect(),
            ..Default::default()
        })
    }

    /// Set the category profile returned by `categorize`.
    pub fn with_profile(mut self, profile: CategoryProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Set the footprint result returned by `score_footprint`.
    pub fn with_footprint(mut self, footprint: FootprintResult) -> Self {
        self.footprint = Some(footprint);
        self
    }

    /// Make `identify` fail with an Identification error.
    pub fn fail_identify(mut self) -> Self {
        self.fail_identify = true;
        self
    }

    /// Make `guess_attributes` fail with an Identification error.
    pub fn fail_guess(mut self) -> Self {
        self.fail_guess = true;
        self
    }

    /// Make `categorize` fail with a Categorization error.
    pub fn fail_categorize(mut self) -> Self {
        self.fail_categorize = true;
        self
    }

    /// Make `score_footprint` fail with a Scoring error.
    pub fn fail_scoring(mut self) -> Self {
        self.fail_scoring = true;
        self
    }

    /// All calls made to this mock, in order.
    pub fn calls(&self) -> Vec<MockJudgeCall> {
        self.calls.read().unwrap().clone()
    }

    /// Number of `score_footprint` calls made.
    pub fn score_calls(&self) -> usize {
        self.calls
            .read()
            .unwrap()
            .iter()
            .filter(|call| matches!(call, MockJudgeCall::ScoreFootprint { .. }))
            .count()
    }
}

#[async_trait]
impl ProductJudge for MockJudge {
    async fn identify(&self, _image: &ProductImage) -> Result<ProductIdentity> {
        self.calls.write().unwrap().push(MockJudgeCall::Identify);

        if self.fail_identify {
            return Err(EnrichmentError::Identification(
                "mock identification failure".to_string(),
            ));
        }
        Ok(self.identity.clone().unwrap_or(ProductIdentity {
            name: "Mock Product".to_string(),
            brand: None,
        }))
    }

    async fn guess_attributes(&self, _image: &ProductImage) -> Result<AttributeGuess> {
        self.calls
            .write()
            .unwrap()
            .push(MockJudgeCall::GuessAttributes);

        if self.fail_guess {
            return Err(EnrichmentError::Identification(
                "mock attribute guess failure".to_string(),
            ));
        }
        Ok(self.guess.clone().unwrap_or_default())
    }

    async fn categorize(&self, product_name: &str) -> Result<CategoryProfile> {
        self.calls.write().unwrap().push(MockJudgeCall::Categorize {
            product_name: product_name.to_string(),
        });

        if self.fail_categorize {
            return Err(EnrichmentError::Categorization(
                "mock categorization failure".to_string(),
            ));
        }
        Ok(self
            .profile
            .clone()
            .unwrap_or_else(|| CategoryProfile::new(product_name.to_lowercase())))
    }

    async fn score_footprint(
        &self,
        ingredients: &[String],
        _packaging_materials: &[String],
        _recyclable: bool,
    ) -> Result<FootprintResult> {
        self.calls
            .write()
            .unwrap()
            .push(MockJudgeCall::ScoreFootprint {
                ingredient_count: ingredients.len(),
            });

        if self.fail_scoring {
            return Err(EnrichmentError::Scoring(
                "mock scoring failure".to_string(),
            ));
        }
        Ok(self.footprint.clone().unwrap_or_else(|| {
            FootprintResult::new(
                50.0,
                FootprintDetails {
                    manufacturing: 50.0,
                    transportation: 50.0,
                    packaging: 50.0,
                    lifecycle: 50.0,
                },
            )
        }))
    }
}
