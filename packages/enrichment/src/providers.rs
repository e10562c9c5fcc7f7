//! Source Registry: the remote catalog/content providers we extract from.
//!
//! Each provider is a plain data record: identity plus a table of named
//! CSS selector rules, one per semantic field. The Extractor is one
//! polymorphic function consuming these records; there is no per-provider
//! code.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// CSS selector rules for one provider, one per semantic field.
///
/// `result_item` scopes candidate extraction; the other selectors run
/// either inside a result item (candidate mode) or against the whole
/// document (fragment mode). Optional rules mean the provider simply does
/// not expose that field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorRules {
    /// Locator for one result item in a search/listing page
    pub result_item: String,
    pub name: String,
    pub price: String,
    pub image: String,
    pub link: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Locator for ingredient text blocks
    #[serde(default)]
    pub ingredient_text: Option<String>,
    /// Locator for packaging text blocks
    #[serde(default)]
    pub packaging_text: Option<String>,
}

/// One remote provider: identity plus extraction rules.
///
/// Immutable, defined once at process start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSpec {
    pub name: String,

    /// Search URL template with a `{query}` placeholder
    pub search_url: String,

    /// Page base URL, used to resolve relative result links
    pub base_url: String,

    pub rules: SelectorRules,
}

impl ProviderSpec {
    /// Build the search URL for a term, percent-encoding the query.
    pub fn search_url_for(&self, term: &str) -> String {
        let encoded: String = form_urlencoded::byte_serialize(term.as_bytes()).collect();
        self.search_url.replace("{query}", &encoded)
    }

    /// Host portion of the base URL (e.g., "www.flipkart.com").
    pub fn host(&self) -> &str {
        self.base_url
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/')
    }
}

/// The default provider list, in fixed priority order.
///
/// Order matters: the Aggregator consults providers front to back and
/// stops at the first ingredient signal, so ingredient-rich sources come
/// first and general marketplaces last.
pub fn default_registry() -> Vec<ProviderSpec> {
    vec![
        ProviderSpec {
            name: "incidecoder".to_string(),
            search_url: "https://incidecoder.com/search?query={query}".to_string(),
            base_url: "https://incidecoder.com".to_string(),
            rules: SelectorRules {
                result_item: "div.paddingb".to_string(),
                name: "a.klavika".to_string(),
                price: "span.price".to_string(),
                image: "img".to_string(),
                link: "a.klavika".to_string(),
                brand: Some("span.brand".to_string()),
                description: Some("p.description".to_string()),
                ingredient_text: Some("span.ingred-link, div#ingredlist-text".to_string()),
                packaging_text: None,
            },
        },
        ProviderSpec {
            name: "bigbasket".to_string(),
            search_url: "https://www.bigbasket.com/ps/?q={query}".to_string(),
            base_url: "https://www.bigbasket.com".to_string(),
            rules: SelectorRules {
                result_item: "div.SKUDeck___StyledDiv-sc-1e5d9gk-0".to_string(),
                name: "h3.block".to_string(),
                price: "span.Pricing___StyledLabel-sc-pldi2d-1".to_string(),
                image: "img".to_string(),
                link: "a".to_string(),
                brand: Some("span.BrandName___StyledLabel-sc-hssfrl-0".to_string()),
                description: Some("div.pd-description, section.about".to_string()),
                ingredient_text: Some("div.pd-ingredients, td.ingredients".to_string()),
                packaging_text: Some("div.pd-packaging, td.packaging".to_string()),
            },
        },
        ProviderSpec {
            name: "nykaa".to_string(),
            search_url: "https://www.nykaa.com/search/result/?q={query}".to_string(),
            base_url: "https://www.nykaa.com".to_string(),
            rules: SelectorRules {
                result_item: "div.productWrapper".to_string(),
                name: "div.css-xrzmfa".to_string(),
                price: "span.css-111z9ua".to_string(),
                image: "img".to_string(),
                link: "a.css-qlopj4".to_string(),
                brand: None,
                description: Some("div.css-1d1rk3b".to_string()),
                ingredient_text: Some("div#content-details p, li.ingredient".to_string()),
                packaging_text: None,
            },
        },
        ProviderSpec {
            name: "amazon".to_string(),
            search_url: "https://www.amazon.in/s?k={query}".to_string(),
            base_url: "https://www.amazon.in".to_string(),
            rules: SelectorRules {
                result_item: "div[data-component-type='s-search-result']".to_string(),
                name: "h2 a span".to_string(),
                price: "span.a-price-whole".to_string(),
                image: "img.s-image".to_string(),
                link: "h2 a".to_string(),
                brand: Some("span.a-size-base-plus".to_string()),
                description: Some("div.a-section.a-text-left span.a-text-normal".to_string()),
                ingredient_text: Some("div#important-information div.a-section.content span"
                    .to_string()),
                packaging_text: Some("div#sustainability-section span".to_string()),
            },
        },
        ProviderSpec {
            name: "flipkart".to_string(),
            search_url: "https://www.flipkart.com/search?q={query}".to_string(),
            base_url: "https://www.flipkart.com".to_string(),
            rules: SelectorRules {
                result_item: "div._1AtVbE div._13oc-S, div._1AtVbE div._4ddWXP".to_string(),
                name: "div._4rR01T, a.s1Q9rs".to_string(),
                price: "div._30jeq3".to_string(),
                image: "img._396cs4".to_string(),
                link: "a._1fQZEK, a.s1Q9rs".to_string(),
                brand: None,
                description: Some("ul._1xgFaf li".to_string()),
                ingredient_text: None,
                packaging_text: None,
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url_encodes_query() {
        let registry = default_registry();
        let amazon = registry.iter().find(|p| p.name == "amazon").unwrap();

        let url = amazon.search_url_for("anti hair fall shampoo");
        assert_eq!(
            url,
            "https://www.amazon.in/s?k=anti+hair+fall+shampoo"
        );
    }

    #[test]
    fn test_registry_order_is_ingredient_rich_first() {
        let registry = default_registry();
        assert_eq!(registry[0].name, "incidecoder");
        assert!(registry.len() >= 4);
        // every provider carries the mandatory candidate selectors
        for spec in &registry {
            assert!(!spec.rules.result_item.is_empty());
            assert!(!spec.rules.name.is_empty());
            assert!(spec.search_url.contains("{query}"));
        }
    }

    #[test]
    fn test_host() {
        let registry = default_registry();
        let flipkart = registry.iter().find(|p| p.name == "flipkart").unwrap();
        assert_eq!(flipkart.host(), "www.flipkart.com");
    }
}
