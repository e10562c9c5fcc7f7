//! Aggregator: ingredient/packaging discovery across the Source Registry.

use tracing::{debug, warn};

use crate::providers::ProviderSpec;
use crate::scrape::extract::extract_fragment;
use crate::traits::fetcher::PageFetcher;
use crate::types::fragment::ScrapedFragment;

/// Gather ingredient/packaging evidence for a product name.
///
/// Providers are consulted in registry order. Per-provider failures are
/// logged and skipped; they never abort the aggregation. Iteration stops
/// as soon as the running fragment has at least one ingredient.
///
/// An empty result is not an error: it is a valid "no signal found"
/// outcome the caller must handle (typically via the vision fallback).
pub async fn aggregate(
    fetcher: &dyn PageFetcher,
    registry: &[ProviderSpec],
    product_name: &str,
) -> ScrapedFragment {
    let mut fragment = ScrapedFragment::new();

    for spec in registry {
        match extract_fragment(fetcher, spec, product_name).await {
            Ok(part) => {
                fragment.merge(part);
                if fragment.has_ingredients() {
                    debug!(
                        provider = %spec.name,
                        ingredients = fragment.ingredients.len(),
                        "ingredient signal found, stopping provider scan"
                    );
                    break;
                }
            }
            Err(e) => {
                warn!(provider = %spec.name, error = %e, "provider failed, skipping");
            }
        }
    }

    fragment
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::SelectorRules;
    use crate::testing::MockFetcher;

    fn spec(name: &str) -> ProviderSpec {
        ProviderSpec {
            name: name.to_string(),
            search_url: format!("https://{name}.test/search?q={{query}}"),
            base_url: format!("https://{name}.test"),
            rules: SelectorRules {
                result_item: "div.item".to_string(),
                name: "h3".to_string(),
                price: "span.price".to_string(),
                image: "img".to_string(),
                link: "a".to_string(),
                brand: None,
                description: None,
                ingredient_text: Some("li.ingredient".to_string()),
                packaging_text: Some("div.packaging".to_string()),
            },
        }
    }

    const EMPTY_PAGE: &str = "<html><body><p>no results</p></body></html>";
    const INGREDIENT_PAGE: &str = r#"
        <ul><li class="ingredient">Aqua</li><li class="ingredient">Glycerin</li></ul>
        <div class="packaging">recyclable cardboard box</div>
    "#;

    #[tokio::test]
    async fn test_short_circuit_stops_after_first_signal() {
        let registry = vec![spec("a"), spec("b"), spec("c"), spec("d")];
        let fetcher = MockFetcher::new()
            .with_page(registry[0].search_url_for("soap"), EMPTY_PAGE)
            .with_page(registry[1].search_url_for("soap"), EMPTY_PAGE)
            .with_page(registry[2].search_url_for("soap"), INGREDIENT_PAGE)
            .with_page(registry[3].search_url_for("soap"), INGREDIENT_PAGE);

        let fragment = aggregate(&fetcher, &registry, "soap").await;

        assert_eq!(fragment.ingredients, vec!["Aqua", "Glycerin"]);
        assert!(fragment.recyclable);

        // providers ordered [empty, empty, has-data, has-data]: only the
        // first three are consulted
        assert_eq!(fetcher.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_failures_are_skipped_not_fatal() {
        let registry = vec![spec("down"), spec("up")];
        let fetcher = MockFetcher::new()
            .fail_url(registry[0].search_url_for("soap"))
            .with_page(registry[1].search_url_for("soap"), INGREDIENT_PAGE);

        let fragment = aggregate(&fetcher, &registry, "soap").await;
        assert_eq!(fragment.ingredients, vec!["Aqua", "Glycerin"]);
    }

    #[tokio::test]
    async fn test_all_providers_fail_yields_empty_fragment() {
        let registry = vec![spec("a"), spec("b")];
        let fetcher = MockFetcher::new().fail_all();

        let fragment = aggregate(&fetcher, &registry, "soap").await;
        assert!(fragment.is_empty());
    }
}
