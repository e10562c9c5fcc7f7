//! Extractor: fetch one provider for one search term and pull a
//! normalized record out of the markup.
//!
//! Absence of expected elements is never an error; provider-specific
//! missing fields yield empty collections. `ParseError` is reserved for
//! bodies that cannot be parsed at all.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::error::{ExtractError, ExtractResult};
use crate::providers::ProviderSpec;
use crate::traits::fetcher::PageFetcher;
use crate::types::candidate::ResultItem;
use crate::types::fragment::ScrapedFragment;

/// Packaging material keywords scanned for in packaging text.
const MATERIAL_KEYWORDS: [&str; 5] = ["plastic", "cardboard", "glass", "metal", "paper"];

/// Fetch a provider's results for `term` and extract ingredient/packaging
/// evidence.
pub async fn extract_fragment(
    fetcher: &dyn PageFetcher,
    spec: &ProviderSpec,
    term: &str,
) -> ExtractResult<ScrapedFragment> {
    let url = spec.search_url_for(term);
    debug!(provider = %spec.name, url = %url, "extracting fragment");
    let html = fetcher.fetch(&url).await?;
    parse_fragment(spec, &html)
}

/// Fetch a provider's results for `term` and extract raw result items.
pub async fn extract_items(
    fetcher: &dyn PageFetcher,
    spec: &ProviderSpec,
    term: &str,
) -> ExtractResult<Vec<ResultItem>> {
    let url = spec.search_url_for(term);
    debug!(provider = %spec.name, url = %url, "extracting result items");
    let html = fetcher.fetch(&url).await?;
    parse_items(spec, &html)
}

/// Parse ingredient/packaging evidence out of one provider page.
pub fn parse_fragment(spec: &ProviderSpec, html: &str) -> ExtractResult<ScrapedFragment> {
    let document = parse_document(&spec.name, html)?;
    let root = document.root_element();
    let mut fragment = ScrapedFragment::new();

    if let Some(rule) = &spec.rules.ingredient_text {
        let selector = parse_selector(&spec.name, rule)?;
        for text in collect_texts(root, &selector) {
            fragment.push_ingredient(text);
        }
    }

    if let Some(rule) = &spec.rules.packaging_text {
        let selector = parse_selector(&spec.name, rule)?;
        for text in collect_texts(root, &selector) {
            scan_packaging_text(&mut fragment, &text);
            fragment.push_info(text);
        }
    }

    debug!(
        provider = %spec.name,
        ingredients = fragment.ingredients.len(),
        materials = fragment.packaging_materials.len(),
        "fragment extracted"
    );
    Ok(fragment)
}

/// Parse result items out of one provider search page.
pub fn parse_items(spec: &ProviderSpec, html: &str) -> ExtractResult<Vec<ResultItem>> {
    let document = parse_document(&spec.name, html)?;
    let root = document.root_element();

    let item_selector = parse_selector(&spec.name, &spec.rules.result_item)?;
    let name_selector = parse_selector(&spec.name, &spec.rules.name)?;
    let price_selector = parse_selector(&spec.name, &spec.rules.price)?;
    let image_selector = parse_selector(&spec.name, &spec.rules.image)?;
    let link_selector = parse_selector(&spec.name, &spec.rules.link)?;
    let brand_selector = optional_selector(&spec.name, spec.rules.brand.as_deref())?;
    let description_selector = optional_selector(&spec.name, spec.rules.description.as_deref())?;

    let mut items = Vec::new();
    for element in root.select(&item_selector) {
        let Some(name) = first_text(element, &name_selector) else {
            // not a product card (ad slot, spacer); skip silently
            continue;
        };

        let price = first_text(element, &price_selector).and_then(|text| parse_price(&text));
        let image_url = first_attr(element, &image_selector, &["src", "data-src"]);
        let link = first_attr(element, &link_selector, &["href"]);
        let brand = brand_selector
            .as_ref()
            .and_then(|sel| first_text(element, sel))
            .unwrap_or_default();
        let description = description_selector
            .as_ref()
            .map(|sel| collect_texts(element, sel).join(" "))
            .unwrap_or_default();

        items.push(ResultItem {
            name,
            brand,
            price,
            image_url: image_url.unwrap_or_default(),
            link: link.unwrap_or_default(),
            description,
            provider: spec.name.clone(),
        });
    }

    debug!(provider = %spec.name, items = items.len(), "result items extracted");
    Ok(items)
}

/// Scan packaging text for recyclability evidence and material keywords.
fn scan_packaging_text(fragment: &mut ScrapedFragment, text: &str) {
    let lower = text.to_lowercase();
    if lower.contains("recycl") {
        fragment.recyclable = true;
    }
    for keyword in MATERIAL_KEYWORDS {
        if lower.contains(keyword) {
            fragment.push_material(keyword);
        }
    }
}

/// Extract a numeric price from provider text like "₹1,299.00" or "Rs. 450".
pub fn parse_price(text: &str) -> Option<f64> {
    // first run of digits with optional thousands separators and decimals
    let re = regex::Regex::new(r"\d[\d,]*(?:\.\d+)?").ok()?;
    let matched = re.find(text)?;
    matched.as_str().replace(',', "").parse::<f64>().ok()
}

fn parse_document(provider: &str, html: &str) -> ExtractResult<Html> {
    if html.trim().is_empty() {
        return Err(ExtractError::Parse {
            provider: provider.to_string(),
            reason: "empty response body".to_string(),
        });
    }
    Ok(Html::parse_document(html))
}

fn parse_selector(provider: &str, rule: &str) -> ExtractResult<Selector> {
    Selector::parse(rule).map_err(|e| ExtractError::Parse {
        provider: provider.to_string(),
        reason: format!("bad selector `{rule}`: {e}"),
    })
}

fn optional_selector(provider: &str, rule: Option<&str>) -> ExtractResult<Option<Selector>> {
    rule.map(|r| parse_selector(provider, r)).transpose()
}

/// Collect all matched elements' trimmed text, keeping the first
/// occurrence of each distinct string (case-sensitive).
fn collect_texts(scope: ElementRef<'_>, selector: &Selector) -> Vec<String> {
    let mut texts: Vec<String> = Vec::new();
    for element in scope.select(selector) {
        let text = element.text().collect::<String>();
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if text.is_empty() {
            continue;
        }
        if !texts.iter().any(|existing| *existing == text) {
            texts.push(text);
        }
    }
    texts
}

fn first_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope.select(selector).next().map(|element| {
        element
            .text()
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    })
    .filter(|text| !text.is_empty())
}

fn first_attr(scope: ElementRef<'_>, selector: &Selector, attrs: &[&str]) -> Option<String> {
    let element = scope.select(selector).next()?;
    attrs
        .iter()
        .find_map(|attr| element.value().attr(attr))
        .map(|value| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::SelectorRules;

    fn test_spec() -> ProviderSpec {
        ProviderSpec {
            name: "test".to_string(),
            search_url: "https://shop.test/search?q={query}".to_string(),
            base_url: "https://shop.test".to_string(),
            rules: SelectorRules {
                result_item: "div.item".to_string(),
                name: "h3.name".to_string(),
                price: "span.price".to_string(),
                image: "img".to_string(),
                link: "a".to_string(),
                brand: Some("span.brand".to_string()),
                description: Some("p.desc".to_string()),
                ingredient_text: Some("li.ingredient".to_string()),
                packaging_text: Some("div.packaging".to_string()),
            },
        }
    }

    #[test]
    fn test_parse_fragment_dedupes_first_seen() {
        let html = r#"
            <ul>
              <li class="ingredient">Aqua</li>
              <li class="ingredient">Glycerin</li>
              <li class="ingredient">Aqua</li>
            </ul>
        "#;

        let fragment = parse_fragment(&test_spec(), html).unwrap();
        assert_eq!(fragment.ingredients, vec!["Aqua", "Glycerin"]);
    }

    #[test]
    fn test_parse_fragment_packaging_scan() {
        let html = r#"
            <div class="packaging">Recyclable plastic bottle with paper label</div>
        "#;

        let fragment = parse_fragment(&test_spec(), html).unwrap();
        assert!(fragment.recyclable);
        assert_eq!(fragment.packaging_materials, vec!["plastic", "paper"]);
        assert_eq!(
            fragment.additional_info,
            vec!["Recyclable plastic bottle with paper label"]
        );
    }

    #[test]
    fn test_parse_fragment_missing_elements_is_empty_not_error() {
        let html = "<html><body><p>nothing useful here</p></body></html>";

        let fragment = parse_fragment(&test_spec(), html).unwrap();
        assert!(fragment.is_empty());
    }

    #[test]
    fn test_parse_fragment_empty_body_is_parse_error() {
        let result = parse_fragment(&test_spec(), "   ");
        assert!(matches!(result, Err(ExtractError::Parse { .. })));
    }

    #[test]
    fn test_parse_items() {
        let html = r#"
            <div class="item">
              <a href="/p/soap-1"><img src="https://cdn.test/soap1.jpg"></a>
              <span class="brand">EcoCo</span>
              <h3 class="name">Eco Soap Bar</h3>
              <span class="price">₹1,299.00</span>
              <p class="desc">Gentle cleansing bar</p>
            </div>
            <div class="item">
              <h3 class="name">Plain Soap</h3>
              <span class="price">not listed</span>
            </div>
        "#;

        let items = parse_items(&test_spec(), html).unwrap();
        assert_eq!(items.len(), 2);

        assert_eq!(items[0].name, "Eco Soap Bar");
        assert_eq!(items[0].brand, "EcoCo");
        assert_eq!(items[0].price, Some(1299.0));
        assert_eq!(items[0].link, "/p/soap-1");
        assert_eq!(items[0].image_url, "https://cdn.test/soap1.jpg");
        assert_eq!(items[0].description, "Gentle cleansing bar");

        // absent fields are empty, not errors
        assert_eq!(items[1].price, None);
        assert_eq!(items[1].link, "");
        assert_eq!(items[1].brand, "");
    }

    #[test]
    fn test_parse_items_skips_cards_without_name() {
        let html = r#"
            <div class="item"><span class="ad">Sponsored</span></div>
            <div class="item"><h3 class="name">Real Product</h3></div>
        "#;

        let items = parse_items(&test_spec(), html).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Real Product");
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("₹1,299.00"), Some(1299.0));
        assert_eq!(parse_price("Rs. 450"), Some(450.0));
        assert_eq!(parse_price("$12.50 (save $2)"), Some(12.5));
        assert_eq!(parse_price("out of stock"), None);
    }
}
