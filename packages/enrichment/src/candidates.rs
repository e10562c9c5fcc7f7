//! Candidate Finder: comparable-alternative discovery, filtering,
//! ranking, and per-candidate enrichment.

use futures::stream::{self, StreamExt};
use indexmap::IndexMap;
use tracing::{debug, warn};
use url::Url;

use crate::providers::ProviderSpec;
use crate::scrape::aggregate::aggregate;
use crate::scrape::extract::extract_items;
use crate::traits::fetcher::PageFetcher;
use crate::traits::judge::ProductJudge;
use crate::types::candidate::{CandidateProduct, PackagingInfo, ResultItem};
use crate::types::category::CategoryProfile;
use crate::types::config::PipelineConfig;
use crate::types::report::ProductImage;

/// Placeholder attached to a candidate whose enrichment failed.
pub const INGREDIENTS_UNAVAILABLE: &str = "Ingredients information unavailable";

struct RankedCandidate {
    product: CandidateProduct,
    key_hits: usize,
    price_diff: f64,
}

/// Find comparable alternatives for a product, capped and ranked.
///
/// Runs each provider once per query in the category profile, filters by
/// price window and characteristic match, deduplicates by canonical link
/// (first occurrence wins), ranks, truncates, then enriches the survivors.
/// Per-provider and per-candidate failures degrade the result set; they
/// never abort the batch.
pub async fn find_candidates(
    fetcher: &dyn PageFetcher,
    judge: &dyn ProductJudge,
    registry: &[ProviderSpec],
    price: f64,
    profile: &CategoryProfile,
    config: &PipelineConfig,
) -> Vec<CandidateProduct> {
    // provider x search-term matrix, fetched with bounded concurrency but
    // merged in job order so first-occurrence dedup stays deterministic
    let jobs: Vec<(&ProviderSpec, String)> = registry
        .iter()
        .flat_map(|spec| {
            profile
                .queries()
                .into_iter()
                .map(move |query| (spec, query.to_string()))
        })
        .collect();

    let fetched: Vec<(&ProviderSpec, Vec<ResultItem>)> = stream::iter(jobs)
        .map(|(spec, query)| async move {
            match extract_items(fetcher, spec, &query).await {
                Ok(items) => (spec, items),
                Err(e) => {
                    warn!(provider = %spec.name, query = %query, error = %e, "candidate fetch failed, skipping");
                    (spec, Vec::new())
                }
            }
        })
        .buffered(config.enrichment_concurrency.max(1))
        .collect()
        .await;

    let (low, high) = config.price_window(price);
    let mut by_link: IndexMap<String, RankedCandidate> = IndexMap::new();

    for (spec, items) in fetched {
        for item in items {
            let Some(item_price) = item.price else {
                continue;
            };
            if item_price < low || item_price > high {
                continue;
            }

            let haystack = format!("{} {}", item.name, item.description).to_lowercase();
            if matches_any(&haystack, &profile.exclude_terms) {
                continue;
            }
            let key_hits = match_count(&haystack, &profile.key_characteristics);
            let use_hits = match_count(&haystack, &profile.target_use);
            if key_hits + use_hits < config.min_characteristic_hits {
                continue;
            }

            let Some(canonical) = canonicalize_link(&spec.base_url, &item.link) else {
                debug!(provider = %spec.name, name = %item.name, "dropping item without resolvable link");
                continue;
            };
            if by_link.contains_key(&canonical) {
                // first occurrence wins
                continue;
            }

            by_link.insert(
                canonical.clone(),
                RankedCandidate {
                    product: CandidateProduct {
                        name: item.name,
                        brand: item.brand,
                        price: item_price,
                        image_url: item.image_url,
                        canonical_link: canonical,
                        source_host: spec.host().to_string(),
                        description: item.description,
                        ingredients: Vec::new(),
                        packaging: PackagingInfo::default(),
                        eco_score: None,
                    },
                    key_hits,
                    price_diff: (item_price - price).abs(),
                },
            );
        }
    }

    let mut ranked: Vec<RankedCandidate> = by_link.into_values().collect();
    // stable: ties on both keys keep first-seen order
    ranked.sort_by(|a, b| {
        b.key_hits.cmp(&a.key_hits).then(
            a.price_diff
                .partial_cmp(&b.price_diff)
                .unwrap_or(std::cmp::Ordering::Equal),
        )
    });
    ranked.truncate(config.max_candidates);

    debug!(candidates = ranked.len(), "candidates ranked, starting enrichment");

    stream::iter(ranked.into_iter().map(|ranked| ranked.product))
        .map(|candidate| enrich_candidate(fetcher, judge, registry, candidate))
        .buffered(config.enrichment_concurrency.max(1))
        .collect()
        .await
}

/// Attach ingredients, packaging, and an eco score to one candidate.
///
/// Aggregates provider evidence first; falls back to a vision guess from
/// the candidate's image. Any failure leaves the candidate marked
/// unavailable rather than failing the batch.
async fn enrich_candidate(
    fetcher: &dyn PageFetcher,
    judge: &dyn ProductJudge,
    registry: &[ProviderSpec],
    mut candidate: CandidateProduct,
) -> CandidateProduct {
    let fragment = aggregate(fetcher, registry, &candidate.name).await;

    if fragment.has_ingredients() {
        candidate.ingredients = fragment.ingredients;
        candidate.packaging = PackagingInfo {
            materials: fragment.packaging_materials,
            recyclable: fragment.recyclable,
        };
    } else {
        match judge
            .guess_attributes(&ProductImage::url(candidate.image_url.clone()))
            .await
        {
            Ok(guess) if !guess.ingredients.is_empty() => {
                candidate.ingredients = guess.ingredients;
                candidate.packaging = PackagingInfo {
                    materials: guess.packaging_materials,
                    recyclable: guess.recyclable,
                };
            }
            Ok(_) => {
                debug!(name = %candidate.name, "no ingredient signal for candidate");
                candidate.ingredients = vec![INGREDIENTS_UNAVAILABLE.to_string()];
                return candidate;
            }
            Err(e) => {
                warn!(name = %candidate.name, error = %e, "candidate attribute guess failed");
                candidate.ingredients = vec![INGREDIENTS_UNAVAILABLE.to_string()];
                return candidate;
            }
        }
    }

    match judge
        .score_footprint(
            &candidate.ingredients,
            &candidate.packaging.materials,
            candidate.packaging.recyclable,
        )
        .await
    {
        Ok(result) => candidate.eco_score = Some(result.score),
        Err(e) => {
            warn!(name = %candidate.name, error = %e, "candidate scoring failed, leaving unscored");
        }
    }

    candidate
}

/// Resolve a possibly-relative link to an absolute canonical URL.
fn canonicalize_link(base_url: &str, link: &str) -> Option<String> {
    if link.is_empty() {
        return None;
    }
    if let Ok(absolute) = Url::parse(link) {
        return Some(absolute.to_string());
    }
    let base = Url::parse(base_url).ok()?;
    base.join(link).ok().map(|url| url.to_string())
}

fn matches_any(haystack: &str, needles: &[String]) -> bool {
    needles
        .iter()
        .filter(|needle| !needle.is_empty())
        .any(|needle| haystack.contains(&needle.to_lowercase()))
}

/// Number of needles appearing as substrings of the haystack.
fn match_count(haystack: &str, needles: &[String]) -> usize {
    needles
        .iter()
        .filter(|needle| !needle.is_empty())
        .filter(|needle| haystack.contains(&needle.to_lowercase()))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::SelectorRules;
    use crate::testing::{MockFetcher, MockJudge};

    fn shop_spec(name: &str) -> ProviderSpec {
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
                description: Some("p.desc".to_string()),
                ingredient_text: Some("li.ingredient".to_string()),
                packaging_text: None,
            },
        }
    }

    fn item_html(entries: &[(&str, &str, &str, &str)]) -> String {
        let mut html = String::new();
        for (name, price, link, desc) in entries {
            html.push_str(&format!(
                r#"<div class="item"><a href="{link}"><img src="https://cdn.test/x.jpg"></a>
                   <h3>{name}</h3><span class="price">{price}</span><p class="desc">{desc}</p></div>"#
            ));
        }
        html
    }

    fn hair_profile() -> CategoryProfile {
        CategoryProfile::new("shampoo")
            .with_target_use(["hair fall"])
            .with_key_characteristics(["strength", "long hair"])
            .with_exclude_terms(["oil"])
    }

    #[test]
    fn test_canonicalize_link() {
        assert_eq!(
            canonicalize_link("https://shop.test", "/p/1").as_deref(),
            Some("https://shop.test/p/1")
        );
        assert_eq!(
            canonicalize_link("https://shop.test", "https://other.test/p/1").as_deref(),
            Some("https://other.test/p/1")
        );
        assert_eq!(canonicalize_link("https://shop.test", ""), None);
    }

    #[test]
    fn test_match_count_and_veto() {
        let haystack = "anti hair fall strength shampoo for long hair";
        let profile = hair_profile();

        assert_eq!(match_count(haystack, &profile.key_characteristics), 2);
        assert_eq!(match_count(haystack, &profile.target_use), 1);
        assert!(!matches_any(haystack, &profile.exclude_terms));
        assert!(matches_any(
            "hair oil strengthener",
            &profile.exclude_terms
        ));
    }

    #[tokio::test]
    async fn test_price_window_boundaries_inclusive() {
        let registry = vec![shop_spec("shop")];
        let html = item_html(&[
            ("Strength Shampoo hair fall A", "700", "/p/low", "for long hair"),
            ("Strength Shampoo hair fall B", "1300", "/p/high", "for long hair"),
            ("Strength Shampoo hair fall C", "699", "/p/below", "for long hair"),
            ("Strength Shampoo hair fall D", "1301", "/p/above", "for long hair"),
        ]);
        let fetcher = MockFetcher::new().with_page_for_all_queries(&registry[0], &html);
        let judge = MockJudge::new();

        let candidates = find_candidates(
            &fetcher,
            &judge,
            &registry,
            1000.0,
            &hair_profile(),
            &PipelineConfig::default(),
        )
        .await;

        let links: Vec<&str> = candidates
            .iter()
            .map(|c| c.canonical_link.as_str())
            .collect();
        assert!(links.contains(&"https://shop.test/p/low"));
        assert!(links.contains(&"https://shop.test/p/high"));
        assert!(!links.contains(&"https://shop.test/p/below"));
        assert!(!links.contains(&"https://shop.test/p/above"));
    }

    #[tokio::test]
    async fn test_exclude_term_vetoes_despite_matches() {
        let registry = vec![shop_spec("shop")];
        let html = item_html(&[
            (
                "Anti Hair Fall Strength Shampoo",
                "1000",
                "/p/good",
                "for long hair",
            ),
            (
                "Hair Oil Strengthener",
                "1000",
                "/p/oil",
                "strength for long hair, stops hair fall",
            ),
        ]);
        let fetcher = MockFetcher::new().with_page_for_all_queries(&registry[0], &html);
        let judge = MockJudge::new();

        let candidates = find_candidates(
            &fetcher,
            &judge,
            &registry,
            1000.0,
            &hair_profile(),
            &PipelineConfig::default(),
        )
        .await;

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "Anti Hair Fall Strength Shampoo");
    }

    #[tokio::test]
    async fn test_dedup_by_canonical_link_first_wins() {
        let registry = vec![shop_spec("shop")];
        let html = item_html(&[
            (
                "Strength Shampoo hair fall first",
                "900",
                "/p/same",
                "for long hair",
            ),
            (
                "Strength Shampoo hair fall second",
                "1100",
                "https://shop.test/p/same",
                "for long hair",
            ),
        ]);
        let fetcher = MockFetcher::new().with_page_for_all_queries(&registry[0], &html);
        let judge = MockJudge::new();

        let candidates = find_candidates(
            &fetcher,
            &judge,
            &registry,
            1000.0,
            &hair_profile(),
            &PipelineConfig::default(),
        )
        .await;

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "Strength Shampoo hair fall first");
    }

    #[tokio::test]
    async fn test_ranking_is_deterministic() {
        // match counts [2, 2, 3] and price diffs [50, 10, 5] at price 1000
        // must come out as [idx2, idx1, idx0]
        let registry = vec![shop_spec("shop")];
        let html = item_html(&[
            ("strength shampoo hair fall zero", "1050", "/p/0", "two hits"),
            ("strength shampoo hair fall one", "990", "/p/1", "two hits"),
            (
                "strength shampoo hair fall two",
                "995",
                "/p/2",
                "for long hair",
            ),
        ]);
        let fetcher = MockFetcher::new().with_page_for_all_queries(&registry[0], &html);
        let judge = MockJudge::new();

        let profile = CategoryProfile::new("shampoo")
            .with_target_use(["hair fall"])
            .with_key_characteristics(["strength", "long hair", "shampoo"]);

        let candidates = find_candidates(
            &fetcher,
            &judge,
            &registry,
            1000.0,
            &profile,
            &PipelineConfig::default(),
        )
        .await;

        let links: Vec<&str> = candidates
            .iter()
            .map(|c| c.canonical_link.as_str())
            .collect();
        assert_eq!(
            links,
            vec![
                "https://shop.test/p/2",
                "https://shop.test/p/1",
                "https://shop.test/p/0"
            ]
        );
    }

    #[tokio::test]
    async fn test_truncates_to_max_candidates() {
        let registry = vec![shop_spec("shop")];
        let entries: Vec<(String, String, String)> = (0..20)
            .map(|i| {
                (
                    format!("Strength Shampoo hair fall {i}"),
                    "1000".to_string(),
                    format!("/p/{i}"),
                )
            })
            .collect();
        let borrowed: Vec<(&str, &str, &str, &str)> = entries
            .iter()
            .map(|(n, p, l)| (n.as_str(), p.as_str(), l.as_str(), "for long hair"))
            .collect();
        let html = item_html(&borrowed);
        let fetcher = MockFetcher::new().with_page_for_all_queries(&registry[0], &html);
        let judge = MockJudge::new();

        let candidates = find_candidates(
            &fetcher,
            &judge,
            &registry,
            1000.0,
            &hair_profile(),
            &PipelineConfig::default(),
        )
        .await;

        assert_eq!(candidates.len(), 15);
    }

    #[tokio::test]
    async fn test_enrichment_failure_marks_candidate_only() {
        let registry = vec![shop_spec("shop")];
        let html = item_html(&[(
            "Strength Shampoo hair fall",
            "1000",
            "/p/1",
            "for long hair",
        )]);
        // search pages resolve, but aggregation for the candidate name
        // finds nothing and the vision guess fails
        let fetcher = MockFetcher::new().with_page_for_all_queries(&registry[0], &html);
        let judge = MockJudge::new().fail_guess();

        let candidates = find_candidates(
            &fetcher,
            &judge,
            &registry,
            1000.0,
            &hair_profile(),
            &PipelineConfig::default(),
        )
        .await;

        assert_eq!(candidates.len(), 1);
        assert_eq!(
            candidates[0].ingredients,
            vec![INGREDIENTS_UNAVAILABLE.to_string()]
        );
        assert_eq!(candidates[0].eco_score, None);
    }

    #[tokio::test]
    async fn test_enrichment_scores_resolved_candidates() {
        let registry = vec![shop_spec("shop")];
        let html = item_html(&[(
            "Strength Shampoo hair fall",
            "1000",
            "/p/1",
            "for long hair",
        )]);
        let fetcher = MockFetcher::new().with_page_for_all_queries(&registry[0], &html);
        let judge = MockJudge::new().with_guessed_ingredients(["Aqua", "Sulfate"]);

        let candidates = find_candidates(
            &fetcher,
            &judge,
            &registry,
            1000.0,
            &hair_profile(),
            &PipelineConfig::default(),
        )
        .await;

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].ingredients, vec!["Aqua", "Sulfate"]);
        assert!(candidates[0].eco_score.is_some());
    }
}
