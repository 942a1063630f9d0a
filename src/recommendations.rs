//! Recommendations
//!
//! Prompt construction and validation of language model answers. Whatever
//! the model returns, the shopper always gets a full set of real product
//! ids: invalid or missing ids are backfilled from popular products.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of products recommended.
pub const RECOMMENDATION_COUNT: usize = 6;

/// Where the recommended ids came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationSource {
    /// At least one id came from the language model.
    Ai,

    /// Every id came from the popularity ranking.
    Fallback,
}

impl RecommendationSource {
    /// Lowercase label.
    pub fn as_str(self) -> &'static str {
        match self {
            RecommendationSource::Ai => "ai",
            RecommendationSource::Fallback => "fallback",
        }
    }
}

/// The response shape of the recommendation function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    /// Recommended product ids.
    pub product_ids: Vec<Uuid>,

    /// Where the ids came from.
    pub source: RecommendationSource,
}

/// A product the model may choose from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Product identifier.
    pub id: Uuid,

    /// Product name.
    pub name: String,

    /// Category name.
    pub category: Option<String>,
}

/// A previous order, as product names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PastOrder {
    /// Names of the products in the order.
    pub items: Vec<String>,
}

/// Build the instruction sent to the language model.
pub fn build_prompt(history: &[PastOrder], catalog: &[CatalogEntry]) -> String {
    let mut prompt = String::from(
        "You are a grocery shopping assistant. Based on the customer's order history, \
         recommend products from the catalog they are likely to buy next.\n\n",
    );

    prompt.push_str("Order history (most recent first):\n");

    if history.iter().all(|order| order.items.is_empty()) {
        prompt.push_str("- No previous orders\n");
    }

    for (index, order) in history.iter().filter(|o| !o.items.is_empty()).enumerate() {
        prompt.push_str(&format!("{}. {}\n", index + 1, order.items.join(", ")));
    }

    prompt.push_str("\nCatalog:\n");

    for entry in catalog {
        let category = entry.category.as_deref().unwrap_or("Uncategorized");
        prompt.push_str(&format!("- {} | {} | {category}\n", entry.id, entry.name));
    }

    prompt.push_str(&format!(
        "\nRespond with ONLY a JSON array of exactly {RECOMMENDATION_COUNT} product ids \
         from the catalog, for example [\"id1\", \"id2\"]. Do not include any other text."
    ));

    prompt
}

/// Pull the first JSON array of strings out of a model answer.
///
/// Models often wrap the array in prose or code fences; anything that is not
/// a string inside the array is skipped. Returns an empty list when no array
/// can be found.
pub fn parse_model_ids(text: &str) -> Vec<String> {
    for (start, _) in text.match_indices('[') {
        let Some(rest) = text.get(start..) else {
            continue;
        };

        let mut values =
            serde_json::Deserializer::from_str(rest).into_iter::<Vec<serde_json::Value>>();

        if let Some(Ok(values)) = values.next() {
            return values
                .into_iter()
                .filter_map(|value| match value {
                    serde_json::Value::String(id) => Some(id.trim().to_string()),
                    _ => None,
                })
                .collect();
        }
    }

    Vec::new()
}

/// Choose the final recommendations.
///
/// Model ids are kept when they parse and exist in `catalog`, in the model's
/// order and without duplicates. The rest is filled from `popular`, then from
/// the catalog itself. The result has [`RECOMMENDATION_COUNT`] ids, or fewer
/// only when the catalog is smaller.
pub fn select_recommendations(
    model_ids: &[String],
    catalog: &[CatalogEntry],
    popular: &[Uuid],
) -> Recommendations {
    let known: FxHashSet<Uuid> = catalog.iter().map(|entry| entry.id).collect();

    let mut seen = FxHashSet::default();
    let mut product_ids = Vec::with_capacity(RECOMMENDATION_COUNT);

    let mut push = |id: Uuid, ids: &mut Vec<Uuid>| {
        if ids.len() < RECOMMENDATION_COUNT && known.contains(&id) && seen.insert(id) {
            ids.push(id);
        }
    };

    for id in model_ids.iter().filter_map(|id| Uuid::parse_str(id).ok()) {
        push(id, &mut product_ids);
    }

    let source = if product_ids.is_empty() {
        RecommendationSource::Fallback
    } else {
        RecommendationSource::Ai
    };

    for id in popular.iter().copied().chain(catalog.iter().map(|e| e.id)) {
        push(id, &mut product_ids);
    }

    Recommendations {
        product_ids,
        source,
    }
}

/// Recommendations made purely from popularity, used when the model fails.
pub fn fallback_recommendations(catalog: &[CatalogEntry], popular: &[Uuid]) -> Recommendations {
    select_recommendations(&[], catalog, popular)
}
