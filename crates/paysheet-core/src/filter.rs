//! Search projection over the loaded payment types.

use crate::PaymentType;

/// Items whose name contains `search_text`, ignoring case, in their original order.
///
/// An empty search returns every item. Nothing is cached; callers recompute on
/// every read so the result can never go stale relative to its inputs.
pub fn filtered_items<'a>(items: &'a [PaymentType], search_text: &str) -> Vec<&'a PaymentType> {
    if search_text.is_empty() {
        return items.iter().collect();
    }
    let query_lower = search_text.to_lowercase();
    items
        .iter()
        .filter(|item| item.name.to_lowercase().contains(&query_lower))
        .collect()
}
