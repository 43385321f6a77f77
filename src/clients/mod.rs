//! Typed clients over the collection actors.
//!
//! Single-document rules live in the entities; anything spanning two
//! collections (order completion, rating aggregates, cart snapshots) is
//! orchestrated here.

#[macro_use]
mod macros;

pub mod cart_client;
pub mod chef_client;
pub mod conversation_client;
pub mod dish_client;
pub mod order_client;
pub mod payment_client;
pub mod review_client;
pub mod stats_client;
pub mod user_client;

pub use cart_client::*;
pub use chef_client::*;
pub use conversation_client::*;
pub use dish_client::*;
pub use order_client::*;
pub use payment_client::*;
pub use review_client::*;
pub use stats_client::*;
pub use user_client::*;

use serde::Serialize;

/// One page of a newest-first listing. Pages are 1-based.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub pages: usize,
}

impl<T> Page<T> {
    pub fn of(all: Vec<T>, page: usize, per_page: usize) -> Self {
        let page = page.max(1);
        let per_page = per_page.max(1);
        let total = all.len();
        let items = all.into_iter().skip((page - 1).saturating_mul(per_page)).take(per_page).collect();
        Self {
            items,
            total,
            page,
            per_page,
            pages: total.div_ceil(per_page),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_bounds() {
        let page = Page::of((1..=25).collect::<Vec<_>>(), 3, 10);
        assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
        assert_eq!(page.pages, 3);

        let past_end = Page::of(vec![1, 2], 5, 10);
        assert!(past_end.items.is_empty());
        assert_eq!(past_end.total, 2);

        let zero = Page::of(vec![1, 2], 0, 0);
        assert_eq!(zero.items, vec![1]);

        let huge = Page::of(vec![1, 2, 3], usize::MAX, 10);
        assert!(huge.items.is_empty());
        assert_eq!(huge.page, usize::MAX);
        assert_eq!(huge.pages, 1);
    }
}
