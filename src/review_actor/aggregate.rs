use crate::domain::round1;

/// Rating summary written onto a dish.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingSummary {
    pub rating: f64,
    pub review_count: u64,
}

/// Mean of `ratings` rounded to one decimal.
///
/// An empty set yields `fallback` (0 unless the caller just wrote a rating the
/// read may not include yet).
pub fn summarize(ratings: &[u8], fallback: f64) -> RatingSummary {
    if ratings.is_empty() {
        return RatingSummary { rating: round1(fallback), review_count: 0 };
    }
    let sum: f64 = ratings.iter().map(|r| f64::from(*r)).sum();
    RatingSummary {
        rating: round1(sum / ratings.len() as f64),
        review_count: ratings.len() as u64,
    }
}
