use serde::Serialize;

/// Count and mean rating over a set of reviews.
///
/// `average` keeps one decimal (`[4, 5]` gives `4.5`). Older clients saw the
/// mean truncated to a whole number (`4`); this differs on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingSummary {
    pub total: i64,
    pub average: f64,
}

impl RatingSummary {
    /// An empty set averages to 0 rather than NaN.
    pub fn from_ratings<I>(ratings: I) -> Self
    where
        I: IntoIterator<Item = i32>,
    {
        let (total, sum) = ratings
            .into_iter()
            .fold((0_i64, 0_i64), |(n, sum), r| (n + 1, sum + i64::from(r)));
        let average = if total == 0 {
            0.0
        } else {
            round_to_tenth(sum as f64 / total as f64)
        };
        Self { total, average }
    }
}

/// One decimal place, halves rounded away from zero.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
