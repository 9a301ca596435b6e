//! Wrap-around coordinate remapping.

/// Shifts `coordinate` by `threshold` along an axis of extent `limit`,
/// wrapping past either edge.
///
/// The branches are checked in order: past the high edge subtracts `limit`,
/// below zero adds `limit`, otherwise the shifted value is returned as is.
/// A shifted value equal to `limit` lands in the last branch and is returned
/// unchanged, so callers reading pixels must accept the axis extent itself.
///
/// ```
/// use channel_shift::resolver::resolve;
///
/// assert_eq!(resolve(95, 100, 10), 5);
/// assert_eq!(resolve(5, 100, -10), 95);
/// assert_eq!(resolve(90, 100, 10), 100);
/// ```
#[inline]
pub fn resolve(coordinate: i64, limit: i64, threshold: i64) -> i64 {
    let shifted = coordinate + threshold;

    if shifted > limit {
        shifted - limit
    } else if shifted < 0 {
        shifted + limit
    } else {
        shifted
    }
}
