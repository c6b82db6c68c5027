/// Whole-number percentage of `correct` out of `total`, `total` floored at 1.
///
/// Halves round to even, so 12.5 becomes 12 and 87.5 becomes 88.
pub fn percent(correct: usize, total: usize) -> u32 {
    let ratio = 100.0 * correct as f64 / total.max(1) as f64;
    ratio.round_ties_even() as u32
}

/// Seconds until `deadline`, rounded up so a running countdown never shows 0.
pub fn ceil_secs(remaining: std::time::Duration) -> u64 {
    let secs = remaining.as_secs();
    if remaining.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs
    }
}
