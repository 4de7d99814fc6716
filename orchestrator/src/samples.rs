/// Canned reviews for quick demos, selectable with `--sample N`.
pub const SAMPLE_REVIEWS: [&str; 4] = [
    "What a fantastic movie! The story, acting and direction were top notch.",
    "I wasted two hours of my life. The plot was weak and the acting was terrible.",
    "A pleasant surprise, had fun the whole time, would watch again.",
    "Overhyped. It had flashes of good moments but mostly dragged on.",
];

/// 1-based lookup into the sample set.
pub fn sample_review(number: usize) -> Option<&'static str> {
    number
        .checked_sub(1)
        .and_then(|index| SAMPLE_REVIEWS.get(index))
        .copied()
}
