/// Cosine similarity clamped into `[0, 1]`.
///
/// Raw cosine lives in `[-1, 1]`; negative values mean "opposed" which, for
/// ranking purposes, is no better than unrelated. Mismatched or empty vectors
/// score zero.
pub fn clamped_cosine(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(0.0, 1.0)
}
