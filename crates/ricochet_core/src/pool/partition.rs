use std::ops::Range;

/// Length of each partition when `len` items are split into at most `parts`
/// contiguous pieces. The last piece may be shorter.
#[inline]
pub fn chunk_len(len: usize, parts: usize) -> usize {
    len.div_ceil(parts.max(1)).max(1)
}

/// Split `0..len` into at most `parts` contiguous, disjoint, non-empty ranges
/// of equal size (the last one takes the remainder).
pub fn partition(len: usize, parts: usize) -> Vec<Range<usize>> {
    if len == 0 {
        return Vec::new();
    }
    let chunk = chunk_len(len, parts);
    (0..len)
        .step_by(chunk)
        .map(|start| start..(start + chunk).min(len))
        .collect()
}
