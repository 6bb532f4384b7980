//! Per-section token budgets.

/// Most tokens any single section is given.
pub const MAX_SECTION_TOKENS: u32 = 2000;

/// Split `max_tokens` evenly across `section_count` sections, capped at
/// [`MAX_SECTION_TOKENS`].
pub fn allocate(max_tokens: u32, section_count: usize) -> u32 {
    allocate_capped(max_tokens, section_count, MAX_SECTION_TOKENS)
}

/// Even split with an explicit per-section cap. Zero sections get nothing.
pub fn allocate_capped(max_tokens: u32, section_count: usize, cap: u32) -> u32 {
    let Ok(count) = u32::try_from(section_count) else {
        return 0;
    };
    max_tokens.checked_div(count).map_or(0, |share| share.min(cap))
}
