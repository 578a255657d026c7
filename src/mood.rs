//! Title-bar mood that sours while the page keeps loading.

/// Glyphs the title bar cycles through as the wait drags on
pub const MOOD_STAGES: [&str; 4] = ["😊", "😐", "😒", "😴"];

/// Stage index after `elapsed_ms`, one step per `stage_ms`, stopping at the last.
pub fn stage_at(elapsed_ms: u64, stage_ms: u64) -> usize {
    let stage = elapsed_ms / stage_ms.max(1);
    (stage as usize).min(MOOD_STAGES.len() - 1)
}

pub fn glyph_at(elapsed_ms: u64, stage_ms: u64) -> &'static str {
    MOOD_STAGES[stage_at(elapsed_ms, stage_ms)]
}
