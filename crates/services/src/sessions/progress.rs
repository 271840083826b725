/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    pub limit: u32,
    pub solved: u32,
    pub correct: u32,
    pub remaining: u32,
}
