//! Context assembly from retrieved review blocks

use crate::store::SearchHit;

/// Joins retrieved contents, unmodified, into the prompt context
pub struct ContextAssembler {
    separator: String,
}

impl ContextAssembler {
    #[must_use]
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }

    /// Contents in retrieval order
    #[must_use]
    pub fn assemble(&self, hits: &[SearchHit]) -> String {
        hits.iter()
            .map(|hit| hit.content.as_str())
            .collect::<Vec<_>>()
            .join(&self.separator)
    }
}

impl Default for ContextAssembler {
    fn default() -> Self {
        Self::new("\n\n")
    }
}
