//! Markdown rendering trait.

/// Trait for converting the provider's lightweight markup into the display
/// format stored on correspondence audit records.
pub trait MarkdownRenderer: Send + Sync + std::fmt::Debug + 'static {
    /// Render markup to the audit display format.
    fn to_display(&self, markup: &str) -> String;
}
