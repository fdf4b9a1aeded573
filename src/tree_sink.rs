/// Attribute key holding the level at which a node first appears in the hierarchy.
pub const LEVEL_ATTRIBUTE: &str = "level";
/// Attribute key holding a truncated rendering of a node's elements.
pub const SUMMARY_ATTRIBUTE: &str = "summary";
/// Attribute key holding the full rendering of a node's elements.
pub const CONTENT_ATTRIBUTE: &str = "content";

const SUMMARY_MAX_CHARS: usize = 40;

/// Callback contract for building a visual or structural copy of the merge tree without
/// depending on any particular tree or graph library. See [`crate::Hierarchy::export_tree`].
pub trait TreeSink {
    type Handle: Clone;

    /// Adds a new child below `parent` and returns its handle.
    fn add_child(&mut self, parent: &Self::Handle) -> Self::Handle;

    fn set_attribute(&mut self, handle: &Self::Handle, key: &str, value: &str);
}

pub(crate) fn summarize(content: &str) -> String {
    if content.chars().count() <= SUMMARY_MAX_CHARS {
        return content.to_string();
    }
    let mut summary: String = content.chars().take(SUMMARY_MAX_CHARS).collect();
    summary.push_str("...");
    summary
}
