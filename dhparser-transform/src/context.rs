/*!
[`TransformContext`]: what a [`crate::Transformer`] sees besides the node it
is mutating: the ordered sequence of ancestors from root to the current
node. Keeping only each ancestor's tag name (not a live reference to the
ancestor node itself) sidesteps a borrow conflict with the `&mut Node` of
the node actually being visited, and is all the standard transformers
(`forbid` in particular) need.
*/

use dhparser_syntax::Error;

/// The context a [`crate::Transformer`] runs in: the chain of tag names
/// from the root down to (but not including) the node it is mutating, and
/// a place to record validation errors (`forbid`, `assert_content`)
/// without aborting the walk.
pub struct TransformContext<'a> {
    ancestors: &'a [Box<str>],
    errors: &'a mut Vec<Error>,
}

impl<'a> TransformContext<'a> {
    pub(crate) fn new(ancestors: &'a [Box<str>], errors: &'a mut Vec<Error>) -> Self {
        TransformContext { ancestors, errors }
    }

    /// The tag names of every ancestor, root first, not including the
    /// node currently being visited.
    pub fn ancestor_names(&self) -> &[Box<str>] {
        self.ancestors
    }

    /// The immediate parent's tag name, if any (`None` at the root).
    pub fn parent_name(&self) -> Option<&str> {
        self.ancestors.last().map(|name| &**name)
    }

    /// Record a validation error against the tree being transformed.
    pub fn push_error(&mut self, error: Error) {
        self.errors.push(error);
    }
}
