//! Stack of currently open tag names used by the scanner

/// Last-in-first-out sequence of open tag names
///
/// The depth equals the current nesting level and the top names the tag that
/// encloses any text run being read.
#[derive(Debug, Clone, Default)]
pub struct TagStack {
    names: Vec<String>,
}

impl TagStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>) {
        self.names.push(name.into());
    }

    /// Remove and return the innermost tag, `None` when nothing is open
    pub fn pop(&mut self) -> Option<String> {
        self.names.pop()
    }

    /// The innermost open tag, `None` when nothing is open
    pub fn peek(&self) -> Option<&str> {
        self.names.last().map(String::as_str)
    }

    pub fn depth(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_peek() {
        let mut stack = TagStack::new();
        assert!(stack.is_empty());
        assert_eq!(stack.peek(), None);
        assert_eq!(stack.pop(), None);

        stack.push("html");
        stack.push("body");
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.peek(), Some("body"));

        assert_eq!(stack.pop().as_deref(), Some("body"));
        assert_eq!(stack.peek(), Some("html"));
        assert_eq!(stack.pop().as_deref(), Some("html"));
        assert_eq!(stack.pop(), None);
        assert_eq!(stack.depth(), 0);
    }
}
