use std::fmt;

use crate::error::ContextError;

/// Stack of selector fragments describing the ancestors of the node being visited.
///
/// Rendered bottom to top and joined with `" > "`, e.g.
/// `html > body > div#main.wide > span`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    fragments: Vec<String>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, fragment: impl Into<String>) {
        self.fragments.push(fragment.into());
    }

    /// Remove and return the innermost fragment.
    pub fn pop(&mut self) -> Result<String, ContextError> {
        self.fragments.pop().ok_or(ContextError::Empty)
    }

    pub fn render(&self) -> String {
        self.fragments.join(" > ")
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Build the fragment for one element: tag name, then `#id`, then one
    /// `.class` per whitespace-separated class name.
    pub fn fragment_for(tag: &str, id: Option<&str>, class: Option<&str>) -> String {
        let mut fragment = tag.to_string();
        if let Some(id) = id {
            fragment.push('#');
            fragment.push_str(id);
        }
        if let Some(class) = class {
            for name in class.split_whitespace() {
                fragment.push('.');
                fragment.push_str(name);
            }
        }
        fragment
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
