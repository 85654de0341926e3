//! Owning slot for a single child node.

/// Uniquely owned child of a node.
///
/// A slot is normally full. It is empty only after [`crate::LeafCopy`] or an
/// explicit [`Child::take`], and traversal skips empty slots. `Clone` copies
/// the whole subtree.
#[derive(Debug, Clone, PartialEq)]
pub struct Child<T>(Option<Box<T>>);

impl<T> Child<T> {
    pub fn new(node: T) -> Self {
        Child(Some(Box::new(node)))
    }

    pub fn empty() -> Self {
        Child(None)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    pub fn get(&self) -> Option<&T> {
        self.0.as_deref()
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.0.as_deref_mut()
    }

    /// Moves the child out, leaving the slot empty.
    pub fn take(&mut self) -> Option<T> {
        self.0.take().map(|node| *node)
    }

    /// Puts `node` into the slot and returns the previous occupant.
    pub fn replace(&mut self, node: T) -> Option<T> {
        self.0.replace(Box::new(node)).map(|node| *node)
    }

    pub fn into_inner(self) -> Option<T> {
        self.0.map(|node| *node)
    }
}

impl<T> Default for Child<T> {
    fn default() -> Self {
        Child::empty()
    }
}

impl<T> From<T> for Child<T> {
    fn from(node: T) -> Self {
        Child::new(node)
    }
}
