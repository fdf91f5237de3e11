/// A generic stack implementation with circular dependency detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stack<T: PartialEq + Clone> {
    items: Vec<T>,
}

impl<T: PartialEq + Clone> Stack<T> {
    /// Creates a new empty stack.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: vec![] }
    }

    /// Pushes an item onto the top of the stack.
    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Removes and returns the top item from the stack.
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// Returns `true` if the item is currently on the stack.
    #[must_use]
    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    /// Finds a circular dependency starting from the given item.
    ///
    /// If the item is already on the stack, the returned path holds every
    /// item from its first occurrence to the top of the stack, followed by
    /// the item itself.
    #[must_use]
    pub fn find_circular_dependency(&self, item: &T) -> Option<Vec<T>> {
        let item_index = self.items.iter().position(|i| i == item)?;

        let mut circular_dependency = self.items[item_index..].to_vec();
        circular_dependency.push(item.clone());

        Some(circular_dependency)
    }
}

impl<T: PartialEq + Clone> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_cycle_for_fresh_item() {
        let mut stack = Stack::new();
        stack.push("a");
        stack.push("b");

        assert_eq!(stack.find_circular_dependency(&"c"), None);
    }

    #[test]
    fn cycle_starts_at_first_occurrence() {
        let mut stack = Stack::new();
        stack.push("a");
        stack.push("b");
        stack.push("c");

        assert_eq!(
            stack.find_circular_dependency(&"b"),
            Some(vec!["b", "c", "b"])
        );
    }

    #[test]
    fn pop_removes_top() {
        let mut stack = Stack::new();
        stack.push(1);
        stack.push(2);

        assert_eq!(stack.pop(), Some(2));
        assert!(stack.contains(&1));
        assert!(!stack.contains(&2));
    }
}
