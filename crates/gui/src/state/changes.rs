//! Description of what a tree operation changed.
//!
//! Model operations return a [`TreeChanges`]; the outliner pushes the
//! visibility part into the scene graph and the UI redraws from it.

use super::tree::NodeId;

#[derive(Default, Debug, Clone, PartialEq)]
pub struct TreeChanges {
    /// Nodes whose `visible` flag changed, with the new value
    pub visibility: Vec<(NodeId, bool)>,
    /// Nodes whose stored `expanded` flag changed, with the new value
    pub expanded: Vec<(NodeId, bool)>,
    /// Selection set or order changed
    pub selection: bool,
    /// Parent/children links changed
    pub structure: bool,
    /// Filter-hidden set changed
    pub filter: bool,
}

impl TreeChanges {
    pub fn is_empty(&self) -> bool {
        self.visibility.is_empty()
            && self.expanded.is_empty()
            && !self.selection
            && !self.structure
            && !self.filter
    }

    /// Fold another change set into this one
    pub fn merge(&mut self, other: TreeChanges) {
        self.visibility.extend(other.visibility);
        self.expanded.extend(other.expanded);
        self.selection |= other.selection;
        self.structure |= other.structure;
        self.filter |= other.filter;
    }

    /// Final visibility recorded for `id`, if it changed
    pub fn visibility_of(&self, id: &str) -> Option<bool> {
        self.visibility
            .iter()
            .rev()
            .find(|(n, _)| n == id)
            .map(|(_, v)| *v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        assert!(TreeChanges::default().is_empty());
    }

    #[test]
    fn test_merge() {
        let mut a = TreeChanges {
            visibility: vec![("x".into(), false)],
            ..Default::default()
        };
        a.merge(TreeChanges {
            visibility: vec![("x".into(), true)],
            selection: true,
            ..Default::default()
        });
        assert!(a.selection);
        assert!(!a.structure);
        assert_eq!(a.visibility_of("x"), Some(true));
        assert_eq!(a.visibility_of("y"), None);
    }
}
