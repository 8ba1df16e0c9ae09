//! Search filter: compute filter-hidden nodes without touching `visible`

use std::collections::HashSet;

use super::{NodeId, PartTree};
use crate::state::changes::TreeChanges;

impl PartTree {
    /// Recompute `filter_hidden` for `query`.
    ///
    /// Non-empty query: a node is shown when its name contains the query
    /// (case-insensitive) or a descendant's does; ancestors of shown nodes are
    /// expanded and stay so. Empty query: hidden = below a collapsed ancestor.
    pub fn apply_search(&mut self, query: &str) -> TreeChanges {
        let mut changes = TreeChanges::default();
        let needle = query.to_lowercase();

        let hidden: HashSet<NodeId> = if needle.is_empty() {
            self.nodes
                .keys()
                .filter(|id| {
                    self.ancestors(id)
                        .iter()
                        .any(|a| self.get(a).is_some_and(|n| !n.is_expanded()))
                })
                .cloned()
                .collect()
        } else {
            let matched: Vec<NodeId> = self
                .nodes
                .values()
                .filter(|n| n.name.to_lowercase().contains(&needle))
                .map(|n| n.id.clone())
                .collect();

            let mut shown: HashSet<NodeId> = HashSet::new();
            let mut to_expand: Vec<NodeId> = Vec::new();
            for id in matched {
                for ancestor in self.ancestors(&id) {
                    if self.get(&ancestor).is_some_and(|n| n.kind.is_container()) {
                        to_expand.push(ancestor.clone());
                    }
                    shown.insert(ancestor);
                }
                shown.insert(id);
            }
            for id in to_expand {
                if self.set_expanded(&id, true) {
                    changes.expanded.push((id, true));
                }
            }

            self.nodes
                .keys()
                .filter(|id| !shown.contains(*id))
                .cloned()
                .collect()
        };

        if hidden != self.filter_hidden {
            self.filter_hidden = hidden;
            changes.filter = true;
        }
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::tree_of;
    use super::super::NodeKind;
    use super::*;

    fn car() -> PartTree {
        tree_of(&[
            ("Root", NodeKind::ModelRoot, None),
            ("Chassis", NodeKind::Assembly, Some("Root")),
            ("WheelFL", NodeKind::Mesh, Some("Chassis")),
            ("WheelFR", NodeKind::Mesh, Some("Chassis")),
            ("Engine", NodeKind::Assembly, Some("Chassis")),
            ("Block", NodeKind::Mesh, Some("Engine")),
        ])
    }

    fn shown(t: &PartTree) -> Vec<String> {
        t.preorder()
            .into_iter()
            .filter(|id| !t.is_filter_hidden(id))
            .collect()
    }

    #[test]
    fn test_wheel_query() {
        let mut t = car();
        let c = t.apply_search("wheel");
        assert!(c.filter);
        assert_eq!(shown(&t), vec!["Root", "Chassis", "WheelFL", "WheelFR"]);
        assert!(t.get("Chassis").unwrap().expanded);
        assert!(t.get("Root").unwrap().expanded);
        assert!(!t.get("Engine").unwrap().expanded);
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let mut t = car();
        t.apply_search("BLOCK");
        assert_eq!(shown(&t), vec!["Root", "Chassis", "Engine", "Block"]);
    }

    #[test]
    fn test_whitespace_is_part_of_the_query() {
        let mut t = tree_of(&[
            ("Root", NodeKind::ModelRoot, None),
            ("Chassis", NodeKind::Assembly, Some("Root")),
            ("Front axle", NodeKind::Mesh, Some("Chassis")),
            ("Block", NodeKind::Mesh, Some("Chassis")),
        ]);
        t.apply_search(" ");
        assert_eq!(shown(&t), vec!["Root", "Chassis", "Front axle"]);

        t.apply_search(" block ");
        assert!(shown(&t).is_empty());
    }

    #[test]
    fn test_visible_flag_untouched() {
        let mut t = car();
        t.apply_search("wheel");
        assert!(t.get("Engine").unwrap().visible);
        assert!(t.is_filter_hidden("Engine"));
    }

    #[test]
    fn test_clearing_keeps_forced_expansion() {
        let mut t = car();
        t.apply_search("wheel");
        let c = t.apply_search("");
        assert!(c.expanded.is_empty());
        // Root and Chassis stayed expanded, Engine is still collapsed
        assert_eq!(shown(&t), vec!["Root", "Chassis", "WheelFL", "WheelFR", "Engine"]);
    }

    #[test]
    fn test_empty_query_follows_live_expand_flags() {
        let mut t = car();
        t.apply_search("");
        assert_eq!(shown(&t), vec!["Root"]);
        t.set_expanded("Root", true);
        t.apply_search("");
        assert_eq!(shown(&t), vec!["Root", "Chassis"]);
    }

    #[test]
    fn test_no_match_hides_everything() {
        let mut t = car();
        t.apply_search("zzz");
        assert!(shown(&t).is_empty());
    }

    #[test]
    fn test_same_query_twice_reports_no_change() {
        let mut t = car();
        t.apply_search("wheel");
        assert!(t.apply_search("wheel").is_empty());
    }
}
