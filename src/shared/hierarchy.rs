//! Parent-pointer forests: tree reconstruction and re-parent planning.
//!
//! Categories, wiki categories and wiki articles are all stored as flat
//! rows carrying a nullable `parent_id`. Nothing keeps a nested structure
//! in memory between requests; every tree read rebuilds the forest from
//! the flat rows, and every structural mutation is validated here before
//! a service persists it.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::shared::slug::collation_key;

/// A flat row participating in a parent/child forest.
pub trait TreeItem {
    fn id(&self) -> i64;
    fn parent_id(&self) -> Option<i64>;
    fn display_order(&self) -> i32;
    fn sort_name(&self) -> &str;
}

/// A reconstructed tree node with its children in display order.
#[derive(Debug, Clone)]
pub struct Tree<T> {
    pub item: T,
    pub children: Vec<Tree<T>>,
}

/// Validation failures for structural mutations.
///
/// These are recoverable caller errors, not defects: the caller is expected
/// to surface the message and leave the stored forest untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HierarchyError {
    #[error("node {0} does not exist")]
    NotFound(i64),

    #[error("node {0} cannot be its own parent")]
    SelfParent(i64),

    #[error("moving node {node} under {parent} would create a cycle")]
    CycleDetected { node: i64, parent: i64 },
}

/// Rebuild a forest from flat rows.
///
/// Children are grouped under their parent and siblings are sorted by
/// `display_order` ascending, then by accent-folded name. A row whose
/// `parent_id` names an id absent from the input is promoted to a root
/// (the parent may have been deleted out-of-band); the promotion is logged
/// but not treated as an error. Every input row appears exactly once in
/// the output, even if the stored parent pointers contain a loop.
pub fn build_forest<T: TreeItem>(items: Vec<T>) -> Vec<Tree<T>> {
    let ids: HashSet<i64> = items.iter().map(|i| i.id()).collect();

    let mut roots: Vec<T> = Vec::new();
    let mut by_parent: HashMap<i64, Vec<T>> = HashMap::new();

    for item in items {
        match item.parent_id() {
            Some(parent) if parent != item.id() && ids.contains(&parent) => {
                by_parent.entry(parent).or_default().push(item);
            }
            Some(parent) => {
                tracing::warn!(
                    node_id = item.id(),
                    parent_id = parent,
                    "node references a missing parent, treating it as a root"
                );
                roots.push(item);
            }
            None => roots.push(item),
        }
    }

    sort_siblings(&mut roots);
    let mut forest: Vec<Tree<T>> = roots
        .into_iter()
        .map(|root| attach_children(root, &mut by_parent))
        .collect();

    // Rows stranded inside a parent loop are unreachable from any root and
    // would otherwise vanish from the output. Promote them too.
    while let Some(&parent) = by_parent.keys().next() {
        let mut stranded = by_parent.remove(&parent).unwrap_or_default();
        sort_siblings(&mut stranded);
        for item in stranded {
            tracing::warn!(
                node_id = item.id(),
                "node is unreachable from any root, treating it as a root"
            );
            forest.push(attach_children(item, &mut by_parent));
        }
    }

    forest
}

fn attach_children<T: TreeItem>(item: T, by_parent: &mut HashMap<i64, Vec<T>>) -> Tree<T> {
    let mut children = by_parent.remove(&item.id()).unwrap_or_default();
    sort_siblings(&mut children);
    let children = children
        .into_iter()
        .map(|child| attach_children(child, by_parent))
        .collect();
    Tree { item, children }
}

fn sort_siblings<T: TreeItem>(items: &mut [T]) {
    items.sort_by_cached_key(|i| (i.display_order(), collation_key(i.sort_name())));
}

/// Would attaching `node_id` under `proposed_parent_id` create a cycle?
///
/// `parents` is the full parent map of the kind, with any pending
/// reassignments already overlaid. The walk goes upward from the proposed
/// parent and keeps a visited set, so it terminates even on corrupted data.
pub fn has_cycle(
    node_id: i64,
    proposed_parent_id: i64,
    parents: &HashMap<i64, Option<i64>>,
) -> bool {
    if node_id == proposed_parent_id {
        return true;
    }

    let mut visited: HashSet<i64> = HashSet::new();
    let mut current = Some(proposed_parent_id);
    while let Some(id) = current {
        if id == node_id || !visited.insert(id) {
            return true;
        }
        current = parents.get(&id).copied().flatten();
    }
    false
}

/// Validate a batch of `(node id, new parent id)` re-parent updates.
///
/// The batch describes a desired structural state and is checked as a set:
/// the pending reassignments are overlaid on `current` before any cycle
/// walk, so two nodes swapping subtrees in one batch validate against the
/// state the batch would produce. Any failure rejects the whole batch;
/// callers must persist either every update or none.
pub fn plan_reparent(
    updates: &[(i64, Option<i64>)],
    current: &HashMap<i64, Option<i64>>,
) -> Result<(), HierarchyError> {
    let mut proposed = current.clone();
    for &(id, new_parent) in updates {
        if !current.contains_key(&id) {
            return Err(HierarchyError::NotFound(id));
        }
        proposed.insert(id, new_parent);
    }

    for &(id, new_parent) in updates {
        let Some(parent) = new_parent else { continue };
        if !current.contains_key(&parent) {
            return Err(HierarchyError::NotFound(parent));
        }
        if parent == id {
            return Err(HierarchyError::SelfParent(id));
        }
        if has_cycle(id, parent, &proposed) {
            return Err(HierarchyError::CycleDetected { node: id, parent });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Node {
        id: i64,
        parent_id: Option<i64>,
        display_order: i32,
        name: String,
    }

    impl Node {
        fn new(id: i64, parent_id: Option<i64>, display_order: i32, name: &str) -> Self {
            Self {
                id,
                parent_id,
                display_order,
                name: name.to_string(),
            }
        }
    }

    impl TreeItem for Node {
        fn id(&self) -> i64 {
            self.id
        }
        fn parent_id(&self) -> Option<i64> {
            self.parent_id
        }
        fn display_order(&self) -> i32 {
            self.display_order
        }
        fn sort_name(&self) -> &str {
            &self.name
        }
    }

    fn collect_ids<T: TreeItem>(forest: &[Tree<T>], out: &mut Vec<i64>) {
        for tree in forest {
            out.push(tree.item.id());
            collect_ids(&tree.children, out);
        }
    }

    fn parent_map(nodes: &[Node]) -> HashMap<i64, Option<i64>> {
        nodes.iter().map(|n| (n.id, n.parent_id)).collect()
    }

    #[test]
    fn test_build_forest_preserves_every_id_exactly_once() {
        let nodes = vec![
            Node::new(1, None, 0, "Raiz"),
            Node::new(2, Some(1), 0, "Filho"),
            Node::new(3, Some(1), 1, "Outro filho"),
            Node::new(4, Some(2), 0, "Neto"),
            Node::new(5, None, 5, "Outra raiz"),
        ];
        let forest = build_forest(nodes);

        let mut ids = Vec::new();
        collect_ids(&forest, &mut ids);
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_build_forest_sorts_by_order_then_name() {
        // order ascending, name as tie-break
        let nodes = vec![
            Node::new(1, None, 2, "B"),
            Node::new(2, None, 1, "A"),
            Node::new(3, None, 1, "Z"),
        ];
        let forest = build_forest(nodes);
        let names: Vec<&str> = forest.iter().map(|t| t.item.name.as_str()).collect();
        assert_eq!(names, vec!["A", "Z", "B"]);
    }

    #[test]
    fn test_build_forest_name_tiebreak_ignores_accents_and_case() {
        let nodes = vec![
            Node::new(1, None, 0, "Ética"),
            Node::new(2, None, 0, "ação popular"),
            Node::new(3, None, 0, "Adoção"),
        ];
        let forest = build_forest(nodes);
        let names: Vec<&str> = forest.iter().map(|t| t.item.name.as_str()).collect();
        assert_eq!(names, vec!["ação popular", "Adoção", "Ética"]);
    }

    #[test]
    fn test_build_forest_promotes_orphan_to_root() {
        // parent 99 does not exist; node 2 must still appear, as a root
        let nodes = vec![
            Node::new(1, None, 0, "Raiz"),
            Node::new(2, Some(99), 0, "Órfão"),
        ];
        let forest = build_forest(nodes);
        assert_eq!(forest.len(), 2);

        let mut ids = Vec::new();
        collect_ids(&forest, &mut ids);
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_build_forest_survives_corrupted_parent_loop() {
        // 2 and 3 point at each other; both must still appear exactly once
        let nodes = vec![
            Node::new(1, None, 0, "Raiz"),
            Node::new(2, Some(3), 0, "A"),
            Node::new(3, Some(2), 0, "B"),
            Node::new(4, Some(4), 0, "Self"),
        ];
        let forest = build_forest(nodes);

        let mut ids = Vec::new();
        collect_ids(&forest, &mut ids);
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_build_forest_nests_children_in_order() {
        let nodes = vec![
            Node::new(1, None, 0, "Raiz"),
            Node::new(2, Some(1), 2, "Segundo"),
            Node::new(3, Some(1), 1, "Primeiro"),
        ];
        let forest = build_forest(nodes);
        assert_eq!(forest.len(), 1);
        let children: Vec<&str> = forest[0]
            .children
            .iter()
            .map(|t| t.item.name.as_str())
            .collect();
        assert_eq!(children, vec!["Primeiro", "Segundo"]);
    }

    #[test]
    fn test_has_cycle_self_parent_is_always_a_cycle() {
        let parents = HashMap::from([(1, None)]);
        assert!(has_cycle(1, 1, &parents));
    }

    #[test]
    fn test_has_cycle_detects_ancestor_loop() {
        // 1 -> 2 -> 3 chain; attaching 1 under 3 loops back through 1
        let nodes = vec![
            Node::new(1, None, 0, "a"),
            Node::new(2, Some(1), 0, "b"),
            Node::new(3, Some(2), 0, "c"),
        ];
        let parents = parent_map(&nodes);
        assert!(has_cycle(1, 3, &parents));
        assert!(has_cycle(1, 2, &parents));
        assert!(!has_cycle(3, 1, &parents));
        assert!(!has_cycle(2, 1, &parents));
    }

    #[test]
    fn test_has_cycle_terminates_on_preexisting_loop() {
        // corrupted chain 2 <-> 3 never reaches node 1, but the walk must
        // still terminate and report the revisit
        let parents = HashMap::from([(1, None), (2, Some(3)), (3, Some(2))]);
        assert!(has_cycle(1, 2, &parents));
    }

    #[test]
    fn test_has_cycle_with_pending_overlay() {
        // current state: 2 under 1, 3 under 1. Pending: 2 moves under 3.
        // With the overlay applied, attaching 3 under 2 must be a cycle.
        let mut parents = parent_map(&[
            Node::new(1, None, 0, "a"),
            Node::new(2, Some(1), 0, "b"),
            Node::new(3, Some(1), 0, "c"),
        ]);
        parents.insert(2, Some(3));
        assert!(has_cycle(3, 2, &parents));
    }

    #[test]
    fn test_plan_reparent_rejects_root_under_its_child() {
        // R(1) root, C(2) under R; moving R under C must fail
        let current = parent_map(&[Node::new(1, None, 0, "R"), Node::new(2, Some(1), 0, "C")]);
        let result = plan_reparent(&[(1, Some(2))], &current);
        assert_eq!(
            result,
            Err(HierarchyError::CycleDetected { node: 1, parent: 2 })
        );
    }

    #[test]
    fn test_plan_reparent_accepts_sibling_move() {
        // R(1) root, A(2) and B(3) under R; moving B under A is fine
        let current = parent_map(&[
            Node::new(1, None, 0, "R"),
            Node::new(2, Some(1), 0, "A"),
            Node::new(3, Some(1), 0, "B"),
        ]);
        assert_eq!(plan_reparent(&[(3, Some(2))], &current), Ok(()));
    }

    #[test]
    fn test_plan_reparent_rejects_unknown_parent() {
        let current = parent_map(&[Node::new(1, None, 0, "R")]);
        assert_eq!(
            plan_reparent(&[(1, Some(42))], &current),
            Err(HierarchyError::NotFound(42))
        );
    }

    #[test]
    fn test_plan_reparent_rejects_unknown_node() {
        let current = parent_map(&[Node::new(1, None, 0, "R")]);
        assert_eq!(
            plan_reparent(&[(42, None)], &current),
            Err(HierarchyError::NotFound(42))
        );
    }

    #[test]
    fn test_plan_reparent_rejects_self_parent() {
        let current = parent_map(&[Node::new(1, None, 0, "R")]);
        assert_eq!(
            plan_reparent(&[(1, Some(1))], &current),
            Err(HierarchyError::SelfParent(1))
        );
    }

    #[test]
    fn test_plan_reparent_validates_batch_as_a_set() {
        // A(2) and B(3) under root. The batch moves A under B *and* B under
        // A; each update alone would pass against the current state, but
        // together they form a loop and the whole batch must be rejected.
        let current = parent_map(&[
            Node::new(1, None, 0, "R"),
            Node::new(2, Some(1), 0, "A"),
            Node::new(3, Some(1), 0, "B"),
        ]);
        let result = plan_reparent(&[(2, Some(3)), (3, Some(2))], &current);
        assert!(matches!(result, Err(HierarchyError::CycleDetected { .. })));
    }

    #[test]
    fn test_plan_reparent_allows_detach_to_root() {
        let current = parent_map(&[Node::new(1, None, 0, "R"), Node::new(2, Some(1), 0, "C")]);
        assert_eq!(plan_reparent(&[(2, None)], &current), Ok(()));
    }

    #[test]
    fn test_reparent_then_rebuild_nests_the_moved_subtree() {
        // R(1) root, A(2) and B(3) under R; after moving B under A the
        // rebuilt forest is R -> A -> B
        let mut nodes = vec![
            Node::new(1, None, 0, "R"),
            Node::new(2, Some(1), 0, "A"),
            Node::new(3, Some(1), 1, "B"),
        ];
        let current = parent_map(&nodes);
        let updates = vec![(3, Some(2))];
        assert_eq!(plan_reparent(&updates, &current), Ok(()));

        for node in &mut nodes {
            if let Some(&(_, parent)) = updates.iter().find(|&&(id, _)| id == node.id) {
                node.parent_id = parent;
            }
        }

        let forest = build_forest(nodes);
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].item.name, "R");
        assert_eq!(forest[0].children.len(), 1);
        assert_eq!(forest[0].children[0].item.name, "A");
        assert_eq!(forest[0].children[0].children.len(), 1);
        assert_eq!(forest[0].children[0].children[0].item.name, "B");
    }

    #[test]
    fn test_successful_plan_keeps_ancestor_walks_bounded() {
        // After applying a validated batch, walking up from any node must
        // reach a root within |nodes| steps.
        let nodes = vec![
            Node::new(1, None, 0, "R"),
            Node::new(2, Some(1), 0, "A"),
            Node::new(3, Some(1), 0, "B"),
            Node::new(4, Some(3), 0, "C"),
        ];
        let current = parent_map(&nodes);
        let updates = vec![(3, Some(2)), (4, Some(1))];
        assert_eq!(plan_reparent(&updates, &current), Ok(()));

        let mut applied = current.clone();
        for &(id, parent) in &updates {
            applied.insert(id, parent);
        }

        for &start in applied.keys() {
            let mut steps = 0;
            let mut current_id = Some(start);
            while let Some(id) = current_id {
                steps += 1;
                assert!(steps <= applied.len(), "walk from {start} did not terminate");
                current_id = applied.get(&id).copied().flatten();
            }
        }
    }
}
