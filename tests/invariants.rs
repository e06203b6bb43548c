//! Property tests for layout edits.
//!
//! Random sequences of insert, remove and move requests are replayed against
//! a single-pane layout. After every step the layout must be structurally
//! valid and every split must still add up to the whole.

use panedock::layout_engine::{
    DropPosition, LayoutEngine, LayoutError, LayoutNode, LayoutTree, NodeRef, PaneId, PaneKind,
};
use proptest::collection::vec;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Insert { target: usize, kind: PaneKind, position: DropPosition },
    Remove { target: usize },
    Move { source: usize, target: usize, position: DropPosition },
}

fn position_strategy() -> impl Strategy<Value = DropPosition> {
    prop::sample::select(vec![
        DropPosition::Top,
        DropPosition::Bottom,
        DropPosition::Left,
        DropPosition::Right,
        DropPosition::Center,
    ])
}

fn kind_strategy() -> impl Strategy<Value = PaneKind> {
    prop::sample::select(vec![PaneKind::Graph, PaneKind::Map, PaneKind::Table, PaneKind::Gauge])
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (any::<usize>(), kind_strategy(), position_strategy())
            .prop_map(|(target, kind, position)| Op::Insert { target, kind, position }),
        1 => any::<usize>().prop_map(|target| Op::Remove { target }),
        2 => (any::<usize>(), any::<usize>(), position_strategy())
            .prop_map(|(source, target, position)| Op::Move { source, target, position }),
    ]
}

/// Picks an existing id; indices wrap around the pre-order node list.
fn id_at(layout: &LayoutTree, index: usize) -> PaneId {
    let ids: Vec<PaneId> = layout.nodes().map(|n| n.id().clone()).collect();
    ids[index % ids.len()].clone()
}

/// Applies `op` through both entry points and returns `(try_*, total)`.
fn apply(
    engine: &LayoutEngine,
    layout: &LayoutTree,
    op: &Op,
) -> (Result<LayoutTree, LayoutError>, LayoutTree) {
    match op {
        Op::Insert { target, kind, position } => {
            let target = id_at(layout, *target);
            (
                engine.try_insert_pane(layout, &target, kind.clone(), *position),
                engine.insert_pane(layout, &target, kind.clone(), *position),
            )
        }
        Op::Remove { target } => {
            let target = id_at(layout, *target);
            (engine.try_remove_pane(layout, &target), engine.remove_pane(layout, &target))
        }
        Op::Move { source, target, position } => {
            let source = id_at(layout, *source);
            let target = id_at(layout, *target);
            (
                engine.try_move_pane(layout, &source, &target, *position),
                engine.move_pane(layout, &source, &target, *position),
            )
        }
    }
}

fn replay(ops: &[Op]) -> LayoutTree {
    let engine = LayoutEngine::default();
    ops.iter().fold(LayoutTree::single(PaneKind::Graph), |layout, op| apply(&engine, &layout, op).1)
}

fn check_sizes(node: NodeRef<'_>) -> Result<(), TestCaseError> {
    if node.is_container() {
        let total: f64 = node.children().map(|c| c.default_size().unwrap_or(0.0)).sum();
        prop_assert!((total - 100.0).abs() < 1e-6, "{} children sum to {}", node.id(), total);
        for child in node.children() {
            check_sizes(child)?;
        }
    }
    Ok(())
}

fn subtree_ids(node: NodeRef<'_>, out: &mut Vec<PaneId>) {
    out.push(node.id().clone());
    for child in node.children() {
        subtree_ids(child, out);
    }
}

/// Document form with engine-generated ids blanked out. Two calls that
/// create panes never agree on fresh ids, only on structure.
fn masked(layout: &LayoutTree) -> LayoutNode {
    fn strip(mut node: LayoutNode) -> LayoutNode {
        if node.id.as_ref().is_some_and(|id| id.starts_with("node-")) {
            node.id = None;
        }
        node.panes = node.panes.map(|panes| panes.into_iter().map(strip).collect());
        node
    }
    strip(layout.to_node())
}

fn without_outer_size(mut node: LayoutNode) -> LayoutNode {
    node.default_size = None;
    node
}

proptest! {
    #[test]
    fn every_step_keeps_layout_valid(ops in vec(op_strategy(), 0..40)) {
        let engine = LayoutEngine::default();
        let mut layout = LayoutTree::single(PaneKind::Graph);
        for op in &ops {
            let (result, total) = apply(&engine, &layout, op);
            match result {
                Ok(next) => {
                    prop_assert_eq!(masked(&next), masked(&total));
                    layout = next;
                }
                Err(_) => {
                    prop_assert_eq!(&layout, &total, "rejected {:?} changed the layout", op);
                }
            }
            prop_assert_eq!(Vec::<String>::new(), layout.validate());
            prop_assert!(layout.root().parent().is_none());
            check_sizes(layout.root())?;
        }
    }

    #[test]
    fn descendant_check_matches_reachability(ops in vec(op_strategy(), 0..30)) {
        let layout = replay(&ops);
        for ancestor in layout.nodes() {
            let mut reachable = Vec::new();
            subtree_ids(ancestor, &mut reachable);
            for candidate in layout.nodes() {
                prop_assert_eq!(
                    reachable.contains(candidate.id()),
                    layout.is_descendant(ancestor.id(), candidate.id())
                );
            }
        }
    }

    #[test]
    fn moves_into_own_subtree_are_refused(
        ops in vec(op_strategy(), 0..30),
        source in any::<usize>(),
        target in any::<usize>(),
        position in position_strategy(),
    ) {
        let layout = replay(&ops);
        let source = id_at(&layout, source);
        let mut inside = Vec::new();
        subtree_ids(layout.find_node(&source).unwrap(), &mut inside);
        let target = inside[target % inside.len()].clone();

        let engine = LayoutEngine::default();
        prop_assert!(engine.try_move_pane(&layout, &source, &target, position).is_err());
        prop_assert_eq!(&layout, &engine.move_pane(&layout, &source, &target, position));
    }

    #[test]
    fn move_carries_subtree_intact(
        ops in vec(op_strategy(), 0..30),
        source in any::<usize>(),
        target in any::<usize>(),
        position in position_strategy(),
    ) {
        let layout = replay(&ops);
        let source = id_at(&layout, source);
        let target = id_at(&layout, target);
        let before = without_outer_size(layout.find_node(&source).unwrap().to_node());

        let engine = LayoutEngine::default();
        if let Ok(next) = engine.try_move_pane(&layout, &source, &target, position) {
            let moved = next.find_node(&source);
            prop_assert!(moved.is_some());
            let after = without_outer_size(moved.unwrap().to_node());
            prop_assert_eq!(before, after);
            prop_assert_eq!(layout.len() - layout.nodes().filter(|n| n.is_container()).count(),
                next.len() - next.nodes().filter(|n| n.is_container()).count());
        }
    }

    #[test]
    fn unknown_ids_change_nothing(
        ops in vec(op_strategy(), 0..20),
        position in position_strategy(),
    ) {
        let layout = replay(&ops);
        let engine = LayoutEngine::default();
        let known = layout.root().id().clone();
        prop_assert_eq!(&layout, &engine.insert_pane(&layout, "ghost", PaneKind::Map, position));
        prop_assert_eq!(&layout, &engine.remove_pane(&layout, "ghost"));
        prop_assert_eq!(&layout, &engine.move_pane(&layout, "ghost", &known, position));
        prop_assert_eq!(&layout, &engine.move_pane(&layout, &known, "ghost", position));
    }
}
