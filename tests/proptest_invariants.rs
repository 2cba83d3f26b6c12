//! Property-based invariant tests for the engines and playback.
//!
//! 1. Every sort ends with the ascending input and every index settled
//! 2. Every sort step holds a permutation of the input
//! 3. AVL trees stay ordered and balanced under arbitrary insert/remove runs
//! 4. BST trees stay ordered and match a set model
//! 5. Generated graphs are connected with weights in 1..=9
//! 6. Dijkstra's highlighted path has the optimal length
//! 7. Playback position stays in range under arbitrary transport

use algoviz::graph::Graph;
use algoviz::playback::Playback;
use algoviz::snapshot::{History, Paint, SortStep, Step};
use algoviz::sorting::SortAlgorithm;
use algoviz::tree::avl::Avl;
use algoviz::tree::bst::Bst;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeSet;

// ── Strategies ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum TreeOp {
    Insert(i32),
    Remove(i32),
}

fn tree_op_strategy() -> impl Strategy<Value = TreeOp> {
    prop_oneof![
        3 => (0i32..60).prop_map(TreeOp::Insert),
        2 => (0i32..60).prop_map(TreeOp::Remove),
    ]
}

#[derive(Debug, Clone)]
enum Transport {
    Next,
    Previous,
    Stop,
    Tick,
    Speed(u32),
}

fn transport_strategy() -> impl Strategy<Value = Transport> {
    prop_oneof![
        Just(Transport::Next),
        Just(Transport::Previous),
        Just(Transport::Stop),
        Just(Transport::Tick),
        (1u32..=100).prop_map(Transport::Speed),
    ]
}

fn sort_strategy() -> impl Strategy<Value = SortAlgorithm> {
    prop::sample::select(SortAlgorithm::ALL.to_vec())
}

fn sort_steps(history: &History) -> Vec<&SortStep> {
    history.iter().filter_map(Step::as_sort).collect()
}

// ── Sorting ─────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn sort_ends_sorted(algorithm in sort_strategy(), values in prop::collection::vec(-50i32..100, 0..40)) {
        let history = algorithm.run(&values);
        let steps = sort_steps(&history);
        let last = steps.last().expect("history is never empty");

        let mut expected = values.clone();
        expected.sort();
        prop_assert_eq!(&last.values, &expected);
        prop_assert_eq!(last.sorted.len(), values.len());
        prop_assert!(last.sorted.iter().all(|&i| i < values.len()));
        prop_assert_eq!(&steps[0].values, &values);
    }

    #[test]
    fn sort_steps_are_permutations(algorithm in sort_strategy(), values in prop::collection::vec(0i32..20, 0..25)) {
        let mut expected = values.clone();
        expected.sort();
        for step in sort_steps(&algorithm.run(&values)) {
            let mut seen = step.values.clone();
            seen.sort();
            prop_assert_eq!(seen, expected.clone());
        }
    }
}

// ── Trees ───────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn avl_stays_balanced(ops in prop::collection::vec(tree_op_strategy(), 0..120)) {
        let mut avl = Avl::default();
        let mut model = BTreeSet::new();

        for op in ops {
            let history = match op {
                TreeOp::Insert(v) => { model.insert(v); avl.insert(v) }
                TreeOp::Remove(v) => { model.remove(&v); avl.remove(v) }
            };
            prop_assert!(!history.is_empty());
            prop_assert!(avl.is_valid());
            prop_assert_eq!(avl.inorder(), model.iter().copied().collect::<Vec<_>>());
        }

        // Height bound for AVL trees: h < 1.45 log2(n + 2)
        let bound = 1.45 * ((avl.len() + 2) as f64).log2();
        prop_assert!((avl.height() as f64) < bound.max(1.0));
    }

    #[test]
    fn bst_matches_set_model(ops in prop::collection::vec(tree_op_strategy(), 0..120)) {
        let mut bst = Bst::default();
        let mut model = BTreeSet::new();

        for op in ops {
            match op {
                TreeOp::Insert(v) => { model.insert(v); bst.insert(v); }
                TreeOp::Remove(v) => { model.remove(&v); bst.remove(v); }
            }
            prop_assert!(bst.arena().is_search_tree());
            prop_assert_eq!(bst.len(), model.len());
        }
        prop_assert_eq!(bst.inorder(), model.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn final_tree_snapshot_matches_tree(values in prop::collection::vec(0i32..100, 1..30)) {
        let mut avl = Avl::default();
        let mut last = None;
        for v in values {
            last = avl.insert(v).last().cloned();
        }
        let step = last.expect("insert always records");
        let graph = step.as_graph().expect("tree steps are graph steps");
        prop_assert_eq!(graph.nodes.len(), avl.len());
        prop_assert_eq!(graph.edges.len(), avl.len() - 1);
    }
}

// ── Graphs ──────────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn generated_graph_is_connected(nodes in 0usize..90, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut graph = Graph::new();
        let history = graph.generate(nodes, &mut rng);

        prop_assert_eq!(history.len(), 1);
        prop_assert_eq!(graph.node_count(), nodes);
        prop_assert!(graph.is_connected());
        for a in 0..nodes {
            for &b in graph.neighbors(a) {
                let weight = graph.edge_weight(a, b).expect("neighbors share an edge");
                prop_assert!((1..=9).contains(&weight));
            }
        }
    }

    #[test]
    fn dijkstra_path_is_optimal(nodes in 2usize..60, seed in any::<u64>(), a in any::<prop::sample::Index>(), b in any::<prop::sample::Index>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut graph = Graph::new();
        graph.generate(nodes, &mut rng);
        let (start, end) = (a.index(nodes), b.index(nodes));

        let history = graph.dijkstra(start, end).unwrap();
        let last = history.last().unwrap().as_graph().unwrap();
        prop_assert!(last.message.starts_with("Shortest Path Found:"));

        let length: u32 = last
            .edges
            .iter()
            .filter(|e| e.color == Paint::Orange)
            .map(|e| graph.edge_weight(e.from, e.to).unwrap())
            .sum();
        prop_assert_eq!(Some(length), graph.shortest_distance(start, end).unwrap());
    }

    #[test]
    fn prim_spans_every_node(nodes in 1usize..60, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut graph = Graph::new();
        graph.generate(nodes, &mut rng);

        let history = graph.prim_mst(0).unwrap();
        let last = history.last().unwrap().as_graph().unwrap();
        let tree_edges = last.edges.iter().filter(|e| e.color == Paint::Orange).count();
        prop_assert_eq!(tree_edges, nodes - 1);
    }
}

// ── Playback ────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn playback_position_in_range(len in 1usize..30, ops in prop::collection::vec(transport_strategy(), 0..60)) {
        let history: History = (0..len)
            .map(|i| Step::from(SortStep::new(&[i as i32], format!("step {}", i))))
            .collect();
        let mut playback = Playback::new(80).unwrap();
        playback.load(history);

        for op in ops {
            let before = playback.position();
            match op {
                Transport::Next => playback.next(),
                Transport::Previous => playback.previous(),
                Transport::Stop => playback.stop(),
                Transport::Tick => playback.tick(),
                Transport::Speed(v) => {
                    playback.set_speed(v).unwrap();
                    prop_assert_eq!(playback.position(), before);
                }
            }
            prop_assert!(playback.position() < len);
        }

        for _ in 0..len + 5 {
            playback.next();
        }
        prop_assert_eq!(playback.position(), len - 1);
    }
}
