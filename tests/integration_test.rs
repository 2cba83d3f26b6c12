// Integration tests for the visualizer library

use algoviz::config::VisualizerConfig;
use algoviz::controller::{Algorithm, SelectParams, Visualizer};
use algoviz::graph::Graph;
use algoviz::playback::{Playback, PlaybackEvent};
use algoviz::snapshot::{Paint, Step};
use algoviz::sorting::SortAlgorithm;
use algoviz::VizError;
use std::time::Instant;

fn seeded(seed: u64) -> Visualizer {
    Visualizer::new(VisualizerConfig {
        seed: Some(seed),
        ..VisualizerConfig::default()
    })
    .expect("default config is valid")
}

#[test]
fn test_bubble_sort_example() {
    let history = SortAlgorithm::Bubble.run(&[5, 3, 1]);

    let first = history.first().unwrap().as_sort().unwrap();
    assert_eq!(first.values, vec![5, 3, 1]);

    assert!(history
        .iter()
        .filter_map(Step::as_sort)
        .any(|s| s.compared.iter().copied().eq([0, 1])));

    let last = history.last().unwrap().as_sort().unwrap();
    assert_eq!(last.values, vec![1, 3, 5]);
    assert_eq!(last.sorted.iter().copied().collect::<Vec<_>>(), vec![0, 1, 2]);
}

#[test]
fn test_every_algorithm_selects() {
    let mut viz = seeded(11);
    for algorithm in Algorithm::ALL {
        viz.select_algorithm(algorithm, SelectParams::default())
            .unwrap_or_else(|e| panic!("{} failed: {}", algorithm, e));
        assert!(!viz.playback().is_empty(), "{} produced nothing", algorithm);
        assert_eq!(viz.playback().position(), 0);
    }
}

#[test]
fn test_same_seed_same_histories() {
    let mut a = seeded(21);
    let mut b = seeded(21);
    for name in ["Quick Sort", "AVL Remove", "Graph Prim's MST", "Maze Generate"] {
        a.select(name).unwrap();
        b.select(name).unwrap();
        assert_eq!(a.playback().history(), b.playback().history(), "{}", name);
    }
}

#[test]
fn test_transport_through_visualizer() {
    let mut viz = seeded(3);
    viz.select("Selection Sort").unwrap();
    let len = viz.playback().len();

    for _ in 0..len + 5 {
        viz.next();
    }
    assert_eq!(viz.playback().position(), len - 1);

    viz.previous();
    assert_eq!(viz.playback().position(), len - 2);

    viz.set_speed(1).unwrap();
    assert_eq!(viz.playback().position(), len - 2);

    viz.stop();
    assert_eq!(viz.playback().position(), 0);
    assert!(matches!(viz.set_speed(500), Err(VizError::InvalidSpeed(500))));
}

#[test]
fn test_auto_play_runs_to_end() {
    let mut viz = seeded(4);
    viz.select("Insertion Sort").unwrap();
    let len = viz.playback().len();
    viz.set_speed(100).unwrap();

    let start = Instant::now();
    viz.start(start);
    let interval = viz.playback().interval();
    let mut now = start;
    for _ in 0..len + 3 {
        now += interval;
        viz.poll(now);
    }

    assert_eq!(viz.playback().position(), len - 1);
    assert!(!viz.playback().is_playing());

    let redraws = viz
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, PlaybackEvent::Redraw(_)))
        .count();
    // One for the load plus one per advance
    assert_eq!(redraws, len);
}

#[test]
fn test_log_lines_mirror_steps() {
    let mut playback = Playback::new(50).unwrap();
    playback.load(SortAlgorithm::Merge.run(&[4, 1, 3, 2]));
    while !playback.is_at_end() {
        playback.next();
    }

    let logs: Vec<String> = playback
        .drain_events()
        .into_iter()
        .filter_map(|e| match e {
            PlaybackEvent::Log(line) => Some(line),
            PlaybackEvent::Redraw(_) => None,
        })
        .collect();
    let messages: Vec<String> = playback
        .history()
        .iter()
        .map(|s| s.message().to_string())
        .collect();
    assert_eq!(logs, messages);
}

#[test]
fn test_dijkstra_on_hand_built_graph() {
    // 0 --4-- 1 --1-- 4
    //  \             /
    //   1-- 2 --1-- 3 (via 3: 0->2->3->4 = 3)
    let graph = Graph::from_edges(
        5,
        &[(0, 1, 4), (1, 4, 1), (0, 2, 1), (2, 3, 1), (3, 4, 1)],
    )
    .unwrap();

    let history = graph.dijkstra(0, 4).unwrap();
    let last = history.last().unwrap().as_graph().unwrap();
    assert_eq!(last.message, "Shortest Path Found: 0 -> 2 -> 3 -> 4");

    let orange: Vec<(usize, usize)> = last
        .edges
        .iter()
        .filter(|e| e.color == Paint::Orange)
        .map(|e| (e.from, e.to))
        .collect();
    assert_eq!(orange, vec![(0, 2), (2, 3), (3, 4)]);
    assert_eq!(graph.shortest_distance(0, 4).unwrap(), Some(3));
}

#[test]
fn test_dijkstra_unreachable_pair() {
    let graph = Graph::from_edges(6, &[(0, 1, 1), (1, 2, 1), (3, 4, 1), (4, 5, 1)]).unwrap();
    assert!(!graph.is_connected());

    let history = graph.dijkstra(0, 5).unwrap();
    assert_eq!(
        history.last().unwrap().message(),
        "Target Node 5 is unreachable!"
    );
    assert_eq!(graph.shortest_distance(0, 5).unwrap(), None);
}

#[test]
fn test_prim_on_hand_built_graph() {
    let graph = Graph::from_edges(
        4,
        &[(0, 1, 5), (0, 2, 1), (1, 2, 2), (1, 3, 7), (2, 3, 3)],
    )
    .unwrap();

    let history = graph.prim_mst(0).unwrap();
    let messages: Vec<&str> = history.iter().map(Step::message).collect();
    assert!(messages.contains(&"Added Edge 0-2 to MST."));
    assert!(messages.contains(&"Added Edge 2-1 to MST."));
    assert!(messages.contains(&"Added Edge 2-3 to MST."));
    assert_eq!(*messages.last().unwrap(), "MST Complete. Total Weight: 6");
}
