//! Unit tests for watt-graph.

mod helpers {
    use watt_core::NodeId;
    use watt_func::LimitedFunction;

    use crate::csr::Edge;
    use crate::TradeoffGraph;

    /// The 11-node reference network used across the engine's tests.
    ///
    /// ```text
    ///                   8
    ///                   |
    /// 0-----1-----2----4---7---9
    ///  \   /      |    |   |
    ///   \ /       |    |   10
    ///    3        5----6
    /// ```
    pub fn reference_graph() -> TradeoffGraph {
        let edge = |from: u32, to: u32, duration: f64, consumption: f64| {
            Edge::new(NodeId(from), NodeId(to), LimitedFunction::constant(duration, consumption))
        };
        TradeoffGraph::from_edges(
            11,
            vec![
                edge(0, 1, 0.1, 1.0),
                edge(0, 3, 0.1, 1.0),
                edge(1, 0, 0.2, 1.0),
                edge(1, 2, 0.2, 1.0),
                edge(1, 3, 0.2, 1.0),
                edge(2, 1, 0.3, 1.0),
                edge(2, 4, 0.3, 1.0),
                edge(2, 5, 0.3, 1.0),
                edge(3, 0, 0.4, 1.0),
                edge(3, 1, 0.4, 1.0),
                edge(4, 2, 0.5, 1.0),
                edge(4, 6, 0.5, 1.0),
                edge(4, 7, 0.5, 1.0),
                edge(5, 2, 0.6, 1.0),
                edge(5, 6, 2.0, 1.0),
                edge(6, 4, 0.7, 1.0),
                edge(6, 5, 0.7, 1.0),
                edge(7, 4, 0.8, 1.0),
                edge(7, 8, 0.8, 1.0),
                edge(7, 9, 0.8, 1.0),
                edge(7, 10, 0.8, 1.0),
                edge(8, 7, 0.9, 1.0),
                edge(9, 7, 1.0, 1.0),
                edge(10, 7, 1.1, 1.0),
            ],
        )
    }
}

mod csr {
    use watt_core::NodeId;

    use super::helpers::reference_graph;

    #[test]
    fn dimensions() {
        let graph = reference_graph();
        assert_eq!(graph.num_nodes(), 11);
        assert_eq!(graph.num_edges(), 24);
    }

    #[test]
    fn csr_invariants() {
        let graph = reference_graph();
        let (first_out, head, weight) = graph.parts();
        assert_eq!(first_out[0], 0);
        assert_eq!(*first_out.last().unwrap() as usize, head.len());
        assert_eq!(head.len(), weight.len());
        // Heads sorted within every node's range.
        for u in 0..graph.num_nodes() {
            let range = first_out[u] as usize..first_out[u + 1] as usize;
            let slice = &head[range];
            assert!(slice.windows(2).all(|w| w[0] <= w[1]));
        }
    }

    #[test]
    fn edge_lookup() {
        let graph = reference_graph();
        assert!(graph.edge(NodeId(2), NodeId(4)).is_some());
        assert!(graph.edge(NodeId(4), NodeId(2)).is_some());
        assert!(graph.edge(NodeId(0), NodeId(9)).is_none());
        let e = graph.edge(NodeId(7), NodeId(9)).unwrap();
        assert_eq!(graph.target(e), NodeId(9));
        assert_eq!(graph.weight(e).min_x, 0.8);
    }

    #[test]
    fn degree_counts() {
        let graph = reference_graph();
        assert_eq!(graph.degree(NodeId(7)), 4);
        assert_eq!(graph.degree(NodeId(8)), 1);
    }

    #[test]
    fn invert_swaps_directions() {
        let graph = reference_graph();
        let reverse = graph.invert();
        assert_eq!(reverse.num_nodes(), graph.num_nodes());
        assert_eq!(reverse.num_edges(), graph.num_edges());

        for (from, to, weight) in graph.edge_list() {
            let back = reverse.edge(to, from).expect("reversed edge must exist");
            assert_eq!(reverse.weight(back).min_x, weight.min_x);
        }
    }

    #[test]
    fn from_parts_rejects_malformed() {
        use watt_func::LimitedFunction;
        let weight = vec![LimitedFunction::constant(1.0, 1.0)];
        let head = vec![NodeId(0)];
        assert!(crate::TradeoffGraph::from_parts(vec![1, 1], head.clone(), weight.clone()).is_err());
        assert!(crate::TradeoffGraph::from_parts(vec![0, 2], head, weight).is_err());
    }
}

mod dynamic {
    use watt_core::NodeId;

    use crate::DynamicGraph;

    #[test]
    fn insert_remove_freeze() {
        let mut graph: DynamicGraph<u32> = DynamicGraph::new(3);
        graph.insert_edge(NodeId(0), NodeId(1), 10);
        graph.insert_edge(NodeId(0), NodeId(2), 20);
        graph.insert_edge(NodeId(1), NodeId(2), 30);
        assert_eq!(graph.num_edges(), 3);

        assert!(graph.remove_edge(NodeId(0), NodeId(2)));
        assert!(!graph.remove_edge(NodeId(0), NodeId(2)));

        let extra = graph.add_node();
        graph.insert_edge(NodeId(2), extra, 40);

        let csr = graph.to_csr();
        assert_eq!(csr.num_nodes(), 4);
        assert_eq!(csr.num_edges(), 3);
        assert!(csr.edge(NodeId(0), NodeId(1)).is_some());
        assert!(csr.edge(NodeId(0), NodeId(2)).is_none());
        assert!(csr.edge(NodeId(2), NodeId(3)).is_some());
    }
}

mod transform {
    use watt_core::{Fixed, NodeId};
    use watt_func::{HyperbolicFunction, LimitedFunction};

    use super::helpers::reference_graph;
    use crate::csr::Edge;
    use crate::transform::{to_min_consumption, to_min_duration, to_sampled};
    use crate::TradeoffGraph;

    #[test]
    fn min_duration_projection() {
        let graph = reference_graph();
        let durations = to_min_duration(&graph);
        let e = durations.edge(NodeId(2), NodeId(4)).unwrap();
        assert_eq!(*durations.weight(e), Fixed(300));
    }

    #[test]
    fn min_consumption_projection() {
        let graph = reference_graph();
        let consumptions = to_min_consumption(&graph);
        let e = consumptions.edge(NodeId(2), NodeId(4)).unwrap();
        assert_eq!(*consumptions.weight(e), Fixed(1000));
    }

    #[test]
    fn sampling_keeps_both_endpoints() {
        // One hyperbolic edge from 10 s to 30 s.
        let graph = TradeoffGraph::from_edges(
            2,
            vec![Edge::new(
                NodeId(0),
                NodeId(1),
                LimitedFunction::new(10.0, 30.0, HyperbolicFunction::new(400.0, 0.0, 2.0).into()),
            )],
        );
        let sampled = to_sampled(&graph, 10.0);
        // Samples at 10, 20, and the slow endpoint 30.
        assert_eq!(sampled.num_edges(), 3);
        let weights: Vec<_> = sampled.edge_list().map(|(_, _, w)| *w).collect();
        assert_eq!(weights[0].0, Fixed::from_f64(10.0));
        assert_eq!(weights[2].0, Fixed::from_f64(30.0));
        // Sampled consumption decreases with duration.
        assert!(weights[0].1 > weights[1].1);
        assert!(weights[1].1 > weights[2].1);
    }
}

mod turn {
    use watt_core::{Coordinate, NodeId};

    use super::helpers::reference_graph;
    use crate::turn::{to_turn_graph, TurnCostModel};

    fn coordinates() -> Vec<Coordinate> {
        [
            (0.0, 0.0),
            (1.0, 0.0),
            (2.0, 0.0),
            (3.0, 0.0),
            (4.0, 0.0),
            (0.0, 1.0),
            (1.0, 1.0),
            (2.0, 1.0),
            (3.0, 1.0),
            (4.0, 1.0),
            (5.0, 1.0),
        ]
        .iter()
        .map(|&(lon, lat)| Coordinate::from_floating(lon, lat))
        .collect()
    }

    #[test]
    fn unknown_model_name_is_rejected() {
        let coords = coordinates();
        assert!(TurnCostModel::from_name("zero", &coords).is_ok());
        assert!(TurnCostModel::from_name("static", &coords).is_ok());
        assert!(TurnCostModel::from_name("banked", &coords).is_err());
    }

    #[test]
    fn line_graph_dimensions() {
        let graph = reference_graph();
        let coords = coordinates();
        let model = TurnCostModel::from_name("zero", &coords).unwrap();
        let (turn_graph, edge_to_start) = to_turn_graph(&graph, &model);

        // One line-graph node per input edge.
        assert_eq!(turn_graph.num_nodes(), graph.num_edges());
        assert_eq!(edge_to_start.len(), graph.num_edges());
        // One turn edge per (in-edge, out-edge) pair.
        let expected: usize = graph
            .edge_list()
            .map(|(_, via, _)| graph.degree(via))
            .sum();
        assert_eq!(turn_graph.num_edges(), expected);
    }

    #[test]
    fn uturn_costs_more_than_straight() {
        let graph = reference_graph();
        let coords = coordinates();
        let model = TurnCostModel::from_name("zero", &coords).unwrap();

        let straight = model
            .apply(&graph, 2, NodeId(0), NodeId(1), NodeId(2))
            .unwrap();
        let uturn = model
            .apply(&graph, 2, NodeId(0), NodeId(1), NodeId(0))
            .unwrap();
        assert!(uturn.min_x > straight.min_x + 19.0);
    }

    #[test]
    fn static_model_penalises_sharp_turns() {
        let graph = reference_graph();
        let coords = coordinates();
        let model = TurnCostModel::from_name("static", &coords).unwrap();

        // 2 → 4 → 7: a turn at node 4 (degree 3).
        let turning = model
            .apply(&graph, graph.degree(NodeId(4)), NodeId(2), NodeId(4), NodeId(7))
            .unwrap();
        let base = graph.weight(graph.edge(NodeId(2), NodeId(4)).unwrap()).min_x;
        assert!(turning.min_x > base);
        assert!(turning.min_x < base + TurnCostModel::UTURN_COST);
    }
}

mod files {
    use watt_core::Coordinate;

    use super::helpers::reference_graph;
    use crate::files;

    #[test]
    fn graph_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let graph = reference_graph();
        files::write_graph(dir.path(), &graph).unwrap();
        let loaded = files::read_graph(dir.path()).unwrap();

        assert_eq!(loaded.num_nodes(), graph.num_nodes());
        assert_eq!(loaded.num_edges(), graph.num_edges());
        for ((f1, t1, w1), (f2, t2, w2)) in graph.edge_list().zip(loaded.edge_list()) {
            assert_eq!(f1, f2);
            assert_eq!(t1, t2);
            assert_eq!(w1.min_x, w2.min_x);
            assert_eq!(w1.max_x, w2.max_x);
        }
    }

    #[test]
    fn sidecar_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let coords = vec![
            Coordinate::from_floating(8.68, 49.41),
            Coordinate::from_floating(8.69, 49.42),
        ];
        let heights = vec![112, -3];
        let chargers = vec![0.0, 22_000.0];

        files::write_coordinates(dir.path(), &coords).unwrap();
        files::write_heights(dir.path(), &heights).unwrap();
        files::write_chargers(dir.path(), &chargers).unwrap();

        assert_eq!(files::read_coordinates(dir.path()).unwrap(), coords);
        assert_eq!(files::read_heights(dir.path()).unwrap(), heights);
        assert_eq!(files::read_chargers(dir.path()).unwrap(), chargers);
    }

    #[test]
    fn truncated_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let graph = reference_graph();
        files::write_graph(dir.path(), &graph).unwrap();

        // Chop the weight file mid-record.
        let weight_path = dir.path().join("weight");
        let bytes = std::fs::read(&weight_path).unwrap();
        std::fs::write(&weight_path, &bytes[..bytes.len() - 7]).unwrap();

        assert!(files::read_graph(dir.path()).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(files::read_graph(dir.path()).is_err());
    }
}

mod nearest {
    use watt_core::{Coordinate, NodeId};

    use crate::NearestIndex;

    #[test]
    fn snaps_to_closest_node() {
        let coords = vec![
            Coordinate::from_floating(0.0, 0.0),
            Coordinate::from_floating(1.0, 0.0),
            Coordinate::from_floating(0.0, 1.0),
        ];
        let index = NearestIndex::new(&coords);
        assert_eq!(index.nearest(Coordinate::from_floating(0.1, 0.1)), Some(NodeId(0)));
        assert_eq!(index.nearest(Coordinate::from_floating(0.9, 0.1)), Some(NodeId(1)));
        assert_eq!(index.nearest(Coordinate::from_floating(0.1, 0.8)), Some(NodeId(2)));
    }

    #[test]
    fn empty_index_returns_none() {
        let index = NearestIndex::new(&[]);
        assert!(index.nearest(Coordinate::from_floating(0.0, 0.0)).is_none());
    }
}
