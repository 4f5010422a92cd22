//! Unit tests for watt-core.

mod fixed {
    use crate::Fixed;

    #[test]
    fn conversion_truncates() {
        assert_eq!(Fixed::from_f64(0.1), Fixed(100));
        assert_eq!(Fixed::from_f64(1.9995), Fixed(1999));
        assert_eq!(Fixed::from_f64(-0.5), Fixed(-500));
        assert_eq!(Fixed(1300).to_f64(), 1.3);
    }

    #[test]
    fn addition_saturates_to_inf() {
        assert_eq!(Fixed(1).saturating_add(Fixed(2)), Fixed(3));
        assert_eq!(Fixed::INF.saturating_add(Fixed(1)), Fixed::INF);
        assert_eq!(Fixed(1).saturating_add(Fixed::INF), Fixed::INF);
        assert_eq!(Fixed(i32::MAX - 1).saturating_add(Fixed(5)), Fixed::INF);
    }

    #[test]
    fn ordering_is_integer_ordering() {
        assert!(Fixed(100) < Fixed(101));
        assert!(Fixed::ZERO < Fixed::INF);
    }
}

mod coord {
    use crate::coord::{bearing, euclid_squared_distance, haversine_distance};
    use crate::Coordinate;

    #[test]
    fn fixed_point_roundtrip() {
        let c = Coordinate::from_floating(8.68, 49.41);
        let (lon, lat) = c.to_floating();
        assert!((lon - 8.68).abs() < 1e-6);
        assert!((lat - 49.41).abs() < 1e-6);
    }

    #[test]
    fn euclid_is_symmetric() {
        let a = Coordinate::from_floating(1.0, 2.0);
        let b = Coordinate::from_floating(3.0, 5.0);
        assert_eq!(euclid_squared_distance(a, b), euclid_squared_distance(b, a));
        assert_eq!(euclid_squared_distance(a, a), 0);
    }

    #[test]
    fn bearing_cardinal_directions() {
        let origin = Coordinate::from_floating(0.0, 0.0);
        let north = Coordinate::from_floating(0.0, 1.0);
        let east = Coordinate::from_floating(1.0, 0.0);
        assert!((bearing(origin, north) - 0.0).abs() < 1e-6);
        assert!((bearing(origin, east) - 90.0).abs() < 1e-6);
    }

    #[test]
    fn haversine_one_degree_latitude() {
        let a = Coordinate::from_floating(0.0, 0.0);
        let b = Coordinate::from_floating(0.0, 1.0);
        // One degree of latitude is ~111.2 km.
        let d = haversine_distance(a, b);
        assert!((d - 111_226.3).abs() < 100.0, "got {d}");
    }
}

mod ids {
    use crate::{EdgeId, NodeId};

    #[test]
    fn invalid_sentinel() {
        assert_eq!(NodeId::default(), NodeId::INVALID);
        assert_eq!(EdgeId::INVALID.0, u32::MAX);
        assert_eq!(NodeId(7).index(), 7usize);
    }

    #[test]
    fn display_marks_unset_ids() {
        assert_eq!(NodeId(7).to_string(), "NodeId(7)");
        assert_eq!(EdgeId::INVALID.to_string(), "EdgeId(-)");
    }
}

mod stats {
    use crate::stats;
    use crate::StatsEvent;

    #[test]
    fn count_and_reset() {
        stats::reset();
        stats::count(StatsEvent::QueuePush);
        stats::count(StatsEvent::QueuePush);
        stats::sum(StatsEvent::LabelPush, 3);
        stats::max(StatsEvent::LabelMaxUnsettled, 5);
        stats::max(StatsEvent::LabelMaxUnsettled, 2);
        assert_eq!(stats::get(StatsEvent::QueuePush), 2);
        assert_eq!(stats::get(StatsEvent::LabelPush), 3);
        assert_eq!(stats::get(StatsEvent::LabelMaxUnsettled), 5);
        assert!(stats::summary().contains("QUEUE_PUSH: 2"));
        stats::reset();
        assert_eq!(stats::get(StatsEvent::QueuePush), 0);
    }
}
