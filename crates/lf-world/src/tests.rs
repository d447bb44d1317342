//! Unit tests for lf-world.

mod helpers {
    use lf_core::{CargoId, StationId};

    use crate::{MapPos, World};

    pub const CARGO: CargoId = CargoId(0);

    /// Two stations 5 tiles apart, linked both ways with capacity 20.
    pub fn pair() -> (World, StationId, StationId) {
        let mut world = World::new(1);
        let a = world.add_station(MapPos::new(0, 0));
        let b = world.add_station(MapPos::new(0, 5));
        world.set_link(a, b, CARGO, 20);
        world.set_link(b, a, CARGO, 20);
        (world, a, b)
    }
}

mod map_pos {
    use crate::MapPos;

    #[test]
    fn manhattan_is_symmetric() {
        let a = MapPos::new(3, 10);
        let b = MapPos::new(8, 2);
        assert_eq!(a.manhattan(b), 13);
        assert_eq!(b.manhattan(a), 13);
        assert_eq!(a.manhattan(a), 0);
    }
}

mod world {
    use lf_core::StationId;

    use super::helpers::{CARGO, pair};
    use crate::station::StationProvider;
    use crate::{MapPos, World};

    #[test]
    fn add_and_remove_station() {
        let (mut world, a, b) = pair();
        assert!(world.is_valid(a));
        assert_eq!(world.station_bound(), 2);

        world.remove_station(a);
        assert!(!world.is_valid(a));
        assert!(world.is_valid(b));
        // Ids stay stable: a new station does not reuse the hole.
        let c = world.add_station(MapPos::new(1, 1));
        assert_eq!(c, StationId(2));
    }

    #[test]
    fn links_iterate_in_ascending_neighbour_order() {
        let mut world = World::new(1);
        let a = world.add_station(MapPos::new(0, 0));
        let b = world.add_station(MapPos::new(0, 1));
        let c = world.add_station(MapPos::new(0, 2));
        world.set_link(a, c, CARGO, 7);
        world.set_link(a, b, CARGO, 3);

        let links: Vec<_> = world.links(a, CARGO).collect();
        assert_eq!(links, vec![(b, 3), (c, 7)]);
    }

    #[test]
    fn supply_and_acceptance_default_to_nothing() {
        let (world, a, _) = pair();
        assert_eq!(world.supply(a, CARGO), 0);
        assert!(!world.accepts(a, CARGO));
    }

    #[test]
    fn invalid_station_reads_are_inert() {
        let (world, ..) = pair();
        let ghost = StationId(9);
        assert!(!world.is_valid(ghost));
        assert_eq!(world.supply(ghost, CARGO), 0);
        assert_eq!(world.links(ghost, CARGO).count(), 0);
    }
}

mod averages {
    use lf_core::{TICKS_PER_DAY, Tick};

    use super::helpers::{CARGO, pair};
    use crate::station::StationProvider;
    use crate::MovingAverage;

    #[test]
    fn decrease_shrinks_and_eventually_zeroes() {
        let avg = MovingAverage::new(4);
        let mut value = 100;
        for _ in 0..100 {
            value = avg.decrease(value);
        }
        assert_eq!(value, 0);
    }

    #[test]
    fn monthly_scales_by_window() {
        let avg = MovingAverage::new(30);
        assert_eq!(avg.monthly(90), 90);
        assert_eq!(MovingAverage::new(10).monthly(90), 270);
    }

    #[test]
    fn decayed_links_are_dropped() {
        let (mut world, a, b) = pair();
        // Station 0 is due at day offset 0 every day.
        for day in 0..200u64 {
            world.run_link_averages(Tick(day * TICKS_PER_DAY as u64), 4);
        }
        assert_eq!(world.links(a, CARGO).count(), 0);
        // Station 1's slot was never hit by ticks at offset 0.
        assert_eq!(world.links(b, CARGO).count(), 1);
    }

    #[test]
    fn observations_stack_on_the_average() {
        let (mut world, a, b) = pair();
        world.record_capacity(a, b, CARGO, 10);
        let (_, cap) = world.links(a, CARGO).next().unwrap();
        assert_eq!(cap, 30);
    }
}

mod flows {
    use std::collections::BTreeSet;

    use lf_core::StationId;

    use crate::FlowStat;

    #[test]
    fn ordered_best_via_first() {
        let mut set = BTreeSet::new();
        set.insert(FlowStat { length: 9, via: StationId(1), planned: 5, shipped: 0 });
        set.insert(FlowStat { length: 2, via: StationId(4), planned: 5, shipped: 0 });
        set.insert(FlowStat { length: 2, via: StationId(2), planned: 5, shipped: 0 });

        let vias: Vec<_> = set.iter().map(|s| (s.length, s.via)).collect();
        assert_eq!(
            vias,
            vec![(2, StationId(2)), (2, StationId(4)), (9, StationId(1))]
        );
    }
}
