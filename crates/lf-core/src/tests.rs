//! Unit tests for lf-core.

mod ids {
    use crate::{ComponentId, NodeId, StationId};

    #[test]
    fn invalid_sentinels() {
        assert_eq!(NodeId::INVALID.0, u32::MAX);
        assert_eq!(StationId::INVALID.0, u16::MAX);
        assert_eq!(NodeId::default(), NodeId::INVALID);
    }

    #[test]
    fn index_roundtrip() {
        assert_eq!(NodeId(7).index(), 7);
        assert_eq!(usize::from(StationId(3)), 3);
    }

    #[test]
    fn component_parity() {
        assert_eq!(ComponentId(2).parity(), 0);
        assert_eq!(ComponentId(3).parity(), 1);
        assert_eq!(ComponentId(2).parity(), ComponentId(4).parity());
        assert_ne!(ComponentId(2).parity(), ComponentId(5).parity());
    }

    #[test]
    fn ordering_follows_inner_value() {
        assert!(NodeId(1) < NodeId(2));
        assert!(StationId(5) < StationId::INVALID);
    }
}

mod time {
    use crate::{Date, JOIN_TICK, SPAWN_TICK, TICKS_PER_DAY, Tick};

    #[test]
    fn date_and_fract() {
        let t = Tick(TICKS_PER_DAY as u64 * 3 + 21);
        assert_eq!(t.date(), Date(3));
        assert_eq!(t.day_fract(), 21);
        assert_eq!(Tick::ZERO.date(), Date(0));
    }

    #[test]
    fn date_first_tick_roundtrip() {
        let d = Date(5);
        assert_eq!(d.first_tick().date(), d);
        assert_eq!(d.at(SPAWN_TICK).day_fract(), SPAWN_TICK);
    }

    #[test]
    fn join_precedes_spawn_within_a_day() {
        assert!(JOIN_TICK < SPAWN_TICK);
        assert!(SPAWN_TICK < TICKS_PER_DAY);
    }

    #[test]
    fn date_addition() {
        assert_eq!(Date(3) + 7, Date(10));
        assert_eq!(Tick(10) + 5, Tick(15));
    }
}

mod settings {
    use crate::{CargoId, DistributionShape, EngineConfig};

    #[test]
    fn defaults_validate() {
        assert!(EngineConfig::new(4).validate().is_ok());
    }

    #[test]
    fn zero_accuracy_rejected() {
        let mut config = EngineConfig::new(1);
        config.settings.accuracy = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_recalc_interval_rejected() {
        let mut config = EngineConfig::new(1);
        config.settings.recalc_interval = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn no_cargos_rejected() {
        let config = EngineConfig { shapes: vec![], ..EngineConfig::new(1) };
        assert!(config.validate().is_err());
    }

    #[test]
    fn out_of_range_cargo_is_manual() {
        let config = EngineConfig::new(2);
        assert_eq!(config.shape(CargoId(0)), DistributionShape::Symmetric);
        assert_eq!(config.shape(CargoId(9)), DistributionShape::Manual);
    }

    #[test]
    fn snapshot_resolves_shape() {
        let mut config = EngineConfig::new(2);
        config.shapes[1] = DistributionShape::Antisymmetric;
        let snap = config.snapshot(CargoId(1));
        assert_eq!(snap.shape, DistributionShape::Antisymmetric);
        assert_eq!(snap.accuracy, config.settings.accuracy);
    }
}
