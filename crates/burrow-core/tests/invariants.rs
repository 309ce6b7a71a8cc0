//! Property tests over random colonies.

use burrow_core::prelude::*;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn proptest_cells_never_double_booked(seed in any::<u64>(), creatures in 1usize..60) {
        let mut config = SimConfig::default();
        config.world.initial_creatures = creatures;
        let mut env = Environment::new(config, seed).unwrap();

        for _ in 0..120 {
            env.update(0.1);
            let mut cells: Vec<GridPos> = env
                .creatures()
                .iter()
                .chain(env.eggs())
                .filter_map(|e| env.position(*e))
                .collect();
            let total = cells.len();
            cells.sort();
            cells.dedup();
            prop_assert_eq!(cells.len(), total);
            prop_assert!(cells.iter().all(|p| env.bounds().contains(*p)));
        }
    }

    #[test]
    fn proptest_soil_fields_stay_capped(seed in any::<u64>()) {
        let mut config = SimConfig::default();
        config.world.initial_creatures = 10;
        let mut env = Environment::new(config, seed).unwrap();
        let targets: Vec<_> = env.creatures().to_vec();
        for e in targets.iter().take(4) {
            env.creature_mut(*e).unwrap().die(DeathCause::Unknown, 200.0);
        }

        for _ in 0..200 {
            env.update(0.1);
        }
        prop_assert!(env.soil().fertility().all(|(_, f)| (0.0..=100.0).contains(&f)));
        prop_assert!(env.soil().grass().all(|(_, g)| (0.0..=100.0).contains(&g)));
        prop_assert!(env.soil().total_fertility() > 0.0);
    }

    #[test]
    fn proptest_selection_matches_cell(seed in any::<u64>(), x in 0i32..18, y in 0i32..18) {
        let mut config = SimConfig::default();
        config.world.initial_creatures = 40;
        let mut env = Environment::new(config, seed).unwrap();
        let pos = GridPos::new(x, y);
        match env.select_at(pos) {
            Some(Selection::Creature(e)) | Some(Selection::Egg(e)) => {
                prop_assert_eq!(env.position(e), Some(pos));
            }
            None => prop_assert!(env.grid().get(pos).is_none()),
        }
    }
}
