//! Level generation properties over random seeds and sizes

use diamond_quest::core::{diamond_quota, generate, physics, SimpleRng};
use diamond_quest::types::{Tile, EXIT_MIN_DISTANCE, MIN_DIAMONDS_REQUIRED, SPAWN_INSET};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn generated_levels_hold_invariants(seed in any::<u32>(), width in 20u16..40, height in 15u16..30) {
        let level = generate(width, height, &mut SimpleRng::new(seed)).unwrap();
        let grid = &level.grid;

        prop_assert_eq!(grid.width(), width);
        prop_assert_eq!(grid.height(), height);
        prop_assert!(grid.has_wall_border());
        prop_assert_eq!(grid.count(Tile::Player), 1);
        prop_assert_eq!(grid.count(Tile::Exit), 0);
        prop_assert!(level.diamonds_required >= MIN_DIAMONDS_REQUIRED);
        prop_assert_eq!(
            level.diamonds_required,
            diamond_quota(grid.count(Tile::Diamond) as u32)
        );

        let inset = SPAWN_INSET as i32;
        for p in [level.spawn, level.exit] {
            prop_assert!(p.x >= inset && p.x < width as i32 - inset);
            prop_assert!(p.y >= inset && p.y < height as i32 - inset);
        }
        prop_assert!(level.exit.manhattan(level.spawn) > EXIT_MIN_DISTANCE);
        prop_assert_ne!(grid.tile(level.exit), Some(Tile::Boulder));
    }

    #[test]
    fn generated_levels_settle(seed in any::<u32>()) {
        let mut level = generate(20, 15, &mut SimpleRng::new(seed)).unwrap();
        let report = physics::settle(&mut level.grid, 20 * 15);
        prop_assert!(report.settled);
        prop_assert!(level.grid.has_wall_border());
        prop_assert_eq!(level.grid.count(Tile::Player), 1);
    }

    #[test]
    fn generation_is_a_function_of_the_seed(seed in any::<u32>()) {
        let a = generate(20, 15, &mut SimpleRng::new(seed)).unwrap();
        let b = generate(20, 15, &mut SimpleRng::new(seed)).unwrap();
        prop_assert_eq!(a, b);
    }
}

#[test]
fn test_undersized_grids_fail() {
    for (w, h) in [(4, 15), (20, 4), (10, 10), (1, 1)] {
        assert!(
            generate(w, h, &mut SimpleRng::new(7)).is_err(),
            "{w}x{h} should not generate"
        );
    }
}

#[test]
fn test_oversized_grids_fail() {
    for (w, h) in [(257, 15), (20, 300), (33000, 15)] {
        assert!(
            generate(w, h, &mut SimpleRng::new(7)).is_err(),
            "{w}x{h} should not generate"
        );
    }
}

#[test]
fn test_different_seeds_differ() {
    let a = generate(20, 15, &mut SimpleRng::new(1)).unwrap();
    let b = generate(20, 15, &mut SimpleRng::new(2)).unwrap();
    assert_ne!(a.grid, b.grid);
}
