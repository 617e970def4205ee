use super::*;
use crate::random::{FixedSource, RngSource};

#[test]
fn empty_jar_refuses_to_draw() {
    let collection = Collection::new();
    let err = draw(&collection, Mode::Jar, &mut FixedSource::constant(0)).expect_err("refused");
    assert_eq!(
        err,
        PickError::InsufficientItems {
            mode: Mode::Jar,
            required: 1,
            available: 0
        }
    );
    assert!(collection.is_empty());
}

#[test]
fn single_item_wheel_refuses_but_single_item_jar_draws() {
    let collection = Collection::from_lines("only");
    let err = draw(&collection, Mode::Wheel, &mut FixedSource::constant(0)).expect_err("refused");
    assert!(matches!(err, PickError::InsufficientItems { required: 2, .. }));

    let drawn = draw(&collection, Mode::Jar, &mut FixedSource::constant(0)).expect("draw");
    assert_eq!(drawn.item, "only");
    assert_eq!(collection.size(), 1);
}

#[test]
fn draw_returns_item_at_chosen_index() {
    let collection = Collection::from_lines("Eat\nSleep\nCode");
    let drawn = draw(&collection, Mode::Jar, &mut FixedSource::constant(1)).expect("draw");
    assert_eq!(drawn.index, 1);
    assert_eq!(drawn.item, "Sleep");
}

#[test]
fn draws_are_uniform_across_items() {
    const ITEMS: usize = 5;
    const DRAWS: usize = 50_000;

    let collection = Collection::from_lines("a\nb\nc\nd\ne");
    let mut source = RngSource::seeded(0x5eed);
    let mut counts = [0usize; ITEMS];
    for _ in 0..DRAWS {
        let drawn = draw(&collection, Mode::Wheel, &mut source).expect("draw");
        counts[drawn.index] += 1;
    }

    let expected = DRAWS as f64 / ITEMS as f64;
    let chi_square: f64 = counts
        .iter()
        .map(|&observed| {
            let diff = observed as f64 - expected;
            diff * diff / expected
        })
        .sum();
    // 4 degrees of freedom, p = 0.001
    assert!(chi_square < 18.47, "chi-square {chi_square} for {counts:?}");
    for count in counts {
        let frequency = count as f64 / DRAWS as f64;
        assert!((frequency - 0.2).abs() < 0.01, "frequency {frequency}");
    }
}
