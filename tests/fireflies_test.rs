use portal_scene::fireflies::{FireflyField, FireflyUniform, HALF_WIDTH, MAX_HEIGHT};
use portal_scene::{settings::Settings, viewport::Viewport};

use crate::common::test_utils::seeded_rng;

mod common;

#[test]
fn generated_fireflies_stay_inside_the_volume() {
    for seed in 0..20 {
        let field = FireflyField::generate(50, &mut seeded_rng(seed));
        for i in 0..field.len() {
            let [x, y, z] = field.position(i).expect("position in range");
            assert!((-HALF_WIDTH..=HALF_WIDTH).contains(&x), "x = {x}");
            assert!((0.0..=MAX_HEIGHT).contains(&y), "y = {y}");
            assert!((-HALF_WIDTH..=HALF_WIDTH).contains(&z), "z = {z}");
            assert!((0.0..=1.0).contains(&field.scales[i]));
        }
    }
}

#[test]
fn field_has_exactly_count_points() {
    let field = FireflyField::generate(50, &mut seeded_rng(7));
    assert_eq!(field.len(), 50);
    assert_eq!(field.positions.len(), 150);
    assert_eq!(field.scales.len(), 50);
    assert!(field.position(50).is_none());

    let other = FireflyField::generate(50, &mut seeded_rng(8));
    assert_eq!(other.positions.len(), field.positions.len());
    assert_eq!(other.scales.len(), field.scales.len());
    assert_ne!(other, field);
}

#[test]
fn same_seed_gives_the_same_field() {
    let a = FireflyField::generate(12, &mut seeded_rng(42));
    let b = FireflyField::generate(12, &mut seeded_rng(42));
    assert_eq!(a, b);
}

#[test]
fn empty_field() {
    let field = FireflyField::generate(0, &mut seeded_rng(1));
    assert!(field.is_empty());
    assert!(field.positions.is_empty());
    assert!(field.scales.is_empty());
    assert!(FireflyField::random(0).is_empty());
}

#[test]
fn uniform_follows_settings_and_viewport() {
    let mut settings = Settings::default();
    settings.set_firefly_size(150.0);
    let viewport = Viewport::new(800, 600, 3.0);

    let uniform = FireflyUniform::new(2.5, &settings, &viewport);
    approx::assert_relative_eq!(uniform.time, 2.5);
    approx::assert_relative_eq!(uniform.size, 150.0);
    approx::assert_relative_eq!(uniform.pixel_ratio, 2.0);
    assert_eq!(uniform.resolution, [1600.0, 1200.0]);
}
