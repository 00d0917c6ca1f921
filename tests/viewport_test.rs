use approx::assert_relative_eq;
use portal_scene::{
    camera::Projection,
    config::MAX_PIXEL_RATIO,
    viewport::{Viewport, clamp_pixel_ratio},
};
use winit::dpi::PhysicalSize;

#[test]
fn high_density_display_is_clamped() {
    let viewport = Viewport::new(1920, 1080, 3.0);
    assert_eq!(viewport.size(), (1920, 1080));
    assert_relative_eq!(viewport.pixel_ratio(), 2.0);
    assert_relative_eq!(viewport.aspect(), 1.7778, epsilon = 1e-4);
    assert_eq!(viewport.physical_size(), (3840, 2160));

    let projection = Projection::new(1920, 1080, cgmath::Deg(45.0), 0.1, 100.0);
    assert_relative_eq!(projection.aspect(), 1.7778, epsilon = 1e-4);
}

#[test]
fn resize_updates_size_aspect_and_ratio() {
    let mut viewport = Viewport::new(800, 600, 1.0);
    let mut projection = Projection::new(800, 600, cgmath::Deg(45.0), 0.1, 100.0);

    for (width, height, density) in [(1024, 768, 1.0), (375, 812, 3.0), (1280, 720, 1.5)] {
        viewport.resize(width, height, density);
        projection.resize(width, height);

        assert_eq!(viewport.size(), (width, height));
        assert_relative_eq!(viewport.pixel_ratio(), density.min(MAX_PIXEL_RATIO));
        assert_relative_eq!(projection.aspect(), width as f32 / height as f32);
        assert_relative_eq!(viewport.aspect(), projection.aspect());
    }
}

#[test]
fn physical_sizes_are_converted_to_logical() {
    let viewport = Viewport::from_physical(PhysicalSize::new(2880, 1800), 2.0, MAX_PIXEL_RATIO);
    assert_eq!(viewport.size(), (1440, 900));
    assert_eq!(viewport.physical_size(), (2880, 1800));

    let viewport = Viewport::from_physical(PhysicalSize::new(3000, 1500), 3.0, MAX_PIXEL_RATIO);
    assert_eq!(viewport.size(), (1000, 500));
    assert_eq!(viewport.physical_size(), (2000, 1000));
}

#[test]
fn degenerate_densities_fall_back_to_one() {
    assert_relative_eq!(clamp_pixel_ratio(0.0, 2.0), 1.0);
    assert_relative_eq!(clamp_pixel_ratio(-1.0, 2.0), 1.0);
    assert_relative_eq!(clamp_pixel_ratio(f64::NAN, 2.0), 1.0);
    assert_relative_eq!(clamp_pixel_ratio(1.25, 2.0), 1.25);
}

#[test]
fn zero_sized_viewport_is_empty() {
    assert!(Viewport::new(0, 600, 1.0).is_empty());
    assert!(!Viewport::new(1, 1, 1.0).is_empty());
}
