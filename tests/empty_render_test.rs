#[cfg(feature = "integration-tests")]
mod common;

#[cfg(feature = "integration-tests")]
mod offscreen {
    use portal_scene::{
        config::CameraConfig,
        debug_panel::{CLEAR_COLOUR, DebugPanel},
        fireflies::FireflyField,
        render::SceneRenderer,
        settings::{Colour, Settings},
        viewport::Viewport,
    };

    use crate::common::test_utils::{headless_device, read_back, seeded_rng};

    const SIZE: u32 = 256;
    const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    /// Renders a single frame without a model and returns the pixels.
    fn render_frame(settings: &Settings, field: &FireflyField) -> anyhow::Result<image::RgbaImage> {
        futures::executor::block_on(async {
            let (device, queue) = headless_device().await?;
            let viewport = Viewport::new(SIZE, SIZE, 1.0);
            let mut renderer = SceneRenderer::new(
                &device,
                &queue,
                FORMAT,
                field,
                settings,
                &viewport,
                &CameraConfig::default(),
            );
            renderer.write_time(&queue, 1.0, settings, &viewport);
            renderer.update_camera(&queue);

            let target = device.create_texture(&wgpu::TextureDescriptor {
                label: Some("Offscreen Render Target"),
                size: wgpu::Extent3d {
                    width: SIZE,
                    height: SIZE,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: FORMAT,
                usage: wgpu::TextureUsages::COPY_SRC | wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            });
            let view = target.create_view(&wgpu::TextureViewDescriptor::default());
            let depth = portal_scene::data_structures::texture::Texture::create_depth_texture(
                &device,
                [SIZE, SIZE],
                "depth_texture",
            );

            let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
            renderer.encode(
                &mut encoder,
                &view,
                &depth.view,
                settings.clear_colour().to_wgpu(),
                None,
            );
            queue.submit(std::iter::once(encoder.finish()));

            read_back(&device, &queue, &target, SIZE, SIZE).await
        })
    }

    fn assert_every_pixel(img: &image::RgbaImage, colour: Colour) {
        let close = |a: u8, b: u8| a.abs_diff(b) <= 1;
        for pixel in img.pixels() {
            let [r, g, b, a] = pixel.0;
            assert!(
                close(r, colour.r) && close(g, colour.g) && close(b, colour.b) && a == 255,
                "{:?} != {}",
                pixel,
                colour
            );
        }
    }

    #[test]
    fn should_render_clear_colour() {
        let settings = Settings::default();
        let field = FireflyField::generate(0, &mut seeded_rng(0));
        let img = render_frame(&settings, &field).expect("offscreen render");
        assert_every_pixel(&img, Colour::rgb(0x20, 0x19, 0x19));
    }

    #[test]
    fn should_render_edited_clear_colour() {
        let mut settings = Settings::default();
        DebugPanel::new()
            .edit_hex(&mut settings, CLEAR_COLOUR, "#ffffff")
            .expect("valid colour");
        let field = FireflyField::generate(0, &mut seeded_rng(0));
        let img = render_frame(&settings, &field).expect("offscreen render");
        assert_every_pixel(&img, Colour::WHITE);
    }

    #[test]
    fn fireflies_brighten_the_frame() {
        let mut settings = Settings::default();
        settings.set_clear_colour(Colour::BLACK);
        settings.set_firefly_size(300.0);
        let field = FireflyField::generate(50, &mut seeded_rng(5));
        let img = render_frame(&settings, &field).expect("offscreen render");
        assert!(img.pixels().any(|p| p.0[0] > 0 || p.0[1] > 0 || p.0[2] > 0));
    }

    #[test]
    fn resize_updates_camera_aspect() {
        futures::executor::block_on(async {
            let (device, queue) = headless_device().await.expect("headless device");
            let settings = Settings::default();
            let field = FireflyField::generate(0, &mut seeded_rng(0));
            let viewport = Viewport::new(SIZE, SIZE, 1.0);
            let mut renderer = SceneRenderer::new(
                &device,
                &queue,
                FORMAT,
                &field,
                &settings,
                &viewport,
                &CameraConfig::default(),
            );
            approx::assert_relative_eq!(renderer.camera.projection.aspect(), 1.0);

            let resized = Viewport::new(1920, 1080, 3.0);
            renderer.resize(&resized);
            renderer.update_camera(&queue);
            approx::assert_relative_eq!(
                renderer.camera.projection.aspect(),
                1920.0 / 1080.0,
                epsilon = 1e-4
            );
            assert_eq!(resized.pixel_ratio(), 2.0);
        });
    }
}
