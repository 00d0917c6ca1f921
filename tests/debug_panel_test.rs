use portal_scene::{
    SceneError,
    debug_panel::{
        CLEAR_COLOUR, ControlKind, ControlValue, DebugPanel, FIREFLY_SIZE, PORTAL_COLOUR_END,
        PORTAL_COLOUR_START,
    },
    settings::{Colour, DEFAULT_CLEAR_COLOUR, Settings},
};

#[test]
fn panel_registers_the_four_controls_with_their_defaults() {
    let panel = DebugPanel::new();
    let settings = Settings::default();

    let names: Vec<_> = panel.controls().iter().map(|c| c.name).collect();
    assert_eq!(names, [FIREFLY_SIZE, PORTAL_COLOUR_START, PORTAL_COLOUR_END, CLEAR_COLOUR]);

    let size = panel.control(FIREFLY_SIZE).expect("firefly size control");
    assert_eq!(
        size.kind,
        ControlKind::Number {
            min: 0.0,
            max: 300.0,
            step: 1.0
        }
    );
    assert_eq!(size.value(&settings), ControlValue::Number(100.0));
    assert_eq!(
        panel.control(PORTAL_COLOUR_START).map(|c| c.value(&settings)),
        Some(ControlValue::Colour(Colour::BLACK))
    );
    assert_eq!(
        panel.control(PORTAL_COLOUR_END).map(|c| c.value(&settings)),
        Some(ControlValue::Colour(Colour::WHITE))
    );
    assert_eq!(settings.clear_colour().to_hex(), "#201919");
}

#[test]
fn clear_colour_edit_is_visible_immediately() {
    let panel = DebugPanel::new();
    let mut settings = Settings::default();

    panel
        .edit_hex(&mut settings, CLEAR_COLOUR, "#ffffff")
        .expect("valid colour");
    assert_eq!(settings.clear_colour(), Colour::WHITE);
    assert_eq!(settings.clear_colour().to_wgpu(), wgpu::Color::WHITE);
}

#[test]
fn numbers_are_clamped_and_snapped() {
    let panel = DebugPanel::new();
    let mut settings = Settings::default();

    let stored = panel.edit(&mut settings, FIREFLY_SIZE, ControlValue::Number(512.0));
    assert_eq!(stored, Ok(ControlValue::Number(300.0)));
    assert_eq!(settings.firefly_size(), 300.0);

    panel
        .edit(&mut settings, FIREFLY_SIZE, ControlValue::Number(-4.0))
        .unwrap();
    assert_eq!(settings.firefly_size(), 0.0);

    panel
        .edit(&mut settings, FIREFLY_SIZE, ControlValue::Number(42.6))
        .unwrap();
    assert_eq!(settings.firefly_size(), 43.0);

    panel.nudge(&mut settings, FIREFLY_SIZE, -10.0).unwrap();
    assert_eq!(settings.firefly_size(), 33.0);
}

#[test]
fn non_finite_numbers_are_rejected() {
    let panel = DebugPanel::new();
    let mut settings = Settings::default();

    for n in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
        assert_eq!(
            panel.edit(&mut settings, FIREFLY_SIZE, ControlValue::Number(n)),
            Err(SceneError::ControlMismatch {
                name: FIREFLY_SIZE.to_string()
            })
        );
        assert_eq!(settings.firefly_size(), 100.0);
    }
}

#[test]
fn bad_edits_are_rejected_without_side_effects() {
    let panel = DebugPanel::new();
    let mut settings = Settings::default();

    assert_eq!(
        panel.edit(&mut settings, "bloom", ControlValue::Number(1.0)),
        Err(SceneError::UnknownControl("bloom".to_string()))
    );
    assert_eq!(
        panel.edit(&mut settings, CLEAR_COLOUR, ControlValue::Number(1.0)),
        Err(SceneError::ControlMismatch {
            name: CLEAR_COLOUR.to_string()
        })
    );
    assert_eq!(
        panel.nudge(&mut settings, PORTAL_COLOUR_END, 1.0),
        Err(SceneError::ControlMismatch {
            name: PORTAL_COLOUR_END.to_string()
        })
    );
    assert_eq!(
        panel.edit_hex(&mut settings, CLEAR_COLOUR, "#12345"),
        Err(SceneError::InvalidColour("#12345".to_string()))
    );
    assert_eq!(settings, Settings::default());
}

#[test]
fn hex_colours_parse_and_print() {
    assert_eq!(Colour::from_hex("#201919"), Ok(DEFAULT_CLEAR_COLOUR));
    assert_eq!(Colour::from_hex("ffffe5"), Ok(Colour::rgb(0xff, 0xff, 0xe5)));
    assert_eq!(Colour::from_hex("#FFFFFF"), Ok(Colour::WHITE));
    assert!(Colour::from_hex("#gg0000").is_err());
    assert!(Colour::from_hex("#ééé").is_err());
    assert_eq!(
        Colour::from_hex("#+f+f+f"),
        Err(SceneError::InvalidColour("#+f+f+f".to_string()))
    );
    assert_eq!(Colour::rgb(0x0b, 0x10, 0x1f).to_string(), "#0b101f");
}

#[test]
fn black_and_white_are_linear_extremes() {
    assert_eq!(Colour::BLACK.to_linear(), [0.0, 0.0, 0.0]);
    assert_eq!(Colour::WHITE.to_linear(), [1.0, 1.0, 1.0]);
}
