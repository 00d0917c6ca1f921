//! Registry of debug controls bound to [`Settings`].
//!
//! Each control knows its kind (a ranged number or a colour) and a binding
//! that writes an accepted value into the settings. Edits are applied
//! synchronously, clamped to the control's range and snapped to its step.

use crate::{
    error::SceneError,
    settings::{Colour, Settings},
};

pub const FIREFLY_SIZE: &str = "fireflySize";
pub const PORTAL_COLOUR_START: &str = "portalColorStart";
pub const PORTAL_COLOUR_END: &str = "portalColorEnd";
pub const CLEAR_COLOUR: &str = "clearColor";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlKind {
    Number { min: f32, max: f32, step: f32 },
    Colour,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlValue {
    Number(f32),
    Colour(Colour),
}

impl std::fmt::Display for ControlValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ControlValue::Number(n) => write!(f, "{n}"),
            ControlValue::Colour(c) => write!(f, "{c}"),
        }
    }
}

pub struct Control {
    pub name: &'static str,
    pub kind: ControlKind,
    read: fn(&Settings) -> ControlValue,
    write: fn(&mut Settings, ControlValue),
}

impl std::fmt::Debug for Control {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Control")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

impl Control {
    pub fn value(&self, settings: &Settings) -> ControlValue {
        (self.read)(settings)
    }

    /// Brings `value` into the control's domain or rejects it.
    fn accept(&self, value: ControlValue) -> Result<ControlValue, SceneError> {
        match (self.kind, value) {
            (ControlKind::Number { .. }, ControlValue::Number(n)) if !n.is_finite() => {
                Err(SceneError::ControlMismatch {
                    name: self.name.to_string(),
                })
            }
            (ControlKind::Number { min, max, step }, ControlValue::Number(n)) => {
                let n = if step > 0.0 {
                    min + ((n - min) / step).round() * step
                } else {
                    n
                };
                Ok(ControlValue::Number(n.clamp(min, max)))
            }
            (ControlKind::Colour, ControlValue::Colour(c)) => Ok(ControlValue::Colour(c)),
            _ => Err(SceneError::ControlMismatch {
                name: self.name.to_string(),
            }),
        }
    }
}

#[derive(Debug)]
pub struct DebugPanel {
    controls: Vec<Control>,
}

impl Default for DebugPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl DebugPanel {
    pub fn new() -> Self {
        let controls = vec![
            Control {
                name: FIREFLY_SIZE,
                kind: ControlKind::Number {
                    min: 0.0,
                    max: 300.0,
                    step: 1.0,
                },
                read: |s| ControlValue::Number(s.firefly_size()),
                write: |s, v| {
                    if let ControlValue::Number(n) = v {
                        s.set_firefly_size(n)
                    }
                },
            },
            Control {
                name: PORTAL_COLOUR_START,
                kind: ControlKind::Colour,
                read: |s| ControlValue::Colour(s.portal_colour_start()),
                write: |s, v| {
                    if let ControlValue::Colour(c) = v {
                        s.set_portal_colour_start(c)
                    }
                },
            },
            Control {
                name: PORTAL_COLOUR_END,
                kind: ControlKind::Colour,
                read: |s| ControlValue::Colour(s.portal_colour_end()),
                write: |s, v| {
                    if let ControlValue::Colour(c) = v {
                        s.set_portal_colour_end(c)
                    }
                },
            },
            Control {
                name: CLEAR_COLOUR,
                kind: ControlKind::Colour,
                read: |s| ControlValue::Colour(s.clear_colour()),
                write: |s, v| {
                    if let ControlValue::Colour(c) = v {
                        s.set_clear_colour(c)
                    }
                },
            },
        ];
        Self { controls }
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn control(&self, name: &str) -> Option<&Control> {
        self.controls.iter().find(|c| c.name == name)
    }

    /// Applies an edit and returns the value that was actually stored.
    pub fn edit(
        &self,
        settings: &mut Settings,
        name: &str,
        value: ControlValue,
    ) -> Result<ControlValue, SceneError> {
        let control = self
            .control(name)
            .ok_or_else(|| SceneError::UnknownControl(name.to_string()))?;
        let accepted = control.accept(value)?;
        (control.write)(settings, accepted);
        log::info!("debug panel: {} = {}", name, accepted);
        Ok(accepted)
    }

    /// Like [`DebugPanel::edit`] for colour controls given in hex notation.
    pub fn edit_hex(
        &self,
        settings: &mut Settings,
        name: &str,
        hex: &str,
    ) -> Result<ControlValue, SceneError> {
        let colour = Colour::from_hex(hex)?;
        self.edit(settings, name, ControlValue::Colour(colour))
    }

    /// Adds `delta` to a number control.
    pub fn nudge(
        &self,
        settings: &mut Settings,
        name: &str,
        delta: f32,
    ) -> Result<ControlValue, SceneError> {
        let control = self
            .control(name)
            .ok_or_else(|| SceneError::UnknownControl(name.to_string()))?;
        match control.value(settings) {
            ControlValue::Number(n) => self.edit(settings, name, ControlValue::Number(n + delta)),
            ControlValue::Colour(_) => Err(SceneError::ControlMismatch {
                name: name.to_string(),
            }),
        }
    }

    pub fn log_values(&self, settings: &Settings) {
        for control in &self.controls {
            log::info!("{:>18}: {}", control.name, control.value(settings));
        }
    }
}
