//! Live-tunable scene settings.
//!
//! [`Settings`] is owned by the application state and handed to the debug
//! panel by reference. The renderer reads it every frame, so a change is
//! visible on the next rendered frame.

use std::fmt;

use crate::error::SceneError;

/// An sRGB colour as authored in hex notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Colour {
    pub const BLACK: Colour = Colour::rgb(0x00, 0x00, 0x00);
    pub const WHITE: Colour = Colour::rgb(0xff, 0xff, 0xff);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(text: &str) -> Result<Self, SceneError> {
        let invalid = || SceneError::InvalidColour(text.to_string());
        let digits = text.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Linear RGB, as expected by shaders writing to an sRGB target.
    pub fn to_linear(&self) -> [f32; 3] {
        [self.r, self.g, self.b].map(|c| srgb_to_linear(c as f32 / 255.0))
    }

    pub fn to_wgpu(&self) -> wgpu::Color {
        let [r, g, b] = self.to_linear();
        wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: 1.0,
        }
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

pub const DEFAULT_FIREFLY_SIZE: f32 = 100.0;
pub const DEFAULT_CLEAR_COLOUR: Colour = Colour::rgb(0x20, 0x19, 0x19);

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    firefly_size: f32,
    portal_colour_start: Colour,
    portal_colour_end: Colour,
    clear_colour: Colour,
    show_stats: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            firefly_size: DEFAULT_FIREFLY_SIZE,
            portal_colour_start: Colour::BLACK,
            portal_colour_end: Colour::WHITE,
            clear_colour: DEFAULT_CLEAR_COLOUR,
            show_stats: false,
        }
    }
}

impl Settings {
    pub fn firefly_size(&self) -> f32 {
        self.firefly_size
    }

    pub fn set_firefly_size(&mut self, size: f32) {
        self.firefly_size = size;
    }

    pub fn portal_colour_start(&self) -> Colour {
        self.portal_colour_start
    }

    pub fn set_portal_colour_start(&mut self, colour: Colour) {
        self.portal_colour_start = colour;
    }

    pub fn portal_colour_end(&self) -> Colour {
        self.portal_colour_end
    }

    pub fn set_portal_colour_end(&mut self, colour: Colour) {
        self.portal_colour_end = colour;
    }

    pub fn clear_colour(&self) -> Colour {
        self.clear_colour
    }

    pub fn set_clear_colour(&mut self, colour: Colour) {
        self.clear_colour = colour;
    }

    pub fn show_stats(&self) -> bool {
        self.show_stats
    }

    pub fn set_show_stats(&mut self, show: bool) {
        self.show_stats = show;
    }
}
