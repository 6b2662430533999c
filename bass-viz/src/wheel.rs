use smart_leds::RGB8;

/// All channels dark.
pub const OFF: RGB8 = RGB8 { r: 0, g: 0, b: 0 };

/// Hue-cursor steps per wheel position; raise to slow the reactive sweep.
pub const REACTIVE_COLOR_CHANGE_SPEED: u16 = 3;

/// Exclusive upper bound of the hue cursor.
pub const COLOR_INDEX_MAX: u16 = 256 * REACTIVE_COLOR_CHANGE_SPEED;

fn scale(channel: u16, avg_brightness: u8) -> u8 {
    (channel * u16::from(avg_brightness) / 100) as u8
}

/// Three-segment color wheel: red fades to green over [0, 85), green to blue
/// over [85, 170), blue back to red over [170, 255]. Positions outside
/// [0, 255] are off. Every channel is scaled by the average brightness at
/// generation time, so the raw hue never reaches the strips unmodulated.
pub fn wheel(pos: i32, avg_brightness: u8) -> RGB8 {
    if !(0..=255).contains(&pos) {
        return OFF;
    }
    let pos = pos as u16;
    if pos < 85 {
        RGB8 {
            r: scale(255 - pos * 3, avg_brightness),
            g: scale(pos * 3, avg_brightness),
            b: 0,
        }
    } else if pos < 170 {
        let pos = pos - 85;
        RGB8 {
            r: 0,
            g: scale(255 - pos * 3, avg_brightness),
            b: scale(pos * 3, avg_brightness),
        }
    } else {
        let pos = pos - 170;
        RGB8 {
            r: scale(pos * 3, avg_brightness),
            g: 0,
            b: scale(255 - pos * 3, avg_brightness),
        }
    }
}

/// Cyclic hue state for the reactive mode.
///
/// The cursor advances once per frame and wraps at [`COLOR_INDEX_MAX`]. At
/// low average brightness the scaled wheel output can collapse to all-dark;
/// emitting that would read as a flicker, so the last genuinely lit color is
/// cached and substituted instead.
pub struct ColorCycle {
    cursor: u16,
    last_lit: Option<RGB8>,
}

impl ColorCycle {
    pub const fn new() -> Self {
        Self {
            cursor: 0,
            last_lit: None,
        }
    }

    /// Step the hue cursor by one, wrapping to zero at the maximum.
    pub fn advance(&mut self) {
        self.cursor = (self.cursor + 1) % COLOR_INDEX_MAX;
    }

    pub fn cursor(&self) -> u16 {
        self.cursor
    }

    /// Resolve the current cursor to a brightness-scaled color.
    ///
    /// A non-off result becomes the new cached color before substitution
    /// applies on any later call. An off result is replaced by the cache,
    /// unless nothing lit has ever been produced.
    pub fn resolve(&mut self, avg_brightness: u8) -> RGB8 {
        let color = wheel(i32::from(self.cursor / REACTIVE_COLOR_CHANGE_SPEED), avg_brightness);
        if color != OFF {
            self.last_lit = Some(color);
            color
        } else {
            self.last_lit.unwrap_or(OFF)
        }
    }
}

impl Default for ColorCycle {
    fn default() -> Self {
        Self::new()
    }
}
