use bass_viz::{LedStrip, OFF, RGB8};
use smart_leds::SmartLedsWrite;

/// One WS2812 strip behind any smart-leds writer.
///
/// `fill` only stages a color; `commit` is the explicit flush that clocks it
/// out to every pixel.
pub struct Strip<W> {
    writer: W,
    len: usize,
    staged: RGB8,
}

impl<W> Strip<W> {
    pub fn new(writer: W, len: usize) -> Self {
        Self {
            writer,
            len,
            staged: OFF,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<W: SmartLedsWrite<Color = RGB8>> Strip<W> {
    /// Per-pixel write for the spatial modes.
    pub fn paint<I>(&mut self, pixels: I) -> Result<(), W::Error>
    where
        I: IntoIterator<Item = RGB8>,
    {
        self.writer.write(pixels)
    }
}

impl<W: SmartLedsWrite<Color = RGB8>> LedStrip for Strip<W> {
    type Error = W::Error;

    fn fill(&mut self, color: RGB8) {
        self.staged = color;
    }

    fn commit(&mut self) -> Result<(), Self::Error> {
        let staged = self.staged;
        self.writer.write((0..self.len).map(move |_| staged))
    }
}
