//! Composite frame - the strip of digit images shown on screen

use sowai_core::BatchShape;

/// Bytes per pixel (interleaved RGB)
pub const CHANNELS: usize = 3;

/// Destination rectangle inside the output area
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct TargetRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl TargetRect {
    /// Largest integer upscale of `frame_w × frame_h` that fits `area`,
    /// capped at `max_scale` and centered. `None` for an empty area.
    pub fn centered(
        frame_w: u32,
        frame_h: u32,
        area_w: u32,
        area_h: u32,
        max_scale: u32,
    ) -> Option<TargetRect> {
        if area_w == 0 || area_h == 0 || frame_w == 0 || frame_h == 0 {
            return None;
        }

        let fit = (area_w / frame_w).min(area_h / frame_h);
        let scale = fit.min(max_scale).max(1);
        let width = frame_w * scale;
        let height = frame_h * scale;

        Some(TargetRect {
            x: area_w.saturating_sub(width) / 2,
            y: area_h.saturating_sub(height) / 2,
            width,
            height,
        })
    }

    /// Integer scale relative to a frame width
    pub fn scale_for(&self, frame_w: u32) -> u32 {
        if frame_w == 0 {
            0
        } else {
            self.width / frame_w
        }
    }
}

/// Single interleaved RGB buffer holding every digit side by side
///
/// Owned by the pipeline and rebuilt wholesale on each generation; it is
/// presented unchanged on every render tick in between.
#[derive(Clone, PartialEq, Eq)]
pub struct CompositeFrame {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
    sequence: u64,
}

impl CompositeFrame {
    /// Black frame of the given size
    pub fn new(width: usize, height: usize) -> Self {
        CompositeFrame {
            width,
            height,
            pixels: vec![0; width * height * CHANNELS],
            sequence: 0,
        }
    }

    /// Black frame sized for a batch strip
    pub fn for_shape(shape: &BatchShape) -> Self {
        Self::new(shape.frame_width(), shape.frame_height())
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Number of completed rebuilds (0 = never generated)
    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// RGB triple at `(x, y)`
    pub fn pixel(&self, x: usize, y: usize) -> [u8; CHANNELS] {
        let i = (y * self.width + x) * CHANNELS;
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]]
    }

    /// Centered placement in an output area of `area_w × area_h`
    pub fn target_rect(&self, area_w: u32, area_h: u32, max_scale: u32) -> Option<TargetRect> {
        TargetRect::centered(
            self.width as u32,
            self.height as u32,
            area_w,
            area_h,
            max_scale,
        )
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    pub(crate) fn mark_rebuilt(&mut self) {
        self.sequence += 1;
    }
}

impl std::fmt::Debug for CompositeFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeFrame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("sequence", &self.sequence)
            .finish()
    }
}
