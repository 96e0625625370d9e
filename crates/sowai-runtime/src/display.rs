//! Display surface seam

use sowai_core::ClockResult;
use sowai_visual::{CompositeFrame, TargetRect};

/// Presents the composite frame into an output area
pub trait DisplaySurface {
    /// Current output-area size in surface units; `(0, 0)` when hidden
    fn output_size(&mut self) -> ClockResult<(u32, u32)>;

    /// Draw the frame's RGB pixels into `target`
    fn present(&mut self, frame: &CompositeFrame, target: TargetRect) -> ClockResult<()>;
}

impl<D: DisplaySurface + ?Sized> DisplaySurface for Box<D> {
    fn output_size(&mut self) -> ClockResult<(u32, u32)> {
        (**self).output_size()
    }

    fn present(&mut self, frame: &CompositeFrame, target: TargetRect) -> ClockResult<()> {
        (**self).present(frame, target)
    }
}
