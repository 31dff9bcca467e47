// The seam between the game loop and whatever shows the pixels.
// `draw::Drawer` is the real window; tests use a scripted surface.

use crate::error::Error;
use crate::input::Event;
use crate::types::FrameBuffer;

pub trait Surface {
    /// False once the surface has been closed.
    fn is_open(&self) -> bool;

    fn close(&mut self);

    /// Next pending input record, or None when the queue is drained.
    fn poll_event(&mut self) -> Option<Event>;

    /// Live state of the primary mouse button, independent of queued events.
    fn primary_button_held(&self) -> bool;

    /// Show the finished frame.
    fn present(&mut self, frame: &FrameBuffer) -> Result<(), Error>;
}
