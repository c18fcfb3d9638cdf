//! Drawing backend abstraction
//!
//! This module defines the trait a 2D immediate-mode backend must implement
//! for objects to render through it, and a recording implementation used by
//! headless tools and tests.

use std::cell::RefCell;
use std::rc::Rc;

/// Opaque handle to an image owned by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageId(pub u32);

/// 2D immediate-mode drawing backend
///
/// Transform calls compose onto the current transform; `save`/`restore`
/// push and pop the full drawing state, including global alpha.
pub trait Context {
    /// Push the drawing state
    fn save(&mut self);

    /// Pop the drawing state
    fn restore(&mut self);

    /// Translate the coordinate system
    fn translate(&mut self, x: f32, y: f32);

    /// Rotate the coordinate system (radians)
    fn rotate(&mut self, radians: f32);

    /// Scale the coordinate system
    fn scale(&mut self, x: f32, y: f32);

    /// Current global alpha
    fn global_alpha(&self) -> f32;

    /// Set global alpha for subsequent draws
    fn set_global_alpha(&mut self, alpha: f32);

    /// Set the fill style (CSS color string)
    fn set_fill_style(&mut self, style: &str);

    /// Fill a rectangle with the current fill style
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32);

    /// Draw text at a position
    fn fill_text(&mut self, text: &str, x: f32, y: f32);

    /// Width of `text` in the current font
    fn measure_text(&self, text: &str) -> f32;

    /// Draw an image scaled into the destination rectangle
    fn draw_image(&mut self, image: ImageId, x: f32, y: f32, width: f32, height: f32);
}

/// Backend reference shared between objects.
///
/// Objects never own the backend; the application creates it once and
/// hands clones of this handle to whatever needs to draw.
pub type SharedContext = Rc<RefCell<dyn Context>>;

/// A single recorded backend call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    /// `save()`
    Save,
    /// `restore()`
    Restore,
    /// `translate(x, y)`
    Translate(f32, f32),
    /// `rotate(radians)`
    Rotate(f32),
    /// `scale(x, y)`
    Scale(f32, f32),
    /// `set_global_alpha(alpha)`
    GlobalAlpha(f32),
    /// `set_fill_style(style)`
    FillStyle(String),
    /// `fill_rect(..)`
    FillRect {
        /// Left edge
        x: f32,
        /// Top edge
        y: f32,
        /// Width
        width: f32,
        /// Height
        height: f32,
    },
    /// `fill_text(..)`
    FillText {
        /// Text drawn
        text: String,
        /// X position
        x: f32,
        /// Y position
        y: f32,
    },
    /// `draw_image(..)`
    DrawImage {
        /// Image drawn
        image: ImageId,
        /// Left edge
        x: f32,
        /// Top edge
        y: f32,
        /// Width
        width: f32,
        /// Height
        height: f32,
    },
}

/// Backend that records every call instead of drawing
#[derive(Debug, Clone)]
pub struct RecordingContext {
    calls: Vec<DrawCall>,
    global_alpha: f32,
    alpha_stack: Vec<f32>,
    char_width: f32,
}

impl Default for RecordingContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingContext {
    /// Create an empty recorder; text measures 8 units per character
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            global_alpha: 1.0,
            alpha_stack: Vec::new(),
            char_width: 8.0,
        }
    }

    /// Create a recorder already wrapped for sharing between objects
    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Calls recorded so far
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Drain the recorded calls
    pub fn take_calls(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.calls)
    }

    /// Number of recorded calls matching `predicate`
    pub fn count(&self, predicate: impl Fn(&DrawCall) -> bool) -> usize {
        self.calls.iter().filter(|call| predicate(call)).count()
    }

    /// Depth of the save stack
    pub fn save_depth(&self) -> usize {
        self.alpha_stack.len()
    }
}

impl Context for RecordingContext {
    fn save(&mut self) {
        self.alpha_stack.push(self.global_alpha);
        self.calls.push(DrawCall::Save);
    }

    fn restore(&mut self) {
        if let Some(alpha) = self.alpha_stack.pop() {
            self.global_alpha = alpha;
        }
        self.calls.push(DrawCall::Restore);
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.calls.push(DrawCall::Translate(x, y));
    }

    fn rotate(&mut self, radians: f32) {
        self.calls.push(DrawCall::Rotate(radians));
    }

    fn scale(&mut self, x: f32, y: f32) {
        self.calls.push(DrawCall::Scale(x, y));
    }

    fn global_alpha(&self) -> f32 {
        self.global_alpha
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.global_alpha = alpha;
        self.calls.push(DrawCall::GlobalAlpha(alpha));
    }

    fn set_fill_style(&mut self, style: &str) {
        self.calls.push(DrawCall::FillStyle(style.to_owned()));
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.calls.push(DrawCall::FillRect { x, y, width, height });
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        self.calls.push(DrawCall::FillText { text: text.to_owned(), x, y });
    }

    #[allow(clippy::cast_precision_loss)]
    fn measure_text(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.char_width
    }

    fn draw_image(&mut self, image: ImageId, x: f32, y: f32, width: f32, height: f32) {
        self.calls.push(DrawCall::DrawImage { image, x, y, width, height });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restore_pops_alpha() {
        let mut context = RecordingContext::new();

        context.save();
        context.set_global_alpha(0.25);
        assert_eq!(context.global_alpha(), 0.25);
        assert_eq!(context.save_depth(), 1);

        context.restore();
        assert_eq!(context.global_alpha(), 1.0);
        assert_eq!(context.save_depth(), 0);
    }

    #[test]
    fn test_shared_handle_coerces_to_trait_object() {
        let recorder = RecordingContext::shared();
        let shared: SharedContext = recorder.clone();

        shared.borrow_mut().translate(1.0, 2.0);

        assert_eq!(recorder.borrow().calls(), &[DrawCall::Translate(1.0, 2.0)]);
    }

    #[test]
    fn test_measure_text_is_per_character() {
        let context = RecordingContext::new();
        assert_eq!(context.measure_text("moon"), 32.0);
    }
}
