//! Render transform pipeline
//!
//! Stage order is fixed: save, translate to the view position, rotate,
//! scale, translate by the anchor offset, set alpha, draw, restore, then
//! render children. Each stage is skipped when its fragment is absent or
//! when it would be an identity transform. Every call is computed from the
//! current absolute property values, so rendering twice with unchanged state
//! issues identical calls.
//!
//! The anchor offset uses the unscaled width and height. It is applied after
//! `scale`, so it is expressed in the scaled coordinate space and tracks the
//! scaled size without consulting `scaled_width`.

use super::{Capabilities, GameObject};
use crate::render::Context;

impl GameObject {
    /// Render through the object's own drawing backend.
    ///
    /// Without the render capability, or without a backend, this does
    /// nothing.
    pub fn render(&self) {
        if !self.has(Capabilities::RENDER) {
            return;
        }
        let Some(context) = self.context.as_ref() else {
            log::trace!("{} has no drawing context, skipping render", self.id);
            return;
        };
        let Ok(mut context) = context.try_borrow_mut() else {
            log::warn!("Drawing context for {} is already in use, skipping render", self.id);
            return;
        };
        self.render_to(&mut *context);
    }

    /// Run the render pipeline against an explicit backend.
    ///
    /// Children are rendered against the same backend.
    pub fn render_to(&self, context: &mut dyn Context) {
        if !self.has(Capabilities::RENDER) {
            return;
        }

        context.save();

        let (view_x, view_y) = match (self.view_x(), self.view_y()) {
            (Some(view_x), Some(view_y)) => (view_x, view_y),
            _ => (self.x(), self.y()),
        };
        if view_x != 0.0 || view_y != 0.0 {
            context.translate(view_x, view_y);
        }

        if let Some(rotation) = self.rotation {
            if rotation != 0.0 {
                context.rotate(rotation);
            }
        }

        if let Some(scale) = self.scale {
            if scale.x != 1.0 || scale.y != 1.0 {
                context.scale(scale.x, scale.y);
            }
        }

        if let Some(anchor) = self.anchor {
            let offset_x = -self.width * anchor.x;
            let offset_y = -self.height * anchor.y;
            if offset_x != 0.0 || offset_y != 0.0 {
                context.translate(offset_x, offset_y);
            }
        }

        if let Some(final_opacity) = self.final_opacity() {
            context.set_global_alpha(final_opacity);
        }

        match &self.draw_fn {
            Some(draw) => draw(self, &mut *context),
            None => self.draw(context),
        }

        context.restore();

        for child in self.children() {
            child.render_to(context);
        }
    }

    /// Default draw: fill the object's rectangle when a `color` property is
    /// set, otherwise nothing.
    pub fn draw(&self, context: &mut dyn Context) {
        if let Some(color) = self.prop("color").and_then(|value| value.as_text()) {
            context.set_fill_style(color);
            context.fill_rect(0.0, 0.0, self.width, self.height);
        }
    }
}
