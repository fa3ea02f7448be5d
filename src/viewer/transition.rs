//! The zoom transition layer.
//!
//! A `Fixed` hosts a dim backdrop and a single floating `Picture` (the
//! presented visual). Presenting animates the visual from the grid cell's
//! frame out to its fitted full-screen frame; dismissing runs the reverse
//! path back to the focused item's cell. Frames are driven by a tick
//! callback off the widget's frame clock.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gdk4::Texture;
use gtk4::prelude::*;
use gtk4::{glib, Box as GtkBox, ContentFit, Fixed, Orientation, Picture};
use tracing::{debug, trace};

use super::geometry::{lerp, lerp_rect, Rectf};

pub const PRESENT_DURATION_MS: f64 = 250.0;
pub const DISMISS_DURATION_MS: f64 = 300.0;

pub fn ease_out_cubic(t: f64) -> f64 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}

pub struct TransitionLayer {
    root: Fixed,
    dim: GtkBox,
    // The floating picture alive from present until dismiss completes.
    presented_visual: Rc<RefCell<Option<Picture>>>,
}

impl TransitionLayer {
    pub fn new() -> Rc<Self> {
        let root = Fixed::new();
        root.set_visible(false);
        root.set_hexpand(true);
        root.set_vexpand(true);

        let dim = GtkBox::new(Orientation::Vertical, 0);
        dim.add_css_class("viewer-dim");
        dim.set_opacity(0.0);
        root.put(&dim, 0.0, 0.0);

        Rc::new(Self {
            root,
            dim,
            presented_visual: Rc::new(RefCell::new(None)),
        })
    }

    pub fn widget(&self) -> Fixed {
        self.root.clone()
    }

    /// The layer's current allocation in its own coordinates.
    pub fn bounds(&self) -> Rectf {
        Rectf::new(0.0, 0.0, self.root.width() as f64, self.root.height() as f64)
    }

    pub fn has_presented_visual(&self) -> bool {
        self.presented_visual.borrow().is_some()
    }

    /// Swaps the presented visual's texture, e.g. when the focus has moved
    /// to a different item since presenting.
    pub fn rebind_visual(&self, texture: &Texture) {
        if let Some(picture) = self.presented_visual.borrow().as_ref() {
            picture.set_paintable(Some(texture));
        }
    }

    /// Animates `texture` from the cell frame out to the full-screen frame,
    /// fading the backdrop in. The visual is retained for the dismiss path.
    pub fn run_present<F>(&self, texture: &Texture, from: Rectf, to: Rectf, on_done: F)
    where
        F: FnOnce() + 'static,
    {
        let bounds = self.bounds();
        self.dim.set_size_request(bounds.width as i32, bounds.height as i32);
        self.root.move_(&self.dim, 0.0, 0.0);

        let picture = Picture::new();
        picture.set_content_fit(ContentFit::Fill);
        picture.set_paintable(Some(texture));
        self.root.put(&picture, from.x, from.y);
        picture.set_size_request(from.width.max(1.0) as i32, from.height.max(1.0) as i32);
        *self.presented_visual.borrow_mut() = Some(picture.clone());

        self.root.set_visible(true);
        trace!(?from, ?to, "present transition started");
        self.animate(picture, from, to, 0.0, 1.0, PRESENT_DURATION_MS, on_done);
    }

    /// Animates the retained visual back down to the cell frame, fading the
    /// backdrop out. Returns false when no visual is available.
    pub fn run_dismiss<F>(&self, from: Rectf, to: Rectf, on_done: F) -> bool
    where
        F: FnOnce() + 'static,
    {
        let Some(picture) = self.presented_visual.borrow().clone() else {
            debug!("dismiss transition skipped: no presented visual");
            return false;
        };

        self.root.move_(&picture, from.x, from.y);
        picture.set_size_request(from.width.max(1.0) as i32, from.height.max(1.0) as i32);

        let root = self.root.clone();
        let visual = self.presented_visual.clone();
        trace!(?from, ?to, "dismiss transition started");
        self.animate(
            picture,
            from,
            to,
            1.0,
            0.0,
            DISMISS_DURATION_MS,
            move || {
                if let Some(picture) = visual.borrow_mut().take() {
                    root.remove(&picture);
                }
                root.set_visible(false);
                on_done();
            },
        );
        true
    }

    fn animate<F>(
        &self,
        picture: Picture,
        from: Rectf,
        to: Rectf,
        dim_from: f64,
        dim_to: f64,
        duration_ms: f64,
        on_done: F,
    ) where
        F: FnOnce() + 'static,
    {
        let fixed = self.root.clone();
        let dim = self.dim.clone();
        let start: Cell<Option<i64>> = Cell::new(None);
        let completion: RefCell<Option<Box<dyn FnOnce()>>> =
            RefCell::new(Some(Box::new(on_done)));

        dim.set_opacity(dim_from);
        self.root.add_tick_callback(move |_, clock| {
            let now = clock.frame_time();
            let started = match start.get() {
                Some(at) => at,
                None => {
                    start.set(Some(now));
                    now
                }
            };
            let elapsed_ms = (now - started) as f64 / 1000.0;
            let t = ease_out_cubic((elapsed_ms / duration_ms).min(1.0));

            let frame = lerp_rect(from, to, t);
            fixed.move_(&picture, frame.x, frame.y);
            picture.set_size_request(frame.width.max(1.0) as i32, frame.height.max(1.0) as i32);
            dim.set_opacity(lerp(dim_from, dim_to, t));

            if elapsed_ms >= duration_ms {
                if let Some(done) = completion.borrow_mut().take() {
                    done();
                }
                glib::ControlFlow::Break
            } else {
                glib::ControlFlow::Continue
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easing_hits_both_endpoints() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
    }

    #[test]
    fn easing_is_monotonic_and_front_loaded() {
        let quarter = ease_out_cubic(0.25);
        let half = ease_out_cubic(0.5);
        assert!(quarter < half);
        // Decelerating curve: more than half the distance by midpoint.
        assert!(half > 0.5);
    }

    #[test]
    fn easing_clamps_out_of_range_input() {
        assert_eq!(ease_out_cubic(-1.0), 0.0);
        assert_eq!(ease_out_cubic(2.0), 1.0);
    }
}
