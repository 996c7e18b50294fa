//! Pointer-gesture math for moving and resizing slide elements.
//!
//! Everything here is template-agnostic: inputs are pointer positions in screen
//! pixels, outputs are absolute slide-logical coordinates. Region offsets of the
//! layout regimes are applied by [`crate::layout`] at the render boundary only.

use serde::{Deserialize, Serialize};

use crate::models::common::{BoundingBox, Point, SLIDE_HEIGHT, SLIDE_WIDTH};

/// Smallest width/height a resize may produce.
pub const MIN_ELEMENT_SIZE: f64 = 20.0;

/// Which handle of the selection frame is being dragged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeHandle {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Top,
    Bottom,
    Left,
    Right,
}

/// Converts a screen-pixel delta into slide units.
///
/// `scale` is rendered canvas width divided by [`SLIDE_WIDTH`]; non-positive scales are treated as 1.
pub fn screen_delta_to_slide(start: Point, now: Point, scale: f64) -> Point {
    let scale = if scale > 0.0 { scale } else { 1.0 };
    Point::new((now.x - start.x) / scale, (now.y - start.y) / scale)
}

/// Applies a drag delta to an element origin.
pub fn apply_drag_delta(origin: Point, delta: Point) -> Point {
    Point::new(origin.x + delta.x, origin.y + delta.y)
}

/// Applies a resize delta through the given handle, keeping the opposite edges fixed.
pub fn resize_bounds(orig: BoundingBox, handle: ResizeHandle, delta: Point) -> BoundingBox {
    let mut new_x = orig.x;
    let mut new_y = orig.y;
    let mut new_w = orig.width;
    let mut new_h = orig.height;

    match handle {
        ResizeHandle::BottomRight => {
            new_w = orig.width + delta.x;
            new_h = orig.height + delta.y;
        }
        ResizeHandle::BottomLeft => {
            new_x = orig.x + delta.x;
            new_w = orig.width - delta.x;
            new_h = orig.height + delta.y;
        }
        ResizeHandle::TopRight => {
            new_y = orig.y + delta.y;
            new_w = orig.width + delta.x;
            new_h = orig.height - delta.y;
        }
        ResizeHandle::TopLeft => {
            new_x = orig.x + delta.x;
            new_y = orig.y + delta.y;
            new_w = orig.width - delta.x;
            new_h = orig.height - delta.y;
        }
        ResizeHandle::Top => {
            new_y = orig.y + delta.y;
            new_h = orig.height - delta.y;
        }
        ResizeHandle::Bottom => {
            new_h = orig.height + delta.y;
        }
        ResizeHandle::Left => {
            new_x = orig.x + delta.x;
            new_w = orig.width - delta.x;
        }
        ResizeHandle::Right => {
            new_w = orig.width + delta.x;
        }
    }

    // Pin the moving edge so the opposite edge never drifts when hitting the minimum.
    if new_w < MIN_ELEMENT_SIZE {
        if new_x != orig.x {
            new_x = orig.right() - MIN_ELEMENT_SIZE;
        }
        new_w = MIN_ELEMENT_SIZE;
    }
    if new_h < MIN_ELEMENT_SIZE {
        if new_y != orig.y {
            new_y = orig.bottom() - MIN_ELEMENT_SIZE;
        }
        new_h = MIN_ELEMENT_SIZE;
    }

    BoundingBox::new(new_x, new_y, new_w, new_h)
}

/// Keeps an element of the given size fully inside the slide. View-layer helper.
pub fn clamp_to_slide(position: Point, width: f64, height: f64) -> Point {
    let max_x = (SLIDE_WIDTH - width).max(0.0);
    let max_y = (SLIDE_HEIGHT - height).max(0.0);
    Point::new(position.x.clamp(0.0, max_x), position.y.clamp(0.0, max_y))
}

/// An in-progress move or resize gesture.
#[derive(Clone, Debug, PartialEq)]
pub enum DragGesture {
    Move {
        pointer_start: Point,
        orig: BoundingBox,
        scale: f64,
    },
    Resize {
        handle: ResizeHandle,
        pointer_start: Point,
        orig: BoundingBox,
        scale: f64,
    },
}

impl DragGesture {
    pub fn start_move(pointer: Point, orig: BoundingBox, scale: f64) -> Self {
        DragGesture::Move {
            pointer_start: pointer,
            orig,
            scale,
        }
    }

    pub fn start_resize(handle: ResizeHandle, pointer: Point, orig: BoundingBox, scale: f64) -> Self {
        DragGesture::Resize {
            handle,
            pointer_start: pointer,
            orig,
            scale,
        }
    }

    /// The element bounds for the current pointer position.
    pub fn update(&self, pointer: Point) -> BoundingBox {
        match self {
            DragGesture::Move {
                pointer_start,
                orig,
                scale,
            } => {
                let delta = screen_delta_to_slide(*pointer_start, pointer, *scale);
                let origin = apply_drag_delta(orig.origin(), delta);
                BoundingBox::new(origin.x, origin.y, orig.width, orig.height)
            }
            DragGesture::Resize {
                handle,
                pointer_start,
                orig,
                scale,
            } => {
                let delta = screen_delta_to_slide(*pointer_start, pointer, *scale);
                resize_bounds(*orig, *handle, delta)
            }
        }
    }
}

/// Opaque token for one installed global listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerToken(pub u64);

/// Installs and removes the document-level pointer listeners a gesture needs.
pub trait PointerListeners {
    fn install(&mut self) -> Vec<ListenerToken>;
    fn remove(&mut self, token: ListenerToken);
}

/// Holds a gesture's global listeners; removes them when dropped.
///
/// Dropping covers every way a gesture can end: pointer-up, pointer leaving the
/// document, or the owning component going away mid-drag.
pub struct PointerCapture<'a, L: PointerListeners> {
    listeners: &'a mut L,
    tokens: Vec<ListenerToken>,
    gesture: DragGesture,
}

impl<'a, L: PointerListeners> PointerCapture<'a, L> {
    pub fn begin(listeners: &'a mut L, gesture: DragGesture) -> Self {
        let tokens = listeners.install();
        log::debug!("Pointer capture started with {} listener(s)", tokens.len());
        PointerCapture {
            listeners,
            tokens,
            gesture,
        }
    }

    pub fn gesture(&self) -> &DragGesture {
        &self.gesture
    }

    pub fn update(&self, pointer: Point) -> BoundingBox {
        self.gesture.update(pointer)
    }

    /// Ends the gesture and returns the final bounds.
    pub fn finish(self, pointer: Point) -> BoundingBox {
        self.gesture.update(pointer)
    }
}

impl<L: PointerListeners> Drop for PointerCapture<'_, L> {
    fn drop(&mut self) {
        for token in self.tokens.drain(..) {
            self.listeners.remove(token);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[derive(Default)]
    struct CountingListeners {
        next: u64,
        live: HashSet<ListenerToken>,
    }

    impl PointerListeners for CountingListeners {
        fn install(&mut self) -> Vec<ListenerToken> {
            let tokens: Vec<ListenerToken> = (0..2)
                .map(|_| {
                    self.next += 1;
                    ListenerToken(self.next)
                })
                .collect();
            self.live.extend(tokens.iter().copied());
            tokens
        }

        fn remove(&mut self, token: ListenerToken) {
            self.live.remove(&token);
        }
    }

    #[test]
    fn move_gesture_corrects_for_canvas_scale() {
        let gesture = DragGesture::start_move(
            Point::new(100.0, 100.0),
            BoundingBox::new(10.0, 20.0, 50.0, 50.0),
            0.5,
        );
        let moved = gesture.update(Point::new(110.0, 90.0));
        assert_eq!(moved, BoundingBox::new(30.0, 0.0, 50.0, 50.0));
    }

    #[test]
    fn top_left_resize_keeps_bottom_right_fixed() {
        let orig = BoundingBox::new(100.0, 100.0, 200.0, 100.0);
        let resized = resize_bounds(orig, ResizeHandle::TopLeft, Point::new(20.0, 10.0));
        assert_eq!(resized, BoundingBox::new(120.0, 110.0, 180.0, 90.0));
        assert_eq!(resized.right(), orig.right());
        assert_eq!(resized.bottom(), orig.bottom());
    }

    #[test]
    fn resize_respects_minimum_size() {
        let orig = BoundingBox::new(100.0, 100.0, 50.0, 50.0);
        let resized = resize_bounds(orig, ResizeHandle::Left, Point::new(200.0, 0.0));
        assert_eq!(resized.width, MIN_ELEMENT_SIZE);
        assert_eq!(resized.right(), orig.right());
        let resized = resize_bounds(orig, ResizeHandle::Bottom, Point::new(0.0, -100.0));
        assert_eq!(resized.height, MIN_ELEMENT_SIZE);
        assert_eq!(resized.y, orig.y);
    }

    #[test]
    fn clamp_keeps_element_on_slide() {
        assert_eq!(
            clamp_to_slide(Point::new(-10.0, 600.0), 100.0, 40.0),
            Point::new(0.0, 500.0)
        );
        assert_eq!(
            clamp_to_slide(Point::new(50.0, 50.0), 2000.0, 40.0),
            Point::new(0.0, 50.0)
        );
    }

    #[test]
    fn listeners_are_removed_on_every_gesture_end() {
        let mut listeners = CountingListeners::default();
        let orig = BoundingBox::new(0.0, 0.0, 100.0, 100.0);

        for _ in 0..3 {
            let capture = PointerCapture::begin(
                &mut listeners,
                DragGesture::start_move(Point::default(), orig, 1.0),
            );
            let end = capture.finish(Point::new(5.0, 5.0));
            assert_eq!(end.x, 5.0);
        }
        assert!(listeners.live.is_empty());

        {
            let capture = PointerCapture::begin(
                &mut listeners,
                DragGesture::start_resize(ResizeHandle::Right, Point::default(), orig, 1.0),
            );
            assert_eq!(capture.update(Point::new(10.0, 0.0)).width, 110.0);
            // Abandoned without finish, e.g. pointer left the document.
        }
        assert!(listeners.live.is_empty());
        assert_eq!(listeners.next, 8);
    }
}
