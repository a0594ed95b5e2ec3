use eframe::egui::Vec2;

pub const MIN_SCALE: f32 = 0.5;
pub const MAX_SCALE: f32 = 15.0;
const STEP_IN: f32 = 1.1;
const STEP_OUT: f32 = 0.9;

/// Current canvas zoom scale, kept strictly inside (0.5, 15).
#[derive(Debug, Clone, Copy)]
pub struct Zoom {
    scale: f32,
}

impl Default for Zoom {
    fn default() -> Self {
        Self { scale: 1.0 }
    }
}

impl Zoom {
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn reset(&mut self) {
        self.scale = 1.0;
    }

    /// One wheel-forward step. Returns the applied factor, or `None` when
    /// the step would push the scale out of bounds.
    pub fn zoom_in(&mut self) -> Option<f32> {
        self.step(STEP_IN)
    }

    /// One wheel-backward step. Returns the applied factor, or `None` when
    /// the step would push the scale out of bounds.
    pub fn zoom_out(&mut self) -> Option<f32> {
        self.step(STEP_OUT)
    }

    fn step(&mut self, factor: f32) -> Option<f32> {
        let next = self.scale * factor;
        if next <= MIN_SCALE || next >= MAX_SCALE {
            return None;
        }
        self.scale = next;
        Some(factor)
    }
}

/// Scroll offset that keeps the content point under the pointer fixed while
/// the content scales by `factor`.
///
/// `pointer` is the pointer position relative to the viewport origin.
pub fn anchored_scroll_offset(offset: Vec2, pointer: Vec2, factor: f32) -> Vec2 {
    (offset + pointer) * factor - pointer
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::vec2;

    #[test]
    fn scale_starts_at_one() {
        assert_eq!(Zoom::default().scale(), 1.0);
    }

    #[test]
    fn scale_never_leaves_bounds() {
        let mut zoom = Zoom::default();
        for _ in 0..1000 {
            zoom.zoom_in();
            assert!(zoom.scale() > MIN_SCALE && zoom.scale() < MAX_SCALE);
        }
        for _ in 0..2000 {
            zoom.zoom_out();
            assert!(zoom.scale() > MIN_SCALE && zoom.scale() < MAX_SCALE);
        }
    }

    #[test]
    fn rejected_steps_leave_the_scale_unchanged() {
        let mut zoom = Zoom::default();
        while zoom.zoom_in().is_some() {}
        let ceiling = zoom.scale();
        assert!(zoom.zoom_in().is_none());
        assert_eq!(zoom.scale(), ceiling);
    }

    #[test]
    fn mixed_wheel_sequences_stay_in_bounds() {
        let mut zoom = Zoom::default();
        for i in 0..500 {
            if i % 3 == 0 {
                zoom.zoom_out();
            } else {
                zoom.zoom_in();
            }
            assert!(zoom.scale() > MIN_SCALE && zoom.scale() < MAX_SCALE);
        }
    }

    #[test]
    fn anchor_keeps_pointer_fixed_at_factor_one() {
        let offset = vec2(100.0, 40.0);
        assert_eq!(
            anchored_scroll_offset(offset, vec2(320.0, 200.0), 1.0),
            offset
        );
    }

    #[test]
    fn anchor_tracks_the_scaled_content_point() {
        // content point under the pointer: offset + pointer = (200, 100)
        let new = anchored_scroll_offset(vec2(150.0, 60.0), vec2(50.0, 40.0), 2.0);
        // after scaling, that point sits at (400, 200); the new offset must
        // place it back under the pointer
        assert_eq!(new + vec2(50.0, 40.0), vec2(400.0, 200.0));
    }
}
