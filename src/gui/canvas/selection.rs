use std::time::{Duration, Instant};

use eframe::egui::{Pos2, Rect};

/// Time the pointer has to rest before a drag counts as settled.
pub const SETTLE_DELAY: Duration = Duration::from_millis(300);

/// The rubber-band selection gesture.
///
/// Idle until the primary button goes down, then Dragging until it is
/// released. While dragging, every pointer move rearms a single-shot
/// debounce; when it expires with no further movement the gesture has
/// "settled" and the current rectangle is handed to recognition. The
/// gesture stays in Dragging after a settle, so one drag can trigger
/// several recognitions.
#[derive(Debug, Default)]
pub struct RubberBand {
    anchor: Option<Pos2>,
    current: Option<Pos2>,
    last_move: Option<Instant>,
    settled: bool,
}

impl RubberBand {
    /// Primary button pressed: record the anchor and show an empty band.
    pub fn begin(&mut self, pos: Pos2) {
        self.anchor = Some(pos);
        self.current = Some(pos);
        self.last_move = None;
        self.settled = false;
    }

    /// Pointer moved with the primary button held: update the band and
    /// rearm the debounce.
    pub fn update(&mut self, pos: Pos2, now: Instant) {
        if self.anchor.is_none() {
            // move events before a press happen when a drag started outside
            // the canvas; treat the first one as the press
            self.begin(pos);
        }
        self.current = Some(pos);
        self.last_move = Some(now);
        self.settled = false;
    }

    /// Primary button released: finalize and hide the band. Returns the
    /// final normalized rectangle. Falls back to the last seen pointer
    /// position when the release event carries none.
    pub fn finish(&mut self, pos: Option<Pos2>) -> Option<Rect> {
        let rect = match (self.anchor, pos.or(self.current)) {
            (Some(anchor), Some(current)) => Some(Rect::from_two_pos(anchor, current)),
            _ => None,
        };
        *self = Self::default();
        rect
    }

    pub fn is_dragging(&self) -> bool {
        self.anchor.is_some()
    }

    /// The current band, normalized to non-negative extent regardless of
    /// drag direction.
    pub fn rect(&self) -> Option<Rect> {
        match (self.anchor, self.current) {
            (Some(a), Some(c)) => Some(Rect::from_two_pos(a, c)),
            _ => None,
        }
    }

    /// Returns the band once per settle: the debounce has expired and no
    /// move has rearmed it since.
    pub fn poll_settled(&mut self, now: Instant) -> Option<Rect> {
        if self.settled {
            return None;
        }
        let last_move = self.last_move?;
        if now.duration_since(last_move) < SETTLE_DELAY {
            return None;
        }
        self.settled = true;
        self.rect()
    }

    /// Time left on the debounce, for scheduling a repaint. `None` when the
    /// timer is not armed.
    pub fn time_until_settle(&self, now: Instant) -> Option<Duration> {
        if self.settled {
            return None;
        }
        let last_move = self.last_move?;
        Some(SETTLE_DELAY.saturating_sub(now.duration_since(last_move)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::pos2;

    #[test]
    fn band_is_normalized_in_every_drag_direction() {
        let t0 = Instant::now();

        let mut down_right = RubberBand::default();
        down_right.begin(pos2(10.0, 20.0));
        down_right.update(pos2(50.0, 80.0), t0);

        let mut up_left = RubberBand::default();
        up_left.begin(pos2(50.0, 80.0));
        up_left.update(pos2(10.0, 20.0), t0);

        let expected = Rect::from_min_max(pos2(10.0, 20.0), pos2(50.0, 80.0));
        assert_eq!(down_right.rect().unwrap(), expected);
        assert_eq!(up_left.rect().unwrap(), expected);
        assert!(expected.width() >= 0.0 && expected.height() >= 0.0);
    }

    #[test]
    fn finish_normalizes_and_clears_the_band() {
        let mut band = RubberBand::default();
        band.begin(pos2(30.0, 30.0));
        let rect = band.finish(Some(pos2(10.0, 10.0))).unwrap();
        assert_eq!(rect, Rect::from_min_max(pos2(10.0, 10.0), pos2(30.0, 30.0)));
        assert!(!band.is_dragging());
        assert!(band.rect().is_none());
    }

    #[test]
    fn settle_fires_only_after_the_delay() {
        let t0 = Instant::now();
        let mut band = RubberBand::default();
        band.begin(pos2(0.0, 0.0));
        band.update(pos2(10.0, 10.0), t0);

        assert!(band.poll_settled(t0 + Duration::from_millis(100)).is_none());
        assert!(band.poll_settled(t0 + SETTLE_DELAY).is_some());
    }

    #[test]
    fn settle_fires_at_most_once_per_rest() {
        let t0 = Instant::now();
        let mut band = RubberBand::default();
        band.begin(pos2(0.0, 0.0));
        band.update(pos2(10.0, 10.0), t0);

        assert!(band.poll_settled(t0 + SETTLE_DELAY).is_some());
        assert!(band
            .poll_settled(t0 + SETTLE_DELAY + Duration::from_secs(1))
            .is_none());
    }

    #[test]
    fn every_move_rearms_the_debounce() {
        let t0 = Instant::now();
        let mut band = RubberBand::default();
        band.begin(pos2(0.0, 0.0));

        // rapid moves inside the settle window keep pushing the deadline out
        for i in 0..5 {
            band.update(
                pos2(i as f32, i as f32),
                t0 + i * Duration::from_millis(100),
            );
            assert!(band
                .poll_settled(t0 + (i + 1) * Duration::from_millis(100))
                .is_none());
        }

        // ...and it still fires exactly once after the final move rests
        let last_move = t0 + 4 * Duration::from_millis(100);
        assert!(band.poll_settled(last_move + SETTLE_DELAY).is_some());
        assert!(band
            .poll_settled(last_move + 2 * SETTLE_DELAY)
            .is_none());
    }

    #[test]
    fn press_without_movement_never_settles() {
        let t0 = Instant::now();
        let mut band = RubberBand::default();
        band.begin(pos2(5.0, 5.0));
        assert!(band.poll_settled(t0 + Duration::from_secs(10)).is_none());
        assert!(band.time_until_settle(t0).is_none());
    }

    #[test]
    fn gesture_stays_dragging_after_a_settle() {
        let t0 = Instant::now();
        let mut band = RubberBand::default();
        band.begin(pos2(0.0, 0.0));
        band.update(pos2(10.0, 10.0), t0);
        band.poll_settled(t0 + SETTLE_DELAY).unwrap();

        assert!(band.is_dragging());
        // a later move rearms the timer for another settle
        band.update(pos2(20.0, 20.0), t0 + SETTLE_DELAY);
        assert!(band.poll_settled(t0 + 2 * SETTLE_DELAY).is_some());
    }

    #[test]
    fn fast_short_drag_can_yield_a_zero_area_band() {
        // acknowledged edge case: a press with an immediate release at the
        // anchor produces a degenerate rectangle, which is passed through
        let mut band = RubberBand::default();
        band.begin(pos2(7.0, 7.0));
        let rect = band.finish(Some(pos2(7.0, 7.0))).unwrap();
        assert_eq!(rect.area(), 0.0);
    }
}
