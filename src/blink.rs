//! Blink classifier.
//!
//! Turns the per-frame eye openness into single-fire blink events. A closure
//! is confirmed after a run of consecutive closed frames; it fires only when
//! the debounce window since the previous blink has passed and the eyes had
//! been open long enough beforehand, which rejects lid flutter.

use crate::config::BlinkConfig;
use crate::geometry::eye_openness;
use crate::landmarks::{LandmarkFrame, LandmarkLayout};
use log::debug;

/// A confirmed blink
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlinkEvent {
    /// Frame timestamp at which the closure was confirmed
    pub timestamp_ms: u64,
    /// Averaged openness of the confirming frame
    pub openness: f64,
}

/// Stateful blink classifier for one landmark stream
#[derive(Debug, Clone)]
pub struct BlinkClassifier {
    config: BlinkConfig,
    layout: LandmarkLayout,
    consecutive_low: u32,
    confirmed_closed: bool,
    eyes_open_since_ms: Option<u64>,
    last_blink_ms: Option<u64>,
    blink_count: u32,
    last_openness: Option<f64>,
}

impl BlinkClassifier {
    /// Create a classifier with the given thresholds and landmark mapping
    #[must_use]
    pub fn new(config: BlinkConfig, layout: LandmarkLayout) -> Self {
        Self {
            config,
            layout,
            consecutive_low: 0,
            confirmed_closed: false,
            eyes_open_since_ms: None,
            last_blink_ms: None,
            blink_count: 0,
            last_openness: None,
        }
    }

    /// Evaluate one frame
    pub fn evaluate(&mut self, frame: &LandmarkFrame, now_ms: u64) -> Option<BlinkEvent> {
        let left = eye_openness(&frame.eye_sample(&self.layout.left_eye));
        let right = eye_openness(&frame.eye_sample(&self.layout.right_eye));

        self.evaluate_openness((left + right) / 2.0, now_ms)
    }

    /// Evaluate an already averaged openness value.
    ///
    /// The eyes-open marker is consumed by every confirmed closure, including
    /// one suppressed by debounce, so the next blink needs a fresh reopening of
    /// more than `min_eyes_open_ms` rather than counting open time from before
    /// the suppressed closure.
    pub fn evaluate_openness(&mut self, openness: f64, now_ms: u64) -> Option<BlinkEvent> {
        self.last_openness = Some(openness);

        // NaN compares false and so counts as open
        let low = openness < self.config.threshold;
        if !low {
            self.consecutive_low = 0;
            if self.confirmed_closed {
                debug!("Eyes reopened at {now_ms} ms");
                self.confirmed_closed = false;
            }
            if self.eyes_open_since_ms.is_none() {
                self.eyes_open_since_ms = Some(now_ms);
            }
            return None;
        }

        self.consecutive_low = self.consecutive_low.saturating_add(1);
        if self.confirmed_closed || self.consecutive_low < self.config.consecutive_frames {
            return None;
        }

        // Not-confirmed to confirmed edge: the open-since marker is consumed here
        self.confirmed_closed = true;
        let open_since = self.eyes_open_since_ms.take();

        let debounced = self
            .last_blink_ms
            .map_or(true, |last| now_ms.saturating_sub(last) >= self.config.debounce_ms);
        let opened_long_enough =
            open_since.is_some_and(|since| now_ms.saturating_sub(since) > self.config.min_eyes_open_ms);

        if !debounced || !opened_long_enough {
            debug!(
                "Closure at {now_ms} ms suppressed (debounced: {debounced}, opened long enough: {opened_long_enough})"
            );
            return None;
        }

        self.last_blink_ms = Some(now_ms);
        self.blink_count = self.blink_count.saturating_add(1);
        debug!("Blink #{} at {now_ms} ms (openness {openness:.3})", self.blink_count);

        Some(BlinkEvent {
            timestamp_ms: now_ms,
            openness,
        })
    }

    /// Whether a closure is currently confirmed
    #[must_use]
    pub fn is_eye_closed(&self) -> bool {
        self.confirmed_closed
    }

    /// Blinks fired since the last count reset
    #[must_use]
    pub fn blink_count(&self) -> u32 {
        self.blink_count
    }

    /// Openness of the most recent frame
    #[must_use]
    pub fn last_openness(&self) -> Option<f64> {
        self.last_openness
    }

    /// Replace the closed-eye threshold, keeping all other state
    pub fn set_threshold(&mut self, threshold: f64) {
        self.config.threshold = threshold;
    }

    /// Zero the fired count.
    ///
    /// A closure in progress stays confirmed until the eyes reopen, and timing
    /// marks are kept so debounce still applies across the reset.
    pub fn reset_counts(&mut self) {
        self.blink_count = 0;
    }

    /// Return to the freshly constructed state
    pub fn reset(&mut self) {
        self.consecutive_low = 0;
        self.confirmed_closed = false;
        self.eyes_open_since_ms = None;
        self.last_blink_ms = None;
        self.blink_count = 0;
        self.last_openness = None;
    }
}

impl Default for BlinkClassifier {
    fn default() -> Self {
        Self::new(BlinkConfig::default(), LandmarkLayout::default())
    }
}
