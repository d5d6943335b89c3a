// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Brow mixing: five brow channels in, one signed scroll amount out.
//!
//! Raised brows scroll up (positive), lowered brows scroll down (negative).
//! Raising wins when both cross the threshold.

use crate::blend_shape::FaceBlendShape;
use crate::packet::LiveLinkFrame;

/// Mixed brow values for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrowReading {
    /// Mean of inner-up and both outer-up channels
    pub brow_up: f64,
    /// Mean of both brow-down channels
    pub brow_down: f64,
    /// Signed scroll amount, 0 when neither crosses the threshold
    pub amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrowMixer {
    pub threshold: f64,
    pub speed: f64,
    pub max_scroll: f64,
}

impl Default for BrowMixer {
    fn default() -> Self {
        Self {
            threshold: 0.15,
            speed: 1.0,
            max_scroll: 20.0,
        }
    }
}

impl BrowMixer {
    pub fn new(threshold: f64, speed: f64, max_scroll: f64) -> Self {
        Self {
            threshold,
            speed,
            max_scroll,
        }
    }

    pub fn mix(&self, frame: &LiveLinkFrame) -> BrowReading {
        let channel = |shape| f64::from(frame.blend_shape(shape));

        let brow_up = (channel(FaceBlendShape::BrowInnerUp)
            + channel(FaceBlendShape::BrowOuterUpLeft)
            + channel(FaceBlendShape::BrowOuterUpRight))
            / 3.0;
        let brow_down = (channel(FaceBlendShape::BrowDownLeft)
            + channel(FaceBlendShape::BrowDownRight))
            / 2.0;

        BrowReading {
            brow_up,
            brow_down,
            amount: self.amount(brow_up, brow_down),
        }
    }

    /// Scroll amount for already-averaged brow values
    pub fn amount(&self, brow_up: f64, brow_down: f64) -> f64 {
        if brow_up > self.threshold {
            (self.speed * (brow_up - self.threshold)).min(self.max_scroll)
        } else if brow_down > self.threshold {
            -(self.speed * (brow_down - self.threshold)).min(self.max_scroll)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_with(values: &[(FaceBlendShape, f32)]) -> LiveLinkFrame {
        let mut frame = LiveLinkFrame::new("device", "subject");
        for &(shape, value) in values {
            frame.set_blend_shape(shape, value);
        }
        frame
    }

    #[test]
    fn test_raised_brows_scroll_up() {
        let frame = frame_with(&[
            (FaceBlendShape::BrowInnerUp, 0.5),
            (FaceBlendShape::BrowOuterUpLeft, 0.5),
            (FaceBlendShape::BrowOuterUpRight, 0.5),
        ]);
        let reading = BrowMixer::default().mix(&frame);
        assert!((reading.brow_up - 0.5).abs() < 1e-9);
        assert!((reading.amount - 0.35).abs() < 1e-9);
    }

    #[test]
    fn test_lowered_brows_scroll_down() {
        let frame = frame_with(&[
            (FaceBlendShape::BrowDownLeft, 0.25),
            (FaceBlendShape::BrowDownRight, 0.75),
        ]);
        let reading = BrowMixer::default().mix(&frame);
        assert!((reading.brow_down - 0.5).abs() < 1e-9);
        assert!((reading.amount + 0.35).abs() < 1e-9);
    }

    #[test]
    fn test_relaxed_brows_are_zero() {
        let frame = frame_with(&[
            (FaceBlendShape::BrowInnerUp, 0.3),
            (FaceBlendShape::BrowDownLeft, 0.1),
        ]);
        assert_eq!(BrowMixer::default().mix(&frame).amount, 0.0);
    }

    #[test]
    fn test_up_wins_over_down() {
        assert!(BrowMixer::default().amount(0.4, 0.9) > 0.0);
    }

    #[test]
    fn test_amount_is_capped() {
        let mixer = BrowMixer::new(0.1, 100.0, 2.0);
        assert_eq!(mixer.amount(0.9, 0.0), 2.0);
        assert_eq!(mixer.amount(0.0, 0.9), -2.0);
    }
}
