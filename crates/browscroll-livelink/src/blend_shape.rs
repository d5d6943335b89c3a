// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! LiveLink Face channel indices
//!
//! The 52 ARKit blend shapes in wire order, followed by head and eye rotation.

/// Number of float channels in a LiveLink Face frame
pub const BLEND_SHAPE_COUNT: usize = 61;

/// A LiveLink Face channel. The discriminant is its index in the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FaceBlendShape {
    EyeBlinkLeft = 0,
    EyeLookDownLeft,
    EyeLookInLeft,
    EyeLookOutLeft,
    EyeLookUpLeft,
    EyeSquintLeft,
    EyeWideLeft,
    EyeBlinkRight,
    EyeLookDownRight,
    EyeLookInRight,
    EyeLookOutRight,
    EyeLookUpRight,
    EyeSquintRight,
    EyeWideRight,
    JawForward,
    JawLeft,
    JawRight,
    JawOpen,
    MouthClose,
    MouthFunnel,
    MouthPucker,
    MouthLeft,
    MouthRight,
    MouthSmileLeft,
    MouthSmileRight,
    MouthFrownLeft,
    MouthFrownRight,
    MouthDimpleLeft,
    MouthDimpleRight,
    MouthStretchLeft,
    MouthStretchRight,
    MouthRollLower,
    MouthRollUpper,
    MouthShrugLower,
    MouthShrugUpper,
    MouthPressLeft,
    MouthPressRight,
    MouthLowerDownLeft,
    MouthLowerDownRight,
    MouthUpperUpLeft,
    MouthUpperUpRight,
    BrowDownLeft,
    BrowDownRight,
    BrowInnerUp,
    BrowOuterUpLeft,
    BrowOuterUpRight,
    CheekPuff,
    CheekSquintLeft,
    CheekSquintRight,
    NoseSneerLeft,
    NoseSneerRight,
    TongueOut,
    HeadYaw,
    HeadPitch,
    HeadRoll,
    LeftEyeYaw,
    LeftEyePitch,
    LeftEyeRoll,
    RightEyeYaw,
    RightEyePitch,
    RightEyeRoll,
}

impl FaceBlendShape {
    /// All channels in wire order
    pub const ALL: [FaceBlendShape; BLEND_SHAPE_COUNT] = {
        use FaceBlendShape::*;
        [
            EyeBlinkLeft, EyeLookDownLeft, EyeLookInLeft, EyeLookOutLeft, EyeLookUpLeft,
            EyeSquintLeft, EyeWideLeft, EyeBlinkRight, EyeLookDownRight, EyeLookInRight,
            EyeLookOutRight, EyeLookUpRight, EyeSquintRight, EyeWideRight, JawForward,
            JawLeft, JawRight, JawOpen, MouthClose, MouthFunnel, MouthPucker, MouthLeft,
            MouthRight, MouthSmileLeft, MouthSmileRight, MouthFrownLeft, MouthFrownRight,
            MouthDimpleLeft, MouthDimpleRight, MouthStretchLeft, MouthStretchRight,
            MouthRollLower, MouthRollUpper, MouthShrugLower, MouthShrugUpper,
            MouthPressLeft, MouthPressRight, MouthLowerDownLeft, MouthLowerDownRight,
            MouthUpperUpLeft, MouthUpperUpRight, BrowDownLeft, BrowDownRight, BrowInnerUp,
            BrowOuterUpLeft, BrowOuterUpRight, CheekPuff, CheekSquintLeft, CheekSquintRight,
            NoseSneerLeft, NoseSneerRight, TongueOut, HeadYaw, HeadPitch, HeadRoll,
            LeftEyeYaw, LeftEyePitch, LeftEyeRoll, RightEyeYaw, RightEyePitch, RightEyeRoll,
        ]
    };

    /// Position of this channel in the frame
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl std::fmt::Display for FaceBlendShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_match_wire_order() {
        for (index, shape) in FaceBlendShape::ALL.iter().enumerate() {
            assert_eq!(shape.index(), index, "{shape} is out of order");
        }
    }

    #[test]
    fn test_brow_channels() {
        assert_eq!(FaceBlendShape::BrowDownLeft.index(), 41);
        assert_eq!(FaceBlendShape::BrowDownRight.index(), 42);
        assert_eq!(FaceBlendShape::BrowInnerUp.index(), 43);
        assert_eq!(FaceBlendShape::BrowOuterUpLeft.index(), 44);
        assert_eq!(FaceBlendShape::BrowOuterUpRight.index(), 45);
        assert_eq!(FaceBlendShape::RightEyeRoll.index(), BLEND_SHAPE_COUNT - 1);
    }

    #[test]
    fn test_from_index() {
        assert_eq!(FaceBlendShape::from_index(17), Some(FaceBlendShape::JawOpen));
        assert_eq!(FaceBlendShape::from_index(BLEND_SHAPE_COUNT), None);
    }
}
