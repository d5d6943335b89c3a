// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! LiveLink Face packet codec
//!
//! ```text
//! offset  size  field
//! 0       4     version            i32 little-endian
//! 4       37    device id          UTF-8, NUL padded
//! 41      4     subject name len   i32 big-endian
//! 45      n     subject name       UTF-8
//! 45+n    4     frame number       i32 big-endian
//!         4     sub frame          f32 big-endian
//!         4     fps                i32 big-endian
//!         4     denominator        i32 big-endian
//!         1     value count        u8, always 61
//!         244   values             61 x f32 big-endian
//! ```
//!
//! A packet that stops after the subject name is a heartbeat without frame data.

use crate::blend_shape::{FaceBlendShape, BLEND_SHAPE_COUNT};
use crate::error::{PacketError, PacketResult};

/// Width of the device id field
pub const DEVICE_ID_LEN: usize = 37;

const NAME_LEN_OFFSET: usize = 4 + DEVICE_ID_LEN;
const NAME_OFFSET: usize = NAME_LEN_OFFSET + 4;
/// Frame number, sub frame, fps and denominator
const FRAME_TIME_SIZE: usize = 16;
const VALUES_SIZE: usize = BLEND_SHAPE_COUNT * 4;

/// One decoded LiveLink Face frame
#[derive(Debug, Clone, PartialEq)]
pub struct LiveLinkFrame {
    pub version: i32,
    pub device_id: String,
    pub subject_name: String,
    pub frame_number: i32,
    pub sub_frame: f32,
    pub fps: i32,
    pub denominator: i32,
    pub blend_shapes: [f32; BLEND_SHAPE_COUNT],
}

impl LiveLinkFrame {
    /// Frame with every channel at zero
    pub fn new(device_id: impl Into<String>, subject_name: impl Into<String>) -> Self {
        Self {
            version: 6,
            device_id: device_id.into(),
            subject_name: subject_name.into(),
            frame_number: 0,
            sub_frame: 0.0,
            fps: 60,
            denominator: 1,
            blend_shapes: [0.0; BLEND_SHAPE_COUNT],
        }
    }

    pub fn blend_shape(&self, shape: FaceBlendShape) -> f32 {
        self.blend_shapes[shape.index()]
    }

    pub fn set_blend_shape(&mut self, shape: FaceBlendShape, value: f32) {
        self.blend_shapes[shape.index()] = value;
    }

    /// Decode a datagram
    ///
    /// # Errors
    /// `NoFrameData` for heartbeat packets, other variants for malformed input.
    pub fn decode(bytes: &[u8]) -> PacketResult<Self> {
        let mut reader = Reader::new(bytes);

        let version = i32::from_le_bytes(reader.array()?);
        let device_id = reader.utf8(DEVICE_ID_LEN, "device id")?;
        let device_id = device_id.trim_end_matches('\0').to_string();

        let name_len = i32::from_be_bytes(reader.array()?);
        let name_size = usize::try_from(name_len).map_err(|_| PacketError::InvalidLength {
            field: "subject name",
            length: name_len,
        })?;
        let subject_name = reader.utf8(name_size, "subject name")?.to_string();

        if reader.remaining() <= FRAME_TIME_SIZE {
            return Err(PacketError::NoFrameData);
        }

        let frame_number = i32::from_be_bytes(reader.array()?);
        let sub_frame = f32::from_be_bytes(reader.array()?);
        let fps = i32::from_be_bytes(reader.array()?);
        let denominator = i32::from_be_bytes(reader.array()?);

        let [count] = reader.array::<1>()?;
        if usize::from(count) != BLEND_SHAPE_COUNT {
            return Err(PacketError::BlendShapeCount {
                expected: BLEND_SHAPE_COUNT,
                actual: usize::from(count),
            });
        }

        let mut blend_shapes = [0.0f32; BLEND_SHAPE_COUNT];
        for value in blend_shapes.iter_mut() {
            *value = f32::from_be_bytes(reader.array()?);
        }

        Ok(Self {
            version,
            device_id,
            subject_name,
            frame_number,
            sub_frame,
            fps,
            denominator,
            blend_shapes,
        })
    }

    /// Encode to the wire layout. The device id is cut or NUL padded to 37 bytes.
    pub fn encode(&self) -> Vec<u8> {
        let name = self.subject_name.as_bytes();
        let mut bytes =
            Vec::with_capacity(NAME_OFFSET + name.len() + FRAME_TIME_SIZE + 1 + VALUES_SIZE);

        bytes.extend_from_slice(&self.version.to_le_bytes());

        let mut device_id = [0u8; DEVICE_ID_LEN];
        let id = truncate_utf8(&self.device_id, DEVICE_ID_LEN);
        device_id[..id.len()].copy_from_slice(id.as_bytes());
        bytes.extend_from_slice(&device_id);

        // Subject names longer than i32::MAX are not representable on the wire
        let name_len = i32::try_from(name.len()).unwrap_or(i32::MAX);
        bytes.extend_from_slice(&name_len.to_be_bytes());
        bytes.extend_from_slice(&name[..name_len as usize]);

        bytes.extend_from_slice(&self.frame_number.to_be_bytes());
        bytes.extend_from_slice(&self.sub_frame.to_be_bytes());
        bytes.extend_from_slice(&self.fps.to_be_bytes());
        bytes.extend_from_slice(&self.denominator.to_be_bytes());
        bytes.push(BLEND_SHAPE_COUNT as u8);
        for value in &self.blend_shapes {
            bytes.extend_from_slice(&value.to_be_bytes());
        }

        bytes
    }
}

fn truncate_utf8(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Bounds-checked cursor over a datagram
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn take(&mut self, len: usize) -> PacketResult<&'a [u8]> {
        let end = self.pos.checked_add(len).filter(|&end| end <= self.bytes.len());
        match end {
            Some(end) => {
                let slice = &self.bytes[self.pos..end];
                self.pos = end;
                Ok(slice)
            }
            None => Err(PacketError::Truncated {
                needed: self.pos.saturating_add(len),
                actual: self.bytes.len(),
            }),
        }
    }

    fn array<const N: usize>(&mut self) -> PacketResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn utf8(&mut self, len: usize, field: &'static str) -> PacketResult<&'a str> {
        std::str::from_utf8(self.take(len)?).map_err(|_| PacketError::InvalidUtf8(field))
    }
}
