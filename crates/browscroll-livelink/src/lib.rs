// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # browscroll-livelink
//!
//! Face tracking input for browscroll: decodes LiveLink Face UDP packets and
//! mixes the brow channels into a signed scroll amount.
//!
//! ```text
//! UDP datagram ─► LiveLinkFrame::decode ─► BrowMixer::mix ─► amount
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod blend_shape;
pub mod error;
pub mod mixer;
pub mod packet;
pub mod receiver;

pub use blend_shape::{FaceBlendShape, BLEND_SHAPE_COUNT};
pub use error::{PacketError, PacketResult};
pub use mixer::{BrowMixer, BrowReading};
pub use packet::{LiveLinkFrame, DEVICE_ID_LEN};
pub use receiver::{LiveLinkReceiver, MAX_PACKET_SIZE};
