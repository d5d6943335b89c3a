// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Blocking UDP receiver for LiveLink Face frames
//!
//! The socket read timeout bounds how long `run` takes to notice that the
//! shared running flag was cleared.

use std::io::ErrorKind;
use std::net::{SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{PacketError, PacketResult};
use crate::packet::LiveLinkFrame;

/// Largest datagram read; LiveLink frames are a few hundred bytes
pub const MAX_PACKET_SIZE: usize = 1024;

pub struct LiveLinkReceiver {
    socket: UdpSocket,
    buffer: Vec<u8>,
}

impl LiveLinkReceiver {
    /// Bind `host:port` with the given read timeout
    pub fn bind(host: &str, port: u16, recv_timeout: Duration) -> PacketResult<Self> {
        let socket = UdpSocket::bind((host, port))?;
        // A zero timeout is rejected by the OS; treat it as the shortest wait
        socket.set_read_timeout(Some(recv_timeout.max(Duration::from_millis(1))))?;

        info!(
            "[LIVELINK] Listening for LiveLink Face on {}",
            socket.local_addr()?
        );

        Ok(Self {
            socket,
            buffer: vec![0u8; MAX_PACKET_SIZE],
        })
    }

    pub fn local_addr(&self) -> PacketResult<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Wait for the next datagram and decode it
    ///
    /// Returns `Ok(None)` when the read timed out.
    pub fn recv_frame(&mut self) -> PacketResult<Option<LiveLinkFrame>> {
        match self.socket.recv_from(&mut self.buffer) {
            Ok((len, _addr)) => LiveLinkFrame::decode(&self.buffer[..len]).map(Some),
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => Ok(None),
            Err(e) => Err(PacketError::Io(e)),
        }
    }

    /// Receive until `running` is cleared, calling `on_frame` for each decoded frame
    ///
    /// Undecodable packets are skipped. Returns the number of frames delivered.
    ///
    /// # Errors
    /// Socket errors other than read timeouts.
    pub fn run<F>(&mut self, running: &AtomicBool, mut on_frame: F) -> PacketResult<u64>
    where
        F: FnMut(&LiveLinkFrame),
    {
        let mut delivered = 0u64;
        let mut skipped = 0u64;

        while running.load(Ordering::Acquire) {
            match self.recv_frame() {
                Ok(Some(frame)) => {
                    delivered += 1;
                    on_frame(&frame);
                }
                Ok(None) => {}
                Err(PacketError::Io(e)) => return Err(PacketError::Io(e)),
                Err(e) => {
                    skipped += 1;
                    debug!("[LIVELINK] Skipping packet: {}", e);
                }
            }
        }

        info!(
            "[LIVELINK] Receiver stopped ({} frames, {} skipped)",
            delivered, skipped
        );
        Ok(delivered)
    }
}
