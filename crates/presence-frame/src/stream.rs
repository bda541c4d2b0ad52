use std::io::{Read, Write};

use bytes::BytesMut;
use serde::Serialize;

use crate::codec::{Frame, FrameConfig};
use crate::error::Result;
use crate::opcode::Opcode;
use crate::reader::read_frame;
use crate::writer::write_frame;

const INITIAL_BUFFER_CAPACITY: usize = 4 * 1024;

/// Sends and receives complete frames over one bidirectional stream.
pub struct FramedStream<T> {
    inner: T,
    buf: BytesMut,
    config: FrameConfig,
}

impl<T: Read + Write> FramedStream<T> {
    /// Wrap a stream with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Wrap a stream with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Encode and send one frame.
    pub fn send<V: Serialize + ?Sized>(&mut self, opcode: Opcode, value: &V) -> Result<()> {
        write_frame(&mut self.inner, &mut self.buf, opcode, value, &self.config)
    }

    /// Receive the next complete frame (blocking).
    pub fn recv(&mut self) -> Result<Frame> {
        read_frame(&mut self.inner, &self.config)
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the wrapper and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current frame configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}
