//! Framing primitives for the server list ping exchange.
//!
//! Every value that crosses the socket is either a `VarInt`, a `VarInt` length prefixed UTF-8 string,
//! or raw bytes. A packet is a `VarInt` length followed by a `VarInt` packet id and the payload.

use bytes::{Buf, BufMut, BytesMut};
use thiserror::Error;

/// The maximum number of bytes a `VarInt` may occupy on the wire
pub const VAR_INT_MAX_SIZE: usize = 5;

/// Largest frame body a server is allowed to send us
pub const MAX_PACKET_SIZE: u32 = 2097152;

#[derive(Copy, Clone, PartialEq, Eq, Debug, Error)]
pub enum CodecError {
    /// Not an error on a live stream, the caller should wait for more bytes
    #[error("incomplete data, more bytes are required")]
    Incomplete,
    #[error("VarInt is too large")]
    VarIntTooLarge,
    #[error("packet length of {0} is out of bounds")]
    PacketTooLarge(u32),
    #[error("packet body ended before its contents could be read")]
    Truncated,
    #[error("string is not valid UTF-8")]
    InvalidUtf8,
}

impl CodecError {
    /// Once a full frame has been received running out of bytes means the frame lied about its contents
    #[inline]
    pub fn within_frame(self) -> Self {
        match self {
            Self::Incomplete => Self::Truncated,
            err => err,
        }
    }
}

/// Returns the exact number of bytes `value` occupies once encoded
pub const fn var_int_len(value: u32) -> usize {
    match value {
        0 => 1,
        n => (32 - n.leading_zeros() as usize).div_ceil(7),
    }
}

pub fn put_var_int<B: BufMut>(buf: &mut B, mut value: u32) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            buf.put_u8(byte);
            return;
        }
        buf.put_u8(byte | 0x80);
    }
}

pub fn encode_var_int(value: u32) -> BytesMut {
    let mut buf = BytesMut::with_capacity(var_int_len(value));
    put_var_int(&mut buf, value);
    buf
}

/// Decodes the `VarInt` starting at `offset`, returning `(value, bytes_consumed)`
///
/// [`CodecError::Incomplete`] is returned when `buf` ends before the terminating byte,
/// [`CodecError::VarIntTooLarge`] when [`VAR_INT_MAX_SIZE`] bytes all carry the continuation bit or the
/// value does not fit in 32 bits.
pub fn decode_var_int(buf: &[u8], offset: usize) -> Result<(u32, usize), CodecError> {
    let rest = buf.get(offset..).unwrap_or_default();
    let mut value = 0;

    for (i, &byte) in rest.iter().take(VAR_INT_MAX_SIZE).enumerate() {
        // the last byte only has room for the 4 high bits of a u32
        if i == VAR_INT_MAX_SIZE - 1 && byte & 0x70 != 0 {
            return Err(CodecError::VarIntTooLarge);
        }
        value |= ((byte & 0x7F) as u32) << (i * 7);
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }

    if rest.len() < VAR_INT_MAX_SIZE {
        Err(CodecError::Incomplete)
    } else {
        Err(CodecError::VarIntTooLarge)
    }
}

pub fn encode_string(s: &str) -> BytesMut {
    let mut buf = BytesMut::with_capacity(var_int_len(s.len() as u32) + s.len());
    put_var_int(&mut buf, s.len() as u32);
    buf.put_slice(s.as_bytes());
    buf
}

/// Decodes the length prefixed string starting at `offset`, returning `(string, bytes_consumed)`
pub fn decode_string(buf: &[u8], offset: usize) -> Result<(String, usize), CodecError> {
    let (len, len_size) = decode_var_int(buf, offset)?;
    let start = offset + len_size;
    let bytes = start
        .checked_add(len as usize)
        .and_then(|end| buf.get(start..end))
        .ok_or(CodecError::Incomplete)?;

    let s = std::str::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8)?;
    Ok((s.to_owned(), len_size + bytes.len()))
}

/// Frames `payload` behind `packet_id`, the result is ready to be written to the socket
pub fn build_packet(packet_id: u32, payload: &[&[u8]]) -> BytesMut {
    let body_len = var_int_len(packet_id) + payload.iter().map(|chunk| chunk.len()).sum::<usize>();
    debug_assert!(body_len <= MAX_PACKET_SIZE as usize);

    let mut packet = BytesMut::with_capacity(var_int_len(body_len as u32) + body_len);
    put_var_int(&mut packet, body_len as u32);
    put_var_int(&mut packet, packet_id);
    payload.iter().for_each(|chunk| packet.put_slice(chunk));
    packet
}

#[derive(Debug)]
pub struct PacketFrame {
    pub id: u32,
    /// Payload following the packet id
    pub body: BytesMut,
}

/// Accumulates bytes read off of a stream and splits off complete frames as they become available
#[derive(Default, Debug)]
pub struct PacketDecoder {
    buf: BytesMut,
}

impl PacketDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn queue_slice(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Number of bytes received that have not yet been split off as a frame
    #[inline]
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Returns `Ok(None)` until a complete frame is buffered. Bytes belonging to following frames are
    /// left in place for the next call.
    pub fn try_next_packet(&mut self) -> Result<Option<PacketFrame>, CodecError> {
        let (packet_len, len_size) = match decode_var_int(&self.buf, 0) {
            Ok(decoded) => decoded,
            Err(CodecError::Incomplete) => return Ok(None),
            Err(err) => return Err(err),
        };

        if packet_len > MAX_PACKET_SIZE {
            return Err(CodecError::PacketTooLarge(packet_len));
        }

        if self.buf.len() - len_size < packet_len as usize {
            return Ok(None);
        }

        self.buf.advance(len_size);
        let mut body = self.buf.split_to(packet_len as usize);

        let (id, id_size) = decode_var_int(&body, 0).map_err(CodecError::within_frame)?;
        body.advance(id_size);

        Ok(Some(PacketFrame { id, body }))
    }
}
