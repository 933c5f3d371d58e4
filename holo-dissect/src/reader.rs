//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//
// Sponsored by NLnet as part of the Next Generation Internet initiative.
// See: https://nlnet.nl/NGI0
//

use std::net::{Ipv4Addr, Ipv6Addr};
use std::ops::Range;

use bytes::{Buf, Bytes};

use crate::error::{ReadError, ReadResult};

/// Bounds-checked view over a region of a captured frame.
///
/// The underlying buffer holds the bytes that were actually captured, while
/// `end` is the claimed end of the region, as declared by the enclosing
/// header or length field. The two may disagree in both directions when the
/// capture is truncated or the header lies. Every read is checked against
/// the region start and the smaller of the two limits, so a read never
/// touches adjacent memory nor returns padded data.
///
/// All offsets are absolute positions in the captured frame.
#[derive(Clone, Debug)]
pub struct BoundedReader {
    data: Bytes,
    start: usize,
    pos: usize,
    end: usize,
}

// ===== impl BoundedReader =====

impl BoundedReader {
    /// Creates a reader whose claimed length matches the captured length.
    pub fn new(data: Bytes) -> Self {
        let end = data.len();
        BoundedReader {
            data,
            start: 0,
            pos: 0,
            end,
        }
    }

    /// Creates a reader with an explicit claimed length, which may exceed
    /// the number of captured bytes.
    pub fn with_claimed_len(data: Bytes, claimed_len: usize) -> Self {
        BoundedReader {
            data,
            start: 0,
            pos: 0,
            end: claimed_len,
        }
    }

    pub fn captured_len(&self) -> usize {
        self.data.len()
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Number of claimed bytes left in the region.
    pub fn remaining(&self) -> usize {
        self.end.saturating_sub(self.pos)
    }

    /// Number of bytes left in the region that were actually captured.
    pub fn captured_remaining(&self) -> usize {
        self.limit().saturating_sub(self.pos)
    }

    /// Returns whether every claimed byte of the region was captured.
    pub fn is_complete(&self) -> bool {
        self.end <= self.data.len()
    }

    fn limit(&self) -> usize {
        std::cmp::min(self.end, self.data.len())
    }

    fn check(&self, offset: usize, length: usize) -> ReadResult<Range<usize>> {
        let limit = self.limit();
        match offset.checked_add(length) {
            Some(end) if offset >= self.start && end <= limit => {
                Ok(offset..end)
            }
            _ => Err(ReadError::OutOfBounds {
                offset,
                length,
                limit,
            }),
        }
    }

    fn view(&self, range: Range<usize>) -> &[u8] {
        &self.data[range]
    }

    fn advance(&mut self, length: usize) -> ReadResult<Range<usize>> {
        let range = self.check(self.pos, length)?;
        self.pos = range.end;
        Ok(range)
    }

    // ----- random access -----

    pub fn read_u8(&self, offset: usize) -> ReadResult<u8> {
        let range = self.check(offset, 1)?;
        Ok(self.view(range).get_u8())
    }

    pub fn read_u16(&self, offset: usize) -> ReadResult<u16> {
        let range = self.check(offset, 2)?;
        Ok(self.view(range).get_u16())
    }

    pub fn read_u24(&self, offset: usize) -> ReadResult<u32> {
        let range = self.check(offset, 3)?;
        Ok(self.view(range).get_uint(3) as u32)
    }

    pub fn read_u32(&self, offset: usize) -> ReadResult<u32> {
        let range = self.check(offset, 4)?;
        Ok(self.view(range).get_u32())
    }

    pub fn slice(&self, offset: usize, length: usize) -> ReadResult<Bytes> {
        let range = self.check(offset, length)?;
        Ok(self.data.slice(range))
    }

    // ----- sequential access -----

    pub fn get_u8(&mut self) -> ReadResult<u8> {
        let range = self.advance(1)?;
        Ok(self.view(range).get_u8())
    }

    pub fn get_u16(&mut self) -> ReadResult<u16> {
        let range = self.advance(2)?;
        Ok(self.view(range).get_u16())
    }

    pub fn get_u24(&mut self) -> ReadResult<u32> {
        let range = self.advance(3)?;
        Ok(self.view(range).get_uint(3) as u32)
    }

    pub fn get_u32(&mut self) -> ReadResult<u32> {
        let range = self.advance(4)?;
        Ok(self.view(range).get_u32())
    }

    pub fn get_u64(&mut self) -> ReadResult<u64> {
        let range = self.advance(8)?;
        Ok(self.view(range).get_u64())
    }

    pub fn get_f32(&mut self) -> ReadResult<f32> {
        let range = self.advance(4)?;
        Ok(self.view(range).get_f32())
    }

    pub fn get_ipv4(&mut self) -> ReadResult<Ipv4Addr> {
        let range = self.advance(4)?;
        Ok(Ipv4Addr::from(self.view(range).get_u32()))
    }

    pub fn get_ipv6(&mut self) -> ReadResult<Ipv6Addr> {
        let range = self.advance(16)?;
        Ok(Ipv6Addr::from(self.view(range).get_u128()))
    }

    pub fn get_bytes(&mut self, length: usize) -> ReadResult<Bytes> {
        let range = self.advance(length)?;
        Ok(self.data.slice(range))
    }

    pub fn skip(&mut self, length: usize) -> ReadResult<()> {
        self.advance(length).map(|_| ())
    }

    /// Reads the byte `ahead` positions past the cursor without consuming it.
    pub fn peek_u8(&self, ahead: usize) -> ReadResult<u8> {
        self.read_u8(self.pos.saturating_add(ahead))
    }

    /// Reads an IPv4 prefix encoded in `ceil(plen / 8)` bytes.
    ///
    /// Host bits in the last byte are kept as they are on the wire. `plen` is
    /// clamped to the address width.
    pub fn get_ipv4_prefix(&mut self, plen: u8) -> ReadResult<Ipv4Addr> {
        let bytes = self.get_prefix_bytes::<4>(plen)?;
        Ok(Ipv4Addr::from(bytes))
    }

    /// Reads an IPv6 prefix encoded in `ceil(plen / 8)` bytes.
    ///
    /// Host bits in the last byte are kept as they are on the wire. `plen` is
    /// clamped to the address width.
    pub fn get_ipv6_prefix(&mut self, plen: u8) -> ReadResult<Ipv6Addr> {
        let bytes = self.get_prefix_bytes::<16>(plen)?;
        Ok(Ipv6Addr::from(bytes))
    }

    fn get_prefix_bytes<const N: usize>(
        &mut self,
        plen: u8,
    ) -> ReadResult<[u8; N]> {
        let len = prefix_wire_len(plen).min(N);
        let range = self.advance(len)?;
        let mut bytes = [0; N];
        bytes[..len].copy_from_slice(&self.data[range]);
        Ok(bytes)
    }

    /// Consumes the rest of the region, returning the part of it that was
    /// captured.
    pub fn take_rest(&mut self) -> Bytes {
        let limit = self.limit();
        let bytes = if self.pos < limit {
            self.data.slice(self.pos..limit)
        } else {
            Bytes::new()
        };
        self.pos = self.end.max(self.pos);
        bytes
    }

    // ----- regions -----

    /// Splits off the next `length` claimed bytes as a child region and
    /// advances past them.
    ///
    /// The child may extend past the captured data, in which case its reads
    /// fail individually.
    pub fn split_to(&mut self, length: usize) -> ReadResult<BoundedReader> {
        if length > self.remaining() {
            return Err(ReadError::OutOfBounds {
                offset: self.pos,
                length,
                limit: self.end,
            });
        }
        let child = BoundedReader {
            data: self.data.clone(),
            start: self.pos,
            pos: self.pos,
            end: self.pos + length,
        };
        self.pos += length;
        Ok(child)
    }

    /// Splits off everything that remains in the region.
    pub fn split_rest(&mut self) -> BoundedReader {
        let child = BoundedReader {
            data: self.data.clone(),
            start: self.pos,
            pos: self.pos,
            end: self.end,
        };
        self.pos = self.end.max(self.pos);
        child
    }

    /// Returns a region starting at the cursor whose claimed length is
    /// `length`, regardless of the current claimed end.
    ///
    /// Used once the real length of a PDU is learned from its header.
    pub fn claim(&self, length: usize) -> BoundedReader {
        BoundedReader {
            data: self.data.clone(),
            start: self.pos,
            pos: self.pos,
            end: self.pos.saturating_add(length),
        }
    }
}

// ===== global functions =====

// Number of bytes used to encode a prefix of the given length.
pub fn prefix_wire_len(plen: u8) -> usize {
    (plen as usize).div_ceil(8)
}

// ===== unit tests =====
