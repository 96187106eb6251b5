//! Register block transfers: the dummy-write-then-read reader and the chunked writer.
//!
//! Every SigmaDSP transfer starts with a 2-byte big-endian register address. Writes
//! longer than the host's per-transaction buffer are split into chunks; each chunk
//! carries its own register header derived from the base register and the number of
//! words already sent, relying on the chip's per-word auto-increment.

use alloc::vec::Vec;

use crate::bus::BusHandle;
use crate::error::{Error, Result};
use crate::interface::{Operation, SigmaDspInterface};
use crate::log::trace;
use crate::params::{DeviceAddress, WordSize};

/// Largest payload slice per bus write: the Linux `i2c-dev` 8192-byte message limit
/// minus the register header, rounded down to a multiple of both word sizes.
pub const MAX_CHUNK: usize = 8188;

/// Width of the register address header sent before every transfer.
pub const REGISTER_ADDRESS_BYTES: usize = 2;

/// One bus-sized slice of a larger register write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferChunk<'a> {
    /// Register address sent in this chunk's header.
    pub register: u16,
    /// Byte offset of `data` within the full payload.
    pub offset: usize,
    /// Payload bytes of this chunk.
    pub data: &'a [u8],
}

/// Reasons a payload cannot be split into chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChunkError {
    /// Chunk size is zero, above [`MAX_CHUNK`], or not a multiple of the word size.
    InvalidChunkSize,
    /// A chunk's register address would exceed `0xFFFF`.
    AddressOverflow,
}

impl<E> From<ChunkError> for Error<E> {
    fn from(err: ChunkError) -> Self {
        match err {
            ChunkError::InvalidChunkSize => Self::InvalidConfig,
            ChunkError::AddressOverflow => Self::AddressOverflow,
        }
    }
}

/// Iterator over the chunks of a register write.
///
/// An empty payload yields a single header-only chunk.
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    base: u16,
    word_size: WordSize,
    payload: &'a [u8],
    max_chunk: usize,
    offset: usize,
    started: bool,
}

impl<'a> Chunks<'a> {
    /// Plans the chunks of `payload` starting at `register`.
    ///
    /// Only the final chunk may end off a word boundary, so every header is exact.
    pub fn new(
        register: u16,
        word_size: WordSize,
        payload: &'a [u8],
        max_chunk: usize,
    ) -> core::result::Result<Self, ChunkError> {
        if max_chunk == 0 || max_chunk > MAX_CHUNK || max_chunk % word_size.bytes() != 0 {
            return Err(ChunkError::InvalidChunkSize);
        }

        let last_offset = payload.len().saturating_sub(1) / max_chunk * max_chunk;
        chunk_register(register, last_offset, word_size).ok_or(ChunkError::AddressOverflow)?;

        Ok(Self {
            base: register,
            word_size,
            payload,
            max_chunk,
            offset: 0,
            started: false,
        })
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = TransferChunk<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.started && self.offset >= self.payload.len() {
            return None;
        }
        self.started = true;

        let end = self.payload.len().min(self.offset + self.max_chunk);
        // Headers only grow and `Chunks::new` bounds the last one.
        let register = chunk_register(self.base, self.offset, self.word_size)
            .expect("Chunks::new checked the last chunk register");
        let chunk = TransferChunk {
            register,
            offset: self.offset,
            data: &self.payload[self.offset..end],
        };
        self.offset = end;
        Some(chunk)
    }
}

/// Register address of the chunk starting `offset` bytes into the payload.
fn chunk_register(base: u16, offset: usize, word_size: WordSize) -> Option<u16> {
    let words = u16::try_from(offset / word_size.bytes()).ok()?;
    base.checked_add(words)
}

/// Reads `buf.len()` bytes starting at `register`.
///
/// Sends the register address as a dummy write immediately followed, without a STOP,
/// by the read. Either the whole block is returned or an error.
pub fn read_block_into<IFACE, CommE>(
    bus: &mut BusHandle<IFACE>,
    device: DeviceAddress,
    register: u16,
    buf: &mut [u8],
) -> Result<(), CommE>
where
    IFACE: SigmaDspInterface<Error = CommE>,
{
    if buf.is_empty() {
        return Ok(());
    }

    let header = register.to_be_bytes();
    trace!("read {} bytes at {}", buf.len(), register);
    bus.submit(device, &mut [Operation::Write(&header), Operation::Read(buf)])
}

/// Reads `byte_count` bytes starting at `register` into a new buffer.
pub fn read_block<IFACE, CommE>(
    bus: &mut BusHandle<IFACE>,
    device: DeviceAddress,
    register: u16,
    byte_count: usize,
) -> Result<Vec<u8>, CommE>
where
    IFACE: SigmaDspInterface<Error = CommE>,
{
    let mut data = Vec::new();
    data.try_reserve_exact(byte_count)
        .map_err(|_| Error::Allocation)?;
    data.resize(byte_count, 0);

    read_block_into(bus, device, register, &mut data)?;
    Ok(data)
}

/// Reads one byte from a device with 8-bit register addresses.
///
/// Used for auxiliary chips sharing the bus with the DSP.
pub fn read_byte<IFACE, CommE>(
    bus: &mut BusHandle<IFACE>,
    device: DeviceAddress,
    register: u8,
) -> Result<u8, CommE>
where
    IFACE: SigmaDspInterface<Error = CommE>,
{
    let mut value = [0u8; 1];
    bus.submit(
        device,
        &mut [Operation::Write(&[register]), Operation::Read(&mut value)],
    )?;
    Ok(value[0])
}

/// Writes `payload` starting at `register` using [`MAX_CHUNK`]-sized chunks.
pub fn write_block<IFACE, CommE>(
    bus: &mut BusHandle<IFACE>,
    device: DeviceAddress,
    register: u16,
    word_size: WordSize,
    payload: &[u8],
) -> Result<(), CommE>
where
    IFACE: SigmaDspInterface<Error = CommE>,
{
    write_block_chunked(bus, device, register, word_size, payload, MAX_CHUNK)
}

/// Writes `payload` starting at `register`, splitting it into `max_chunk`-byte writes.
///
/// Each chunk is one bus write of `[register_hi, register_lo, data...]`. The first
/// failing chunk aborts the transfer. Chunks already sent are not rolled back: a
/// failure after the first chunk is reported as [`Error::PartialWrite`] and leaves
/// the register range in an unknown state.
pub fn write_block_chunked<IFACE, CommE>(
    bus: &mut BusHandle<IFACE>,
    device: DeviceAddress,
    register: u16,
    word_size: WordSize,
    payload: &[u8],
    max_chunk: usize,
) -> Result<(), CommE>
where
    IFACE: SigmaDspInterface<Error = CommE>,
{
    let chunks = Chunks::new(register, word_size, payload, max_chunk)?;

    let mut frame = Vec::new();
    frame
        .try_reserve_exact(REGISTER_ADDRESS_BYTES + payload.len().min(max_chunk))
        .map_err(|_| Error::Allocation)?;

    let mut bytes_sent = 0;
    for chunk in chunks {
        frame.clear();
        frame.extend_from_slice(&chunk.register.to_be_bytes());
        frame.extend_from_slice(chunk.data);

        trace!("write {} bytes at {}", chunk.data.len(), chunk.register);
        match bus.submit(device, &mut [Operation::Write(&frame)]) {
            Ok(()) => bytes_sent += chunk.data.len(),
            Err(Error::Io(cause)) if bytes_sent > 0 => {
                return Err(Error::PartialWrite { bytes_sent, cause });
            }
            Err(err) => return Err(err),
        }
    }

    Ok(())
}

/// Sends a caller-framed buffer (register header included) as one bus write.
pub fn write_raw<IFACE, CommE>(
    bus: &mut BusHandle<IFACE>,
    device: DeviceAddress,
    frame: &[u8],
) -> Result<(), CommE>
where
    IFACE: SigmaDspInterface<Error = CommE>,
{
    bus.submit(device, &mut [Operation::Write(frame)])
}
