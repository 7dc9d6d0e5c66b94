use byteorder::{ByteOrder, LittleEndian};
use thiserror::Error;

/// Every value occupies a multiple of this many bytes on the wire. Values narrower
/// than 32 bits are widened, strings are zero-padded.
const ALIGNMENT: usize = 4;

#[derive(Error, Debug)]
pub enum ParcelError {
    #[error("parcel truncated: needed {needed} bytes at offset {offset}, but only {available} left")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("string at offset {offset} is not valid UTF-8")]
    InvalidUtf8 {
        offset: usize,
        source: std::string::FromUtf8Error,
    },

    #[error("value {value} at offset {offset} does not fit into {target}")]
    OutOfRange {
        offset: usize,
        value: u32,
        target: &'static str,
    },

    #[error("unknown {kind} tag on the wire: {value}")]
    UnknownTag { kind: &'static str, value: u8 },
}

pub type ParcelResult<T> = Result<T, ParcelError>;

/// Types with a symmetric wire encoding.
///
/// Encoding into a [Parcel] never fails since it is backed by a growable buffer.
/// Decoding fails if the parcel is truncated or contains values that do not fit
/// the target type.
pub trait Parcelable: Sized {
    fn marshal(&self, parcel: &mut Parcel);

    fn unmarshal(parcel: &mut Parcel) -> ParcelResult<Self>;
}

/// Append-only buffer with a separate read cursor, so that a parcel written by
/// one side can be handed over and consumed front-to-back by the other.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Parcel {
    data: Vec<u8>,
    read_pos: usize,
}

impl Parcel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bytes(data: Vec<u8>) -> Self {
        Parcel { data, read_pos: 0 }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Number of bytes not yet consumed by reads.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.read_pos
    }

    pub fn write_u32(&mut self, value: u32) {
        let mut buf = [0u8; ALIGNMENT];
        LittleEndian::write_u32(&mut buf, value);
        self.data.extend_from_slice(&buf);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.write_u32(value as u32);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.write_u32(value as u32);
    }

    pub fn write_bool(&mut self, value: bool) {
        self.write_u32(value as u32);
    }

    pub fn write_string(&mut self, value: &str) {
        self.write_u32(value.len() as u32);
        self.data.extend_from_slice(value.as_bytes());
        let padding = padding_for(value.len());
        self.data.resize(self.data.len() + padding, 0);
    }

    pub fn read_u32(&mut self) -> ParcelResult<u32> {
        let slot = self.take(ALIGNMENT)?;
        Ok(LittleEndian::read_u32(slot))
    }

    pub fn read_u16(&mut self) -> ParcelResult<u16> {
        let offset = self.read_pos;
        let raw = self.read_u32()?;
        u16::try_from(raw).map_err(|_| ParcelError::OutOfRange { offset, value: raw, target: "u16" })
    }

    pub fn read_u8(&mut self) -> ParcelResult<u8> {
        let offset = self.read_pos;
        let raw = self.read_u32()?;
        u8::try_from(raw).map_err(|_| ParcelError::OutOfRange { offset, value: raw, target: "u8" })
    }

    pub fn read_bool(&mut self) -> ParcelResult<bool> {
        let offset = self.read_pos;
        match self.read_u32()? {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(ParcelError::OutOfRange { offset, value, target: "bool" }),
        }
    }

    pub fn read_string(&mut self) -> ParcelResult<String> {
        let len = self.read_u32()? as usize;
        let offset = self.read_pos;
        let bytes = self.take(len)?.to_vec();
        self.take(padding_for(len))?;
        String::from_utf8(bytes).map_err(|source| ParcelError::InvalidUtf8 { offset, source })
    }

    pub fn write<T: Parcelable>(&mut self, value: &T) {
        value.marshal(self);
    }

    pub fn read<T: Parcelable>(&mut self) -> ParcelResult<T> {
        T::unmarshal(self)
    }

    /// Writes a count-prefixed list of at most `cap` entries, silently dropping the rest.
    pub fn write_capped_list<T: Parcelable>(&mut self, items: &[T], cap: usize) {
        let count = items.len().min(cap);
        self.write_u32(count as u32);
        for item in &items[..count] {
            item.marshal(self);
        }
    }

    /// Reads a count-prefixed list. An announced count above `cap` is clamped to `cap`
    /// instead of being rejected, so only the first `cap` entries are consumed.
    pub fn read_capped_list<T: Parcelable>(&mut self, cap: usize) -> ParcelResult<Vec<T>> {
        let count = (self.read_u32()? as usize).min(cap);
        self.read_entries(count)
    }

    pub fn write_list<T: Parcelable>(&mut self, items: &[T]) {
        self.write_capped_list(items, u32::MAX as usize);
    }

    pub fn read_list<T: Parcelable>(&mut self) -> ParcelResult<Vec<T>> {
        let count = self.read_u32()? as usize;
        self.read_entries(count)
    }

    fn read_entries<T: Parcelable>(&mut self, count: usize) -> ParcelResult<Vec<T>> {
        // no with_capacity(), count is untrusted
        let mut items = Vec::new();
        for _ in 0..count {
            items.push(T::unmarshal(self)?);
        }
        Ok(items)
    }

    fn take(&mut self, needed: usize) -> ParcelResult<&[u8]> {
        let available = self.remaining();
        if needed > available {
            return Err(ParcelError::Truncated { offset: self.read_pos, needed, available });
        }
        let start = self.read_pos;
        self.read_pos += needed;
        Ok(&self.data[start..self.read_pos])
    }
}

fn padding_for(len: usize) -> usize {
    (ALIGNMENT - len % ALIGNMENT) % ALIGNMENT
}

impl Parcelable for String {
    fn marshal(&self, parcel: &mut Parcel) {
        parcel.write_string(self);
    }

    fn unmarshal(parcel: &mut Parcel) -> ParcelResult<Self> {
        parcel.read_string()
    }
}

impl<A: Parcelable, B: Parcelable> Parcelable for (A, B) {
    fn marshal(&self, parcel: &mut Parcel) {
        self.0.marshal(parcel);
        self.1.marshal(parcel);
    }

    fn unmarshal(parcel: &mut Parcel) -> ParcelResult<Self> {
        Ok((A::unmarshal(parcel)?, B::unmarshal(parcel)?))
    }
}
