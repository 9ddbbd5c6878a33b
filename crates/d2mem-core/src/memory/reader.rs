use crate::error::{Error, Result};

/// A fixed-layout structure that can be decoded from remote memory.
///
/// Decoding is a direct reinterpretation of `SIZE` contiguous bytes; fields
/// not modelled by the implementor are ignored on decode and written as zero
/// on encode.
pub trait Record: Sized {
    /// Size of the structure in memory
    const SIZE: usize;

    /// Parse from raw bytes, `None` if fewer than `SIZE` bytes are given
    fn from_bytes(bytes: &[u8]) -> Option<Self>;

    /// Serialize the modelled fields into a zeroed `SIZE`-byte buffer
    fn to_bytes(&self) -> Vec<u8>;
}

/// Read-only access to the address space of the target process.
pub trait ReadMemory {
    /// Read exactly `size` bytes at `address`. Short reads are failures.
    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>>;

    /// Base address of the target's main module
    fn base_address(&self) -> u64;

    /// Size of the target's main module image in bytes
    fn module_size(&self) -> u64;

    fn read_u8(&self, address: u64) -> Result<u8> {
        let bytes = self.read_bytes(address, 1)?;
        Ok(bytes[0])
    }

    fn read_u16(&self, address: u64) -> Result<u16> {
        let bytes = self.read_bytes(address, 2)?;
        Ok(field::u16_at(&bytes, 0))
    }

    fn read_i32(&self, address: u64) -> Result<i32> {
        let bytes = self.read_bytes(address, 4)?;
        Ok(field::i32_at(&bytes, 0))
    }

    fn read_u32(&self, address: u64) -> Result<u32> {
        let bytes = self.read_bytes(address, 4)?;
        Ok(field::u32_at(&bytes, 0))
    }

    fn read_u64(&self, address: u64) -> Result<u64> {
        let bytes = self.read_bytes(address, 8)?;
        Ok(field::u64_at(&bytes, 0))
    }

    /// Decode a record at `address`, rejecting null pointers.
    fn read_record<T: Record>(&self, address: u64) -> Result<T> {
        if address == 0 {
            return Err(Error::InvalidPointer(short_type_name::<T>()));
        }
        let bytes = self.read_bytes(address, T::SIZE)?;
        T::from_bytes(&bytes).ok_or_else(|| {
            Error::read_failed(
                address,
                format!("short read for {}", short_type_name::<T>()),
            )
        })
    }

    /// Decode `count` consecutive records starting at `address`.
    ///
    /// The whole range is read at once, so any unmapped page inside it fails
    /// the entire read.
    fn read_array<T: Record>(&self, address: u64, count: usize) -> Result<Vec<T>> {
        if count == 0 {
            return Ok(Vec::new());
        }
        if address == 0 {
            return Err(Error::InvalidPointer(short_type_name::<T>()));
        }
        let size = count
            .checked_mul(T::SIZE)
            .ok_or_else(|| Error::read_failed(address, format!("array of {} overflows", count)))?;
        let bytes = self.read_bytes(address, size)?;

        bytes
            .chunks_exact(T::SIZE)
            .map(|chunk| {
                T::from_bytes(chunk).ok_or_else(|| {
                    Error::read_failed(address, format!("short read for {}", short_type_name::<T>()))
                })
            })
            .collect()
    }
}

/// A bare remote pointer, used for pointer tables.
impl Record for u64 {
    const SIZE: usize = 8;

    fn from_bytes(bytes: &[u8]) -> Option<Self> {
        Some(u64::from_le_bytes(bytes.get(..8)?.try_into().ok()?))
    }

    fn to_bytes(&self) -> Vec<u8> {
        self.to_le_bytes().to_vec()
    }
}

fn short_type_name<T>() -> &'static str {
    let name = std::any::type_name::<T>();
    name.rsplit("::").next().unwrap_or(name)
}

/// Little-endian field readers for `Record` implementations.
///
/// Callers check the buffer length against `Record::SIZE` first.
pub(crate) mod field {
    pub fn u16_at(bytes: &[u8], offset: usize) -> u16 {
        u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
    }

    pub fn u32_at(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes([
            bytes[offset],
            bytes[offset + 1],
            bytes[offset + 2],
            bytes[offset + 3],
        ])
    }

    pub fn i32_at(bytes: &[u8], offset: usize) -> i32 {
        u32_at(bytes, offset) as i32
    }

    pub fn u64_at(bytes: &[u8], offset: usize) -> u64 {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&bytes[offset..offset + 8]);
        u64::from_le_bytes(raw)
    }

    pub fn put(buffer: &mut [u8], offset: usize, value: &[u8]) {
        buffer[offset..offset + value.len()].copy_from_slice(value);
    }
}
