//! In-memory stand-ins for the target process, used by unit and integration
//! tests to build synthetic address spaces.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::error::{Error, Result};
use crate::memory::{ProcessInfo, ProcessProvider, ReadMemory, Record};

type Regions = BTreeMap<u64, Vec<u8>>;

/// A sparse, shareable address space.
///
/// Clones share the same backing memory, so a test can keep one handle and
/// patch memory while a `StateTracker` holds another.
#[derive(Debug, Clone, Default)]
pub struct MockMemoryReader {
    regions: Arc<RwLock<Regions>>,
    base_address: u64,
    module_size: u64,
}

impl MockMemoryReader {
    /// Write `bytes` at `address`, merging with touching regions.
    pub fn write(&self, address: u64, bytes: &[u8]) {
        if let Ok(mut regions) = self.regions.write() {
            insert_region(&mut regions, address, bytes);
        }
    }

    pub fn write_u64(&self, address: u64, value: u64) {
        self.write(address, &value.to_le_bytes());
    }

    pub fn write_record<T: Record>(&self, address: u64, record: &T) {
        self.write(address, &record.to_bytes());
    }

    /// Unmap every region overlapping `[address, address + size)`.
    pub fn unmap(&self, address: u64, size: u64) {
        if let Ok(mut regions) = self.regions.write() {
            let end = address + size;
            regions.retain(|&start, data| {
                let region_end = start + data.len() as u64;
                region_end <= address || start >= end
            });
        }
    }
}

impl ReadMemory for MockMemoryReader {
    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>> {
        let regions = self
            .regions
            .read()
            .map_err(|_| Error::read_failed(address, "mock memory poisoned"))?;

        let (&start, data) = regions
            .range(..=address)
            .next_back()
            .ok_or_else(|| Error::read_failed(address, "unmapped"))?;

        let offset = (address - start) as usize;
        let end = offset
            .checked_add(size)
            .ok_or_else(|| Error::read_failed(address, "size overflow"))?;
        if end > data.len() {
            return Err(Error::read_failed(
                address,
                format!("partial read ({} of {} bytes)", data.len().saturating_sub(offset), size),
            ));
        }

        Ok(data[offset..end].to_vec())
    }

    fn base_address(&self) -> u64 {
        self.base_address
    }

    fn module_size(&self) -> u64 {
        self.module_size
    }
}

/// Builder for `MockMemoryReader`
#[derive(Debug, Default)]
pub struct MockMemoryBuilder {
    regions: Regions,
    base_address: u64,
    module_size: u64,
}

impl MockMemoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map the main module image at `base_address`.
    pub fn module(mut self, base_address: u64, image: &[u8]) -> Self {
        self.base_address = base_address;
        self.module_size = image.len() as u64;
        insert_region(&mut self.regions, base_address, image);
        self
    }

    pub fn write(mut self, address: u64, bytes: &[u8]) -> Self {
        insert_region(&mut self.regions, address, bytes);
        self
    }

    pub fn write_u64(self, address: u64, value: u64) -> Self {
        self.write(address, &value.to_le_bytes())
    }

    pub fn write_record<T: Record>(self, address: u64, record: &T) -> Self {
        let bytes = record.to_bytes();
        self.write(address, &bytes)
    }

    pub fn build(self) -> MockMemoryReader {
        MockMemoryReader {
            regions: Arc::new(RwLock::new(self.regions)),
            base_address: self.base_address,
            module_size: self.module_size,
        }
    }
}

fn insert_region(regions: &mut Regions, address: u64, bytes: &[u8]) {
    let mut start = address;
    let mut end = address + bytes.len() as u64;

    // Collect every region that overlaps or touches the new range.
    let touching: Vec<u64> = regions
        .iter()
        .filter(|&(&region_start, data)| {
            let region_end = region_start + data.len() as u64;
            region_start <= end && region_end >= start
        })
        .map(|(&region_start, _)| region_start)
        .collect();

    for &region_start in &touching {
        let len = regions[&region_start].len() as u64;
        start = start.min(region_start);
        end = end.max(region_start + len);
    }

    let mut merged = vec![0u8; (end - start) as usize];
    for region_start in touching {
        if let Some(data) = regions.remove(&region_start) {
            let offset = (region_start - start) as usize;
            merged[offset..offset + data.len()].copy_from_slice(&data);
        }
    }
    let offset = (address - start) as usize;
    merged[offset..offset + bytes.len()].copy_from_slice(bytes);

    regions.insert(start, merged);
}

/// A process provider backed by a `MockMemoryReader`.
///
/// `process` is what `find_process` reports; set it to `None` to simulate the
/// target exiting, or change its pid to simulate a restart.
#[derive(Debug, Clone)]
pub struct MockProcessProvider {
    pub process: Option<ProcessInfo>,
    pub memory: MockMemoryReader,
}

impl MockProcessProvider {
    pub fn new(process: ProcessInfo, memory: MockMemoryReader) -> Self {
        Self {
            process: Some(process),
            memory,
        }
    }
}

impl ProcessProvider for MockProcessProvider {
    type Handle = MockMemoryReader;

    fn find_process(&self, _name: &str) -> Option<ProcessInfo> {
        self.process.clone()
    }

    fn open(&self, info: &ProcessInfo) -> Result<Self::Handle> {
        if self.process.as_ref().map(|p| p.pid) != Some(info.pid) {
            return Err(Error::ProcessUnavailable(format!("pid {} is gone", info.pid)));
        }
        Ok(self.memory.clone())
    }
}
