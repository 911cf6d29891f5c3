//! # Buffer State Module
//!
//! This module describes the only data that crosses from the voxel core to the
//! render backend: named byte payloads for vertex and index buffers.
//!
//! ## Architecture
//!
//! Meshing produces [`BufferWriteCommand`]s. A backend that owns GPU buffers
//! applies them with its own device queue; [`BufferState`] is the in-process
//! mirror used by the headless driver and tests, keeping the latest contents of
//! every named buffer plus simple write analytics.

use std::collections::HashMap;
use std::fmt::Debug;

use bytemuck::NoUninit;
use log::trace;

/// Vertex buffer holding the opaque block faces.
pub const OPAQUE_VERTEX_BUFFER: &str = "Opaque Vertex Buffer";
/// Index buffer holding the opaque block faces.
pub const OPAQUE_INDEX_BUFFER: &str = "Opaque Index Buffer";
/// Vertex buffer holding the transparent block faces, sorted back to front.
pub const TRANSPARENT_VERTEX_BUFFER: &str = "Transparent Vertex Buffer";
/// Index buffer holding the transparent block faces, sorted back to front.
pub const TRANSPARENT_INDEX_BUFFER: &str = "Transparent Index Buffer";

/// Analytics data for a named buffer
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BufferAnalytics {
    /// Largest size the buffer has reached in bytes
    pub allocated_memory: u64,
    /// Bytes currently in use (based on the last write)
    pub used_memory: u64,
    /// Number of times the buffer has been written to
    pub times_written: u64,
}

/// Command for writing data to a named buffer
pub struct BufferWriteCommand {
    /// Descriptive name for the command (for debugging)
    pub name: String,
    /// Name of the target buffer
    pub buffer_name: &'static str,
    /// Byte offset in the buffer to start writing
    pub offset: u64,
    /// Data to write to the buffer
    pub data: Box<dyn AsBytes + Send + Sync>,
}

impl BufferWriteCommand {
    /// Creates a command that replaces the whole buffer with `data`.
    pub fn replace<T>(name: impl Into<String>, buffer_name: &'static str, data: Vec<T>) -> Self
    where
        T: NoUninit + Send + Sync,
    {
        BufferWriteCommand {
            name: name.into(),
            buffer_name,
            offset: 0,
            data: Box::new(data),
        }
    }
}

impl Debug for BufferWriteCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferWriteCommand")
            .field("name", &self.name)
            .field("buffer_name", &self.buffer_name)
            .field("offset", &self.offset)
            .field("len", &self.data.as_bytes().len())
            .finish()
    }
}

/// Trait for types that can be converted to bytes for buffer writing
///
/// This trait is implemented for common types that can be safely converted to
/// raw bytes for GPU buffer operations.
pub trait AsBytes {
    /// Converts the value to a byte slice
    fn as_bytes(&self) -> &[u8];
}

impl<T> AsBytes for Vec<T>
where
    T: NoUninit + Send + Sync,
{
    fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self)
    }
}

impl<T, const N: usize> AsBytes for [T; N]
where
    T: NoUninit + Send + Sync,
{
    fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self)
    }
}

/// In-process mirror of the backend's named buffers.
#[derive(Debug, Default)]
pub struct BufferState {
    buffers: HashMap<&'static str, Vec<u8>>,
    buffer_analytics: HashMap<&'static str, BufferAnalytics>,
}

impl BufferState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a write command. Writes at an offset past the end grow the buffer;
    /// a write at offset 0 replaces it.
    pub fn write(&mut self, command: BufferWriteCommand) {
        let bytes = command.data.as_bytes();
        let offset = command.offset as usize;
        let buffer = self.buffers.entry(command.buffer_name).or_default();
        if offset == 0 {
            buffer.clear();
        }
        if buffer.len() < offset + bytes.len() {
            buffer.resize(offset + bytes.len(), 0);
        }
        buffer[offset..offset + bytes.len()].copy_from_slice(bytes);

        let analytics = self.buffer_analytics.entry(command.buffer_name).or_default();
        analytics.used_memory = buffer.len() as u64;
        analytics.allocated_memory = analytics.allocated_memory.max(buffer.len() as u64);
        analytics.times_written += 1;

        trace!(
            "{}: wrote {} bytes to {} at offset {}",
            command.name,
            bytes.len(),
            command.buffer_name,
            offset
        );
    }

    /// Applies every command in order.
    pub fn write_all(&mut self, commands: impl IntoIterator<Item = BufferWriteCommand>) {
        for command in commands {
            self.write(command);
        }
    }

    /// Current contents of a named buffer.
    pub fn contents(&self, buffer_name: &str) -> Option<&[u8]> {
        self.buffers.get(buffer_name).map(Vec::as_slice)
    }

    pub fn analytics(&self, buffer_name: &str) -> Option<&BufferAnalytics> {
        self.buffer_analytics.get(buffer_name)
    }

    /// Total bytes currently held across all buffers.
    pub fn total_used_memory(&self) -> u64 {
        self.buffer_analytics.values().map(|a| a.used_memory).sum()
    }
}
