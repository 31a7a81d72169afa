//! Resource manipulation commands

use crate::buffer::CommandBuffer;
use crate::command::{Command, DispatchIndex};
use crate::types::ResourceHandle;

/// Copy the contents of one resource into another of compatible layout.
#[derive(Debug, Clone, Copy)]
pub struct CopyResource {
    /// Resource written to.
    pub destination_resource: ResourceHandle,
    /// Resource read from.
    pub source_resource: ResourceHandle,
}

impl CopyResource {
    /// Record the copy.
    pub fn create(
        command_buffer: &mut CommandBuffer,
        destination_resource: ResourceHandle,
        source_resource: ResourceHandle,
    ) {
        debug_assert!(
            !slotmap::Key::is_null(&destination_resource) && !slotmap::Key::is_null(&source_resource),
            "resource copy requires both resources"
        );
        debug_assert!(
            destination_resource != source_resource,
            "resource copy source and destination must differ"
        );
        command_buffer.add_command(Self {
            destination_resource,
            source_resource,
        });
    }
}

impl Command for CopyResource {
    const DISPATCH_INDEX: DispatchIndex = DispatchIndex::CopyResource;
}

/// Regenerate the mipmap chain of a texture resource.
#[derive(Debug, Clone, Copy)]
pub struct GenerateMipmaps {
    /// Texture whose mip chain is rebuilt from level 0.
    pub resource: ResourceHandle,
}

impl GenerateMipmaps {
    /// Record the mipmap generation.
    pub fn create(command_buffer: &mut CommandBuffer, resource: ResourceHandle) {
        debug_assert!(
            !slotmap::Key::is_null(&resource),
            "mipmap generation requires a resource"
        );
        command_buffer.add_command(Self { resource });
    }
}

impl Command for GenerateMipmaps {
    const DISPATCH_INDEX: DispatchIndex = DispatchIndex::GenerateMipmaps;
}
