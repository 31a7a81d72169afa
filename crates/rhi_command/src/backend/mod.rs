//! Backend implementations
//!
//! Concrete GPU backends (Vulkan, Direct3D, OpenGL) live in their own crates
//! and only depend on the [`crate::rhi::Rhi`] contract; the null backend
//! ships here as the reference for wiring a dispatch table.

pub mod null;
