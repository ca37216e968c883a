//! Traits the host implements to own GPU resources and sorting.

use crate::camera::Camera;
use crate::registry::SortCandidate;
use crate::settings::RenderSettings;
use glam::Mat4;
use gsplat_data::Bounds;
use thiserror::Error;

/// Errors that can occur while driving a splat renderer.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Renderer is not attached to a sort registry")]
    NotAttached,

    #[error("Unknown resource handle: {0}")]
    UnknownResource(u64),

    #[error("Backend error: {0}")]
    Backend(String),
}

/// Opaque id for a set of GPU buffers created by a [`RenderBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceHandle(pub u64);

impl ResourceHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// The per-attribute GPU buffers of one splat asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SplatBuffer {
    Position,
    Scale,
    Rotation,
    Color,
    Sh,
}

/// Everything the host needs to draw one splat renderer this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawRequest {
    pub splat_count: u32,
    pub transform: Mat4,
    pub bounds: Bounds,
    pub layer: u8,
    /// SH degree after limiting to the asset's stored bands.
    pub sh_degree: u8,
    pub settings: RenderSettings,
}

/// GPU resource owner for splat renderers.
pub trait RenderBackend {
    /// Allocate buffers for `splat_count` splats with `sh_bands` SH bands.
    fn create(&mut self, splat_count: u32, sh_bands: u8) -> Result<ResourceHandle, RenderError>;

    /// Resize existing buffers for a new asset.
    fn recreate(
        &mut self,
        handle: ResourceHandle,
        splat_count: u32,
        sh_bands: u8,
    ) -> Result<(), RenderError>;

    /// Copy raw attribute bytes into one buffer.
    fn write_buffer(
        &mut self,
        handle: ResourceHandle,
        buffer: SplatBuffer,
        bytes: &[u8],
    ) -> Result<(), RenderError>;

    /// Issue the draw for one renderer.
    fn draw(&mut self, handle: ResourceHandle, request: &DrawRequest) -> Result<(), RenderError>;

    /// Free the buffers behind `handle`.
    fn release(&mut self, handle: ResourceHandle);
}

/// Host-side sorter that orders a candidate's splats for a camera.
pub trait SortBackend {
    fn sort(&mut self, candidate: &SortCandidate, camera: &Camera) -> Result<(), RenderError>;
}
