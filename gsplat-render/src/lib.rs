//! Gsplat Render Crate
//!
//! Renderer-side plumbing for decoded splat assets. The GPU work itself
//! (buffer storage, sorting kernels, draw calls) belongs to the host and is
//! reached through the [`RenderBackend`] and [`SortBackend`] traits; this
//! crate owns the lifecycle rules around them:
//!
//! - [`SplatRenderer`]: a component with explicit attach/detach/frame hooks
//! - [`SortRegistry`]: per-frame collection of sort candidates, passed
//!   explicitly instead of living in a global
//! - [`SortPassFeature`]: decides when the sort pass is enqueued for a camera

mod backend;
mod camera;
mod feature;
mod registry;
mod renderer;
mod settings;

pub use backend::{
    DrawRequest, RenderBackend, RenderError, ResourceHandle, SortBackend, SplatBuffer,
};
pub use camera::Camera;
pub use feature::{PassEvent, SORT_PASS_NAME, SortPass, SortPassFeature};
pub use registry::{RendererId, SortCandidate, SortRegistry};
pub use renderer::SplatRenderer;
pub use settings::RenderSettings;
