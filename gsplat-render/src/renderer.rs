//! Splat renderer component driven by host lifecycle hooks.

use crate::backend::{DrawRequest, RenderBackend, RenderError, ResourceHandle, SplatBuffer};
use crate::registry::{RendererId, SortCandidate, SortRegistry};
use crate::settings::RenderSettings;
use glam::Mat4;
use gsplat_data::{SplatAsset, effective_sh_degree};
use std::sync::Arc;
use tracing::debug;

/// One splat asset placed in a scene.
///
/// The host calls [`on_attach`](Self::on_attach) when the renderer becomes
/// active, [`on_frame_update`](Self::on_frame_update) once per frame and
/// [`on_detach`](Self::on_detach) when it is disabled or destroyed. Assets
/// may be swapped at any time; the change is picked up on the next frame.
#[derive(Debug, Default)]
pub struct SplatRenderer {
    pub asset: Option<Arc<SplatAsset>>,
    pub settings: RenderSettings,
    pub transform: Mat4,
    pub layer: u8,
    id: Option<RendererId>,
    uploaded_asset: Option<Arc<SplatAsset>>,
    resources: Option<ResourceHandle>,
}

impl SplatRenderer {
    pub fn new(asset: Option<Arc<SplatAsset>>) -> Self {
        Self {
            asset,
            ..Default::default()
        }
    }

    /// True when an asset is assigned and its buffers exist.
    pub fn is_valid(&self) -> bool {
        self.asset.is_some() && self.resources.is_some()
    }

    pub fn splat_count(&self) -> u32 {
        self.asset.as_ref().map_or(0, |asset| asset.splat_count())
    }

    /// Registry id while attached.
    pub fn id(&self) -> Option<RendererId> {
        self.id
    }

    pub fn resources(&self) -> Option<ResourceHandle> {
        self.resources
    }

    /// Register with `registry` and upload the current asset, if any.
    pub fn on_attach(
        &mut self,
        registry: &mut SortRegistry,
        backend: &mut dyn RenderBackend,
    ) -> Result<(), RenderError> {
        if self.id.is_none() {
            self.id = Some(registry.register());
        }
        self.sync_asset(backend)
    }

    /// Unregister and free GPU resources.
    pub fn on_detach(&mut self, registry: &mut SortRegistry, backend: &mut dyn RenderBackend) {
        if let Some(id) = self.id.take() {
            registry.unregister(id);
        }
        if let Some(handle) = self.resources.take() {
            backend.release(handle);
        }
        self.uploaded_asset = None;
    }

    /// Pick up asset changes, publish the sort candidate and draw.
    pub fn on_frame_update(
        &mut self,
        registry: &mut SortRegistry,
        backend: &mut dyn RenderBackend,
    ) -> Result<(), RenderError> {
        let id = self.id.ok_or(RenderError::NotAttached)?;
        if let Err(err) = self.sync_asset(backend) {
            // Buffers may be partially written; keep them out of the sort.
            registry.update_candidate(id, None)?;
            return Err(err);
        }

        let (Some(asset), Some(handle)) = (&self.asset, self.resources) else {
            registry.update_candidate(id, None)?;
            return Ok(());
        };

        let settings = self.settings.sanitized();
        let request = DrawRequest {
            splat_count: asset.splat_count(),
            transform: self.transform,
            bounds: asset.bounds(),
            layer: self.layer,
            sh_degree: effective_sh_degree(settings.sh_degree, asset.sh_bands()),
            settings,
        };
        registry.update_candidate(
            id,
            Some(SortCandidate {
                id,
                resources: handle,
                splat_count: request.splat_count,
                layer: request.layer,
                transform: request.transform,
                bounds: request.bounds,
            }),
        )?;
        backend.draw(handle, &request)
    }

    /// (Re)create and fill buffers when the assigned asset differs from the
    /// uploaded one. Clearing the asset keeps the buffers for reuse.
    fn sync_asset(&mut self, backend: &mut dyn RenderBackend) -> Result<(), RenderError> {
        let unchanged = match (&self.asset, &self.uploaded_asset) {
            (Some(current), Some(uploaded)) => Arc::ptr_eq(current, uploaded),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return Ok(());
        }

        let Some(asset) = self.asset.clone() else {
            self.uploaded_asset = None;
            return Ok(());
        };

        let handle = match self.resources {
            Some(handle) => {
                backend.recreate(handle, asset.splat_count(), asset.sh_bands())?;
                handle
            }
            None => {
                let handle = backend.create(asset.splat_count(), asset.sh_bands())?;
                self.resources = Some(handle);
                handle
            }
        };
        debug!(
            "Uploading '{}' ({} splats) to resources {}",
            asset.name,
            asset.splat_count(),
            handle.id()
        );
        upload(backend, handle, &asset)?;
        // Only a complete upload counts; failures are retried next frame.
        self.uploaded_asset = Some(asset);
        Ok(())
    }
}

fn upload(
    backend: &mut dyn RenderBackend,
    handle: ResourceHandle,
    asset: &SplatAsset,
) -> Result<(), RenderError> {
    let attributes = &asset.attributes;
    let buffers: [(SplatBuffer, &[u8]); 4] = [
        (SplatBuffer::Position, bytemuck::cast_slice(&attributes.positions)),
        (SplatBuffer::Scale, bytemuck::cast_slice(&attributes.scales)),
        (SplatBuffer::Rotation, bytemuck::cast_slice(&attributes.rotations)),
        (SplatBuffer::Color, bytemuck::cast_slice(&attributes.colors)),
    ];
    for (buffer, bytes) in buffers {
        backend.write_buffer(handle, buffer, bytes)?;
    }
    if attributes.sh_bands > 0 {
        let sh = bytemuck::cast_slice(&attributes.sh_coefficients);
        backend.write_buffer(handle, SplatBuffer::Sh, sh)?;
    }
    Ok(())
}
