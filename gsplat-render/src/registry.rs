//! Registry of renderers that take part in per-camera sorting.

use crate::backend::{RenderError, ResourceHandle, SortBackend};
use crate::camera::Camera;
use glam::Mat4;
use gsplat_data::Bounds;
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Id handed out by [`SortRegistry::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RendererId(pub u64);

/// What a renderer publishes each frame for the sorter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SortCandidate {
    pub id: RendererId,
    pub resources: ResourceHandle,
    pub splat_count: u32,
    pub layer: u8,
    pub transform: Mat4,
    pub bounds: Bounds,
}

/// Collects sort candidates and dispatches them per camera.
///
/// Registries are plain values; a host creates one per render context and
/// passes it to every renderer and to the sort pass.
#[derive(Debug)]
pub struct SortRegistry {
    next_id: u64,
    enabled: bool,
    renderers: BTreeMap<RendererId, Option<SortCandidate>>,
    gathered: Vec<SortCandidate>,
}

impl SortRegistry {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            enabled: true,
            renderers: BTreeMap::new(),
            gathered: Vec::new(),
        }
    }

    /// Whether sorting is available. Hosts disable it when the sorter's
    /// GPU resources could not be created.
    pub fn is_valid(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Register a renderer and return its id.
    pub fn register(&mut self) -> RendererId {
        let id = RendererId(self.next_id);
        self.next_id += 1;
        self.renderers.insert(id, None);
        debug!("Registered splat renderer {}", id.0);
        id
    }

    /// Remove a renderer; its candidate stops being sorted.
    pub fn unregister(&mut self, id: RendererId) {
        if self.renderers.remove(&id).is_some() {
            self.gathered.retain(|candidate| candidate.id != id);
            debug!("Unregistered splat renderer {}", id.0);
        }
    }

    pub fn is_registered(&self, id: RendererId) -> bool {
        self.renderers.contains_key(&id)
    }

    pub fn renderer_count(&self) -> usize {
        self.renderers.len()
    }

    /// Publish (or with `None`, withdraw) the candidate for `id`.
    pub fn update_candidate(
        &mut self,
        id: RendererId,
        candidate: Option<SortCandidate>,
    ) -> Result<(), RenderError> {
        let slot = self.renderers.get_mut(&id).ok_or(RenderError::NotAttached)?;
        *slot = candidate;
        Ok(())
    }

    /// Collect the candidates visible to `camera`. Returns whether any were
    /// found.
    pub fn gather_for_camera(&mut self, camera: &Camera) -> bool {
        self.gathered.clear();
        self.gathered.extend(
            self.renderers
                .values()
                .flatten()
                .filter(|candidate| candidate.splat_count > 0 && camera.sees_layer(candidate.layer))
                .copied(),
        );
        trace!("Gathered {} splat renderers for camera", self.gathered.len());
        !self.gathered.is_empty()
    }

    /// Candidates from the last [`gather_for_camera`](Self::gather_for_camera).
    pub fn gathered(&self) -> &[SortCandidate] {
        &self.gathered
    }

    /// Sort every gathered candidate for `camera`. Returns how many were
    /// dispatched.
    pub fn dispatch_sort(
        &self,
        sorter: &mut dyn SortBackend,
        camera: &Camera,
    ) -> Result<usize, RenderError> {
        for candidate in &self.gathered {
            sorter.sort(candidate, camera)?;
        }
        Ok(self.gathered.len())
    }
}

impl Default for SortRegistry {
    fn default() -> Self {
        Self::new()
    }
}
