//! Render feature that schedules the per-camera splat sort.

use crate::backend::{RenderError, SortBackend};
use crate::camera::Camera;
use crate::registry::SortRegistry;

/// Name of the sort pass as shown in host profilers.
pub const SORT_PASS_NAME: &str = "SortGsplats";

/// Point in the host frame at which a pass runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassEvent {
    AfterOpaques,
    BeforeTransparents,
    AfterTransparents,
}

/// Descriptor of the sort pass handed to the host scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortPass {
    pub name: &'static str,
    pub event: PassEvent,
}

/// Decides per camera whether the sort pass is needed and runs it.
#[derive(Debug)]
pub struct SortPassFeature {
    pass: Option<SortPass>,
    has_splats: bool,
}

impl SortPassFeature {
    /// Build the feature with its pass scheduled before transparents.
    pub fn create() -> Self {
        Self {
            pass: Some(SortPass {
                name: SORT_PASS_NAME,
                event: PassEvent::BeforeTransparents,
            }),
            has_splats: false,
        }
    }

    /// Gather candidates for `camera` before culling.
    pub fn on_camera_pre_cull(&mut self, registry: &mut SortRegistry, camera: &Camera) {
        self.has_splats = registry.gather_for_camera(camera);
    }

    /// The pass to enqueue for the current camera, if any.
    ///
    /// `settings_valid` is the host's check that the shaders and kernels the
    /// sorter needs are loaded.
    pub fn add_render_passes(
        &self,
        registry: &SortRegistry,
        settings_valid: bool,
    ) -> Option<&SortPass> {
        if registry.is_valid() && settings_valid && self.has_splats {
            self.pass.as_ref()
        } else {
            None
        }
    }

    /// Body of the enqueued pass.
    pub fn execute(
        &self,
        registry: &SortRegistry,
        sorter: &mut dyn SortBackend,
        camera: &Camera,
    ) -> Result<usize, RenderError> {
        registry.dispatch_sort(sorter, camera)
    }

    pub fn dispose(&mut self) {
        self.pass = None;
        self.has_splats = false;
    }
}

impl Default for SortPassFeature {
    fn default() -> Self {
        Self::create()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ResourceHandle;
    use crate::registry::SortCandidate;
    use glam::Mat4;
    use gsplat_data::Bounds;

    #[derive(Default)]
    struct CountingSorter {
        count: usize,
    }

    impl SortBackend for CountingSorter {
        fn sort(
            &mut self,
            _candidate: &SortCandidate,
            _camera: &Camera,
        ) -> Result<(), RenderError> {
            self.count += 1;
            Ok(())
        }
    }

    fn registry_with_splats(layer: u8) -> SortRegistry {
        let mut registry = SortRegistry::new();
        let id = registry.register();
        registry
            .update_candidate(
                id,
                Some(SortCandidate {
                    id,
                    resources: ResourceHandle(0),
                    splat_count: 8,
                    layer,
                    transform: Mat4::IDENTITY,
                    bounds: Bounds::default(),
                }),
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_pass_enqueued_with_splats() {
        let mut registry = registry_with_splats(0);
        let mut feature = SortPassFeature::create();
        let camera = Camera::default();

        feature.on_camera_pre_cull(&mut registry, &camera);
        let pass = feature.add_render_passes(&registry, true).unwrap();
        assert_eq!(pass.name, SORT_PASS_NAME);
        assert_eq!(pass.event, PassEvent::BeforeTransparents);

        let mut sorter = CountingSorter::default();
        assert_eq!(feature.execute(&registry, &mut sorter, &camera).unwrap(), 1);
        assert_eq!(sorter.count, 1);
    }

    #[test]
    fn test_pass_skipped() {
        let mut registry = registry_with_splats(4);
        let mut feature = SortPassFeature::create();

        // Layer not visible to this camera.
        feature.on_camera_pre_cull(&mut registry, &Camera::default().with_culling_mask(1));
        assert!(feature.add_render_passes(&registry, true).is_none());

        feature.on_camera_pre_cull(&mut registry, &Camera::default());
        assert!(feature.add_render_passes(&registry, false).is_none());

        registry.set_enabled(false);
        assert!(feature.add_render_passes(&registry, true).is_none());

        registry.set_enabled(true);
        assert!(feature.add_render_passes(&registry, true).is_some());
        feature.dispose();
        assert!(feature.add_render_passes(&registry, true).is_none());
    }
}
