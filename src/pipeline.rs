// THEORY:
// The `pipeline` module is the top-level API of the optimization engine. It
// sequences the external detector, the scene model, the layout generator and
// the renderer into one synchronous, fail-fast call: raw image bytes in,
// ranked rendered options out. Any stage error is surfaced immediately and no
// partial output is returned, since a malformed scene cannot be meaningfully
// optimized.
//
// The detector is the engine's only external collaborator, abstracted behind a
// single capability so any implementation (a learned model, classical CV, or
// a manual annotation tool) can satisfy it.

use crate::core_modules::font::LabelFont;
use crate::core_modules::packer::generate_layouts;
use crate::core_modules::renderer::render_scene;
use image::RgbImage;
use log::info;

// Re-export key data structures for the public API.
pub use crate::core_modules::error::LayoutError;
pub use crate::core_modules::geometry::Rect;
pub use crate::core_modules::packer::{
    CandidateLayout, GeneratorConfig, ZonePreference, ZoningRules,
};
pub use crate::core_modules::scene::{ObjectKind, PlacedObject, Scene};

/// The external detection collaborator: turns raw image bytes into typed,
/// labeled boxes in the source image's pixel coordinates.
pub trait ObjectDetector: Send + Sync {
    fn detect(&self, image_bytes: &[u8]) -> Result<Vec<PlacedObject>, LayoutError>;
}

/// A manual-annotation detector that returns a fixed set of objects,
/// regardless of the image content. Useful for demos and tests, and the
/// simplest possible implementation of the detector contract.
pub struct StaticDetector {
    objects: Vec<PlacedObject>,
}

impl StaticDetector {
    pub fn new(objects: Vec<PlacedObject>) -> Self {
        Self { objects }
    }
}

impl ObjectDetector for StaticDetector {
    fn detect(&self, _image_bytes: &[u8]) -> Result<Vec<PlacedObject>, LayoutError> {
        Ok(self.objects.clone())
    }
}

/// One rendered result: the rank title and the raster image, canvas-sized.
pub struct RenderedOption {
    pub title: String,
    pub image: RgbImage,
}

/// The synchronous orchestrator. Owns the detector, the generation parameters
/// and the resolved label font.
pub struct OptimizerPipeline {
    detector: Box<dyn ObjectDetector>,
    config: GeneratorConfig,
    font: LabelFont,
}

impl OptimizerPipeline {
    pub fn new(detector: Box<dyn ObjectDetector>, config: GeneratorConfig) -> Self {
        Self {
            detector,
            config,
            font: LabelFont::resolve(),
        }
    }

    /// Runs the full pipeline: detect, rebuild, render. Results are ordered by
    /// rank, best candidate first.
    pub fn optimize(
        &self,
        image_bytes: &[u8],
        num_candidates: usize,
    ) -> Result<Vec<RenderedOption>, LayoutError> {
        let candidates = self.propose(image_bytes, num_candidates)?;
        info!("rendering {} layout option(s)", candidates.len());
        Ok(candidates
            .into_iter()
            .map(|candidate| self.render_candidate(candidate))
            .collect())
    }

    /// The non-rendering stages: validate the input bytes, detect objects,
    /// build the scene and generate ranked candidates.
    pub fn propose(
        &self,
        image_bytes: &[u8],
        num_candidates: usize,
    ) -> Result<Vec<CandidateLayout>, LayoutError> {
        if image_bytes.is_empty() {
            return Err(LayoutError::DetectionFailed(
                "empty image buffer".to_string(),
            ));
        }
        let decoded = image::load_from_memory(image_bytes).map_err(|e| {
            LayoutError::DetectionFailed(format!("could not decode input image: {e}"))
        })?;
        let (width, height) = (decoded.width(), decoded.height());

        info!("detecting objects in a {width}x{height} image");
        let detections = self.detector.detect(image_bytes)?;
        let scene = Scene::from_detections(width, height, detections)?;

        info!(
            "generating up to {num_candidates} layout option(s) for {} object(s)",
            scene.real_object_count()
        );
        let config = GeneratorConfig {
            num_candidates,
            ..self.config.clone()
        };
        generate_layouts(&scene, &config)
    }

    /// Rasterizes one candidate with the pipeline's resolved font.
    pub fn render_candidate(&self, candidate: CandidateLayout) -> RenderedOption {
        RenderedOption {
            image: render_scene(&candidate.scene, &self.font),
            title: candidate.title,
        }
    }

    /// Renders the unoptimized input arrangement, overlaps and all. Handy for
    /// showing "before" next to the generated options.
    pub fn render_input(&self, scene: &Scene) -> RgbImage {
        render_scene(scene, &self.font)
    }
}
