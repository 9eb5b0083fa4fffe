use crate::pipeline::{
    GeneratorConfig, LayoutError, ObjectDetector, OptimizerPipeline, RenderedOption,
};
use futures::stream::{self, StreamExt};
use std::sync::Arc;

/// Upper bound on concurrent render workers; small scenes saturate quickly.
const MAX_RENDER_WORKERS: usize = 4;

/// An `OptimizerPipeline` whose rendering stage runs on a worker pool.
pub struct ParallelPipeline {
    inner: Arc<OptimizerPipeline>,
}

impl ParallelPipeline {
    pub fn new(detector: Box<dyn ObjectDetector>, config: GeneratorConfig) -> Self {
        Self {
            inner: Arc::new(OptimizerPipeline::new(detector, config)),
        }
    }

    /// Same contract as `OptimizerPipeline::optimize`: ranked options, best
    /// first, or the first stage error. Only rendering is concurrent.
    pub async fn optimize(
        &self,
        image_bytes: &[u8],
        num_candidates: usize,
    ) -> Result<Vec<RenderedOption>, LayoutError> {
        // Detection, scene building and generation are sequential CPU stages.
        let candidates = self.inner.propose(image_bytes, num_candidates)?;

        let workers = num_cpus::get().clamp(1, MAX_RENDER_WORKERS);
        let rendered = stream::iter(candidates.into_iter().map(|candidate| {
            let inner = Arc::clone(&self.inner);
            async move {
                tokio::task::spawn_blocking(move || inner.render_candidate(candidate))
                    .await
                    .expect("render worker panicked")
            }
        }))
        // `buffered` yields in submission order, so rank order survives
        // whatever order the workers finish in.
        .buffered(workers)
        .collect::<Vec<_>>()
        .await;

        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{ObjectKind, PlacedObject, Rect, StaticDetector};
    use image::{DynamicImage, ImageFormat, Rgb};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            width,
            height,
            Rgb([255, 255, 255]),
        ));
        let mut buffer = Cursor::new(Vec::new());
        image.write_to(&mut buffer, ImageFormat::Png).unwrap();
        buffer.into_inner()
    }

    fn rect(x1: u32, y1: u32, x2: u32, y2: u32) -> Rect {
        Rect::new(x1, y1, x2, y2).unwrap()
    }

    fn reference_detections() -> Vec<PlacedObject> {
        vec![
            PlacedObject::new("Shelf A", rect(50, 50, 150, 250), ObjectKind::Storage),
            PlacedObject::new("Shelf B", rect(50, 300, 150, 500), ObjectKind::Storage),
            PlacedObject::new("Workbench", rect(200, 150, 300, 350), ObjectKind::Workspace),
            PlacedObject::new("Crate 1", rect(350, 400, 400, 450), ObjectKind::Item),
            PlacedObject::new("Crate 2", rect(350, 460, 400, 510), ObjectKind::Item),
        ]
    }

    #[tokio::test]
    async fn matches_the_synchronous_pipeline() {
        let parallel = ParallelPipeline::new(
            Box::new(StaticDetector::new(reference_detections())),
            GeneratorConfig::default(),
        );
        let sequential = OptimizerPipeline::new(
            Box::new(StaticDetector::new(reference_detections())),
            GeneratorConfig::default(),
        );

        let bytes = png_bytes(500, 550);
        let concurrent = parallel.optimize(&bytes, 8).await.unwrap();
        let reference = sequential.optimize(&bytes, 8).unwrap();

        assert_eq!(concurrent.len(), reference.len());
        for (a, b) in concurrent.iter().zip(reference.iter()) {
            assert_eq!(a.title, b.title);
            assert_eq!(a.image.as_raw(), b.image.as_raw());
        }
    }

    #[tokio::test]
    async fn rank_order_is_preserved() {
        let parallel = ParallelPipeline::new(
            Box::new(StaticDetector::new(reference_detections())),
            GeneratorConfig::default(),
        );
        let options = parallel.optimize(&png_bytes(500, 550), 4).await.unwrap();
        assert_eq!(options[0].title, "Option 1 (Recommended)");
        for (rank, option) in options.iter().enumerate().skip(1) {
            assert_eq!(option.title, format!("Option {}", rank + 1));
        }
    }

    #[tokio::test]
    async fn stage_errors_propagate_unchanged() {
        let parallel = ParallelPipeline::new(
            Box::new(StaticDetector::new(Vec::new())),
            GeneratorConfig::default(),
        );
        assert!(matches!(
            parallel.optimize(&png_bytes(500, 550), 2).await,
            Err(LayoutError::EmptyScene)
        ));
    }
}
