// THEORY:
// The `scene` module is the data model shared by every stage of the pipeline.
// A `Scene` is the set of typed, labeled rectangles sitting on one bounded
// canvas: either the noisy arrangement coming out of the detector or one
// candidate rearrangement produced by the packer.
//
// Key architectural principles:
// 1.  **Validation at the boundary**: labels must be unique and every box must
//     lie within the canvas. Both are checked in `add`, so a constructed scene
//     can always be rendered and scored without further bounds checks.
// 2.  **Overlap is input-legal, output-illegal**: a freshly detected scene may
//     contain overlapping boxes (clutter, double detections). Overlap-freedom
//     only becomes an invariant for scenes the generator emits, which is why
//     construction does not reject overlaps; their presence is precisely the
//     trigger for optimization.
// 3.  **Value semantics**: scenes are cheap, owned values. Every candidate
//     layout gets its own independent copy; nothing is shared or mutated after
//     generation.

use crate::core_modules::error::LayoutError;
use crate::core_modules::geometry::Rect;

/// The placement category of a detected object. `Space` marks explicitly empty
/// floor and is excluded from overlap checks and scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Storage,
    Workspace,
    Item,
    Space,
}

impl ObjectKind {
    /// Whether the object occupies floor for the purposes of overlap and scoring.
    pub fn is_real(&self) -> bool {
        !matches!(self, ObjectKind::Space)
    }
}

/// One labeled, typed rectangle on the canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedObject {
    pub label: String,
    pub bounds: Rect,
    pub kind: ObjectKind,
}

impl PlacedObject {
    pub fn new(label: impl Into<String>, bounds: Rect, kind: ObjectKind) -> Self {
        Self {
            label: label.into(),
            bounds,
            kind,
        }
    }
}

/// A full arrangement: canvas bounds plus an ordered sequence of objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scene {
    canvas_width: u32,
    canvas_height: u32,
    objects: Vec<PlacedObject>,
}

impl Scene {
    pub fn new(canvas_width: u32, canvas_height: u32) -> Self {
        Self {
            canvas_width,
            canvas_height,
            objects: Vec::new(),
        }
    }

    /// Builds a scene from raw detector output. Boxes may overlap each other;
    /// labels must be unique and every box must fit the canvas.
    pub fn from_detections(
        canvas_width: u32,
        canvas_height: u32,
        detections: Vec<PlacedObject>,
    ) -> Result<Self, LayoutError> {
        let mut scene = Scene::new(canvas_width, canvas_height);
        for object in detections {
            scene.add(object)?;
        }
        Ok(scene)
    }

    pub fn canvas_width(&self) -> u32 {
        self.canvas_width
    }

    pub fn canvas_height(&self) -> u32 {
        self.canvas_height
    }

    pub fn canvas_area(&self) -> u64 {
        self.canvas_width as u64 * self.canvas_height as u64
    }

    pub fn objects(&self) -> &[PlacedObject] {
        &self.objects
    }

    /// Adds an object, enforcing label uniqueness and canvas containment.
    pub fn add(&mut self, object: PlacedObject) -> Result<(), LayoutError> {
        if self.objects.iter().any(|o| o.label == object.label) {
            return Err(LayoutError::DuplicateLabel(object.label));
        }
        if !object.bounds.within(self.canvas_width, self.canvas_height) {
            return Err(LayoutError::OutOfBounds {
                label: object.label,
                width: self.canvas_width,
                height: self.canvas_height,
            });
        }
        self.objects.push(object);
        Ok(())
    }

    /// Scans all real objects other than `excluding` and returns the label of
    /// the first one whose box overlaps `candidate`. Used by the packer's
    /// placement search.
    pub fn overlaps_any(&self, candidate: &Rect, excluding: Option<&str>) -> Option<&str> {
        self.objects
            .iter()
            .filter(|o| o.kind.is_real())
            .filter(|o| excluding != Some(o.label.as_str()))
            .find(|o| o.bounds.overlaps(candidate))
            .map(|o| o.label.as_str())
    }

    /// Total floor area occupied by real objects.
    pub fn used_area(&self) -> u64 {
        self.objects
            .iter()
            .filter(|o| o.kind.is_real())
            .map(|o| o.bounds.area())
            .sum()
    }

    pub fn real_object_count(&self) -> usize {
        self.objects.iter().filter(|o| o.kind.is_real()).count()
    }

    /// Summed pairwise overlap area among real objects. Zero for a finalized
    /// candidate; positive for cluttered detector input.
    pub fn total_overlap_area(&self) -> u64 {
        let real: Vec<&PlacedObject> = self.objects.iter().filter(|o| o.kind.is_real()).collect();
        let mut total = 0;
        for i in 0..real.len() {
            for j in (i + 1)..real.len() {
                total += real[i].bounds.overlap_area(&real[j].bounds);
            }
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x1: u32, y1: u32, x2: u32, y2: u32) -> Rect {
        Rect::new(x1, y1, x2, y2).unwrap()
    }

    #[test]
    fn rejects_duplicate_labels() {
        let mut scene = Scene::new(500, 550);
        scene
            .add(PlacedObject::new(
                "Shelf A",
                rect(50, 50, 150, 250),
                ObjectKind::Storage,
            ))
            .unwrap();
        let err = scene
            .add(PlacedObject::new(
                "Shelf A",
                rect(200, 50, 300, 250),
                ObjectKind::Storage,
            ))
            .unwrap_err();
        assert!(matches!(err, LayoutError::DuplicateLabel(label) if label == "Shelf A"));
    }

    #[test]
    fn rejects_out_of_bounds_boxes_at_construction() {
        let result = Scene::from_detections(
            500,
            550,
            vec![PlacedObject::new(
                "Crate",
                rect(450, 500, 520, 560),
                ObjectKind::Item,
            )],
        );
        assert!(matches!(result, Err(LayoutError::OutOfBounds { .. })));
    }

    #[test]
    fn detector_input_may_overlap() {
        let scene = Scene::from_detections(
            500,
            550,
            vec![
                PlacedObject::new("Shelf A", rect(50, 50, 150, 250), ObjectKind::Storage),
                PlacedObject::new("Shelf B", rect(100, 100, 200, 300), ObjectKind::Storage),
            ],
        )
        .unwrap();
        assert_eq!(scene.total_overlap_area(), 2_500 * 3);
    }

    #[test]
    fn overlaps_any_reports_first_conflict_and_honors_exclusion() {
        let scene = Scene::from_detections(
            500,
            550,
            vec![
                PlacedObject::new("Shelf A", rect(50, 50, 150, 250), ObjectKind::Storage),
                PlacedObject::new("Gap", rect(200, 400, 300, 500), ObjectKind::Space),
            ],
        )
        .unwrap();

        let probe = rect(100, 100, 200, 200);
        assert_eq!(scene.overlaps_any(&probe, None), Some("Shelf A"));
        assert_eq!(scene.overlaps_any(&probe, Some("Shelf A")), None);

        // `Space` never participates in overlap checks.
        let over_gap = rect(210, 410, 290, 490);
        assert_eq!(scene.overlaps_any(&over_gap, None), None);
    }

    #[test]
    fn used_area_ignores_space() {
        let scene = Scene::from_detections(
            500,
            550,
            vec![
                PlacedObject::new("Shelf A", rect(50, 50, 150, 250), ObjectKind::Storage),
                PlacedObject::new("Gap", rect(200, 400, 300, 500), ObjectKind::Space),
            ],
        )
        .unwrap();
        assert_eq!(scene.used_area(), 20_000);
        assert_eq!(scene.real_object_count(), 1);
    }
}
