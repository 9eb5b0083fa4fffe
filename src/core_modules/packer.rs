// THEORY:
// The `packer` module is the heart of the optimization engine. It takes one
// noisy, possibly overlapping scene and constructs several alternative
// arrangements of the same objects, each one deterministic and overlap-free
// whenever the canvas allows it.
//
// Key architectural principles:
// 1.  **Constructive placement**: each candidate is built object by object with
//     a shelf/skyline cursor per zone, largest objects first. Packing the big
//     boxes early reduces fragmentation, the classic bin-packing ordering.
// 2.  **Strategy variation, not randomness**: candidate `i` varies the wall the
//     storage partition anchors to (rotating through the four canvas edges) and
//     the packing direction for loose items (row-major vs column-major). The
//     same input always yields the same ordered candidates, which is what makes
//     the engine testable.
// 3.  **Zoning**: storage hugs its anchor wall, items cluster in the band next
//     to the storage strip, workspaces take the remaining interior with a
//     clearance margin around them.
// 4.  **No object is ever dropped**: when no free slot exists, the object is
//     placed at the in-bounds position that minimizes overlap with what is
//     already down, and the candidate is marked partial. A partial candidate is
//     penalized by the scorer so it always ranks below a clean one of equal
//     used area, but it is still complete and renderable.

use crate::core_modules::error::LayoutError;
use crate::core_modules::geometry::Rect;
use crate::core_modules::scene::{ObjectKind, PlacedObject, Scene};
use log::debug;

/// Overlap area is scaled by this weight when scoring, so any clean candidate
/// outranks an overlapping one of equal used area.
const OVERLAP_PENALTY_WEIGHT: f64 = 2.0;
/// Cursor advance when a shelf slot collides with an already-placed object.
const PROBE_STEP: u32 = 5;
/// Grid step for the best-effort fallback scan.
const FALLBACK_SCAN_STEP: u32 = 5;

/// Where a kind of object prefers to be placed on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZonePreference {
    /// Packed into the strip along the candidate's anchor wall.
    AnchorWall,
    /// Packed into the band adjacent to the storage strip.
    NearStorage,
    /// Packed into the remaining interior, with margin clearance around it.
    InteriorClearance,
}

/// The kind-to-preference mapping the generator zones by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoningRules {
    pub storage: ZonePreference,
    pub workspace: ZonePreference,
    pub item: ZonePreference,
}

impl Default for ZoningRules {
    fn default() -> Self {
        Self {
            storage: ZonePreference::AnchorWall,
            workspace: ZonePreference::InteriorClearance,
            item: ZonePreference::NearStorage,
        }
    }
}

/// Tunable parameters for a generation run.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// How many candidate layouts to attempt. At least 1.
    pub num_candidates: usize,
    /// Free space kept between neighbouring objects, in canvas units.
    pub margin: u32,
    pub zoning: ZoningRules,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            num_candidates: 2,
            margin: 10,
            zoning: ZoningRules::default(),
        }
    }
}

/// One proposed rearrangement, immutable once generated.
#[derive(Debug, Clone)]
pub struct CandidateLayout {
    /// Human-readable title assigned by rank ("Option 1 (Recommended)", ...).
    pub title: String,
    pub scene: Scene,
    /// `used_area / canvas_area` minus the weighted overlap penalty.
    pub score: f64,
    /// True when at least one object had to fall back to an overlapping slot.
    pub partial: bool,
}

/// The canvas edge a storage partition is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AnchorWall {
    Left,
    Right,
    Top,
    Bottom,
}

const WALLS: [AnchorWall; 4] = [
    AnchorWall::Left,
    AnchorWall::Right,
    AnchorWall::Top,
    AnchorWall::Bottom,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PackDirection {
    RowMajor,
    ColumnMajor,
}

/// The deterministic placement recipe for one candidate index.
#[derive(Debug, Clone, Copy)]
struct PlacementStrategy {
    wall: AnchorWall,
    item_direction: PackDirection,
}

impl PlacementStrategy {
    fn for_candidate(index: usize) -> Self {
        let item_direction = if (index / WALLS.len()) % 2 == 0 {
            PackDirection::RowMajor
        } else {
            PackDirection::ColumnMajor
        };
        Self {
            wall: WALLS[index % WALLS.len()],
            item_direction,
        }
    }
}

/// A rectangular placement region in final canvas coordinates. The mirror
/// flags anchor the packing cursor to the far edge of the zone, which is how
/// right- and bottom-wall strategies are expressed with a single cursor walk.
struct Zone {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
    mirror_x: bool,
    mirror_y: bool,
    /// Extra clearance kept around every object placed in this zone.
    padding: u32,
}

impl Zone {
    fn width(&self) -> u32 {
        self.x1 - self.x0
    }

    fn height(&self) -> u32 {
        self.y1 - self.y0
    }

    /// Maps a position in the zone's packing frame (origin at the anchored
    /// corner) to final canvas coordinates for an object of the given size.
    fn finalize(&self, u: u32, v: u32, w: u32, h: u32) -> (u32, u32) {
        let x = if self.mirror_x {
            self.x1 - u - w
        } else {
            self.x0 + u
        };
        let y = if self.mirror_y {
            self.y1 - v - h
        } else {
            self.y0 + v
        };
        (x, y)
    }
}

/// Generates up to `num_candidates` alternative arrangements of `scene`,
/// ranked by score descending. Strategies that reproduce an earlier
/// candidate's scene are discarded, so fewer candidates may be returned.
///
/// # Errors
/// `EmptyScene` when the input holds no real objects. Generation itself never
/// fails for a non-empty scene.
pub fn generate_layouts(
    scene: &Scene,
    config: &GeneratorConfig,
) -> Result<Vec<CandidateLayout>, LayoutError> {
    if scene.real_object_count() == 0 {
        return Err(LayoutError::EmptyScene);
    }

    // --- 1. Partition & Prioritize ---
    // Split real objects by kind and order each partition by descending area.
    // Sorting is stable, so equal-area objects keep their detection order.
    let mut storage = partition(scene, ObjectKind::Storage);
    let mut workspaces = partition(scene, ObjectKind::Workspace);
    let mut items = partition(scene, ObjectKind::Item);
    for group in [&mut storage, &mut workspaces, &mut items] {
        group.sort_by_key(|o| std::cmp::Reverse(o.bounds.area()));
    }

    // --- 2. Candidate Construction ---
    let attempts = config.num_candidates.max(1);
    let mut candidates: Vec<CandidateLayout> = Vec::with_capacity(attempts);
    for index in 0..attempts {
        let strategy = PlacementStrategy::for_candidate(index);
        let (candidate, partial) =
            build_candidate(scene, &strategy, config, &storage, &workspaces, &items);

        // Strategies cycle after all wall/direction combinations are used; a
        // repeat produces an identical scene and adds nothing to the ranking.
        if candidates.iter().any(|c| c.scene == candidate) {
            debug!("strategy {index} duplicates an earlier candidate, skipping");
            continue;
        }

        let score = score_scene(&candidate);
        candidates.push(CandidateLayout {
            title: String::new(),
            scene: candidate,
            score,
            partial,
        });
    }

    // --- 3. Ranking ---
    // Stable sort: ties keep generation order. Titles are assigned by rank,
    // never by strategy index.
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    for (rank, candidate) in candidates.iter_mut().enumerate() {
        candidate.title = if rank == 0 {
            "Option 1 (Recommended)".to_string()
        } else {
            format!("Option {}", rank + 1)
        };
    }

    Ok(candidates)
}

fn partition(scene: &Scene, kind: ObjectKind) -> Vec<PlacedObject> {
    scene
        .objects()
        .iter()
        .filter(|o| o.kind == kind)
        .cloned()
        .collect()
}

/// Builds one candidate scene under the given strategy. Returns the scene and
/// whether any object required the best-effort fallback.
fn build_candidate(
    input: &Scene,
    strategy: &PlacementStrategy,
    config: &GeneratorConfig,
    storage: &[PlacedObject],
    workspaces: &[PlacedObject],
    items: &[PlacedObject],
) -> (Scene, bool) {
    let w = input.canvas_width();
    let h = input.canvas_height();
    let margin = config.margin;
    let mut candidate = Scene::new(w, h);
    let mut partial = false;

    // Depth of the storage strip: the largest storage extent perpendicular to
    // the anchor wall.
    let depth = storage
        .iter()
        .map(|o| match strategy.wall {
            AnchorWall::Left | AnchorWall::Right => o.bounds.width(),
            AnchorWall::Top | AnchorWall::Bottom => o.bounds.height(),
        })
        .max()
        .unwrap_or(0);

    // The strip along the anchor wall, packed parallel to the wall.
    let (wall_zone, wall_dir) = match strategy.wall {
        AnchorWall::Left => (
            zone(0, 0, depth.min(w), h, false, false, 0),
            PackDirection::ColumnMajor,
        ),
        AnchorWall::Right => (
            zone(w.saturating_sub(depth), 0, w, h, true, false, 0),
            PackDirection::ColumnMajor,
        ),
        AnchorWall::Top => (
            zone(0, 0, w, depth.min(h), false, false, 0),
            PackDirection::RowMajor,
        ),
        AnchorWall::Bottom => (
            zone(0, h.saturating_sub(depth), w, h, false, true, 0),
            PackDirection::RowMajor,
        ),
    };

    // The rest of the canvas, anchored on the side touching the storage strip.
    let offset = if storage.is_empty() { 0 } else { depth + margin };
    let near_zone = match strategy.wall {
        AnchorWall::Left => zone(offset.min(w), 0, w, h, false, false, 0),
        AnchorWall::Right => zone(0, 0, w.saturating_sub(offset), h, true, false, 0),
        AnchorWall::Top => zone(0, offset.min(h), w, h, false, false, 0),
        AnchorWall::Bottom => zone(0, 0, w, h.saturating_sub(offset), false, true, 0),
    };

    // The remaining interior, anchored away from storage so interior objects
    // do not fight the near-storage band for the same corner, with `margin`
    // clearance kept around each object. A deep storage strip can swallow the
    // whole canvas; `zone` clamps the far edges so the region degenerates to
    // zero size instead of inverting.
    let interior_zone = zone(
        (near_zone.x0 + margin).min(w),
        (near_zone.y0 + margin).min(h),
        near_zone.x1.saturating_sub(margin),
        near_zone.y1.saturating_sub(margin),
        !near_zone.mirror_x,
        !near_zone.mirror_y,
        margin,
    );

    // Packing priority is fixed (storage, items, workspaces); the zoning rules
    // decide which region each partition lands in.
    for (objects, preference) in [
        (storage, config.zoning.storage),
        (items, config.zoning.item),
        (workspaces, config.zoning.workspace),
    ] {
        let (target, direction) = match preference {
            ZonePreference::AnchorWall => (&wall_zone, wall_dir),
            ZonePreference::NearStorage => (&near_zone, strategy.item_direction),
            ZonePreference::InteriorClearance => (&interior_zone, PackDirection::RowMajor),
        };
        partial |= !pack_zone(&mut candidate, target, objects, direction, margin);
    }

    (candidate, partial)
}

fn zone(x0: u32, y0: u32, x1: u32, y1: u32, mirror_x: bool, mirror_y: bool, padding: u32) -> Zone {
    Zone {
        x0,
        y0,
        x1: x1.max(x0),
        y1: y1.max(y0),
        mirror_x,
        mirror_y,
        padding,
    }
}

/// Shelf-packs `objects` into `zone`, walking a cursor in the zone's packing
/// frame and skipping slots that collide with anything already in `candidate`.
/// Objects that fit nowhere are handed to the fallback. Returns false when any
/// object needed the fallback.
fn pack_zone(
    candidate: &mut Scene,
    zone: &Zone,
    objects: &[PlacedObject],
    direction: PackDirection,
    margin: u32,
) -> bool {
    let mut clean = true;
    let mut u: u32 = 0;
    let mut v: u32 = 0;
    let mut shelf: u32 = 0;

    for object in objects {
        let w = object.bounds.width() + 2 * zone.padding;
        let h = object.bounds.height() + 2 * zone.padding;
        let placed = if w > zone.width() || h > zone.height() {
            false
        } else {
            try_shelf_place(candidate, zone, object, direction, margin, &mut u, &mut v, &mut shelf)
        };

        if !placed {
            place_best_effort(candidate, object);
            clean = false;
        }
    }
    clean
}

/// Advances the shelf cursor until a collision-free slot is found for
/// `object`, placing it and returning true, or returns false once the zone is
/// exhausted. The cursor state persists across objects of the same zone.
#[allow(clippy::too_many_arguments)]
fn try_shelf_place(
    candidate: &mut Scene,
    zone: &Zone,
    object: &PlacedObject,
    direction: PackDirection,
    margin: u32,
    u: &mut u32,
    v: &mut u32,
    shelf: &mut u32,
) -> bool {
    let w = object.bounds.width() + 2 * zone.padding;
    let h = object.bounds.height() + 2 * zone.padding;

    loop {
        // Wrap to the next shelf when the current one cannot hold the object.
        match direction {
            PackDirection::RowMajor => {
                if *u + w > zone.width() {
                    *u = 0;
                    // Advance by at least one unit so a conflicted empty shelf
                    // cannot stall the cursor.
                    *v += (*shelf + margin).max(1);
                    *shelf = 0;
                }
                if *v + h > zone.height() {
                    return false;
                }
            }
            PackDirection::ColumnMajor => {
                if *v + h > zone.height() {
                    *v = 0;
                    *u += (*shelf + margin).max(1);
                    *shelf = 0;
                }
                if *u + w > zone.width() {
                    return false;
                }
            }
        }

        let (x, y) = zone.finalize(*u, *v, w, h);
        // The padded footprint is what must stay clear; the object itself is
        // placed inset by the zone's padding.
        let footprint = Rect {
            x1: x,
            y1: y,
            x2: x + w,
            y2: y + h,
        };
        let slot = object.bounds.translated(x + zone.padding, y + zone.padding);
        if candidate.overlaps_any(&footprint, None).is_none() {
            // Scene::add cannot fail here: the slot is in bounds by cursor
            // arithmetic and labels are unique in the validated input.
            let _ = candidate.add(PlacedObject::new(object.label.clone(), slot, object.kind));
            match direction {
                PackDirection::RowMajor => {
                    *u += w + margin;
                    *shelf = (*shelf).max(h);
                }
                PackDirection::ColumnMajor => {
                    *v += h + margin;
                    *shelf = (*shelf).max(w);
                }
            }
            return true;
        }

        // Occupied: probe further along the shelf.
        match direction {
            PackDirection::RowMajor => *u += PROBE_STEP,
            PackDirection::ColumnMajor => *v += PROBE_STEP,
        }
    }
}

/// Best-effort fallback: scan the whole canvas on a coarse grid and place the
/// object at the in-bounds position with the least summed overlap against what
/// is already placed. The object is never dropped.
fn place_best_effort(candidate: &mut Scene, object: &PlacedObject) {
    let w = object.bounds.width();
    let h = object.bounds.height();
    let max_x = candidate.canvas_width().saturating_sub(w);
    let max_y = candidate.canvas_height().saturating_sub(h);

    let mut best = (0u32, 0u32);
    let mut best_overlap = u64::MAX;
    let mut y = 0;
    loop {
        let mut x = 0;
        loop {
            let probe = object.bounds.translated(x, y);
            let overlap: u64 = candidate
                .objects()
                .iter()
                .filter(|o| o.kind.is_real())
                .map(|o| o.bounds.overlap_area(&probe))
                .sum();
            if overlap < best_overlap {
                best_overlap = overlap;
                best = (x, y);
                if overlap == 0 {
                    break;
                }
            }
            if x == max_x {
                break;
            }
            // Clamp so the final column at `max_x` is always probed, even when
            // the range is not a multiple of the step.
            x = (x + FALLBACK_SCAN_STEP).min(max_x);
        }
        if best_overlap == 0 || y == max_y {
            break;
        }
        y = (y + FALLBACK_SCAN_STEP).min(max_y);
    }

    let slot = object.bounds.translated(best.0, best.1);
    let _ = candidate.add(PlacedObject::new(object.label.clone(), slot, object.kind));
}

/// Space-utilization score: used fraction of the canvas minus the weighted
/// overlap fraction. Clean candidates score in `(0, 1]`; overlapping ones are
/// pushed down by the penalty.
fn score_scene(scene: &Scene) -> f64 {
    let canvas = scene.canvas_area() as f64;
    let used = scene.used_area() as f64 / canvas;
    let overlap = scene.total_overlap_area() as f64 / canvas;
    used - OVERLAP_PENALTY_WEIGHT * overlap
}
