// THEORY:
// The `renderer` module is the deterministic Scene -> raster mapping at the
// end of the pipeline. Determinism is the whole point: the same scene and the
// same resolved font always produce pixel-identical output, which is what
// makes candidate images comparable and the renderer testable.
//
// The visual language is fixed: one color per object kind, a neutral
// background, a 2 pixel black border per box and the object's label in white
// near the top-left corner. Objects are drawn in scene order, so later objects
// paint over earlier ones, which only matters for the unoptimized input
// scene, where detector boxes may overlap.

use crate::core_modules::font::LabelFont;
use crate::core_modules::scene::{ObjectKind, Scene};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect as PixelRect;

const BACKGROUND: Rgb<u8> = Rgb([0xf0, 0xf2, 0xf6]);
const STORAGE_COLOR: Rgb<u8> = Rgb([0x4a, 0x90, 0xe2]);
const WORKSPACE_COLOR: Rgb<u8> = Rgb([0xe2, 0xa3, 0x4a]);
const ITEM_COLOR: Rgb<u8> = Rgb([0xa2, 0xa2, 0xa2]);
const SPACE_COLOR: Rgb<u8> = Rgb([0x50, 0xe3, 0xc2]);
const BORDER_COLOR: Rgb<u8> = Rgb([0, 0, 0]);
const LABEL_COLOR: Rgb<u8> = Rgb([0xff, 0xff, 0xff]);

const BORDER_WIDTH: u32 = 2;
const LABEL_OFFSET: u32 = 5;

fn kind_color(kind: ObjectKind) -> Rgb<u8> {
    match kind {
        ObjectKind::Storage => STORAGE_COLOR,
        ObjectKind::Workspace => WORKSPACE_COLOR,
        ObjectKind::Item => ITEM_COLOR,
        ObjectKind::Space => SPACE_COLOR,
    }
}

/// Rasterizes a scene onto its own canvas. Infallible: every object in a
/// constructed scene is in bounds, and the font was already resolved.
pub fn render_scene(scene: &Scene, font: &LabelFont) -> RgbImage {
    let mut image = RgbImage::from_pixel(scene.canvas_width(), scene.canvas_height(), BACKGROUND);

    for object in scene.objects() {
        let b = &object.bounds;
        let fill = PixelRect::at(b.x1 as i32, b.y1 as i32).of_size(b.width(), b.height());
        draw_filled_rect_mut(&mut image, fill, kind_color(object.kind));

        // 2 pixel border: two nested hollow rectangles.
        for inset in 0..BORDER_WIDTH {
            if b.width() > 2 * inset && b.height() > 2 * inset {
                let border = PixelRect::at((b.x1 + inset) as i32, (b.y1 + inset) as i32)
                    .of_size(b.width() - 2 * inset, b.height() - 2 * inset);
                draw_hollow_rect_mut(&mut image, border, BORDER_COLOR);
            }
        }

        font.draw(
            &mut image,
            LABEL_COLOR,
            b.x1 + LABEL_OFFSET,
            b.y1 + LABEL_OFFSET,
            &object.label,
        );
    }

    image
}
