// This file is an example of how to use the `space_optimizer` library.
// It plays the role the interactive front-end would: it feeds an image into
// the pipeline with a manual-annotation detector and writes every proposed
// layout next to the current directory.

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use space_optimizer::pipeline::{
    GeneratorConfig, ObjectKind, OptimizerPipeline, PlacedObject, Rect, StaticDetector,
};
use std::io::Cursor;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    println!("Space Optimizer - Example Runner");

    // In a real deployment the bytes come from an upload or a camera; here a
    // blank 500x550 canvas stands in for the photograph.
    let photo = DynamicImage::ImageRgb8(RgbImage::from_pixel(500, 550, Rgb([255, 255, 255])));
    let mut image_bytes = Cursor::new(Vec::new());
    photo.write_to(&mut image_bytes, ImageFormat::Png)?;

    // A manual annotation of the scene, the simplest detector implementation.
    let detector = StaticDetector::new(vec![
        PlacedObject::new("Shelf A", Rect::new(50, 50, 150, 250)?, ObjectKind::Storage),
        PlacedObject::new("Shelf B", Rect::new(50, 300, 150, 500)?, ObjectKind::Storage),
        PlacedObject::new(
            "Workbench",
            Rect::new(200, 150, 300, 350)?,
            ObjectKind::Workspace,
        ),
        PlacedObject::new("Crate 1", Rect::new(350, 400, 400, 450)?, ObjectKind::Item),
        PlacedObject::new("Crate 2", Rect::new(350, 460, 400, 510)?, ObjectKind::Item),
        PlacedObject::new(
            "Open Floor",
            Rect::new(200, 400, 300, 500)?,
            ObjectKind::Space,
        ),
    ]);

    let pipeline = OptimizerPipeline::new(Box::new(detector), GeneratorConfig::default());
    let options = pipeline.optimize(&image_bytes.into_inner(), 2)?;

    for (rank, option) in options.iter().enumerate() {
        let path = format!("option_{}.png", rank + 1);
        option.image.save(&path)?;
        println!("{} -> {path}", option.title);
    }

    Ok(())
}
