// Every failure the engine can produce is a local, recoverable condition, so
// they are modeled as a single library-wide error enum that the orchestrator
// propagates unchanged. The generator and renderer are designed to never fail
// once they hold a valid scene; the taxonomy below is the complete set of
// ways into an `Err`.

use thiserror::Error;

/// The complete failure taxonomy of the optimization engine.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// A rectangle whose corners are not strictly ordered (`x1 >= x2` or `y1 >= y2`).
    #[error("invalid geometry: ({x1}, {y1}, {x2}, {y2}) is not a well-formed rectangle")]
    InvalidGeometry { x1: u32, y1: u32, x2: u32, y2: u32 },

    /// An object whose box does not lie within the scene's canvas.
    #[error("object '{label}' does not fit within the {width}x{height} canvas")]
    OutOfBounds {
        label: String,
        width: u32,
        height: u32,
    },

    /// Two objects in the same scene carry the same label.
    #[error("duplicate object label '{0}' in scene")]
    DuplicateLabel(String),

    /// A scene with zero real objects has nothing to optimize.
    #[error("scene contains no real objects to optimize")]
    EmptyScene,

    /// The detector collaborator could not produce objects from the input image.
    #[error("object detection failed: {0}")]
    DetectionFailed(String),
}
