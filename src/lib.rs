// THEORY:
// This file is the main entry point for the `space_optimizer` library crate.
// It follows the standard Rust convention of using `lib.rs` to define the
// public API that will be exposed to external consumers (a CLI, a web shell,
// or any other presentation layer).
//
// The primary goal is to export the `OptimizerPipeline` and its associated
// data structures (`GeneratorConfig`, `RenderedOption`, the `ObjectDetector`
// trait) as the clean, high-level interface for the whole engine. The internal
// modules (`core_modules`) carry the geometry, the scene model, the packer and
// the renderer, and are encapsulated behind the pipeline re-exports.

pub mod core_modules;
pub mod parallel_pipeline;
pub mod pipeline;
