//! # Kerfline
//!
//! Parametric outline geometry and toolpath derivation for laser cutters,
//! pen plotters and small CNC routers.
//!
//! ## Architecture
//!
//! Kerfline is organized as a workspace with multiple crates:
//!
//! 1. **kerfline-core** - Error types and engine configuration
//! 2. **kerfline-designer** - Shapes, tessellation, stitching, offsets and corner rounding
//! 3. **kerfline** - This facade and the `kerfline` binary
//!
//! ## Features
//!
//! - **Parametric Shapes**: Rectangles, ovals, polygons, involute gears, splines
//! - **Flattening**: Curves to line segments at any output resolution
//! - **Toolpaths**: Inset and outset paths at a tool radius
//! - **Corner Rounding**: Square corners replaced by tangent arcs

pub use kerfline_designer as designer;

pub use kerfline_core::{ConfigError, DesignerError, EngineConfig, Error, Result};

pub use kerfline_designer::{
    flatten, offset, round_corners, stitch, stitch_lines, BooleanOp, BulgeVertex, ControlPoints,
    LineSegment, OffsetJoin, OffsetSide, Path, Placement, Point, Polyline, Segment, ShapeDocument,
    ShapeEntity, ShapeEvent, ShapeId, ShapeKind, ShapeStore, Stitcher, Tessellator, ToolpathId,
    ToolpathOffsetter,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support, `info` otherwise
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
