//! # Kerfline Designer
//!
//! Geometry engine that turns parametric shapes into the line segments and
//! toolpaths consumed by laser cutters, plotters and small CNC routers.
//!
//! ## Core Components
//!
//! ### Shapes
//! - **Model**: Rectangles, ovals, regular polygons, involute gears,
//!   splines, bulge polylines and imported paths, each with a placement
//!   and a cached path
//! - **Store**: Shapes in insertion order, derived toolpaths and change
//!   observers
//! - **Documents**: JSON persistence of shape parameters
//!
//! ### Geometry Pipeline
//! - **Tessellation**: Curves flattened to chords no longer than a tolerance
//! - **Splines**: Catmull-Rom control points fitted with cubic Béziers
//! - **Bulge arcs**: DXF-style bulge vertices converted to arcs
//! - **Stitching**: Loose fragments chained into maximal polylines
//! - **Offsetting**: Tool-radius inset and outset paths
//! - **Corner rounding**: Square corners filleted through area booleans
//!
//! ## Architecture
//!
//! ```text
//! ShapeStore
//!   ├── ShapeEntity (kind + placement, cached local and placed paths)
//!   │     └── Tessellator → Polylines → Stitcher
//!   └── ToolpathEntity (source shape, radius, side, join)
//!         └── ToolpathOffsetter
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kerfline_designer::{OffsetJoin, OffsetSide, Placement, ShapeEntity, ShapeKind, ShapeStore};
//!
//! let mut store = ShapeStore::new();
//! let id = store.add(ShapeEntity::new(ShapeKind::rectangle(40.0, 20.0), Placement::corner(0.0, 0.0)));
//! let cut = store.add_toolpath(id, 1.5, OffsetSide::Outset, OffsetJoin::Line)?;
//! let toolpath = store.toolpath_path(cut)?;
//! ```

pub mod bulge;
pub mod corners;
pub mod document;
pub mod geometry;
pub mod model;
pub mod offset;
pub mod ops;
pub mod spline;
pub mod stitch;
pub mod store;
pub mod tessellate;

pub use bulge::{bulge_polyline_to_path, flatten_bulge_polyline, BulgeArc, BulgeVertex};
pub use corners::{round_corners, Corner, CornerRounder};
pub use document::{DocumentMetadata, ShapeDocument, DOCUMENT_VERSION};
pub use geometry::{
    Bounds, LineSegment, Path, PathBuilder, Point, PointKey, Polyline, Segment, Subpath,
};
pub use model::{BuildSettings, Placement, ShapeEntity, ShapeId, ShapeKind};
pub use offset::{normalize_winding, offset, OffsetJoin, OffsetSide, ToolpathOffsetter};
pub use ops::{perform_boolean, BooleanOp};
pub use spline::{fit, ControlPoints};
pub use stitch::{stitch, stitch_lines, Stitcher};
pub use store::{
    ShapeEvent, ShapeObserver, ShapeStore, SubscriptionId, ToolpathEntity, ToolpathId,
};
pub use tessellate::{flatten, Tessellator};
