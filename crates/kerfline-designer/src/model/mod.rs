use lyon::geom::euclid::{vec2, Angle};
use lyon::geom::Transform;
use serde::{Deserialize, Serialize};
use tracing::trace;
use uuid::Uuid;

use kerfline_core::DesignerError;

use crate::bulge::{bulge_polyline_to_path, BulgeVertex};
use crate::geometry::{Bounds, Path, Point, Polyline};
use crate::spline::ControlPoints;
use crate::tessellate::Tessellator;

mod gear;
mod oval;
mod polygon;
mod rectangle;

pub use gear::build_spur_gear;
pub use oval::{build_oval, KAPPA};
pub use polygon::build_polygon;
pub use rectangle::build_rectangle;

/// Rotations smaller than this many degrees are skipped.
const ROTATION_EPSILON: f64 = 1e-9;

/// Offsets smaller than this are not worth recentering.
const RECENTER_EPSILON: f64 = 1e-12;

/// Chord tolerance for hit testing, in screen pixels.
const HIT_TEST_TOLERANCE_PX: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShapeId(pub Uuid);

impl ShapeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ShapeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ShapeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a shape sits in the design.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    /// Rotation in degrees about the shape's local origin
    #[serde(default)]
    pub rotation: f64,
    /// When false, (x, y) is the upper-left of the bounding box instead of
    /// the shape's center.
    #[serde(default = "default_centered")]
    pub centered: bool,
}

fn default_centered() -> bool {
    true
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            centered: true,
        }
    }
}

impl Placement {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ..Default::default()
        }
    }

    pub fn corner(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            rotation: 0.0,
            centered: false,
        }
    }

    /// Transform taking `local` into design space: rotate about the local
    /// origin, shift a non-centered shape so its rotated bounding box
    /// starts at the origin, then translate by (x, y).
    ///
    /// The result composes with group transforms through `then`/`pre_*`.
    pub fn transform(&self, local: &Path) -> Transform<f64> {
        let mut t = if self.rotation.abs() < ROTATION_EPSILON {
            Transform::identity()
        } else {
            Transform::rotation(Angle::degrees(self.rotation))
        };

        if !self.centered {
            if let Some(b) = local.transformed(&t).bounds() {
                t = t.then_translate(vec2(-b.min_x, -b.min_y));
            }
        }

        t.then_translate(vec2(self.x, self.y))
    }
}

/// Shape category and its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeKind {
    Rectangle {
        width: f64,
        height: f64,
        #[serde(default)]
        corner_radius: f64,
    },
    Oval {
        width: f64,
        height: f64,
    },
    Polygon {
        sides: usize,
        radius: f64,
    },
    Gear {
        module: f64,
        teeth: usize,
        #[serde(default = "default_pressure_angle")]
        pressure_angle: f64,
        #[serde(default)]
        hole_radius: f64,
    },
    Spline(ControlPoints),
    BulgePolyline {
        vertices: Vec<BulgeVertex>,
        closed: bool,
    },
    Imported(Path),
}

fn default_pressure_angle() -> f64 {
    20.0
}

/// Parameters of shape construction that are not part of a shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildSettings {
    /// Samples per involute flank, minus one
    pub involute_steps: usize,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self { involute_steps: 5 }
    }
}

impl ShapeKind {
    pub fn rectangle(width: f64, height: f64) -> Self {
        ShapeKind::Rectangle {
            width,
            height,
            corner_radius: 0.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle { .. } => "rectangle",
            ShapeKind::Oval { .. } => "oval",
            ShapeKind::Polygon { .. } => "polygon",
            ShapeKind::Gear { .. } => "gear",
            ShapeKind::Spline(_) => "spline",
            ShapeKind::BulgePolyline { .. } => "bulge_polyline",
            ShapeKind::Imported(_) => "imported",
        }
    }

    /// Builds the shape's local path, with no placement applied.
    pub fn build(&self, settings: &BuildSettings) -> Path {
        match self {
            ShapeKind::Rectangle {
                width,
                height,
                corner_radius,
            } => build_rectangle(*width, *height, *corner_radius),
            ShapeKind::Oval { width, height } => build_oval(*width, *height),
            ShapeKind::Polygon { sides, radius } => build_polygon(*sides, *radius),
            ShapeKind::Gear {
                module,
                teeth,
                pressure_angle,
                hole_radius,
            } => build_spur_gear(
                *module,
                *teeth,
                *pressure_angle,
                *hole_radius,
                settings.involute_steps,
            ),
            ShapeKind::Spline(points) => points.fit(),
            ShapeKind::BulgePolyline { vertices, closed } => {
                bulge_polyline_to_path(vertices, *closed)
            }
            ShapeKind::Imported(path) => path.clone(),
        }
    }

    /// Rejects parameters the builders cannot honour.
    pub fn validate(&self) -> Result<(), DesignerError> {
        fn positive(param: &str, value: f64) -> Result<(), DesignerError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(DesignerError::invalid(param, format!("must be positive, got {}", value)))
            }
        }

        match self {
            ShapeKind::Rectangle {
                width,
                height,
                corner_radius,
            } => {
                positive("width", *width)?;
                positive("height", *height)?;
                if *corner_radius < 0.0 {
                    return Err(DesignerError::invalid("corner_radius", "must not be negative"));
                }
                Ok(())
            }
            ShapeKind::Oval { width, height } => {
                positive("width", *width)?;
                positive("height", *height)
            }
            ShapeKind::Polygon { sides, radius } => {
                if *sides < 3 {
                    return Err(DesignerError::invalid("sides", "a polygon needs at least 3 sides"));
                }
                positive("radius", *radius)
            }
            ShapeKind::Gear {
                module,
                teeth,
                pressure_angle,
                hole_radius,
            } => {
                if *teeth < 3 {
                    return Err(DesignerError::invalid("teeth", "a gear needs at least 3 teeth"));
                }
                positive("module", *module)?;
                if !(0.0..45.0).contains(pressure_angle) {
                    return Err(DesignerError::invalid(
                        "pressure_angle",
                        "must be between 0 and 45 degrees",
                    ));
                }
                let root = module * *teeth as f64 / 2.0 - 1.25 * module;
                if *hole_radius < 0.0 || *hole_radius >= root {
                    return Err(DesignerError::invalid(
                        "hole_radius",
                        format!("must be between 0 and the root radius {:.3}", root),
                    ));
                }
                Ok(())
            }
            ShapeKind::Spline(_) | ShapeKind::BulgePolyline { .. } | ShapeKind::Imported(_) => Ok(()),
        }
    }
}

/// A placed, parametric shape with a cached path.
///
/// Parameters and placement are only reachable through setters, each of
/// which drops the affected cache, so a cached path always matches the
/// current parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeEntity {
    id: ShapeId,
    #[serde(default)]
    name: String,
    #[serde(default)]
    placement: Placement,
    kind: ShapeKind,
    #[serde(skip)]
    local: Option<Path>,
    #[serde(skip)]
    placed: Option<Path>,
}

impl PartialEq for ShapeEntity {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.placement == other.placement
            && self.kind == other.kind
    }
}

impl ShapeEntity {
    pub fn new(kind: ShapeKind, placement: Placement) -> Self {
        Self::with_id(ShapeId::new(), kind, placement)
    }

    pub fn with_id(id: ShapeId, kind: ShapeKind, placement: Placement) -> Self {
        Self {
            id,
            name: kind.name().to_string(),
            placement,
            kind,
            local: None,
            placed: None,
        }
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    pub fn is_cached(&self) -> bool {
        self.placed.is_some()
    }

    pub fn set_kind(&mut self, kind: ShapeKind) {
        self.kind = kind;
        self.invalidate();
    }

    /// Applies every write of one logical edit, then invalidates once.
    pub fn edit_kind<R>(&mut self, edit: impl FnOnce(&mut ShapeKind) -> R) -> R {
        let result = edit(&mut self.kind);
        self.invalidate();
        result
    }

    pub fn set_position(&mut self, x: f64, y: f64) {
        self.placement.x = x;
        self.placement.y = y;
        self.placed = None;
    }

    pub fn set_rotation(&mut self, degrees: f64) {
        self.placement.rotation = degrees;
        self.placed = None;
    }

    pub fn set_centered(&mut self, centered: bool) {
        self.placement.centered = centered;
        self.placed = None;
    }

    pub fn set_placement(&mut self, placement: Placement) {
        self.placement = placement;
        self.placed = None;
    }

    /// Drops both cache levels.
    pub fn invalidate(&mut self) {
        self.local = None;
        self.placed = None;
    }

    /// Built path recentered on its bounding-box center, before placement.
    pub fn local_path(&mut self) -> &Path {
        let kind = &self.kind;
        self.local.get_or_insert_with(|| {
            trace!("Building {} shape", kind.name());
            let built = kind.build(&BuildSettings::default());
            match built.bounds() {
                Some(b) if b.center().length() > RECENTER_EPSILON => {
                    let c = b.center();
                    built.translated(-c.x, -c.y)
                }
                _ => built,
            }
        })
    }

    /// Placed path in design space, rebuilt only after an invalidation.
    pub fn path(&mut self) -> &Path {
        if self.placed.is_none() {
            let placement = self.placement;
            let local = self.local_path();
            let placed = local.transformed(&placement.transform(local));
            self.placed = Some(placed);
        }
        self.placed.get_or_insert_with(Path::new)
    }

    pub fn bounds(&mut self) -> Option<Bounds> {
        self.path().bounds()
    }

    pub fn flatten(&mut self, scale: f64, tolerance: f64) -> Vec<Polyline> {
        Tessellator::new(tolerance).flatten(self.path(), scale)
    }

    /// True when `point` (design units) is within `threshold_px` screen
    /// pixels of the outline drawn at `scale` pixels per unit.
    pub fn hit_test(&mut self, point: Point, scale: f64, threshold_px: f64) -> bool {
        let screen = point.scaled(scale);
        self.flatten(scale, HIT_TEST_TOLERANCE_PX)
            .iter()
            .any(|pl| pl.distance_to_point(&screen) <= threshold_px)
    }

    pub fn to_lyon_path(&mut self) -> lyon::path::Path {
        self.path().to_lyon()
    }
}
