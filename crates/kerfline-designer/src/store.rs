//! Shape store with dependent toolpaths and change observers.
//!
//! Entities are kept in insertion order. Invalidating a shape clears its
//! cache and every toolpath derived from it, then synchronously calls each
//! observer registered for that shape.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use kerfline_core::{DesignerError, EngineConfig, Result};

use crate::geometry::{Path, Point, Polyline};
use crate::model::{ShapeEntity, ShapeId};
use crate::offset::{OffsetJoin, OffsetSide, ToolpathOffsetter};

/// Subscription handle for unsubscribing an observer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", &self.0.to_string()[..8])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolpathId(pub Uuid);

impl ToolpathId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ToolpathId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ToolpathId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What an observer is told.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeEvent {
    Invalidated(ShapeId),
    Removed(ShapeId),
    ToolpathInvalidated { toolpath: ToolpathId, source: ShapeId },
}

/// Observers run on the thread that invalidates and are never sent across
/// threads.
pub type ShapeObserver = Box<dyn FnMut(&ShapeEvent)>;

/// A tool-radius offset of a source shape, built on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolpathEntity {
    id: ToolpathId,
    source: ShapeId,
    radius: f64,
    #[serde(default)]
    side: OffsetSide,
    #[serde(default)]
    join: OffsetJoin,
    #[serde(skip)]
    cached: Option<Path>,
}

impl PartialEq for ToolpathEntity {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.source == other.source
            && self.radius == other.radius
            && self.side == other.side
            && self.join == other.join
    }
}

impl ToolpathEntity {
    pub fn new(source: ShapeId, radius: f64, side: OffsetSide, join: OffsetJoin) -> Self {
        Self {
            id: ToolpathId::new(),
            source,
            radius,
            side,
            join,
            cached: None,
        }
    }

    pub fn id(&self) -> ToolpathId {
        self.id
    }

    pub fn source(&self) -> ShapeId {
        self.source
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn side(&self) -> OffsetSide {
        self.side
    }

    pub fn join(&self) -> OffsetJoin {
        self.join
    }

    pub fn is_cached(&self) -> bool {
        self.cached.is_some()
    }
}

#[derive(Default)]
pub struct ShapeStore {
    shapes: HashMap<ShapeId, ShapeEntity>,
    order: Vec<ShapeId>,
    toolpaths: HashMap<ToolpathId, ToolpathEntity>,
    toolpath_order: Vec<ToolpathId>,
    observers: HashMap<ShapeId, Vec<(SubscriptionId, ShapeObserver)>>,
    config: EngineConfig,
}

impl std::fmt::Debug for ShapeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapeStore")
            .field("shapes", &self.order.len())
            .field("toolpaths", &self.toolpath_order.len())
            .field("observers", &self.subscriber_count())
            .field("config", &self.config)
            .finish()
    }
}

impl ShapeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.shapes.contains_key(&id)
    }

    /// Adds a shape. A shape with the same id is replaced in place, which
    /// counts as an edit of that shape: its toolpaths are cleared and its
    /// observers notified.
    pub fn add(&mut self, entity: ShapeEntity) -> ShapeId {
        let id = entity.id();
        if self.shapes.insert(id, entity).is_none() {
            self.order.push(id);
            debug!("Added shape {}", id);
        } else {
            debug!("Replaced shape {}", id);
            self.propagate(id);
        }
        id
    }

    pub fn get(&self, id: ShapeId) -> Result<&ShapeEntity> {
        self.shapes.get(&id).ok_or_else(|| unknown_shape(id))
    }

    /// Shapes in insertion order.
    pub fn shapes(&self) -> impl Iterator<Item = &ShapeEntity> {
        self.order.iter().filter_map(|id| self.shapes.get(id))
    }

    pub fn ids(&self) -> &[ShapeId] {
        &self.order
    }

    /// Edits a shape, then invalidates it and notifies its observers.
    pub fn update<R>(&mut self, id: ShapeId, edit: impl FnOnce(&mut ShapeEntity) -> R) -> Result<R> {
        let entity = self.shapes.get_mut(&id).ok_or_else(|| unknown_shape(id))?;
        let result = edit(entity);
        self.invalidate(id)?;
        Ok(result)
    }

    /// Clears the shape's cache and those of its toolpaths, then notifies
    /// the shape's observers.
    pub fn invalidate(&mut self, id: ShapeId) -> Result<()> {
        let entity = self.shapes.get_mut(&id).ok_or_else(|| unknown_shape(id))?;
        entity.invalidate();
        self.propagate(id);
        Ok(())
    }

    /// Clears the toolpaths derived from `id` and notifies its observers.
    fn propagate(&mut self, id: ShapeId) {
        let mut events = vec![ShapeEvent::Invalidated(id)];
        for toolpath_id in &self.toolpath_order {
            if let Some(toolpath) = self.toolpaths.get_mut(toolpath_id) {
                if toolpath.source == id {
                    toolpath.cached = None;
                    events.push(ShapeEvent::ToolpathInvalidated {
                        toolpath: *toolpath_id,
                        source: id,
                    });
                }
            }
        }

        debug!("Invalidated shape {} ({} dependents)", id, events.len() - 1);
        self.notify(id, &events);
    }

    /// Removes a shape along with its toolpaths and observers.
    pub fn remove(&mut self, id: ShapeId) -> Result<ShapeEntity> {
        let entity = self.shapes.remove(&id).ok_or_else(|| unknown_shape(id))?;
        self.order.retain(|s| *s != id);

        let toolpaths = &mut self.toolpaths;
        self.toolpath_order.retain(|t| {
            let dependent = toolpaths.get(t).is_some_and(|tp| tp.source == id);
            if dependent {
                toolpaths.remove(t);
            }
            !dependent
        });

        self.notify(id, &[ShapeEvent::Removed(id)]);
        self.observers.remove(&id);
        debug!("Removed shape {}", id);
        Ok(entity)
    }

    /// Placed path of a shape, built if its cache is empty.
    pub fn path(&mut self, id: ShapeId) -> Result<&Path> {
        let entity = self.shapes.get_mut(&id).ok_or_else(|| unknown_shape(id))?;
        Ok(entity.path())
    }

    /// Flattens a shape at unit scale with the configured tolerance.
    pub fn flatten(&mut self, id: ShapeId) -> Result<Vec<Polyline>> {
        let tolerance = self.config.tolerance;
        let entity = self.shapes.get_mut(&id).ok_or_else(|| unknown_shape(id))?;
        Ok(entity.flatten(1.0, tolerance))
    }

    /// Topmost shape (latest added) whose outline passes within the
    /// configured pixel threshold of `point`.
    pub fn hit_test(&mut self, point: Point, scale: f64) -> Option<ShapeId> {
        let threshold = self.config.hit_threshold_px;
        let shapes = &mut self.shapes;
        self.order.iter().rev().copied().find(|id| {
            shapes
                .get_mut(id)
                .is_some_and(|entity| entity.hit_test(point, scale, threshold))
        })
    }

    pub fn subscribe<F>(&mut self, id: ShapeId, observer: F) -> Result<SubscriptionId>
    where
        F: FnMut(&ShapeEvent) + 'static,
    {
        if !self.shapes.contains_key(&id) {
            return Err(unknown_shape(id));
        }
        let subscription = SubscriptionId::new();
        self.observers
            .entry(id)
            .or_default()
            .push((subscription, Box::new(observer)));
        debug!("Subscription {} added for shape {}", subscription, id);
        Ok(subscription)
    }

    /// Returns true if the subscription was found and removed.
    pub fn unsubscribe(&mut self, subscription: SubscriptionId) -> bool {
        let mut removed = false;
        for list in self.observers.values_mut() {
            let before = list.len();
            list.retain(|(s, _)| *s != subscription);
            removed |= list.len() != before;
        }
        self.observers.retain(|_, list| !list.is_empty());
        if removed {
            debug!("Subscription {} removed", subscription);
        }
        removed
    }

    pub fn subscriber_count(&self) -> usize {
        self.observers.values().map(Vec::len).sum()
    }

    fn notify(&mut self, id: ShapeId, events: &[ShapeEvent]) {
        if let Some(list) = self.observers.get_mut(&id) {
            for event in events {
                for (_, observer) in list.iter_mut() {
                    observer(event);
                }
            }
        }
    }

    pub fn add_toolpath(
        &mut self,
        source: ShapeId,
        radius: f64,
        side: OffsetSide,
        join: OffsetJoin,
    ) -> Result<ToolpathId> {
        self.insert_toolpath(ToolpathEntity::new(source, radius, side, join))
    }

    /// Registers a toolpath whose source must already be in the store.
    pub fn insert_toolpath(&mut self, toolpath: ToolpathEntity) -> Result<ToolpathId> {
        if !self.shapes.contains_key(&toolpath.source) {
            return Err(unknown_shape(toolpath.source));
        }
        let id = toolpath.id;
        if self.toolpaths.insert(id, toolpath).is_none() {
            self.toolpath_order.push(id);
        }
        Ok(id)
    }

    pub fn toolpath(&self, id: ToolpathId) -> Result<&ToolpathEntity> {
        self.toolpaths.get(&id).ok_or_else(|| unknown_toolpath(id))
    }

    pub fn toolpaths(&self) -> impl Iterator<Item = &ToolpathEntity> {
        self.toolpath_order.iter().filter_map(|id| self.toolpaths.get(id))
    }

    pub fn remove_toolpath(&mut self, id: ToolpathId) -> Result<ToolpathEntity> {
        let toolpath = self.toolpaths.remove(&id).ok_or_else(|| unknown_toolpath(id))?;
        self.toolpath_order.retain(|t| *t != id);
        Ok(toolpath)
    }

    /// Offset path of a toolpath, built from its source's flattened outline
    /// if its cache is empty.
    pub fn toolpath_path(&mut self, id: ToolpathId) -> Result<&Path> {
        let toolpath = self.toolpaths.get(&id).ok_or_else(|| unknown_toolpath(id))?;
        if toolpath.cached.is_none() {
            let (source, radius, side, join) =
                (toolpath.source, toolpath.radius, toolpath.side, toolpath.join);
            let tolerance = self.config.tolerance;
            let entity = self
                .shapes
                .get_mut(&source)
                .ok_or_else(|| unknown_shape(source))?;
            let outline = entity.flatten(1.0, tolerance);
            let path = ToolpathOffsetter::new(join, tolerance).offset(&outline, radius, side);
            debug!("Built toolpath {} from shape {}", id, source);
            if let Some(toolpath) = self.toolpaths.get_mut(&id) {
                toolpath.cached = Some(path);
            }
        }

        let toolpath = self.toolpaths.get_mut(&id).ok_or_else(|| unknown_toolpath(id))?;
        Ok(toolpath.cached.get_or_insert_with(Path::new))
    }
}

fn unknown_shape(id: ShapeId) -> kerfline_core::Error {
    DesignerError::UnknownShape { id: id.to_string() }.into()
}

fn unknown_toolpath(id: ToolpathId) -> kerfline_core::Error {
    DesignerError::UnknownToolpath { id: id.to_string() }.into()
}
