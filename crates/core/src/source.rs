//! Point sources and the homogeneous registry that owns them.
//!
//! Three flavors share the same shape (id, position, a kind, and a few
//! kind-specific numbers): [`Pole`] for multipole force fields,
//! [`ElevationPoint`] for terrain, and [`TurbulenceSource`] for flow
//! emitters. Each visualization owns exactly one [`SourceRegistry`] of a
//! single flavor.

use crate::error::FieldError;
use crate::geometry::Point;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::trace;

/// Common interface of the source flavors stored in a [`SourceRegistry`].
pub trait PointSource: Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync {
    /// Kind discriminator passed to [`SourceRegistry::add`].
    type Kind: Copy + fmt::Debug;
    /// Partial update applied by [`SourceRegistry::update`].
    type Patch;

    /// Prefix of generated ids, e.g. `"pole"` for `"pole-3"`.
    const ID_PREFIX: &'static str;

    /// Builds a source of `kind` at `(x, y)` with that kind's defaults.
    fn create(id: String, kind: Self::Kind, x: f64, y: f64) -> Self;

    fn id(&self) -> &str;

    fn position(&self) -> Point;

    fn set_position(&mut self, x: f64, y: f64);

    /// Copies every `Some` field of `patch` onto the source.
    fn apply(&mut self, patch: Self::Patch);
}

/// Declares a lowercase, serde- and `FromStr`-compatible kind enum.
macro_rules! source_kind {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl FromStr for $name {
            type Err = FieldError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(FieldError::InvalidSources(format!(
                        "unknown {} kind: {other}",
                        stringify!($name)
                    ))),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Copies each listed `Option` field of a patch onto the target when set.
macro_rules! patch_fields {
    ($target:expr, $patch:expr, $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = $patch.$field {
                $target.$field = value;
            }
        )+
    };
}

source_kind! {
    /// How a pole shapes the vector field around it.
    ///
    /// `Polar` poles carry a sign (`is_positive`) that composes with the
    /// global polarity mode; the other variants fix their own behavior.
    PoleKind {
        Polar => "polar",
        Attractor => "attractor",
        Repeller => "repeller",
        Vortex => "vortex",
        Quantum => "quantum",
    }
}

source_kind! {
    /// Terrain feature shaping the elevation influence of a point.
    ElevationKind {
        Peak => "peak",
        Valley => "valley",
        Saddle => "saddle",
        Ridge => "ridge",
    }
}

source_kind! {
    /// Flow pattern emitted by a turbulence source.
    TurbulenceKind {
        Vortex => "vortex",
        Source => "source",
        Sink => "sink",
        Uniform => "uniform",
    }
}

const DEFAULT_STRENGTH: f64 = 100.0;
const DEFAULT_RADIUS: f64 = 150.0;

/// A multipole field source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pole {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub strength: f64,
    pub kind: PoleKind,
    #[serde(default = "default_true")]
    pub is_positive: bool,
    /// Envelope length of quantum poles and radius of the bounded falloff laws.
    #[serde(default = "default_radius")]
    pub radius: f64,
    /// Oscillation phase of quantum poles, in radians.
    #[serde(default)]
    pub phase: f64,
}

/// Partial update for a [`Pole`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PolePatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub strength: Option<f64>,
    pub kind: Option<PoleKind>,
    pub is_positive: Option<bool>,
    pub radius: Option<f64>,
    pub phase: Option<f64>,
}

impl PointSource for Pole {
    type Kind = PoleKind;
    type Patch = PolePatch;
    const ID_PREFIX: &'static str = "pole";

    fn create(id: String, kind: PoleKind, x: f64, y: f64) -> Self {
        Self {
            id,
            x,
            y,
            strength: DEFAULT_STRENGTH,
            kind,
            is_positive: kind != PoleKind::Repeller,
            radius: DEFAULT_RADIUS,
            phase: 0.0,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    fn set_position(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    fn apply(&mut self, patch: PolePatch) {
        patch_fields!(self, patch, x, y, strength, kind, is_positive, radius, phase);
    }
}

/// A terrain control point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElevationPoint {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub kind: ElevationKind,
    pub elevation: f64,
    #[serde(default = "default_radius")]
    pub radius: f64,
}

/// Partial update for an [`ElevationPoint`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ElevationPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub kind: Option<ElevationKind>,
    pub elevation: Option<f64>,
    pub radius: Option<f64>,
}

impl ElevationKind {
    /// Elevation given to a freshly placed point of this kind.
    pub fn default_elevation(self) -> f64 {
        match self {
            ElevationKind::Peak => 800.0,
            ElevationKind::Valley => 100.0,
            ElevationKind::Saddle => 500.0,
            ElevationKind::Ridge => 650.0,
        }
    }
}

impl PointSource for ElevationPoint {
    type Kind = ElevationKind;
    type Patch = ElevationPatch;
    const ID_PREFIX: &'static str = "elevation";

    fn create(id: String, kind: ElevationKind, x: f64, y: f64) -> Self {
        Self {
            id,
            x,
            y,
            kind,
            elevation: kind.default_elevation(),
            radius: DEFAULT_RADIUS,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    fn set_position(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    fn apply(&mut self, patch: ElevationPatch) {
        patch_fields!(self, patch, x, y, kind, elevation, radius);
    }
}

/// A turbulence emitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurbulenceSource {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub strength: f64,
    pub kind: TurbulenceKind,
    /// Flow direction of `Uniform` emitters, in radians.
    #[serde(default)]
    pub angle: f64,
    #[serde(default = "default_radius")]
    pub radius: f64,
}

/// Partial update for a [`TurbulenceSource`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TurbulencePatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub strength: Option<f64>,
    pub kind: Option<TurbulenceKind>,
    pub angle: Option<f64>,
    pub radius: Option<f64>,
}

impl PointSource for TurbulenceSource {
    type Kind = TurbulenceKind;
    type Patch = TurbulencePatch;
    const ID_PREFIX: &'static str = "turbulence";

    fn create(id: String, kind: TurbulenceKind, x: f64, y: f64) -> Self {
        Self {
            id,
            x,
            y,
            strength: DEFAULT_STRENGTH,
            kind,
            angle: 0.0,
            radius: DEFAULT_RADIUS,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    fn set_position(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    fn apply(&mut self, patch: TurbulencePatch) {
        patch_fields!(self, patch, x, y, strength, kind, angle, radius);
    }
}

fn default_true() -> bool {
    true
}

fn default_radius() -> f64 {
    DEFAULT_RADIUS
}

/// In-memory store of one flavor of point source.
///
/// Ids are `"{prefix}-{n}"` with `n` increasing and never reused, so an id
/// stays valid for exactly the lifetime of its record.
#[derive(Debug, Clone)]
pub struct SourceRegistry<S: PointSource> {
    sources: Vec<S>,
    next_id: u64,
}

impl<S: PointSource> Default for SourceRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: PointSource> SourceRegistry<S> {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            next_id: 1,
        }
    }

    /// Builds a registry from fully specified records (e.g. decoded JSON).
    pub fn from_sources(sources: Vec<S>) -> Self {
        let mut registry = Self::new();
        for source in sources {
            registry.insert(source);
        }
        registry
    }

    /// Creates a source of `kind` at `(x, y)` and returns its new id.
    pub fn add(&mut self, kind: S::Kind, x: f64, y: f64) -> String {
        let id = format!("{}-{}", S::ID_PREFIX, self.next_id);
        self.next_id += 1;
        trace!(%id, ?kind, x, y, "source added");
        self.sources.push(S::create(id.clone(), kind, x, y));
        id
    }

    /// Adopts a complete record, replacing any record with the same id.
    ///
    /// The id counter moves past the record's numeric suffix so later
    /// [`add`](Self::add) calls cannot collide with it.
    pub fn insert(&mut self, source: S) {
        if let Some(n) = source
            .id()
            .strip_prefix(S::ID_PREFIX)
            .and_then(|rest| rest.strip_prefix('-'))
            .and_then(|n| n.parse::<u64>().ok())
        {
            self.next_id = self.next_id.max(n.saturating_add(1));
        }
        match self.sources.iter_mut().find(|s| s.id() == source.id()) {
            Some(existing) => *existing = source,
            None => self.sources.push(source),
        }
    }

    /// Removes and returns the source; an unknown id is a no-op.
    pub fn remove(&mut self, id: &str) -> Option<S> {
        let index = self.sources.iter().position(|s| s.id() == id)?;
        trace!(id, "source removed");
        Some(self.sources.remove(index))
    }

    /// Applies a partial update to the source with `id`.
    pub fn update(&mut self, id: &str, patch: S::Patch) -> Result<(), FieldError> {
        self.get_mut(id)?.apply(patch);
        trace!(id, "source updated");
        Ok(())
    }

    /// Moves the source with `id` to `(x, y)`.
    pub fn move_to(&mut self, id: &str, x: f64, y: f64) -> Result<(), FieldError> {
        self.get_mut(id)?.set_position(x, y);
        trace!(id, x, y, "source moved");
        Ok(())
    }

    /// All sources in insertion order.
    pub fn list(&self) -> &[S] {
        &self.sources
    }

    pub fn get(&self, id: &str) -> Option<&S> {
        self.sources.iter().find(|s| s.id() == id)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut S, FieldError> {
        self.sources
            .iter_mut()
            .find(|s| s.id() == id)
            .ok_or_else(|| FieldError::UnknownSource(id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn clear(&mut self) {
        self.sources.clear();
    }
}
