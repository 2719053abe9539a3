//! Feature → shape classification.
//!
//! Each feature becomes at most one shape. The rules below are tried in
//! [`ShapeRule::ORDER`] and the first one whose predicate holds decides the
//! shape, so a feature tagged both `railway` and `highway` is a railway.

use log::trace;
use mapfile::tags::{AdminLevel, Boundary, LandUse, Natural, Place};
use mapfile::{GeometryType, MapFeatureData};

use crate::projection::{Point, Projection};
use crate::shape::{Shape, ShapeKind, TerrainKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeRule {
    Natural,
    Railway,
    Road,
    Waterway,
    Border,
    PopulatedPlace,
    Building,
    ForestBoundary,
    PublicAmenity,
    PrivateAmenity,
    LandUseForest,
    LandUsePlain,
    LandUseResidential,
}

impl ShapeRule {
    /// Evaluation order. Earlier rules win.
    pub const ORDER: [ShapeRule; 13] = [
        ShapeRule::Natural,
        ShapeRule::Railway,
        ShapeRule::Road,
        ShapeRule::Waterway,
        ShapeRule::Border,
        ShapeRule::PopulatedPlace,
        ShapeRule::Building,
        ShapeRule::ForestBoundary,
        ShapeRule::PublicAmenity,
        ShapeRule::PrivateAmenity,
        ShapeRule::LandUseForest,
        ShapeRule::LandUsePlain,
        ShapeRule::LandUseResidential,
    ];

    /// The rule that decides `feature`, if any.
    pub fn first_match(feature: &MapFeatureData<'_>) -> Option<ShapeRule> {
        Self::ORDER.into_iter().find(|rule| rule.matches(feature))
    }

    pub fn matches(self, feature: &MapFeatureData<'_>) -> bool {
        let tags = &feature.properties;
        let polygon = feature.geometry_type == GeometryType::Polygon;
        let point = feature.geometry_type == GeometryType::Point;

        match self {
            ShapeRule::Natural => polygon && tags.natural().is_some(),
            ShapeRule::Railway => tags.railway().is_some(),
            ShapeRule::Road => !point && tags.highway().is_some(),
            ShapeRule::Waterway => !point && tags.water().is_some(),
            ShapeRule::Border => {
                tags.boundary() == Some(Boundary::Administrative)
                    && tags.admin_level() == Some(AdminLevel::Level2)
            }
            ShapeRule::PopulatedPlace => {
                point
                    && matches!(
                        tags.place(),
                        Some(Place::City | Place::Town | Place::Locality | Place::Hamlet)
                    )
            }
            ShapeRule::Building => polygon && tags.building().is_some(),
            ShapeRule::ForestBoundary => tags.boundary() == Some(Boundary::Forest),
            ShapeRule::PublicAmenity => polygon && tags.public_amenity().is_some(),
            ShapeRule::PrivateAmenity => polygon && tags.private_amenity().is_some(),
            ShapeRule::LandUseForest => {
                matches!(tags.land_use(), Some(LandUse::Forest | LandUse::Orchard))
            }
            ShapeRule::LandUsePlain => matches!(
                tags.land_use(),
                Some(
                    LandUse::Farm
                        | LandUse::Meadow
                        | LandUse::Grass
                        | LandUse::Greenfield
                        | LandUse::RecreationGround
                        | LandUse::WinterSports
                        | LandUse::Allotments
                )
            ),
            ShapeRule::LandUseResidential => matches!(
                tags.land_use(),
                Some(
                    LandUse::Residential
                        | LandUse::Cemetery
                        | LandUse::Industrial
                        | LandUse::Commercial
                        | LandUse::Square
                        | LandUse::Construction
                        | LandUse::Military
                        | LandUse::Quarry
                        | LandUse::Brownfield
                )
            ),
        }
    }

    /// Shape kind and polygon flag this rule assigns to `feature`.
    fn classify(self, feature: &MapFeatureData<'_>) -> (ShapeKind, bool) {
        let polygon = feature.geometry_type == GeometryType::Polygon;
        let terrain = |kind| (ShapeKind::Terrain(kind), true);

        match self {
            ShapeRule::Natural => (
                ShapeKind::Terrain(natural_terrain(feature.properties.natural())),
                polygon,
            ),
            ShapeRule::Railway => (ShapeKind::Railway, false),
            ShapeRule::Road => (ShapeKind::Road, false),
            ShapeRule::Waterway => (ShapeKind::Waterway, polygon),
            ShapeRule::Border => (ShapeKind::Border, false),
            ShapeRule::PopulatedPlace => (place_label(feature), false),
            ShapeRule::Building => terrain(TerrainKind::Residential),
            ShapeRule::ForestBoundary => terrain(TerrainKind::Forest),
            ShapeRule::PublicAmenity | ShapeRule::PrivateAmenity => terrain(TerrainKind::Unknown),
            ShapeRule::LandUseForest => terrain(TerrainKind::Forest),
            ShapeRule::LandUsePlain => terrain(TerrainKind::Plain),
            ShapeRule::LandUseResidential => terrain(TerrainKind::Residential),
        }
    }
}

fn natural_terrain(natural: Option<Natural>) -> TerrainKind {
    match natural {
        Some(Natural::Water) => TerrainKind::Water,
        Some(Natural::Beach | Natural::Sand) => TerrainKind::Desert,
        Some(Natural::Wood | Natural::TreeRow) => TerrainKind::Forest,
        Some(Natural::BareRock | Natural::Rock | Natural::Scree) => TerrainKind::Forest,
        Some(
            Natural::Fell
            | Natural::Grassland
            | Natural::Heath
            | Natural::Moor
            | Natural::Scrub
            | Natural::Wetland,
        ) => TerrainKind::Plain,
        None => TerrainKind::Unknown,
    }
}

fn place_label(feature: &MapFeatureData<'_>) -> ShapeKind {
    let name = feature
        .properties
        .name()
        .filter(|name| !name.trim().is_empty())
        .map(str::to_owned)
        .or_else(|| (!feature.label.is_empty()).then(|| feature.label.to_string_lossy()));

    match name {
        Some(name) => ShapeKind::PopulatedPlace {
            name,
            should_render: true,
        },
        None => ShapeKind::PopulatedPlace {
            name: String::new(),
            should_render: false,
        },
    }
}

/// Turn `feature` into a shape in projected space, or `None` when no rule
/// matches it.
pub fn tessellate<P>(feature: &MapFeatureData<'_>, projection: &P) -> Option<Shape>
where
    P: Projection + ?Sized,
{
    let Some(rule) = ShapeRule::first_match(feature) else {
        trace!("feature {} matches no shape rule", feature.id);
        return None;
    };

    let (kind, is_polygon) = rule.classify(feature);
    let points: Vec<Point> = feature
        .coordinates
        .iter()
        .map(|c| projection.project(c))
        .collect();

    trace!("feature {} -> {:?} ({} points)", feature.id, rule, points.len());
    Some(Shape::new(kind, is_polygon, points))
}
