//! OSM-style tag classification.
//!
//! A feature's key/value pairs are folded once into a [`ClassifiedTags`]
//! value. Keys are recognised by prefix (`waterway` counts as `water`,
//! `building:levels` as `building`). Each category has an ordered table of
//! value prefixes; the first table entry that is a prefix of the value wins.
//! A later tag of the same category that matches replaces an earlier match,
//! a tag that matches nothing leaves the category as it was.

use crate::text::Utf16Str;

/// Text that can be classified without first turning it into a `String`.
pub trait TagText {
    fn starts_with_str(&self, prefix: &str) -> bool;
    fn eq_str(&self, other: &str) -> bool;
    fn to_text(&self) -> String;
}

impl TagText for &str {
    fn starts_with_str(&self, prefix: &str) -> bool {
        self.starts_with(prefix)
    }

    fn eq_str(&self, other: &str) -> bool {
        *self == other
    }

    fn to_text(&self) -> String {
        (*self).to_owned()
    }
}

impl TagText for String {
    fn starts_with_str(&self, prefix: &str) -> bool {
        self.starts_with(prefix)
    }

    fn eq_str(&self, other: &str) -> bool {
        self == other
    }

    fn to_text(&self) -> String {
        self.clone()
    }
}

impl TagText for Utf16Str<'_> {
    fn starts_with_str(&self, prefix: &str) -> bool {
        self.starts_with(prefix)
    }

    fn eq_str(&self, other: &str) -> bool {
        Utf16Str::eq_str(self, other)
    }

    fn to_text(&self) -> String {
        self.to_string_lossy()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Highway {
    Motorway,
    Trunk,
    Primary,
    Secondary,
    Tertiary,
    Unclassified,
    Residential,
    Road,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Water {
    River,
    Lake,
    Ocean,
    Stream,
    Glacier,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Place {
    City,
    Town,
    Locality,
    Hamlet,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Railway {
    Heavy,
    Intercity,
    Highspeed,
    Heritage,
    Monorail,
    Mountain,
    Plateway,
    Rack,
    Tourist,
    Wagonway,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Natural {
    Grassland,
    Heath,
    Moor,
    Scrub,
    Fell,
    Wetland,
    Wood,
    TreeRow,
    BareRock,
    Rock,
    Scree,
    Beach,
    Sand,
    Water,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LandUse {
    Residential,
    Industrial,
    Forest,
    Commercial,
    Construction,
    Military,
    Quarry,
    Brownfield,
    Farm,
    Grass,
    Greenfield,
    RecreationGround,
    Allotments,
    Orchard,
    Cemetery,
    Square,
    Meadow,
    WinterSports,
    Reservoir,
    Basin,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Building {
    Residential,
    Educational,
    Institutional,
    Assembly,
    Business,
    Mercantile,
    Industrial,
    Storage,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Boundary {
    Administrative,
    Forest,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AdminLevel {
    Level2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PublicAmenity {
    ResidentialHome,
    Park,
    School,
    ShoppingCenter,
    PostOffice,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrivateAmenity {
    PrivateRoad,
    PrivateDriveway,
    PrivateClub,
    PrivateLand,
}

const HIGHWAY: &[(&str, Highway)] = &[
    ("motorway", Highway::Motorway),
    ("trunk", Highway::Trunk),
    ("primary", Highway::Primary),
    ("secondary", Highway::Secondary),
    ("tertiary", Highway::Tertiary),
    ("unclassified", Highway::Unclassified),
    ("residential", Highway::Residential),
    ("road", Highway::Road),
];

const BOUNDARY: &[(&str, Boundary)] = &[
    ("administrative", Boundary::Administrative),
    ("forest", Boundary::Forest),
];

const NATURAL: &[(&str, Natural)] = &[
    ("fell", Natural::Fell),
    ("grassland", Natural::Grassland),
    ("heath", Natural::Heath),
    ("moor", Natural::Moor),
    ("scrub", Natural::Scrub),
    ("wetland", Natural::Wetland),
    ("wood", Natural::Wood),
    ("tree_row", Natural::TreeRow),
    ("bare_rock", Natural::BareRock),
    ("rock", Natural::Rock),
    ("scree", Natural::Scree),
    ("beach", Natural::Beach),
    ("sand", Natural::Sand),
    ("water", Natural::Water),
];

// "grassland" has no entry of its own and lands on Grass.
const LAND_USE: &[(&str, LandUse)] = &[
    ("forest", LandUse::Forest),
    ("orchard", LandUse::Orchard),
    ("residential", LandUse::Residential),
    ("cemetery", LandUse::Cemetery),
    ("industrial", LandUse::Industrial),
    ("commercial", LandUse::Commercial),
    ("square", LandUse::Square),
    ("construction", LandUse::Construction),
    ("military", LandUse::Military),
    ("quarry", LandUse::Quarry),
    ("brownfield", LandUse::Brownfield),
    ("farm", LandUse::Farm),
    ("meadow", LandUse::Meadow),
    ("grass", LandUse::Grass),
    ("greenfield", LandUse::Greenfield),
    ("recreation_ground", LandUse::RecreationGround),
    ("winter_sports", LandUse::WinterSports),
    ("allotments", LandUse::Allotments),
    ("reservoir", LandUse::Reservoir),
    ("basin", LandUse::Basin),
];

const ADMIN_LEVEL: &[(&str, AdminLevel)] = &[("2", AdminLevel::Level2)];

const PLACE: &[(&str, Place)] = &[
    ("city", Place::City),
    ("town", Place::Town),
    ("locality", Place::Locality),
    ("hamlet", Place::Hamlet),
];

const WATER: &[(&str, Water)] = &[
    ("river", Water::River),
    ("lake", Water::Lake),
    ("ocean", Water::Ocean),
    ("stream", Water::Stream),
    ("glacier", Water::Glacier),
];

const RAILWAY: &[(&str, Railway)] = &[
    ("rail", Railway::Heavy),
    ("heavy", Railway::Heavy),
    ("intercity", Railway::Intercity),
    ("highspeed", Railway::Highspeed),
    ("heritage", Railway::Heritage),
    ("preserved", Railway::Heritage),
    ("monorail", Railway::Monorail),
    ("funicular", Railway::Mountain),
    ("mountain", Railway::Mountain),
    ("plateway", Railway::Plateway),
    ("rack", Railway::Rack),
    ("tourist", Railway::Tourist),
    ("wagonway", Railway::Wagonway),
];

const BUILDING: &[(&str, Building)] = &[
    ("residential", Building::Residential),
    ("house", Building::Residential),
    ("apartments", Building::Residential),
    ("detached", Building::Residential),
    ("yes", Building::Residential),
    ("school", Building::Educational),
    ("university", Building::Educational),
    ("college", Building::Educational),
    ("hospital", Building::Institutional),
    ("government", Building::Institutional),
    ("public", Building::Institutional),
    ("church", Building::Assembly),
    ("civic", Building::Assembly),
    ("stadium", Building::Assembly),
    ("office", Building::Business),
    ("commercial", Building::Business),
    ("retail", Building::Mercantile),
    ("supermarket", Building::Mercantile),
    ("industrial", Building::Industrial),
    ("factory", Building::Industrial),
    ("warehouse", Building::Storage),
    ("storage", Building::Storage),
];

const AMENITY: &[(&str, PublicAmenity)] = &[
    ("social_facility", PublicAmenity::ResidentialHome),
    ("nursing_home", PublicAmenity::ResidentialHome),
    ("park", PublicAmenity::Park),
    ("school", PublicAmenity::School),
    ("marketplace", PublicAmenity::ShoppingCenter),
    ("post_office", PublicAmenity::PostOffice),
];

const LEISURE: &[(&str, PublicAmenity)] = &[("park", PublicAmenity::Park)];

const ACCESS: &[(&str, PrivateAmenity)] = &[("private", PrivateAmenity::PrivateLand)];

const SERVICE: &[(&str, PrivateAmenity)] = &[
    ("driveway", PrivateAmenity::PrivateDriveway),
    ("emergency_access", PrivateAmenity::PrivateRoad),
];

const CLUB: &[(&str, PrivateAmenity)] = &[
    ("sport", PrivateAmenity::PrivateClub),
    ("social", PrivateAmenity::PrivateClub),
];

#[inline]
fn lookup<T: Copy, V: TagText + ?Sized>(table: &[(&str, T)], value: &V) -> Option<T> {
    table
        .iter()
        .find(|(prefix, _)| value.starts_with_str(prefix))
        .map(|&(_, class)| class)
}

/// Every tag of a category overwrites it, so a later unrecognised value
/// clears an earlier match.
#[inline]
fn update<T: Copy, V: TagText + ?Sized>(slot: &mut Option<T>, table: &[(&str, T)], value: &V) {
    *slot = lookup(table, value);
}

/// The recognised categories of one feature. Every category is `None` unless
/// one of the feature's tags matched it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassifiedTags {
    highway: Option<Highway>,
    water: Option<Water>,
    place: Option<Place>,
    railway: Option<Railway>,
    natural: Option<Natural>,
    land_use: Option<LandUse>,
    building: Option<Building>,
    boundary: Option<Boundary>,
    admin_level: Option<AdminLevel>,
    public_amenity: Option<PublicAmenity>,
    private_amenity: Option<PrivateAmenity>,
    name: Option<String>,
}

impl ClassifiedTags {
    /// Classify `tags` in order. Never fails; unknown keys are ignored.
    pub fn classify<I, K, V>(tags: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: TagText,
        V: TagText,
    {
        let mut classified = Self::default();
        for (key, value) in tags {
            classified.apply(&key, &value);
        }
        classified
    }

    fn apply<K: TagText, V: TagText>(&mut self, key: &K, value: &V) {
        if key.starts_with_str("highway") {
            update(&mut self.highway, HIGHWAY, value);
        } else if key.starts_with_str("boundary") {
            update(&mut self.boundary, BOUNDARY, value);
        } else if key.starts_with_str("natural") {
            update(&mut self.natural, NATURAL, value);
        } else if key.starts_with_str("landuse") {
            update(&mut self.land_use, LAND_USE, value);
        } else if key.starts_with_str("admin_level") {
            update(&mut self.admin_level, ADMIN_LEVEL, value);
        } else if key.starts_with_str("place") {
            update(&mut self.place, PLACE, value);
        } else if key.starts_with_str("water") {
            update(&mut self.water, WATER, value);
        } else if key.starts_with_str("railway") {
            update(&mut self.railway, RAILWAY, value);
        } else if key.starts_with_str("building") {
            update(&mut self.building, BUILDING, value);
        } else if key.starts_with_str("amenity") {
            update(&mut self.public_amenity, AMENITY, value);
        } else if key.starts_with_str("leisure") {
            update(&mut self.public_amenity, LEISURE, value);
        } else if key.starts_with_str("access") {
            update(&mut self.private_amenity, ACCESS, value);
        } else if key.starts_with_str("service") {
            update(&mut self.private_amenity, SERVICE, value);
        } else if key.starts_with_str("club") {
            update(&mut self.private_amenity, CLUB, value);
        } else if key.eq_str("name") {
            self.name = Some(value.to_text());
        }
    }

    pub fn highway(&self) -> Option<Highway> {
        self.highway
    }

    pub fn water(&self) -> Option<Water> {
        self.water
    }

    pub fn place(&self) -> Option<Place> {
        self.place
    }

    pub fn railway(&self) -> Option<Railway> {
        self.railway
    }

    pub fn natural(&self) -> Option<Natural> {
        self.natural
    }

    pub fn land_use(&self) -> Option<LandUse> {
        self.land_use
    }

    pub fn building(&self) -> Option<Building> {
        self.building
    }

    pub fn boundary(&self) -> Option<Boundary> {
        self.boundary
    }

    pub fn admin_level(&self) -> Option<AdminLevel> {
        self.admin_level
    }

    pub fn public_amenity(&self) -> Option<PublicAmenity> {
        self.public_amenity
    }

    pub fn private_amenity(&self) -> Option<PrivateAmenity> {
        self.private_amenity
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// True when no tag was recognised.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::encode_units;

    fn classify(tags: &[(&str, &str)]) -> ClassifiedTags {
        ClassifiedTags::classify(tags.iter().copied())
    }

    #[test]
    fn value_prefix_matching() {
        assert_eq!(
            classify(&[("highway", "motorway_link")]).highway(),
            Some(Highway::Motorway)
        );
        assert_eq!(classify(&[("highway", "xyz")]).highway(), None);
        assert_eq!(
            classify(&[("landuse", "grassland")]).land_use(),
            Some(LandUse::Grass)
        );
        assert_eq!(
            classify(&[("railway", "rail")]).railway(),
            Some(Railway::Heavy)
        );
    }

    #[test]
    fn key_prefix_matching() {
        assert_eq!(
            classify(&[("waterway", "river")]).water(),
            Some(Water::River)
        );
        assert_eq!(
            classify(&[("building:use", "retail")]).building(),
            Some(Building::Mercantile)
        );
        // Only the exact key counts as the name.
        let t = classify(&[("name", "Springfield"), ("name:de", "Springfeld")]);
        assert_eq!(t.name(), Some("Springfield"));
    }

    #[test]
    fn first_table_entry_wins() {
        // "rock" and "bare_rock" both exist; the value decides, not the order.
        assert_eq!(
            classify(&[("natural", "bare_rock")]).natural(),
            Some(Natural::BareRock)
        );
        assert_eq!(
            classify(&[("railway", "rail_yard")]).railway(),
            Some(Railway::Heavy)
        );
    }

    #[test]
    fn last_tag_of_a_category_decides() {
        let t = classify(&[("highway", "primary"), ("highway", "trunk")]);
        assert_eq!(t.highway(), Some(Highway::Trunk));

        let t = classify(&[("highway", "primary"), ("highway:note", "xyz")]);
        assert_eq!(t.highway(), None);

        let t = classify(&[("building", "house"), ("building:levels", "3")]);
        assert_eq!(t.building(), None);

        let t = classify(&[("building:levels", "3"), ("building", "house")]);
        assert_eq!(t.building(), Some(Building::Residential));
    }

    #[test]
    fn unrelated_keys_leave_categories_alone() {
        let t = classify(&[("highway", "primary"), ("surface", "asphalt"), ("name", "A1")]);
        assert_eq!(t.highway(), Some(Highway::Primary));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let t = classify(&[("surface", "asphalt"), ("lanes", "2"), ("", "")]);
        assert!(t.is_empty());
        assert!(classify(&[]).is_empty());
    }

    #[test]
    fn border_tags() {
        let t = classify(&[("boundary", "administrative"), ("admin_level", "2")]);
        assert_eq!(t.boundary(), Some(Boundary::Administrative));
        assert_eq!(t.admin_level(), Some(AdminLevel::Level2));

        let t = classify(&[("admin_level", "4")]);
        assert_eq!(t.admin_level(), None);
    }

    #[test]
    fn amenities() {
        assert_eq!(
            classify(&[("amenity", "school")]).public_amenity(),
            Some(PublicAmenity::School)
        );
        assert_eq!(
            classify(&[("leisure", "park")]).public_amenity(),
            Some(PublicAmenity::Park)
        );
        assert_eq!(
            classify(&[("access", "private")]).private_amenity(),
            Some(PrivateAmenity::PrivateLand)
        );
        assert_eq!(
            classify(&[("service", "driveway")]).private_amenity(),
            Some(PrivateAmenity::PrivateDriveway)
        );
    }

    #[test]
    fn classifies_utf16_views_in_place() {
        let key = encode_units("highway");
        let value = encode_units("secondary_link");
        let name_key = encode_units("name");
        let name = encode_units("Hauptstraße");

        let t = ClassifiedTags::classify([
            (Utf16Str::from_units(&key), Utf16Str::from_units(&value)),
            (Utf16Str::from_units(&name_key), Utf16Str::from_units(&name)),
        ]);
        assert_eq!(t.highway(), Some(Highway::Secondary));
        assert_eq!(t.name(), Some("Hauptstraße"));
    }
}
