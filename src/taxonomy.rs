//! Fixed store navigation tree and category list.
//!
//! The copy prompt asks the model to pick one leaf of [`SITE_MAP`]. Models are
//! not reliable at keeping `navPrimary/navSecondary/navTertiary` and `navPath`
//! in agreement, so [`NavPlacement::resolve`] rebuilds all four fields from the
//! tree instead of trusting the model's output.

use tracing::{debug, warn};

use crate::types::CatalogCopy;

pub const PATH_SEPARATOR: &str = " > ";

/// A labelled node of the navigation tree. Nodes without children are leaves.
#[derive(Debug)]
pub struct TaxonomyNode {
    pub label: &'static str,
    pub children: &'static [TaxonomyNode],
}

macro_rules! leaf {
    ($label:expr) => {
        TaxonomyNode {
            label: $label,
            children: &[],
        }
    };
}

macro_rules! branch {
    ($label:expr, [$($child:expr),+ $(,)?] $(,)?) => {
        TaxonomyNode {
            label: $label,
            children: &[$($child),+],
        }
    };
}

pub static SITE_MAP: &[TaxonomyNode] = &[
    branch!(
        "Clothing",
        [
            branch!(
                "Jackets & Coats",
                [
                    leaf!("Leather & Flight Jackets"),
                    leaf!("Winter Coats & Liners"),
                    leaf!("Field Jackets & Parkas"),
                    leaf!("Dress Jackets & Tunics"),
                    leaf!("Rain & Softshell Jackets"),
                    leaf!("Vests & Waistcoats"),
                    leaf!("Track Tops & Hoodies"),
                    leaf!("Camouflage Jackets"),
                ],
            ),
            branch!(
                "Shirts & T-Shirts",
                [
                    leaf!("Field Shirts"),
                    leaf!("Service & Dress Shirts"),
                    leaf!("Camouflage Shirts"),
                    leaf!("Plain & Print T-Shirts"),
                    leaf!("Camouflage T-Shirts"),
                    leaf!("Polos"),
                    leaf!("Singlets & Tank Tops"),
                ],
            ),
            branch!(
                "Pants & Shorts",
                [
                    leaf!("Combat & Cargo Trousers"),
                    leaf!("Tactical & Duty Trousers"),
                    leaf!("Shorts & Sports Pants"),
                    leaf!("Rain & Softshell Trousers"),
                    leaf!("Dress Trousers"),
                    leaf!("Camouflage Trousers"),
                    leaf!("Work Pants"),
                ],
            ),
            branch!(
                "Headwear",
                [
                    leaf!("Beanies & Balaclavas"),
                    leaf!("Facemasks"),
                    leaf!("Berets & Slide Caps"),
                    leaf!("Boonie Hats"),
                    leaf!("Caps & Hats"),
                    leaf!("Helmets"),
                    leaf!("Pith Helmets"),
                    leaf!("Scarves & Shemaghs"),
                ],
            ),
            leaf!("Fleeces & Jerseys"),
            leaf!("Belts & Suspenders"),
            leaf!("Overalls"),
            leaf!("Gloves & Mittens"),
            leaf!("Thermals & Base Layers"),
            leaf!("Sunglasses & Goggles"),
            leaf!("Children's Clothing"),
            leaf!("Repairs & Maintenance"),
        ],
    ),
    branch!(
        "Footwear",
        [
            branch!(
                "Boots",
                [
                    leaf!("Duty Boots"),
                    leaf!("Combat Boots"),
                    leaf!("Safety Boots"),
                    leaf!("Waterproof Boots"),
                    leaf!("Hiking Boots"),
                ],
            ),
            leaf!("Footwear Accessories"),
            leaf!("Shoes & Sandals"),
            leaf!("Socks"),
        ],
    ),
    branch!(
        "Packs & Bags",
        [
            leaf!("Day Packs"),
            leaf!("Hiking Packs"),
            leaf!("Hydration Packs"),
            leaf!("Kit & Utility Bags"),
            leaf!("Rifle Cases"),
            leaf!("Waist & Sling Packs"),
            leaf!("Shoulder Bags"),
            leaf!("Dry Bags & Sacks"),
            leaf!("Wallets, Bags & Cases"),
            leaf!("Pack Accessories"),
        ],
    ),
    branch!(
        "Combat Gear",
        [
            leaf!("Combat Pouches"),
            leaf!("Load Bearing Gear"),
            leaf!("Holsters & Accessories"),
            leaf!("Hydration"),
            leaf!("Clothing & Stealth"),
            leaf!("Armour & Protection"),
            leaf!("Dog Tags"),
        ],
    ),
    branch!(
        "Camping & Survival",
        [
            leaf!("Cooking & Eating"),
            leaf!("Hydration"),
            leaf!("Sleeping Bags & Mats"),
            leaf!("Tents & Bashas"),
            leaf!("Lighting & Torches"),
            leaf!("Navigation & Optics"),
            leaf!("Tools"),
            leaf!("Bivy Bags"),
            leaf!("Ropes & Fastenings"),
            leaf!("First-Aid & Hygiene"),
            leaf!("Emergency Kit"),
        ],
    ),
    branch!(
        "Equipment",
        [
            leaf!("Flags, Badges & Insignia"),
            leaf!("Gifts & Novelties"),
            leaf!("Books & Publications"),
            leaf!("Reenactment"),
            leaf!("Collectables & Rarities"),
            leaf!("Camouflage Netting"),
            leaf!("Storage Containers"),
        ],
    ),
    leaf!("Dog Tags"),
    leaf!("One-Offs (Collectables)"),
];

/// Category options offered on the staff form.
pub const CATEGORIES: &[&str] = &[
    "Leather & Flight Jackets",
    "Winter Coats & Liners",
    "Field Jackets & Parkas",
    "Dress Jackets & Tunics",
    "Rain & Softshell Jackets",
    "Vests & Waistcoats",
    "Track Tops & Hoodies",
    "Camouflage Jackets",
    "Field Shirts",
    "Service & Dress Shirts",
    "Camouflage Shirts",
    "Plain & Print T-Shirts",
    "Camouflage T-Shirts",
    "Polos",
    "Singlets & Tank Tops",
    "Combat & Cargo Trousers",
    "Tactical & Duty Trousers",
    "Shorts & Sports Pants",
    "Rain & Softshell Trousers",
    "Dress Trousers",
    "Camouflage Trousers",
    "Work Pants",
    "Headwear",
    "Fleeces & Jerseys",
    "Belts & Suspenders",
    "Overalls",
    "Gloves & Mittens",
    "Thermals & Base Layers",
    "Sunglasses & Goggles",
    "Children's Clothing",
    "Boots",
    "Packs & Bags",
    "Combat Gear",
    "Camping & Survival",
    "Equipment & Accessories",
    "Collectables & Rarities",
    "Dog Tags",
    "One-Offs (Collectables)",
    "Other",
];

pub fn is_known_category(category: &str) -> bool {
    let category = category.trim();
    CATEGORIES.iter().any(|c| c.eq_ignore_ascii_case(category))
}

/// Every leaf of the tree as its list of labels, in site-map order.
pub fn leaf_paths() -> Vec<Vec<&'static str>> {
    fn walk(
        nodes: &'static [TaxonomyNode],
        prefix: &mut Vec<&'static str>,
        out: &mut Vec<Vec<&'static str>>,
    ) {
        for node in nodes {
            prefix.push(node.label);
            if node.children.is_empty() {
                out.push(prefix.clone());
            } else {
                walk(node.children, prefix, out);
            }
            prefix.pop();
        }
    }

    let mut out = Vec::new();
    walk(SITE_MAP, &mut Vec::new(), &mut out);
    out
}

/// Render the site map one leaf path per line, with a blank line between
/// groups, for embedding in the copy prompt.
pub fn site_map_text() -> String {
    let mut text = String::new();
    let mut last_group = None;
    for path in leaf_paths() {
        let group = match path.len() {
            3 => (path[0], path[1]),
            2 => (path[0], ""),
            _ => ("", ""),
        };
        if last_group.is_some_and(|prev| prev != group) {
            text.push('\n');
        }
        last_group = Some(group);
        text.push_str(&path.join(PATH_SEPARATOR));
        text.push('\n');
    }
    text
}

fn split_path(path: &str) -> Vec<&str> {
    path.split('>')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// A leaf of the navigation tree, decomposed into up to three levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavPlacement {
    pub primary: &'static str,
    pub secondary: &'static str,
    pub tertiary: &'static str,
}

impl NavPlacement {
    fn from_labels(labels: &[&'static str]) -> Self {
        Self {
            primary: labels.first().copied().unwrap_or(""),
            secondary: labels.get(1).copied().unwrap_or(""),
            tertiary: labels.get(2).copied().unwrap_or(""),
        }
    }

    /// Look up a full `A > B > C` path. Matching ignores ASCII case and
    /// spacing around separators but only succeeds on leaves.
    pub fn find(path: &str) -> Option<Self> {
        let wanted = split_path(path);
        if wanted.is_empty() {
            return None;
        }
        leaf_paths()
            .into_iter()
            .find(|labels| {
                labels.len() == wanted.len()
                    && labels
                        .iter()
                        .zip(&wanted)
                        .all(|(a, b)| a.eq_ignore_ascii_case(b))
            })
            .map(|labels| Self::from_labels(&labels))
    }

    /// Look up a bare leaf label such as `"Field Shirts"`. Labels shared by
    /// more than one leaf do not match.
    pub fn find_by_label(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.is_empty() {
            return None;
        }
        let mut matches = leaf_paths().into_iter().filter(|labels| {
            labels
                .last()
                .is_some_and(|leaf| leaf.eq_ignore_ascii_case(label))
        });
        let first = matches.next()?;
        matches.next().is_none().then(|| Self::from_labels(&first))
    }

    /// Find the leaf a model answer points at: the stated path first, then
    /// the individual level fields, then the last label of either.
    pub fn resolve(copy: &CatalogCopy) -> Option<Self> {
        let levels = join_levels(copy);
        Self::find(&copy.nav_path)
            .or_else(|| Self::find(&levels))
            .or_else(|| Self::find_last_label(&copy.nav_path))
            .or_else(|| Self::find_last_label(&levels))
    }

    fn find_last_label(path: &str) -> Option<Self> {
        split_path(path)
            .last()
            .and_then(|label| Self::find_by_label(label))
    }

    pub fn path(&self) -> String {
        [self.primary, self.secondary, self.tertiary]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(PATH_SEPARATOR)
    }

    pub fn apply(&self, copy: &mut CatalogCopy) {
        copy.nav_primary = self.primary.to_string();
        copy.nav_secondary = self.secondary.to_string();
        copy.nav_tertiary = self.tertiary.to_string();
        copy.nav_path = self.path();
    }
}

fn join_levels(copy: &CatalogCopy) -> String {
    [&copy.nav_primary, &copy.nav_secondary, &copy.nav_tertiary]
        .into_iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(PATH_SEPARATOR)
}

/// Split `navPath` over the three level fields. Anything past the third
/// level stays in `navTertiary`.
fn fill_levels_from_path(copy: &mut CatalogCopy) {
    let parts: Vec<String> = split_path(&copy.nav_path)
        .into_iter()
        .map(str::to_string)
        .collect();
    let mut parts = parts.into_iter();
    copy.nav_primary = parts.next().unwrap_or_default();
    copy.nav_secondary = parts.next().unwrap_or_default();
    copy.nav_tertiary = parts.collect::<Vec<_>>().join(PATH_SEPARATOR);
}

/// Whether the level fields and `navPath` describe the same path.
pub fn is_consistent(copy: &CatalogCopy) -> bool {
    split_path(&copy.nav_path) == split_path(&join_levels(copy))
}

/// Make the navigation fields of `copy` mutually consistent.
///
/// Returns `true` when a leaf of [`SITE_MAP`] was matched. Otherwise the
/// path is rebuilt from the level fields so the two still agree, or the level
/// fields are filled from the path when they are all blank.
pub fn repair_navigation(copy: &mut CatalogCopy) -> bool {
    match NavPlacement::resolve(copy) {
        Some(placement) => {
            if !is_consistent(copy) || copy.nav_path != placement.path() {
                debug!(
                    nav_path = %copy.nav_path,
                    repaired = %placement.path(),
                    "Normalised navigation placement"
                );
            }
            placement.apply(copy);
            true
        }
        None => {
            warn!(nav_path = %copy.nav_path, "Navigation placement not in site map");
            if join_levels(copy).is_empty() {
                fill_levels_from_path(copy);
            }
            copy.nav_path = join_levels(copy);
            false
        }
    }
}
