use listingbot::ai::common::parse_model_json;
use listingbot::taxonomy::{self, NavPlacement, PATH_SEPARATOR};
use listingbot::{CatalogCopy, IdentificationRecord, SeoMetadata};
use proptest::prelude::*;

fn copy_with(primary: &str, secondary: &str, tertiary: &str, path: &str) -> CatalogCopy {
    CatalogCopy {
        suggested_title: "Title".into(),
        description: "Body".into(),
        features: vec![],
        tags: vec![],
        notes_for_lister: String::new(),
        nav_primary: primary.into(),
        nav_secondary: secondary.into(),
        nav_tertiary: tertiary.into(),
        nav_path: path.into(),
        seo: SeoMetadata {
            meta_title: String::new(),
            meta_description: String::new(),
            meta_keywords: vec![],
        },
    }
}

fn leaf_strategy() -> impl Strategy<Value = Vec<&'static str>> {
    proptest::sample::select(taxonomy::leaf_paths())
}

// Property: model output parsing never panics, whatever the model says
proptest! {
    #[test]
    fn prop_parse_model_json_no_panic(s in "(?s).*") {
        let _ = parse_model_json::<IdentificationRecord>(&s);
    }
}

proptest! {
    #[test]
    fn prop_repair_always_leaves_consistent_fields(
        primary in ".{0,20}",
        secondary in ".{0,20}",
        tertiary in ".{0,20}",
        path in ".{0,40}",
    ) {
        let mut copy = copy_with(&primary, &secondary, &tertiary, &path);
        taxonomy::repair_navigation(&mut copy);
        prop_assert!(taxonomy::is_consistent(&copy));
    }
}

proptest! {
    #[test]
    fn prop_leaf_path_found_regardless_of_case(labels in leaf_strategy(), upper in any::<bool>()) {
        let path = labels.join(PATH_SEPARATOR);
        let query = if upper { path.to_uppercase() } else { path.to_lowercase() };
        let placement = NavPlacement::find(&query).unwrap();
        prop_assert_eq!(placement.path(), path);
    }
}

proptest! {
    #[test]
    fn prop_stale_path_is_rebuilt_from_levels(labels in leaf_strategy()) {
        let mut copy = copy_with(
            labels[0],
            labels.get(1).copied().unwrap_or(""),
            labels.get(2).copied().unwrap_or(""),
            "Misc",
        );
        prop_assert!(taxonomy::repair_navigation(&mut copy));
        prop_assert_eq!(copy.nav_path, labels.join(PATH_SEPARATOR));
    }
}
