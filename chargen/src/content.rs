use indexmap::IndexMap;

/// Content packs compiled into the crate, in load order.
pub fn builtin_packs() -> IndexMap<&'static str, &'static str> {
    IndexMap::from([
        ("races.yaml", include_str!("../content/races.yaml")),
        ("classes.yaml", include_str!("../content/classes.yaml")),
        ("backgrounds.yaml", include_str!("../content/backgrounds.yaml")),
    ])
}
