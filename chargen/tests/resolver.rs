use chargen::{
    decode_bundle_key, resolve_key, resolve_keys, BundleItem, Choice, ChoiceCategory,
    ChoiceOption, EquipmentItem, ItemType, OptionSet,
};
use proptest::prelude::*;

fn item(id: &str, name: &str) -> ChoiceOption {
    ChoiceOption::Item {
        item_id: id.into(),
        name: name.into(),
    }
}

fn bundle_item(id: &str, name: &str, quantity: u32) -> BundleItem {
    BundleItem::Item {
        item_id: id.into(),
        name: name.into(),
        quantity,
    }
}

fn choice(id: &str, options: Vec<ChoiceOption>) -> Choice {
    Choice {
        id: id.into(),
        description: String::new(),
        category: ChoiceCategory::Equipment,
        choose: 1,
        options: OptionSet::Explicit { options },
    }
}

fn category_choice(id: &str, category_id: &str) -> Choice {
    Choice {
        id: id.into(),
        description: String::new(),
        category: ChoiceCategory::Equipment,
        choose: 1,
        options: OptionSet::CategoryReference {
            category_id: category_id.into(),
            exclude_ids: vec![],
        },
    }
}

fn keys(ks: &[&str]) -> Vec<String> {
    ks.iter().map(|k| k.to_string()).collect()
}

fn ids(items: &[EquipmentItem]) -> Vec<(&str, u32)> {
    items.iter().map(|i| (i.item_id.as_str(), i.quantity)).collect()
}

// Sword-and-board bundle, or a greatsword.
fn sword_or_greatsword() -> Choice {
    choice(
        "weapons",
        vec![
            ChoiceOption::Bundle {
                items: vec![
                    bundle_item("longsword", "Longsword", 1),
                    bundle_item("shield", "Shield", 1),
                ],
            },
            ChoiceOption::CountedItem {
                item_id: "greatsword".into(),
                name: "Greatsword".into(),
                quantity: 1,
            },
        ],
    )
}

// A bundle holding a nested "any martial weapon" choice plus a shield, or
// a nested explicit choice of two weapons.
fn martial_weapons() -> Choice {
    choice(
        "fighter-weapons",
        vec![
            ChoiceOption::Bundle {
                items: vec![
                    BundleItem::Choice {
                        choice: Box::new(category_choice("martial", "martial-weapons")),
                    },
                    bundle_item("shield", "Shield", 1),
                ],
            },
            ChoiceOption::NestedChoice {
                choice: Box::new(choice(
                    "two-martial",
                    vec![item("rapier", "Rapier"), item("warhammer", "Warhammer")],
                )),
            },
        ],
    )
}

#[test]
fn bundle_marker_expands_bundle_not_alternative() {
    let mut out = Vec::new();
    resolve_key(Some(&sword_or_greatsword()), "bundle_0", &mut out);
    assert_eq!(ids(&out), vec![("longsword", 1), ("shield", 1)]);
    assert!(out.iter().all(|i| i.item_type == ItemType::Equipment));
    assert_eq!(out[0].name, "Longsword");
}

#[test]
fn unindexed_marker_picks_first_bundle() {
    let mut out = Vec::new();
    resolve_key(Some(&sword_or_greatsword()), "bundle", &mut out);
    assert_eq!(ids(&out), vec![("longsword", 1), ("shield", 1)]);
}

#[test]
fn marker_pointing_at_non_bundle_passes_through() {
    let mut out = Vec::new();
    resolve_key(Some(&sword_or_greatsword()), "bundle_1", &mut out);
    assert_eq!(out, vec![EquipmentItem::passthrough("bundle_1")]);
}

#[test]
fn counted_item_keeps_quantity() {
    let handaxes = choice(
        "ranged",
        vec![ChoiceOption::CountedItem {
            item_id: "handaxe".into(),
            name: "Handaxe".into(),
            quantity: 2,
        }],
    );
    let mut out = Vec::new();
    resolve_key(Some(&handaxes), "handaxe", &mut out);
    assert_eq!(ids(&out), vec![("handaxe", 2)]);
}

#[test]
fn bundle_quantities_copied_verbatim() {
    let c = choice(
        "armor",
        vec![
            item("chain-mail", "Chain Mail"),
            ChoiceOption::Bundle {
                items: vec![
                    bundle_item("leather-armor", "Leather Armor", 1),
                    bundle_item("longbow", "Longbow", 1),
                    bundle_item("arrow", "Arrow", 20),
                ],
            },
        ],
    );
    let mut out = Vec::new();
    resolve_key(Some(&c), "bundle_1", &mut out);
    assert_eq!(
        ids(&out),
        vec![("leather-armor", 1), ("longbow", 1), ("arrow", 20)]
    );
}

#[test]
fn missing_choice_passes_every_key_through() {
    let mut out = Vec::new();
    resolve_keys(None, &keys(&["rope", "bundle_0", "bundle_0:1:torch"]), &mut out);
    assert_eq!(
        out,
        vec![
            EquipmentItem::passthrough("rope"),
            EquipmentItem::passthrough("bundle_0"),
            EquipmentItem::passthrough("bundle_0:1:torch"),
        ]
    );
}

#[test]
fn category_reference_accepts_keys_verbatim() {
    let c = category_choice("focus", "arcane-foci");
    let mut out = Vec::new();
    resolve_keys(Some(&c), &keys(&["orb", "not-even-a-focus"]), &mut out);
    assert_eq!(ids(&out), vec![("orb", 1), ("not-even-a-focus", 1)]);
    assert!(out.iter().all(|i| i.item_type == ItemType::Generic));
}

#[test]
fn composite_key_fills_nested_choice_inside_bundle() {
    let mut out = Vec::new();
    resolve_keys(
        Some(&martial_weapons()),
        &keys(&["bundle_0:0:longsword"]),
        &mut out,
    );
    assert_eq!(ids(&out), vec![("longsword", 1), ("shield", 1)]);
    assert_eq!(out[0].item_type, ItemType::Generic);
    assert_eq!(out[1].item_type, ItemType::Equipment);
}

#[test]
fn marker_and_composite_resolve_once() {
    let mut out = Vec::new();
    resolve_keys(
        Some(&martial_weapons()),
        &keys(&["bundle_0", "bundle_0:0:battleaxe"]),
        &mut out,
    );
    assert_eq!(ids(&out), vec![("battleaxe", 1), ("shield", 1)]);
}

#[test]
fn bundle_without_nested_pick_yields_concrete_items_only() {
    let mut out = Vec::new();
    resolve_key(Some(&martial_weapons()), "bundle_0", &mut out);
    assert_eq!(ids(&out), vec![("shield", 1)]);
}

#[test]
fn composite_leaf_without_nested_choice_passes_through() {
    let mut out = Vec::new();
    resolve_keys(
        Some(&sword_or_greatsword()),
        &keys(&["bundle_0:1:dagger", "bundle_0:7:club"]),
        &mut out,
    );
    assert_eq!(
        out,
        vec![
            EquipmentItem::new("longsword", "Longsword", 1, ItemType::Equipment),
            EquipmentItem::new("shield", "Shield", 1, ItemType::Equipment),
            EquipmentItem::passthrough("bundle_0:1:dagger"),
            EquipmentItem::passthrough("bundle_0:7:club"),
        ]
    );
}

#[test]
fn unmatched_leaf_in_nested_choice_keeps_full_key() {
    let c = choice(
        "pack",
        vec![ChoiceOption::Bundle {
            items: vec![
                bundle_item("rope", "Rope", 1),
                BundleItem::Choice {
                    choice: Box::new(choice("light", vec![item("torch", "Torch")])),
                },
            ],
        }],
    );
    let mut out = Vec::new();
    resolve_keys(Some(&c), &keys(&["bundle_0:1:dagger"]), &mut out);
    assert_eq!(ids(&out), vec![("rope", 1), ("bundle_0:1:dagger", 1)]);
    assert_eq!(out[1], EquipmentItem::passthrough("bundle_0:1:dagger"));
}

#[test]
fn each_marker_expands_its_bundle() {
    let mut out = Vec::new();
    resolve_keys(
        Some(&sword_or_greatsword()),
        &keys(&["bundle_0", "bundle_0"]),
        &mut out,
    );
    assert_eq!(
        ids(&out),
        vec![("longsword", 1), ("shield", 1), ("longsword", 1), ("shield", 1)]
    );
}

// A dagger, or a nested pick between a rapier and a bow-and-quiver bundle.
fn dagger_or_nested_bundle() -> Choice {
    choice(
        "sidearm",
        vec![
            item("dagger", "Dagger"),
            ChoiceOption::NestedChoice {
                choice: Box::new(choice(
                    "finesse-or-bow",
                    vec![
                        item("rapier", "Rapier"),
                        ChoiceOption::Bundle {
                            items: vec![
                                bundle_item("shortbow", "Shortbow", 1),
                                bundle_item("quiver", "Quiver", 1),
                            ],
                        },
                    ],
                )),
            },
        ],
    )
}

#[test]
fn nested_path_reaches_bundle_inside_nested_choice() {
    let c = dagger_or_nested_bundle();
    let mut out = Vec::new();
    resolve_keys(Some(&c), &keys(&["nested_1/bundle_1"]), &mut out);
    assert_eq!(ids(&out), vec![("shortbow", 1), ("quiver", 1)]);

    out.clear();
    resolve_keys(Some(&c), &keys(&["nested_1/rapier"]), &mut out);
    assert_eq!(ids(&out), vec![("rapier", 1)]);
}

#[test]
fn bad_nested_paths_pass_through() {
    let c = dagger_or_nested_bundle();
    let mut out = Vec::new();
    resolve_keys(
        Some(&c),
        &keys(&["nested_0/bundle_1", "nested_1/longbow", "bundle_1"]),
        &mut out,
    );
    assert_eq!(
        out,
        vec![
            EquipmentItem::passthrough("nested_0/bundle_1"),
            EquipmentItem::passthrough("nested_1/longbow"),
            EquipmentItem::passthrough("bundle_1"),
        ]
    );
}

#[test]
fn nested_choice_leaves_are_selectable_directly() {
    let mut out = Vec::new();
    resolve_keys(
        Some(&martial_weapons()),
        &keys(&["rapier", "warhammer"]),
        &mut out,
    );
    assert_eq!(ids(&out), vec![("rapier", 1), ("warhammer", 1)]);
    assert_eq!(out[0].name, "Rapier");
}

#[test]
fn malformed_composite_is_an_opaque_key() {
    let mut out = Vec::new();
    resolve_key(Some(&martial_weapons()), "bundle_0:longsword", &mut out);
    assert_eq!(out, vec![EquipmentItem::passthrough("bundle_0:longsword")]);
}

#[test]
fn item_id_containing_bundle_matches_item_first() {
    let c = choice(
        "packs",
        vec![
            item("burglars-bundle", "Burglar's Bundle"),
            ChoiceOption::Bundle {
                items: vec![bundle_item("rope", "Rope", 1)],
            },
        ],
    );
    let mut out = Vec::new();
    resolve_key(Some(&c), "burglars-bundle", &mut out);
    assert_eq!(ids(&out), vec![("burglars-bundle", 1)]);
}

#[test]
fn decode_examples() {
    assert_eq!(decode_bundle_key("bundle_1:0:greatclub"), "greatclub");
    assert_eq!(decode_bundle_key("longsword"), "longsword");
    assert_eq!(decode_bundle_key("bundle_1:greatclub"), "bundle_1:greatclub");
    assert_eq!(decode_bundle_key("bundle_1:0:greatclub:x"), "bundle_1:0:greatclub:x");
    assert_eq!(decode_bundle_key(""), "");
}

proptest! {
    #[test]
    fn unmatched_keys_pass_through_one_each(ks in prop::collection::vec("[ac-z]{1,8}", 0..12)) {
        let c = choice("c", vec![item("item-1", "Item 1"), item("item-2", "Item 2")]);
        for owner in [None, Some(&c)] {
            let mut out = Vec::new();
            resolve_keys(owner, &ks, &mut out);
            prop_assert_eq!(out.len(), ks.len());
            for (item, key) in out.iter().zip(&ks) {
                prop_assert_eq!(&item.item_id, key);
                prop_assert_eq!(&item.name, key);
                prop_assert_eq!(item.quantity, 1);
            }
        }
    }

    #[test]
    fn decode_leaves_colon_free_keys_alone(key in "[^:]{0,16}") {
        prop_assert_eq!(decode_bundle_key(&key), key.as_str());
    }

    #[test]
    fn decode_extracts_leaf(n in 0usize..10, pos in 0usize..10, leaf in "[a-z][a-z-]{0,10}") {
        let key = format!("bundle_{}:{}:{}", n, pos, leaf);
        prop_assert_eq!(decode_bundle_key(&key), leaf.as_str());
    }
}
