//! Flattens selected equipment keys against a choice's option tree.
//!
//! A key is one of:
//! - an item id (`longsword`), matched against `Item`/`CountedItem` options and,
//!   failing that, against the leaves of `NestedChoice` options;
//! - a bundle marker (`bundle_0`), any key without `:` that contains `bundle`;
//! - a composite key `bundle_<n>:<position>:<leaf>` picking the leaf for the
//!   nested choice at `position` inside bundle `n`. A composite key on its own
//!   also selects its bundle;
//! - a path key `nested_<i>/<key>`, resolving `<key>` inside the nested choice
//!   at option `i`. Paths chain: `nested_1/nested_0/bundle_2`.
//!
//! Nothing here fails. A key that resolves to nothing becomes a passthrough
//! item whose id and name are the key exactly as it was selected.

use tracing::{debug, trace, warn};

use crate::compiled::{EquipmentItem, ItemType};
use crate::options::{BundleItem, Choice, ChoiceOption, OptionSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKey<'a> {
    Plain(&'a str),
    Bundle {
        marker: &'a str,
        index: Option<usize>,
    },
    Composite {
        bundle: usize,
        position: usize,
        leaf: &'a str,
    },
    Nested {
        index: usize,
        rest: &'a str,
    },
}

/// `bundle_3` -> 3
fn bundle_index(marker: &str) -> Option<usize> {
    marker.strip_prefix("bundle_")?.parse().ok()
}

/// `nested_2/bundle_0` -> (2, "bundle_0")
fn nested_path(key: &str) -> Option<(usize, &str)> {
    let (head, rest) = key.strip_prefix("nested_")?.split_once('/')?;
    let index = head.parse().ok()?;
    (!rest.is_empty()).then_some((index, rest))
}

pub fn parse_key(key: &str) -> SelectionKey<'_> {
    if let Some((index, rest)) = nested_path(key) {
        return SelectionKey::Nested { index, rest };
    }
    if key.contains(':') {
        let parts: Vec<&str> = key.split(':').collect();
        if let [marker, position, leaf] = parts[..] {
            if let (Some(bundle), Ok(position)) = (bundle_index(marker), position.parse::<usize>()) {
                if !leaf.is_empty() {
                    return SelectionKey::Composite {
                        bundle,
                        position,
                        leaf,
                    };
                }
            }
        }
        // Malformed composite: opaque id.
        return SelectionKey::Plain(key);
    }
    if key.contains("bundle") {
        return SelectionKey::Bundle {
            marker: key,
            index: bundle_index(key),
        };
    }
    SelectionKey::Plain(key)
}

/// Extracts the leaf item id from a composite key; anything else is returned unchanged.
pub fn decode_bundle_key(key: &str) -> &str {
    match parse_key(key) {
        SelectionKey::Composite { leaf, .. } => leaf,
        _ => key,
    }
}

/// A key relative to the choice being resolved, alongside the key as selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Scoped<'a> {
    key: &'a str,
    raw: &'a str,
}

impl<'a> Scoped<'a> {
    fn top(key: &'a str) -> Self {
        Scoped { key, raw: key }
    }

    fn within(self, key: &'a str) -> Self {
        Scoped { key, raw: self.raw }
    }
}

/// One resolvable unit: a plain key, a bundle with the leaf picks made inside
/// it, or every key addressed into one nested choice.
#[derive(Debug)]
enum Unit<'a> {
    Plain(Scoped<'a>),
    Bundle {
        marker: Option<&'a str>,
        index: Option<usize>,
        leaves: Vec<(usize, Scoped<'a>)>,
        raw: Vec<&'a str>,
    },
    Nested {
        index: usize,
        keys: Vec<Scoped<'a>>,
    },
}

fn group_keys<'a>(keys: &[Scoped<'a>]) -> Vec<Unit<'a>> {
    let mut units: Vec<Unit<'a>> = Vec::new();
    for &key in keys {
        match parse_key(key.key) {
            SelectionKey::Plain(_) => units.push(Unit::Plain(key)),
            SelectionKey::Nested { index, rest } => {
                let existing = units
                    .iter_mut()
                    .find(|u| matches!(u, Unit::Nested { index: i, .. } if *i == index));
                match existing {
                    Some(Unit::Nested { keys, .. }) => keys.push(key.within(rest)),
                    _ => units.push(Unit::Nested {
                        index,
                        keys: vec![key.within(rest)],
                    }),
                }
            }
            SelectionKey::Bundle { marker, index } => {
                // Each marker picks the bundle once; only a unit opened by
                // composite keys is still waiting for its marker.
                let existing = units.iter_mut().find(|u| {
                    matches!(u, Unit::Bundle { marker: None, index: Some(i), .. } if Some(*i) == index)
                });
                match existing {
                    Some(Unit::Bundle {
                        marker: slot, raw, ..
                    }) => {
                        *slot = Some(marker);
                        raw.push(key.raw);
                    }
                    _ => units.push(Unit::Bundle {
                        marker: Some(marker),
                        index,
                        leaves: Vec::new(),
                        raw: vec![key.raw],
                    }),
                }
            }
            SelectionKey::Composite {
                bundle,
                position,
                leaf,
            } => {
                let existing = units
                    .iter_mut()
                    .find(|u| matches!(u, Unit::Bundle { index: Some(i), .. } if *i == bundle));
                match existing {
                    Some(Unit::Bundle { leaves, raw, .. }) => {
                        leaves.push((position, key.within(leaf)));
                        raw.push(key.raw);
                    }
                    _ => units.push(Unit::Bundle {
                        marker: None,
                        index: Some(bundle),
                        leaves: vec![(position, key.within(leaf))],
                        raw: vec![key.raw],
                    }),
                }
            }
        }
    }
    units
}

/// Resolves a single selected key.
pub fn resolve_key(choice: Option<&Choice>, key: &str, out: &mut Vec<EquipmentItem>) {
    resolve_scoped(choice, &[Scoped::top(key)], out);
}

/// Resolves every key of one selection, grouping composite keys with their bundle.
pub fn resolve_keys(choice: Option<&Choice>, keys: &[String], out: &mut Vec<EquipmentItem>) {
    let keys: Vec<Scoped<'_>> = keys.iter().map(|k| Scoped::top(k)).collect();
    resolve_scoped(choice, &keys, out);
}

fn pass_through(keys: &[Scoped<'_>], out: &mut Vec<EquipmentItem>) {
    out.extend(keys.iter().map(|k| EquipmentItem::passthrough(k.raw)));
}

fn resolve_scoped(choice: Option<&Choice>, keys: &[Scoped<'_>], out: &mut Vec<EquipmentItem>) {
    let Some(choice) = choice else {
        debug!(count = keys.len(), "no choice for equipment keys; passing through");
        pass_through(keys, out);
        return;
    };

    let options = match &choice.options {
        OptionSet::Explicit { options } => options,
        OptionSet::CategoryReference { category_id, .. } => {
            // Membership is checked by the rules engine, not here.
            trace!(choice = %choice.id, category = %category_id, "category reference");
            out.extend(
                keys.iter()
                    .map(|k| EquipmentItem::new(k.key, k.key, 1, ItemType::Generic)),
            );
            return;
        }
    };

    for unit in group_keys(keys) {
        match unit {
            Unit::Plain(key) => resolve_plain(choice, options, key, out),
            Unit::Bundle {
                marker,
                index,
                leaves,
                raw,
            } => {
                if let Some(item) = marker.and_then(|m| match_item_option(options, m)) {
                    out.push(item);
                    continue;
                }
                match pick_bundle(options, marker, index) {
                    Some(items) => expand_bundle(choice, items, &leaves, out),
                    None => {
                        debug!(choice = %choice.id, keys = ?raw, "bundle not found; passing through");
                        out.extend(raw.into_iter().map(EquipmentItem::passthrough));
                    }
                }
            }
            Unit::Nested { index, keys } => match options.get(index) {
                Some(ChoiceOption::NestedChoice { choice: nested }) => {
                    trace!(choice = %choice.id, nested = %nested.id, "descending into nested choice");
                    resolve_scoped(Some(nested.as_ref()), &keys, out);
                }
                _ => {
                    debug!(choice = %choice.id, index, "no nested choice at index; passing through");
                    pass_through(&keys, out);
                }
            },
        }
    }
}

fn resolve_plain(
    choice: &Choice,
    options: &[ChoiceOption],
    key: Scoped<'_>,
    out: &mut Vec<EquipmentItem>,
) {
    if let Some(item) = match_item_option(options, key.key) {
        out.push(item);
        return;
    }
    if let Some(item) = find_nested_leaf(options, key.key) {
        trace!(choice = %choice.id, key = key.key, "resolved through nested choice");
        out.push(item);
        return;
    }
    debug!(choice = %choice.id, key = key.raw, "unmatched equipment key; passing through");
    out.push(EquipmentItem::passthrough(key.raw));
}

fn match_item_option(options: &[ChoiceOption], key: &str) -> Option<EquipmentItem> {
    options.iter().find_map(|opt| match opt {
        ChoiceOption::Item { item_id, name } if item_id == key => {
            Some(EquipmentItem::new(item_id.as_str(), name.as_str(), 1, ItemType::Equipment))
        }
        ChoiceOption::CountedItem {
            item_id,
            name,
            quantity,
        } if item_id == key => Some(EquipmentItem::new(
            item_id.as_str(),
            name.as_str(),
            *quantity,
            ItemType::Equipment,
        )),
        _ => None,
    })
}

/// Depth-first search through `NestedChoice` options for an item with this id.
/// Category references are not searched: they would accept anything.
fn find_nested_leaf(options: &[ChoiceOption], key: &str) -> Option<EquipmentItem> {
    options.iter().find_map(|opt| match opt {
        ChoiceOption::NestedChoice { choice } => {
            let nested = choice.explicit_options();
            match_item_option(nested, key).or_else(|| find_nested_leaf(nested, key))
        }
        ChoiceOption::Item { .. } | ChoiceOption::CountedItem { .. } | ChoiceOption::Bundle { .. } => {
            None
        }
    })
}

fn pick_bundle<'c>(
    options: &'c [ChoiceOption],
    marker: Option<&str>,
    index: Option<usize>,
) -> Option<&'c [BundleItem]> {
    match index {
        Some(n) => match options.get(n) {
            Some(ChoiceOption::Bundle { items }) => Some(items),
            _ => None,
        },
        // A marker without an index picks the first bundle on offer.
        None if marker.is_some() => options.iter().find_map(|opt| match opt {
            ChoiceOption::Bundle { items } => Some(items.as_slice()),
            _ => None,
        }),
        None => None,
    }
}

fn expand_bundle(
    owner: &Choice,
    items: &[BundleItem],
    leaves: &[(usize, Scoped<'_>)],
    out: &mut Vec<EquipmentItem>,
) {
    for (position, item) in items.iter().enumerate() {
        match item {
            BundleItem::Item {
                item_id,
                name,
                quantity,
            } => {
                trace!(item = %item_id, quantity, "bundle item");
                out.push(EquipmentItem::new(
                    item_id.as_str(),
                    name.as_str(),
                    *quantity,
                    ItemType::Equipment,
                ));
            }
            BundleItem::Choice { choice } => {
                let picks: Vec<Scoped<'_>> = leaves
                    .iter()
                    .filter(|(p, _)| *p == position)
                    .map(|(_, leaf)| *leaf)
                    .collect();
                if picks.is_empty() {
                    warn!(
                        choice = %owner.id,
                        nested = %choice.id,
                        position,
                        "bundle selected without a pick for its nested choice"
                    );
                    continue;
                }
                resolve_scoped(Some(choice.as_ref()), &picks, out);
            }
        }
    }
    // Leaves aimed at a concrete item or past the end have nowhere to go.
    for (position, leaf) in leaves {
        if !matches!(items.get(*position), Some(BundleItem::Choice { .. })) {
            debug!(choice = %owner.id, key = leaf.raw, position, "no nested choice at position; passing through");
            out.push(EquipmentItem::passthrough(leaf.raw));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_each_key_shape() {
        assert_eq!(parse_key("longsword"), SelectionKey::Plain("longsword"));
        assert_eq!(
            parse_key("bundle_2"),
            SelectionKey::Bundle {
                marker: "bundle_2",
                index: Some(2)
            }
        );
        assert_eq!(
            parse_key("bundle"),
            SelectionKey::Bundle {
                marker: "bundle",
                index: None
            }
        );
        assert_eq!(
            parse_key("bundle_1:0:greatclub"),
            SelectionKey::Composite {
                bundle: 1,
                position: 0,
                leaf: "greatclub"
            }
        );
    }

    #[test]
    fn malformed_composites_are_opaque() {
        assert_eq!(parse_key("bundle_1:greatclub"), SelectionKey::Plain("bundle_1:greatclub"));
        assert_eq!(parse_key("bundle_1:x:greatclub"), SelectionKey::Plain("bundle_1:x:greatclub"));
        assert_eq!(parse_key("bundle_1:0:a:b"), SelectionKey::Plain("bundle_1:0:a:b"));
        assert_eq!(parse_key("bundle_1:0:"), SelectionKey::Plain("bundle_1:0:"));
    }

    #[test]
    fn composites_join_their_bundle_marker() {
        let keys = ["bundle_1:0:greatclub", "bundle_1", "dagger"].map(Scoped::top);
        let units = group_keys(&keys);
        assert_eq!(units.len(), 2);
        match &units[0] {
            Unit::Bundle {
                marker,
                index,
                leaves,
                raw,
            } => {
                assert_eq!(*marker, Some("bundle_1"));
                assert_eq!(*index, Some(1));
                assert_eq!(leaves, &vec![(0, Scoped::top("bundle_1:0:greatclub").within("greatclub"))]);
                assert_eq!(raw.len(), 2);
            }
            other => panic!("expected bundle unit, got {:?}", other),
        }
    }

    #[test]
    fn nested_paths_parse_before_composites() {
        assert_eq!(
            parse_key("nested_1/bundle_0:2:rapier"),
            SelectionKey::Nested {
                index: 1,
                rest: "bundle_0:2:rapier"
            }
        );
        assert_eq!(parse_key("nested_x/rapier"), SelectionKey::Plain("nested_x/rapier"));
        assert_eq!(parse_key("nested_1/"), SelectionKey::Plain("nested_1/"));
    }

    #[test]
    fn repeated_marker_opens_a_second_unit() {
        let keys = ["bundle_0", "bundle_0", "bundle_0:1:dagger"].map(Scoped::top);
        let units = group_keys(&keys);
        assert_eq!(units.len(), 2);
        match &units[0] {
            Unit::Bundle { leaves, .. } => assert_eq!(leaves.len(), 1),
            other => panic!("expected bundle unit, got {:?}", other),
        }
    }
}
