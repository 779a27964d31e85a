use std::hash::Hash;

use indexmap::IndexSet;

/// Keeps the first occurrence of every value, in first-seen order.
pub fn dedup_stable<T>(values: &[T]) -> Vec<T>
where
    T: Eq + Hash + Clone,
{
    values
        .iter()
        .cloned()
        .collect::<IndexSet<T>>()
        .into_iter()
        .collect()
}

/// In-place variant used on the compiled fields.
pub fn dedup_in_place<T>(values: &mut Vec<T>)
where
    T: Eq + Hash,
{
    let unique: IndexSet<T> = values.drain(..).collect();
    values.extend(unique);
}
