use super::value::{Mapping, Value};

/// Merges `overlay` into `base`. Nested maps merge recursively whatever
/// their shape (`Map`, `StrMap` or `AnyMap`); any other value, arrays
/// included, replaces what was there.
///
/// A merged node becomes a `Map`, so non-string `AnyMap` keys are turned
/// into their text form.
pub(crate) fn deep_merge(base: &mut Mapping, overlay: Mapping) {
    for (key, value) in overlay {
        match base.get_mut(&key) {
            Some(node) if node.is_mapping() && value.is_mapping() => {
                deep_merge(as_map_mut(node), into_mapping(value));
            }
            _ => {
                base.insert(key, value);
            }
        }
    }
}

/// Converts any mapping shape to a `Mapping`; anything else becomes empty.
fn into_mapping(value: Value) -> Mapping {
    match value {
        Value::Map(map) => map,
        Value::StrMap(map) => map.into_iter().map(|(k, v)| (k, Value::String(v))).collect(),
        Value::AnyMap(map) => map.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
        _ => Mapping::new(),
    }
}

/// Writes `value` at `path`, creating intermediate maps as needed.
///
/// An intermediate node that is not a map is replaced by one. `StrMap` and
/// `AnyMap` nodes are converted so their existing entries survive.
pub(crate) fn set_at_path(map: &mut Mapping, path: &[&str], value: Value) {
    let Some((first, rest)) = path.split_first() else {
        return;
    };

    if rest.is_empty() {
        map.insert(first.to_string(), value);
        return;
    }

    let node = map.entry(first.to_string()).or_default();
    set_at_path(as_map_mut(node), rest, value);
}

fn as_map_mut(node: &mut Value) -> &mut Mapping {
    if !matches!(node, Value::Map(_)) {
        *node = Value::Map(into_mapping(std::mem::take(node)));
    }
    match node {
        Value::Map(map) => map,
        _ => unreachable!("node was just set to a map"),
    }
}
