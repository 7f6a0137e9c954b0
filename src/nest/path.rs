//! Header path parsing and value placement
//!
//! A header such as `profile.links[url]` is parsed once into typed segments
//! and then used to place every cell value of its column. Parsing is total:
//! text that does not form a valid array marker is kept as a literal key.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

// `group[subkey]` with no nested or stray brackets
static ARRAY_MARKER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([^\[\]]+)\[([^\[\]]*)\]$").unwrap()
});

/// One step of a header path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Plain object key
    Key(String),
    /// Field `subkey` of the current element of the repeating group `group`
    ArrayField { group: String, subkey: String },
}

impl Segment {
    /// Classify a single segment of a header
    pub fn parse(raw: &str) -> Self {
        match ARRAY_MARKER_REGEX.captures(raw) {
            Some(caps) => {
                let group = caps[1].to_string();
                let subkey = &caps[2];
                if subkey.is_empty() {
                    // `name[]` carries no field name
                    Segment::Key(group)
                } else {
                    Segment::ArrayField {
                        group,
                        subkey: subkey.to_string(),
                    }
                }
            }
            None => Segment::Key(raw.to_string()),
        }
    }

    /// The key used when this segment is traversed as an object key
    pub fn key(&self) -> &str {
        match self {
            Segment::Key(key) => key,
            Segment::ArrayField { group, .. } => group,
        }
    }
}

/// A parsed header: never empty, always at least one segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderPath {
    segments: Vec<Segment>,
}

impl HeaderPath {
    /// Parse a header using the default `.` separator
    pub fn parse(header: &str) -> Self {
        Self::parse_with(header, '.')
    }

    /// Parse a header using a custom segment separator
    pub fn parse_with(header: &str, separator: char) -> Self {
        let segments = split_segments(header, separator)
            .into_iter()
            .map(Segment::parse)
            .collect();

        HeaderPath { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Place `value` at this path.
    ///
    /// A path ending in a plain key writes straight into `target`, creating
    /// (or replacing non-object) intermediate values. A path ending in an
    /// array marker only touches the accumulator for its group; the group is
    /// merged into the document once all rows have been seen.
    pub fn apply(&self, target: &mut Map<String, Value>, value: &str, groups: &mut GroupAccumulators) {
        let Some((last, prefix)) = self.segments.split_last() else {
            return;
        };

        match last {
            Segment::ArrayField { group, subkey } => {
                let mut group_path: Vec<String> =
                    prefix.iter().map(|s| s.key().to_string()).collect();
                group_path.push(group.clone());
                groups.record(group_path, subkey, value);
            }
            Segment::Key(key) => {
                let keys: Vec<&str> = prefix
                    .iter()
                    .map(Segment::key)
                    .chain(std::iter::once(key.as_str()))
                    .collect();
                write_at(target, keys.as_slice(), Value::String(value.to_string()));
            }
        }
    }
}

/// Split on the separator, except inside a closed `[...]` pair. An unclosed
/// `[` is ordinary text.
fn split_segments(header: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_brackets = false;
    let mut start = 0;

    for (idx, ch) in header.char_indices() {
        match ch {
            '[' if !in_brackets => in_brackets = header[idx + 1..].contains(']'),
            ']' => in_brackets = false,
            c if c == separator && !in_brackets => {
                parts.push(&header[start..idx]);
                start = idx + c.len_utf8();
            }
            _ => {}
        }
    }

    parts.push(&header[start..]);
    parts
}

/// Write `value` under `keys`, last write wins at every level
pub(crate) fn write_at<K: AsRef<str>>(map: &mut Map<String, Value>, keys: &[K], value: Value) {
    match keys {
        [] => {}
        [last] => {
            map.insert(last.as_ref().to_string(), value);
        }
        [head, rest @ ..] => {
            let slot = map
                .entry(head.as_ref().to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            if let Value::Object(child) = slot {
                write_at(child, rest, value);
            }
        }
    }
}

/// In-progress elements of every repeating group, keyed by group path
#[derive(Debug, Default)]
pub struct GroupAccumulators {
    groups: IndexMap<Vec<String>, Vec<Map<String, Value>>>,
}

impl GroupAccumulators {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `subkey` into the group's last element, or start a new element
    /// when the last one already has that field.
    pub fn record(&mut self, group_path: Vec<String>, subkey: &str, value: &str) {
        let elements = self.groups.entry(group_path).or_default();
        let value = Value::String(value.to_string());

        let starts_new = elements
            .last()
            .map_or(true, |last| last.contains_key(subkey));

        if starts_new {
            let mut element = Map::new();
            element.insert(subkey.to_string(), value);
            elements.push(element);
        } else if let Some(last) = elements.last_mut() {
            last.insert(subkey.to_string(), value);
        }
    }

    #[cfg(test)]
    fn elements<K: AsRef<str>>(&self, group_path: &[K]) -> Option<&[Map<String, Value>]> {
        self.groups
            .iter()
            .find(|(path, _)| {
                path.len() == group_path.len()
                    && path.iter().zip(group_path).all(|(a, b)| a == b.as_ref())
            })
            .map(|(_, elements)| elements.as_slice())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Move every non-empty group into `target` at its group path, in the
    /// order the groups were first seen.
    pub fn merge_into(self, target: &mut Map<String, Value>) {
        for (path, elements) in self.groups {
            let elements: Vec<Value> = elements
                .into_iter()
                .filter(|element| !element.is_empty())
                .map(Value::Object)
                .collect();

            if elements.is_empty() {
                continue;
            }

            log::debug!("merging group {} ({} elements)", path.join("."), elements.len());
            write_at(target, path.as_slice(), Value::Array(elements));
        }
    }
}
