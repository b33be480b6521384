//! Version-pinned table of well-known property names.
//!
//! Entry `i` is encoded as the single marker byte
//! `SYSTEM_STRING_1BYTE_MIN + i`. The table is part of the wire format:
//! entries may never be reordered or removed.

use super::marker::SYSTEM_STRING_1BYTE_COUNT;

pub const SYSTEM_STRINGS: [&str; SYSTEM_STRING_1BYTE_COUNT] = [
    "$s",
    "$t",
    "$v",
    "_attachments",
    "_etag",
    "_rid",
    "_self",
    "_ts",
    "attachments/",
    "coordinates",
    "geometry",
    "GeometryCollection",
    "id",
    "url",
    "Value",
    "label",
    "LineString",
    "link",
    "MultiLineString",
    "MultiPoint",
    "MultiPolygon",
    "name",
    "Name",
    "Type",
    "Point",
    "Polygon",
    "properties",
    "type",
    "value",
    "Feature",
    "FeatureCollection",
    "_id",
];

pub fn system_string_id(text: &str) -> Option<usize> {
    SYSTEM_STRINGS.iter().position(|s| *s == text)
}

pub fn system_string(id: usize) -> Option<&'static str> {
    SYSTEM_STRINGS.get(id).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn table_has_no_duplicates() {
        let distinct: HashSet<_> = SYSTEM_STRINGS.iter().collect();
        assert_eq!(distinct.len(), SYSTEM_STRINGS.len());
    }

    #[test]
    fn lookup_both_ways() {
        assert_eq!(system_string_id("id"), Some(12));
        assert_eq!(system_string(12), Some("id"));
        assert_eq!(system_string_id("title"), None);
        assert_eq!(system_string(SYSTEM_STRING_1BYTE_COUNT), None);
    }
}
