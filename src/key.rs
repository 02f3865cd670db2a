//! Node key codec
//!
//! Pure string operations over hierarchical path keys. A node's key is the
//! concatenation, root to node, of one `/prefix=value` segment per ancestor
//! level, which makes every descendant's key carry its ancestor's key as a
//! string prefix. Values are backslash-escaped so that segment counting and
//! decoding stay exact for arbitrary input.

/// Segment separator. Escaped inside values.
pub const SEPARATOR: char = '/';

const ASSIGN: char = '=';
const ESCAPE: char = '\\';

/// Escape a raw value for embedding in a key segment.
pub fn escape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if c == SEPARATOR || c == ESCAPE {
            out.push(ESCAPE);
        }
        out.push(c);
    }
    out
}

/// Reverse of [`escape_value`].
pub fn unescape_value(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == ESCAPE {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Encode one path segment: `/prefix=value`, value escaped. An absent value
/// encodes as the empty string.
pub fn encode(prefix: &str, value: &str) -> String {
    format!("{}{}{}{}", SEPARATOR, prefix, ASSIGN, escape_value(value))
}

/// Append a segment to a parent path.
pub fn append(parent: &str, segment: &str) -> String {
    let mut path = String::with_capacity(parent.len() + segment.len());
    path.push_str(parent);
    path.push_str(segment);
    path
}

/// Decode one segment back into `(prefix, value)`. Returns `None` if the
/// input is not a single well-formed segment.
pub fn decode(segment: &str) -> Option<(&str, String)> {
    let rest = segment.strip_prefix(SEPARATOR)?;
    let eq = rest.find(ASSIGN)?;
    let prefix = &rest[..eq];
    if prefix.is_empty() {
        return None;
    }
    Some((prefix, unescape_value(&rest[eq + 1..])))
}

/// Whether `a` is an ancestor path of `b`. Prefix comparison is the defined
/// ancestor relation: descendant keys extend their ancestor's key verbatim.
pub fn is_ancestor_of(a: &str, b: &str) -> bool {
    b.starts_with(a)
}

/// Number of segments in a path. Separators inside values are escaped, so a
/// plain scan with an escape flag is exact.
pub fn level_of(path: &str) -> usize {
    let mut count = 0;
    let mut escaped = false;
    for c in path.chars() {
        if escaped {
            escaped = false;
        } else if c == ESCAPE {
            escaped = true;
        } else if c == SEPARATOR {
            count += 1;
        }
    }
    count
}

/// Prefix of `path` containing the first `level` segments. Paths with fewer
/// segments are returned whole.
pub fn truncate_to_level(path: &str, level: usize) -> &str {
    let mut seen = 0;
    let mut escaped = false;
    for (i, c) in path.char_indices() {
        if escaped {
            escaped = false;
        } else if c == ESCAPE {
            escaped = true;
        } else if c == SEPARATOR {
            if seen == level {
                return &path[..i];
            }
            seen += 1;
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn encode_produces_prefixed_segment() {
        assert_eq!(encode("a", "Asimov"), "/a=Asimov");
        assert_eq!(encode("yrp", ""), "/yrp=");
    }

    #[test]
    fn append_concatenates() {
        let path = append(&encode("a", "Asimov"), &encode("s", "Foundation"));
        assert_eq!(path, "/a=Asimov/s=Foundation");
        assert_eq!(level_of(&path), 2);
    }

    #[test]
    fn decode_round_trips_plain_and_empty_values() {
        for value in ["Asimov", "", "a=b", "with space"] {
            let encoded = encode("a", value);
            let (prefix, decoded) = decode(&encoded).unwrap();
            assert_eq!(prefix, "a");
            assert_eq!(decoded, value);
        }
    }

    #[test]
    fn separator_in_value_does_not_split_segments() {
        let segment = encode("s", "1/2");
        assert_eq!(level_of(&segment), 1);
        let (_, decoded) = decode(&segment).unwrap();
        assert_eq!(decoded, "1/2");
    }

    #[test]
    fn truncate_returns_ancestor_prefixes() {
        let path = "/a=X/s=Y/g=Z";
        assert_eq!(truncate_to_level(path, 1), "/a=X");
        assert_eq!(truncate_to_level(path, 2), "/a=X/s=Y");
        assert_eq!(truncate_to_level(path, 3), path);
        assert_eq!(truncate_to_level(path, 9), path);
    }

    #[test]
    fn ancestor_is_prefix_relation() {
        let parent = "/a=X";
        let child = append(parent, &encode("s", "Y"));
        assert!(is_ancestor_of(parent, &child));
        assert!(!is_ancestor_of(&child, parent));
    }

    proptest! {
        #[test]
        fn round_trip_any_value(prefix in "[a-z]{1,4}", value in "\\PC*") {
            let segment = encode(&prefix, &value);
            let (p, v) = decode(&segment).unwrap();
            prop_assert_eq!(p, prefix.as_str());
            prop_assert_eq!(v, value);
            prop_assert_eq!(level_of(&segment), 1);
        }

        #[test]
        fn appended_paths_count_segments(prefix in "[a-z]{1,4}", values in prop::collection::vec("\\PC*", 1..6)) {
            let mut path = String::new();
            for v in &values {
                path = append(&path, &encode(&prefix, v));
            }
            prop_assert_eq!(level_of(&path), values.len());
            for lvl in 1..=values.len() {
                let prefix_path = truncate_to_level(&path, lvl);
                prop_assert_eq!(level_of(prefix_path), lvl);
                prop_assert!(is_ancestor_of(prefix_path, &path));
            }
        }
    }
}
