//! Conversion between node paths and their command-line spelling.

use std::fmt::Display;

use itertools::Itertools;

/// Split a textual node path into segments.
///
/// Leading, trailing and doubled separators are ignored, so `""`, `"/"`
/// and `"//"` all name the empty path.
pub fn split_tree_path(path: &str, separator: &str) -> Vec<String> {
    path.split(separator)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join path segments for display, e.g. `root/dir1/file1`.
pub fn join_tree_path<K: Display>(segments: &[K], separator: &str) -> String {
    segments.iter().join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("a/b/c", "/", vec!["a", "b", "c"])]
    #[case("/a/b/", "/", vec!["a", "b"])]
    #[case("a//b", "/", vec!["a", "b"])]
    #[case("", "/", vec![])]
    #[case("/", "/", vec![])]
    #[case("a::b", "::", vec!["a", "b"])]
    fn given_textual_path_when_splitting_then_returns_segments(
        #[case] input: &str,
        #[case] separator: &str,
        #[case] expected: Vec<&str>,
    ) {
        assert_eq!(split_tree_path(input, separator), expected);
    }

    #[test]
    fn given_segments_when_joining_then_uses_separator() {
        assert_eq!(join_tree_path(&["root", "dir1", "file1"], "/"), "root/dir1/file1");
        assert_eq!(join_tree_path(&[1, 2, 3], "."), "1.2.3");
    }
}
