/// Strip the known tag prefixes (`v`, then `rust-v`) from a release tag.
///
/// Each prefix is attempted exactly once, in that order, and nothing is repeated.
#[must_use]
pub fn normalize(tag: &str) -> &str {
    let tag = tag.strip_prefix('v').unwrap_or(tag);
    tag.strip_prefix("rust-v").unwrap_or(tag)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::normalize;

    #[rstest]
    #[case::v_prefix("v1.2.3", "1.2.3")]
    #[case::rust_prefix("rust-v0.9.0", "0.9.0")]
    #[case::no_prefix("2.0.0", "2.0.0")]
    #[case::only_one_v("vv1.0.0", "v1.0.0")]
    #[case::only_one_rust("rust-vrust-v1.0.0", "rust-v1.0.0")]
    #[case::v_before_rust("vrust-v1.0.0", "1.0.0")]
    #[case::prefix_mid_tag("1.0.0-rust-v2", "1.0.0-rust-v2")]
    #[case::empty("", "")]
    fn normalize_tag(#[case] tag: &str, #[case] expected: &str) {
        assert_eq!(normalize(tag), expected);
    }
}
