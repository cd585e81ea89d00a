//! Library version, surfaced through the C ABI (§6).

pub const MAJOR: i32 = 1;
pub const MINOR: i32 = 0;
pub const PATCH: i32 = 0;

/// A semver-like string, e.g. `"1.0.0"`.
pub fn version_string() -> &'static str {
    concat!(env!("CARGO_PKG_VERSION_MAJOR"), ".", env!("CARGO_PKG_VERSION_MINOR"), ".", env!("CARGO_PKG_VERSION_PATCH"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_string_matches_numeric_triple() {
        let expected = format!("{MAJOR}.{MINOR}.{PATCH}");
        assert_eq!(version_string(), expected);
    }
}
