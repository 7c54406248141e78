use regex::Regex;
use std::{cmp::Ordering, fmt, sync::LazyLock};
#[allow(clippy::expect_used, reason = "constant pattern")]
static LEADING_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+").expect("leading digit pattern"));
/// Ordered by integer value; "7" and "007" stay distinct and fall back to the raw text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileKey(String);
impl FileKey {
    pub fn parse(digits: &str) -> Option<Self> {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(Self(digits.to_string()))
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
    fn significant(&self) -> &str {
        let trimmed = self.0.trim_start_matches('0');
        if trimmed.is_empty() { "0" } else { trimmed }
    }
}
pub fn extract_key(file_name: &str) -> Option<FileKey> {
    LEADING_DIGITS
        .find(file_name)
        .map(|m| FileKey(m.as_str().to_string()))
}
impl Ord for FileKey {
    fn cmp(&self, other: &Self) -> Ordering {
        let a = self.significant();
        let b = other.significant();
        a.len()
            .cmp(&b.len())
            .then_with(|| a.cmp(b))
            .then_with(|| self.0.len().cmp(&other.0.len()))
            .then_with(|| self.0.cmp(&other.0))
    }
}
impl PartialOrd for FileKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl fmt::Display for FileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
