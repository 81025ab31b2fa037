// ============================================================
// Layer 3: Blurb Domain Type
// ============================================================
// One short campaign description and whether the campaign
// reached its goal. This is the labelled Document the whole
// pipeline works on.
//
// Reference: Rust Book §5 (Structs and Methods)

/// A labelled blurb loaded from a dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blurb {
    /// The free-text description, before tokenisation
    pub text: String,

    /// True if the campaign succeeded
    pub successful: bool,
}

impl Blurb {
    /// Create a new Blurb.
    ///
    /// Example:
    ///   let b = Blurb::new("Solar lanterns for every village", true);
    pub fn new(text: impl Into<String>, successful: bool) -> Self {
        Self {
            text: text.into(),
            successful,
        }
    }

    /// The label as a class index: 1 = successful, 0 = failed.
    pub fn class(&self) -> u8 {
        u8::from(self.successful)
    }
}

/// Parse a label cell into an outcome.
///
/// Accepts `1`/`true`/`successful`/`success` and
/// `0`/`false`/`failed`/`failure`, case-insensitively.
/// Anything else (e.g. `canceled`, `live`) has no binary outcome
/// and returns None.
pub fn parse_outcome(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "successful" | "success" => Some(true),
        "0" | "false" | "failed" | "failure"    => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_index() {
        assert_eq!(Blurb::new("a", true).class(), 1);
        assert_eq!(Blurb::new("a", false).class(), 0);
    }

    #[test]
    fn test_parse_outcome() {
        assert_eq!(parse_outcome("successful"), Some(true));
        assert_eq!(parse_outcome(" FAILED "), Some(false));
        assert_eq!(parse_outcome("1"), Some(true));
        assert_eq!(parse_outcome("false"), Some(false));
        assert_eq!(parse_outcome("canceled"), None);
        assert_eq!(parse_outcome(""), None);
    }
}
