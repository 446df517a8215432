//! Classification of loosely-typed record identifiers
//!
//! Operators refer to records either by their 15 or 18 character record ID or
//! by their display name. Anything that looks like an ID is treated as one.

const MIN_ID_LEN: usize = 15;
const MAX_ID_LEN: usize = 18;

/// A user-supplied identifier, classified as record ID or display name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordIdentifier {
    Id(String),
    Name(String),
}

impl RecordIdentifier {
    pub fn classify(value: &str) -> Self {
        if is_record_id(value) {
            Self::Id(value.to_string())
        } else {
            Self::Name(value.to_string())
        }
    }

    /// Field the identifier is compared against
    pub fn field(&self) -> &'static str {
        match self {
            Self::Id(_) => "Id",
            Self::Name(_) => "Name",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::Id(value) | Self::Name(value) => value,
        }
    }

    pub fn is_id(&self) -> bool {
        matches!(self, Self::Id(_))
    }
}

/// True when the value matches `^[A-Za-z0-9_-]{15,18}$`
pub fn is_record_id(value: &str) -> bool {
    (MIN_ID_LEN..=MAX_ID_LEN).contains(&value.len())
        && value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_identifiers() {
        assert!(is_record_id("a02000000000001"));
        assert!(is_record_id("a02000000000001AAA"));
        assert!(!is_record_id("a0200000000001"));
        assert!(!is_record_id("a02000000000001AAAA"));
        assert!(!is_record_id("Accounts"));
        assert!(!is_record_id("UAT Sandbox Conn"));
    }

    #[test]
    fn test_classify_selects_field() {
        let id = RecordIdentifier::classify("a02000000000001AAA");
        let name = RecordIdentifier::classify("Accounts");

        assert_eq!(id.field(), "Id");
        assert!(id.is_id());
        assert_eq!(name.field(), "Name");
        assert_eq!(name.value(), "Accounts");
    }

    proptest! {
        #[test]
        fn id_shaped_values_classify_as_id(value in "[A-Za-z0-9_-]{15,18}") {
            prop_assert!(RecordIdentifier::classify(&value).is_id());
        }

        #[test]
        fn short_values_classify_as_name(value in "[A-Za-z0-9_-]{0,14}") {
            prop_assert!(!RecordIdentifier::classify(&value).is_id());
        }

        #[test]
        fn values_with_spaces_classify_as_name(
            head in "[A-Za-z0-9]{7,8}",
            tail in "[A-Za-z0-9]{7,8}",
        ) {
            let value = format!("{head} {tail}");
            prop_assert!(!RecordIdentifier::classify(&value).is_id());
        }
    }
}
