use crate::artifacts::branch::INVALID_REF_NAME_REGEX;
use anyhow::Context;
use derive_new::new;

/// A symbolic ref path as stored on disk (`HEAD`, `refs/heads/master`,
/// `refs/mirrors/default`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord, new)]
pub struct SymRefName(String);

impl SymRefName {
    pub fn as_ref_path(&self) -> &str {
        &self.0
    }
}

/// A validated ref name as the user types it (`master`, `mirrors/default`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct RefName(String);

impl RefName {
    pub fn try_parse(name: String) -> anyhow::Result<Self> {
        if name.is_empty() {
            anyhow::bail!("ref name cannot be empty");
        }

        let re = regex::Regex::new(INVALID_REF_NAME_REGEX)
            .with_context(|| format!("invalid ref name regex: {INVALID_REF_NAME_REGEX}"))?;

        if re.is_match(&name) {
            anyhow::bail!("invalid ref name: {}", name);
        } else {
            Ok(Self(name))
        }
    }
}

impl AsRef<str> for RefName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RefName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::proptest;

    proptest! {
        #[test]
        fn accepts_alphanumeric_names(
            name in "[a-zA-Z0-9_-]+"
        ) {
            assert!(RefName::try_parse(name).is_ok());
        }

        #[test]
        fn accepts_hierarchical_names(
            prefix in "[a-zA-Z0-9_-]+",
            suffix in "[a-zA-Z0-9_-]+"
        ) {
            let name = format!("{}/{}", prefix, suffix);
            assert!(RefName::try_parse(name).is_ok());
        }

        #[test]
        fn rejects_names_starting_with_dot(
            suffix in "[a-zA-Z0-9_-]+"
        ) {
            let name = format!(".{}", suffix);
            assert!(RefName::try_parse(name).is_err());
        }

        #[test]
        fn rejects_names_ending_with_lock(
            prefix in "[a-zA-Z0-9_-]+"
        ) {
            let name = format!("{}.lock", prefix);
            assert!(RefName::try_parse(name).is_err());
        }

        #[test]
        fn rejects_consecutive_dots(
            prefix in "[a-zA-Z0-9_-]+",
            suffix in "[a-zA-Z0-9_-]+"
        ) {
            let name = format!("{}..{}", prefix, suffix);
            assert!(RefName::try_parse(name).is_err());
        }

        #[test]
        fn rejects_leading_or_trailing_slash(
            name in "[a-zA-Z0-9_-]+"
        ) {
            assert!(RefName::try_parse(format!("/{}", name)).is_err());
            assert!(RefName::try_parse(format!("{}/", name)).is_err());
        }

        #[test]
        fn rejects_special_characters(
            prefix in "[a-zA-Z0-9_-]+",
            suffix in "[a-zA-Z0-9_-]+",
            special_char in r"[\*:\?\[\\^~]"
        ) {
            let name = format!("{}{}{}", prefix, special_char, suffix);
            assert!(RefName::try_parse(name).is_err());
        }
    }

    #[test]
    fn rejects_empty_name() {
        assert!(RefName::try_parse("".to_string()).is_err());
    }

    #[test]
    fn accepts_the_refs_the_tool_uses() {
        assert!(RefName::try_parse("master".to_string()).is_ok());
        assert!(RefName::try_parse("mirrors/default".to_string()).is_ok());
        assert!(RefName::try_parse("HEAD".to_string()).is_ok());
    }
}
