use unicode_segmentation::UnicodeSegmentation;

/// Identifier issued by the auth provider for a signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn parse(s: String) -> Result<UserId, String> {
        let is_empty_or_whitespace = s.trim().is_empty();
        let is_too_long = s.graphemes(true).count() > 128;
        let contains_forbidden_characters = s.chars().any(|c| c == '/' || c.is_control());

        if is_empty_or_whitespace || is_too_long || contains_forbidden_characters {
            Err(format!("{:?} is not a valid user id.", s))
        } else {
            Ok(Self(s))
        }
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
