use unicode_segmentation::UnicodeSegmentation;

const MAX_GRAPHEMES: usize = 4096;

/// Opaque token issued by the push-messaging provider for one app installation.
///
/// The value is stored and forwarded exactly as received.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(transparent)]
pub struct PushToken(String);

impl PushToken {
    pub fn parse(s: String) -> Result<PushToken, String> {
        if s.trim().is_empty() {
            return Err("A push token cannot be empty.".into());
        }
        if s.graphemes(true).count() > MAX_GRAPHEMES {
            return Err(format!(
                "A push token cannot be longer than {} characters.",
                MAX_GRAPHEMES
            ));
        }
        if s.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(format!("{:?} is not a valid push token.", s));
        }
        Ok(Self(s))
    }
}

impl AsRef<str> for PushToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PushToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl<'de> serde::Deserialize<'de> for PushToken {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PushToken::parse(s).map_err(serde::de::Error::custom)
    }
}
