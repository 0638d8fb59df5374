use std::fmt;

/// Telegram chat id (numeric). Channel ids are negative (`-100...`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// Id of a message inside the bin channel, returned after a successful relay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChannelMessageRef(pub i32);

impl fmt::Display for ChannelMessageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque Telegram file id. Only non-emptiness is checked.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FileId(String);

impl FileId {
    /// Returns `None` for empty or whitespace-only input. Anything else is
    /// kept byte for byte.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the caller wants to do with a relayed file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Watch,
    Download,
}

impl Operation {
    /// Path segment used in the redirect target (`<base>/<segment>/<message id>`).
    pub fn path_segment(self) -> &'static str {
        match self {
            Operation::Watch => "watch",
            Operation::Download => "download",
        }
    }

    /// Noun used in user-facing failure messages.
    pub fn failure_noun(self) -> &'static str {
        match self {
            Operation::Watch => "streaming",
            Operation::Download => "download",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_id_rejects_blank_input() {
        assert!(FileId::parse("").is_none());
        assert!(FileId::parse("   ").is_none());
        assert_eq!(FileId::parse("BAADBAAD").unwrap().as_str(), "BAADBAAD");
    }

    #[test]
    fn file_id_is_not_rewritten() {
        assert_eq!(FileId::parse(" BAAD BAAD ").unwrap().as_str(), " BAAD BAAD ");
    }
}
