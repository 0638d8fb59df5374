use crate::domain::FileId;

/// Bot that serves the file when the user opens the deep link.
pub const DEFAULT_BOT_USERNAME: &str = "dhyeyautofilterbot";
/// Payload prefix the bot expects in its `/start` parameter.
pub const DEFAULT_START_PREFIX: &str = "file_1123135015";

/// Builds `t.me` deep links that hand a file id to the catalog bot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeepLinkConfig {
    pub bot_username: String,
    pub start_prefix: String,
}

impl Default for DeepLinkConfig {
    fn default() -> Self {
        Self {
            bot_username: DEFAULT_BOT_USERNAME.to_string(),
            start_prefix: DEFAULT_START_PREFIX.to_string(),
        }
    }
}

impl DeepLinkConfig {
    pub fn link_for(&self, file_id: &FileId) -> String {
        format!(
            "https://t.me/{}?start={}_{}",
            self.bot_username, self.start_prefix, file_id
        )
    }
}
