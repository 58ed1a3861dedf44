use crate::language::LanguageCode;

pub const TO_CHINESE_USAGE: &str = "📝 Usage:\n/tc [English text to translate to Chinese]\nOr reply to an English message with /tc";

pub const TO_ENGLISH_USAGE: &str = "📝 Usage:\n/translatezh [Chinese text to translate to English]\nOr reply to a Chinese message with /translatezh";

pub const TO_CHINESE_FAILED: &str = "❌ Error translating your message to Chinese. Please try again.";

pub const TO_ENGLISH_FAILED: &str = "❌ Error translating your message to English. Please try again.";

pub const HELP: &str = r#"
🤖 *TranslationBot Help*

This bot helps bridge language barriers by translating between Chinese and English.

*Automatic Translation (if enabled):*
Chinese messages posted in the group (or a topic) will be automatically translated to English and shown as a reply in the same location.

*Commands:*
`/tc [English text]` - Translates your English text to Chinese and posts it in the current location (group or topic). You can also reply to an English message with just `/tc`.
`/translatezh [Chinese text]` - Manually translates Chinese text to English and posts it in the current location. You can also reply to a Chinese message with just `/translatezh`.
`/help` - Shows this help message.
`/start` - Shows a welcome message.

*Example Usage for Replying:*
You: `/tc This is a test message.`
Bot: `🤖 Bot (EN → ZH): 这是一个测试消息。`

*Note:* Ensure the bot has permissions to read and send messages in the group.
"#;

pub const WELCOME: &str = r#"
👋 Welcome to TranslationBot!

I'm here to help you communicate across language barriers, specifically between Chinese and English.

➡️ Type `/help` to see available commands and how I work.
➡️ If I'm in a group with topics, I'll try to reply within the correct topic.
➡️ If I'm in a group, I can automatically translate Chinese messages to English (if this feature is enabled by the admin).
"#;

/// "ZH → EN" style label.
pub fn direction(source: LanguageCode, target: LanguageCode) -> String {
    format!(
        "{} → {}",
        source.primary_subtag().to_uppercase(),
        target.primary_subtag().to_uppercase()
    )
}

pub fn original_and_translation(original: &str, translated: &str, source: LanguageCode, target: LanguageCode) -> String {
    format!(
        "Original: {}\n\n🔄 Translated ({}):\n{}",
        original,
        direction(source, target),
        translated
    )
}

pub fn bot_translation(translated: &str, source: LanguageCode, target: LanguageCode) -> String {
    format!("🤖 Bot ({}):\n\n{}", direction(source, target), translated)
}
