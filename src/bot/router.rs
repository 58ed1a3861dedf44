use std::sync::Arc;

use tracing::{error, info};

use crate::config::Config;
use crate::language::{classify, LanguageCode};
use crate::preview;
use crate::translate::TranslationResolver;
use crate::transport::{InboundMessage, OutgoingReply, ParseMode};
use super::command::{parse_command, Command};
use super::messages;

/// Turns inbound messages into replies. Holds no transport of its own.
pub struct ConversationRouter {
    resolver: Arc<TranslationResolver>,
    auto_translate: bool,
    auto_source: LanguageCode,
    auto_target: LanguageCode,
    bot_username: Option<String>,
}

impl ConversationRouter {
    pub fn new(resolver: Arc<TranslationResolver>, config: &Config) -> Self {
        Self {
            resolver,
            auto_translate: config.bot.auto_translate,
            auto_source: config.translation.default_source_language,
            auto_target: config.translation.default_target_language,
            bot_username: None,
        }
    }

    /// Commands mentioning another bot (`/help@other_bot`) are ignored once this is set.
    pub fn with_bot_username(mut self, username: impl Into<String>) -> Self {
        self.bot_username = Some(username.into());
        self
    }

    /// Reply to send for `msg`, if any.
    pub async fn route(&self, msg: &InboundMessage) -> Option<OutgoingReply> {
        let text = msg.text.as_deref()?;

        match parse_command(text, self.bot_username.as_deref()) {
            Some(Command::ToChinese(args)) => Some(
                self.translate_command(
                    msg,
                    args,
                    LanguageCode::English,
                    LanguageCode::ChineseSimplified,
                )
                .await,
            ),
            Some(Command::ToEnglish(args)) => Some(
                self.translate_command(
                    msg,
                    args,
                    LanguageCode::ChineseSimplified,
                    LanguageCode::English,
                )
                .await,
            ),
            Some(Command::Help) => {
                Some(OutgoingReply::in_thread_of(msg, messages::HELP).with_parse_mode(ParseMode::Markdown))
            }
            Some(Command::Start) => {
                Some(OutgoingReply::in_thread_of(msg, messages::WELCOME).with_parse_mode(ParseMode::Markdown))
            }
            Some(Command::Other) => None,
            None => self.auto_translate(msg, text).await,
        }
    }

    async fn translate_command(
        &self,
        msg: &InboundMessage,
        args: Option<String>,
        source: LanguageCode,
        target: LanguageCode,
    ) -> OutgoingReply {
        let to_chinese = target == LanguageCode::ChineseSimplified;
        let text = args.or_else(|| {
            msg.reply_to_text
                .as_ref()
                .filter(|text| !text.trim().is_empty())
                .cloned()
        });

        let Some(text) = text else {
            let usage = if to_chinese {
                messages::TO_CHINESE_USAGE
            } else {
                messages::TO_ENGLISH_USAGE
            };
            return OutgoingReply::in_thread_of(msg, usage);
        };

        info!(
            "Processing {} command in chat {}{}: \"{}\" by {}",
            messages::direction(source, target),
            msg.chat_id,
            topic_suffix(msg),
            preview(&text),
            msg.sender
        );

        match self.resolver.resolve(&text, target, Some(source)).await {
            Ok(translated) if to_chinese => {
                OutgoingReply::in_thread_of(msg, messages::bot_translation(&translated, source, target))
            }
            Ok(translated) => OutgoingReply::in_thread_of(
                msg,
                messages::original_and_translation(&text, &translated, source, target),
            ),
            Err(e) => {
                error!("Error handling {} command: {}", messages::direction(source, target), e);
                let apology = if to_chinese {
                    messages::TO_CHINESE_FAILED
                } else {
                    messages::TO_ENGLISH_FAILED
                };
                OutgoingReply::in_thread_of(msg, apology)
            }
        }
    }

    async fn auto_translate(&self, msg: &InboundMessage, text: &str) -> Option<OutgoingReply> {
        if !self.auto_translate || text.trim().is_empty() || classify(text) != self.auto_source {
            return None;
        }

        info!(
            "Detected {} message from {} in chat {}{}: \"{}\"",
            self.auto_source,
            msg.sender,
            msg.chat_id,
            topic_suffix(msg),
            preview(text)
        );

        match self.resolver.resolve(text, self.auto_target, Some(self.auto_source)).await {
            Ok(translated) => Some(
                OutgoingReply::in_thread_of(
                    msg,
                    messages::original_and_translation(text, &translated, self.auto_source, self.auto_target),
                )
                .replying_to(msg.message_id),
            ),
            Err(e) => {
                error!("Auto-translation failed for \"{}\": {}", preview(text), e);
                None
            }
        }
    }
}

fn topic_suffix(msg: &InboundMessage) -> String {
    msg.thread_id
        .map(|thread| format!(" (topic {})", thread))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use crate::cache::TranslationCache;
    use crate::error::ProviderError;
    use crate::translate::provider::MockTranslationProvider;
    use crate::translate::{FallbackChain, ProviderRegistry};

    fn router(provider: MockTranslationProvider, auto_translate: bool) -> ConversationRouter {
        let mut registry = ProviderRegistry::new();
        registry.register("mock", Arc::new(provider));
        let chain = FallbackChain::new(registry, &["mock".to_string()], Duration::from_secs(5));
        let resolver = TranslationResolver::new(TranslationCache::new(true, Duration::from_secs(60)), chain);

        let mut config = Config::default();
        config.bot.auto_translate = auto_translate;
        ConversationRouter::new(Arc::new(resolver), &config).with_bot_username("transbot")
    }

    fn translating(result: &'static str) -> MockTranslationProvider {
        let mut mock = MockTranslationProvider::new();
        mock.expect_translate()
            .times(1)
            .returning(move |_, _, _| Ok(result.to_string()));
        mock
    }

    fn idle() -> MockTranslationProvider {
        let mut mock = MockTranslationProvider::new();
        mock.expect_translate().never();
        mock
    }

    fn message(text: &str) -> InboundMessage {
        InboundMessage {
            chat_id: -100,
            thread_id: Some(12),
            message_id: 55,
            sender: "li".to_string(),
            text: Some(text.to_string()),
            reply_to_text: None,
        }
    }

    #[tokio::test]
    async fn test_auto_translate_chinese_message() {
        let router = router(translating("Hello"), true);

        let reply = router.route(&message("你好")).await.unwrap();
        assert_eq!(reply.chat_id, -100);
        assert_eq!(reply.thread_id, Some(12));
        assert_eq!(reply.reply_to_message_id, Some(55));
        assert_eq!(reply.text, "Original: 你好\n\n🔄 Translated (ZH → EN):\nHello");
    }

    #[tokio::test]
    async fn test_auto_translate_skips_english_and_disabled() {
        assert!(router(idle(), true).route(&message("Hello there")).await.is_none());
        assert!(router(idle(), false).route(&message("你好")).await.is_none());
    }

    #[tokio::test]
    async fn test_auto_translate_failure_sends_nothing() {
        let mut failing = MockTranslationProvider::new();
        failing.expect_translate().times(1).returning(|_, _, _| Err(ProviderError::Status(502)));

        assert!(router(failing, true).route(&message("你好")).await.is_none());
    }

    #[tokio::test]
    async fn test_to_chinese_command() {
        let mut provider = MockTranslationProvider::new();
        provider.expect_translate()
            .withf(|text, target, source| text == "Good morning" && target == "zh" && source == "en")
            .times(1)
            .returning(|_, _, _| Ok("早上好".to_string()));
        let router = router(provider, false);

        let reply = router.route(&message("/tc Good morning")).await.unwrap();
        assert_eq!(reply.text, "🤖 Bot (EN → ZH):\n\n早上好");
        assert_eq!(reply.thread_id, Some(12));
        assert_eq!(reply.reply_to_message_id, None);
    }

    #[tokio::test]
    async fn test_to_english_command_uses_replied_text() {
        let router = router(translating("See you tomorrow"), false);
        let mut msg = message("/translatezh@transbot");
        msg.reply_to_text = Some("明天见".to_string());

        let reply = router.route(&msg).await.unwrap();
        assert_eq!(reply.text, "Original: 明天见\n\n🔄 Translated (ZH → EN):\nSee you tomorrow");
    }

    #[tokio::test]
    async fn test_command_without_text_returns_usage() {
        let router = router(idle(), true);

        let reply = router.route(&message("/tc")).await.unwrap();
        assert_eq!(reply.text, messages::TO_CHINESE_USAGE);
        assert_eq!(reply.thread_id, Some(12));

        let reply = router.route(&message("/translatezh")).await.unwrap();
        assert_eq!(reply.text, messages::TO_ENGLISH_USAGE);
    }

    #[tokio::test]
    async fn test_command_failure_returns_apology() {
        let mut failing = MockTranslationProvider::new();
        failing.expect_translate().times(1).returning(|_, _, _| Err(ProviderError::Empty));
        let router = router(failing, false);

        let reply = router.route(&message("/tc Good morning")).await.unwrap();
        assert_eq!(reply.text, messages::TO_CHINESE_FAILED);
    }

    #[tokio::test]
    async fn test_help_and_start() {
        let router = router(idle(), true);

        let help = router.route(&message("/help")).await.unwrap();
        assert_eq!(help.text, messages::HELP);
        assert_eq!(help.parse_mode, Some(ParseMode::Markdown));

        let start = router.route(&message("/start")).await.unwrap();
        assert_eq!(start.text, messages::WELCOME);
        assert_eq!(start.thread_id, Some(12));
    }

    #[tokio::test]
    async fn test_other_commands_are_ignored() {
        let router = router(idle(), true);

        assert!(router.route(&message("/settings 你好")).await.is_none());
        assert!(router.route(&message("/tc@otherbot hello")).await.is_none());

        let mut no_text = message("");
        no_text.text = None;
        assert!(router.route(&no_text).await.is_none());
    }
}
