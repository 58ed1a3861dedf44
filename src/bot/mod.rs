// Bot runtime
//
// Polls the chat transport and hands every inbound message to the
// ConversationRouter in its own task. Replies are sent back through the same
// transport.

pub mod command;
pub mod messages;
pub mod router;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

pub use router::ConversationRouter;
use crate::error::Result;
use crate::transport::{ChatTransport, InboundMessage};

/// Pause before polling again after a transport error.
const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

pub struct Bot<T: ChatTransport + 'static> {
    transport: Arc<T>,
    router: Arc<ConversationRouter>,
}

impl<T: ChatTransport + 'static> Bot<T> {
    pub fn new(transport: Arc<T>, router: ConversationRouter) -> Self {
        Self {
            transport,
            router: Arc::new(router),
        }
    }

    /// Runs until Ctrl-C.
    pub async fn run(&self) -> Result<()> {
        self.run_until(tokio::signal::ctrl_c()).await
    }

    /// Polls and dispatches until `shutdown` completes.
    pub async fn run_until<F: Future>(&self, shutdown: F) -> Result<()> {
        info!("Bot is running and listening for messages...");

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown signal received, stopping bot");
                    break;
                }
                polled = self.transport.poll() => match polled {
                    Ok(messages) => self.dispatch(messages),
                    Err(e) => {
                        warn!("Polling for messages failed: {}", e);
                        tokio::time::sleep(POLL_RETRY_DELAY).await;
                    }
                },
            }
        }

        Ok(())
    }

    fn dispatch(&self, messages: Vec<InboundMessage>) {
        for msg in messages {
            let span = info_span!(
                "message",
                id = %Uuid::new_v4(),
                chat = msg.chat_id,
                thread = ?msg.thread_id
            );
            let router = Arc::clone(&self.router);
            let transport = Arc::clone(&self.transport);

            tokio::spawn(
                async move { handle_message(&router, &*transport, &msg).await }.instrument(span),
            );
        }
    }
}

/// Routes one message and sends the reply, if there is one.
/// Returns whether a reply was sent.
pub async fn handle_message<T>(router: &ConversationRouter, transport: &T, msg: &InboundMessage) -> bool
where
    T: ChatTransport + ?Sized,
{
    let Some(reply) = router.route(msg).await else {
        return false;
    };

    match transport.send(&reply).await {
        Ok(()) => true,
        Err(e) => {
            error!("Failed to send reply to chat {}: {}", reply.chat_id, e);
            false
        }
    }
}
