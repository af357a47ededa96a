//! Update routing.
//!
//! [`Bot::process_update`] classifies one update and launches its handlers.
//! Classification runs in order, first match wins:
//!
//! 1. Update processors, in registration order. [`Flow::Handled`] stops here.
//! 2. By event kind:
//!
//! | Event | Route |
//! |-------|-------|
//! | message from the bot itself | dropped |
//! | message starting with `/<command>` | the command's handler, or an "unknown command" reply |
//! | any other message | every message processor |
//! | inline query | every provider, answered with at most 50 namespaced results |
//! | chosen inline result `<provider>:<id>` | that provider, with the id restored |
//! | callback query `<provider>:<data>` | that provider, with the data stripped of the prefix |
//! | anything else | dropped |
//!
//! Handlers run as independent tasks. A failing or panicking handler is
//! logged and affects neither its siblings nor the poll loop.
//!
//! The poll loop uses [`Bot::spawn_update`], which runs the whole pipeline,
//! update processors included, on a task of its own:
//!
//! ```rust,ignore
//! let dispatched = bot.process_update(update).await;
//! dispatched.join().await;
//!
//! // or, without waiting for anything:
//! bot.spawn_update(update);
//! ```

use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use futures::future::join_all;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, debug_span, error, info, trace, warn};

use telebot_core::HandlerError;
use telebot_core::model::{
    AnswerInlineQuery, CallbackQuery, ChosenInlineResult, InlineQuery, InlineQueryResult,
    LeadingCommand, Message, SendMessage, Update, UpdateKind,
};

use crate::bot::Bot;
use crate::handler::{Flow, HandlerResult};

/// Maximum number of results in one inline query answer.
pub const MAX_INLINE_RESULTS: usize = 50;

/// Handler tasks launched for one update.
///
/// Dropping it detaches the tasks; they keep running.
#[derive(Debug, Default)]
pub struct Dispatched {
    handles: Vec<JoinHandle<()>>,
}

impl Dispatched {
    /// Returns the number of launched tasks.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Returns `true` if the update launched nothing.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Waits for every launched task to finish.
    pub async fn join(self) {
        for handle in self.handles {
            if let Err(err) = handle.await {
                error!(error = %err, "Handler task aborted");
            }
        }
    }

    /// Lets the tasks run on without tracking them.
    pub fn detach(self) {}

    fn spawn<F>(&mut self, kind: &'static str, handler: String, future: F)
    where
        F: Future<Output = HandlerResult> + Send + 'static,
    {
        let task = run_handler(kind, handler, future).in_current_span();
        self.handles.push(tokio::spawn(task));
    }
}

async fn run_handler<F>(kind: &'static str, handler: String, future: F)
where
    F: Future<Output = HandlerResult>,
{
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(Ok(())) => trace!(kind, handler = %handler, "Handler finished"),
        Ok(Err(err)) => {
            let err = HandlerError::from(err);
            error!(kind, handler = %handler, error = %err, "Handler error");
        }
        Err(payload) => {
            let err = HandlerError::from_panic(payload.as_ref());
            error!(kind, handler = %handler, error = %err, "Handler panicked");
        }
    }
}

impl Bot {
    /// Classifies an update and launches its handlers.
    ///
    /// Returns once every update processor has run and the handlers are
    /// launched; it does not wait for the handlers themselves.
    pub async fn process_update(&self, update: Update) -> Dispatched {
        let span = debug_span!(
            "dispatch",
            update_id = update.update_id,
            kind = update.kind.name()
        );
        self.route(update).instrument(span).await
    }

    /// Runs [`process_update`](Self::process_update) on a new task.
    ///
    /// Returns immediately. The handle completes once the update processors
    /// have run and every launched handler has finished.
    pub fn spawn_update(&self, update: Update) -> JoinHandle<()> {
        let bot = self.clone();
        tokio::spawn(async move { bot.process_update(update).await.join().await })
    }

    async fn route(&self, update: Update) -> Dispatched {
        trace!(?update, "New update");

        for processor in self.registry().update_processors() {
            let outcome = AssertUnwindSafe(processor.process(self.clone(), update.clone()))
                .catch_unwind()
                .await;
            match outcome {
                Ok(Ok(Flow::Handled)) => {
                    debug!("Update processor consumed the update");
                    return Dispatched::default();
                }
                Ok(Ok(Flow::Continue)) => {}
                Ok(Err(err)) => {
                    let err = HandlerError::from(err);
                    error!(kind = "update_processor", error = %err, "Handler error");
                }
                Err(payload) => {
                    let err = HandlerError::from_panic(payload.as_ref());
                    error!(kind = "update_processor", error = %err, "Handler panicked");
                }
            }
        }

        match update.kind {
            UpdateKind::Message(message) => self.route_message(message),
            UpdateKind::InlineQuery(query) => self.route_inline_query(query),
            UpdateKind::ChosenInlineResult(result) => self.route_chosen_result(result),
            UpdateKind::CallbackQuery(query) => self.route_callback_query(query),
            UpdateKind::EditedMessage(_) | UpdateKind::Unknown => {
                debug!("No route for update");
                Dispatched::default()
            }
        }
    }

    fn route_message(&self, message: Message) -> Dispatched {
        let mut dispatched = Dispatched::default();

        if let (Some(me), Some(sender)) = (self.me_id(), message.sender_id())
            && me == sender
        {
            debug!(message_id = message.message_id, "Dropping own message");
            return dispatched;
        }

        let command = match message.leading_command() {
            LeadingCommand::None => None,
            LeadingCommand::Command(command) => Some(command.to_string()),
            LeadingCommand::Unreadable => {
                warn!(message_id = message.message_id, "Unreadable command entity");
                self.reply_unknown_command(&mut dispatched, &message, String::new());
                return dispatched;
            }
        };

        if let Some(command) = command {
            match self.registry().command(&command) {
                Some(handler) => {
                    info!(command = %command, "Executing command");
                    let bot = self.clone();
                    dispatched.spawn("command", command, async move {
                        handler.handle(bot, message).await
                    });
                }
                None => {
                    warn!(command = %command, "Unknown command");
                    self.reply_unknown_command(&mut dispatched, &message, command);
                }
            }
            return dispatched;
        }

        for (index, processor) in self.registry().processors().into_iter().enumerate() {
            let bot = self.clone();
            let message = message.clone();
            dispatched.spawn("message_processor", index.to_string(), async move {
                processor.handle(bot, message).await
            });
        }
        dispatched
    }

    fn reply_unknown_command(&self, dispatched: &mut Dispatched, message: &Message, command: String) {
        let reply = SendMessage::new(message.chat.id, self.settings().unknown_command_text.clone());
        let bot = self.clone();
        dispatched.spawn("unknown_command", command, async move {
            bot.send_message(reply).await?;
            Ok(())
        });
    }

    fn route_inline_query(&self, query: InlineQuery) -> Dispatched {
        let mut dispatched = Dispatched::default();
        let bot = self.clone();
        dispatched.spawn("inline_query", query.id.clone(), async move {
            let results = bot.collect_inline_results(&query).await;
            debug!(query_id = %query.id, count = results.len(), "Answering inline query");
            let mut answer = AnswerInlineQuery::new(query.id, results);
            answer.cache_time = Some(bot.settings().inline_cache_time);
            bot.answer_inline_query(answer).await?;
            Ok(())
        });
        dispatched
    }

    /// Asks every provider concurrently and merges their results in
    /// registration order, namespacing ids and stopping at
    /// [`MAX_INLINE_RESULTS`].
    async fn collect_inline_results(&self, query: &InlineQuery) -> Vec<InlineQueryResult> {
        let providers = self.registry().providers();
        let batches = join_all(providers.iter().map(|(name, provider)| async move {
            let outcome = AssertUnwindSafe(provider.results(self, query))
                .catch_unwind()
                .await;
            (name, outcome)
        }))
        .await;

        let mut results = Vec::new();
        for (name, outcome) in batches {
            let batch = match outcome {
                Ok(Ok(batch)) => batch,
                Ok(Err(err)) => {
                    let err = HandlerError::from(err);
                    error!(kind = "inline_provider", provider = %name, error = %err, "Handler error");
                    continue;
                }
                Err(payload) => {
                    let err = HandlerError::from_panic(payload.as_ref());
                    error!(kind = "inline_provider", provider = %name, error = %err, "Handler panicked");
                    continue;
                }
            };
            for mut result in batch {
                if results.len() == MAX_INLINE_RESULTS {
                    debug!(provider = %name, "Inline result limit reached");
                    return results;
                }
                let id = format!("{name}:{}", result.id());
                result.set_id(id);
                results.push(result);
            }
        }
        results
    }

    fn route_chosen_result(&self, mut result: ChosenInlineResult) -> Dispatched {
        let mut dispatched = Dispatched::default();
        let Some((name, original)) = result.result_id.split_once(':') else {
            debug!(result_id = %result.result_id, "Chosen result has no provider prefix");
            return dispatched;
        };
        let (name, original) = (name.to_string(), original.to_string());
        let Some(provider) = self.registry().provider(&name) else {
            warn!(provider = %name, "Chosen result for unknown provider");
            return dispatched;
        };

        result.result_id = original;
        let bot = self.clone();
        dispatched.spawn("chosen_inline_result", name, async move {
            provider.chosen(&bot, result).await
        });
        dispatched
    }

    fn route_callback_query(&self, mut query: CallbackQuery) -> Dispatched {
        let mut dispatched = Dispatched::default();
        let Some((name, data)) = query
            .data
            .as_deref()
            .and_then(|data| data.split_once(':'))
            .map(|(name, data)| (name.to_string(), data.to_string()))
        else {
            debug!(query_id = %query.id, "Callback data has no provider prefix");
            return dispatched;
        };
        let Some(provider) = self.registry().provider(&name) else {
            warn!(provider = %name, "Callback query for unknown provider");
            return dispatched;
        };

        query.data = Some(data);
        let bot = self.clone();
        dispatched.spawn("callback_query", name, async move {
            provider.callback(&bot, query).await
        });
        dispatched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::BotSettings;
    use crate::handler::InlineProvider;
    use crate::testing::{CHAT_ID, MockTransport, message_update, update};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use telebot_core::model::{InlineQueryResultArticle, InputMessageContent};

    fn bot(mock: &Arc<MockTransport>) -> Bot {
        Bot::with_settings(mock.clone(), BotSettings::default())
    }

    fn counter(count: &Arc<AtomicUsize>) -> impl crate::MessageHandler {
        let count = Arc::clone(count);
        move |_: Bot, _: Message| {
            let count = Arc::clone(&count);
            async move {
                count.fetch_add(1, Ordering::SeqCst);
                Ok::<_, anyhow::Error>(())
            }
        }
    }

    /// Provider returning `count` articles with ids `1..=count`, recording
    /// the events routed back to it.
    #[derive(Default)]
    struct Articles {
        count: usize,
        chosen: Mutex<Vec<String>>,
        callbacks: Mutex<Vec<String>>,
    }

    impl Articles {
        fn new(count: usize) -> Arc<Self> {
            Arc::new(Self {
                count,
                ..Self::default()
            })
        }
    }

    #[async_trait]
    impl InlineProvider for Arc<Articles> {
        async fn results(&self, _: &Bot, query: &InlineQuery) -> anyhow::Result<Vec<InlineQueryResult>> {
            Ok((1..=self.count)
                .map(|i| {
                    let content = InputMessageContent::text(query.query.clone());
                    InlineQueryResultArticle::new(i.to_string(), "title", content).into()
                })
                .collect())
        }

        async fn chosen(&self, _: &Bot, result: ChosenInlineResult) -> HandlerResult {
            self.chosen.lock().push(result.result_id);
            Ok(())
        }

        async fn callback(&self, _: &Bot, query: CallbackQuery) -> HandlerResult {
            self.callbacks.lock().push(query.data.unwrap_or_default());
            Ok(())
        }
    }

    async fn pass(_: Bot, _: Update) -> anyhow::Result<Flow> {
        Ok(Flow::Continue)
    }

    async fn consume_first(_: Bot, update: Update) -> anyhow::Result<Flow> {
        Ok(if update.update_id == 1 {
            Flow::Handled
        } else {
            Flow::Continue
        })
    }

    async fn broken(_: Bot, _: Update) -> anyhow::Result<Flow> {
        anyhow::bail!("broken")
    }

    async fn exploding(_: Bot, _: Message) -> HandlerResult {
        panic!("processor exploded")
    }

    struct Failing;

    #[async_trait]
    impl InlineProvider for Failing {
        async fn results(&self, _: &Bot, _: &InlineQuery) -> anyhow::Result<Vec<InlineQueryResult>> {
            anyhow::bail!("backend offline")
        }
    }

    fn inline_query_update() -> Update {
        update(json!({
            "update_id": 1,
            "inline_query": {
                "id": "q1",
                "from": {"id": 3, "first_name": "Bo"},
                "query": "cats",
                "offset": ""
            }
        }))
    }

    fn answered_ids(mock: &MockTransport) -> Vec<String> {
        let answers = mock.calls_to("answerInlineQuery");
        assert_eq!(answers.len(), 1);
        answers[0]["results"]
            .as_array()
            .unwrap()
            .iter()
            .map(|result| result["id"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_command_routed_by_leading_token() {
        let mock = MockTransport::new();
        let bot = bot(&mock);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let processors = Arc::new(AtomicUsize::new(0));

        let recorder = Arc::clone(&seen);
        bot.register_command("whoiam", move |_: Bot, message: Message| {
            let recorder = Arc::clone(&recorder);
            async move {
                recorder.lock().push(message.command_args().unwrap_or_default().to_string());
                Ok::<_, anyhow::Error>(())
            }
        });
        bot.register_message_processor(counter(&processors));

        let dispatched = bot
            .process_update(message_update(1, 3, "/whoiam extra", Some(7)))
            .await;
        assert_eq!(dispatched.len(), 1);
        dispatched.join().await;

        assert_eq!(*seen.lock(), vec!["extra".to_string()]);
        assert_eq!(processors.load(Ordering::SeqCst), 0);
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_command_replies() {
        let mock = MockTransport::new();
        let bot = bot(&mock);

        bot.process_update(message_update(1, 3, "/nope", Some(5)))
            .await
            .join()
            .await;

        assert_eq!(
            mock.calls_to("sendMessage"),
            vec![json!({"chat_id": CHAT_ID, "text": "Unknown command"})]
        );
    }

    #[tokio::test]
    async fn test_unreadable_command_replies_instead_of_fanning_out() {
        let mock = MockTransport::new();
        let bot = bot(&mock);
        let processors = Arc::new(AtomicUsize::new(0));
        bot.register_message_processor(counter(&processors));

        // Past the end of the text, then inside the two-byte 'é'.
        for (text, length) in [("/hi", 9), ("/café", 5)] {
            bot.process_update(message_update(1, 3, text, Some(length)))
                .await
                .join()
                .await;
        }

        assert_eq!(processors.load(Ordering::SeqCst), 0);
        assert_eq!(mock.calls_to("sendMessage").len(), 2);
    }

    #[tokio::test]
    async fn test_plain_message_fans_out_to_every_processor() {
        let mock = MockTransport::new();
        let bot = bot(&mock);
        let count = Arc::new(AtomicUsize::new(0));
        bot.register_message_processor(counter(&count))
            .register_message_processor(counter(&count));

        let dispatched = bot.process_update(message_update(1, 3, "hello", None)).await;
        assert_eq!(dispatched.len(), 2);
        dispatched.join().await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_self_echo_is_dropped() {
        let mock = MockTransport::new();
        mock.respond("getMe", json!({"ok": true, "result": {"id": 7, "first_name": "bot"}}));
        let bot = bot(&mock);
        bot.get_me().await.unwrap();

        let count = Arc::new(AtomicUsize::new(0));
        bot.register_command("start", counter(&count))
            .register_message_processor(counter(&count));

        let command = bot.process_update(message_update(1, 7, "/start", Some(6))).await;
        let plain = bot.process_update(message_update(2, 7, "hello", None)).await;
        assert!(command.is_empty());
        assert!(plain.is_empty());
        assert_eq!(mock.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_update_processor_stops_routing() {
        let mock = MockTransport::new();
        let bot = bot(&mock);
        let count = Arc::new(AtomicUsize::new(0));
        let later = Arc::new(AtomicUsize::new(0));

        let seen = Arc::clone(&later);
        bot.register_update_processor(pass)
            .register_update_processor(consume_first)
            .register_update_processor(move |_: Bot, _: Update| {
                let seen = Arc::clone(&seen);
                async move {
                    seen.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, anyhow::Error>(Flow::Continue)
                }
            })
            .register_message_processor(counter(&count));

        assert!(bot.process_update(message_update(1, 3, "hi", None)).await.is_empty());
        assert_eq!(later.load(Ordering::SeqCst), 0);

        bot.process_update(message_update(2, 3, "hi", None)).await.join().await;
        assert_eq!(later.load(Ordering::SeqCst), 1);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failing_update_processor_does_not_stop_routing() {
        let mock = MockTransport::new();
        let bot = bot(&mock);
        let count = Arc::new(AtomicUsize::new(0));
        bot.register_update_processor(broken)
            .register_message_processor(counter(&count));

        bot.process_update(message_update(1, 3, "hi", None)).await.join().await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_handler_panic_is_isolated() {
        let mock = MockTransport::new();
        let bot = bot(&mock);
        let count = Arc::new(AtomicUsize::new(0));
        bot.register_message_processor(exploding)
            .register_message_processor(counter(&count));

        bot.process_update(message_update(1, 3, "hi", None)).await.join().await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_inline_results_are_namespaced_in_order() {
        let mock = MockTransport::new();
        let bot = bot(&mock);
        bot.register_inline_provider("a", Articles::new(1))
            .register_inline_provider("b", Articles::new(1));

        bot.process_update(inline_query_update()).await.join().await;

        assert_eq!(answered_ids(&mock), vec!["a:1", "b:1"]);
        let answer = &mock.calls_to("answerInlineQuery")[0];
        assert_eq!(answer["inline_query_id"], "q1");
        assert_eq!(answer["cache_time"], 60);
    }

    #[tokio::test]
    async fn test_inline_results_are_capped() {
        let mock = MockTransport::new();
        let bot = bot(&mock);
        bot.register_inline_provider("a", Articles::new(40))
            .register_inline_provider("b", Articles::new(40));

        bot.process_update(inline_query_update()).await.join().await;

        let ids = answered_ids(&mock);
        assert_eq!(ids.len(), MAX_INLINE_RESULTS);
        assert_eq!(ids[39], "a:40");
        assert_eq!(ids[40], "b:1");
        assert_eq!(ids[49], "b:10");
    }

    #[tokio::test]
    async fn test_failing_provider_is_skipped() {
        let mock = MockTransport::new();
        let bot = bot(&mock);
        bot.register_inline_provider("broken", Failing)
            .register_inline_provider("b", Articles::new(2));

        bot.process_update(inline_query_update()).await.join().await;
        assert_eq!(answered_ids(&mock), vec!["b:1", "b:2"]);
    }

    #[tokio::test]
    async fn test_chosen_result_routed_to_provider() {
        let mock = MockTransport::new();
        let bot = bot(&mock);
        let a = Articles::new(1);
        let b = Articles::new(1);
        bot.register_inline_provider("a", Arc::clone(&a))
            .register_inline_provider("b", Arc::clone(&b));

        let chosen = update(json!({
            "update_id": 2,
            "chosen_inline_result": {
                "result_id": "a:1",
                "from": {"id": 3, "first_name": "Bo"},
                "query": "cats"
            }
        }));
        bot.process_update(chosen).await.join().await;

        assert_eq!(*a.chosen.lock(), vec!["1".to_string()]);
        assert!(b.chosen.lock().is_empty());
    }

    #[tokio::test]
    async fn test_callback_routed_by_prefix() {
        let mock = MockTransport::new();
        let bot = bot(&mock);
        let votes = Articles::new(0);
        bot.register_inline_provider("votes", Arc::clone(&votes));

        let callback = |data: &str| {
            update(json!({
                "update_id": 3,
                "callback_query": {
                    "id": "c1",
                    "from": {"id": 3, "first_name": "Bo"},
                    "data": data
                }
            }))
        };
        bot.process_update(callback("votes:up:2")).await.join().await;
        assert!(bot.process_update(callback("polls:up")).await.is_empty());
        assert!(bot.process_update(callback("no-prefix")).await.is_empty());

        assert_eq!(*votes.callbacks.lock(), vec!["up:2".to_string()]);
    }

    #[tokio::test]
    async fn test_edited_message_is_not_routed() {
        let mock = MockTransport::new();
        let bot = bot(&mock);
        let count = Arc::new(AtomicUsize::new(0));
        bot.register_message_processor(counter(&count));

        let edited = update(json!({
            "update_id": 4,
            "edited_message": crate::testing::message_json(1, 3, "fixed typo", None)
        }));
        assert!(bot.process_update(edited).await.is_empty());
    }
}
