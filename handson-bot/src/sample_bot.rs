//! The sample turn handler: welcome new members, collect a handle name once, greet by name.

use crate::messages::{greeting, NAME_PROMPT_TEXT, NAME_RETRY_TEXT, WELCOME_TEXT};
use crate::profile_store::ProfileStore;
use async_trait::async_trait;
use bot_core::{ActivityType, CancellationToken, Result, TurnContext, TurnHandler};
use bot_state::PersistentState;
use dialogs::{DialogRunner, DialogTurnStatus, PromptOptions};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Id of the handle-name text prompt in the dialog set.
pub const NAME_PROMPT_ID: &str = "name";

pub struct SampleBot {
    conversation_state: Arc<dyn PersistentState>,
    user_state: Arc<dyn PersistentState>,
    dialogs: Arc<dyn DialogRunner>,
    profiles: Arc<dyn ProfileStore>,
}

impl SampleBot {
    pub fn new(
        conversation_state: Arc<dyn PersistentState>,
        user_state: Arc<dyn PersistentState>,
        dialogs: Arc<dyn DialogRunner>,
        profiles: Arc<dyn ProfileStore>,
    ) -> Self {
        info!("Start SampleBot");
        Self {
            conversation_state,
            user_state,
            dialogs,
            profiles,
        }
    }

    /// Welcomes every added member except the bot itself. Returns how many welcomes were sent.
    async fn send_welcome_message(&self, ctx: &TurnContext) -> Result<usize> {
        let activity = ctx.activity();
        let mut sent = 0;
        for member in &activity.members_added {
            if member.id != activity.recipient.id {
                ctx.send_activity(WELCOME_TEXT).await?;
                sent += 1;
            }
        }
        debug!(
            added = activity.members_added.len(),
            welcomed = sent,
            "Welcome messages sent"
        );
        Ok(sent)
    }

    async fn handle_message(&self, ctx: &TurnContext) -> Result<()> {
        let results = self.dialogs.continue_dialog(ctx).await?;
        let mut profile = self.profiles.get_or_default(ctx).await?;

        match results.status {
            DialogTurnStatus::Empty | DialogTurnStatus::Cancelled => match &profile.handle_name {
                None => {
                    self.dialogs
                        .prompt(
                            ctx,
                            NAME_PROMPT_ID,
                            PromptOptions {
                                prompt: Some(NAME_PROMPT_TEXT.to_string()),
                                retry_prompt: Some(NAME_RETRY_TEXT.to_string()),
                            },
                        )
                        .await?;
                }
                Some(name) => {
                    ctx.send_activity(&greeting(name)).await?;
                }
            },
            DialogTurnStatus::Complete => {
                let name = results.result_str().map(str::to_string);
                info!(
                    user_id = %ctx.activity().from.id,
                    handle_name = ?name,
                    "Handle name registered"
                );
                profile.handle_name = name;
                self.profiles.save(ctx, profile).await?;
            }
            DialogTurnStatus::Waiting => {
                debug!(user_id = %ctx.activity().from.id, "Name prompt still waiting");
            }
        }
        Ok(())
    }
}

#[async_trait]
impl TurnHandler for SampleBot {
    #[instrument(skip(self, ctx, _cancel), fields(activity_type = %ctx.activity().activity_type))]
    async fn on_turn(&self, ctx: &TurnContext, _cancel: &CancellationToken) -> Result<()> {
        match &ctx.activity().activity_type {
            ActivityType::Message => self.handle_message(ctx).await?,
            ActivityType::ConversationUpdate => {
                self.send_welcome_message(ctx).await?;
            }
            other => info!("passed:{}", other),
        }

        self.conversation_state.save_changes(ctx, false).await?;
        self.user_state.save_changes(ctx, false).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::UserProfile;
    use crate::profile_store::MockProfileStore;
    use bot_core::{
        Activity, Bot, ChannelAccount, ConversationAccount, ResourceResponse, TurnContext,
    };
    use bot_state::StateScope;
    use dialogs::DialogTurnResult;
    use mockall::mock;
    use std::sync::Mutex;

    mock! {
        pub State {}

        #[async_trait]
        impl PersistentState for State {
            fn scope(&self) -> StateScope;
            async fn load(&self, ctx: &TurnContext, force: bool) -> Result<()>;
            async fn save_changes(&self, ctx: &TurnContext, force: bool) -> Result<()>;
        }
    }

    mock! {
        pub Dialogs {}

        #[async_trait]
        impl DialogRunner for Dialogs {
            async fn continue_dialog(&self, ctx: &TurnContext) -> Result<dialogs::DialogTurnResult>;
            async fn prompt(
                &self,
                ctx: &TurnContext,
                dialog_id: &str,
                options: PromptOptions,
            ) -> Result<dialogs::DialogTurnResult>;
            async fn cancel_all(&self, ctx: &TurnContext) -> Result<dialogs::DialogTurnResult>;
        }
    }

    #[derive(Default)]
    struct RecordingBot {
        sent: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Bot for RecordingBot {
        async fn send_activity(&self, activity: &Activity) -> Result<ResourceResponse> {
            self.sent
                .lock()
                .unwrap()
                .push(activity.text.clone().unwrap_or_default());
            Ok(ResourceResponse {
                id: activity.id.clone(),
            })
        }
    }

    fn conversation() -> ConversationAccount {
        ConversationAccount {
            id: "conv-1".to_string(),
            is_group: false,
        }
    }

    fn message(bot: &Arc<RecordingBot>, text: &str) -> TurnContext {
        let activity = Activity::message(
            "test",
            ChannelAccount::new("U1", None),
            ChannelAccount::new("B1", None),
            conversation(),
            text,
        );
        TurnContext::new(bot.clone(), activity)
    }

    /// State mock expecting exactly one non-forced save.
    fn saved_once() -> Arc<MockState> {
        let mut state = MockState::new();
        state
            .expect_save_changes()
            .withf(|_, force| !*force)
            .times(1)
            .returning(|_, _| Ok(()));
        Arc::new(state)
    }

    fn profile_with(name: Option<&str>) -> MockProfileStore {
        let profile = UserProfile {
            handle_name: name.map(str::to_string),
        };
        let mut profiles = MockProfileStore::new();
        profiles
            .expect_get_or_default()
            .returning(move |_| Ok(profile.clone()));
        profiles
    }

    fn dialogs_returning(status: DialogTurnResult) -> MockDialogs {
        let mut dialogs = MockDialogs::new();
        dialogs
            .expect_continue_dialog()
            .times(1)
            .returning(move |_| Ok(status.clone()));
        dialogs
    }

    #[tokio::test]
    async fn test_message_without_name_prompts() {
        let bot = Arc::new(RecordingBot::default());
        let mut dialogs = dialogs_returning(DialogTurnResult::empty());
        dialogs
            .expect_prompt()
            .withf(|_, id, options| {
                id.to_string() == NAME_PROMPT_ID
                    && options.prompt.as_deref() == Some(NAME_PROMPT_TEXT)
                    && options.retry_prompt.as_deref() == Some(NAME_RETRY_TEXT)
            })
            .times(1)
            .returning(|_, _, _| Ok(DialogTurnResult::waiting()));

        let sample = SampleBot::new(
            saved_once(),
            saved_once(),
            Arc::new(dialogs),
            Arc::new(profile_with(None)),
        );
        sample
            .on_turn(&message(&bot, "hello"), &CancellationToken::new())
            .await
            .unwrap();

        // The mock prompt sends nothing, so no greeting reached the bot.
        assert!(bot.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_message_with_name_greets_without_prompt() {
        let bot = Arc::new(RecordingBot::default());
        let mut dialogs = dialogs_returning(DialogTurnResult::empty());
        dialogs.expect_prompt().times(0);

        let sample = SampleBot::new(
            saved_once(),
            saved_once(),
            Arc::new(dialogs),
            Arc::new(profile_with(Some("ALICE"))),
        );
        sample
            .on_turn(&message(&bot, "hello"), &CancellationToken::new())
            .await
            .unwrap();

        let sent = bot.sent.lock().unwrap();
        assert_eq!(*sent, vec![greeting("ALICE")]);
        assert!(sent[0].contains("ALICE"));
    }

    #[tokio::test]
    async fn test_cancelled_dialog_without_name_prompts() {
        let bot = Arc::new(RecordingBot::default());
        let mut dialogs =
            dialogs_returning(DialogTurnResult::new(DialogTurnStatus::Cancelled));
        dialogs
            .expect_prompt()
            .withf(|_, id, _| id.to_string() == NAME_PROMPT_ID)
            .times(1)
            .returning(|_, _, _| Ok(DialogTurnResult::waiting()));

        let sample = SampleBot::new(
            saved_once(),
            saved_once(),
            Arc::new(dialogs),
            Arc::new(profile_with(None)),
        );
        sample
            .on_turn(&message(&bot, "hello"), &CancellationToken::new())
            .await
            .unwrap();

        assert!(bot.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_dialog_with_name_greets() {
        let bot = Arc::new(RecordingBot::default());
        let mut dialogs =
            dialogs_returning(DialogTurnResult::new(DialogTurnStatus::Cancelled));
        dialogs.expect_prompt().times(0);

        let sample = SampleBot::new(
            saved_once(),
            saved_once(),
            Arc::new(dialogs),
            Arc::new(profile_with(Some("ALICE"))),
        );
        sample
            .on_turn(&message(&bot, "hello"), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(*bot.sent.lock().unwrap(), vec![greeting("ALICE")]);
    }

    #[tokio::test]
    async fn test_completed_prompt_stores_name() {
        let bot = Arc::new(RecordingBot::default());
        let mut dialogs = dialogs_returning(DialogTurnResult::complete(Some("ALICE".into())));
        dialogs.expect_prompt().times(0);
        let mut profiles = profile_with(None);
        profiles
            .expect_save()
            .withf(|_, profile| profile.handle_name.as_deref() == Some("ALICE"))
            .times(1)
            .returning(|_, _| Ok(()));

        let sample = SampleBot::new(
            saved_once(),
            saved_once(),
            Arc::new(dialogs),
            Arc::new(profiles),
        );
        sample
            .on_turn(&message(&bot, "alice"), &CancellationToken::new())
            .await
            .unwrap();

        assert!(bot.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_waiting_prompt_does_nothing_else() {
        let bot = Arc::new(RecordingBot::default());
        let mut dialogs = dialogs_returning(DialogTurnResult::waiting());
        dialogs.expect_prompt().times(0);
        let mut profiles = profile_with(None);
        profiles.expect_save().times(0);

        let sample = SampleBot::new(
            saved_once(),
            saved_once(),
            Arc::new(dialogs),
            Arc::new(profiles),
        );
        sample
            .on_turn(&message(&bot, "ab"), &CancellationToken::new())
            .await
            .unwrap();

        assert!(bot.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_conversation_update_welcomes_everyone_but_the_bot() {
        let bot = Arc::new(RecordingBot::default());
        let mut dialogs = MockDialogs::new();
        dialogs.expect_continue_dialog().times(0);
        let mut profiles = MockProfileStore::new();
        profiles.expect_get_or_default().times(0);

        let activity = Activity::conversation_update(
            "test",
            ChannelAccount::new("U1", None),
            ChannelAccount::new("U2", None),
            conversation(),
            vec![ChannelAccount::new("U1", None), ChannelAccount::new("U2", None)],
            Vec::new(),
        );
        let ctx = TurnContext::new(bot.clone(), activity);

        let sample = SampleBot::new(
            saved_once(),
            saved_once(),
            Arc::new(dialogs),
            Arc::new(profiles),
        );
        sample.on_turn(&ctx, &CancellationToken::new()).await.unwrap();

        assert_eq!(*bot.sent.lock().unwrap(), vec![WELCOME_TEXT.to_string()]);
    }

    #[tokio::test]
    async fn test_other_activity_only_persists_state() {
        let bot = Arc::new(RecordingBot::default());
        let mut dialogs = MockDialogs::new();
        dialogs.expect_continue_dialog().times(0);

        let mut activity = Activity::message(
            "test",
            ChannelAccount::new("U1", None),
            ChannelAccount::new("B1", None),
            conversation(),
            "",
        );
        activity.activity_type = ActivityType::Typing;
        let ctx = TurnContext::new(bot.clone(), activity);

        let sample = SampleBot::new(
            saved_once(),
            saved_once(),
            Arc::new(dialogs),
            Arc::new(MockProfileStore::new()),
        );
        sample.on_turn(&ctx, &CancellationToken::new()).await.unwrap();

        assert!(bot.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_send_failure_propagates_and_skips_save() {
        struct FailingBot;

        #[async_trait]
        impl Bot for FailingBot {
            async fn send_activity(&self, _activity: &Activity) -> Result<ResourceResponse> {
                Err(bot_core::BotError::Transport("offline".to_string()))
            }
        }

        let mut conversation_state = MockState::new();
        conversation_state.expect_save_changes().times(0);
        let mut user_state = MockState::new();
        user_state.expect_save_changes().times(0);

        let activity = Activity::conversation_update(
            "test",
            ChannelAccount::new("U1", None),
            ChannelAccount::new("B1", None),
            conversation(),
            vec![ChannelAccount::new("U1", None)],
            Vec::new(),
        );
        let ctx = TurnContext::new(Arc::new(FailingBot), activity);

        let sample = SampleBot::new(
            Arc::new(conversation_state),
            Arc::new(user_state),
            Arc::new(MockDialogs::new()),
            Arc::new(MockProfileStore::new()),
        );
        let result = sample.on_turn(&ctx, &CancellationToken::new()).await;

        assert!(result.is_err());
    }
}
