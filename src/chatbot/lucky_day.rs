//! Daily fortune: three random scores plus a blessing from the AI provider.

use rand::Rng;
use tracing::{info, warn};

use crate::api::baidu::{ChatResponse, Message};
use crate::files;

use super::{ChatSender, FeatureError, Features, Mention, Outcome, read_json};

pub const FEATURE: &str = "lucky_day";

pub const DUPLICATE_NOTICE: &str = "你今天已经测过运势啦，明天再来找 Kookie 吧！";

/// Fortune scores for one sender, each in `0..100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LuckDay {
    pub sender: u64,
    pub wealth: u8,
    pub school: u8,
    pub romance: u8,
}

impl LuckDay {
    pub fn roll<R: Rng + ?Sized>(sender: u64, rng: &mut R) -> Self {
        Self {
            sender,
            romance: rng.gen_range(0..100),
            school: rng.gen_range(0..100),
            wealth: rng.gen_range(0..100),
        }
    }

    /// The question appended after the conversation seed.
    pub fn prompt(&self) -> String {
        format!(
            "请你帮我分析今天的运势并且给我一个可爱的祝福语，要多多表现Kookie的可爱与天真，\n\
             所有的对话都要充满日常感，不能让人感觉到跳脱。\
             今天的运势是:财运：{}学业：{}桃花运：{}",
            self.wealth, self.school, self.romance
        )
    }
}

/// Conversation seed followed by the fortune question.
pub fn build_messages(mut seed: Vec<Message>, luck: &LuckDay) -> Vec<Message> {
    seed.push(Message::user(luck.prompt()));
    seed
}

pub fn format_reply(luck: &LuckDay, blessing: &str) -> String {
    format!(
        "你今天的运势结果来啦！\n财运：{}%\n桃花运：{}%\n学业：{}%\n{}",
        luck.wealth, luck.romance, luck.school, blessing
    )
}

impl<S: ChatSender> Features<S> {
    pub async fn lucky_day(&self, caller: &Mention, group_id: i64) -> Result<Outcome, FeatureError> {
        if !self.permission.check(caller.user_id, group_id) {
            return Ok(Outcome::Ignored);
        }

        let today = self.usage.today();
        if !self.usage.claim(caller.user_id, FEATURE, today)? {
            info!("{} already drew a fortune on {}", caller.user_id, today);
            self.reply(group_id, caller, DUPLICATE_NOTICE).await?;
            return Ok(Outcome::Duplicate);
        }

        // The day stays claimed only if the fortune actually reached the chat.
        if let Err(e) = self.draw_fortune(caller, group_id).await {
            if let Err(release) = self.usage.release(caller.user_id, FEATURE, today) {
                warn!("Failed to release fortune claim for {}: {}", caller.user_id, release);
            }
            return Err(e);
        }
        Ok(Outcome::Sent)
    }

    async fn draw_fortune(&self, caller: &Mention, group_id: i64) -> Result<(), FeatureError> {
        let luck = LuckDay::roll(caller.user_id, &mut rand::thread_rng());
        let seed = files::read_bot_info(&self.bot_info_path)?;
        let messages = build_messages(seed, &luck);

        let response = self.requester.send_chat_request(&messages, caller.user_id).await?;
        let chat: ChatResponse = read_json(response).await?;
        let blessing = chat.into_result().map_err(|e| {
            warn!("Chat completion for {} had no result: {}", caller.user_id, e);
            FeatureError::Provider(e)
        })?;

        self.reply(group_id, caller, format_reply(&luck, &blessing)).await?;
        info!(
            "Fortune for {}: wealth {} school {} romance {}",
            caller.user_id, luck.wealth, luck.school, luck.romance
        );
        Ok(())
    }
}
