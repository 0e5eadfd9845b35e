use tracing::info;

use crate::api::joke::SingleJoke;

use super::{ChatSender, FeatureError, Features, Mention, Outcome, read_json};

impl<S: ChatSender> Features<S> {
    pub async fn joke(&self, caller: &Mention, group_id: i64) -> Result<Outcome, FeatureError> {
        if !self.permission.check(caller.user_id, group_id) {
            return Ok(Outcome::Ignored);
        }

        let response = self.requester.send_joke_request().await?;
        let joke: SingleJoke = read_json(response).await?;
        if joke.error {
            return Err(FeatureError::Provider(
                joke.message.unwrap_or_else(|| "joke provider reported an error".to_string()),
            ));
        }
        if joke.joke.is_empty() {
            return Err(FeatureError::Malformed(format!("empty '{}' joke", joke.kind)));
        }

        info!("Joke ({}, {}) for {}", joke.category, joke.lang, caller.user_id);
        self.reply(group_id, caller, joke.joke).await?;
        Ok(Outcome::Sent)
    }
}
