//! Book of answers: a random line from a text file, no provider involved.

use rand::Rng;
use std::collections::BTreeMap;

use crate::files::{self, FileError};

use super::{ChatSender, FeatureError, Features, Mention, Outcome};

/// Pick a random non-blank answer. Keys need not be contiguous.
pub fn pick_answer<'a, R: Rng + ?Sized>(book: &'a BTreeMap<usize, String>, rng: &mut R) -> Option<&'a str> {
    let answers: Vec<&str> = book
        .values()
        .map(|answer| answer.trim())
        .filter(|answer| !answer.is_empty())
        .collect();
    if answers.is_empty() {
        return None;
    }
    Some(answers[rng.gen_range(0..answers.len())])
}

pub fn format_answer(question: &str, answer: &str) -> String {
    if question.trim().is_empty() {
        format!("答案之书说：{answer}")
    } else {
        format!("你的问题：{}\n答案之书说：{answer}", question.trim())
    }
}

impl<S: ChatSender> Features<S> {
    pub async fn answer(&self, caller: &Mention, group_id: i64, question: &str) -> Result<Outcome, FeatureError> {
        if !self.permission.check(caller.user_id, group_id) {
            return Ok(Outcome::Ignored);
        }

        let book = files::read_answer_book(&self.answer_book_path)?;
        let answer = pick_answer(&book, &mut rand::thread_rng())
            .ok_or_else(|| FileError::Shape {
                path: self.answer_book_path.clone(),
                expected: "at least one answer",
            })?
            .to_string();

        self.reply(group_id, caller, format_answer(question, &answer)).await?;
        Ok(Outcome::Sent)
    }
}
