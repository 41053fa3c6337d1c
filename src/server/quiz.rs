use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::db::Question;

/// `quiz_category.id` value that stands for "every category".
pub const ALL_CATEGORIES: i64 = 0;

/// Outcome of one quiz step, returned to the client as-is.
#[derive(Debug, Serialize)]
pub struct QuizRound {
    pub question: Option<Question>,
    pub previous_questions: Vec<i64>,
}

/// Picks a question from `candidates` that is not in `previous`.
///
/// The picked id is appended to the returned `previous_questions`; when every
/// candidate has been asked `question` is `None` and the list is unchanged.
pub fn next_question<R: Rng + ?Sized>(
    candidates: Vec<Question>,
    mut previous: Vec<i64>,
    rng: &mut R,
) -> QuizRound {
    let seen: HashSet<i64> = previous.iter().copied().collect();
    let unseen: Vec<Question> = candidates
        .into_iter()
        .filter(|q| !seen.contains(&q.id))
        .collect();

    let question = unseen.choose(rng).cloned();
    if let Some(question) = &question {
        previous.push(question.id);
    }
    QuizRound {
        question,
        previous_questions: previous,
    }
}
