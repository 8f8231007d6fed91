// Training pair formatting: turns (post, topic) into prompt/completion records.

use serde::{Deserialize, Serialize};

use crate::error::PrepError;

/// Instruction line shared by every prompt.
pub const PROMPT_INSTRUCTION: &str = "Write a LinkedIn post about the specified topic.";

/// Every prompt ends with this marker; the completion follows it.
pub const PROMPT_SUFFIX: &str = "Post:";

/// One supervised fine-tuning record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrainingPair {
    pub prompt: String,
    pub completion: String,
}

/// Build the training pair for one post.
///
/// The completion starts with a single space so the model learns to continue
/// directly after the `Post:` marker.
pub fn create_training_pair(post: &str, topic: &str) -> TrainingPair {
    TrainingPair {
        prompt: format!("Topic: {topic}\n\n{PROMPT_INSTRUCTION}\n\n{PROMPT_SUFFIX}"),
        completion: format!(" {post}"),
    }
}

/// Pair up posts with their topics, in order.
pub fn format_for_training<P, T>(posts: &[P], topics: &[T]) -> Result<Vec<TrainingPair>, PrepError>
where
    P: AsRef<str>,
    T: AsRef<str>,
{
    if posts.len() != topics.len() {
        return Err(PrepError::Validation(format!(
            "The number of posts and topics must be the same ({} posts, {} topics).",
            posts.len(),
            topics.len()
        )));
    }

    Ok(posts
        .iter()
        .zip(topics)
        .map(|(post, topic)| create_training_pair(post.as_ref(), topic.as_ref()))
        .collect())
}
