// Topic extraction for single posts and batches.
//
// Empty posts short-circuit to the "General" topic. Everything else costs
// exactly one completion call. Service failures always propagate; what
// happens on an unexpected failure is decided by UnexpectedFailurePolicy.

use std::fmt;
use std::str::FromStr;

use futures::stream::{self, StreamExt, TryStreamExt};
use indicatif::ProgressBar;
use tracing::{debug, error, warn};

use super::traits::{CompletionClient, CompletionError, CompletionRequest};
use crate::error::PrepError;
use crate::output::truncate_chars;

/// Topic returned for empty or whitespace-only posts.
pub const GENERAL_TOPIC: &str = "General";

/// Display text of a topic that could not be extracted.
pub const UNAVAILABLE_TOPIC: &str = "Error: Extraction Failed";

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
/// Enough for a short label, not for a sentence.
pub const DEFAULT_MAX_TOKENS: u32 = 20;

/// System instruction sent with every extraction request.
pub const TOPIC_SYSTEM_PROMPT: &str = "You are an expert assistant skilled in analyzing text \
and extracting the core topic. Identify the main subject or theme of the following LinkedIn post. \
Respond with only the topic name (e.g., 'Artificial Intelligence', 'Marketing Strategy', \
'Software Development'). Keep the topic concise, ideally 2-4 words.";

/// The topic assigned to one post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Topic {
    /// Trimmed label produced by the model
    Label(String),
    /// The post was empty, no call was made
    General,
    /// The model call went through but its answer was unusable
    Unavailable { reason: String },
}

impl Topic {
    pub fn as_str(&self) -> &str {
        match self {
            Topic::Label(label) => label.as_str(),
            Topic::General => GENERAL_TOPIC,
            Topic::Unavailable { .. } => UNAVAILABLE_TOPIC,
        }
    }

    /// False only for `Unavailable`.
    pub fn is_available(&self) -> bool {
        !matches!(self, Topic::Unavailable { .. })
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do when a completion call fails for a reason other than the
/// service being unreachable or returning an error status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnexpectedFailurePolicy {
    /// Log it and return `Topic::Unavailable`, keeping the batch alive
    #[default]
    Degrade,
    /// Return `PrepError::Extraction`, aborting the batch
    Propagate,
}

impl FromStr for UnexpectedFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "degrade" => Ok(Self::Degrade),
            "propagate" => Ok(Self::Propagate),
            other => Err(format!(
                "unknown failure policy '{other}' (expected 'degrade' or 'propagate')"
            )),
        }
    }
}

/// Model parameters for extraction requests.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub on_unexpected: UnexpectedFailurePolicy,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            on_unexpected: UnexpectedFailurePolicy::default(),
        }
    }
}

/// Labels posts with topics using a completion client.
pub struct TopicExtractor {
    client: Box<dyn CompletionClient>,
    settings: ExtractionSettings,
}

impl TopicExtractor {
    pub fn new(client: Box<dyn CompletionClient>, settings: ExtractionSettings) -> Self {
        Self { client, settings }
    }

    pub fn settings(&self) -> &ExtractionSettings {
        &self.settings
    }

    /// Build the request sent for `post`.
    pub fn request_for(&self, post: &str) -> CompletionRequest {
        CompletionRequest {
            model: self.settings.model.clone(),
            system: TOPIC_SYSTEM_PROMPT.to_string(),
            user: post.to_string(),
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        }
    }

    /// Extract the topic of a single post.
    pub async fn extract_topic(&self, post: &str) -> Result<Topic, PrepError> {
        if post.trim().is_empty() {
            return Ok(Topic::General);
        }

        let request = self.request_for(post);
        match self.client.complete(&request).await {
            Ok(text) => {
                let label = text.trim().to_string();
                debug!(
                    topic = %label,
                    post_preview = %truncate_chars(post, 50),
                    "Extracted topic"
                );
                Ok(Topic::Label(label))
            }
            Err(e @ CompletionError::Service { .. }) => {
                error!(error = %e, "Language model service error during topic extraction");
                Err(PrepError::Service(e))
            }
            Err(e @ CompletionError::Unexpected { .. }) => {
                warn!(
                    error = %e,
                    post_preview = %truncate_chars(post, 50),
                    "Unexpected error during topic extraction"
                );
                match self.settings.on_unexpected {
                    UnexpectedFailurePolicy::Degrade => Ok(Topic::Unavailable {
                        reason: e.to_string(),
                    }),
                    UnexpectedFailurePolicy::Propagate => Err(PrepError::Extraction(e)),
                }
            }
        }
    }

    /// Extract topics for every post, one call at a time, in order.
    /// The first propagated failure aborts the batch.
    pub async fn batch_extract_topics(&self, posts: &[String]) -> Result<Vec<Topic>, PrepError> {
        self.extract_all(posts, 1, None).await
    }

    /// Like `batch_extract_topics`, with up to `concurrency` calls in flight.
    /// Results keep the input order.
    pub async fn batch_extract_topics_concurrent(
        &self,
        posts: &[String],
        concurrency: usize,
    ) -> Result<Vec<Topic>, PrepError> {
        self.extract_all(posts, concurrency, None).await
    }

    /// Batch extraction that ticks `progress` once per finished post.
    pub async fn extract_with_progress(
        &self,
        posts: &[String],
        concurrency: usize,
        progress: &ProgressBar,
    ) -> Result<Vec<Topic>, PrepError> {
        self.extract_all(posts, concurrency, Some(progress)).await
    }

    async fn extract_all(
        &self,
        posts: &[String],
        concurrency: usize,
        progress: Option<&ProgressBar>,
    ) -> Result<Vec<Topic>, PrepError> {
        if concurrency <= 1 {
            let mut topics = Vec::with_capacity(posts.len());
            for post in posts {
                topics.push(self.extract_topic(post).await?);
                if let Some(pb) = progress {
                    pb.inc(1);
                }
            }
            return Ok(topics);
        }

        // buffered (not buffer_unordered) so output order matches input order
        stream::iter(posts.iter().map(move |post| async move {
            let topic = self.extract_topic(post).await;
            if let Some(pb) = progress {
                pb.inc(1);
            }
            topic
        }))
        .buffered(concurrency)
        .try_collect()
        .await
    }
}
