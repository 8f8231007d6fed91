// Topic extraction: labels each post with a short topic via a language model.
//
// The CompletionClient trait is the seam between the extractor and the
// provider. OpenAiClient talks to an OpenAI-compatible chat-completions
// endpoint; tests plug in scripted clients without touching the network.

pub mod openai;
pub mod topic;
pub mod traits;
