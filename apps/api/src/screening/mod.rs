// Resume screening: text extraction, AI fit scoring, and the upload pipeline
// that ties them to storage and candidate notifications.
//
// Extraction is CPU-bound and runs inside tokio::task::spawn_blocking.

pub mod contact;
pub mod extractor;
pub mod fit_scoring;
pub mod handlers;
pub mod pipeline;
pub mod prompts;

pub use fit_scoring::LlmFitScorer;
pub use pipeline::ScreeningPipeline;
