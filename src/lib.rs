pub mod config;
pub mod error;
pub mod gemini;
pub mod image;
pub mod logger;
pub mod models;
pub mod pipeline;
pub mod prompt;

pub use config::{AppConfig, GeminiConfig, GenerationConfig};
pub use error::{GeminiError, Result};
pub use gemini::{ChatSession, GeminiBackend, GeminiClient, ModelBackend};
pub use self::image::{normalize, NormalizedImage};
pub use models::{ImageAttachment, Role, Turn};
pub use pipeline::{Pipeline, PipelineState};
pub use prompt::{build_initial_prompt, build_refinement_prompt};
