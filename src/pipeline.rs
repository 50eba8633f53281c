use crate::{
    error::{GeminiError, Result},
    gemini::ChatSession,
    image::{normalize, NormalizedImage},
    models::ImageAttachment,
    prompt,
};

/// Progress of one generate-then-refine run. `Failed` is terminal and
/// reachable from any non-terminal state; results already captured stay
/// readable after a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    ImageReady,
    FirstPassDone,
    SecondPassDone,
    Failed,
}

/// Orchestrates the two-pass generation: normalize the screenshot, ask the
/// model for an HTML reconstruction, then ask it to refine its own output.
/// Owns the chat session and both results for the duration of one run.
pub struct Pipeline {
    session: ChatSession,
    framework: String,
    state: PipelineState,
    attachment: Option<ImageAttachment>,
    initial_result: Option<String>,
    refined_result: Option<String>,
    failure: Option<String>,
}

impl Pipeline {
    pub fn new(session: ChatSession, framework: impl Into<String>) -> Self {
        Self {
            session,
            framework: framework.into(),
            state: PipelineState::Idle,
            attachment: None,
            initial_result: None,
            refined_result: None,
            failure: None,
        }
    }

    /// Normalizes the uploaded bytes and captures the attachment both model
    /// calls will resend.
    pub fn load_image(&mut self, bytes: &[u8]) -> Result<NormalizedImage> {
        match normalize(bytes) {
            Ok(normalized) => {
                self.attachment = Some(normalized.attachment());
                self.state = PipelineState::ImageReady;
                Ok(normalized)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// First pass: generate the initial HTML reconstruction.
    pub async fn run_first_pass(&mut self) -> Result<&str> {
        if self.state != PipelineState::ImageReady {
            return Err(self.fail(GeminiError::ConfigError(
                "First pass requires a loaded image".into(),
            )));
        }

        log::info!("Generating website...");
        let attachment = self.attachment.clone();
        let initial_prompt = prompt::build_initial_prompt(&self.framework);
        match self
            .session
            .send_turn(initial_prompt, attachment.as_ref())
            .await
        {
            Ok(reply) => {
                self.initial_result = Some(reply);
                self.state = PipelineState::FirstPassDone;
                Ok(self.initial_result.as_deref().unwrap_or_default())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Second pass: ask the model to validate and refine the first pass. The
    /// same attachment is sent again; the call only starts once the first
    /// reply has been captured.
    pub async fn run_second_pass(&mut self) -> Result<&str> {
        let initial = match (self.state, &self.initial_result) {
            (PipelineState::FirstPassDone, Some(initial)) => initial.clone(),
            _ => {
                return Err(self.fail(GeminiError::ConfigError(
                    "Second pass requires a completed first pass".into(),
                )))
            }
        };

        log::info!("Refining website...");
        let attachment = self.attachment.clone();
        let refinement_prompt = prompt::build_refinement_prompt(&self.framework, &initial);
        match self
            .session
            .send_turn(refinement_prompt, attachment.as_ref())
            .await
        {
            Ok(reply) => {
                self.refined_result = Some(reply);
                self.state = PipelineState::SecondPassDone;
                Ok(self.refined_result.as_deref().unwrap_or_default())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Runs the whole pipeline on raw uploaded bytes and returns the refined
    /// HTML.
    pub async fn run(&mut self, bytes: &[u8]) -> Result<String> {
        self.load_image(bytes)?;
        self.run_first_pass().await?;
        self.run_second_pass().await?;
        Ok(self
            .refined_result
            .clone()
            .unwrap_or_default())
    }

    fn fail(&mut self, error: GeminiError) -> GeminiError {
        self.state = PipelineState::Failed;
        self.failure = Some(error.to_string());
        error
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn initial_result(&self) -> Option<&str> {
        self.initial_result.as_deref()
    }

    pub fn refined_result(&self) -> Option<&str> {
        self.refined_result.as_deref()
    }

    pub fn failure_message(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationConfig;
    use crate::gemini::ModelBackend;
    use crate::models::Content;
    use async_trait::async_trait;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::collections::VecDeque;
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    struct StubBackend {
        replies: Mutex<VecDeque<std::result::Result<String, String>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl StubBackend {
        fn with_replies(replies: Vec<std::result::Result<String, String>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ModelBackend for StubBackend {
        async fn generate(
            &self,
            contents: &[Content],
            _config: &GenerationConfig,
        ) -> crate::error::Result<String> {
            // Record the text of the newest user turn.
            if let Some(content) = contents.last() {
                if let Some(crate::models::Part::Text { text }) = content.parts.first() {
                    self.prompts.lock().unwrap().push(text.clone());
                }
            }
            match self.replies.lock().unwrap().pop_front() {
                Some(Ok(reply)) => Ok(reply),
                Some(Err(message)) => Err(GeminiError::RequestError(message)),
                None => Err(GeminiError::RequestError("no reply queued".into())),
            }
        }
    }

    fn pipeline_with(backend: Arc<StubBackend>) -> Pipeline {
        let session = ChatSession::new(backend, GenerationConfig::default());
        Pipeline::new(session, "Bootstrap")
    }

    fn sample_png() -> Vec<u8> {
        let source = RgbImage::from_pixel(10, 10, Rgb([10, 20, 30]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(source)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[tokio::test]
    async fn test_full_run_reaches_second_pass_done() {
        let backend = StubBackend::with_replies(vec![
            Ok("<html>initial</html>".to_string()),
            Ok("<html>refined</html>".to_string()),
        ]);
        let mut pipeline = pipeline_with(backend.clone());

        let refined = pipeline.run(&sample_png()).await.unwrap();

        assert_eq!(refined, "<html>refined</html>");
        assert_eq!(pipeline.state(), PipelineState::SecondPassDone);
        assert_eq!(pipeline.initial_result(), Some("<html>initial</html>"));
        assert_eq!(pipeline.refined_result(), Some("<html>refined</html>"));
        assert_eq!(pipeline.session().history().len(), 4);

        let prompts = backend.prompts.lock().unwrap().clone();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[0].contains("Bootstrap"));
        assert!(!prompts[0].contains("```"));
        // The refinement instruction embeds the first reply verbatim.
        assert!(prompts[1].contains("<html>initial</html>"));
    }

    #[tokio::test]
    async fn test_first_call_failure_leaves_no_results() {
        let backend = StubBackend::with_replies(vec![Err("service unavailable".to_string())]);
        let mut pipeline = pipeline_with(backend);

        let err = pipeline.run(&sample_png()).await.unwrap_err();

        assert!(err.to_string().contains("service unavailable"));
        assert_eq!(pipeline.state(), PipelineState::Failed);
        assert_eq!(pipeline.initial_result(), None);
        assert_eq!(pipeline.refined_result(), None);
        assert!(pipeline.failure_message().unwrap().contains("service unavailable"));
    }

    #[tokio::test]
    async fn test_second_call_failure_keeps_initial_result() {
        let backend = StubBackend::with_replies(vec![
            Ok("<html>initial</html>".to_string()),
            Err("quota exceeded".to_string()),
        ]);
        let mut pipeline = pipeline_with(backend);

        let err = pipeline.run(&sample_png()).await.unwrap_err();

        assert!(err.to_string().contains("quota exceeded"));
        assert_eq!(pipeline.state(), PipelineState::Failed);
        assert_eq!(pipeline.initial_result(), Some("<html>initial</html>"));
        assert_eq!(pipeline.refined_result(), None);
    }

    #[tokio::test]
    async fn test_undecodable_upload_fails_before_any_call() {
        let backend = StubBackend::with_replies(vec![Ok("unused".to_string())]);
        let mut pipeline = pipeline_with(backend.clone());

        let err = pipeline.run(b"not a png").await.unwrap_err();

        match err {
            GeminiError::DecodeError(_) => {}
            other => panic!("expected decode error, got {}", other),
        }
        assert_eq!(pipeline.state(), PipelineState::Failed);
        assert!(backend.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_second_pass_requires_first() {
        let backend = StubBackend::with_replies(vec![]);
        let mut pipeline = pipeline_with(backend);
        pipeline.load_image(&sample_png()).unwrap();

        let err = pipeline.run_second_pass().await.unwrap_err();
        match err {
            GeminiError::ConfigError(_) => {}
            other => panic!("expected config error, got {}", other),
        }
        assert_eq!(pipeline.state(), PipelineState::Failed);
    }
}
