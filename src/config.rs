use std::env;

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: i32,
    pub max_output_tokens: i32,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub framework: String,
    pub output_path: String,
    pub gemini: GeminiConfig,
    pub generation: GenerationConfig,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            api_key: None,
            model: None,
            base_url: None,
        }
    }
}

impl GeminiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let api_key = env::var("API_KEY")
            .or_else(|_| env::var("GEMINI_API_KEY"))
            .ok();
        let model = env::var("GEMINI_MODEL").ok();

        GeminiConfig {
            api_key,
            model,
            base_url: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        GenerationConfig {
            temperature: 0.0,
            top_p: 0.95,
            top_k: 64,
            max_output_tokens: 10000,
        }
    }
}

impl GenerationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = top_p;
        self
    }

    pub fn with_top_k(mut self, top_k: i32) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: i32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            framework: "Bootstrap".to_string(),
            output_path: "index.html".to_string(),
            gemini: GeminiConfig::default(),
            generation: GenerationConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let framework = env::var("STYLE_FRAMEWORK").unwrap_or_else(|_| "Bootstrap".to_string());
        let output_path = env::var("OUTPUT_PATH").unwrap_or_else(|_| "index.html".to_string());

        AppConfig {
            framework,
            output_path,
            gemini: GeminiConfig::from_env(),
            generation: GenerationConfig::default(),
        }
    }

    pub fn with_framework(mut self, framework: impl Into<String>) -> Self {
        self.framework = framework.into();
        self
    }

    pub fn with_output_path(mut self, output_path: impl Into<String>) -> Self {
        self.output_path = output_path.into();
        self
    }

    pub fn with_gemini(mut self, config: GeminiConfig) -> Self {
        self.gemini = config;
        self
    }

    pub fn with_generation(mut self, config: GenerationConfig) -> Self {
        self.generation = config;
        self
    }
}
