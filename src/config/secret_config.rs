/// Where a secret is loaded from
#[derive(Debug, Clone)]
pub enum SecretType {
    /// Environment variable (or `.env` entry) with the given name
    EnvVar { name: String },
}

impl SecretType {
    pub fn name(&self) -> &str {
        match self {
            Self::EnvVar { name } => name,
        }
    }
}

/// Loading and validation rules for a single secret
#[derive(Debug, Clone)]
pub struct SecretConfig {
    pub secret_type: SecretType,
    pub required: bool,
    /// Minimum length in bytes (None = no minimum)
    pub min_length: Option<usize>,
}

impl SecretConfig {
    pub fn env(name: &str) -> Self {
        Self {
            secret_type: SecretType::EnvVar {
                name: name.to_string(),
            },
            required: true,
            min_length: None,
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn min_length(mut self, length: usize) -> Self {
        self.min_length = Some(length);
        self
    }
}
