/// Field rules checked before an account is created
///
/// All rules run; every violation is reported so the caller can show the
/// complete list at once.
pub struct AccountValidator {
    min_password_length: usize,
    max_password_length: usize,
}

impl AccountValidator {
    pub fn new() -> Self {
        Self {
            min_password_length: 6,
            max_password_length: 128,
        }
    }

    /// Validate a registration and return every violated rule
    pub fn validate(&self, username: &str, email: &str, password: &str) -> Vec<AccountValidationError> {
        let mut errors = Vec::new();

        if username.trim().is_empty() {
            errors.push(AccountValidationError::EmptyUsername);
        } else if !username.chars().all(is_allowed_username_char) {
            errors.push(AccountValidationError::InvalidUsername(username.to_string()));
        }

        if email.trim().is_empty() {
            errors.push(AccountValidationError::EmptyEmail);
        } else if !looks_like_email(email) {
            errors.push(AccountValidationError::InvalidEmail(email.to_string()));
        }

        let length = password.chars().count();
        if length < self.min_password_length {
            errors.push(AccountValidationError::PasswordTooShort(self.min_password_length));
        }
        if length > self.max_password_length {
            errors.push(AccountValidationError::PasswordTooLong(self.max_password_length));
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            errors.push(AccountValidationError::PasswordRequiresDigit);
        }
        if !password.chars().any(|c| c.is_lowercase()) {
            errors.push(AccountValidationError::PasswordRequiresLower);
        }
        if !password.chars().any(|c| c.is_uppercase()) {
            errors.push(AccountValidationError::PasswordRequiresUpper);
        }
        if password.chars().all(|c| c.is_alphanumeric()) {
            errors.push(AccountValidationError::PasswordRequiresNonAlphanumeric);
        }

        errors
    }
}

impl Default for AccountValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn is_allowed_username_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '@' | '+')
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

/// A single violated account rule
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountValidationError {
    #[error("Username is required.")]
    EmptyUsername,

    #[error("Username '{0}' is invalid, can only contain letters or digits.")]
    InvalidUsername(String),

    #[error("Email is required.")]
    EmptyEmail,

    #[error("Email '{0}' is invalid.")]
    InvalidEmail(String),

    #[error("Passwords must be at least {0} characters.")]
    PasswordTooShort(usize),

    #[error("Passwords must not exceed {0} characters.")]
    PasswordTooLong(usize),

    #[error("Passwords must have at least one digit ('0'-'9').")]
    PasswordRequiresDigit,

    #[error("Passwords must have at least one lowercase ('a'-'z').")]
    PasswordRequiresLower,

    #[error("Passwords must have at least one uppercase ('A'-'Z').")]
    PasswordRequiresUpper,

    #[error("Passwords must have at least one non alphanumeric character.")]
    PasswordRequiresNonAlphanumeric,
}
