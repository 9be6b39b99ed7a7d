//! Password prompting as a pluggable capability

use async_trait::async_trait;
use zeroize::Zeroizing;

/// Prompt text used when unlocking the stored private key
pub const UNLOCK_PROMPT: &str = "Enter the password to unlock your private RSA key";

/// Prompt text used when choosing a password for a new key
pub const NEW_PASSWORD_PROMPT: &str = "Choose a password to protect your private RSA key";

/// Source of user passwords
///
/// Returning `None` means the user cancelled; pipelines turn that into
/// `ClientError::Cancelled`.
#[async_trait]
pub trait PasswordProvider: Send + Sync {
    async fn request(&self, prompt: &str) -> Option<Zeroizing<String>>;
}

/// Answers every prompt with the same password
pub struct FixedPassword(Zeroizing<String>);

impl FixedPassword {
    pub fn new(password: impl Into<String>) -> Self {
        Self(Zeroizing::new(password.into()))
    }
}

impl std::fmt::Debug for FixedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FixedPassword(<redacted>)")
    }
}

#[async_trait]
impl PasswordProvider for FixedPassword {
    async fn request(&self, _prompt: &str) -> Option<Zeroizing<String>> {
        if self.0.is_empty() {
            None
        } else {
            Some(self.0.clone())
        }
    }
}

/// Cancels every prompt
#[derive(Debug, Default)]
pub struct NoPassword;

#[async_trait]
impl PasswordProvider for NoPassword {
    async fn request(&self, _prompt: &str) -> Option<Zeroizing<String>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_password() {
        let provider = FixedPassword::new("hunter2");
        assert_eq!(provider.request(UNLOCK_PROMPT).await.unwrap().as_str(), "hunter2");
        assert_eq!(format!("{:?}", provider), "FixedPassword(<redacted>)");
    }

    #[tokio::test]
    async fn test_blank_counts_as_cancel() {
        assert!(FixedPassword::new("").request(UNLOCK_PROMPT).await.is_none());
        assert!(NoPassword.request(UNLOCK_PROMPT).await.is_none());
    }
}
