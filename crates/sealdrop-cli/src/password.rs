//! Terminal password prompting

use async_trait::async_trait;
use sealdrop_client::PasswordProvider;
use std::io::{BufRead, Write};
use tracing::warn;
use zeroize::Zeroizing;

/// Environment variable consulted before prompting
pub const PASSWORD_ENV: &str = "SEALDROP_PASSWORD";

/// Reads `SEALDROP_PASSWORD`, else one line from stdin after printing the prompt to stderr
#[derive(Debug, Default)]
pub struct TerminalPassword;

fn read_line(prompt: &str) -> Option<Zeroizing<String>> {
    let mut stderr = std::io::stderr();
    let _ = write!(stderr, "{}: ", prompt);
    let _ = stderr.flush();

    let mut line = Zeroizing::new(String::new());
    match std::io::stdin().lock().read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => {
            let trimmed = line.trim_end_matches(['\r', '\n']);
            (!trimmed.is_empty()).then(|| Zeroizing::new(trimmed.to_string()))
        }
        Err(e) => {
            warn!(error = %e, "failed to read password");
            None
        }
    }
}

#[async_trait]
impl PasswordProvider for TerminalPassword {
    async fn request(&self, prompt: &str) -> Option<Zeroizing<String>> {
        if let Ok(password) = std::env::var(PASSWORD_ENV) {
            let password = Zeroizing::new(password);
            return (!password.is_empty()).then_some(password);
        }
        let prompt = prompt.to_string();
        tokio::task::spawn_blocking(move || read_line(&prompt))
            .await
            .ok()
            .flatten()
    }
}
