//! Content filtering for chat messages
//!
//! The chat gateway holds one filter for its whole lifetime. The built-in
//! word list is intentionally small; deployments extend it through
//! `PROFANITY_EXTRA_WORDS`.

use std::collections::HashSet;
use std::sync::Arc;

/// Decides whether a chat message may be broadcast
pub trait ContentFilter: Send + Sync {
    fn is_profane(&self, text: &str) -> bool;

    /// Name used in logs
    fn name(&self) -> &str;
}

const DEFAULT_WORDS: &[&str] = &[
    "arse", "ass", "asshole", "bastard", "bitch", "bollocks", "crap", "cunt", "damn", "dick",
    "fuck", "fucker", "fucking", "motherfucker", "piss", "prick", "shit", "slut", "twat",
    "wanker", "whore",
];

/// Case-insensitive whole-word match against a fixed list
#[derive(Debug, Clone)]
pub struct WordListFilter {
    words: HashSet<String>,
}

impl Default for WordListFilter {
    fn default() -> Self {
        Self::new(DEFAULT_WORDS.iter().copied())
    }
}

impl WordListFilter {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    /// Default list plus additional words
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut filter = Self::default();
        filter.words.extend(
            extra
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty()),
        );
        filter
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl ContentFilter for WordListFilter {
    fn is_profane(&self, text: &str) -> bool {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty())
            .any(|token| self.words.contains(&token.to_lowercase()))
    }

    fn name(&self) -> &str {
        "word_list"
    }
}

/// Lets everything through (filtering disabled)
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl ContentFilter for AllowAll {
    fn is_profane(&self, _text: &str) -> bool {
        false
    }

    fn name(&self) -> &str {
        "allow_all"
    }
}

/// Moderation configuration
#[derive(Debug, Clone)]
pub struct ModerationConfig {
    /// Whether profanity filtering is active
    pub enabled: bool,
    /// Words added on top of the built-in list
    pub extra_words: Vec<String>,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            extra_words: Vec::new(),
        }
    }
}

impl ModerationConfig {
    /// Load config from environment variables
    pub fn from_env() -> Self {
        let enabled = std::env::var("PROFANITY_FILTER")
            .map(|v| v != "0" && v.to_lowercase() != "false")
            .unwrap_or(true);

        let extra_words: Vec<String> = std::env::var("PROFANITY_EXTRA_WORDS")
            .map(|v| {
                v.split(',')
                    .map(|w| w.trim().to_string())
                    .filter(|w| !w.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        tracing::info!(
            enabled,
            extra_words = extra_words.len(),
            "Moderation config loaded"
        );

        Self {
            enabled,
            extra_words,
        }
    }

    /// Build the filter the chat gateway will hold
    pub fn build_filter(&self) -> Arc<dyn ContentFilter> {
        if self.enabled {
            Arc::new(WordListFilter::with_extra(&self.extra_words))
        } else {
            tracing::warn!("Profanity filter DISABLED - all messages will be broadcast");
            Arc::new(AllowAll)
        }
    }
}
