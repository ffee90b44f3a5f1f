mod chat;
mod counter;
pub mod hub;
pub mod presence;

pub use chat::{ChatError, ChatState, DELIVERED_TEXT, LEFT_TEXT, WELCOME_TEXT};
pub use counter::CounterState;

use crate::moderation::ContentFilter;
use std::sync::Arc;

/// Shared application state: the two demos side by side, sharing nothing
#[derive(Clone)]
pub struct AppState {
    pub chat: ChatState,
    pub counter: CounterState,
}

impl AppState {
    pub fn new(filter: Arc<dyn ContentFilter>) -> Self {
        Self {
            chat: ChatState::new(filter),
            counter: CounterState::new(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Arc::new(crate::moderation::WordListFilter::default()))
    }
}
