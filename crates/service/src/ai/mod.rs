//! Language-model assistant.
//!
//! [`Assistant`] is the capability; [`openai::OpenAiAssistant`] asks an
//! OpenAI-compatible upstream and [`offline::OfflineAssistant`] answers from
//! the deterministic fallbacks. [`service::AiService`] picks one at start-up
//! and turns every assistant failure into a fallback answer.

pub mod domain;
pub mod errors;
pub mod fallback;
pub mod offline;
pub mod openai;
pub mod service;

use async_trait::async_trait;

use domain::{
    ChatContext, MenuContext, MenuRecommendation, ReservationContext, ReservationSuggestion,
};
use errors::AiError;

pub use service::{AiService, Answer, Source};

#[async_trait]
pub trait Assistant: Send + Sync {
    /// Name reported by `/health`.
    fn provider(&self) -> &'static str;

    /// Whether answers come from a language model rather than the fallbacks.
    fn upstream(&self) -> bool;

    async fn recommend_menu(&self, ctx: &MenuContext) -> Result<Vec<MenuRecommendation>, AiError>;

    async fn recommend_reservation(
        &self,
        ctx: &ReservationContext,
    ) -> Result<Vec<ReservationSuggestion>, AiError>;

    async fn chat(&self, ctx: &ChatContext) -> Result<String, AiError>;
}
