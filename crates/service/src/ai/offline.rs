use async_trait::async_trait;

use super::domain::{
    ChatContext, MenuContext, MenuRecommendation, ReservationContext, ReservationSuggestion,
};
use super::errors::AiError;
use super::{fallback, Assistant};

/// Used when no upstream is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineAssistant;

#[async_trait]
impl Assistant for OfflineAssistant {
    fn provider(&self) -> &'static str {
        "offline"
    }

    fn upstream(&self) -> bool {
        false
    }

    async fn recommend_menu(&self, ctx: &MenuContext) -> Result<Vec<MenuRecommendation>, AiError> {
        Ok(fallback::menu_recommendations(&ctx.menus))
    }

    async fn recommend_reservation(
        &self,
        ctx: &ReservationContext,
    ) -> Result<Vec<ReservationSuggestion>, AiError> {
        Ok(fallback::reservation_suggestions(ctx))
    }

    async fn chat(&self, _ctx: &ChatContext) -> Result<String, AiError> {
        Ok(fallback::CHAT_UNAVAILABLE.to_string())
    }
}
