use std::sync::Arc;

use chrono::Utc;
use configs::AiConfig;
use serde::Serialize;
use tracing::{info, instrument, warn};

use models::validate::{Checker, TEXT_MAX};

use super::domain::{
    ChatContext, ChatRequest, MenuContext, MenuRecommendation, MenuRecommendationRequest,
    ReservationContext, ReservationRecommendationRequest, ReservationSuggestion,
};
use super::errors::AiError;
use super::offline::OfflineAssistant;
use super::openai::OpenAiAssistant;
use super::{fallback, Assistant};
use crate::errors::ServiceError;
use crate::observability::AI_FALLBACKS_TOTAL;
use crate::reservation_service::ReservationFilter;
use crate::store::EntityStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Upstream,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer<T> {
    pub value: T,
    pub source: Source,
}

/// Assistant front door. Store errors (unknown restaurant, bad input) are
/// returned; assistant errors are logged, counted and replaced by a fallback.
#[derive(Clone)]
pub struct AiService {
    assistant: Arc<dyn Assistant>,
}

impl AiService {
    pub fn new(assistant: Arc<dyn Assistant>) -> Self {
        Self { assistant }
    }

    pub fn offline() -> Self {
        Self::new(Arc::new(OfflineAssistant))
    }

    /// Upstream when configured with a key, otherwise offline.
    pub fn from_config(cfg: &AiConfig) -> Self {
        if !cfg.upstream_enabled() {
            info!(provider = "offline", "assistant_selected");
            return Self::offline();
        }
        match OpenAiAssistant::new(cfg) {
            Ok(a) => {
                info!(
                    provider = "openai",
                    model = %cfg.model,
                    base_url = %cfg.base_url,
                    "assistant_selected"
                );
                Self::new(Arc::new(a))
            }
            Err(e) => {
                warn!(error = %e, "assistant_client_failed_using_offline");
                Self::offline()
            }
        }
    }

    pub fn provider(&self) -> &'static str {
        self.assistant.provider()
    }

    fn settle<T>(
        &self,
        capability: &'static str,
        result: Result<T, AiError>,
        fallback: impl FnOnce(&AiError) -> T,
    ) -> Answer<T> {
        match result {
            Ok(value) => {
                let source = if self.assistant.upstream() {
                    Source::Upstream
                } else {
                    Source::Fallback
                };
                Answer { value, source }
            }
            Err(e) => {
                warn!(capability, kind = e.kind(), error = %e, "assistant_failed_using_fallback");
                AI_FALLBACKS_TOTAL.with_label_values(&[capability]).inc();
                Answer {
                    value: fallback(&e),
                    source: Source::Fallback,
                }
            }
        }
    }

    #[instrument(skip(self, store, req), fields(restaurant_id = %req.restaurant_id))]
    pub async fn recommend_menu(
        &self,
        store: &EntityStore,
        req: MenuRecommendationRequest,
    ) -> Result<Answer<Vec<MenuRecommendation>>, ServiceError> {
        let ctx = MenuContext {
            restaurant: store.get_restaurant(req.restaurant_id).await?,
            menus: store.list_menus(req.restaurant_id).await?,
            preferences: req.preferences,
        };
        let result = self.assistant.recommend_menu(&ctx).await;
        Ok(self.settle("menu", result, |_| fallback::menu_recommendations(&ctx.menus)))
    }

    #[instrument(skip(self, store, req), fields(restaurant_id = %req.restaurant_id))]
    pub async fn recommend_reservation(
        &self,
        store: &EntityStore,
        req: ReservationRecommendationRequest,
    ) -> Result<Answer<Vec<ReservationSuggestion>>, ServiceError> {
        let mut c = Checker::for_create();
        let party_size = c.positive("party_size", req.party_size);
        let preferred_date = match req.preferred_date {
            Some(d) => c.date("preferred_date", Some(d)),
            None => Some(Utc::now().date_naive()),
        };
        c.finish()?;
        let (Some(party_size), Some(preferred_date)) = (party_size, preferred_date) else {
            return Err(ServiceError::invalid_field("party_size", "is required"));
        };

        let restaurant = store.get_restaurant(req.restaurant_id).await?;
        let mut tables = store.list_tables(req.restaurant_id).await?;
        tables.sort_by_key(|t| t.table_number);
        let filter = ReservationFilter {
            date: Some(preferred_date),
            status: None,
        };
        let bookings = store
            .list_reservations(req.restaurant_id, &filter)
            .await?
            .into_iter()
            .filter(|r| r.status.holds_table())
            .collect();
        let ctx = ReservationContext {
            restaurant,
            tables,
            bookings,
            party_size,
            preferred_date,
            duration_minutes: store.policy().duration_minutes,
        };
        let result = self.assistant.recommend_reservation(&ctx).await;
        Ok(self.settle("reservation", result, |_| fallback::reservation_suggestions(&ctx)))
    }

    #[instrument(skip(self, store, req), fields(restaurant_id = %req.restaurant_id))]
    pub async fn chat(
        &self,
        store: &EntityStore,
        req: ChatRequest,
    ) -> Result<Answer<String>, ServiceError> {
        let mut c = Checker::for_create();
        let message = c.text("message", req.message, TEXT_MAX);
        c.finish()?;
        let ctx = ChatContext {
            restaurant: store.get_restaurant(req.restaurant_id).await?,
            menus: store.list_menus(req.restaurant_id).await?,
            message: message.unwrap_or_default(),
        };
        let result = self.assistant.chat(&ctx).await;
        Ok(self.settle("chat", result, |e| fallback::chat_reply(e).to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_store, gourmet_kitchen, menu_item, table};
    use async_trait::async_trait;
    use models::menu::MenuFields;

    /// Always fails the way it was built to.
    struct Broken(fn() -> AiError);

    #[async_trait]
    impl Assistant for Broken {
        fn provider(&self) -> &'static str {
            "broken"
        }
        fn upstream(&self) -> bool {
            true
        }
        async fn recommend_menu(
            &self,
            _: &MenuContext,
        ) -> Result<Vec<MenuRecommendation>, AiError> {
            Err((self.0)())
        }
        async fn recommend_reservation(
            &self,
            _: &ReservationContext,
        ) -> Result<Vec<ReservationSuggestion>, AiError> {
            Err((self.0)())
        }
        async fn chat(&self, _: &ChatContext) -> Result<String, AiError> {
            Err((self.0)())
        }
    }

    #[tokio::test]
    async fn unavailable_upstream_chat_redirects_to_restaurant() -> Result<(), anyhow::Error> {
        let store = get_store().await?;
        let r = store.create_restaurant(gourmet_kitchen()).await?;
        let ai = AiService::new(Arc::new(Broken(|| {
            AiError::Unavailable("connection refused".into())
        })));
        let hello = || ChatRequest {
            restaurant_id: r.id,
            message: Some("Hi".into()),
        };

        let answer = ai.chat(&store, hello()).await?;
        assert_eq!(answer.value, fallback::CHAT_UNAVAILABLE);
        assert_eq!(answer.source, Source::Fallback);

        let ai = AiService::new(Arc::new(Broken(|| AiError::Parse("garbage".into()))));
        let answer = ai.chat(&store, hello()).await?;
        assert_eq!(answer.value, fallback::CHAT_ERROR);
        Ok(())
    }

    #[tokio::test]
    async fn failed_recommendations_fall_back() -> Result<(), anyhow::Error> {
        let store = get_store().await?;
        let r = store.create_restaurant(gourmet_kitchen()).await?;
        let dinner = MenuFields {
            name: Some("Dinner".into()),
            items: Some(vec![menu_item("Soup", 600, "Starters")]),
            ..Default::default()
        };
        store.create_menu(r.id, dinner).await?;
        store.create_table(r.id, table(1, 4)).await?;
        let ai = AiService::new(Arc::new(Broken(|| AiError::Upstream("401".into()))));

        let req = MenuRecommendationRequest {
            restaurant_id: r.id,
            preferences: serde_json::Value::Null,
        };
        let menu = ai.recommend_menu(&store, req).await?;
        assert_eq!(menu.source, Source::Fallback);
        assert_eq!(menu.value[0].item_name, "Soup");

        let req = ReservationRecommendationRequest {
            restaurant_id: r.id,
            party_size: Some(2),
            preferred_date: Some("2024-01-15".into()),
        };
        let slots = ai.recommend_reservation(&store, req).await?;
        assert_eq!(slots.value.len(), 5);
        assert_eq!(slots.value[0].time, "18:00");
        Ok(())
    }

    #[tokio::test]
    async fn store_errors_still_surface() -> Result<(), anyhow::Error> {
        let store = get_store().await?;
        let ai = AiService::offline();
        let ghost = ChatRequest {
            restaurant_id: uuid::Uuid::new_v4(),
            message: Some("Hi".into()),
        };
        let missing = ai.chat(&store, ghost).await;
        assert!(matches!(missing, Err(ServiceError::NotFound(_))));

        let r = store.create_restaurant(gourmet_kitchen()).await?;
        let nobody = ReservationRecommendationRequest {
            restaurant_id: r.id,
            party_size: Some(0),
            preferred_date: None,
        };
        let bad = ai.recommend_reservation(&store, nobody).await;
        assert!(matches!(bad, Err(ServiceError::Validation(ref f)) if f.contains("party_size")));
        Ok(())
    }

    #[test]
    fn config_without_key_selects_offline() {
        let cfg = AiConfig {
            provider: configs::AiProvider::OpenAi,
            ..Default::default()
        };
        assert_eq!(AiService::from_config(&cfg).provider(), "offline");
        let cfg = AiConfig {
            provider: configs::AiProvider::OpenAi,
            api_key: "sk-test".into(),
            ..Default::default()
        };
        assert_eq!(AiService::from_config(&cfg).provider(), "openai");
    }
}
