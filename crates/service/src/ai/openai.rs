//! OpenAI-compatible `/chat/completions` client.

use std::time::Duration;

use async_trait::async_trait;
use configs::AiConfig;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use super::domain::{
    ChatContext, MenuContext, MenuRecommendation, ReservationContext, ReservationSuggestion,
};
use super::errors::AiError;
use super::Assistant;

const MAX_RECOMMENDATIONS: usize = 5;

pub struct OpenAiAssistant {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: [Message<'a>; 2],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: String,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiAssistant {
    pub fn new(cfg: &AiConfig) -> Result<Self, AiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| AiError::Unavailable(format!("http client: {e}")))?;
        Ok(Self {
            client,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
            temperature: cfg.temperature,
        })
    }

    async fn complete(&self, system: String, user: String) -> Result<String, AiError> {
        let body = CompletionRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: [
                Message {
                    role: "system",
                    content: system,
                },
                Message {
                    role: "user",
                    content: user,
                },
            ],
        };
        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AiError::Unavailable(e.to_string()))?;

        let status = resp.status();
        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AiError::Unavailable(format!("upstream status {status}")));
        }
        if !status.is_success() {
            return Err(AiError::Upstream(format!("upstream status {status}")));
        }
        let parsed: CompletionResponse =
            resp.json().await.map_err(|e| AiError::Parse(e.to_string()))?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| AiError::Parse("empty completion".into()))?;
        debug!(model = %self.model, chars = content.len(), "assistant_completion");
        Ok(content)
    }
}

/// The body of the first fenced code block, or the whole text.
pub fn extract_json(text: &str) -> &str {
    let Some(open) = text.find("```") else {
        return text.trim();
    };
    let rest = &text[open + 3..];
    // skip an info string such as `json`
    let rest = match rest.find('\n') {
        Some(nl) if !rest[..nl].trim().contains(['[', '{']) => &rest[nl + 1..],
        _ => rest,
    };
    match rest.find("```") {
        Some(close) => rest[..close].trim(),
        None => rest.trim(),
    }
}

/// A JSON array of `T`, or a single `T`.
pub fn parse_list<T: DeserializeOwned>(text: &str) -> Result<Vec<T>, AiError> {
    let value: serde_json::Value =
        serde_json::from_str(extract_json(text)).map_err(|e| AiError::Parse(e.to_string()))?;
    let items = match value {
        serde_json::Value::Array(items) => items,
        other => vec![other],
    };
    items
        .into_iter()
        .map(|v| serde_json::from_value(v).map_err(|e| AiError::Parse(e.to_string())))
        .collect()
}

fn pretty(v: &serde_json::Value) -> String {
    serde_json::to_string_pretty(v).unwrap_or_default()
}

#[async_trait]
impl Assistant for OpenAiAssistant {
    fn provider(&self) -> &'static str {
        "openai"
    }

    fn upstream(&self) -> bool {
        true
    }

    async fn recommend_menu(
        &self,
        ctx: &MenuContext,
    ) -> Result<Vec<MenuRecommendation>, AiError> {
        let items: Vec<_> = ctx
            .menus
            .iter()
            .flat_map(|m| {
                m.items
                    .iter()
                    .map(move |i| json!({ "menu_name": m.name, "item": i }))
            })
            .collect();
        let system = "You recommend menu items that match a customer's preferences. \
            Answer with a JSON array of objects \
            {\"item_name\", \"reason\", \"match_score\" (0.0-1.0)}, \
            best match first, at most 5 entries."
            .to_string();
        let user = format!(
            "Restaurant: {}\nCuisine: {}\n\nMenu items:\n{}\n\nCustomer preferences:\n{}",
            ctx.restaurant.name,
            ctx.restaurant.cuisine_type.as_deref().unwrap_or("unknown"),
            pretty(&json!(items)),
            pretty(&ctx.preferences),
        );
        let answer = self.complete(system, user).await?;
        let mut recs: Vec<MenuRecommendation> = parse_list(&answer)?;
        recs.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
        recs.truncate(MAX_RECOMMENDATIONS);
        Ok(recs)
    }

    async fn recommend_reservation(
        &self,
        ctx: &ReservationContext,
    ) -> Result<Vec<ReservationSuggestion>, AiError> {
        let tables: Vec<_> = ctx
            .tables
            .iter()
            .filter(|t| t.capacity >= ctx.party_size)
            .map(|t| {
                json!({
                    "table_number": t.table_number,
                    "capacity": t.capacity,
                    "location": t.location,
                    "status": t.status,
                })
            })
            .collect();
        let booked: Vec<_> = ctx
            .bookings
            .iter()
            .map(|b| {
                json!({ "time": b.time, "party_size": b.party_size, "table_id": b.table_id })
            })
            .collect();
        let system = format!(
            "You suggest reservation times. A booking holds its table for {} minutes. \
             Answer with a JSON array of objects {{\"time\" (HH:MM), \"table_number\", \
             \"reason\", \"availability_score\" (0.0-1.0)}}, best first, at most 5 entries.",
            ctx.duration_minutes
        );
        let user = format!(
            "Restaurant: {}\nDate: {}\nParty size: {}\nOpening hours: {}\n\n\
             Tables:\n{}\n\nExisting bookings:\n{}",
            ctx.restaurant.name,
            ctx.preferred_date,
            ctx.party_size,
            pretty(&json!(ctx.restaurant.opening_hours)),
            pretty(&json!(tables)),
            pretty(&json!(booked)),
        );
        let answer = self.complete(system, user).await?;
        let mut recs: Vec<ReservationSuggestion> = parse_list(&answer)?;
        recs.sort_by(|a, b| b.availability_score.total_cmp(&a.availability_score));
        recs.truncate(MAX_RECOMMENDATIONS);
        Ok(recs)
    }

    async fn chat(&self, ctx: &ChatContext) -> Result<String, AiError> {
        let menus: Vec<_> = ctx
            .menus
            .iter()
            .map(|m| {
                let mut categories: Vec<_> = m
                    .items
                    .iter()
                    .map(|i| i.category.as_deref().unwrap_or("Other"))
                    .collect();
                categories.sort_unstable();
                categories.dedup();
                json!({
                    "menu_name": m.name,
                    "item_count": m.items.len(),
                    "categories": categories,
                })
            })
            .collect();
        let r = &ctx.restaurant;
        let system = format!(
            "You are a friendly, concise assistant for {name}. Help with menu questions, \
             reservations, opening hours and dietary needs. If you do not know, suggest \
             contacting the restaurant.\n\n\
             Cuisine: {cuisine}\nAddress: {address}\nPhone: {phone}\nEmail: {email}\n\
             Opening hours: {hours}\n\nMenus:\n{menus}",
            name = r.name,
            cuisine = r.cuisine_type.as_deref().unwrap_or("unknown"),
            address = r.address,
            phone = r.phone,
            email = r.email,
            hours = pretty(&json!(r.opening_hours)),
            menus = pretty(&json!(menus)),
        );
        self.complete(system, ctx.message.clone()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::domain::MenuRecommendation;
    use axum::{http::StatusCode as AxumStatus, routing::post, Json, Router};
    use models::clock;
    use models::restaurant::RestaurantFields;
    use tokio::net::TcpListener;

    #[test]
    fn extracts_fenced_json() {
        assert_eq!(extract_json("```json\n[1, 2]\n```"), "[1, 2]");
        assert_eq!(extract_json("Sure!\n```\n{\"a\": 1}\n```\nEnjoy"), "{\"a\": 1}");
        assert_eq!(extract_json("```[3]```"), "[3]");
        assert_eq!(extract_json("  [4] "), "[4]");
    }

    #[test]
    fn parse_list_accepts_single_object() {
        let single = r#"{"item_name": "Soup", "reason": "warm", "match_score": 0.9}"#;
        let recs: Vec<MenuRecommendation> = parse_list(single).expect("parse");
        assert_eq!(recs.len(), 1);
        assert!(matches!(parse_list::<MenuRecommendation>("not json"), Err(AiError::Parse(_))));
    }

    async fn serve(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        format!("http://{addr}")
    }

    fn assistant(base_url: String) -> OpenAiAssistant {
        let cfg = AiConfig {
            api_key: "test-key".into(),
            base_url,
            timeout_secs: 5,
            ..Default::default()
        };
        OpenAiAssistant::new(&cfg).expect("client")
    }

    fn chat_ctx() -> ChatContext {
        let restaurant = RestaurantFields {
            name: Some("The Gourmet Kitchen".into()),
            address: Some("123 Main St".into()),
            phone: Some("555-0123".into()),
            email: Some("info@gourmet.example".into()),
            ..Default::default()
        }
        .into_model(clock::now())
        .expect("restaurant");
        ChatContext {
            restaurant,
            menus: vec![],
            message: "Are you open on Sunday?".into(),
        }
    }

    #[tokio::test]
    async fn chat_returns_completion_text() {
        let router = Router::new().route(
            "/chat/completions",
            post(|Json(body): Json<serde_json::Value>| async move {
                assert_eq!(body["messages"][1]["content"], "Are you open on Sunday?");
                let message = json!({ "role": "assistant", "content": " Yes, from noon. " });
                Json(json!({ "choices": [{ "message": message }] }))
            }),
        );
        let a = assistant(serve(router).await);
        assert_eq!(a.chat(&chat_ctx()).await.expect("chat"), "Yes, from noon.");
    }

    #[tokio::test]
    async fn server_errors_are_unavailable_and_bad_requests_are_upstream() {
        let router = Router::new().route(
            "/chat/completions",
            post(|| async { AxumStatus::SERVICE_UNAVAILABLE }),
        );
        let a = assistant(serve(router).await);
        assert!(matches!(a.chat(&chat_ctx()).await, Err(AiError::Unavailable(_))));

        let router = Router::new().route(
            "/chat/completions",
            post(|| async { AxumStatus::UNAUTHORIZED }),
        );
        let a = assistant(serve(router).await);
        assert!(matches!(a.chat(&chat_ctx()).await, Err(AiError::Upstream(_))));
    }

    #[tokio::test]
    async fn empty_choices_are_a_parse_error() {
        let router = Router::new().route(
            "/chat/completions",
            post(|| async { Json(json!({ "choices": [] })) }),
        );
        let a = assistant(serve(router).await);
        assert!(matches!(a.chat(&chat_ctx()).await, Err(AiError::Parse(_))));
    }

    #[tokio::test]
    async fn refused_connection_is_unavailable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);
        let a = assistant(format!("http://{addr}"));
        assert!(matches!(a.chat(&chat_ctx()).await, Err(AiError::Unavailable(_))));
    }
}
