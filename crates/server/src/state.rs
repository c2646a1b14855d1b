use service::ai::AiService;
use service::EntityStore;

/// Shared by every handler. Cloning is cheap: the store holds a pool and the
/// assistant sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub store: EntityStore,
    pub ai: AiService,
}
