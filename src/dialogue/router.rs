//! Intent name routing.

use std::collections::HashMap;

use super::{DialogueEngine, DialogueResponse, IntentEvent, IntentKind, Reply};

/// Maps namespaced intent names to [`IntentKind`]s and feeds them to the
/// engine, one at a time.
pub struct IntentRouter {
    engine: DialogueEngine,
    namespace: String,
    routes: HashMap<String, IntentKind>,
}

impl IntentRouter {
    #[must_use]
    pub fn new(engine: DialogueEngine, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        let routes = IntentKind::ALL
            .into_iter()
            .map(|kind| (qualify(&namespace, kind), kind))
            .collect();

        Self {
            engine,
            namespace,
            routes,
        }
    }

    #[must_use]
    pub fn engine(&self) -> &DialogueEngine {
        &self.engine
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Full intent name for `kind`, e.g. `livingonmars:nextStep`.
    #[must_use]
    pub fn intent_name(&self, kind: IntentKind) -> String {
        qualify(&self.namespace, kind)
    }

    /// Resolve an intent name. Names without a namespace are looked up in
    /// this router's namespace.
    #[must_use]
    pub fn resolve(&self, intent_name: &str) -> Option<IntentKind> {
        if intent_name.contains(':') {
            self.routes.get(intent_name).copied()
        } else {
            self.routes
                .get(&format!("{}:{intent_name}", self.namespace))
                .copied()
        }
    }

    /// Process one intent event and build the transport response.
    pub async fn route(&mut self, event: IntentEvent) -> DialogueResponse {
        let reply = match self.resolve(&event.intent_name) {
            Some(kind) => self.engine.handle(kind, &event).await,
            None => {
                tracing::warn!(intent = %event.intent_name, "Unknown intent, answering with help");
                self.engine.help()
            }
        };

        tracing::debug!(
            session_id = %event.session_id,
            ends_session = reply.ends_session(),
            "Replying"
        );
        self.to_response(event.session_id, reply)
    }

    fn to_response(&self, session_id: String, reply: Reply) -> DialogueResponse {
        match reply {
            Reply::End { text } => DialogueResponse::EndSession { session_id, text },
            Reply::Continue { text, accept } => DialogueResponse::ContinueSession {
                session_id,
                text,
                intent_filter: accept.into_iter().map(|k| self.intent_name(k)).collect(),
            },
        }
    }
}

fn qualify(namespace: &str, kind: IntentKind) -> String {
    format!("{namespace}:{}", kind.wire_name())
}
