use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use cqrs_es::{
    persist::{PersistenceError, ViewContext, ViewRepository},
    Aggregate, EventEnvelope, View as CqrsView,
};
use serde::{Deserialize, Serialize};

use super::{RequestDraft, AGGREGATE_TYPE};

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct View {
    pub aggregate_type: String,
    pub command_id: String,
    pub id: String,
    pub draft: RequestDraft,
}

impl CqrsView<RequestDraft> for View {
    fn update(&mut self, event: &EventEnvelope<RequestDraft>) {
        self.id.clone_from(&event.aggregate_id);
        self.aggregate_type = AGGREGATE_TYPE.to_string();
        self.command_id = event
            .metadata
            .get("command_id")
            .unwrap_or(&"".to_string())
            .to_string();
        self.draft.apply(event.payload.clone());
    }
}

/// Draft views held in process memory; drafts never outlive the session.
#[derive(Default)]
pub struct InMemoryViewRepository {
    views: RwLock<HashMap<String, (View, i64)>>,
}

#[async_trait]
impl ViewRepository<View, RequestDraft> for InMemoryViewRepository {
    async fn load(&self, view_id: &str) -> Result<Option<View>, PersistenceError> {
        let views = self.views.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(views.get(view_id).map(|(view, _)| view.clone()))
    }

    async fn load_with_context(
        &self,
        view_id: &str,
    ) -> Result<Option<(View, ViewContext)>, PersistenceError> {
        let views = self.views.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(views.get(view_id).map(|(view, version)| {
            (view.clone(), ViewContext::new(view_id.to_string(), *version))
        }))
    }

    async fn update_view(&self, view: View, context: ViewContext) -> Result<(), PersistenceError> {
        let mut views = self.views.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        views.insert(context.view_instance_id.clone(), (view, context.version + 1));
        Ok(())
    }
}

pub struct Query {
    repo: Arc<Box<dyn ViewRepository<View, RequestDraft>>>,
}

impl Query {
    pub fn new(repo: Arc<Box<dyn ViewRepository<View, RequestDraft>>>) -> Self {
        Self { repo }
    }

    async fn update(
        &self,
        draft_id: &str,
        events: &[EventEnvelope<RequestDraft>],
    ) -> Result<(), PersistenceError> {
        let (mut view, view_context) = match self.repo.load_with_context(draft_id).await? {
            None => {
                let view_context = ViewContext::new(draft_id.to_string(), 0);
                (Default::default(), view_context)
            }
            Some((view, context)) => (view, context),
        };

        for event in events {
            view.update(event);
        }

        self.repo.update_view(view, view_context).await
    }
}

#[async_trait]
impl cqrs_es::Query<RequestDraft> for Query {
    async fn dispatch(&self, draft_id: &str, events: &[EventEnvelope<RequestDraft>]) {
        if let Err(err) = self.update(draft_id, events).await {
            tracing::error!("RequestDraftQuery error for {}: {}", draft_id, err);
        }
    }
}
