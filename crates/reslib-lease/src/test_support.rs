//! Shared fixture for lease manager tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use reslib_core::config::session::SessionConfig;
use reslib_core::error::AppError;
use reslib_core::result::AppResult;
use reslib_core::traits::DocumentStore;
use reslib_core::types::{Filter, ResourceId, SessionId};
use reslib_database::store::MemoryDocumentStore;
use reslib_database::Stores;
use reslib_entity::{
    Field, FieldKind, FieldSchema, FieldValue, Project, ProjectInput, Resource, Session, Template,
    TemplateInput,
};
use reslib_worker::ManualExpiryScheduler;

use crate::jwt::TokenIssuer;
use crate::locks::CollectionLocks;
use crate::manager::LeaseManager;

pub(crate) const SECRET: &[u8] = b"lease-test-signing-secret";
pub(crate) const API_KEY: &str = "test-api-key";

/// Session store whose updates fail while the flag is set.
#[derive(Debug)]
struct FlakySessionStore {
    inner: MemoryDocumentStore<Session>,
    fail: Arc<AtomicBool>,
}

#[async_trait]
impl DocumentStore<Session> for FlakySessionStore {
    async fn insert(&self, doc: &Session) -> AppResult<()> {
        self.inner.insert(doc).await
    }

    async fn find_by_id(&self, id: SessionId) -> AppResult<Option<Session>> {
        self.inner.find_by_id(id).await
    }

    async fn find_first(&self, filter: &Filter) -> AppResult<Option<Session>> {
        self.inner.find_first(filter).await
    }

    async fn find_all(&self, filter: &Filter) -> AppResult<Vec<Session>> {
        self.inner.find_all(filter).await
    }

    async fn update(&self, doc: &Session) -> AppResult<bool> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::database("session store unavailable"));
        }
        self.inner.update(doc).await
    }

    async fn delete(&self, id: SessionId) -> AppResult<bool> {
        self.inner.delete(id).await
    }
}

pub(crate) struct Fixture {
    pub manager: LeaseManager,
    pub scheduler: Arc<ManualExpiryScheduler>,
    pub project: Project,
    pub template: Template,
    fail_sessions: Arc<AtomicBool>,
}

impl Fixture {
    pub async fn new() -> Self {
        Self::build(Stores::in_memory(), SessionConfig::default(), None).await
    }

    pub async fn with_failing_session_writes() -> Self {
        let fail = Arc::new(AtomicBool::new(false));
        let mut stores = Stores::in_memory();
        stores.sessions = Arc::new(FlakySessionStore {
            inner: MemoryDocumentStore::new(),
            fail: Arc::clone(&fail),
        });
        Self::build(stores, SessionConfig::default(), Some(fail)).await
    }

    /// Rebuild a manager over the same stores, as after a restart.
    pub async fn restarted(&self, config: SessionConfig) -> Self {
        let scheduler = Arc::new(ManualExpiryScheduler::new());
        let manager = LeaseManager::new(
            self.manager.stores().clone(),
            Arc::new(CollectionLocks::default()),
            scheduler.clone(),
            TokenIssuer::new(SECRET),
            config,
        );
        Self {
            manager,
            scheduler,
            project: self.project.clone(),
            template: self.template.clone(),
            fail_sessions: Arc::clone(&self.fail_sessions),
        }
    }

    async fn build(stores: Stores, config: SessionConfig, fail: Option<Arc<AtomicBool>>) -> Self {
        let template = Template::new(TemplateInput {
            name: "printer".into(),
            description: String::new(),
            fields: vec![
                FieldSchema {
                    key: "tickets".into(),
                    kind: FieldKind::Subresource,
                    required: true,
                },
                FieldSchema {
                    key: "location".into(),
                    kind: FieldKind::Value,
                    required: false,
                },
            ],
        });
        stores.templates.insert(&template).await.unwrap();

        let project = Project::new(
            ProjectInput {
                name: "lab".into(),
                settings: vec![],
            },
            API_KEY.into(),
        );
        stores.projects.insert(&project).await.unwrap();

        let scheduler = Arc::new(ManualExpiryScheduler::new());
        let manager = LeaseManager::new(
            stores,
            Arc::new(CollectionLocks::default()),
            scheduler.clone(),
            TokenIssuer::new(SECRET),
            config,
        );

        Self {
            manager,
            scheduler,
            project,
            template,
            fail_sessions: fail.unwrap_or_default(),
        }
    }

    pub fn fail_session_writes(&self, fail: bool) {
        self.fail_sessions.store(fail, Ordering::SeqCst);
    }

    /// Create a resource with `tickets` units and a plain `location` field.
    pub async fn resource(&self, name: &str, tickets: i64) -> ResourceId {
        let resource = Resource::new(
            name.into(),
            String::new(),
            self.template.id,
            vec![self.project.id],
            vec![
                Field::subresource("tickets", tickets, true),
                Field {
                    key: "location".into(),
                    kind: FieldKind::Value,
                    required: false,
                    value: FieldValue::from("lab 2"),
                },
            ],
        );
        let stores = self.manager.stores();
        stores.resources.insert(&resource).await.unwrap();

        let mut project = stores
            .projects
            .find_by_id(self.project.id)
            .await
            .unwrap()
            .unwrap();
        project.add_resource(resource.id);
        stores.projects.update(&project).await.unwrap();
        resource.id
    }

    pub async fn open_session(&self) -> SessionId {
        self.manager.create_session(API_KEY).await.unwrap().session.id
    }

    pub async fn session(&self, id: SessionId) -> Session {
        self.manager.find_session(id).await.unwrap()
    }

    pub async fn resource_doc(&self, id: ResourceId) -> Resource {
        self.manager
            .stores()
            .resources
            .find_by_id(id)
            .await
            .unwrap()
            .unwrap()
    }

    pub async fn quantity(&self, id: ResourceId, key: &str) -> i64 {
        self.resource_doc(id)
            .await
            .field(key)
            .and_then(Field::quantity)
            .unwrap()
    }
}
