use crate::assignments::repo::AssignmentRepository;
use crate::config::AppConfig;
use crate::db;
use crate::mentors::repo::MentorRepository;
use crate::storage::PgStore;
use crate::students::repo::StudentRepository;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub mentors: Arc<dyn MentorRepository>,
    pub students: Arc<dyn StudentRepository>,
    pub assignments: Arc<dyn AssignmentRepository>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let pool = db::connect(&config.database).await?;
        db::migrate(&pool).await?;

        let store = Arc::new(PgStore::new(pool));
        Ok(Self::from_parts(config, store.clone(), store.clone(), store))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        mentors: Arc<dyn MentorRepository>,
        students: Arc<dyn StudentRepository>,
        assignments: Arc<dyn AssignmentRepository>,
    ) -> Self {
        Self {
            config,
            mentors,
            students,
            assignments,
        }
    }

    /// State backed by an in-memory store; the store is returned so tests
    /// can seed it or inject failures.
    #[cfg(test)]
    pub fn fake() -> (Self, Arc<crate::storage::memory::MemoryStore>) {
        let store = Arc::new(crate::storage::memory::MemoryStore::new());
        let config = Arc::new(AppConfig::from_lookup(|_| None).expect("default config"));
        let state = Self::from_parts(config, store.clone(), store.clone(), store.clone());
        (state, store)
    }
}
