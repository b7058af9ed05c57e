use std::sync::Arc;

use crate::{
    config::Config, db::ReviewStore, triage::Classifier, validation::SubmissionRules,
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ReviewStore>,
    pub classifier: Arc<dyn Classifier>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ReviewStore>,
        classifier: Arc<dyn Classifier>,
        config: Config,
    ) -> Self {
        Self {
            store,
            classifier,
            config: Arc::new(config),
        }
    }

    pub fn submission_rules(&self) -> SubmissionRules {
        SubmissionRules {
            require_name: self.config.require_name,
        }
    }
}
