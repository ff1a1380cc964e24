use std::{collections::HashMap, sync::Arc};

use super::WebHookExecutor;
use crate::model::vo::WebHookEventType;

/// Executors by event type, fixed once built.
#[derive(Clone, Default)]
pub struct ExecutorRegistry {
    executors: HashMap<WebHookEventType, Arc<dyn WebHookExecutor>>,
}

impl ExecutorRegistry {
    pub fn builder() -> ExecutorRegistryBuilder {
        ExecutorRegistryBuilder::default()
    }

    pub fn get(&self, event_type: WebHookEventType) -> Option<&Arc<dyn WebHookExecutor>> {
        self.executors.get(&event_type)
    }

    pub fn len(&self) -> usize {
        self.executors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.executors.is_empty()
    }
}

#[derive(Default)]
pub struct ExecutorRegistryBuilder {
    executors: HashMap<WebHookEventType, Arc<dyn WebHookExecutor>>,
}

impl ExecutorRegistryBuilder {
    /// Route every given event type to `executor`, replacing earlier registrations.
    pub fn register(
        mut self,
        event_types: &[WebHookEventType],
        executor: Arc<dyn WebHookExecutor>,
    ) -> Self {
        for event_type in event_types {
            self.executors.insert(*event_type, executor.clone());
        }
        self
    }

    pub fn build(self) -> ExecutorRegistry {
        ExecutorRegistry {
            executors: self.executors,
        }
    }
}
