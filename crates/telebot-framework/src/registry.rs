//! Handler registries.
//!
//! Registration may race with dispatch. Every accessor returns a snapshot of
//! `Arc`s so no lock is held while a handler runs.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::handler::{InlineProvider, MessageHandler, UpdateProcessor};

/// A registered inline provider together with its namespace.
pub(crate) type NamedProvider = (String, Arc<dyn InlineProvider>);

#[derive(Default)]
pub(crate) struct Registry {
    commands: RwLock<HashMap<String, Arc<dyn MessageHandler>>>,
    processors: RwLock<Vec<Arc<dyn MessageHandler>>>,
    providers: RwLock<Vec<NamedProvider>>,
    update_processors: RwLock<Vec<Arc<dyn UpdateProcessor>>>,
}

impl Registry {
    /// Registers a command, replacing any handler with the same name.
    /// Returns `true` if a handler was replaced.
    pub fn insert_command(&self, name: String, handler: Arc<dyn MessageHandler>) -> bool {
        self.commands.write().insert(name, handler).is_some()
    }

    pub fn command(&self, name: &str) -> Option<Arc<dyn MessageHandler>> {
        self.commands.read().get(name).cloned()
    }

    pub fn push_processor(&self, handler: Arc<dyn MessageHandler>) {
        self.processors.write().push(handler);
    }

    pub fn processors(&self) -> Vec<Arc<dyn MessageHandler>> {
        self.processors.read().clone()
    }

    /// Registers a provider. A provider with the same name is replaced in
    /// place, keeping its position in the answer order.
    /// Returns `true` if a provider was replaced.
    pub fn insert_provider(&self, name: String, provider: Arc<dyn InlineProvider>) -> bool {
        let mut providers = self.providers.write();
        match providers.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => {
                slot.1 = provider;
                true
            }
            None => {
                providers.push((name, provider));
                false
            }
        }
    }

    pub fn provider(&self, name: &str) -> Option<Arc<dyn InlineProvider>> {
        self.providers
            .read()
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, provider)| Arc::clone(provider))
    }

    pub fn providers(&self) -> Vec<NamedProvider> {
        self.providers.read().clone()
    }

    pub fn push_update_processor(&self, processor: Arc<dyn UpdateProcessor>) {
        self.update_processors.write().push(processor);
    }

    pub fn update_processors(&self) -> Vec<Arc<dyn UpdateProcessor>> {
        self.update_processors.read().clone()
    }

    pub fn command_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.commands.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn processor_count(&self) -> usize {
        self.processors.read().len()
    }

    pub fn provider_names(&self) -> Vec<String> {
        self.providers
            .read()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn update_processor_count(&self) -> usize {
        self.update_processors.read().len()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("commands", &self.command_names())
            .field("processor_count", &self.processor_count())
            .field("providers", &self.provider_names())
            .field("update_processor_count", &self.update_processor_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::Bot;
    use crate::handler::HandlerResult;
    use async_trait::async_trait;
    use telebot_core::model::{InlineQuery, InlineQueryResult, Message};

    struct Empty;

    #[async_trait]
    impl InlineProvider for Empty {
        async fn results(&self, _: &Bot, _: &InlineQuery) -> anyhow::Result<Vec<InlineQueryResult>> {
            Ok(Vec::new())
        }
    }

    async fn noop(_: Bot, _: Message) -> HandlerResult {
        Ok(())
    }

    #[test]
    fn test_command_overwrite_by_name() {
        let registry = Registry::default();
        assert!(!registry.insert_command("start".into(), Arc::new(noop)));
        assert!(registry.insert_command("start".into(), Arc::new(noop)));
        assert_eq!(registry.command_names(), vec!["start".to_string()]);
        assert!(registry.command("start").is_some());
        assert!(registry.command("stop").is_none());
    }

    #[test]
    fn test_provider_replace_keeps_order() {
        let registry = Registry::default();
        registry.insert_provider("a".into(), Arc::new(Empty));
        registry.insert_provider("b".into(), Arc::new(Empty));
        assert!(registry.insert_provider("a".into(), Arc::new(Empty)));
        assert_eq!(registry.provider_names(), vec!["a", "b"]);
    }

    #[test]
    fn test_snapshot_is_detached_from_later_registrations() {
        let registry = Registry::default();
        registry.push_processor(Arc::new(noop));
        let snapshot = registry.processors();
        registry.push_processor(Arc::new(noop));
        assert_eq!(snapshot.len(), 1);
        assert_eq!(registry.processor_count(), 2);
    }
}
