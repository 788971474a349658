//! Named optimization plugins the first pass runs.

mod builtin;

use std::collections::HashMap;

use crate::processing::svg::Visitor;
use crate::utils::{OptimizerError, OptimizerResult};

/// Parameters every plugin instance is created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluginParams {
    pub float_precision: u32,
    pub transform_precision: u32,
}

/// Creates a fresh plugin instance for one pass.
pub type PluginFactory = fn(&PluginParams) -> Box<dyn Visitor>;

/// Lookup table from plugin name to factory.
pub struct PluginRegistry {
    factories: HashMap<String, PluginFactory>,
}

impl PluginRegistry {
    /// A registry with no plugins.
    pub fn empty() -> Self {
        Self { factories: HashMap::new() }
    }

    /// A registry holding every built-in plugin.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        builtin::register_all(&mut registry);
        registry
    }

    /// Adds or replaces the plugin called `name`.
    pub fn register(&mut self, name: &str, factory: PluginFactory) {
        self.factories.insert(name.to_string(), factory);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Instantiates `name`, failing for names that were never registered.
    pub fn create(&self, name: &str, params: &PluginParams) -> OptimizerResult<Box<dyn Visitor>> {
        self.factories
            .get(name)
            .map(|factory| factory(params))
            .ok_or_else(|| OptimizerError::pipeline(format!("Unknown plugin \"{name}\"")))
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Settings;

    const PARAMS: PluginParams = PluginParams { float_precision: 3, transform_precision: 5 };

    #[test]
    fn test_default_plugins_are_registered() {
        let registry = PluginRegistry::with_builtins();
        let settings = Settings::default();
        for name in settings.plugins.enabled() {
            assert!(registry.contains(name), "{name} missing");
        }
        assert!(registry.contains("removeDimensions"));
        assert!(registry.contains("sortAttrs"));
    }

    #[test]
    fn test_unknown_plugin() {
        let registry = PluginRegistry::with_builtins();
        let err = registry.create("noSuchPlugin", &PARAMS).err().unwrap();
        assert_eq!(err.to_string(), "Unknown plugin \"noSuchPlugin\"");
    }

    #[test]
    fn test_custom_registration() {
        struct Noop;
        impl Visitor for Noop {}

        let mut registry = PluginRegistry::empty();
        assert!(registry.names().is_empty());
        registry.register("noop", |_| Box::new(Noop));
        assert!(registry.create("noop", &PARAMS).is_ok());
        assert_eq!(registry.names(), vec!["noop"]);
    }
}
