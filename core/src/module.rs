use std::collections::HashMap;

use anyhow::{Context, Result};
use tracing::debug;

use crate::{
    error::NativeError,
    invoke::HandlerSignature,
    util::fast_map::{FastHashMap, fast_hash_map_new, fold_key},
    val::{TypeResolver, Val},
};

/// Native implementation of one extension handler. Receives the marshaled
/// arguments in declaration order; `out` and `inout` slots are written in
/// place.
pub type NativeFunction = fn(&mut [Val]) -> Result<Val, NativeError>;

/// Separately compiled extension module.
///
/// Library modules contribute their handlers to the registry's handler map;
/// other modules (object kinds, resources) are registered for lifecycle only.
pub trait ExtensionModule: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &str;

    fn version(&self) -> &str {
        "1.0.0"
    }

    fn description(&self) -> &str {
        ""
    }

    fn is_library(&self) -> bool {
        true
    }

    fn handler_names(&self) -> Vec<&str>;

    fn signature(&self, handler: &str) -> Option<&HandlerSignature>;

    fn call(&mut self, handler: &str, args: &mut [Val]) -> Result<Val, NativeError>;

    /// Called once when the module is added to a registry.
    fn init(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called when the module is removed from a registry.
    fn cleanup(&mut self) -> Result<()> {
        Ok(())
    }

    fn metadata(&self) -> HashMap<String, String> {
        let mut meta = HashMap::new();
        meta.insert("name".to_string(), self.name().to_string());
        meta.insert("version".to_string(), self.version().to_string());
        meta.insert("description".to_string(), self.description().to_string());
        meta.insert("library".to_string(), self.is_library().to_string());
        meta
    }
}

#[derive(Debug)]
struct HandlerEntry {
    name: &'static str,
    signature: HandlerSignature,
    function: NativeFunction,
}

/// Handler table for modules whose handlers are plain functions.
#[derive(Debug, Default)]
pub struct HandlerTable {
    entries: Vec<HandlerEntry>,
}

impl HandlerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a handler from its signature text, e.g.
    /// `"(in number, out string) -> any"`.
    pub fn add(
        &mut self,
        name: &'static str,
        signature: &str,
        resolver: &dyn TypeResolver,
        function: NativeFunction,
    ) -> Result<&mut Self> {
        let signature = HandlerSignature::parse(signature, resolver)
            .with_context(|| format!("invalid signature for handler '{}'", name))?;
        self.entries.push(HandlerEntry {
            name,
            signature,
            function,
        });
        Ok(self)
    }

    fn find(&self, handler: &str) -> Option<&HandlerEntry> {
        self.entries.iter().find(|e| e.name.eq_ignore_ascii_case(handler))
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name).collect()
    }

    pub fn signature(&self, handler: &str) -> Option<&HandlerSignature> {
        self.find(handler).map(|e| &e.signature)
    }

    pub fn call(&self, module: &str, handler: &str, args: &mut [Val]) -> Result<Val, NativeError> {
        match self.find(handler) {
            Some(entry) => (entry.function)(args),
            None => Err(NativeError::new(module, format!("no handler named '{}'", handler))),
        }
    }
}

/// Index of a module inside its registry. Valid until the next add or
/// remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModuleId(usize);

#[derive(Debug)]
struct HandlerRoute {
    module: ModuleId,
    handler: String,
}

#[derive(Debug)]
struct LoadedModule {
    source: String,
    module: Box<dyn ExtensionModule>,
}

/// Loaded extension modules and the handler-name map built from them.
///
/// The map is rebuilt lazily: loading or unloading a module only marks it
/// dirty, and the next lookup rebuilds it.
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    modules: Vec<LoadedModule>,
    handlers: FastHashMap<String, HandlerRoute>,
    dirty: bool,
    generation: u64,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
            handlers: fast_hash_map_new(),
            dirty: false,
            generation: 0,
        }
    }

    /// Initialize and register a module. `source` records where it came from.
    pub fn add_module(&mut self, source: &str, mut module: Box<dyn ExtensionModule>) -> Result<ModuleId> {
        module
            .init()
            .with_context(|| format!("failed to initialize module '{}'", module.name()))?;
        debug!(target: "strand::module", module = module.name(), source, "module added");
        self.modules.push(LoadedModule {
            source: source.to_owned(),
            module,
        });
        self.invalidate();
        Ok(ModuleId(self.modules.len() - 1))
    }

    /// Clean up and unregister the module named `name`. Returns whether a
    /// module was removed.
    pub fn remove_module(&mut self, name: &str) -> Result<bool> {
        let Some(index) = self
            .modules
            .iter()
            .rposition(|m| m.module.name().eq_ignore_ascii_case(name))
        else {
            return Ok(false);
        };
        let mut loaded = self.modules.remove(index);
        self.invalidate();
        loaded
            .module
            .cleanup()
            .with_context(|| format!("failed to clean up module '{}'", name))?;
        debug!(target: "strand::module", module = name, "module removed");
        Ok(true)
    }

    /// Mark the handler map stale.
    #[inline]
    pub fn invalidate(&mut self) {
        self.dirty = true;
        self.generation += 1;
    }

    /// Bumped on every change to the module set.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn rebuild(&mut self) {
        self.handlers.clear();
        // Later modules overwrite earlier ones: the newest library wins.
        for (index, loaded) in self.modules.iter().enumerate() {
            if !loaded.module.is_library() {
                continue;
            }
            for handler in loaded.module.handler_names() {
                self.handlers.insert(
                    fold_key(handler),
                    HandlerRoute {
                        module: ModuleId(index),
                        handler: handler.to_owned(),
                    },
                );
            }
        }
        self.dirty = false;
        debug!(
            target: "strand::module",
            modules = self.modules.len(),
            handlers = self.handlers.len(),
            "rebuilt handler map"
        );
    }

    /// Resolve a handler name to the module that provides it.
    pub fn lookup(&mut self, handler: &str) -> Option<ModuleId> {
        if self.dirty {
            self.rebuild();
        }
        self.handlers.get(&fold_key(handler)).map(|route| route.module)
    }

    pub fn module(&self, id: ModuleId) -> Option<&dyn ExtensionModule> {
        self.modules.get(id.0).map(|m| m.module.as_ref())
    }

    pub fn module_mut(&mut self, id: ModuleId) -> Option<&mut dyn ExtensionModule> {
        match self.modules.get_mut(id.0) {
            Some(m) => Some(m.module.as_mut()),
            None => None,
        }
    }

    pub fn find_module(&self, name: &str) -> Option<&dyn ExtensionModule> {
        self.modules
            .iter()
            .rev()
            .find(|m| m.module.name().eq_ignore_ascii_case(name))
            .map(|m| m.module.as_ref())
    }

    pub fn source_of(&self, id: ModuleId) -> Option<&str> {
        self.modules.get(id.0).map(|m| m.source.as_str())
    }

    pub fn module_names(&self) -> Vec<&str> {
        self.modules.iter().map(|m| m.module.name()).collect()
    }

    /// Every resolvable handler with the module providing it, sorted by
    /// handler name.
    pub fn handler_names(&mut self) -> Vec<(String, String)> {
        if self.dirty {
            self.rebuild();
        }
        let mut out: Vec<(String, String)> = self
            .handlers
            .values()
            .map(|route| (route.handler.clone(), self.modules[route.module.0].module.name().to_owned()))
            .collect();
        out.sort();
        out
    }
}
