//! In-memory loader backed by a registration-time metadata table.
//!
//! Useful when class metadata comes from a build step rather than from class
//! files on disk, and for observing exactly which classes a scan loads.

use crate::error::LoadResult;
use crate::loader::{ClassLoader, HeaderSource, Linker};
use crate::model::{ClassHeader, ClassRef};
use std::collections::HashMap;
use std::sync::Mutex;
use url::Url;

type Initializer = Box<dyn Fn() + Send + Sync>;

pub struct RegistryLoader {
    headers: HashMap<String, ClassHeader>,
    resources: HashMap<String, Vec<Url>>,
    initializers: HashMap<String, Initializer>,
    linker: Linker,
    loads: Mutex<Vec<String>>,
    initializations: Mutex<Vec<String>>,
}

impl RegistryLoader {
    pub fn new() -> Self {
        Self {
            headers: HashMap::new(),
            resources: HashMap::new(),
            initializers: HashMap::new(),
            linker: Linker::new(),
            loads: Mutex::new(Vec::new()),
            initializations: Mutex::new(Vec::new()),
        }
    }

    /// Registers a class. A later registration under the same name replaces the earlier one.
    pub fn register(mut self, header: ClassHeader) -> Self {
        self.headers.insert(header.name.clone(), header);
        self
    }

    /// Registers several classes.
    pub fn with_classes(mut self, headers: impl IntoIterator<Item = ClassHeader>) -> Self {
        for header in headers {
            self.headers.insert(header.name.clone(), header);
        }
        self
    }

    /// Adds a location for the slash-separated resource `path`. Locations are
    /// returned in registration order.
    pub fn with_resource(mut self, path: impl Into<String>, location: Url) -> Self {
        self.resources.entry(path.into()).or_default().push(location);
        self
    }

    /// Runs `hook` when `name` is initialized.
    pub fn on_initialize(
        mut self,
        name: impl Into<String>,
        hook: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        self.initializers.insert(name.into(), Box::new(hook));
        self
    }

    /// Names passed to [`ClassLoader::load_class`], in call order.
    pub fn loaded(&self) -> Vec<String> {
        lock(&self.loads).clone()
    }

    /// Classes initialized so far, in initialization order.
    pub fn initialized(&self) -> Vec<String> {
        lock(&self.initializations).clone()
    }

    pub fn is_initialized(&self, name: &str) -> bool {
        self.linker.is_initialized(name)
    }
}

impl Default for RegistryLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RegistryLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryLoader")
            .field("classes", &self.headers.len())
            .field("resources", &self.resources)
            .finish()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl HeaderSource for RegistryLoader {
    fn find_header(&self, name: &str) -> LoadResult<Option<ClassHeader>> {
        Ok(self.headers.get(name).cloned())
    }
}

impl ClassLoader for RegistryLoader {
    fn resources(&self, path: &str) -> Vec<Url> {
        self.resources.get(path).cloned().unwrap_or_default()
    }

    fn load_class(&self, name: &str) -> LoadResult<ClassRef> {
        lock(&self.loads).push(name.to_string());
        self.linker.load(self, name)
    }

    fn initialize_class(&self, name: &str) -> LoadResult<ClassRef> {
        self.linker.initialize(self, name, &mut |class| {
            lock(&self.initializations).push(class.name().to_string());
            if let Some(hook) = self.initializers.get(class.name()) {
                hook();
            }
        })
    }
}
