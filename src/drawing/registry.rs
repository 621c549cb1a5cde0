//! Registry of constructible drawable object types.

use std::collections::HashMap;

use super::{DrawObject, Line};

/// Builds a fresh, default-initialized drawable object
pub type ObjectConstructor = fn() -> Box<dyn DrawObject>;

/// Maps type names (as written to documents) to constructors.
///
/// Owned by the document; callers extend it before handing it over.
#[derive(Clone)]
pub struct ObjectRegistry {
    constructors: HashMap<String, ObjectConstructor>,
}

impl ObjectRegistry {
    /// A registry with no types
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Register (or replace) a type
    pub fn register(&mut self, type_name: impl Into<String>, constructor: ObjectConstructor) {
        self.constructors.insert(type_name.into(), constructor);
    }

    pub fn with(mut self, type_name: impl Into<String>, constructor: ObjectConstructor) -> Self {
        self.register(type_name, constructor);
        self
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.constructors.contains_key(type_name)
    }

    /// Construct a new object, or `None` if the type is not registered
    pub fn create(&self, type_name: &str) -> Option<Box<dyn DrawObject>> {
        self.constructors.get(type_name).map(|construct| construct())
    }

    /// Registered type names, sorted
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for ObjectRegistry {
    /// The built-in shapes
    fn default() -> Self {
        Self::empty().with(Line::OBJECT_TYPE, create_line)
    }
}

fn create_line() -> Box<dyn DrawObject> {
    Box::new(Line::default())
}

impl std::fmt::Debug for ObjectRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectRegistry")
            .field("types", &self.type_names())
            .finish()
    }
}
