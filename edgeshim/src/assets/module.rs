//! Executable module records.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A loadable module registered under a logical path.
///
/// The exports are type-erased; whoever registered the module knows the
/// concrete type and gets it back with [`ModuleRecord::exports`]. Cloning is
/// cheap and shares the same exports.
#[derive(Clone)]
pub struct ModuleRecord {
    path: String,
    exports: Arc<dyn Any + Send + Sync>,
}

impl ModuleRecord {
    pub fn new<T: Any + Send + Sync>(path: impl Into<String>, exports: T) -> Self {
        Self {
            path: path.into(),
            exports: Arc::new(exports),
        }
    }

    /// Logical path this module was registered under.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Borrow the exports as `T`, or `None` if they are some other type.
    pub fn exports<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.exports.downcast_ref::<T>()
    }

    pub fn exports_are<T: Any + Send + Sync>(&self) -> bool {
        self.exports.is::<T>()
    }

    /// Same record under another path (used when a probe suffix matched).
    pub(crate) fn with_path(&self, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            exports: Arc::clone(&self.exports),
        }
    }
}

impl fmt::Debug for ModuleRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleRecord")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
