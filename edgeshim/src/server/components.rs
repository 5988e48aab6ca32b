//! Loaded modules for one page.

use crate::assets::ModuleRecord;
use crate::resolver::LoadedPage;

/// The page plus the shared document and app modules it renders inside.
#[derive(Debug, Clone)]
pub struct PageComponents {
    /// Candidate path that matched, e.g. `/fr/blog` or `/blog.amp`
    pub page: String,
    pub component: LoadedPage,
    pub document: Option<ModuleRecord>,
    pub app: Option<ModuleRecord>,
    pub is_app_path: bool,
}

impl PageComponents {
    /// Prerendered HTML, if the page is static.
    pub fn static_html(&self) -> Option<&str> {
        match &self.component {
            LoadedPage::Static(html) => Some(html),
            LoadedPage::Module(_) => None,
        }
    }

    pub fn module(&self) -> Option<&ModuleRecord> {
        match &self.component {
            LoadedPage::Module(module) => Some(module),
            LoadedPage::Static(_) => None,
        }
    }
}
