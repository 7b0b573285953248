use std::sync::Arc;

use service::cart::CartStore;
use service::catalog::FileCatalog;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub cart: Arc<CartStore>,
    /// Present when this server also hosts the catalog fixture.
    pub local_catalog: Option<Arc<FileCatalog>>,
}
