use std::sync::Arc;

use crate::config::PageSettings;
use crate::controller::DataViewController;

#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<DataViewController>,
    pub page: Arc<PageSettings>,
}

impl AppState {
    pub fn new(controller: Arc<DataViewController>, page: PageSettings) -> Self {
        Self {
            controller,
            page: Arc::new(page),
        }
    }
}
