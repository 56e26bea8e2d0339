use std::sync::Arc;

use shared::{
    domain::{CweId, FilterSet, MisuseCaseId},
    error::RequestFailed,
    protocol::{Fragment, FragmentRequest, HttpMethod},
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub mod markup;
pub mod surface;
pub mod transport;

pub use markup::{MarkupVariant, ModalTrigger};
pub use surface::{Container, PageSurface};
pub use transport::{FragmentTransport, HttpFragmentTransport};

/// Text in front of every failure alert; the transport's error text follows on the next line.
///
/// Kept word for word as the catalog pages have always shown it, "and error" included.
pub const ALERT_PREFIX: &str = "Oops! We have encountered and error \n";

pub fn alert_message(err: &RequestFailed) -> String {
    format!("{ALERT_PREFIX}{}", err.message)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerOptions {
    pub markup: MarkupVariant,
    /// `usecases/` is POST on current pages and GET on legacy ones.
    pub detail_method: HttpMethod,
    /// Skip the detail reload when the clicked entry is already selected.
    pub reselect_guard: bool,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            markup: MarkupVariant::Current,
            detail_method: HttpMethod::Post,
            reselect_guard: true,
        }
    }
}

impl ControllerOptions {
    /// Behaviour of the first-generation catalog pages.
    pub fn legacy() -> Self {
        Self {
            markup: MarkupVariant::Legacy,
            detail_method: HttpMethod::Get,
            reselect_guard: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionState {
    Empty,
    Loaded(MisuseCaseId),
}

/// Activation of the refresh control, carrying the multi-select's current value.
#[derive(Debug, Clone, Default)]
pub struct FilterRefreshEvent {
    selection: Option<Vec<CweId>>,
    default_prevented: bool,
}

impl FilterRefreshEvent {
    pub fn new(selection: Option<Vec<CweId>>) -> Self {
        Self {
            selection,
            default_prevented: false,
        }
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Hosts must not navigate when this is set.
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

#[derive(Debug, Default)]
struct ControllerState {
    entries: Vec<MisuseCaseId>,
    selected: Option<MisuseCaseId>,
}

/// Keeps the misuse-case list and the use-case panel consistent with filter and selection
/// changes, and fills the report-issue modal on demand.
///
/// The state lock is never held across a request. Overlapping operations race and the
/// response that arrives last is the one left mounted.
pub struct SelectionController {
    transport: Arc<dyn FragmentTransport>,
    surface: Arc<dyn PageSurface>,
    options: ControllerOptions,
    inner: Mutex<ControllerState>,
}

impl SelectionController {
    pub fn new(
        transport: Arc<dyn FragmentTransport>,
        surface: Arc<dyn PageSurface>,
        options: ControllerOptions,
    ) -> Arc<Self> {
        Arc::new(Self {
            transport,
            surface,
            options,
            inner: Mutex::new(ControllerState::default()),
        })
    }

    pub async fn state(&self) -> SelectionState {
        match &self.inner.lock().await.selected {
            Some(id) => SelectionState::Loaded(id.clone()),
            None => SelectionState::Empty,
        }
    }

    pub async fn entries(&self) -> Vec<MisuseCaseId> {
        self.inner.lock().await.entries.clone()
    }

    /// Page load: list every misuse case.
    pub async fn initialize(&self) -> Result<(), RequestFailed> {
        info!("loading misuse case list");
        self.refresh_item_list(FilterSet::empty()).await
    }

    pub async fn on_item_selected(&self, id: MisuseCaseId) -> Result<(), RequestFailed> {
        {
            let mut inner = self.inner.lock().await;
            if self.options.reselect_guard && inner.selected.as_ref() == Some(&id) {
                debug!(misuse_case_id = %id, "entry already selected");
                return Ok(());
            }
            if !inner.entries.contains(&id) {
                debug!(misuse_case_id = %id, "selected entry is not in the mounted list");
            }
            let previous = inner.selected.replace(id.clone());
            self.surface.mark_selected(previous.as_ref(), Some(&id));
        }
        self.load_detail(&id).await
    }

    pub async fn on_filter_refresh(
        &self,
        event: &mut FilterRefreshEvent,
    ) -> Result<(), RequestFailed> {
        event.prevent_default();
        let filter = FilterSet::from_selection(event.selection.clone());
        debug!(
            trigger = markup::REFRESH_BUTTON_SELECTOR,
            control = markup::CWE_SELECT_SELECTOR,
            cwe_count = filter.ids().len(),
            "refreshing misuse case list"
        );
        self.refresh_item_list(filter).await
    }

    /// Replaces the list, selects its first entry and loads that entry's use cases.
    ///
    /// An empty result leaves nothing selected and clears the use-case panel.
    pub async fn refresh_item_list(&self, filter: FilterSet) -> Result<(), RequestFailed> {
        let request = FragmentRequest::misuse_cases(filter.into_ids());
        let fragment = self.fetch_or_alert(&request).await?;
        let entries = markup::parse_entries(&fragment, self.options.markup);

        let first = {
            let mut inner = self.inner.lock().await;
            self.surface.mount(Container::ItemList, &fragment);
            inner.entries = entries;
            inner.selected = inner.entries.first().cloned();
            if let Some(first) = &inner.selected {
                self.surface.mark_selected(None, Some(first));
            }
            inner.selected.clone()
        };

        match first {
            Some(id) => self.load_detail(&id).await,
            None => {
                debug!("misuse case list is empty");
                self.surface.mount(Container::Detail, &Fragment::empty());
                Ok(())
            }
        }
    }

    pub async fn load_detail(&self, id: &MisuseCaseId) -> Result<(), RequestFailed> {
        let request = FragmentRequest::use_cases(id.clone(), self.options.detail_method);
        let fragment = self.fetch_or_alert(&request).await?;
        self.surface.mount(Container::Detail, &fragment);
        debug!(misuse_case_id = %id, "use cases mounted");
        Ok(())
    }

    pub async fn on_modal_open(&self, trigger: &ModalTrigger) -> Result<(), RequestFailed> {
        let request = FragmentRequest::report_issue_form(
            trigger.ajax_url.clone(),
            trigger.usecase_id.clone(),
        );
        let fragment = self.fetch_or_alert(&request).await?;
        self.surface.mount(Container::Modal, &fragment);
        debug!(usecase_id = %trigger.usecase_id, "report form mounted");
        Ok(())
    }

    async fn fetch_or_alert(&self, request: &FragmentRequest) -> Result<Fragment, RequestFailed> {
        match self.transport.fetch(request).await {
            Ok(fragment) => Ok(fragment),
            Err(err) => {
                warn!(url = %err.url, error = %err.message, "fragment request failed");
                self.surface.alert(&alert_message(&err));
                Err(err)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
