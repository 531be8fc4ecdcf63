//! Headless list-screen controller
//!
//! A [`ListScreen`] owns everything one dashboard list page needs: the
//! filter/sort/page state, the loaded records, the load state and the toast
//! queue. It holds no business logic of its own; every change is routed
//! through the [`ListPipeline`], the [`EntityService`] or the [`Exporter`].
//!
//! # Example
//!
//! ```rust,ignore
//! let mut screen = ListScreen::new(Order::descriptor(), service)
//!     .with_exporter(Order::export_columns());
//! screen.load().await?;
//! screen.set_tab("new");
//! screen.toggle_sort("price");
//! let view = screen.view();
//! ```

use crate::core::comparator::SortSpec;
use crate::core::entity::Entity;
use crate::core::error::{DashboardError, Result};
use crate::core::notice::{LoadState, Notice, NoticeDurations};
use crate::core::pipeline::{ListDescriptor, ListPipeline, ListView};
use crate::core::query::ListQuery;
use crate::core::service::EntityService;
use crate::core::validation::{FormModel, prepare};
use crate::export::{ExportColumns, ExportFile, ExportFormat, Exporter};
use chrono::NaiveDate;
use serde_json::Value;
use std::marker::PhantomData;
use uuid::Uuid;

/// State and actions of one list page
pub struct ListScreen<R, S> {
    service: S,
    pipeline: ListPipeline,
    query: ListQuery,
    records: Vec<R>,
    state: LoadState,
    notices: Vec<Notice>,
    durations: NoticeDurations,
    exporter: Exporter,
    _marker: PhantomData<fn() -> R>,
}

impl<R, S> ListScreen<R, S>
where
    R: Entity,
    S: EntityService<R>,
{
    pub fn new(descriptor: ListDescriptor, service: S) -> Self {
        let query = descriptor.initial_query();
        let exporter = Exporter::new(descriptor.entity.clone(), default_columns::<R>());
        Self {
            service,
            pipeline: ListPipeline::new(descriptor),
            query,
            records: Vec::new(),
            state: LoadState::Idle,
            notices: Vec::new(),
            durations: NoticeDurations::default(),
            exporter,
            _marker: PhantomData,
        }
    }

    pub fn with_notice_durations(mut self, durations: NoticeDurations) -> Self {
        self.durations = durations;
        self
    }

    pub fn with_exporter(mut self, columns: ExportColumns) -> Self {
        self.exporter = Exporter::new(self.pipeline.descriptor().entity.clone(), columns);
        self
    }

    pub fn descriptor(&self) -> &ListDescriptor {
        self.pipeline.descriptor()
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Fetch the records; a failure is kept as [`LoadState::Failed`]
    pub async fn load(&mut self) -> Result<()> {
        self.state = LoadState::Loading;
        match self.service.list().await {
            Ok(records) => {
                tracing::debug!(entity = R::resource_name(), count = records.len(), "screen loaded");
                self.records = records;
                self.state = LoadState::Ready;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(entity = R::resource_name(), error = %e, "screen failed to load");
                self.state = LoadState::Failed(e.to_string());
                self.notices.push(e.to_notice(&self.durations));
                Err(e)
            }
        }
    }

    /// Explicit retry after a failed load or a stale cache
    pub async fn reload(&mut self) -> Result<()> {
        self.load().await
    }

    // ------------------------------------------------------------------
    // Filter / sort / page state
    // ------------------------------------------------------------------

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.query.search = search.into();
        self.query.page = 1;
    }

    /// Set an enum selection; [`ALL`](crate::core::ALL) clears it
    pub fn select(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.query.selections.insert(field.into(), value.into());
        self.query.page = 1;
    }

    pub fn set_date_range(
        &mut self,
        field: impl Into<String>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) {
        self.query = std::mem::take(&mut self.query).with_date_range(field, from, to);
        self.query.page = 1;
    }

    pub fn clear_date_range(&mut self) {
        self.query.date_range = None;
        self.query.page = 1;
    }

    pub fn set_tab(&mut self, tab: impl Into<String>) {
        self.query.tab = Some(tab.into());
        self.query.page = 1;
    }

    /// Same field flips the direction, a new field starts ascending
    pub fn toggle_sort(&mut self, field: &str) {
        self.query.sort = Some(SortSpec::toggle(self.query.sort.as_ref(), field));
    }

    pub fn set_page(&mut self, page: usize) {
        self.query.page = page.max(1);
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.query.page_size = page_size;
        self.query.page = 1;
    }

    /// Back to the descriptor's initial state, keeping the page size
    pub fn reset_filters(&mut self) {
        let page_size = self.query.page_size;
        self.query = self.descriptor().initial_query();
        self.query.page_size = page_size;
    }

    /// Run the pipeline over the loaded records
    pub fn view(&self) -> ListView<R> {
        self.pipeline.run(&self.records, &self.query)
    }

    // ------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------

    /// Export the filtered set (every page) in the given format
    pub fn export(&mut self, format: ExportFormat, today: NaiveDate) -> Result<ExportFile> {
        let view = self.view();
        match self.exporter.export(view.filtered(), format, today) {
            Ok(file) => {
                tracing::info!(entity = R::resource_name(), file = %file.filename, rows = view.total(), "exported");
                Ok(file)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    pub async fn create(&mut self, payload: Value) -> Result<R> {
        match self.service.create(payload).await {
            Ok(record) => {
                tracing::info!(entity = R::resource_name(), id = record.id(), "record created");
                self.records.push(record.clone());
                self.succeed(format!("{} created", capitalized(R::resource_name_singular())));
                Ok(record)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    pub async fn update(&mut self, id: &str, payload: Value) -> Result<R> {
        match self.service.update(id, payload).await {
            Ok(record) => {
                tracing::info!(entity = R::resource_name(), id, "record updated");
                match self.records.iter_mut().find(|r| r.id() == id) {
                    Some(slot) => *slot = record.clone(),
                    None => self.records.push(record.clone()),
                }
                self.succeed(format!("{} updated", capitalized(R::resource_name_singular())));
                Ok(record)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    pub async fn delete(&mut self, id: &str) -> Result<()> {
        match self.service.delete(id).await {
            Ok(()) => {
                tracing::info!(entity = R::resource_name(), id, "record deleted");
                self.records.retain(|r| r.id() != id);
                self.succeed(format!("{} deleted", capitalized(R::resource_name_singular())));
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Validate a form and create (`id == None`) or update the record
    ///
    /// Validation failures return the field errors without sending anything
    /// and without raising a notice; the form shows them inline.
    pub async fn submit<F: FormModel>(&mut self, form: &mut F, id: Option<&str>) -> Result<R> {
        let payload = prepare(form)?;
        match id {
            Some(id) => self.update(id, payload).await,
            None => self.create(payload).await,
        }
    }

    // ------------------------------------------------------------------
    // Notices
    // ------------------------------------------------------------------

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Hand the pending notices to the UI
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn dismiss(&mut self, id: Uuid) {
        self.notices.retain(|n| n.id != id);
    }

    fn succeed(&mut self, message: String) {
        self.notices.push(Notice::success(message, &self.durations));
    }

    fn fail(&mut self, error: DashboardError) -> DashboardError {
        tracing::warn!(entity = R::resource_name(), error = %error, "action failed");
        self.notices.push(error.to_notice(&self.durations));
        error
    }
}

/// Every field of the record, headed by its own name
fn default_columns<R: Entity>() -> ExportColumns {
    R::fields()
        .iter()
        .fold(ExportColumns::new(), |columns, field| {
            columns.column(*field, *field)
        })
}

fn capitalized(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
