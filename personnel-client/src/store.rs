use std::collections::{HashSet, VecDeque};
use std::time::{Duration, Instant};

use crate::api::{
    ApiError, ApiResult, DirectoryApi, EmployeeDetail, EmployeeId, EmployeeInput, EmployeeSummary,
    Position, PositionId, PositionInput,
};
use crate::notify::{Notification, describe_api_error};
use crate::timer::DeadlineTimer;

pub const PAGE_SIZE: usize = 6;
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(300);
pub const DELETE_CONFIRM_WINDOW: Duration = Duration::from_secs(3);

const POSITION_NAME_UNASSIGNED: &str = "No asignado";

/// An employee as the UI sees it: the server row plus the locally tracked
/// `position_id`. Rows loaded from the summary list don't carry the id on the
/// wire, so it is resolved from the positions collection where the name is
/// unambiguous and refined as the row is edited.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeRow {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub position_id: Option<PositionId>,
    pub position_name: String,
    pub department: String,
    pub salary: f64,
    pub birth_date: chrono::NaiveDate,
}

impl From<EmployeeDetail> for EmployeeRow {
    fn from(value: EmployeeDetail) -> Self {
        Self {
            id: value.id,
            first_name: value.first_name,
            last_name: value.last_name,
            position_id: Some(value.position_id),
            position_name: value.position_name,
            department: value.department,
            salary: value.salary,
            birth_date: value.birth_date,
        }
    }
}

/// Which form, if any, is open, and which record it edits (`None` = create).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Editor {
    #[default]
    Closed,
    EmployeeForm {
        editing: Option<EmployeeId>,
    },
    PositionForm {
        editing: Option<PositionId>,
    },
}

/// Key of the in-flight guard: at most one save/delete may be outstanding per
/// entity at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKey {
    NewEmployee,
    Employee(EmployeeId),
    NewPosition,
    Position(PositionId),
}

/// Outcome of a delete-button click on an employee row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteClick {
    /// First click: the row is now pending confirmation.
    Armed,
    /// Second click on the same row inside the window: go ahead.
    Confirmed,
}

/// The whole client-side state machine. All transitions run on one logical
/// thread; async methods call the service between two pure transitions
/// (`begin_*` / `finish_*`), so every state change stays unit-testable
/// without a runtime.
pub struct DirectoryStore {
    employees: Vec<EmployeeRow>,
    positions: Vec<Position>,
    loading: bool,
    load_error: Option<String>,

    search_term: String,
    debounced_search_term: String,
    current_page: usize,

    pending_save: bool,
    editor: Editor,
    last_error: Option<ApiError>,

    confirming_delete: Option<EmployeeId>,
    in_flight: HashSet<EntityKey>,

    debounce: DeadlineTimer,
    confirm_expiry: DeadlineTimer,

    notifications: VecDeque<Notification>,
}

impl Default for DirectoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectoryStore {
    pub fn new() -> Self {
        Self {
            employees: Vec::new(),
            positions: Vec::new(),
            loading: true,
            load_error: None,
            search_term: String::new(),
            debounced_search_term: String::new(),
            current_page: 1,
            pending_save: false,
            editor: Editor::Closed,
            last_error: None,
            confirming_delete: None,
            in_flight: HashSet::new(),
            debounce: DeadlineTimer::new(),
            confirm_expiry: DeadlineTimer::new(),
            notifications: VecDeque::new(),
        }
    }

    // ------------------------------------------------------------------
    // Initial load
    // ------------------------------------------------------------------

    /// Fetches both collections in parallel, mirroring the original page
    /// bootstrap.
    pub async fn load(&mut self, api: &dyn DirectoryApi) {
        self.loading = true;
        let (employees, positions) =
            futures::join!(api.list_employees(), api.list_positions());
        match (employees, positions) {
            (Ok(employees), Ok(positions)) => self.load_succeeded(employees, positions),
            (Err(error), _) | (_, Err(error)) => self.load_failed(&error),
        }
    }

    pub fn load_succeeded(
        &mut self,
        employees: Vec<EmployeeSummary>,
        positions: Vec<Position>,
    ) {
        self.employees = employees
            .into_iter()
            .map(|summary| {
                let position_id = resolve_position_id(&positions, &summary.position_name);
                EmployeeRow {
                    id: summary.id,
                    first_name: summary.first_name,
                    last_name: summary.last_name,
                    position_id,
                    position_name: summary.position_name,
                    department: summary.department,
                    salary: summary.salary,
                    birth_date: summary.birth_date,
                }
            })
            .collect();
        self.positions = positions;
        self.loading = false;
        self.load_error = None;
    }

    pub fn load_failed(&mut self, error: &ApiError) {
        self.employees.clear();
        self.positions.clear();
        self.loading = false;
        self.load_error = Some(describe_api_error("No se pudieron cargar los datos.", error));
    }

    // ------------------------------------------------------------------
    // Search, filter, pagination
    // ------------------------------------------------------------------

    /// Echoes the keystroke immediately; the filter itself only re-evaluates
    /// once the debounce window has been quiet.
    pub fn set_search_term(&mut self, term: impl Into<String>, now: Instant) {
        self.search_term = term.into();
        self.debounce.schedule(now, DEBOUNCE_WINDOW);
    }

    /// Drives both store-owned timers. The UI calls this when the earliest
    /// deadline from [`next_deadline`](Self::next_deadline) elapses.
    pub fn on_tick(&mut self, now: Instant) {
        if self.debounce.fire_if_due(now) && self.debounced_search_term != self.search_term {
            self.debounced_search_term = self.search_term.clone();
            self.current_page = 1;
        }
        if self.confirm_expiry.fire_if_due(now) {
            self.confirming_delete = None;
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.debounce.deadline(), self.confirm_expiry.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (deadline, None) | (None, deadline) => deadline,
        }
    }

    pub fn is_searching(&self) -> bool {
        self.search_term != self.debounced_search_term
    }

    /// Case-insensitive substring match over first name, last name,
    /// department, and position display name; the empty term matches all.
    pub fn filtered_employees(&self) -> Vec<&EmployeeRow> {
        let term = self.debounced_search_term.to_lowercase();
        self.employees
            .iter()
            .filter(|row| {
                term.is_empty()
                    || row.first_name.to_lowercase().contains(&term)
                    || row.last_name.to_lowercase().contains(&term)
                    || row.department.to_lowercase().contains(&term)
                    || row.position_name.to_lowercase().contains(&term)
            })
            .collect()
    }

    pub fn total_pages(&self) -> usize {
        self.filtered_employees().len().div_ceil(PAGE_SIZE)
    }

    /// The slice of filtered rows for the current page.
    pub fn visible_employees(&self) -> Vec<&EmployeeRow> {
        self.filtered_employees()
            .into_iter()
            .skip((self.current_page - 1) * PAGE_SIZE)
            .take(PAGE_SIZE)
            .collect()
    }

    pub fn set_page(&mut self, page: usize) {
        if page >= 1 && page <= self.total_pages() {
            self.current_page = page;
        }
    }

    fn step_back_if_page_empty(&mut self) {
        if self.current_page > 1 && self.visible_employees().is_empty() {
            self.current_page -= 1;
        }
    }

    // ------------------------------------------------------------------
    // Forms
    // ------------------------------------------------------------------

    pub fn open_add_employee(&mut self) {
        self.editor = Editor::EmployeeForm { editing: None };
        self.last_error = None;
    }

    pub fn open_edit_employee(&mut self, id: EmployeeId) {
        self.editor = Editor::EmployeeForm { editing: Some(id) };
        self.last_error = None;
    }

    pub fn open_add_position(&mut self) {
        self.editor = Editor::PositionForm { editing: None };
        self.last_error = None;
    }

    pub fn open_edit_position(&mut self, id: PositionId) {
        self.editor = Editor::PositionForm { editing: Some(id) };
        self.last_error = None;
    }

    pub fn close_form(&mut self) {
        self.editor = Editor::Closed;
        self.last_error = None;
    }

    // ------------------------------------------------------------------
    // Employee save
    // ------------------------------------------------------------------

    /// Create or update depending on the open form. Rejected outright when a
    /// save/delete for the same entity is already in flight.
    pub async fn save_employee(&mut self, api: &dyn DirectoryApi, input: EmployeeInput) {
        let editing = match self.editor {
            Editor::EmployeeForm { editing } => editing,
            _ => None,
        };
        match editing {
            Some(id) => {
                if !self.begin_save(EntityKey::Employee(id)) {
                    return;
                }
                let result = api.update_employee(id, &input).await;
                self.finish_employee_update(id, input, result);
            }
            None => {
                if !self.begin_save(EntityKey::NewEmployee) {
                    return;
                }
                let result = api.create_employee(&input).await;
                self.finish_employee_create(result);
            }
        }
    }

    pub fn begin_save(&mut self, key: EntityKey) -> bool {
        if !self.in_flight.insert(key) {
            self.notifications.push_back(Notification::error(
                "Hay una operación en curso para este registro.",
            ));
            return false;
        }
        self.pending_save = true;
        true
    }

    pub fn finish_employee_create(&mut self, result: ApiResult<EmployeeDetail>) {
        // A response for a request this store no longer tracks is ignorable.
        if !self.in_flight.remove(&EntityKey::NewEmployee) {
            return;
        }
        self.pending_save = false;

        match result {
            Ok(detail) => {
                self.employees.push(EmployeeRow::from(detail));
                self.editor = Editor::Closed;
                self.last_error = None;
                self.notifications
                    .push_back(Notification::success("Empleado creado correctamente"));
            }
            Err(error) => self.save_failed("Error al crear el empleado.", error),
        }
    }

    /// The 204 update response carries no body, so the denormalized position
    /// name is re-resolved from the local positions collection before the
    /// merge.
    pub fn finish_employee_update(
        &mut self,
        id: EmployeeId,
        input: EmployeeInput,
        result: ApiResult<()>,
    ) {
        if !self.in_flight.remove(&EntityKey::Employee(id)) {
            return;
        }
        self.pending_save = false;

        match result {
            Ok(()) => {
                let position_name = self
                    .positions
                    .iter()
                    .find(|position| position.id == input.position_id)
                    .map_or_else(
                        || POSITION_NAME_UNASSIGNED.to_string(),
                        |position| position.name.clone(),
                    );
                if let Some(row) = self.employees.iter_mut().find(|row| row.id == id) {
                    row.first_name = input.first_name;
                    row.last_name = input.last_name;
                    row.position_id = Some(input.position_id);
                    row.position_name = position_name;
                    row.department = input.department;
                    row.salary = input.salary;
                    row.birth_date = input.birth_date;
                }
                self.editor = Editor::Closed;
                self.last_error = None;
                self.notifications
                    .push_back(Notification::success("Empleado actualizado correctamente"));
            }
            Err(error) => self.save_failed("Error al actualizar el empleado.", error),
        }
    }

    /// Failure path shared by every save: local entities stay untouched, the
    /// form stays open, and the error is kept for the form to render.
    fn save_failed(&mut self, context: &str, error: ApiError) {
        self.notifications.push_back(Notification::error(context));
        self.last_error = Some(error);
    }

    // ------------------------------------------------------------------
    // Employee delete (two-click confirmation)
    // ------------------------------------------------------------------

    /// First click arms the row for `DELETE_CONFIRM_WINDOW`; a click on a
    /// different row re-arms that row instead, dropping the previous one.
    pub fn arm_or_confirm_delete(&mut self, id: EmployeeId, now: Instant) -> DeleteClick {
        if self.confirming_delete == Some(id) {
            self.confirming_delete = None;
            self.confirm_expiry.cancel();
            DeleteClick::Confirmed
        } else {
            self.confirming_delete = Some(id);
            self.confirm_expiry.schedule(now, DELETE_CONFIRM_WINDOW);
            DeleteClick::Armed
        }
    }

    pub fn confirming_delete(&self) -> Option<EmployeeId> {
        self.confirming_delete
    }

    /// Full click handler: arms on the first click, deletes on the second.
    pub async fn delete_employee(&mut self, api: &dyn DirectoryApi, id: EmployeeId, now: Instant) {
        if self.arm_or_confirm_delete(id, now) == DeleteClick::Armed {
            return;
        }
        if !self.begin_delete(EntityKey::Employee(id)) {
            return;
        }
        let result = api.delete_employee(id).await;
        self.finish_employee_delete(id, result);
    }

    pub fn begin_delete(&mut self, key: EntityKey) -> bool {
        if !self.in_flight.insert(key) {
            self.notifications.push_back(Notification::error(
                "Hay una operación en curso para este registro.",
            ));
            return false;
        }
        true
    }

    pub fn finish_employee_delete(&mut self, id: EmployeeId, result: ApiResult<()>) {
        if !self.in_flight.remove(&EntityKey::Employee(id)) {
            return;
        }

        match result {
            Ok(()) => {
                self.employees.retain(|row| row.id != id);
                self.step_back_if_page_empty();
                self.notifications
                    .push_back(Notification::success("Empleado eliminado con éxito"));
            }
            Err(error) => {
                let message = describe_api_error(
                    "Error al eliminar el empleado. Inténtalo de nuevo.",
                    &error,
                );
                self.notifications.push_back(Notification::error(message));
            }
        }
    }

    // ------------------------------------------------------------------
    // Position save / delete
    // ------------------------------------------------------------------

    pub async fn save_position(&mut self, api: &dyn DirectoryApi, input: PositionInput) {
        let editing = match self.editor {
            Editor::PositionForm { editing } => editing,
            _ => None,
        };
        match editing {
            Some(id) => {
                if !self.begin_save(EntityKey::Position(id)) {
                    return;
                }
                let result = api.update_position(id, &input).await;
                self.finish_position_update(id, input, result);
            }
            None => {
                if !self.begin_save(EntityKey::NewPosition) {
                    return;
                }
                let result = api.create_position(&input).await;
                self.finish_position_create(result);
            }
        }
    }

    pub fn finish_position_create(&mut self, result: ApiResult<Position>) {
        if !self.in_flight.remove(&EntityKey::NewPosition) {
            return;
        }
        self.pending_save = false;

        match result {
            Ok(position) => {
                self.positions.push(position);
                self.editor = Editor::Closed;
                self.last_error = None;
                self.notifications
                    .push_back(Notification::success("Puesto creado correctamente"));
            }
            Err(error) => self.save_failed("Error al crear el puesto.", error),
        }
    }

    /// On success the rename is propagated to every employee row referencing
    /// this position, so the table never shows a stale name without a
    /// re-fetch.
    pub fn finish_position_update(
        &mut self,
        id: PositionId,
        input: PositionInput,
        result: ApiResult<()>,
    ) {
        if !self.in_flight.remove(&EntityKey::Position(id)) {
            return;
        }
        self.pending_save = false;

        match result {
            Ok(()) => {
                if let Some(position) = self.positions.iter_mut().find(|p| p.id == id) {
                    position.name = input.name.clone();
                    position.description = input.description.clone();
                }
                for row in self
                    .employees
                    .iter_mut()
                    .filter(|row| row.position_id == Some(id))
                {
                    row.position_name = input.name.clone();
                }
                self.editor = Editor::Closed;
                self.last_error = None;
                self.notifications
                    .push_back(Notification::success("Puesto actualizado correctamente"));
            }
            Err(error) => self.save_failed("Error al actualizar el puesto.", error),
        }
    }

    /// Short-circuits on a local reference scan before asking the server; the
    /// server-side guard stays authoritative and reports the same conflict
    /// class.
    pub async fn delete_position(&mut self, api: &dyn DirectoryApi, id: PositionId) {
        if let Some(row) = self
            .employees
            .iter()
            .find(|row| row.position_id == Some(id))
        {
            self.notifications.push_back(Notification::error(format!(
                "No se puede eliminar. El puesto está asignado a {}.",
                row.first_name
            )));
            return;
        }
        if !self.begin_delete(EntityKey::Position(id)) {
            return;
        }
        let result = api.delete_position(id).await;
        self.finish_position_delete(id, result);
    }

    pub fn finish_position_delete(&mut self, id: PositionId, result: ApiResult<()>) {
        if !self.in_flight.remove(&EntityKey::Position(id)) {
            return;
        }

        match result {
            Ok(()) => {
                self.positions.retain(|position| position.id != id);
                self.notifications
                    .push_back(Notification::success("Puesto eliminado con éxito"));
            }
            Err(error) => {
                let message = describe_api_error(
                    "Error al eliminar el puesto. Inténtalo de nuevo.",
                    &error,
                );
                self.notifications.push_back(Notification::error(message));
            }
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn employees(&self) -> &[EmployeeRow] {
        &self.employees
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn debounced_search_term(&self) -> &str {
        &self.debounced_search_term
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn pending_save(&self) -> bool {
        self.pending_save
    }

    pub fn editor(&self) -> Editor {
        self.editor
    }

    pub fn last_error(&self) -> Option<&ApiError> {
        self.last_error.as_ref()
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }

    /// Forgets pending work, e.g. when the user navigates away. Responses for
    /// requests issued before the reset are ignored when they land.
    pub fn reset_pending(&mut self) {
        self.in_flight.clear();
        self.pending_save = false;
        self.confirming_delete = None;
        self.confirm_expiry.cancel();
    }
}

/// Summary rows don't carry the position id on the wire; recover it from the
/// positions collection when the display name maps to exactly one position.
fn resolve_position_id(positions: &[Position], name: &str) -> Option<PositionId> {
    let mut matches = positions.iter().filter(|position| position.name == name);
    match (matches.next(), matches.next()) {
        (Some(position), None) => Some(position.id),
        _ => None,
    }
}
