//! The single view-state record of a scheduling session.
//!
//! Everything the calendar screen can show lives here: the load outcome,
//! the event list, the calendar view, the file selections, and which panel
//! is open. Only one panel is open at a time, so a form and an event detail
//! can never be up together, and download links exist only while a detail
//! is open.

use std::path::Path;

use chrono::NaiveDate;

use crate::attachments::{AttachmentKind, DownloadLink, DownloadShelf, FileSelections, SelectedFile};
use crate::detail::EventDetail;
use crate::error::{ScheduleError, ScheduleResult};
use crate::event::InterviewEvent;
use crate::form::NewEventForm;
use crate::load_state::LoadState;
use crate::view::{CalendarView, Navigate, ViewMode};

/// An event detail on screen, with its download links.
#[derive(Debug)]
pub struct OpenDetail {
    index: usize,
    detail: EventDetail,
    shelf: DownloadShelf,
}

impl OpenDetail {
    /// Position of the shown event in the event list.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn detail(&self) -> &EventDetail {
        &self.detail
    }

    pub fn download(&self, kind: AttachmentKind) -> Option<&DownloadLink> {
        self.shelf.link(kind)
    }

    pub fn downloads(&self) -> impl Iterator<Item = &DownloadLink> {
        self.shelf.links()
    }
}

#[derive(Debug, Default)]
pub enum Panel {
    #[default]
    Calendar,
    Form(NewEventForm),
    Detail(OpenDetail),
}

#[derive(Debug)]
pub struct SchedulerState {
    load: LoadState,
    events: Vec<InterviewEvent>,
    view: CalendarView,
    panel: Panel,
    files: FileSelections,
}

impl SchedulerState {
    pub fn new(mode: ViewMode, date: NaiveDate) -> Self {
        SchedulerState {
            load: LoadState::Loading,
            events: Vec::new(),
            view: CalendarView::new(mode, date),
            panel: Panel::Calendar,
            files: FileSelections::default(),
        }
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn events(&self) -> &[InterviewEvent] {
        &self.events
    }

    pub fn view(&self) -> &CalendarView {
        &self.view
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    pub fn files(&self) -> &FileSelections {
        &self.files
    }

    /// Record the outcome of the start-up fetch.
    /// Fetched events go ahead of anything created in the meantime.
    pub fn finish_load(&mut self, result: Result<Vec<InterviewEvent>, String>) {
        match result {
            Ok(fetched) => {
                self.load = LoadState::Loaded {
                    count: fetched.len(),
                };
                let shift = fetched.len();
                let local = std::mem::replace(&mut self.events, fetched);
                self.events.extend(local);
                if let Panel::Detail(open) = &mut self.panel {
                    open.index += shift;
                }
            }
            Err(reason) => {
                tracing::error!(%reason, "error fetching calendar events");
                self.load = LoadState::Failed { reason };
            }
        }
    }

    pub fn navigate(&mut self, nav: Navigate, today: NaiveDate) {
        self.view.navigate(nav, today);
    }

    pub fn set_view(&mut self, mode: ViewMode) {
        self.view.set_mode(mode);
    }

    // --- form ---

    /// Show the new-event form, closing any open detail.
    /// An already open form keeps its inputs.
    pub fn open_form(&mut self) {
        if !matches!(self.panel, Panel::Form(_)) {
            self.panel = Panel::Form(NewEventForm::default());
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut NewEventForm> {
        match &mut self.panel {
            Panel::Form(form) => Some(form),
            _ => None,
        }
    }

    pub fn cancel_form(&mut self) {
        if matches!(self.panel, Panel::Form(_)) {
            self.panel = Panel::Calendar;
        }
    }

    /// Append the form's event to the list and hide the form.
    /// Returns the new event's position. On error the form stays open as is.
    pub fn submit_form(&mut self) -> ScheduleResult<usize> {
        let form = self.form_mut().ok_or(ScheduleError::FormClosed)?;
        let event = form.submit()?;

        tracing::debug!(title = %event.title, "created local event");
        self.events.push(event);
        self.panel = Panel::Calendar;
        Ok(self.events.len() - 1)
    }

    // --- detail ---

    /// Show the detail of the event at `index`, closing whatever panel was open.
    ///
    /// Current file selections are staged for download again. A selection
    /// whose file can no longer be copied is dropped; the detail still opens.
    /// On error the previous panel stays as it was.
    pub fn open_event(&mut self, index: usize) -> ScheduleResult<&OpenDetail> {
        let event = self
            .events
            .get(index)
            .ok_or(ScheduleError::EventNotFound(index))?;
        let detail = EventDetail::from_event(event);

        let mut shelf = DownloadShelf::new()?;
        let mut stale = Vec::new();
        for (kind, file) in self.files.iter() {
            if let Err(e) = shelf.stage(kind, file) {
                tracing::warn!(kind = %kind, path = %file.path.display(), error = %e, "dropping file selection");
                stale.push(kind);
            }
        }
        for kind in stale {
            self.files.clear(kind);
        }

        self.panel = Panel::Detail(OpenDetail {
            index,
            detail,
            shelf,
        });
        self.detail().ok_or(ScheduleError::NoEventOpen)
    }

    pub fn detail(&self) -> Option<&OpenDetail> {
        match &self.panel {
            Panel::Detail(open) => Some(open),
            _ => None,
        }
    }

    /// Close the detail. Its download links are released; file selections stay.
    pub fn close_detail(&mut self) {
        if matches!(self.panel, Panel::Detail(_)) {
            self.panel = Panel::Calendar;
        }
    }

    /// Pick a file from the open detail and offer it back for download.
    /// If the file cannot be staged, the previous selection and its link stay.
    pub fn select_file(
        &mut self,
        kind: AttachmentKind,
        path: impl AsRef<Path>,
    ) -> ScheduleResult<&DownloadLink> {
        let Panel::Detail(open) = &mut self.panel else {
            return Err(ScheduleError::NoEventOpen);
        };

        let file = SelectedFile::pick(kind, path)?;
        let link = open.shelf.stage(kind, &file)?;
        if let Some(old) = self.files.set(kind, file) {
            tracing::debug!(kind = %kind, replaced = %old.name, "replaced file selection");
        }
        Ok(link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventId;
    use crate::form::{parse_datetime_local, FormField};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn server_event(id: i64, title: &str) -> InterviewEvent {
        let mut event = InterviewEvent::new(
            title,
            parse_datetime_local("2024-01-02T10:00").unwrap(),
            parse_datetime_local("2024-01-02T11:00").unwrap(),
        );
        event.id = Some(EventId::Number(id));
        event.description = "Interviewer: Geetha B".into();
        event.position = "Test Engineer".into();
        event.created_by = "-".into();
        event
    }

    fn loaded() -> SchedulerState {
        let mut state = SchedulerState::new(ViewMode::Month, today());
        state.finish_load(Ok(vec![server_event(1, "1st Round"), server_event(2, "2nd Round")]));
        state
    }

    #[test]
    fn failed_load_leaves_list_empty() {
        let mut state = SchedulerState::new(ViewMode::Month, today());
        assert!(state.load_state().is_loading());

        state.finish_load(Err("connection refused".into()));

        assert!(state.events().is_empty());
        assert_eq!(state.load_state().failure(), Some("connection refused"));
    }

    #[test]
    fn successful_load_records_count() {
        let state = loaded();
        assert_eq!(state.events().len(), 2);
        assert_eq!(state.load_state(), &LoadState::Loaded { count: 2 });
    }

    #[test]
    fn submitting_the_form_appends_one_event() {
        let mut state = loaded();
        state.open_form();
        let form = state.form_mut().unwrap();
        form.set(FormField::Title, "Sync");
        form.set(FormField::Start, "2024-01-01T10:00");
        form.set(FormField::End, "2024-01-01T11:00");

        let index = state.submit_form().unwrap();

        assert_eq!(state.events().len(), 3);
        assert_eq!(index, 2);
        let event = &state.events()[index];
        assert_eq!(event.title, "Sync");
        assert_eq!(event.start, parse_datetime_local("2024-01-01T10:00").unwrap());
        assert_eq!(event.end, parse_datetime_local("2024-01-01T11:00").unwrap());
        assert!(matches!(state.panel(), Panel::Calendar));

        // Reopening shows empty inputs.
        state.open_form();
        assert!(state.form_mut().unwrap().is_empty());
    }

    #[test]
    fn invalid_submission_keeps_form_open() {
        let mut state = loaded();
        state.open_form();
        state.form_mut().unwrap().set(FormField::Title, "Sync");

        assert!(matches!(
            state.submit_form(),
            Err(ScheduleError::MissingField("Start"))
        ));
        assert_eq!(state.events().len(), 2);
        assert_eq!(state.form_mut().unwrap().title, "Sync");
    }

    #[test]
    fn submit_without_form_is_an_error() {
        let mut state = loaded();
        assert!(matches!(state.submit_form(), Err(ScheduleError::FormClosed)));
    }

    #[test]
    fn opening_an_event_shows_its_detail() {
        let mut state = loaded();
        let open = state.open_event(1).unwrap();

        assert_eq!(open.index(), 1);
        let detail = open.detail();
        assert_eq!(detail.heading, "Interview With: Interviewer: Geetha B");
        assert_eq!(detail.position, "Test Engineer");
        assert_eq!(detail.created_by, "-");
        assert_eq!(detail.time_range, "10:00 am - 11:00 am");

        assert!(matches!(
            state.open_event(9),
            Err(ScheduleError::EventNotFound(9))
        ));
    }

    #[test]
    fn form_and_detail_are_exclusive() {
        let mut state = loaded();
        state.open_event(0).unwrap();
        state.open_form();
        assert!(state.detail().is_none());

        state.open_event(0).unwrap();
        assert!(state.form_mut().is_none());
    }

    #[test]
    fn selecting_a_resume_offers_it_for_download() {
        let tmp = tempfile::tempdir().unwrap();
        let resume = tmp.path().join("candidate.pdf");
        std::fs::write(&resume, "%PDF-1.4").unwrap();

        let mut state = loaded();
        assert!(matches!(
            state.select_file(AttachmentKind::Resume, &resume),
            Err(ScheduleError::NoEventOpen)
        ));

        state.open_event(0).unwrap();
        let link = state.select_file(AttachmentKind::Resume, &resume).unwrap();
        assert_eq!(link.file_name, "candidate.pdf");
        assert_eq!(
            state.files().get(AttachmentKind::Resume).unwrap().name,
            "candidate.pdf"
        );
    }

    #[test]
    fn closing_detail_releases_links_but_keeps_files() {
        let tmp = tempfile::tempdir().unwrap();
        let aadhaar = tmp.path().join("aadhaar.jpg");
        std::fs::write(&aadhaar, "jpeg").unwrap();

        let mut state = loaded();
        state.open_event(0).unwrap();
        let staged = state
            .select_file(AttachmentKind::Aadhaar, &aadhaar)
            .unwrap()
            .staged_path()
            .to_path_buf();
        assert!(staged.exists());

        state.close_detail();
        assert!(state.detail().is_none());
        assert!(!staged.exists());
        assert!(state.files().get(AttachmentKind::Aadhaar).is_some());

        // Reopening any event stages the kept selection again.
        let open = state.open_event(1).unwrap();
        let link = open.download(AttachmentKind::Aadhaar).unwrap();
        assert_eq!(link.file_name, "aadhaar.jpg");
        assert!(link.staged_path().exists());
    }

    #[test]
    fn local_events_survive_a_late_load() {
        let mut state = SchedulerState::new(ViewMode::Week, today());
        state.open_form();
        let form = state.form_mut().unwrap();
        form.set(FormField::Title, "Sync");
        form.set(FormField::Start, "2024-01-01T10:00");
        form.set(FormField::End, "2024-01-01T11:00");
        state.submit_form().unwrap();
        state.open_event(0).unwrap();

        state.finish_load(Ok(vec![server_event(1, "1st Round")]));

        assert_eq!(state.events().len(), 2);
        assert_eq!(state.events()[1].title, "Sync");
        assert_eq!(state.detail().unwrap().index(), 1);
    }

    #[test]
    fn missing_selection_does_not_block_the_detail() {
        let tmp = tempfile::tempdir().unwrap();
        let resume = tmp.path().join("cv.pdf");
        std::fs::write(&resume, "%PDF-1.4").unwrap();

        let mut state = loaded();
        state.open_event(0).unwrap();
        state.select_file(AttachmentKind::Resume, &resume).unwrap();
        state.close_detail();
        std::fs::remove_file(&resume).unwrap();

        let open = state.open_event(1).unwrap();
        assert_eq!(open.index(), 1);
        assert!(open.download(AttachmentKind::Resume).is_none());
        assert!(state.files().get(AttachmentKind::Resume).is_none());
    }

    #[test]
    fn unknown_event_keeps_the_open_form() {
        let mut state = loaded();
        state.open_form();
        state.form_mut().unwrap().set(FormField::Title, "Half done");

        assert!(state.open_event(7).is_err());
        assert_eq!(state.form_mut().unwrap().title, "Half done");
    }

    #[test]
    fn failed_staging_keeps_previous_selection_and_link() {
        let tmp = tempfile::tempdir().unwrap();
        let first = tmp.path().join("a.pdf");
        let second = tmp.path().join("b.pdf");
        std::fs::write(&first, "a").unwrap();
        std::fs::write(&second, "b").unwrap();

        let mut state = loaded();
        state.open_event(0).unwrap();
        state.select_file(AttachmentKind::Resume, &first).unwrap();

        // Block the directory the next staged copy would go into.
        let shelf_dir = state.detail().unwrap().shelf.dir().to_path_buf();
        std::fs::write(shelf_dir.join("resume").join("2"), "").unwrap();

        assert!(matches!(
            state.select_file(AttachmentKind::Resume, &second),
            Err(ScheduleError::Io(_))
        ));
        assert_eq!(state.files().get(AttachmentKind::Resume).unwrap().name, "a.pdf");
        let link = state.detail().unwrap().download(AttachmentKind::Resume).unwrap();
        assert_eq!(link.file_name, "a.pdf");
        assert!(link.staged_path().exists());
    }
}
