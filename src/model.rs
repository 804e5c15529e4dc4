use arboard::Clipboard;
use tracing::{debug, trace, warn};

use crate::domain::{DTError, Message};
use crate::table::TableArtifact;
use crate::ui::{BORDER_HEIGHT, STATUSLINE_HEIGHT, TABLE_HEADER_HEIGHT};

#[derive(Debug, PartialEq)]
pub enum Status {
    READY,
    QUITTING,
}

pub struct Model {
    name: String,
    pub status: Status,
    artifact: TableArtifact,
    selected_row: usize,
    offset_row: usize,
    table_height: usize,
    status_message: String,
    clipboard: Option<Clipboard>,
}

impl Model {
    pub fn init(name: impl Into<String>, artifact: TableArtifact, ui_height: usize) -> Self {
        let mut model = Self {
            name: name.into(),
            status: Status::READY,
            artifact,
            selected_row: 0,
            offset_row: 0,
            table_height: 0,
            status_message: String::new(),
            clipboard: None,
        };
        model.ui_resize(ui_height);
        if model.artifact.is_empty() {
            model.set_status_message("No data");
        } else {
            let nrows = model.nrows();
            model.set_status_message(format!("{nrows} rows"));
        }
        model
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn artifact(&self) -> &TableArtifact {
        &self.artifact
    }

    pub fn nrows(&self) -> usize {
        self.artifact.body().len()
    }

    /// Selected row as an index into the table body.
    pub fn selected_row(&self) -> usize {
        self.selected_row
    }

    pub fn offset_row(&self) -> usize {
        self.offset_row
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn update(&mut self, message: Option<Message>) -> Result<(), DTError> {
        if let Some(msg) = message {
            trace!("Update: {msg:?}");
            match msg {
                Message::Quit => self.quit(),
                Message::MoveUp => self.move_selection_up(1),
                Message::MoveDown => self.move_selection_down(1),
                Message::MovePageUp => self.move_selection_up(self.table_height),
                Message::MovePageDown => self.move_selection_down(self.table_height),
                Message::MoveBeginning => self.select_row(0),
                Message::MoveEnd => self.select_row(self.nrows().saturating_sub(1)),
                Message::CopyRow => self.copy_table_row(),
                Message::Resize(_width, height) => self.ui_resize(height),
            }
        }
        Ok(())
    }

    pub fn quit(&mut self) {
        self.status = Status::QUITTING;
    }

    fn ui_resize(&mut self, height: usize) {
        self.table_height = height
            .saturating_sub(BORDER_HEIGHT + TABLE_HEADER_HEIGHT + STATUSLINE_HEIGHT)
            .max(1);
        trace!("Table height {}", self.table_height);
        self.select_row(self.selected_row);
    }

    fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
    }

    fn move_selection_up(&mut self, size: usize) {
        self.select_row(self.selected_row.saturating_sub(size));
    }

    fn move_selection_down(&mut self, size: usize) {
        self.select_row(self.selected_row + size);
    }

    /// Select `row`, clamped to the body, and scroll so it stays visible.
    fn select_row(&mut self, row: usize) {
        let nrows = self.nrows();
        if nrows == 0 {
            self.selected_row = 0;
            self.offset_row = 0;
            return;
        }
        self.selected_row = std::cmp::min(row, nrows - 1);
        if self.selected_row < self.offset_row {
            self.offset_row = self.selected_row;
        } else if self.selected_row >= self.offset_row + self.table_height {
            self.offset_row = self.selected_row + 1 - self.table_height;
        }
    }

    fn selected_row_text(&self) -> Option<String> {
        self.artifact.body().get(self.selected_row).map(|row| {
            row.cells
                .iter()
                .map(|c| c.text())
                .collect::<Vec<String>>()
                .join("\t")
        })
    }

    fn copy_table_row(&mut self) {
        let Some(content) = self.selected_row_text() else {
            return;
        };

        if self.clipboard.is_none() {
            match Clipboard::new() {
                Ok(clipboard) => self.clipboard = Some(clipboard),
                Err(e) => {
                    warn!("Clipboard unavailable: {e:?}");
                    self.set_status_message("Clipboard unavailable");
                    return;
                }
            }
        }

        let result = self
            .clipboard
            .as_mut()
            .map(|clipboard| clipboard.set_text(content));
        match result {
            Some(Ok(_)) => {
                debug!("Copied row {} to clipboard.", self.selected_row);
                self.set_status_message(format!("Copied row {}", self.selected_row + 1));
            }
            Some(Err(e)) => {
                warn!("Error copying to clipboard: {e:?}");
                self.set_status_message("Copy failed");
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use crate::table::TableRenderer;

    // 10 body rows, 2 visible rows at height 6.
    fn model(ui_height: usize) -> Model {
        let data: Vec<Record> = (0..10)
            .map(|i| Record::new().with("rowNumber", i).with("pad", 0))
            .collect();
        let artifact = TableRenderer::default().render(Some(&data)).unwrap();
        Model::init("rows.json", artifact, ui_height)
    }

    #[test]
    fn starts_at_top() {
        let m = model(6);
        assert_eq!(m.status, Status::READY);
        assert_eq!(m.selected_row(), 0);
        assert_eq!(m.offset_row(), 0);
        assert_eq!(m.status_message(), "10 rows");
    }

    #[test]
    fn moving_down_scrolls_the_view() {
        let mut m = model(6);
        m.update(Some(Message::MoveDown)).unwrap();
        assert_eq!((m.selected_row(), m.offset_row()), (1, 0));
        m.update(Some(Message::MoveDown)).unwrap();
        assert_eq!((m.selected_row(), m.offset_row()), (2, 1));
        m.update(Some(Message::MoveUp)).unwrap();
        m.update(Some(Message::MoveUp)).unwrap();
        assert_eq!((m.selected_row(), m.offset_row()), (0, 0));
    }

    #[test]
    fn selection_is_clamped() {
        let mut m = model(6);
        m.update(Some(Message::MoveUp)).unwrap();
        assert_eq!(m.selected_row(), 0);
        m.update(Some(Message::MoveEnd)).unwrap();
        assert_eq!((m.selected_row(), m.offset_row()), (9, 8));
        m.update(Some(Message::MovePageDown)).unwrap();
        assert_eq!(m.selected_row(), 9);
        m.update(Some(Message::MoveBeginning)).unwrap();
        assert_eq!((m.selected_row(), m.offset_row()), (0, 0));
    }

    #[test]
    fn resize_keeps_selection_visible() {
        let mut m = model(20);
        m.update(Some(Message::MoveEnd)).unwrap();
        assert_eq!(m.offset_row(), 0);
        m.update(Some(Message::Resize(80, 6))).unwrap();
        assert_eq!(m.offset_row(), 8);
    }

    #[test]
    fn empty_artifact_has_no_selection() {
        let mut m = Model::init("empty.json", TableArtifact::Empty, 10);
        m.update(Some(Message::MoveDown)).unwrap();
        m.update(Some(Message::MoveEnd)).unwrap();
        assert_eq!(m.selected_row(), 0);
        assert_eq!(m.selected_row_text(), None);
    }

    #[test]
    fn selected_row_text_is_tab_separated() {
        let data = vec![Record::new().with("userName", "al").with("age", 30).with("pad", 0)];
        let artifact = TableRenderer::default().render(Some(&data)).unwrap();
        let m = Model::init("users.json", artifact, 10);
        assert_eq!(m.selected_row_text().as_deref(), Some("al\t30"));
    }

    #[test]
    fn quit() {
        let mut m = model(6);
        m.update(Some(Message::Quit)).unwrap();
        assert_eq!(m.status, Status::QUITTING);
    }
}
