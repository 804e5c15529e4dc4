use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Stylize,
    symbols::border,
    text::Line,
    widgets::{Block, Paragraph, TableState},
};

use crate::domain::TableStyle;
use crate::export::build_table;
use crate::model::Model;
use crate::table::TableArtifact;

pub const BORDER_HEIGHT: usize = 2;
pub const TABLE_HEADER_HEIGHT: usize = 1;
pub const STATUSLINE_HEIGHT: usize = 1;

#[derive(Debug)]
pub struct TableUI {
    style: TableStyle,
}

impl TableUI {
    pub fn new(style: TableStyle) -> Self {
        Self { style }
    }

    pub fn draw(&self, model: &Model, frame: &mut Frame) {
        let [table_area, status_area] = Layout::vertical([
            Constraint::Min(0),
            Constraint::Length(STATUSLINE_HEIGHT as u16),
        ])
        .areas(frame.area());

        self.draw_table(model, frame, table_area);
        self.draw_statusline(model, frame, status_area);
    }

    fn draw_table(&self, model: &Model, frame: &mut Frame, area: Rect) {
        let title = Line::from(format!(" {} ", model.name()).bold());
        let instructions = Line::from(vec![
            " Move ".into(),
            "<Up/Down>".blue().bold(),
            " Copy row ".into(),
            "<Y>".blue().bold(),
            " Quit ".into(),
            "<Q> ".blue().bold(),
        ]);
        let block = Block::bordered()
            .title(title.centered())
            .title_bottom(instructions.centered())
            .border_set(border::THICK);

        match model.artifact() {
            TableArtifact::Empty => {
                frame.render_widget(Paragraph::new("No data").centered().block(block), area);
            }
            TableArtifact::Table { header, body } => {
                let table = build_table(header, body, &self.style)
                    .block(block)
                    .row_highlight_style(self.style.highlight)
                    .highlight_symbol(self.style.highlight_symbol.as_str());
                let mut state = TableState::default()
                    .with_offset(model.offset_row())
                    .with_selected(Some(model.selected_row()));
                frame.render_stateful_widget(table, area, &mut state);
            }
        }
    }

    fn draw_statusline(&self, model: &Model, frame: &mut Frame, area: Rect) {
        let position = if model.nrows() == 0 {
            "0/0".to_string()
        } else {
            format!("{}/{}", model.selected_row() + 1, model.nrows())
        };
        let [message_area, position_area] = Layout::horizontal([
            Constraint::Min(0),
            Constraint::Length(position.len() as u16 + 1),
        ])
        .areas(area);

        frame.render_widget(Paragraph::new(model.status_message()), message_area);
        frame.render_widget(Paragraph::new(position).right_aligned(), position_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use crate::table::TableRenderer;
    use ratatui::{Terminal, backend::TestBackend};

    fn screen(model: &Model, width: u16, height: u16) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        let ui = TableUI::new(TableStyle::default());
        terminal.draw(|f| ui.draw(model, f)).unwrap();
        let buf = terminal.backend().buffer();
        (0..height)
            .map(|y| (0..width).map(|x| buf[(x, y)].symbol()).collect::<String>())
            .collect()
    }

    #[test]
    fn draws_header_rows_and_status() {
        let data = vec![
            Record::new().with("userName", "al").with("age", 30).with("pad", 0),
            Record::new().with("userName", "bo").with("age", 40).with("pad", 0),
        ];
        let artifact = TableRenderer::default().render(Some(&data)).unwrap();
        let model = Model::init("users.json", artifact, 10);
        let lines = screen(&model, 40, 10);

        assert!(lines[0].contains("users.json"));
        assert!(lines[1].contains("User Name"));
        assert!(lines[1].contains("Age"));
        assert!(lines[2].contains("▶ al"));
        assert!(lines[3].contains("bo"));
        assert!(lines[9].contains("2 rows"));
        assert!(lines[9].trim_end().ends_with("1/2"));
    }

    #[test]
    fn draws_notice_for_empty_artifact() {
        let model = Model::init("empty.json", TableArtifact::Empty, 8);
        let lines = screen(&model, 30, 8);
        assert!(lines.iter().any(|l| l.contains("No data")));
        assert!(lines[7].trim_end().ends_with("0/0"));
    }
}
