use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::{error, info};

mod controller;
mod domain;
mod export;
mod humanize;
mod loader;
mod logging;
mod model;
mod record;
mod table;
mod ui;

use controller::Controller;
use domain::{DTError, HeaderPolicy, RenderConfig, TableStyle, ViewerConfig};
use logging::LogSink;
use model::{Model, Status};
use table::{TableArtifact, TableRenderer};
use ui::TableUI;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Target {
    /// Interactive table in the terminal
    Tui,
    /// Plain text grid on stdout
    Text,
    /// HTML table on stdout
    Html,
}

/// Render a dataset of records as a table with humanized column headers.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Dataset file (json, csv, parquet, arrow)
    input: String,

    #[arg(short, long, value_enum, default_value_t = Target::Tui)]
    target: Target,

    /// Use the raw field name when it cannot be humanized
    #[arg(long)]
    lenient_headers: bool,

    /// Show the last field of each record instead of dropping it
    #[arg(long)]
    keep_trailing_field: bool,

    #[arg(long, default_value_t = 40)]
    max_column_width: usize,

    /// CSS class of the html table element
    #[arg(long)]
    html_class: Option<String>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Terminal event poll interval in milliseconds
    #[arg(long, default_value_t = 100)]
    event_poll_time: u64,
}

impl Cli {
    fn render_config(&self) -> RenderConfig {
        RenderConfig {
            header_policy: if self.lenient_headers {
                HeaderPolicy::Fallback
            } else {
                HeaderPolicy::Strict
            },
            drop_trailing_field: !self.keep_trailing_field,
        }
    }

    fn table_style(&self) -> TableStyle {
        let style = TableStyle::default().max_column_width(self.max_column_width);
        match &self.html_class {
            Some(class) => style.html_class(class.as_str()),
            None => style,
        }
    }

    fn log_sink(&self) -> LogSink<'_> {
        match (&self.log_file, self.target) {
            (Some(path), _) => LogSink::File(path),
            (None, Target::Tui) => LogSink::Off,
            (None, _) => LogSink::Stderr,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}

fn run(cli: &Cli) -> Result<(), DTError> {
    logging::init(cli.log_sink())?;

    let path = loader::expand_path(&cli.input)?;
    let dataset = loader::load_data_file(path)?;

    let renderer = TableRenderer::new(cli.render_config());
    let artifact = renderer.render(dataset.records.as_deref())?;
    let style = cli.table_style();

    match cli.target {
        Target::Text => {
            for line in export::to_text(&artifact, &style) {
                println!("{line}");
            }
        }
        Target::Html => print!("{}", export::to_html(&artifact, &style)),
        Target::Tui => {
            let cfg = ViewerConfig {
                event_poll_time: cli.event_poll_time,
            };
            let mut terminal = ratatui::init();
            let result = run_viewer(&mut terminal, dataset.info.name(), artifact, style, &cfg);
            ratatui::restore();
            result?;
        }
    }
    Ok(())
}

fn run_viewer(
    terminal: &mut ratatui::DefaultTerminal,
    name: String,
    artifact: TableArtifact,
    style: TableStyle,
    cfg: &ViewerConfig,
) -> Result<(), DTError> {
    let height = terminal.size()?.height as usize;
    let mut model = Model::init(name, artifact, height);
    let ui = TableUI::new(style);
    let controller = Controller::new(cfg);
    info!("Starting viewer for {}", model.name());

    while model.status != Status::QUITTING {
        terminal.draw(|f| ui.draw(&model, f))?;

        if let Some(message) = controller.handle_event()? {
            model.update(Some(message))?;
        };
    }

    Ok(())
}
