use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Sparkline},
    Frame,
};

use super::canvas;
use super::dashboard::DashboardState;
use crate::training::progress::RunPhase;
use crate::viz::Scene;

/// Borrowed snapshot of everything one frame needs.
pub struct ViewData<'a> {
    pub dashboard: &'a DashboardState,
    pub wave: &'a Scene,
    pub loss: &'a Scene,
    pub eval: &'a Scene,
    pub pool_len: usize,
    pub display_start: usize,
    pub display_count: usize,
    pub message: Option<&'a str>,
}

/// Render the full forecast dashboard.
pub fn render(frame: &mut Frame, view: &ViewData) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Main content
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    render_header(frame, view, chunks[0]);
    render_main(frame, view, chunks[1]);
    render_footer(frame, chunks[2]);
}

fn render_header(frame: &mut Frame, view: &ViewData, area: Rect) {
    let dashboard = view.dashboard;
    let phase_color = match dashboard.phase {
        RunPhase::Idle => Color::DarkGray,
        RunPhase::Complete => Color::Cyan,
        RunPhase::Error => Color::Red,
        _ => Color::Green,
    };

    // A transient app message outranks the run's status line
    let status = view
        .message
        .unwrap_or(dashboard.status_line.as_str())
        .to_string();

    let header_text = Line::from(vec![
        Span::styled(
            "Wave Forecast",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::raw(status),
        Span::raw("  |  ["),
        Span::styled(
            dashboard.phase.label(),
            Style::default().fg(phase_color).add_modifier(Modifier::BOLD),
        ),
        Span::raw("]"),
    ]);

    let header = Paragraph::new(header_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(header, area);
}

fn render_main(frame: &mut Frame, view: &ViewData, area: Rect) {
    // Left: the two wave plots. Right: loss curve plus run stats
    let main_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
        .split(area);

    render_left_panel(frame, view, main_cols[0]);
    render_right_panel(frame, view, main_cols[1]);
}

fn render_left_panel(frame: &mut Frame, view: &ViewData, area: Rect) {
    let left_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    canvas::render(frame, view.wave, &wave_title(view), left_rows[0]);
    canvas::render(frame, view.eval, "Evaluation (last 15 points)", left_rows[1]);
}

fn render_right_panel(frame: &mut Frame, view: &ViewData, area: Rect) {
    let right_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(8),    // Loss chart
            Constraint::Length(3), // Batch loss sparkline
            Constraint::Length(3), // Progress gauge
            Constraint::Length(9), // Stats
        ])
        .split(area);

    canvas::render(frame, view.loss, "Loss (MSE)", right_rows[0]);
    render_batch_sparkline(frame, view.dashboard, right_rows[1]);
    render_progress_gauge(frame, view.dashboard, right_rows[2]);
    render_stats_panel(frame, view, right_rows[3]);
}

fn wave_title(view: &ViewData) -> String {
    if view.pool_len == 0 {
        return "Waves (none generated)".to_string();
    }
    let last = view
        .display_start
        .saturating_add(view.display_count)
        .min(view.pool_len)
        .saturating_sub(1);
    format!(
        "Waves {}-{} of {}",
        view.display_start, last, view.pool_len
    )
}

fn render_batch_sparkline(frame: &mut Frame, dashboard: &DashboardState, area: Rect) {
    // Sparkline wants integers; scale losses against the window maximum
    let max = dashboard.batch_losses.iter().copied().fold(0.0_f64, f64::max);
    let data: Vec<u64> = dashboard
        .batch_losses
        .iter()
        .map(|&loss| {
            if max > 0.0 {
                (loss / max * 100.0).round() as u64
            } else {
                0
            }
        })
        .collect();

    let title = match dashboard.batch_losses.back() {
        Some(loss) => format!("Batch Loss ({loss:.6})"),
        None => "Batch Loss".to_string(),
    };

    let sparkline = Sparkline::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .data(&data)
        .style(Style::default().fg(Color::Magenta));

    frame.render_widget(sparkline, area);
}

fn render_progress_gauge(frame: &mut Frame, dashboard: &DashboardState, area: Rect) {
    let progress = dashboard.progress();
    let label = format!(
        "{}/{} epochs ({:.0}%)",
        dashboard.epoch,
        dashboard.total_epochs,
        progress * 100.0
    );

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Progress"))
        .gauge_style(Style::default().fg(Color::Blue))
        .ratio(progress.clamp(0.0, 1.0))
        .label(label);

    frame.render_widget(gauge, area);
}

fn render_stats_panel(frame: &mut Frame, view: &ViewData, area: Rect) {
    let dashboard = view.dashboard;
    let label_style = Style::default().fg(Color::White);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Pool:      ", label_style),
            Span::raw(format!("{} sequences", view.pool_len)),
        ]),
        Line::from(vec![
            Span::styled("Showing:   ", label_style),
            Span::raw(format!(
                "{} from index {}",
                view.display_count, view.display_start
            )),
        ]),
        Line::from(vec![
            Span::styled("Epoch:     ", label_style),
            Span::raw(format!("{}/{}", dashboard.epoch, dashboard.total_epochs)),
        ]),
        Line::from(vec![
            Span::styled("Batch:     ", label_style),
            Span::raw(format!("{}", dashboard.batch)),
        ]),
    ];

    if let Some(record) = dashboard.latest_epoch() {
        lines.push(Line::from(vec![
            Span::styled("Loss:      ", label_style),
            Span::raw(format!("{:.6}", record.loss)),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Val Loss:  ", label_style),
            Span::raw(format!("{:.6}", record.val_loss)),
        ]));
    }

    if let Some(eval) = &dashboard.eval {
        lines.push(Line::from(vec![
            Span::styled("Eval MSE:  ", label_style),
            Span::styled(
                format!("{:.6}", eval.mean_squared_error()),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
        ]));
    }

    if let Some(error) = &dashboard.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    }

    let stats = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Stats"));

    frame.render_widget(stats, area);
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let footer =
        Paragraph::new("G: Generate  |  T: Train  |  Left/Right: Pan  |  Up/Down: Count  |  Q: Quit")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Controls"));

    frame.render_widget(footer, area);
}
