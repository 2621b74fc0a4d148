use crossterm::event::{Event, KeyCode};
use latentga_training::history::FitnessHistory;
use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    symbols::Marker,
    text::{Line, Text},
    widgets::{Axis, Block, Chart, Dataset, GraphType, LegendPosition, Paragraph, Widget},
};

use crate::{fitness::FitnessMetric, schema::run_result::EvolutionResult, tui::App};

const SERIES: [(&str, Color); 3] = [
    ("Average fitness", Color::Cyan),
    ("Maximum fitness", Color::Green),
    ("Minimum fitness", Color::Red),
];

#[derive(Debug)]
pub(super) struct FitnessChartApp {
    title: String,
    metric: FitnessMetric,
    /// Average, maximum and minimum points.
    series: [Vec<(f64, f64)>; 3],
    visible: [bool; 3],
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    best: Option<(f32, f32, f32)>,
    should_exit: bool,
}

impl FitnessChartApp {
    pub(super) fn new(result: &EvolutionResult) -> Self {
        let history = &result.history;
        Self {
            title: format!(
                "GAN Evaluation: {} ({} records, seed {})",
                result.model_name, result.samples, result.seed
            ),
            metric: result.metric,
            series: [history.means(), history.maxima(), history.minima()],
            visible: [true; 3],
            x_bounds: x_bounds(history),
            y_bounds: y_bounds(history),
            best: result
                .best()
                .map(|e| (e.fitness, e.evaluation.loss, e.evaluation.accuracy)),
            should_exit: false,
        }
    }

    fn toggle(&mut self, index: usize) {
        self.visible[index] = !self.visible[index];
    }
}

#[expect(clippy::cast_precision_loss)]
fn x_bounds(history: &FitnessHistory) -> [f64; 2] {
    let last = history.last().map_or(0, |r| r.generation);
    [0.0, last.max(1) as f64]
}

fn y_bounds(history: &FitnessHistory) -> [f64; 2] {
    let (lo, hi) = history.fitness_bounds().unwrap_or((0.0, 1.0));
    let (lo, hi) = (f64::from(lo), f64::from(hi));
    let margin = ((hi - lo) * 0.05).max(1e-3);
    [lo - margin, hi + margin]
}

impl App for FitnessChartApp {
    fn should_exit(&self) -> bool {
        self.should_exit
    }

    fn handle_event(&mut self, event: &Event) {
        if let Some(event) = event.as_key_event() {
            match event.code {
                KeyCode::Char('q') | KeyCode::Esc => self.should_exit = true,
                KeyCode::Char('1') => self.toggle(0),
                KeyCode::Char('2') => self.toggle(1),
                KeyCode::Char('3') => self.toggle(2),
                _ => {}
            }
        }
    }

    fn draw(&self, frame: &mut Frame) {
        // Layout: chart + summary line + help line
        let [chart_area, summary_area, help_area] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let chart = FitnessChart {
            title: &self.title,
            y_title: self.metric.to_string(),
            series: &self.series,
            visible: self.visible,
            x_bounds: self.x_bounds,
            y_bounds: self.y_bounds,
        };
        frame.render_widget(chart, chart_area);

        let summary = match self.best {
            Some((fitness, loss, accuracy)) => format!(
                "Best: fitness {fitness:.4} | loss {loss:.4} | accuracy {accuracy:.4}"
            ),
            None => "Best: -".to_owned(),
        };
        frame.render_widget(Paragraph::new(Line::raw(summary)).centered(), summary_area);

        let help_text = Text::from("1/2/3: Toggle Average/Maximum/Minimum | q/Esc: Quit")
            .style(Style::default().fg(Color::DarkGray))
            .centered();
        frame.render_widget(help_text, help_area);
    }
}

struct FitnessChart<'a> {
    title: &'a str,
    y_title: String,
    series: &'a [Vec<(f64, f64)>; 3],
    visible: [bool; 3],
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

impl Widget for FitnessChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let datasets = SERIES
            .iter()
            .zip(self.series)
            .zip(self.visible)
            .filter(|(_, visible)| *visible)
            .map(|(((name, color), data), _)| {
                Dataset::default()
                    .name(*name)
                    .marker(Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(*color))
                    .data(data)
            })
            .collect::<Vec<_>>();
        let x_axis = Axis::default()
            .title("Generation")
            .bounds(self.x_bounds)
            .labels([
                format!("{:.0}", self.x_bounds[0]),
                format!("{:.0}", f64::midpoint(self.x_bounds[0], self.x_bounds[1])),
                format!("{:.0}", self.x_bounds[1]),
            ]);
        let y_axis = Axis::default()
            .title(self.y_title)
            .bounds(self.y_bounds)
            .labels([
                format!("{:.3}", self.y_bounds[0]),
                format!("{:.3}", f64::midpoint(self.y_bounds[0], self.y_bounds[1])),
                format!("{:.3}", self.y_bounds[1]),
            ]);
        let chart = Chart::new(datasets)
            .block(Block::bordered().title(self.title))
            .x_axis(x_axis)
            .y_axis(y_axis)
            .legend_position(Some(LegendPosition::BottomRight))
            .hidden_legend_constraints((Constraint::Percentage(50), Constraint::Percentage(50)));

        Widget::render(chart, area, buf);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEvent, KeyModifiers};
    use latentga_training::history::GenerationRecord;

    use super::*;

    fn history() -> FitnessHistory {
        (0..4)
            .map(|g| {
                #[expect(clippy::cast_precision_loss)]
                let base = g as f32 * 0.1;
                GenerationRecord {
                    generation: g,
                    mean: base + 0.1,
                    max: base + 0.2,
                    min: base,
                    std_dev: 0.05,
                    gene_diversity: 0.3,
                }
            })
            .collect()
    }

    fn key(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    #[test]
    fn test_bounds_cover_history() {
        let history = history();
        assert_eq!(x_bounds(&history), [0.0, 3.0]);
        let [lo, hi] = y_bounds(&history);
        assert!(lo < 0.0 && hi > 0.5);
    }

    #[test]
    fn test_empty_history_has_default_bounds() {
        let history = FitnessHistory::new();
        assert_eq!(x_bounds(&history), [0.0, 1.0]);
        let [lo, hi] = y_bounds(&history);
        assert!(lo < 0.0 && hi > 1.0);
    }

    #[test]
    fn test_keys_toggle_series_and_quit() {
        let mut app = FitnessChartApp {
            title: String::new(),
            metric: FitnessMetric::Accuracy,
            series: [vec![], vec![], vec![]],
            visible: [true; 3],
            x_bounds: [0.0, 1.0],
            y_bounds: [0.0, 1.0],
            best: None,
            should_exit: false,
        };
        app.handle_event(&key('2'));
        assert_eq!(app.visible, [true, false, true]);
        app.handle_event(&key('2'));
        assert_eq!(app.visible, [true, true, true]);
        assert!(!app.should_exit());
        app.handle_event(&key('q'));
        assert!(app.should_exit());
    }
}
