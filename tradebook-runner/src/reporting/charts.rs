//! Text charts for terminals and Markdown code blocks.
//!
//! - Gross balance chart: monthly gross balance line (Summary sheet)
//! - Type distribution chart: stacked horizontal bars per type, split by
//!   outcome (Type Distribution sheet)
//!
//! Both are ratatui widgets. They render into an off-screen `Buffer`, which
//! is then flattened to plain text.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Widget},
};
use tradebook_core::aggregate::{MonthlySummary, TypeDistribution};

pub const CHART_WIDTH: u16 = 72;
pub const LINE_CHART_HEIGHT: u16 = 16;

/// Glyphs for stacked segments, cycled when there are more outcomes.
const SEGMENT_GLYPHS: [&str; 6] = ["█", "▓", "▒", "░", "#", "+"];

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Monthly gross balance as a line chart.
pub struct GrossBalanceChart<'a> {
    months: &'a [MonthlySummary],
}

impl<'a> GrossBalanceChart<'a> {
    pub fn new(months: &'a [MonthlySummary]) -> Self {
        Self { months }
    }
}

impl<'a> Widget for GrossBalanceChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let data: Vec<(f64, f64)> = self
            .months
            .iter()
            .map(|m| (f64::from(m.month), m.gross_balance))
            .collect();

        let y_min = data.iter().map(|&(_, v)| v).fold(f64::INFINITY, f64::min);
        let y_max = data
            .iter()
            .map(|&(_, v)| v)
            .fold(f64::NEG_INFINITY, f64::max);
        let (y_lower, y_upper) = if data.is_empty() {
            (0.0, 1.0)
        } else {
            let y_range = y_max - y_min;
            let y_pad = if y_range > 0.0 { y_range * 0.05 } else { 100.0 };
            (y_min - y_pad, y_max + y_pad)
        };
        let y_mid = (y_lower + y_upper) / 2.0;

        let datasets = vec![Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .data(&data)];

        let x_labels: Vec<Span> = MONTH_LABELS.iter().map(|&m| Span::raw(m)).collect();
        let y_labels = vec![
            Span::raw(format!("{:.0}", y_lower)),
            Span::raw(format!("{:.0}", y_mid)),
            Span::raw(format!("{:.0}", y_upper)),
        ];

        Chart::new(datasets)
            .block(
                Block::default()
                    .title(" Monthly Gross Balance ")
                    .borders(Borders::ALL),
            )
            .x_axis(Axis::default().bounds([1.0, 12.0]).labels(x_labels))
            .y_axis(
                Axis::default()
                    .bounds([y_lower, y_upper])
                    .labels(y_labels),
            )
            .render(area, buf);
    }
}

/// Trade counts per type as stacked horizontal bars, one segment per outcome.
pub struct TypeDistributionChart<'a> {
    dist: &'a TypeDistribution,
}

impl<'a> TypeDistributionChart<'a> {
    pub fn new(dist: &'a TypeDistribution) -> Self {
        Self { dist }
    }

    /// Height that fits every type row plus the legend inside the border.
    pub fn height(&self) -> u16 {
        (self.dist.rows.len() as u16).saturating_add(3).max(3)
    }
}

impl<'a> Widget for TypeDistributionChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Type Distribution ")
            .borders(Borders::ALL);
        let inner = block.inner(area);
        block.render(area, buf);

        if self.dist.rows.is_empty() {
            buf.set_string(inner.x, inner.y, "No trades", Style::default());
            return;
        }

        let totals: Vec<usize> = self.dist.rows.iter().map(|r| r.total()).collect();
        let max_total = totals.iter().copied().max().unwrap_or(0).max(1);
        let label_width = self
            .dist
            .rows
            .iter()
            .map(|r| r.trade_type.chars().count())
            .max()
            .unwrap_or(0) as u16;
        let count_width = max_total.to_string().len() as u16;

        // "<label> │<bar> <count>"
        let bar_left = inner.x + label_width + 2;
        let bar_width = inner.width.saturating_sub(label_width + 2 + 1 + count_width);
        let scale = |n: usize| -> u16 {
            ((n as f64 / max_total as f64) * f64::from(bar_width)).round() as u16
        };
        if bar_width == 0 {
            return;
        }

        let bar_rows = inner.height.saturating_sub(1);
        for (i, row) in self.dist.rows.iter().enumerate().take(bar_rows as usize) {
            let y = inner.y + i as u16;
            buf.set_string(inner.x, y, &row.trade_type, Style::default());
            buf.set_string(inner.x + label_width + 1, y, "│", Style::default());

            let bar_end = bar_left + bar_width;
            let mut x = bar_left;
            let mut cumulative = 0;
            for (j, &n) in row.counts.iter().enumerate() {
                if n == 0 {
                    continue;
                }
                cumulative += n;
                // Non-zero segments stay visible.
                let end = (bar_left + scale(cumulative)).max(x + 1).min(bar_end);
                if end > x {
                    let glyph = SEGMENT_GLYPHS[j % SEGMENT_GLYPHS.len()];
                    buf.set_string(x, y, glyph.repeat((end - x) as usize), Style::default());
                }
                x = end;
            }
            buf.set_string(bar_end + 1, y, totals[i].to_string(), Style::default());
        }

        let legend: Vec<String> = self
            .dist
            .outcomes
            .iter()
            .enumerate()
            .map(|(j, o)| format!("{} {o}", SEGMENT_GLYPHS[j % SEGMENT_GLYPHS.len()]))
            .collect();
        buf.set_string(
            bar_left,
            inner.y + bar_rows,
            legend.join("  "),
            Style::default(),
        );
    }
}

/// Flatten a buffer to text, one line per row, trailing blanks trimmed.
pub fn buffer_to_string(buf: &Buffer) -> String {
    let area = buf.area;
    let mut out = String::with_capacity((area.width as usize + 1) * area.height as usize);
    for y in area.top()..area.bottom() {
        let mut line = String::with_capacity(area.width as usize);
        for x in area.left()..area.right() {
            if let Some(cell) = buf.cell((x, y)) {
                line.push_str(cell.symbol());
            }
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Render a widget off-screen and return it as text.
pub fn render_to_string<W: Widget>(widget: W, width: u16, height: u16) -> String {
    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);
    widget.render(area, &mut buf);
    buffer_to_string(&buf)
}

/// Both charts, separated by a blank line.
pub fn render_charts(months: &[MonthlySummary], dist: &TypeDistribution) -> String {
    let line = render_to_string(
        GrossBalanceChart::new(months),
        CHART_WIDTH,
        LINE_CHART_HEIGHT,
    );
    let bars = TypeDistributionChart::new(dist);
    let height = bars.height();
    format!("{}\n{}", line, render_to_string(bars, CHART_WIDTH, height))
}
