//! Derived view state and the synchronizer that regenerates it after every
//! mutation: message list, then stats panel, then chart.

use crate::session::stats::StatsAggregate;
use crate::session::Message;

pub mod html;

/// Pure markup producer for individual messages and stat entries.
pub trait MessageRenderer {
    type Node;

    fn render_message(&self, username: &str, text: &str, timestamp: &str) -> Self::Node;
    fn render_stat_entry(&self, username: &str, count: u32) -> Self::Node;
}

/// Receives parallel label/value arrays and redraws.
pub trait ChartSink {
    fn set_data(&mut self, labels: Vec<String>, values: Vec<u32>);
    fn redraw(&mut self);
}

/// Lazily creates the chart sink. `None` means no charting backend is
/// available right now.
pub trait ChartBackend {
    type Sink: ChartSink;

    fn create(&mut self) -> Option<Self::Sink>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelState {
    #[default]
    Hidden,
    Visible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSummary {
    pub total_messages: usize,
    pub active_users: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub values: Vec<u32>,
}

impl ChartData {
    fn from_ranked(ranked: Vec<(String, u32)>) -> Self {
        let (labels, values) = ranked.into_iter().unzip();
        Self { labels, values }
    }

    pub fn total(&self) -> u64 {
        self.values.iter().map(|v| u64::from(*v)).sum()
    }

    /// Percentage of the total held by entry `index`, `0.0` when empty.
    pub fn share(&self, index: usize) -> f64 {
        let total = self.total();
        match self.values.get(index) {
            Some(value) if total > 0 => f64::from(*value) * 100.0 / total as f64,
            _ => 0.0,
        }
    }

    /// `label: N messages (P%)` for entry `index`.
    pub fn describe(&self, index: usize) -> Option<String> {
        let label = self.labels.get(index)?;
        let value = self.values.get(index)?;
        Some(format!(
            "{label}: {value} messages ({:.1}%)",
            self.share(index)
        ))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState<N> {
    pub messages: Vec<N>,
    pub summary: StatsSummary,
    pub stat_entries: Vec<N>,
    pub chart: ChartData,
    pub panel: PanelState,
    pub scroll_to_latest: bool,
    pub revision: u64,
}

impl<N> Default for ViewState<N> {
    fn default() -> Self {
        Self {
            messages: Vec::new(),
            summary: StatsSummary::default(),
            stat_entries: Vec::new(),
            chart: ChartData::default(),
            panel: PanelState::Hidden,
            scroll_to_latest: false,
            revision: 0,
        }
    }
}

pub struct ViewSynchronizer<R: MessageRenderer, B: ChartBackend> {
    renderer: R,
    backend: B,
    chart: Option<B::Sink>,
    state: ViewState<R::Node>,
}

impl<R: MessageRenderer, B: ChartBackend> ViewSynchronizer<R, B> {
    pub fn new(renderer: R, backend: B) -> Self {
        Self {
            renderer,
            backend,
            chart: None,
            state: ViewState::default(),
        }
    }

    pub fn state(&self) -> &ViewState<R::Node> {
        &self.state
    }

    pub fn panel(&self) -> PanelState {
        self.state.panel
    }

    pub fn chart(&self) -> Option<&B::Sink> {
        self.chart.as_ref()
    }

    /// Consume a pending scroll-to-newest request.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.state.scroll_to_latest)
    }

    /// Regenerate every view from the current state. Panel visibility is
    /// left as-is. The stats list and the chart share one ranking.
    pub fn refresh(&mut self, log: &[Message], stats: &StatsAggregate) {
        self.render_messages(log);
        let ranked = stats.ranked_entries();
        self.render_ranked_stats(log.len(), &ranked);
        self.render_ranked_chart(ranked);
        self.state.revision += 1;
    }

    pub fn render_messages(&mut self, log: &[Message]) {
        self.state.messages = log
            .iter()
            .map(|m| self.renderer.render_message(&m.username, &m.text, &m.timestamp))
            .collect();
        self.state.scroll_to_latest = true;
    }

    pub fn render_stats(&mut self, log: &[Message], stats: &StatsAggregate) {
        self.render_ranked_stats(log.len(), &stats.ranked_entries());
    }

    /// No-op until a chart sink exists.
    pub fn render_chart(&mut self, stats: &StatsAggregate) {
        if self.chart.is_some() {
            self.render_ranked_chart(stats.ranked_entries());
        }
    }

    fn render_ranked_stats(&mut self, total_messages: usize, ranked: &[(String, u32)]) {
        self.state.summary = StatsSummary {
            total_messages,
            active_users: ranked.len(),
        };
        self.state.stat_entries = ranked
            .iter()
            .map(|(name, count)| self.renderer.render_stat_entry(name, *count))
            .collect();
    }

    fn render_ranked_chart(&mut self, ranked: Vec<(String, u32)>) {
        let Some(chart) = self.chart.as_mut() else {
            return;
        };
        let data = ChartData::from_ranked(ranked);
        chart.set_data(data.labels.clone(), data.values.clone());
        chart.redraw();
        self.state.chart = data;
    }

    pub fn toggle_stats_panel(&mut self, log: &[Message], stats: &StatsAggregate) -> PanelState {
        match self.state.panel {
            PanelState::Hidden => {
                self.state.panel = PanelState::Visible;
                let ranked = stats.ranked_entries();
                self.render_ranked_stats(log.len(), &ranked);
                self.ensure_chart();
                self.render_ranked_chart(ranked);
            }
            PanelState::Visible => self.state.panel = PanelState::Hidden,
        }
        self.state.panel
    }

    pub fn close_stats_panel(&mut self) {
        self.state.panel = PanelState::Hidden;
    }

    fn ensure_chart(&mut self) {
        if self.chart.is_some() {
            return;
        }
        self.chart = self.backend.create();
        if self.chart.is_none() {
            tracing::info!("chart backend unavailable; showing text stats only");
        }
    }
}
