use serde::Deserialize;

use serde_json::Value;

/// Timing report the upstream encoder emits alongside its output,
/// one entry per encoded frame
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PerformanceDetails {
    #[serde(default)]
    frames: Vec<PerformanceFrame>,
}

/// Timing information for a single encoded frame
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PerformanceFrame {
    #[serde(default)]
    nodes: Vec<PerformanceNode>,
}

/// Wall-clock timing for one processing node of a frame
#[derive(Clone, Debug, Deserialize)]
pub struct PerformanceNode {
    name: String,
    wall_microseconds: u64,
}

impl PerformanceDetails {
    /// Parse the `performance` node of an encoder response. A missing,
    /// null or malformed node yields a report with zero frames.
    pub fn from_json(perf: Option<&Value>) -> Self {
        perf.and_then(|value| serde_json::from_value(value.clone()).ok())
            .unwrap_or_default()
    }

    /// Per-frame timing entries
    pub fn frames(&self) -> &[PerformanceFrame] {
        &self.frames
    }

    /// Render a one-line summary of the first frame's node timings, e.g.
    /// `"decode(1.2ms) scale(0.35ms) "`. Reports with several frames get a
    /// `"First of {n} frames: "` prefix; an empty report yields
    /// `"No frames found"`.
    pub fn first_frame_summary(&self) -> String {
        let first = match self.frames.first() {
            Some(first) => first,
            None => return "No frames found".into(),
        };

        let mut summary = String::new();

        if self.frames.len() > 1 {
            summary
                .push_str(&format!("First of {} frames: ", self.frames.len()));
        }

        for node in &first.nodes {
            summary.push_str(&format!(
                "{}({}ms) ",
                node.name,
                format_millis(node.wall_microseconds)
            ));
        }

        summary
    }
}

impl PerformanceFrame {
    /// Timings of the processing nodes that produced this frame
    pub fn nodes(&self) -> &[PerformanceNode] {
        &self.nodes
    }
}

impl PerformanceNode {
    /// Name of the processing node
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Wall-clock time spent in this node, in microseconds
    pub fn wall_microseconds(&self) -> u64 {
        self.wall_microseconds
    }
}

/// Format microseconds as milliseconds with at most four decimal places,
/// trailing zeros trimmed
fn format_millis(micros: u64) -> String {
    let mut formatted = format!("{:.4}", micros as f64 / 1000.0);

    while formatted.ends_with('0') {
        formatted.pop();
    }

    if formatted.ends_with('.') {
        formatted.pop();
    }

    formatted
}
