//! Replay command implementation.

use crate::script::{Action, Script};
use crate::svg::{LegendEntry, SvgSurface};
use costwheel_core::{
    ChangeFeed, ChartConfig, ChartStats, DonutChart, FeedAdapter, InMemoryCollection,
    OrdinalScale, Phase, SliceInteractions,
};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

type ReplayChart = DonutChart<OrdinalScale, SliceInteractions<Arc<InMemoryCollection>>>;

/// Replay summary.
#[derive(Debug, Serialize)]
pub struct ReplaySummary {
    /// Output directory.
    pub out: String,
    /// Frames written.
    pub frames_written: usize,
    /// Clock time of the last frame in milliseconds.
    pub duration_ms: u64,
    /// Records left in the chart.
    pub records: usize,
    /// Feed batches applied.
    pub batches_applied: u64,
    /// Change events applied.
    pub events_applied: u64,
    /// Malformed events recovered from.
    pub recovered_events: u64,
    /// Reconciliation cycles.
    pub cycles: u64,
    /// Elements created.
    pub elements_entered: u64,
    /// Elements destroyed.
    pub elements_exited: u64,
    /// Removal requests sent.
    pub clicks: u64,
}

impl ReplaySummary {
    fn new(out: &Path, frames_written: usize, at: Duration, records: usize, stats: &ChartStats) -> Self {
        Self {
            out: out.display().to_string(),
            frames_written,
            duration_ms: u64::try_from(at.as_millis()).unwrap_or(u64::MAX),
            records,
            batches_applied: stats.batches_applied,
            events_applied: stats.events_applied,
            recovered_events: stats.recovered_events(),
            cycles: stats.cycles,
            elements_entered: stats.elements_entered,
            elements_exited: stats.elements_exited,
            clicks: stats.clicks,
        }
    }
}

/// Runs the replay command.
pub fn run(
    script_path: &Path,
    out: &Path,
    fps: u32,
    final_only: bool,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    frame_interval(fps)?;
    let script = Script::load(script_path)?;
    std::fs::create_dir_all(out)?;

    let summary = replay(&script, out, fps, final_only)?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        _ => print_text_output(&summary),
    }

    Ok(())
}

/// Time between frames at `fps`.
///
/// Rejects rates whose interval is zero, which would stop the clock.
fn frame_interval(fps: u32) -> Result<Duration, Box<dyn std::error::Error>> {
    match Duration::from_secs(1).checked_div(fps) {
        Some(interval) if !interval.is_zero() => Ok(interval),
        _ => Err(format!("fps must be between 1 and 1000000000, got {fps}").into()),
    }
}

/// Drives the chart through `script` on a fixed-rate clock.
///
/// Steps due at or before a frame run at their own timestamps, then the
/// frame is ticked and rendered. The clock stops once every step has run
/// and every transition has settled.
pub fn replay(
    script: &Script,
    out: &Path,
    fps: u32,
    final_only: bool,
) -> Result<ReplaySummary, Box<dyn std::error::Error>> {
    let config = ChartConfig::default();
    let collection = Arc::new(InMemoryCollection::new(Arc::new(ChangeFeed::new())));
    let mut adapter = FeedAdapter::subscribe(collection.feed());
    let mut chart: ReplayChart = DonutChart::new(
        config.clone(),
        OrdinalScale::default(),
        SliceInteractions::new(Arc::clone(&collection)),
    )?;
    let mut surface = SvgSurface::new(config.outer_radius);

    let interval = frame_interval(fps)?;
    let mut steps = script.steps.iter().peekable();
    let mut frame: u32 = 0;
    let mut written = 0;

    let last_at = loop {
        let now = interval * frame;
        while let Some(step) = steps.next_if(|step| step.at() <= now) {
            run_step(&mut chart, &collection, &mut adapter, &step.action, step.at());
        }
        chart.tick(now);

        let settled = steps.peek().is_none() && !chart.is_animating();
        if !final_only || settled {
            render_frame(&chart, &mut surface)?;
            write_frame(out, written, &surface)?;
            written += 1;
        }
        if settled {
            break now;
        }
        frame += 1;
    };

    info!(frames = written, "replay finished");
    Ok(ReplaySummary::new(
        out,
        written,
        last_at,
        chart.store().len(),
        chart.stats(),
    ))
}

fn run_step(
    chart: &mut ReplayChart,
    collection: &InMemoryCollection,
    adapter: &mut FeedAdapter,
    action: &Action,
    at: Duration,
) {
    let result = match action {
        Action::Batch(events) => {
            let sequence = collection.publish(events.clone());
            debug!(sequence, "published batch");
            Ok(())
        }
        Action::Hover(id) => chart.hover(id, at),
        Action::HoverEnd(id) => chart.hover_end(id, at),
        Action::Click(id) => chart.click(id, at),
    };
    if let Err(e) = result {
        warn!(error = %e, "step skipped");
    }
    // Clicks publish removals through the collection; apply them now.
    adapter.pump(chart, at);
}

fn render_frame(chart: &ReplayChart, surface: &mut SvgSurface) -> Result<(), Box<dyn std::error::Error>> {
    let mut legend: Vec<LegendEntry> = Vec::new();
    for element in chart.reconciler().elements() {
        if element.phase() == Phase::Exiting {
            continue;
        }
        let name = &element.record().name;
        if legend.iter().all(|entry| &entry.name != name) {
            legend.push(LegendEntry {
                name: name.clone(),
                color: element.base_color(),
            });
        }
    }
    surface.set_legend(legend);
    chart.render(surface)?;
    Ok(())
}

fn write_frame(out: &Path, index: usize, surface: &SvgSurface) -> Result<(), Box<dyn std::error::Error>> {
    let document = surface.document().ok_or("surface produced no document")?;
    std::fs::write(out.join(format!("frame_{index:04}.svg")), document)?;
    Ok(())
}

fn print_text_output(summary: &ReplaySummary) {
    println!("Replay Summary");
    println!("==============");
    println!("Output:            {}", summary.out);
    println!("Frames written:    {}", summary.frames_written);
    println!("Duration:          {} ms", summary.duration_ms);
    println!("Records:           {}", summary.records);
    println!();
    println!("Batches applied:   {}", summary.batches_applied);
    println!("Events applied:    {}", summary.events_applied);
    println!("Recovered events:  {}", summary.recovered_events);
    println!("Cycles:            {}", summary.cycles);
    println!("Elements entered:  {}", summary.elements_entered);
    println!("Elements exited:   {}", summary.elements_exited);
    println!("Removal requests:  {}", summary.clicks);
}
