// Local pipeline example: map, sort and reduce in one process
// Author: Gabriel Demetrios Lafis

use rust_streaming_stats::{
    data::ResultLine,
    monitor::{ResourceMonitor, SystemSampler},
    processing::{Emitter, Reducer, Statistic},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // One value per line, as produced by the extract subcommand
    let raw = "\
120.5
89.99
abc
310.0
45.25

77.0
1520.75
64.5
";

    // Map
    let mut mapped = Vec::new();
    let emitted = Emitter::default().run(raw.as_bytes(), &mut mapped)?;
    println!("Emitted {} records, skipped {} lines", emitted.emitted, emitted.skipped);

    // Stand-in for the shuffle stage: group records by key
    let mut lines: Vec<&str> = std::str::from_utf8(&mapped)?.lines().collect();
    lines.sort_by_key(|line| line.split('\t').next().unwrap_or_default());
    let shuffled = lines.join("\n");

    // Reduce, once per statistic
    for statistic in Statistic::ALL {
        let mut monitor = ResourceMonitor::new(SystemSampler::new()?);
        monitor.start();

        let mut output = Vec::new();
        let outcome = Reducer::from_selector(statistic.name())?.run(shuffled.as_bytes(), &mut output)?;
        let summary = monitor.stop(outcome.records);

        let result = ResultLine::parse(std::str::from_utf8(&output)?)?;
        println!(
            "{:<12} {:<20} {:>24} ({:.3} ms, {:.1} MB)",
            statistic.name(),
            result.label,
            result.value,
            summary.runtime_seconds * 1000.0,
            summary.max_memory_mb
        );
    }

    Ok(())
}
