use std::path::Path;

use benchplot::elements::SeriesIndex;

/// Writes the four snapshot files the space-consumption and recording-speed benchmarks produce,
/// covering every built-in series except the last one.
#[allow(dead_code)]
pub fn write_snapshot_files(dir: &Path) -> anyhow::Result<()> {
    let index = SeriesIndex::builtin();
    let entries = &index.entries()[..index.len() - 1];

    for (file_name, scale) in [
        ("memory-footprint-jol.txt", 1.0),
        ("serialization-size-compressed.txt", 0.25),
        ("serialization-size-raw.txt", 0.75),
    ] {
        let mut content = String::new();
        for (i, entry) in entries.iter().enumerate() {
            content.push_str(&format!("{};{}\n", entry.display_name, (i + 1) as f64 * 10.5 * scale));
        }
        content.push_str("DDSketch (sparse, log);99.0\n");
        std::fs::write(dir.join(file_name), content)?;
    }

    let mut content = String::from("Benchmark  Mode  Cnt  Score  Error  Units\n");
    for (i, entry) in entries.iter().enumerate() {
        content.push_str(&format!(
            "RecordingSpeedBenchmark.record{}  avgt  10  {:.3} ± 0.123  ns/op\n",
            entry.result_key,
            20.0 + i as f64
        ));
    }
    std::fs::write(dir.join("recording-speed.txt"), content)?;
    Ok(())
}

#[allow(dead_code)]
pub fn jmh_record(benchmark: &str, params: &str, unit: &str, score: f64) -> String {
    format!(
        r#"{{
    "jmhVersion" : "1.35",
    "benchmark" : "{benchmark}",
    "mode" : "avgt",
    "threads" : 1,
    "forks" : 1,
    "params" : {params},
    "primaryMetric" : {{
        "score" : {score},
        "scoreError" : 0.5,
        "scoreConfidence" : [ {lower}, {upper} ],
        "scoreUnit" : "{unit}"
    }},
    "secondaryMetrics" : {{}}
}}"#,
        benchmark = benchmark,
        params = params,
        score = score,
        lower = score - 0.5,
        upper = score + 0.5,
        unit = unit,
    )
}

#[allow(dead_code)]
pub fn write_result_file(dir: &Path, file_name: &str, records: &[String]) -> anyhow::Result<()> {
    std::fs::write(dir.join(file_name), format!("[\n{}\n]\n", records.join(",\n")))?;
    Ok(())
}
