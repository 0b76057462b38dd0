//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use netk_analysis::{AnalysisReport, IterationDistances};
use netk_domain::{NetworkDistance, PairwiseDistanceSet, Point};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format an analysis report.
    pub fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_report_json(report),
            OutputFormat::Table => Ok(self.format_report_table(report)),
            OutputFormat::Csv => Ok(results_csv(report)),
        }
    }

    fn format_report_json(&self, report: &AnalysisReport) -> Result<String> {
        let verdicts = report.verdicts();
        let results: Vec<serde_json::Value> = report
            .observed
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let mut row = serde_json::json!({
                    "distance_band": r.distance_band,
                    "count": r.count,
                    "k_function": r.k_function,
                });
                if let (Some(envelope), Some(verdicts)) = (&report.envelope, &verdicts) {
                    row["lower_bound"] = envelope[i].lower_bound.into();
                    row["upper_bound"] = envelope[i].upper_bound.into();
                    row["verdict"] = verdicts[i].as_str().into();
                }
                row
            })
            .collect();

        let simulation = report.simulation.as_ref().map(|m| {
            serde_json::json!({
                "attempted": m.attempted,
                "succeeded": m.succeeded,
                "failed": m.failed(),
                "cancelled": m.cancelled,
                "elapsed_secs": m.elapsed.as_secs_f64(),
            })
        });

        let output = serde_json::json!({
            "network_length": report.network_length.value(),
            "point_count": report.point_count,
            "results": results,
            "simulation": simulation,
        });

        Ok(serde_json::to_string_pretty(&output)?)
    }

    fn format_report_table(&self, report: &AnalysisReport) -> String {
        let mut builder = Builder::default();
        let verdicts = report.verdicts();

        match &report.envelope {
            Some(_) => builder.push_record([
                "Distance Band",
                "Count",
                "K-Function",
                "Lower",
                "Upper",
                "Verdict",
            ]),
            None => builder.push_record(["Distance Band", "Count", "K-Function"]),
        }

        for (i, r) in report.observed.iter().enumerate() {
            let mut row = vec![
                r.distance_band.to_string(),
                r.count.to_string(),
                format!("{:.2}", r.k_function),
            ];
            if let (Some(envelope), Some(verdicts)) = (&report.envelope, &verdicts) {
                row.push(format!("{:.2}", envelope[i].lower_bound));
                row.push(format!("{:.2}", envelope[i].upper_bound));
                row.push(verdicts[i].to_string());
            }
            builder.push_record(row);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        let mut lines = vec![
            table.to_string(),
            self.info(&format!(
                "Network length {}, {} points",
                report.network_length, report.point_count
            )),
        ];
        if let Some(metrics) = &report.simulation {
            let summary = format!(
                "{} of {} permutations succeeded in {:.2}s",
                metrics.succeeded,
                metrics.attempted + metrics.cancelled,
                metrics.elapsed.as_secs_f64()
            );
            if metrics.failed() > 0 || metrics.cancelled > 0 {
                lines.push(self.warning(&summary));
            } else {
                lines.push(self.info(&summary));
            }
        }
        lines.join("\n")
    }

    /// Format the network length.
    pub fn format_length(&self, length: f64, nodes: usize, edges: usize) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "network_length": length,
                "nodes": nodes,
                "edges": edges,
            }))?),
            OutputFormat::Csv => Ok(format!("Network_Length,Nodes,Edges\n{},{},{}\n", length, nodes, edges)),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Network Length", "Nodes", "Edges"]);
                builder.push_record([length.to_string(), nodes.to_string(), edges.to_string()]);
                let mut table = builder.build();
                table.with(Style::rounded());
                Ok(table.to_string())
            }
        }
    }

    /// Format every pair of a distance set, unreachable pairs included.
    ///
    /// Point ids are 1-based positions in the points file.
    pub fn format_distances(&self, distances: &PairwiseDistanceSet) -> Result<String> {
        let n = distances.point_count();
        let pairs = (0..n).flat_map(|a| (a + 1..n).map(move |b| (a, b)));

        match self.format {
            OutputFormat::Json => {
                let rows: Vec<serde_json::Value> = pairs
                    .map(|(a, b)| {
                        serde_json::json!({
                            "origin": a + 1,
                            "destination": b + 1,
                            "distance": distances.distance(a, b).value(),
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&rows)?)
            }
            OutputFormat::Csv => {
                let mut out = String::from("OriginID,DestinationID,Total_Length\n");
                for (a, b) in pairs {
                    let length = distances
                        .distance(a, b)
                        .value()
                        .map(|d| d.to_string())
                        .unwrap_or_default();
                    out.push_str(&format!("{},{},{}\n", a + 1, b + 1, length));
                }
                Ok(out)
            }
            OutputFormat::Table => {
                if n < 2 {
                    return Ok(self.colorize("No point pairs.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["Origin", "Destination", "Distance"]);
                for (a, b) in pairs {
                    let distance = match distances.distance(a, b) {
                        NetworkDistance::Reachable(d) => format!("{:.2}", d),
                        NetworkDistance::Unreachable => "unreachable".to_string(),
                    };
                    builder.push_record([(a + 1).to_string(), (b + 1).to_string(), distance]);
                }
                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                Ok(format!(
                    "{}\n{}",
                    table,
                    self.info(&format!(
                        "{} reachable, {} unreachable",
                        distances.reachable_pairs(),
                        distances.unreachable_pairs()
                    ))
                ))
            }
        }
    }

    /// Format generated points.
    pub fn format_points(&self, points: &[Point]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(netk_network::model::points_to_json(points)?),
            OutputFormat::Csv => {
                let mut out = String::from("X,Y\n");
                for p in points {
                    out.push_str(&format!("{},{}\n", p.x, p.y));
                }
                Ok(out)
            }
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["#", "X", "Y"]);
                for (i, p) in points.iter().enumerate() {
                    builder.push_record([(i + 1).to_string(), format!("{:.3}", p.x), format!("{:.3}", p.y)]);
                }
                let mut table = builder.build();
                table.with(Style::rounded());
                Ok(table.to_string())
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Results table as CSV.
///
/// Columns `Distance_Band,Point_Count,K_Function`, plus
/// `Lower_Bound,Upper_Bound` when an envelope was computed.
pub fn results_csv(report: &AnalysisReport) -> String {
    let mut out = String::new();
    match &report.envelope {
        Some(_) => out.push_str("Distance_Band,Point_Count,K_Function,Lower_Bound,Upper_Bound\n"),
        None => out.push_str("Distance_Band,Point_Count,K_Function\n"),
    }

    for (i, r) in report.observed.iter().enumerate() {
        out.push_str(&format!("{},{},{}", r.distance_band, r.count, r.k_function));
        if let Some(envelope) = &report.envelope {
            out.push_str(&format!(",{},{}", envelope[i].lower_bound, envelope[i].upper_bound));
        }
        out.push('\n');
    }
    out
}

/// Write the results table to a CSV file.
pub fn write_results_csv(path: &Path, report: &AnalysisReport) -> io::Result<()> {
    fs::write(path, results_csv(report))
}

/// Write retained distance sets to a CSV file.
///
/// One row per reachable pair per iteration; iteration 0 is the observed
/// points. Point ids are 1-based.
pub fn write_odcm_csv(path: &Path, sets: &[IterationDistances]) -> io::Result<()> {
    let mut f = BufWriter::new(File::create(path)?);
    writeln!(f, "Iteration_Number,OriginID,DestinationID,Total_Length")?;
    for set in sets {
        for (a, b, d) in set.distances.reachable_iter() {
            writeln!(f, "{},{},{},{}", set.iteration, a + 1, b + 1, d)?;
        }
    }
    f.flush()
}
