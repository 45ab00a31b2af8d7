//! Plotting adaptor over the serialized document.
//!
//! The adaptor knows nothing about the optimizer: it scans a document for
//! `_d`/`_dd` asset groups, collects every `_k` time series inside them, and
//! draws one chart per group against the time axis reconstructed from
//! `start_time_i` and `delta_t_i`.

use std::path::{Path, PathBuf};

use enduser_model::Document;
use indexmap::IndexMap;
use plotters::prelude::*;
use serde_json::Value;

/// All `_k` series of one asset group, keyed by series name.
type SeriesGroup = IndexMap<String, Vec<f64>>;

fn series_of(doc: &Document) -> SeriesGroup {
    let mut group = SeriesGroup::new();
    for (key, value) in doc {
        if !key.ends_with("_k") {
            continue;
        }
        if let Some(entries) = value.as_array() {
            let series: Vec<f64> = entries
                .iter()
                .map(|v| match v {
                    Value::Null => f64::NAN,
                    other => other.as_f64().unwrap_or(f64::NAN),
                })
                .collect();
            if !series.is_empty() {
                group.insert(key.trim_end_matches("_k").to_string(), series);
            }
        }
    }
    group
}

/// Collects every asset group of the document, flattened to
/// `"<list>.<index>"` names (`"heatnodes.<i>.<list>.<j>"` for heat nodes).
fn collect_groups(data: &Document) -> IndexMap<String, SeriesGroup> {
    let mut groups = IndexMap::new();

    for (key, value) in data {
        let Some(entries) = value.as_object() else {
            continue;
        };

        if let Some(list) = key.strip_suffix("_dd") {
            for (index, node) in entries {
                let Some(node) = node.as_object() else {
                    continue;
                };
                for (inner_key, inner_value) in node {
                    let (Some(inner_list), Some(inner_entries)) =
                        (inner_key.strip_suffix("_d"), inner_value.as_object())
                    else {
                        continue;
                    };
                    for (inner_index, asset) in inner_entries {
                        if let Some(asset) = asset.as_object() {
                            let series = series_of(asset);
                            if !series.is_empty() {
                                groups.insert(
                                    format!("{list}.{index}.{inner_list}.{inner_index}"),
                                    series,
                                );
                            }
                        }
                    }
                }
            }
        } else if let Some(list) = key.strip_suffix("_d") {
            for (index, asset) in entries {
                if let Some(asset) = asset.as_object() {
                    let series = series_of(asset);
                    if !series.is_empty() {
                        groups.insert(format!("{list}.{index}"), series);
                    }
                }
            }
        }
    }

    groups
}

fn plot_group(
    name: &str,
    group: &SeriesGroup,
    delta_t: f64,
    filename: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let steps = group.values().map(Vec::len).max().unwrap_or(0);
    let t_max = steps as f64 * delta_t;
    let finite = group
        .values()
        .flatten()
        .copied()
        .filter(|v| v.is_finite());
    let y_min = finite.clone().fold(f64::INFINITY, f64::min).min(0.0);
    let y_max = finite.fold(f64::NEG_INFINITY, f64::max).max(1.0);

    let root = BitMapBackend::new(filename, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(name, ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..t_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Time since start [h]")
        .y_desc("Value")
        .draw()?;

    for (i, (label, series)) in group.iter().enumerate() {
        let color = Palette99::pick(i).to_rgba();
        chart
            .draw_series(LineSeries::new(
                series
                    .iter()
                    .enumerate()
                    .filter(|(_, y)| y.is_finite())
                    .map(|(k, &y)| (k as f64 * delta_t, y)),
                &color,
            ))?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

/// Renders every asset group of a serialized end user into `out_dir`, one
/// PNG per group, and returns the written paths.
pub fn plot_document(
    data: &Document,
    out_dir: &Path,
) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let delta_t = data
        .get("delta_t_i")
        .and_then(Value::as_f64)
        .unwrap_or(1.0);

    std::fs::create_dir_all(out_dir)?;

    let mut written = Vec::new();
    for (name, group) in collect_groups(data) {
        let filename = out_dir.join(format!("{}.png", name.replace('.', "_")));
        plot_group(&name, &group, delta_t, &filename)?;
        written.push(filename);
    }

    Ok(written)
}
