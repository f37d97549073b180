//! Plain-text rendering of dashboard views.

use county_atlas_dashboard::{DashboardController, DashboardError};
use county_atlas_dashboard_models::view::{DashboardView, MapArtifact, TrendChart};
use county_atlas_statistics_models::period_label;

/// Prints the loaded data set and the selectable options.
pub fn print_summary(controller: &DashboardController) -> Result<(), DashboardError> {
    let boundaries = controller.boundaries()?;
    let table = controller.statistics()?;
    let labels = controller.time_labels()?;

    println!("Counties:   {}", boundaries.len());
    println!("States:     {}", boundaries.states().len());
    println!("Rows:       {}", table.len());
    println!(
        "Periods:    {} ({} .. {})",
        labels.len(),
        labels.first().map_or("-", String::as_str),
        labels.last().map_or("-", String::as_str)
    );
    println!();

    if let Some(map) = controller.current_view()?.as_map() {
        print_map(map, 5);
    }
    Ok(())
}

/// Prints whichever view the dashboard produced.
pub fn print_view(view: &DashboardView) {
    match view {
        DashboardView::Map(map) => print_map(map, 10),
        DashboardView::Trend(chart) => print_trend(chart),
        DashboardView::NoData { reason } => println!("No data: {reason}"),
    }
}

/// Prints a map's legend, summary, and top counties.
pub fn print_map(map: &MapArtifact, top: usize) {
    println!("{}, {}", map.metric.label(), period_label(map.date));
    println!(
        "{} counties, {} with data, {} without",
        map.features.len(),
        map.styled_count(),
        map.no_data_count()
    );

    if let Some(summary) = &map.summary {
        println!(
            "min {:.2}  max {:.2}  mean {:.2}  median {:.2}",
            summary.min, summary.max, summary.mean, summary.median
        );
    }

    if !map.legend.is_empty() {
        println!();
        println!("Legend:");
        for entry in &map.legend {
            println!(
                "  [{}] {}  {:>14.2} .. {:<14.2}",
                entry.index, entry.color, entry.lower, entry.upper
            );
        }
    }

    let ranked = map.top_counties(top);
    if !ranked.is_empty() {
        println!();
        println!("Top {}:", ranked.len());
        for (rank, county) in ranked.iter().enumerate() {
            println!(
                "  {:>3}. {:<40} {:>14.2}",
                rank + 1,
                format!("{}, {}", county.county, county.state),
                county.value
            );
        }
    }
}

/// Prints each series as a column of dated values.
pub fn print_trend(chart: &TrendChart) {
    println!("{}", chart.metric.label());
    for series in &chart.series {
        println!();
        match series.percent_change() {
            Some(change) => println!("{} ({change:+.1}%)", series.label),
            None => println!("{}", series.label),
        }
        for point in &series.points {
            println!("  {}  {:>14.2}", period_label(point.date), point.value);
        }
    }
}
