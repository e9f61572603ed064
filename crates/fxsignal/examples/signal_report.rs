//! Signal Report Example
//!
//! Builds a small daily series, runs the full analysis and prints the
//! latest indicator values with the resulting signal.
//!
//! Run with: `cargo run --example signal_report`

use chrono::NaiveDate;
use fxsignal::prelude::*;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let closes = [
        1.0842, 1.0859, 1.0871, 1.0866, 1.0893, 1.0910, 1.0902, 1.0925, 1.0941, 1.0938, 1.0962,
        1.0979, 1.0990, 1.1004, 1.1021, 1.1015, 1.1036, 1.1049, 1.1058, 1.1072, 1.1085, 1.1079,
        1.1093, 1.1108, 1.1120, 1.1117, 1.1131, 1.1146, 1.1152, 1.1160, 1.1098,
    ];
    let start = NaiveDate::from_ymd_opt(2024, 6, 3).ok_or("invalid start date")?;
    let series: TimeSeries = closes
        .iter()
        .zip(start.iter_days())
        .map(|(&c, date)| Bar::new(date, c, c + 0.0025, c - 0.0025, c))
        .collect();

    let analysis = analyze(&series, &AnalysisConfig::default())?;

    println!("Bars: {}", series.len());
    println!("Highest high:  {:.4}", analysis.metrics.highest_high);
    println!("Lowest low:    {:.4}", analysis.metrics.lowest_low);
    println!("Average range: {:.4}", analysis.metrics.average_range);
    println!();

    for ma in &analysis.moving_averages {
        match ma.values.latest() {
            Some(v) => println!("SMA({}): {v:.4}", ma.window),
            None => println!("SMA({}): not enough data", ma.window),
        }
    }

    let fmt = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{v:.5}"));
    println!("Upper band:  {}", fmt(analysis.bollinger.upper.latest()));
    println!("Lower band:  {}", fmt(analysis.bollinger.lower.latest()));
    println!("MACD:        {}", fmt(analysis.macd.macd_line.latest()));
    println!("Signal line: {}", fmt(analysis.macd.signal_line.latest()));
    println!("RSI:         {}", fmt(analysis.rsi.latest()));
    println!();
    println!("Signal: {} ({})", analysis.signal.label, analysis.signal.reason);

    Ok(())
}
