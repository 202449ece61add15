//! Hottest-day report
//!
//! Finds the overall maximum of the aggregated rows and returns every row
//! that reaches it. Ties are all kept.

use crate::models::{DailyMaximum, HottestDay};
use colored::*;
use tracing::info;

/// Every aggregated row whose maximum equals the overall maximum, in key order
pub fn hottest_days(rows: &[DailyMaximum]) -> Vec<HottestDay> {
    let Some(hottest) = rows
        .iter()
        .map(|row| row.max_screen_temperature)
        .filter(|value| !value.is_nan())
        .reduce(f64::max)
    else {
        return Vec::new();
    };

    let mut days: Vec<HottestDay> = rows
        .iter()
        .filter(|row| row.max_screen_temperature == hottest)
        .map(HottestDay::from)
        .collect();
    days.sort_by(|a, b| a.key.cmp(&b.key));
    days
}

/// Log the report, one line per hottest row
pub fn log_hottest_days(days: &[HottestDay]) {
    if days.is_empty() {
        info!("No hottest day: no aggregated rows");
        return;
    }

    for day in days {
        info!(
            "Hottest day: date={} country={} region={} site={} max_temp={}",
            or_null(&day.key.observation_date),
            or_null(&day.key.country),
            or_null(&day.key.region),
            or_null(&day.key.site_name),
            day.max_screen_temperature
        );
    }
}

/// Print the report as a table on stdout
pub fn print_hottest_days(days: &[HottestDay]) {
    println!("\n{}", "Hottest Day".bright_green().bold());
    if days.is_empty() {
        println!("  {}", "No aggregated rows".bright_black());
        return;
    }

    println!(
        "  {:<22} {:<16} {:<24} {:<28} {}",
        "Hottest_Date".bright_cyan(),
        "Hottest_Country".bright_cyan(),
        "Hottest_Region".bright_cyan(),
        "Hottest_Site".bright_cyan(),
        "Max_Temp".bright_cyan()
    );
    for day in days {
        println!(
            "  {:<22} {:<16} {:<24} {:<28} {}",
            or_null(&day.key.observation_date),
            or_null(&day.key.country),
            or_null(&day.key.region),
            or_null(&day.key.site_name),
            day.max_screen_temperature.to_string().bright_white().bold()
        );
    }
}

fn or_null(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("<null>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GroupKey;

    fn row(country: &str, region: &str, site: &str, date: &str, max: f64) -> DailyMaximum {
        DailyMaximum {
            key: GroupKey {
                country: Some(country.to_string()),
                region: Some(region.to_string()),
                site_name: Some(site.to_string()),
                observation_date: Some(date.to_string()),
            },
            max_screen_temperature: max,
        }
    }

    #[test]
    fn test_single_hottest_row() {
        let rows = vec![
            row("US", "West", "A", "2020-01-01", 12.0),
            row("UK", "East", "B", "2020-01-02", 15.8),
            row("UK", "East", "B", "2020-01-03", -1.0),
        ];

        let days = hottest_days(&rows);

        assert_eq!(days.len(), 1);
        assert_eq!(days[0].max_screen_temperature, 15.8);
        assert_eq!(days[0].key.observation_date.as_deref(), Some("2020-01-02"));
    }

    #[test]
    fn test_ties_are_all_returned() {
        let rows = vec![
            row("US", "West", "A", "d1", 20.0),
            row("FR", "South", "C", "d3", 19.9),
            row("UK", "East", "B", "d2", 20.0),
        ];

        let days = hottest_days(&rows);

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].key.country.as_deref(), Some("UK"));
        assert_eq!(days[1].key.country.as_deref(), Some("US"));
        assert!(days.iter().all(|d| d.max_screen_temperature == 20.0));
    }

    #[test]
    fn test_empty_input_gives_empty_report() {
        assert!(hottest_days(&[]).is_empty());
    }

    #[test]
    fn test_input_is_not_modified() {
        let rows = vec![
            row("US", "West", "A", "d1", 20.0),
            row("UK", "East", "B", "d2", 10.0),
        ];
        let before = rows.clone();

        let _ = hottest_days(&rows);

        assert_eq!(rows, before);
    }

    #[test]
    fn test_negative_maximum() {
        let rows = vec![
            row("NO", "North", "A", "d1", -12.0),
            row("NO", "North", "B", "d1", -3.5),
        ];

        let days = hottest_days(&rows);

        assert_eq!(days.len(), 1);
        assert_eq!(days[0].max_screen_temperature, -3.5);
    }

    #[test]
    fn test_null_key_parts_render_as_placeholder() {
        let mut hottest = row("US", "West", "A", "d1", 20.0);
        hottest.key.country = None;
        let days = hottest_days(&[hottest]);

        assert_eq!(or_null(&days[0].key.country), "<null>");
        assert_eq!(or_null(&days[0].key.site_name), "A");

        log_hottest_days(&days);
        print_hottest_days(&days);
        log_hottest_days(&[]);
    }
}
