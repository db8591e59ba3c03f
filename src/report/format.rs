//! Display formatting for the French-language dashboard

use crate::metrics::{Metric, PeriodKey, YearMonth};

pub const MONTH_NAMES: [&str; 12] = [
    "Janvier",
    "Février",
    "Mars",
    "Avril",
    "Mai",
    "Juin",
    "Juillet",
    "Août",
    "Septembre",
    "Octobre",
    "Novembre",
    "Décembre",
];

/// fr-FR digit group separator (narrow no-break space)
const GROUP_SEPARATOR: char = '\u{202f}';

pub fn month_name(month: YearMonth) -> &'static str {
    MONTH_NAMES[(month.month() - 1) as usize]
}

/// "Janvier 2025" for a month, "2025" for a year
pub fn period_label(period: PeriodKey) -> String {
    match period {
        PeriodKey::Month(month) => format!("{} {}", month_name(month), month.year()),
        PeriodKey::Year(year) => format!("{year:04}"),
    }
}

pub fn metric_title(metric: Metric) -> &'static str {
    match metric {
        Metric::Visits => "Visites",
        Metric::PageViews => "Pages vues",
        Metric::BounceRate => "Taux de rebond",
        Metric::AvgDuration => "Durée moyenne",
        Metric::AvgActions => "Actions moyennes",
        Metric::Downloads => "Téléchargements",
    }
}

pub fn format_number(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 * 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(c);
    }
    out
}

/// One decimal, "+" only for positive values
pub fn format_variation(value: f64) -> String {
    let sign = if value > 0.0 { "+" } else { "" };
    format!("{sign}{value:.1}%")
}

/// "M min S s", rounding to whole seconds first
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    format!("{} min {} s", total / 60, total % 60)
}

/// Fraction rendered as a percentage with the given decimals
pub fn format_share(fraction: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, fraction * 100.0)
}

/// KPI value as shown on its card
pub fn format_metric(metric: Metric, value: f64) -> String {
    match metric {
        Metric::Visits | Metric::PageViews | Metric::Downloads => {
            format_number(value.max(0.0).round() as u64)
        }
        Metric::BounceRate => format!("{value:.1}%"),
        Metric::AvgDuration => format_duration(value),
        Metric::AvgActions => format!("{value:.1}"),
    }
}
