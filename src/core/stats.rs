//! Pure calculations behind the dashboard display.
//!
//! Nothing here performs I/O; every function works on a snapshot of the
//! amount, spot rate and history series.

use super::rates::HistorySeries;
use super::selection::Amount;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Conversion {
    Converted(f64),
    RateUnavailable,
    InvalidAmount,
}

impl Conversion {
    pub fn value(&self) -> Option<f64> {
        match self {
            Conversion::Converted(v) => Some(*v),
            _ => None,
        }
    }
}

/// Summary of a rate series. All values are taken from the series itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateStats {
    pub high: f64,
    pub low: f64,
    pub average: f64,
    pub first: f64,
    pub last: f64,
    /// Change from the first to the last rate in percent, if the first rate is non-zero.
    pub change_percent: Option<f64>,
}

/// Everything the presentation layer needs, computed from one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedView {
    pub conversion: Conversion,
    pub unit_rate: Option<f64>,
    pub stats: Option<RateStats>,
    pub chart: Option<HistorySeries>,
}

pub fn convert(amount: &Amount, rate: Option<f64>) -> Conversion {
    match (amount.value(), rate) {
        (None, _) => Conversion::InvalidAmount,
        (Some(_), None) => Conversion::RateUnavailable,
        (Some(a), Some(r)) => {
            let converted = a * r;
            if converted.is_finite() {
                Conversion::Converted(converted)
            } else {
                Conversion::InvalidAmount
            }
        }
    }
}

pub fn summarize(rates: &[f64]) -> Option<RateStats> {
    let (&first, &last) = (rates.first()?, rates.last()?);

    let high = rates.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let low = rates.iter().copied().fold(f64::INFINITY, f64::min);
    let average = rates.iter().sum::<f64>() / rates.len() as f64;
    // Rounding in the mean can nudge it a hair outside [low, high]
    let average = average.clamp(low, high);

    let change_percent = (first != 0.0).then(|| (last - first) / first * 100.0);

    Some(RateStats {
        high,
        low,
        average,
        first,
        last,
        change_percent,
    })
}

pub fn derive(amount: &Amount, rate: Option<f64>, history: Option<&HistorySeries>) -> DerivedView {
    let history = history.filter(|h| !h.is_empty());
    DerivedView {
        conversion: convert(amount, rate),
        unit_rate: rate,
        stats: history.and_then(|h| summarize(&h.rates())),
        chart: history.cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rates::RatePoint;
    use chrono::NaiveDate;

    fn series(rates: &[f64]) -> HistorySeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let points = rates
            .iter()
            .enumerate()
            .map(|(i, rate)| RatePoint {
                date: start + chrono::Duration::days(i as i64),
                rate: *rate,
            })
            .collect();
        HistorySeries::new("USD", "KRW", points)
    }

    #[test]
    fn test_convert() {
        assert_eq!(
            convert(&Amount::from(1000.0), Some(1350.25)),
            Conversion::Converted(1_350_250.0)
        );
        assert_eq!(
            convert(&Amount::from(1000.0), None),
            Conversion::RateUnavailable
        );
        assert_eq!(
            convert(&Amount::parse("abc"), Some(1.5)),
            Conversion::InvalidAmount
        );
        assert_eq!(convert(&Amount::parse("abc"), None), Conversion::InvalidAmount);
    }

    #[test]
    fn test_conversion_is_not_rounded() {
        let result = convert(&Amount::from(3.0), Some(0.333333));
        assert_eq!(result.value(), Some(3.0 * 0.333333));
    }

    #[test]
    fn test_summarize() {
        let stats = summarize(&[1300.0, 1320.0, 1310.0, 1340.0]).unwrap();
        assert_eq!(stats.high, 1340.0);
        assert_eq!(stats.low, 1300.0);
        assert!((stats.average - 1317.5).abs() < 1e-9);
        assert_eq!(stats.first, 1300.0);
        assert_eq!(stats.last, 1340.0);
        assert!((stats.change_percent.unwrap() - 3.076923).abs() < 1e-5);
    }

    #[test]
    fn test_summarize_ordering_holds() {
        for rates in [
            vec![0.1, 0.2, 0.3],
            vec![5.0],
            vec![0.1; 7],
            vec![1.0e-9, 3.0e9, 42.0, 0.5],
            vec![0.9271, 0.9283, 0.9264, 0.9301, 0.9277],
        ] {
            let stats = summarize(&rates).unwrap();
            assert!(stats.low <= stats.average, "{rates:?}");
            assert!(stats.average <= stats.high, "{rates:?}");
            assert!(rates.contains(&stats.high));
            assert!(rates.contains(&stats.low));
        }
    }

    #[test]
    fn test_summarize_empty() {
        assert!(summarize(&[]).is_none());
    }

    #[test]
    fn test_zero_first_rate_has_no_change() {
        let stats = summarize(&[0.0, 1.0]).unwrap();
        assert!(stats.change_percent.is_none());
    }

    #[test]
    fn test_derive_handles_missing_inputs() {
        let view = derive(&Amount::from(10.0), None, None);
        assert_eq!(view.conversion, Conversion::RateUnavailable);
        assert!(view.unit_rate.is_none());
        assert!(view.stats.is_none());
        assert!(view.chart.is_none());

        let empty = series(&[]);
        let view = derive(&Amount::from(10.0), Some(2.0), Some(&empty));
        assert_eq!(view.conversion, Conversion::Converted(20.0));
        assert!(view.stats.is_none());
        assert!(view.chart.is_none());
    }

    #[test]
    fn test_derive_with_history() {
        let history = series(&[1.0, 3.0, 2.0]);
        let view = derive(&Amount::from(2.0), Some(2.5), Some(&history));
        assert_eq!(view.conversion, Conversion::Converted(5.0));
        assert_eq!(view.unit_rate, Some(2.5));
        let stats = view.stats.unwrap();
        assert_eq!((stats.low, stats.high), (1.0, 3.0));
        assert_eq!(view.chart.unwrap().rates(), vec![1.0, 3.0, 2.0]);
    }
}
