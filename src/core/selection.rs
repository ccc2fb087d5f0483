//! User-editable selection: amount, currency pair and lookback period

use super::period::LookbackPeriod;

/// Amount as typed by the user, with its numeric interpretation.
///
/// Text that doesn't parse to a finite number is kept as-is and carried
/// through as an invalid amount rather than rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct Amount {
    text: String,
    value: Option<f64>,
}

impl Amount {
    pub fn parse(text: &str) -> Self {
        let value = text
            .trim()
            .replace(',', "")
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite());
        Amount {
            text: text.to_string(),
            value,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn is_valid(&self) -> bool {
        self.value.is_some()
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Amount {
            text: value.to_string(),
            value: value.is_finite().then_some(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub amount: Amount,
    pub source: String,
    pub target: String,
    pub period: LookbackPeriod,
}

impl Selection {
    pub fn new(amount: Amount, source: &str, target: &str, period: LookbackPeriod) -> Self {
        Selection {
            amount,
            source: normalize_code(source),
            target: normalize_code(target),
            period,
        }
    }

    pub fn is_same_pair(&self) -> bool {
        self.source == self.target
    }
}

impl Default for Selection {
    fn default() -> Self {
        Selection::new(Amount::from(1000.0), "USD", "KRW", LookbackPeriod::Month)
    }
}

pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}
