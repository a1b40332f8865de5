use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// A transaction amount as exported by the bank. Debits are already negative
/// in the source format and the sign is carried through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Amount(Decimal);

impl Amount {
    /// Parses an export amount such as `$-1,234.50`. Dollar signs and thousands
    /// separators are dropped before parsing.
    pub fn parse_export(s: &str) -> Option<Self> {
        let cleaned = s.replace(['$', ','], "");
        Decimal::from_str(cleaned.trim())
            .ok()
            .map(Self::from_decimal)
    }

    pub fn from_decimal(decimal: Decimal) -> Self {
        Amount(decimal.normalize())
    }

    pub fn is_negative(self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }
}

/// Canonical rendering: no currency symbol, no grouping, no trailing zeros.
impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
