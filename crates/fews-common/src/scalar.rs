//! Raw scalar cells as returned by the remote tabular source.

use serde::{Deserialize, Serialize};

use crate::error::{FewsError, FewsResult};

/// A single cell from a remote result row.
///
/// The remote protocol is untyped; a column can hold integers, floats,
/// strings or nothing at all depending on the query. Rows arrive as
/// `Vec<Vec<Scalar>>` and are coerced by the row mapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Borrow the cell as a string slice, if it is textual.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Render the cell as the string the remote would print.
    ///
    /// Null renders as the empty string; identifiers coming back as
    /// integers (some sources number their filters) keep their digits.
    pub fn to_text(&self) -> String {
        match self {
            Scalar::Null => String::new(),
            Scalar::Bool(b) => b.to_string(),
            Scalar::Int(i) => i.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Text(s) => s.clone(),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Int(i) => Some(*i),
            Scalar::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            Scalar::Text(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Coerce to a float, or fail with the column name in the message.
    pub fn to_f64(&self, column: &str) -> FewsResult<f64> {
        let value = match self {
            Scalar::Int(i) => Some(*i as f64),
            Scalar::Float(f) => Some(*f),
            Scalar::Text(s) => s.trim().parse().ok(),
            _ => None,
        };
        value.ok_or_else(|| {
            FewsError::MalformedResponse(format!(
                "column '{}' holds non-numeric value {:?}",
                column, self
            ))
        })
    }

    /// Like `to_f64` but maps Null to None instead of failing.
    pub fn to_f64_opt(&self, column: &str) -> FewsResult<Option<f64>> {
        if self.is_null() {
            return Ok(None);
        }
        self.to_f64(column).map(Some)
    }

    /// Optional text: Null maps to None, everything else to its text form.
    pub fn to_text_opt(&self) -> Option<String> {
        if self.is_null() {
            None
        } else {
            Some(self.to_text())
        }
    }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Scalar::Int(i)
    }
}

impl From<f64> for Scalar {
    fn from(f: f64) -> Self {
        Scalar::Float(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_coercions() {
        assert_eq!(Scalar::Int(42).to_text(), "42");
        assert_eq!(Scalar::Null.to_text(), "");
        assert_eq!(Scalar::Text("H.meting".into()).as_text(), Some("H.meting"));
        assert_eq!(Scalar::Null.to_text_opt(), None);
    }

    #[test]
    fn test_numeric_coercions() {
        assert_eq!(Scalar::Int(3).to_f64("x").unwrap(), 3.0);
        assert_eq!(Scalar::Text("4.25".into()).to_f64("x").unwrap(), 4.25);
        assert_eq!(Scalar::Null.to_f64_opt("x").unwrap(), None);
        assert!(Scalar::Text("north".into()).to_f64("longitude").is_err());
    }

    #[test]
    fn test_untagged_json_roundtrip() {
        let row = vec![
            Scalar::Text("1".into()),
            Scalar::Float(52.37),
            Scalar::Null,
        ];
        let json = serde_json::to_string(&row).unwrap();
        let back: Vec<Scalar> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, row);
    }
}
