use crate::grid::CellValue;
use std::fmt;
pub const TIMESTAMP_THRESHOLD: f64 = 1e9;
pub const MAGNITUDE_LIMIT: f64 = 1e10;
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Classification {
    Admissible(f64),
    Inadmissible(InadmissibleReason),
}
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InadmissibleReason {
    Empty,
    NotNumeric,
    NotFinite,
    NonPositive,
    TooLarge,
    LikelyTimestamp,
}
impl fmt::Display for InadmissibleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Empty => "空单元格",
            Self::NotNumeric => "非数值",
            Self::NotFinite => "非有限数",
            Self::NonPositive => "非正数",
            Self::TooLarge => "数值过大",
            Self::LikelyTimestamp => "疑似时间戳",
        };
        f.write_str(text)
    }
}
pub fn classify(value: &CellValue) -> Classification {
    let parsed = match value {
        CellValue::Empty => return Classification::Inadmissible(InadmissibleReason::Empty),
        CellValue::Number(v) => *v,
        CellValue::Text(text) => match parse_number_text(text) {
            Some(v) => v,
            None => return Classification::Inadmissible(InadmissibleReason::NotNumeric),
        },
        CellValue::Bool(_) | CellValue::DateTime(_) | CellValue::Error(_) => {
            return Classification::Inadmissible(InadmissibleReason::NotNumeric);
        }
    };
    classify_number(parsed)
}
pub fn classify_number(v: f64) -> Classification {
    let reason = if v.is_nan() {
        InadmissibleReason::NotFinite
    } else if v <= 0.0 {
        InadmissibleReason::NonPositive
    } else if v >= MAGNITUDE_LIMIT {
        InadmissibleReason::TooLarge
    } else if v > TIMESTAMP_THRESHOLD {
        InadmissibleReason::LikelyTimestamp
    } else {
        return Classification::Admissible(v);
    };
    Classification::Inadmissible(reason)
}
fn parse_number_text(text: &str) -> Option<f64> {
    let t = text.trim();
    if t.is_empty() {
        return None;
    }
    t.parse::<f64>().ok()
}
#[cfg(test)]
mod tests {
    use super::{Classification, InadmissibleReason, classify, classify_number};
    use crate::grid::CellValue;
    fn reason_of(value: &CellValue) -> Option<InadmissibleReason> {
        match classify(value) {
            Classification::Admissible(_) => None,
            Classification::Inadmissible(reason) => Some(reason),
        }
    }
    #[test]
    fn admissible_range_is_identity() {
        for v in [1e-9, 0.5, 1.0, 1000.5, 2500.0, 999_999_999.0, 1e9] {
            assert_eq!(
                classify(&CellValue::Number(v)),
                Classification::Admissible(v),
                "{v} should pass through"
            );
        }
    }
    #[test]
    fn rejects_non_positive_and_large_values() {
        assert_eq!(
            classify_number(0.0),
            Classification::Inadmissible(InadmissibleReason::NonPositive),
            "zero"
        );
        assert_eq!(
            classify_number(-5.0),
            Classification::Inadmissible(InadmissibleReason::NonPositive),
            "negative"
        );
        assert_eq!(
            classify_number(1_000_000_001.0),
            Classification::Inadmissible(InadmissibleReason::LikelyTimestamp),
            "just above the timestamp threshold"
        );
        assert_eq!(
            classify_number(5_000_000_000.0),
            Classification::Inadmissible(InadmissibleReason::LikelyTimestamp),
            "between the two thresholds"
        );
        assert_eq!(
            classify_number(1e10),
            Classification::Inadmissible(InadmissibleReason::TooLarge),
            "magnitude limit itself"
        );
        assert_eq!(
            classify_number(f64::INFINITY),
            Classification::Inadmissible(InadmissibleReason::TooLarge),
            "infinity"
        );
        assert_eq!(
            classify_number(f64::NAN),
            Classification::Inadmissible(InadmissibleReason::NotFinite),
            "nan"
        );
    }
    #[test]
    fn text_is_parsed_strictly() {
        assert_eq!(
            classify(&CellValue::Text(" 1234.5 ".to_string())),
            Classification::Admissible(1234.5),
            "surrounding whitespace is ignored"
        );
        assert_eq!(
            reason_of(&CellValue::Text("12吨".to_string())),
            Some(InadmissibleReason::NotNumeric),
            "units make text non-numeric"
        );
        assert_eq!(
            reason_of(&CellValue::Text("1,000".to_string())),
            Some(InadmissibleReason::NotNumeric),
            "thousands separators are not accepted"
        );
        assert_eq!(
            reason_of(&CellValue::Text("1_000".to_string())),
            Some(InadmissibleReason::NotNumeric),
            "digit group underscores are not accepted"
        );
        assert_eq!(
            reason_of(&CellValue::Text("１２３４".to_string())),
            Some(InadmissibleReason::NotNumeric),
            "full-width digits are not accepted"
        );
        assert_eq!(
            reason_of(&CellValue::Text("-3".to_string())),
            Some(InadmissibleReason::NonPositive),
            "negative text"
        );
    }
    #[test]
    fn typed_non_numbers_are_rejected() {
        assert_eq!(reason_of(&CellValue::Empty), Some(InadmissibleReason::Empty), "empty");
        assert_eq!(
            reason_of(&CellValue::Bool(true)),
            Some(InadmissibleReason::NotNumeric),
            "boolean"
        );
        assert_eq!(
            reason_of(&CellValue::DateTime(45_000.0)),
            Some(InadmissibleReason::NotNumeric),
            "date cell"
        );
        assert_eq!(
            reason_of(&CellValue::Error("#DIV/0!".to_string())),
            Some(InadmissibleReason::NotNumeric),
            "error cell"
        );
    }
}
