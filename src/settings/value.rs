//! Configurable value primitives
//!
//! Every setting a feature exposes is one of these. Bounds are declared at
//! registration and never change; writes that fall outside them are
//! rejected and leave the previous value in place.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::core::error::{CoreError, Result};

/// Discriminant of a [`Value`], used in type-mismatch errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    IntRange,
    FloatRange,
    Choice,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::IntRange => "int range",
            ValueKind::FloatRange => "float range",
            ValueKind::Choice => "choice",
        };
        f.write_str(name)
    }
}

/// Current value of a setting together with its declared bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Value {
    Bool {
        value: bool,
    },
    Int {
        value: i32,
        bounds: RangeInclusive<i32>,
    },
    Float {
        value: f32,
        bounds: RangeInclusive<f32>,
    },
    IntRange {
        value: RangeInclusive<i32>,
        bounds: RangeInclusive<i32>,
    },
    FloatRange {
        value: RangeInclusive<f32>,
        bounds: RangeInclusive<f32>,
    },
    /// Enumerated state of a choice group
    Choice {
        active: String,
        choices: Vec<String>,
    },
}

/// Raw payload of a write, without bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Input {
    Bool(bool),
    Int(i32),
    Float(f32),
    IntRange(RangeInclusive<i32>),
    FloatRange(RangeInclusive<f32>),
    Choice(String),
}

impl Input {
    pub fn kind(&self) -> ValueKind {
        match self {
            Input::Bool(_) => ValueKind::Bool,
            Input::Int(_) => ValueKind::Int,
            Input::Float(_) => ValueKind::Float,
            Input::IntRange(_) => ValueKind::IntRange,
            Input::FloatRange(_) => ValueKind::FloatRange,
            Input::Choice(_) => ValueKind::Choice,
        }
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool { .. } => ValueKind::Bool,
            Value::Int { .. } => ValueKind::Int,
            Value::Float { .. } => ValueKind::Float,
            Value::IntRange { .. } => ValueKind::IntRange,
            Value::FloatRange { .. } => ValueKind::FloatRange,
            Value::Choice { .. } => ValueKind::Choice,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool { value } => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int { value, .. } => Some(*value),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Value::Float { value, .. } => Some(*value),
            _ => None,
        }
    }

    pub fn as_int_range(&self) -> Option<RangeInclusive<i32>> {
        match self {
            Value::IntRange { value, .. } => Some(value.clone()),
            _ => None,
        }
    }

    pub fn as_float_range(&self) -> Option<RangeInclusive<f32>> {
        match self {
            Value::FloatRange { value, .. } => Some(value.clone()),
            _ => None,
        }
    }

    pub fn as_choice(&self) -> Option<&str> {
        match self {
            Value::Choice { active, .. } => Some(active),
            _ => None,
        }
    }

    /// Apply a write, checking kind and bounds
    ///
    /// Returns whether the stored value actually changed. On error nothing
    /// is modified. Choice values are validated against their option list
    /// but selection side effects belong to the owning group.
    pub fn accept(&mut self, name: &str, input: Input) -> Result<bool> {
        let mismatch = |actual: ValueKind, expected: ValueKind| CoreError::TypeMismatch {
            name: name.to_string(),
            expected,
            actual,
        };

        match (self, input) {
            (Value::Bool { value }, Input::Bool(new)) => Ok(replace(value, new)),
            (Value::Int { value, bounds }, Input::Int(new)) => {
                check_scalar(name, &new, bounds)?;
                Ok(replace(value, new))
            }
            (Value::Float { value, bounds }, Input::Float(new)) => {
                if new.is_nan() {
                    return Err(out_of_range(name, &new, bounds));
                }
                check_scalar(name, &new, bounds)?;
                Ok(replace(value, new))
            }
            (Value::IntRange { value, bounds }, Input::IntRange(new)) => {
                check_range(name, &new, bounds)?;
                Ok(replace(value, new))
            }
            (Value::FloatRange { value, bounds }, Input::FloatRange(new)) => {
                check_range(name, &new, bounds)?;
                Ok(replace(value, new))
            }
            (Value::Choice { active, choices }, Input::Choice(new)) => {
                if !choices.iter().any(|c| *c == new) {
                    return Err(CoreError::NotFound(new));
                }
                Ok(replace(active, new))
            }
            (value, input) => Err(mismatch(input.kind(), value.kind())),
        }
    }
}

fn replace<T: PartialEq>(slot: &mut T, new: T) -> bool {
    if *slot == new {
        return false;
    }
    *slot = new;
    true
}

fn out_of_range<T: fmt::Debug>(name: &str, value: &T, bounds: &RangeInclusive<T>) -> CoreError {
    CoreError::OutOfRange {
        name: name.to_string(),
        value: format!("{:?}", value),
        bounds: format!("{:?}", bounds),
    }
}

fn check_scalar<T: PartialOrd + fmt::Debug>(
    name: &str,
    value: &T,
    bounds: &RangeInclusive<T>,
) -> Result<()> {
    if bounds.contains(value) {
        Ok(())
    } else {
        Err(out_of_range(name, value, bounds))
    }
}

fn check_range<T: PartialOrd + fmt::Debug>(
    name: &str,
    value: &RangeInclusive<T>,
    bounds: &RangeInclusive<T>,
) -> Result<()> {
    let inverted = value.start() > value.end();
    if inverted || !bounds.contains(value.start()) || !bounds.contains(value.end()) {
        return Err(CoreError::OutOfRange {
            name: name.to_string(),
            value: format!("{:?}", value),
            bounds: format!("{:?}", bounds),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_within_bounds_accepted() {
        let mut value = Value::Int { value: 5, bounds: 0..=20 };
        assert!(value.accept("Ticks", Input::Int(7)).unwrap());
        assert_eq!(value.as_int(), Some(7));
    }

    #[test]
    fn test_int_outside_bounds_keeps_prior_value() {
        let mut value = Value::Int { value: 5, bounds: 0..=20 };
        let err = value.accept("Ticks", Input::Int(21)).unwrap_err();
        assert!(matches!(err, CoreError::OutOfRange { .. }));
        assert_eq!(value.as_int(), Some(5));
    }

    #[test]
    fn test_same_value_reports_unchanged() {
        let mut value = Value::Bool { value: true };
        assert!(!value.accept("Enabled", Input::Bool(true)).unwrap());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let mut value = Value::IntRange { value: 6..=8, bounds: 1..=20 };
        assert!(value.accept("CPS", Input::IntRange(9..=7)).is_err());
        assert_eq!(value.as_int_range(), Some(6..=8));
    }

    #[test]
    fn test_float_range_edges_inclusive() {
        let mut value = Value::FloatRange { value: 0.9..=1.0, bounds: 0.0..=1.0 };
        assert!(value.accept("CooldownRange", Input::FloatRange(0.0..=1.0)).is_ok());
        assert!(value.accept("CooldownRange", Input::FloatRange(0.0..=1.1)).is_err());
    }

    #[test]
    fn test_nan_rejected() {
        let mut value = Value::Float { value: 0.5, bounds: 0.1..=5.0 };
        assert!(value.accept("TeleportOffset", Input::Float(f32::NAN)).is_err());
    }

    #[test]
    fn test_kind_mismatch() {
        let mut value = Value::Bool { value: false };
        let err = value.accept("Enabled", Input::Int(1)).unwrap_err();
        match err {
            CoreError::TypeMismatch { expected, actual, .. } => {
                assert_eq!(expected, ValueKind::Bool);
                assert_eq!(actual, ValueKind::Int);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_unknown_choice_not_found() {
        let mut value = Value::Choice {
            active: "Safe".into(),
            choices: vec!["None".into(), "Safe".into()],
        };
        assert!(matches!(
            value.accept("Mode", Input::Choice("safe".into())),
            Err(CoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_value_serializes_with_tag() {
        let value = Value::Int { value: 3, bounds: 0..=10 };
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json["type"], "int");
        assert_eq!(json["value"], 3);
    }
}
