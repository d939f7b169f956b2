//! Value types, storage bindings and the text codec.
//!
//! A configuration value is either bound to a static atomic cell, served by
//! the session's [`Handlers`](crate::handler::Handlers) (accessor), or
//! unbound. Unbound values read as the zero value of their type and ignore
//! writes.
//!
//! Text conversion rules:
//! - `UInt32` / `Data`: decimal digits only
//! - `Int32` / `Physical`: decimal digits with optional leading `-`
//! - `String`: verbatim, one layer of surrounding double quotes stripped
//! - `Bool`: `t T 1 y Y yes true` / `f F 0 n N no false` (words case-insensitive)
//! - `Time` / `Date`: unsupported

use crate::config::VALUE_TEXT_CAPACITY;
use crate::error::CliError;
use core::fmt::Write;
use core::sync::atomic::{AtomicBool, AtomicI32, AtomicU32, Ordering};

/// Formatted value text.
pub type ValueText = heapless::String<VALUE_TEXT_CAPACITY>;

/// Value type tag.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ValueKind {
    /// Signed 32-bit integer
    Int32,

    /// Unsigned 32-bit integer
    UInt32,

    /// Text
    String,

    /// Time of day
    Time,

    /// Calendar date
    Date,

    /// Byte count, displayed auto-scaled (B / KiB / MiB)
    Data,

    /// Signed quantity displayed with the value's units suffix
    Physical,

    /// Boolean flag
    Bool,
}

impl ValueKind {
    /// Zero value read from an unbound value.
    pub const fn zero(self) -> ValueData<'static> {
        match self {
            ValueKind::Int32 | ValueKind::Physical => ValueData::Int(0),
            ValueKind::UInt32 | ValueKind::Data | ValueKind::Time | ValueKind::Date => {
                ValueData::UInt(0)
            }
            ValueKind::String => ValueData::Text(""),
            ValueKind::Bool => ValueData::Bool(false),
        }
    }
}

/// Typed value as stored in memory or passed to a setter.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ValueData<'a> {
    /// Signed integer (`Int32`, `Physical`)
    Int(i32),

    /// Unsigned integer (`UInt32`, `Data`, `Time`, `Date`)
    UInt(u32),

    /// Boolean
    Bool(bool),

    /// Text borrowed from the input line or the accessor
    Text(&'a str),
}

/// Where a value lives.
///
/// A cell binding must agree with the value kind, see [`Binding::accepts`].
/// `String` values have no cell and are `Unbound` or `Accessor`.
#[derive(Debug, Copy, Clone)]
pub enum Binding {
    /// No storage: reads yield zero, writes are ignored
    Unbound,

    /// Bound to an unsigned cell
    UInt(&'static AtomicU32),

    /// Bound to a signed cell
    Int(&'static AtomicI32),

    /// Bound to a boolean cell
    Bool(&'static AtomicBool),

    /// Served by `Handlers::get_value` / `Handlers::set_value`
    Accessor,
}

impl Binding {
    /// Read the bound cell.
    ///
    /// Returns `None` for accessor values (the caller asks the handlers).
    pub fn load(&self, kind: ValueKind) -> Option<ValueData<'static>> {
        match self {
            Binding::Unbound => Some(kind.zero()),
            Binding::UInt(cell) => Some(ValueData::UInt(cell.load(Ordering::Relaxed))),
            Binding::Int(cell) => Some(ValueData::Int(cell.load(Ordering::Relaxed))),
            Binding::Bool(cell) => Some(ValueData::Bool(cell.load(Ordering::Relaxed))),
            Binding::Accessor => None,
        }
    }

    /// Write the bound cell.
    ///
    /// Accessor values are not handled here and report `TypeMismatch`.
    pub fn store(&self, data: ValueData<'_>) -> Result<(), CliError> {
        match (self, data) {
            (Binding::Unbound, _) => Ok(()),
            (Binding::UInt(cell), ValueData::UInt(v)) => {
                cell.store(v, Ordering::Relaxed);
                Ok(())
            }
            (Binding::Int(cell), ValueData::Int(v)) => {
                cell.store(v, Ordering::Relaxed);
                Ok(())
            }
            (Binding::Bool(cell), ValueData::Bool(v)) => {
                cell.store(v, Ordering::Relaxed);
                Ok(())
            }
            _ => Err(CliError::TypeMismatch),
        }
    }

    /// Whether a value of `kind` can live in this binding.
    ///
    /// `UInt` holds `UInt32`, `Data`, `Time` and `Date`; `Int` holds `Int32`
    /// and `Physical`; `Bool` holds `Bool`. `Unbound` and `Accessor` hold
    /// any kind.
    pub fn accepts(&self, kind: ValueKind) -> bool {
        match self {
            Binding::Unbound | Binding::Accessor => true,
            Binding::UInt(_) => matches!(
                kind,
                ValueKind::UInt32 | ValueKind::Data | ValueKind::Time | ValueKind::Date
            ),
            Binding::Int(_) => matches!(kind, ValueKind::Int32 | ValueKind::Physical),
            Binding::Bool(_) => kind == ValueKind::Bool,
        }
    }

    /// True when reads and writes go through the handlers.
    pub fn is_accessor(&self) -> bool {
        matches!(self, Binding::Accessor)
    }
}

/// Convert a literal token to typed data for `kind`.
///
/// The returned data borrows from `text` for `String` values.
pub fn from_text(kind: ValueKind, text: &str) -> Result<ValueData<'_>, CliError> {
    match kind {
        ValueKind::UInt32 | ValueKind::Data => parse_unsigned(text).map(ValueData::UInt),
        ValueKind::Int32 | ValueKind::Physical => parse_signed(text).map(ValueData::Int),
        ValueKind::String => Ok(ValueData::Text(strip_quotes(text))),
        ValueKind::Bool => parse_bool(text).map(ValueData::Bool),
        ValueKind::Time | ValueKind::Date => Err(CliError::UnsupportedType),
    }
}

/// Format typed data for display.
///
/// `units` is appended to `Physical` values.
pub fn to_text(
    kind: ValueKind,
    data: &ValueData<'_>,
    units: Option<&str>,
) -> Result<ValueText, CliError> {
    let mut text = ValueText::new();
    let written = match (kind, data) {
        (ValueKind::UInt32, ValueData::UInt(v)) => write!(text, "{}", v),
        (ValueKind::Int32, ValueData::Int(v)) => write!(text, "{}", v),
        (ValueKind::String, ValueData::Text(s)) => text.push_str(s).map_err(|_| core::fmt::Error),
        (ValueKind::Physical, ValueData::Int(v)) => write!(text, "{}{}", v, units.unwrap_or("")),
        (ValueKind::Data, ValueData::UInt(v)) => write_scaled(&mut text, *v),
        (ValueKind::Bool, ValueData::Bool(v)) => {
            text.push_str(if *v { "true" } else { "false" })
                .map_err(|_| core::fmt::Error)
        }
        (ValueKind::Time | ValueKind::Date, _) => return Err(CliError::UnsupportedType),
        _ => return Err(CliError::TypeMismatch),
    };
    written.map_err(|_| CliError::BufferFull)?;
    Ok(text)
}

fn write_scaled(text: &mut ValueText, bytes: u32) -> core::fmt::Result {
    const KIB: u32 = 1024;
    const MIB: u32 = 1024 * 1024;

    if bytes < KIB {
        write!(text, "{} B", bytes)
    } else if bytes < MIB {
        write!(text, "{} KiB", bytes / KIB)
    } else {
        write!(text, "{} MiB", bytes / MIB)
    }
}

fn parse_unsigned(text: &str) -> Result<u32, CliError> {
    const EXPECTED: CliError = CliError::InvalidValue {
        expected: "unsigned integer",
    };

    if text.is_empty() {
        return Err(EXPECTED);
    }

    let mut acc: u32 = 0;
    for b in text.bytes() {
        if !b.is_ascii_digit() {
            return Err(EXPECTED);
        }
        acc = acc
            .checked_mul(10)
            .and_then(|a| a.checked_add(u32::from(b - b'0')))
            .ok_or(EXPECTED)?;
    }
    Ok(acc)
}

fn parse_signed(text: &str) -> Result<i32, CliError> {
    const EXPECTED: CliError = CliError::InvalidValue { expected: "integer" };

    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let magnitude = i64::from(parse_unsigned(digits).map_err(|_| EXPECTED)?);
    let value = if negative { -magnitude } else { magnitude };
    i32::try_from(value).map_err(|_| EXPECTED)
}

fn parse_bool(text: &str) -> Result<bool, CliError> {
    match text {
        "t" | "T" | "1" | "y" | "Y" => return Ok(true),
        "f" | "F" | "0" | "n" | "N" => return Ok(false),
        _ => {}
    }

    if text.eq_ignore_ascii_case("true") || text.eq_ignore_ascii_case("yes") {
        Ok(true)
    } else if text.eq_ignore_ascii_case("false") || text.eq_ignore_ascii_case("no") {
        Ok(false)
    } else {
        Err(CliError::InvalidValue { expected: "boolean" })
    }
}

fn strip_quotes(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(text)
}
