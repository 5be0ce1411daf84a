//! Conversion between script values and the declared types of extension
//! handlers.
//!
//! [`to_script_type`] turns whatever a handler produced into plain script
//! shapes (scalars and arrays) and fails only for values with no script
//! representation. [`from_script_type`] coerces a script value into a declared
//! type, laxly for scalars and strictly for structured types.

use std::sync::Arc;

use tracing::trace;

use crate::{
    error::{RuntimeError, RuntimeResult},
    exec::ExecContext,
    val::{ArrayValue, Name, RecordType, RecordValue, StrValue, TypeInfo, Val},
};


/// Convert an extension-side value into its script representation.
pub fn to_script_type(value: Val) -> RuntimeResult<Val> {
    Ok(to_script_changed(&value)?.unwrap_or(value))
}

// `None` when the value is already in script form.
fn to_script_changed(value: &Val) -> RuntimeResult<Option<Val>> {
    match value {
        Val::Null | Val::Bool(_) | Val::Number(_) | Val::Str(_) | Val::Name(_) | Val::Data(_) => Ok(None),
        Val::Array(array) => {
            let mut changed = Vec::new();
            for (key, element) in array.iter() {
                if let Some(converted) = to_script_changed(element)? {
                    changed.push((key.clone(), converted));
                }
            }
            if changed.is_empty() {
                return Ok(None);
            }
            let mut array = array.clone();
            for (key, converted) in changed {
                array.store(key.as_str(), true, converted);
            }
            Ok(Some(Val::Array(array)))
        }
        Val::List(items) => {
            let mut array = ArrayValue::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                array.store_index(i + 1, to_script_type(item.clone())?);
            }
            Ok(Some(Val::Array(array)))
        }
        Val::Record(record) => {
            let mut array = ArrayValue::with_capacity(record.record_type().field_count());
            for (field, item) in record.iter() {
                array.store(field.as_str(), true, to_script_type(item.clone())?);
            }
            Ok(Some(Val::Array(array)))
        }
        Val::Foreign(foreign) => {
            if foreign.foreign_type().bridge_type().is_none() {
                return Err(RuntimeError::Unrepresentable { kind: "foreign" });
            }
            let imported = foreign.foreign_type().import(foreign)?;
            trace!(target: "strand::bridge", foreign_type = foreign.foreign_type().name(), "imported foreign value");
            to_script_type(imported).map(Some)
        }
        Val::Handler(_) | Val::Error(_) | Val::Custom(_) => Err(RuntimeError::Unrepresentable {
            kind: value.kind_name(),
        }),
    }
}

fn type_label(ty: &TypeInfo) -> &'static str {
    match ty {
        TypeInfo::Any => "any",
        TypeInfo::Boolean => "boolean",
        TypeInfo::Number => "number",
        TypeInfo::String => "string",
        TypeInfo::Data => "data",
        TypeInfo::Array => "array",
        TypeInfo::ProperList => "list",
        TypeInfo::Record(_) => "record",
        TypeInfo::Foreign(_) => "foreign",
        TypeInfo::Optional(inner) => type_label(inner),
    }
}

fn cannot(value: &Val, ty: &TypeInfo) -> RuntimeError {
    RuntimeError::CannotConvert {
        from: value.kind_name(),
        to: type_label(ty),
    }
}

/// Coerce a script value into the declared type `ty`.
pub fn from_script_type(ctx: &ExecContext, value: Val, ty: &TypeInfo) -> RuntimeResult<Val> {
    let (inner, optional) = ty.resolve();
    if optional && value.is_null() {
        return Ok(Val::Null);
    }
    match inner {
        TypeInfo::Any => Ok(fold_names(value)),
        TypeInfo::Boolean => {
            if let Val::Bool(_) = value {
                return Ok(value);
            }
            let text = ctx.convert_to_string(&value).ok_or_else(|| cannot(&value, ty))?;
            if optional && text.is_empty() {
                return Ok(Val::Null);
            }
            ctx.convert_to_bool(&Val::Str(text))
                .map(Val::Bool)
                .ok_or_else(|| cannot(&value, ty))
        }
        TypeInfo::Number => {
            if let Val::Number(_) = value {
                return Ok(value);
            }
            let text = ctx.convert_to_string(&value).ok_or_else(|| cannot(&value, ty))?;
            if optional && text.is_empty() {
                return Ok(Val::Null);
            }
            ctx.string_to_number(&text).map(Val::real).ok_or_else(|| cannot(&value, ty))
        }
        TypeInfo::String => ctx
            .convert_to_string(&value)
            .map(Val::Str)
            .ok_or_else(|| cannot(&value, ty)),
        TypeInfo::Data => ctx
            .convert_to_data(&value)
            .map(Val::Data)
            .ok_or_else(|| cannot(&value, ty)),
        TypeInfo::Array => coerce_array(ctx, value, ty).map(Val::Array),
        TypeInfo::ProperList => {
            if let Val::List(items) = value {
                return Ok(Val::List(items.iter().cloned().map(fold_names).collect()));
            }
            let array = coerce_array(ctx, value, ty)?;
            let items = array.sequence_values().ok_or(RuntimeError::CannotConvert {
                from: "array",
                to: "list",
            })?;
            Ok(Val::List(Arc::from(items)))
        }
        TypeInfo::Record(record_type) => {
            if let Val::Record(record) = &value
                && record.is_of_type(record_type)
            {
                return Ok(value);
            }
            let array = coerce_array(ctx, value, ty)?;
            from_array_to_record(ctx, &array, record_type).map(Val::Record)
        }
        TypeInfo::Foreign(foreign_type) => {
            if let Val::Foreign(foreign) = &value
                && foreign.is_of_type(foreign_type)
            {
                return Ok(value);
            }
            let bridge = foreign_type.bridge_type().ok_or_else(|| cannot(&value, ty))?;
            let shaped = from_script_type(ctx, value, bridge)?;
            foreign_type.export(&shaped).map(Val::Foreign)
        }
        TypeInfo::Optional(_) => Err(RuntimeError::Internal("nested optional type".to_owned())),
    }
}

/// Any value that stringifies coerces to an array; non-arrays become an empty
/// array. Element names fold to strings.
fn coerce_array(ctx: &ExecContext, value: Val, ty: &TypeInfo) -> RuntimeResult<ArrayValue> {
    match value {
        Val::Array(array) => Ok(fold_array(array)),
        other => ctx.convert_to_array(&other, false).ok_or_else(|| cannot(&other, ty)),
    }
}

fn from_array_to_record(ctx: &ExecContext, array: &ArrayValue, ty: &Arc<RecordType>) -> RuntimeResult<RecordValue> {
    if array.len() != ty.field_count() {
        return Err(RuntimeError::CannotConvert {
            from: "array",
            to: "record",
        });
    }
    let mut values = Vec::with_capacity(ty.field_count());
    for field in ty.fields() {
        let element = array
            .fetch(field.name.as_str(), false)
            .ok_or(RuntimeError::CannotConvert {
                from: "array",
                to: "record",
            })?;
        values.push(from_script_type(ctx, element.clone(), &field.ty)?);
    }
    trace!(target: "strand::bridge", record = %ty.name(), "converted array to record");
    RecordValue::new(ty.clone(), values)
}

/// Rewrite names as strings, descending into arrays.
fn fold_names(value: Val) -> Val {
    match value {
        Val::Name(name) => Val::Str(StrValue::new(name.as_str())),
        Val::Array(array) => Val::Array(fold_array(array)),
        other => other,
    }
}

fn fold_array(array: ArrayValue) -> ArrayValue {
    let names: Vec<(Name, Val)> = array
        .iter()
        .filter(|(_, v)| contains_name(v))
        .map(|(k, v)| (k.clone(), fold_names(v.clone())))
        .collect();
    if names.is_empty() {
        return array;
    }
    let mut array = array;
    for (key, folded) in names {
        array.store(key.as_str(), true, folded);
    }
    array
}

fn contains_name(value: &Val) -> bool {
    match value {
        Val::Name(_) => true,
        Val::Array(array) => array.iter().any(|(_, v)| contains_name(v)),
        _ => false,
    }
}
