//! Enumerated and bitset properties: integers rendered through static tag
//! tables.

use tracing::error;

use crate::{
    error::{RuntimeError, RuntimeResult},
    exec::{ExecContext, ExecValue},
    util::fast_map::eq_caseless,
};

use super::{
    policy::Accessor,
    scalar::{MIXED, Mixed, convert_string},
};

#[derive(Debug, Clone, Copy)]
pub struct EnumElement {
    pub tag: &'static str,
    pub value: i32,
    /// Formats normally but is never accepted on store.
    pub read_only: bool,
}

impl EnumElement {
    pub const fn new(tag: &'static str, value: i32) -> Self {
        EnumElement {
            tag,
            value,
            read_only: false,
        }
    }

    pub const fn read_only(tag: &'static str, value: i32) -> Self {
        EnumElement {
            tag,
            value,
            read_only: true,
        }
    }
}

#[derive(Debug)]
pub struct EnumTypeInfo {
    pub name: &'static str,
    pub elements: &'static [EnumElement],
}

impl EnumTypeInfo {
    pub fn format(&self, value: i32) -> RuntimeResult<&'static str> {
        match self.elements.iter().find(|e| e.value == value) {
            Some(element) => Ok(element.tag),
            None => {
                error!(target: "strand::property", enum_type = self.name, value, "value missing from enum table");
                Err(RuntimeError::Internal(format!(
                    "enum {} has no element for {}",
                    self.name, value
                )))
            }
        }
    }

    pub fn parse(&self, tag: &str) -> RuntimeResult<i32> {
        let tag = tag.trim();
        self.elements
            .iter()
            .find(|e| !e.read_only && eq_caseless(e.tag, tag))
            .map(|e| e.value)
            .ok_or_else(|| RuntimeError::BadEnumeratedValue {
                type_name: self.name,
                value: tag.to_owned(),
            })
    }

    fn fetch_value(&self, value: i32) -> RuntimeResult<ExecValue> {
        Ok(ExecValue::string(self.format(value)?))
    }

    fn store_value(&self, ctx: &ExecContext, value: ExecValue) -> RuntimeResult<i32> {
        let text = convert_string(ctx, value)?;
        self.parse(text.as_str())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SetElement {
    pub tag: &'static str,
    pub bit: u32,
}

impl SetElement {
    pub const fn new(tag: &'static str, bit: u32) -> Self {
        SetElement { tag, bit }
    }
}

#[derive(Debug)]
pub struct SetTypeInfo {
    pub name: &'static str,
    pub elements: &'static [SetElement],
}

impl SetTypeInfo {
    /// Tags of the set bits, in table order.
    pub fn format(&self, value: u32) -> String {
        let mut out = String::new();
        for element in self.elements {
            if element.bit != 0 && value & element.bit == element.bit {
                if !out.is_empty() {
                    out.push(',');
                }
                out.push_str(element.tag);
            }
        }
        out
    }

    pub fn parse(&self, text: &str) -> RuntimeResult<u32> {
        let mut bits = 0;
        for tag in text.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let element = self
                .elements
                .iter()
                .find(|e| eq_caseless(e.tag, tag))
                .ok_or_else(|| RuntimeError::BadSetElement {
                    type_name: self.name,
                    tag: tag.to_owned(),
                })?;
            bits |= element.bit;
        }
        Ok(bits)
    }
}

pub enum EnumPolicy<T> {
    Plain(Accessor<T, i32>),
    Optional(Accessor<T, Option<i32>>),
    Mixed(Accessor<T, Mixed<i32>, i32>),
    MixedOptional(Accessor<T, Mixed<Option<i32>>, Option<i32>>),
}

impl<T> EnumPolicy<T> {
    pub fn is_read_only(&self) -> bool {
        match self {
            EnumPolicy::Plain(a) => a.is_read_only(),
            EnumPolicy::Optional(a) => a.is_read_only(),
            EnumPolicy::Mixed(a) => a.is_read_only(),
            EnumPolicy::MixedOptional(a) => a.is_read_only(),
        }
    }

    pub(crate) fn fetch(&self, info: &EnumTypeInfo, ctx: &ExecContext, target: &T) -> RuntimeResult<ExecValue> {
        let value = match self {
            EnumPolicy::Plain(a) => Some((a.get)(ctx, target)?),
            EnumPolicy::Optional(a) => (a.get)(ctx, target)?,
            EnumPolicy::Mixed(a) => {
                let mixed = (a.get)(ctx, target)?;
                if mixed.differs {
                    return Ok(ExecValue::string(MIXED));
                }
                Some(mixed.value)
            }
            EnumPolicy::MixedOptional(a) => {
                let mixed = (a.get)(ctx, target)?;
                if mixed.differs {
                    return Ok(ExecValue::string(MIXED));
                }
                mixed.value
            }
        };
        match value {
            Some(v) => info.fetch_value(v),
            None => Ok(ExecValue::empty()),
        }
    }

    pub(crate) fn store(
        &self,
        name: &'static str,
        info: &EnumTypeInfo,
        ctx: &ExecContext,
        target: &mut T,
        value: ExecValue,
    ) -> RuntimeResult<()> {
        let optional = matches!(self, EnumPolicy::Optional(_) | EnumPolicy::MixedOptional(_));
        let parsed = if optional && value.is_empty() {
            None
        } else {
            Some(info.store_value(ctx, value)?)
        };
        let read_only = || RuntimeError::ReadOnlyProperty(name);
        match (self, parsed) {
            (EnumPolicy::Plain(a), Some(v)) => a.set.ok_or_else(read_only)?(ctx, target, v),
            (EnumPolicy::Mixed(a), Some(v)) => a.set.ok_or_else(read_only)?(ctx, target, v),
            (EnumPolicy::Optional(a), v) => a.set.ok_or_else(read_only)?(ctx, target, v),
            (EnumPolicy::MixedOptional(a), v) => a.set.ok_or_else(read_only)?(ctx, target, v),
            (_, None) => Err(RuntimeError::BadEnumeratedValue {
                type_name: info.name,
                value: String::new(),
            }),
        }
    }
}
