//! Descriptor-driven property access.
//!
//! An object kind publishes a [`PropertyTable`] of [`PropertyDescriptor`]s.
//! Each descriptor pairs a property name with a [`PropertyPolicy`] carrying the
//! typed getter and setter, so reads and writes are dispatched by matching on
//! the policy rather than by per-property code. A store converts the incoming
//! value completely before the setter runs.

use std::sync::Arc;

use tracing::trace;

use crate::{
    bridge,
    error::{RuntimeError, RuntimeResult},
    exec::{ExecContext, ExecValue},
    util::fast_map::{FastHashMap, fast_hash_map_with_capacity, fold_key},
    val::{RecordType, RecordValue, TypeInfo, Val},
};

mod custom;
mod enums;
mod list;
mod policy;
mod scalar;

#[cfg(test)]
mod property_test;

pub use custom::{CustomCodec, CustomFormat, CustomProperty, MixedCustomProperty};
pub use enums::{EnumElement, EnumPolicy, EnumTypeInfo, SetElement, SetTypeInfo};
pub use list::{Delimiter, ListElement, ListPolicy, format_list, parse_list, split_segments};
pub use policy::{
    Accessor, Getter, MixedOptionalPolicy, MixedPolicy, OptionalPolicy, PlainPolicy, Setter, UInt16In1To16,
    UInt16In1To65535,
};
pub use scalar::{Bounded, FromExec, IntoExec, MIXED, Mixed};

pub enum PropertyPolicy<T> {
    Plain(PlainPolicy<T>),
    Optional(OptionalPolicy<T>),
    Mixed(MixedPolicy<T>),
    MixedOptional(MixedOptionalPolicy<T>),
    Enum {
        info: &'static EnumTypeInfo,
        policy: EnumPolicy<T>,
    },
    Set {
        info: &'static SetTypeInfo,
        accessor: Accessor<T, u32>,
    },
    List(ListPolicy<T>),
    Custom(Box<dyn CustomCodec<T>>),
    Record {
        ty: Arc<RecordType>,
        accessor: Accessor<T, RecordValue>,
    },
}

impl<T> PropertyPolicy<T> {
    pub fn is_read_only(&self) -> bool {
        match self {
            PropertyPolicy::Plain(p) => p.is_read_only(),
            PropertyPolicy::Optional(p) => p.is_read_only(),
            PropertyPolicy::Mixed(p) => p.is_read_only(),
            PropertyPolicy::MixedOptional(p) => p.is_read_only(),
            PropertyPolicy::Enum { policy, .. } => policy.is_read_only(),
            PropertyPolicy::Set { accessor, .. } => accessor.is_read_only(),
            PropertyPolicy::List(p) => p.is_read_only(),
            PropertyPolicy::Custom(codec) => codec.is_read_only(),
            PropertyPolicy::Record { accessor, .. } => accessor.is_read_only(),
        }
    }

    fn family(&self) -> &'static str {
        match self {
            PropertyPolicy::Plain(_) => "plain",
            PropertyPolicy::Optional(_) => "optional",
            PropertyPolicy::Mixed(_) => "mixed",
            PropertyPolicy::MixedOptional(_) => "mixed optional",
            PropertyPolicy::Enum { .. } => "enum",
            PropertyPolicy::Set { .. } => "set",
            PropertyPolicy::List(_) => "list",
            PropertyPolicy::Custom(_) => "custom",
            PropertyPolicy::Record { .. } => "record",
        }
    }
}

pub struct PropertyDescriptor<T> {
    pub name: &'static str,
    pub policy: PropertyPolicy<T>,
}

impl<T> PropertyDescriptor<T> {
    pub fn new(name: &'static str, policy: PropertyPolicy<T>) -> Self {
        Self { name, policy }
    }

    #[inline]
    pub fn is_read_only(&self) -> bool {
        self.policy.is_read_only()
    }

    pub fn fetch(&self, ctx: &ExecContext, target: &T) -> RuntimeResult<ExecValue> {
        trace!(target: "strand::property", property = self.name, family = self.policy.family(), "fetch");
        match &self.policy {
            PropertyPolicy::Plain(p) => p.fetch(ctx, target),
            PropertyPolicy::Optional(p) => p.fetch(ctx, target),
            PropertyPolicy::Mixed(p) => p.fetch(ctx, target),
            PropertyPolicy::MixedOptional(p) => p.fetch(ctx, target),
            PropertyPolicy::Enum { info, policy } => policy.fetch(info, ctx, target),
            PropertyPolicy::Set { info, accessor } => {
                let bits = (accessor.get)(ctx, target)?;
                Ok(ExecValue::string(&info.format(bits)))
            }
            PropertyPolicy::List(p) => p.fetch(ctx, target),
            PropertyPolicy::Custom(codec) => codec.fetch(ctx, target),
            PropertyPolicy::Record { accessor, .. } => {
                let record = (accessor.get)(ctx, target)?;
                Ok(ExecValue::Value(bridge::to_script_type(Val::Record(record))?))
            }
        }
    }

    pub fn store(&self, ctx: &ExecContext, target: &mut T, value: ExecValue) -> RuntimeResult<()> {
        trace!(target: "strand::property", property = self.name, family = self.policy.family(), "store");
        if self.is_read_only() {
            return Err(RuntimeError::ReadOnlyProperty(self.name));
        }
        let name = self.name;
        match &self.policy {
            PropertyPolicy::Plain(p) => p.store(name, ctx, target, value),
            PropertyPolicy::Optional(p) => p.store(name, ctx, target, value),
            PropertyPolicy::Mixed(p) => p.store(name, ctx, target, value),
            PropertyPolicy::MixedOptional(p) => p.store(name, ctx, target, value),
            PropertyPolicy::Enum { info, policy } => policy.store(name, info, ctx, target, value),
            PropertyPolicy::Set { info, accessor } => {
                let set = accessor.set.ok_or(RuntimeError::ReadOnlyProperty(name))?;
                let text = scalar::convert_string(ctx, value)?;
                let bits = info.parse(text.as_str())?;
                set(ctx, target, bits)
            }
            PropertyPolicy::List(p) => p.store(name, ctx, target, value),
            PropertyPolicy::Custom(codec) => codec.store(name, ctx, target, value),
            PropertyPolicy::Record { ty, accessor } => {
                let set = accessor.set.ok_or(RuntimeError::ReadOnlyProperty(name))?;
                let boxed = ctx.box_value(value);
                match bridge::from_script_type(ctx, boxed, &TypeInfo::Record(ty.clone()))? {
                    Val::Record(record) => set(ctx, target, record),
                    other => Err(RuntimeError::CannotConvert {
                        from: other.kind_name(),
                        to: "record",
                    }),
                }
            }
        }
    }
}

/// Read a property through its descriptor.
#[inline]
pub fn fetch<T>(ctx: &ExecContext, descriptor: &PropertyDescriptor<T>, target: &T) -> RuntimeResult<ExecValue> {
    descriptor.fetch(ctx, target)
}

/// Write a property through its descriptor. The setter is not called when the
/// value does not convert.
#[inline]
pub fn store<T>(
    ctx: &ExecContext,
    descriptor: &PropertyDescriptor<T>,
    target: &mut T,
    value: ExecValue,
) -> RuntimeResult<()> {
    descriptor.store(ctx, target, value)
}

/// The descriptors of one object kind, looked up by name without regard to
/// case.
pub struct PropertyTable<T> {
    descriptors: Vec<PropertyDescriptor<T>>,
    index: FastHashMap<String, usize>,
}

impl<T> PropertyTable<T> {
    pub fn new(descriptors: Vec<PropertyDescriptor<T>>) -> Self {
        let mut index = fast_hash_map_with_capacity(descriptors.len());
        for (i, descriptor) in descriptors.iter().enumerate() {
            index.entry(fold_key(descriptor.name)).or_insert(i);
        }
        Self { descriptors, index }
    }

    pub fn find(&self, name: &str) -> Option<&PropertyDescriptor<T>> {
        self.index.get(&fold_key(name)).map(|&i| &self.descriptors[i])
    }

    pub fn descriptors(&self) -> &[PropertyDescriptor<T>] {
        &self.descriptors
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.descriptors.iter().map(|d| d.name)
    }

    pub fn get_property(&self, ctx: &ExecContext, target: &T, name: &str) -> RuntimeResult<ExecValue> {
        self.find(name)
            .ok_or_else(|| RuntimeError::UnknownProperty(name.to_owned()))?
            .fetch(ctx, target)
    }

    pub fn set_property(&self, ctx: &ExecContext, target: &mut T, name: &str, value: ExecValue) -> RuntimeResult<()> {
        self.find(name)
            .ok_or_else(|| RuntimeError::UnknownProperty(name.to_owned()))?
            .store(ctx, target, value)
    }
}
