use crate::{
    error::{RuntimeError, RuntimeResult},
    val::{Name, Val},
};

use super::{ExecContext, ExecValue, Expression};

/// A writable location: a variable or an element of one.
pub trait Container {
    fn get(&self) -> Val;
    fn set(&mut self, ctx: &ExecContext, value: Val) -> RuntimeResult<()>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    name: Name,
    value: Val,
}

impl Variable {
    pub fn new(name: &str, value: impl Into<Val>) -> Self {
        Self {
            name: Name::new(name),
            value: value.into(),
        }
    }

    #[inline]
    pub fn name(&self) -> &Name {
        &self.name
    }

    #[inline]
    pub fn value(&self) -> &Val {
        &self.value
    }

    /// Address one element of this variable's array.
    pub fn element(&mut self, key: &str) -> ArrayElement<'_> {
        ArrayElement {
            variable: self,
            key: key.to_owned(),
        }
    }
}

impl Container for Variable {
    fn get(&self) -> Val {
        self.value.clone()
    }

    fn set(&mut self, _ctx: &ExecContext, value: Val) -> RuntimeResult<()> {
        self.value = value;
        Ok(())
    }
}

impl Expression for Variable {
    fn evaluate(&self, _ctx: &mut ExecContext) -> RuntimeResult<ExecValue> {
        Ok(ExecValue::Value(self.value.clone()))
    }
}

/// `variable[key]`. Keys are matched without regard to case.
#[derive(Debug)]
pub struct ArrayElement<'a> {
    variable: &'a mut Variable,
    key: String,
}

impl Container for ArrayElement<'_> {
    fn get(&self) -> Val {
        match &self.variable.value {
            Val::Array(array) => array.fetch(&self.key, false).cloned().unwrap_or_default(),
            _ => Val::Null,
        }
    }

    fn set(&mut self, ctx: &ExecContext, value: Val) -> RuntimeResult<()> {
        let mut array = ctx
            .convert_to_array(&self.variable.value, false)
            .ok_or(RuntimeError::CannotConvert {
                from: self.variable.value.kind_name(),
                to: "array",
            })?;
        array.store(&self.key, false, value);
        self.variable.value = Val::Array(array);
        Ok(())
    }
}
