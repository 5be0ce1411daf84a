use crate::{
    error::{RuntimeError, RuntimeResult},
    exec::{ExecContext, ExecValue},
};

use super::{
    policy::{Getter, Setter},
    scalar::{MIXED, Mixed, convert_string},
};

/// Type-erased codec for properties whose payload has its own text form.
pub trait CustomCodec<T>: Send + Sync {
    fn is_read_only(&self) -> bool;
    fn fetch(&self, ctx: &ExecContext, target: &T) -> RuntimeResult<ExecValue>;
    fn store(&self, name: &'static str, ctx: &ExecContext, target: &mut T, value: ExecValue) -> RuntimeResult<()>;
}

/// Text codec of a custom payload. `parse` returns `None` for text that does
/// not denote a payload.
pub struct CustomFormat<X> {
    pub type_name: &'static str,
    pub format: fn(&X) -> String,
    pub parse: fn(&str) -> Option<X>,
}

impl<X> CustomFormat<X> {
    fn decode(&self, ctx: &ExecContext, value: ExecValue) -> RuntimeResult<X> {
        let text = convert_string(ctx, value)?;
        (self.parse)(text.as_str()).ok_or(RuntimeError::CannotConvert {
            from: "string",
            to: self.type_name,
        })
    }
}

pub struct CustomProperty<T, X> {
    pub get: Getter<T, X>,
    pub set: Option<Setter<T, X>>,
    pub codec: CustomFormat<X>,
}

impl<T, X> CustomCodec<T> for CustomProperty<T, X> {
    fn is_read_only(&self) -> bool {
        self.set.is_none()
    }

    fn fetch(&self, ctx: &ExecContext, target: &T) -> RuntimeResult<ExecValue> {
        let payload = (self.get)(ctx, target)?;
        Ok(ExecValue::string(&(self.codec.format)(&payload)))
    }

    fn store(&self, name: &'static str, ctx: &ExecContext, target: &mut T, value: ExecValue) -> RuntimeResult<()> {
        let set = self.set.ok_or(RuntimeError::ReadOnlyProperty(name))?;
        let payload = self.codec.decode(ctx, value)?;
        set(ctx, target, payload)
    }
}

pub struct MixedCustomProperty<T, X> {
    pub get: Getter<T, Mixed<X>>,
    pub set: Option<Setter<T, X>>,
    pub codec: CustomFormat<X>,
}

impl<T, X> CustomCodec<T> for MixedCustomProperty<T, X> {
    fn is_read_only(&self) -> bool {
        self.set.is_none()
    }

    fn fetch(&self, ctx: &ExecContext, target: &T) -> RuntimeResult<ExecValue> {
        let mixed = (self.get)(ctx, target)?;
        if mixed.differs {
            return Ok(ExecValue::string(MIXED));
        }
        Ok(ExecValue::string(&(self.codec.format)(&mixed.value)))
    }

    fn store(&self, name: &'static str, ctx: &ExecContext, target: &mut T, value: ExecValue) -> RuntimeResult<()> {
        let set = self.set.ok_or(RuntimeError::ReadOnlyProperty(name))?;
        let payload = self.codec.decode(ctx, value)?;
        set(ctx, target, payload)
    }
}
