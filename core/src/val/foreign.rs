use std::{any::Any, fmt, sync::Arc};

use crate::error::{RuntimeError, RuntimeResult};

use super::{TypeInfo, Val};

pub type ForeignPayload = Arc<dyn Any + Send + Sync>;

/// Convert a foreign payload into a value of the bridge type.
pub type ImportFn = fn(&ForeignValue) -> RuntimeResult<Val>;

/// Convert a value already shaped as the bridge type into a native payload.
pub type ExportFn = fn(&Val) -> RuntimeResult<ForeignPayload>;

/// Descriptor of a natively laid out type owned by an extension module.
pub struct ForeignType {
    name: String,
    bridge: Option<TypeInfo>,
    import: Option<ImportFn>,
    export: Option<ExportFn>,
}

impl ForeignType {
    /// A foreign type with no script representation.
    pub fn opaque(name: &str) -> Arc<Self> {
        Arc::new(ForeignType {
            name: name.to_owned(),
            bridge: None,
            import: None,
            export: None,
        })
    }

    pub fn bridged(name: &str, bridge: TypeInfo, import: ImportFn, export: ExportFn) -> Arc<Self> {
        Arc::new(ForeignType {
            name: name.to_owned(),
            bridge: Some(bridge),
            import: Some(import),
            export: Some(export),
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn bridge_type(&self) -> Option<&TypeInfo> {
        self.bridge.as_ref()
    }

    pub fn import(&self, value: &ForeignValue) -> RuntimeResult<Val> {
        match self.import {
            Some(import) => import(value),
            None => Err(RuntimeError::Unrepresentable { kind: "foreign" }),
        }
    }

    pub fn export(self: &Arc<Self>, value: &Val) -> RuntimeResult<ForeignValue> {
        let export = self.export.ok_or(RuntimeError::CannotConvert {
            from: value.kind_name(),
            to: "foreign",
        })?;
        Ok(ForeignValue {
            ty: self.clone(),
            payload: export(value)?,
        })
    }
}

impl fmt::Debug for ForeignType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForeignType")
            .field("name", &self.name)
            .field("bridge", &self.bridge)
            .finish()
    }
}

#[derive(Clone)]
pub struct ForeignValue {
    ty: Arc<ForeignType>,
    payload: ForeignPayload,
}

impl ForeignValue {
    pub fn new<P: Any + Send + Sync>(ty: Arc<ForeignType>, payload: P) -> Self {
        ForeignValue {
            ty,
            payload: Arc::new(payload),
        }
    }

    #[inline]
    pub fn foreign_type(&self) -> &Arc<ForeignType> {
        &self.ty
    }

    #[inline]
    pub fn downcast_ref<P: Any>(&self) -> Option<&P> {
        self.payload.downcast_ref()
    }

    #[inline]
    pub fn is_of_type(&self, ty: &Arc<ForeignType>) -> bool {
        Arc::ptr_eq(&self.ty, ty)
    }
}

impl PartialEq for ForeignValue {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.ty, &other.ty) && Arc::ptr_eq(&self.payload, &other.payload)
    }
}

impl fmt::Debug for ForeignValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<foreign {}>", self.ty.name)
    }
}
