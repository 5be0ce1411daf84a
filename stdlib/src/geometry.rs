//! Record and foreign-type handlers: `Vector` travels as a record, `Pixel` as
//! an opaque `u32` that scripts see as a number.

use std::sync::Arc;

use anyhow::Result;
use once_cell::sync::Lazy;
use strand_core::{
    error::{NativeError, RuntimeError, RuntimeResult},
    invoke::HandlerSignature,
    module::{ExtensionModule, HandlerTable},
    val::{ForeignPayload, ForeignType, ForeignValue, RecordType, TypeInfo, TypeResolver, Val},
};

use crate::{number_arg, number_val};

const DOMAIN: &str = "geometry";

pub static VECTOR: Lazy<Arc<RecordType>> =
    Lazy::new(|| RecordType::new("Vector", [("x", TypeInfo::Number), ("y", TypeInfo::Number)]));

pub static PIXEL: Lazy<Arc<ForeignType>> =
    Lazy::new(|| ForeignType::bridged("Pixel", TypeInfo::Number, import_pixel, export_pixel));

/// Step `brighten` adds to each channel.
const BRIGHTEN_STEP: u32 = 0x20;

fn import_pixel(value: &ForeignValue) -> RuntimeResult<Val> {
    match value.downcast_ref::<u32>() {
        Some(rgb) => Ok(Val::from(*rgb)),
        None => Err(RuntimeError::Unrepresentable { kind: "foreign" }),
    }
}

fn export_pixel(value: &Val) -> RuntimeResult<ForeignPayload> {
    let rgb = match value.as_number().and_then(|n| n.as_exact_int()) {
        Some(i) if (0..=0xFF_FFFF).contains(&i) => i as u32,
        _ => {
            return Err(RuntimeError::CannotConvert {
                from: value.kind_name(),
                to: "Pixel",
            });
        }
    };
    Ok(Arc::new(rgb))
}

/// Resolves the type names this library declares.
pub struct GeometryTypes;

impl TypeResolver for GeometryTypes {
    fn resolve_type(&self, name: &str) -> Option<TypeInfo> {
        if name.eq_ignore_ascii_case("vector") {
            Some(TypeInfo::Record(Arc::clone(&VECTOR)))
        } else if name.eq_ignore_ascii_case("pixel") {
            Some(TypeInfo::Foreign(Arc::clone(&PIXEL)))
        } else {
            None
        }
    }
}

#[derive(Debug)]
pub struct GeometryModule {
    handlers: HandlerTable,
}

impl GeometryModule {
    pub fn new() -> Result<Self> {
        let mut handlers = HandlerTable::new();
        handlers
            .add(
                "offsetVector",
                "(inout Vector, in number, in number) -> Vector",
                &GeometryTypes,
                Self::offset_vector,
            )?
            .add("brighten", "(in Pixel) -> Pixel", &GeometryTypes, Self::brighten)?;
        Ok(Self { handlers })
    }

    /// Moves the vector in place and returns the moved vector.
    fn offset_vector(args: &mut [Val]) -> Result<Val, NativeError> {
        let dx = number_arg(DOMAIN, args, 1)?;
        let dy = number_arg(DOMAIN, args, 2)?;
        let Some(Val::Record(vector)) = args.first_mut() else {
            return Err(NativeError::new(DOMAIN, "offsetVector expects a Vector"));
        };
        let coord = |v: Option<&Val>| v.and_then(Val::as_number).map(|n| n.as_real()).unwrap_or_default();
        let x = coord(vector.fetch("x")) + dx;
        let y = coord(vector.fetch("y")) + dy;
        vector.store("x", number_val(x));
        vector.store("y", number_val(y));
        Ok(Val::Record(vector.clone()))
    }

    fn brighten(args: &mut [Val]) -> Result<Val, NativeError> {
        let rgb = match args.first() {
            Some(Val::Foreign(pixel)) if pixel.is_of_type(&PIXEL) => pixel.downcast_ref::<u32>().copied(),
            _ => None,
        }
        .ok_or_else(|| NativeError::new(DOMAIN, "brighten expects a Pixel"))?;

        let channel = |shift: u32| (((rgb >> shift) & 0xFF) + BRIGHTEN_STEP).min(0xFF) << shift;
        let brighter = channel(16) | channel(8) | channel(0);
        Ok(Val::Foreign(ForeignValue::new(Arc::clone(&PIXEL), brighter)))
    }
}

impl ExtensionModule for GeometryModule {
    fn name(&self) -> &str {
        "geometry"
    }

    fn description(&self) -> &str {
        "Vector records and Pixel values"
    }

    fn handler_names(&self) -> Vec<&str> {
        self.handlers.names()
    }

    fn signature(&self, handler: &str) -> Option<&HandlerSignature> {
        self.handlers.signature(handler)
    }

    fn call(&mut self, handler: &str, args: &mut [Val]) -> Result<Val, NativeError> {
        self.handlers.call(DOMAIN, handler, args)
    }
}
