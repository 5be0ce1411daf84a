//! Scalar policy families. Each family is a closed enum over the payload
//! kinds it supports; the variant pins the accessor's payload type.

use crate::{
    error::{RuntimeError, RuntimeResult},
    exec::{Color, ExecContext, ExecValue, Point, Rectangle},
    val::{ArrayValue, Data, Name, StrValue, Val},
};

use super::scalar::{Bounded, FromExec, IntoExec, Mixed};

pub type Getter<T, X> = fn(&ExecContext, &T) -> RuntimeResult<X>;
pub type Setter<T, X> = fn(&ExecContext, &mut T, X) -> RuntimeResult<()>;

/// Typed getter plus optional setter. `G` is what the getter returns and `S`
/// what the setter accepts; they differ for mixed properties.
pub struct Accessor<T, G, S = G> {
    pub get: Getter<T, G>,
    pub set: Option<Setter<T, S>>,
}

impl<T, G, S> Accessor<T, G, S> {
    pub const fn read_write(get: Getter<T, G>, set: Setter<T, S>) -> Self {
        Accessor { get, set: Some(set) }
    }

    pub const fn read_only(get: Getter<T, G>) -> Self {
        Accessor { get, set: None }
    }

    #[inline]
    pub fn is_read_only(&self) -> bool {
        self.set.is_none()
    }

    pub(crate) fn fetch(&self, ctx: &ExecContext, target: &T) -> RuntimeResult<ExecValue>
    where
        G: IntoExec,
    {
        (self.get)(ctx, target)?.into_exec(ctx)
    }

    /// Convert first, then call the setter; a failed conversion never reaches
    /// the setter.
    pub(crate) fn store(&self, name: &'static str, ctx: &ExecContext, target: &mut T, value: ExecValue) -> RuntimeResult<()>
    where
        S: FromExec,
    {
        let set = self.set.ok_or(RuntimeError::ReadOnlyProperty(name))?;
        let payload = S::from_exec(ctx, value)?;
        set(ctx, target, payload)
    }
}

pub type UInt16In1To16 = Bounded<1, 16>;
pub type UInt16In1To65535 = Bounded<1, 65535>;

type Same<X> = X;
type Opt<X> = Option<X>;
type Mix<X> = Mixed<X>;
type MixOpt<X> = Mixed<Option<X>>;

macro_rules! policy_family {
    (
        $(#[$meta:meta])*
        $family:ident: get $get:ident, set $set:ident {
            $($variant:ident => $ty:ty),* $(,)?
        }
    ) => {
        $(#[$meta])*
        pub enum $family<T> {
            $($variant(Accessor<T, $get<$ty>, $set<$ty>>),)*
        }

        impl<T> $family<T> {
            pub fn is_read_only(&self) -> bool {
                match self {
                    $($family::$variant(a) => a.is_read_only(),)*
                }
            }

            pub(crate) fn fetch(&self, ctx: &ExecContext, target: &T) -> RuntimeResult<ExecValue> {
                match self {
                    $($family::$variant(a) => a.fetch(ctx, target),)*
                }
            }

            pub(crate) fn store(
                &self,
                name: &'static str,
                ctx: &ExecContext,
                target: &mut T,
                value: ExecValue,
            ) -> RuntimeResult<()> {
                match self {
                    $($family::$variant(a) => a.store(name, ctx, target, value),)*
                }
            }
        }
    };
}

policy_family! {
    /// Getter and setter operate on exactly one payload kind.
    PlainPolicy: get Same, set Same {
        Any => Val,
        Bool => bool,
        Int16 => i16,
        Int32 => i32,
        UInt8 => u8,
        UInt16 => u16,
        UInt16In1To16 => UInt16In1To16,
        UInt16In1To65535 => UInt16In1To65535,
        UInt32 => u32,
        Double => f64,
        Char => char,
        String => StrValue,
        BinaryString => Data,
        Name => Name,
        Array => ArrayValue,
        Color => Color,
        Rectangle => Rectangle,
        Point => Point,
        Int16X2 => [i16; 2],
        Int16X4 => [i16; 4],
        Int32X2 => [i32; 2],
        Int32X4 => [i32; 4],
    }
}

policy_family! {
    /// Absent fetches as the empty string; an empty value stores as absent.
    OptionalPolicy: get Opt, set Opt {
        Bool => bool,
        UInt8 => u8,
        Int16 => i16,
        UInt16 => u16,
        UInt32 => u32,
        Double => f64,
        String => StrValue,
        Rectangle => Rectangle,
        Point => Point,
        Color => Color,
    }
}

policy_family! {
    /// One property over several targets; disagreement fetches as `"mixed"`.
    MixedPolicy: get Mix, set Same {
        Bool => bool,
        Int16 => i16,
        UInt8 => u8,
        UInt16 => u16,
        UInt32 => u32,
    }
}

policy_family! {
    MixedOptionalPolicy: get MixOpt, set Opt {
        Bool => bool,
        Int16 => i16,
        Int32 => i32,
        UInt8 => u8,
        UInt16 => u16,
        UInt32 => u32,
        String => StrValue,
    }
}
