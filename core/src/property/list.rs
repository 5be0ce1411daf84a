//! Delimited-list properties: a sequence of payloads rendered as one string,
//! newline separated for `Lines*` and comma separated for `Items*`.

use std::sync::Arc;

use crate::{
    error::{RuntimeError, RuntimeResult},
    exec::{ExecContext, ExecValue, Point},
    val::{StrValue, Val, format_real},
};

use super::{
    policy::Accessor,
    scalar::{MIXED, Mixed, convert_string, integral_in},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Lines,
    Items,
}

impl Delimiter {
    #[inline]
    pub fn as_char(self) -> char {
        match self {
            Delimiter::Lines => '\n',
            Delimiter::Items => ',',
        }
    }
}

/// One element of a delimited list.
pub trait ListElement: Sized {
    /// Loose lists read empty segments as zero, including the one after a
    /// trailing delimiter.
    const LOOSE: bool = false;

    fn format(&self, ctx: &ExecContext, out: &mut String) -> RuntimeResult<()>;
    fn parse(ctx: &ExecContext, segment: &str) -> RuntimeResult<Self>;
}

/// Split `text` into segments. An empty text is an empty list; outside loose
/// lists one trailing delimiter is ignored.
pub fn split_segments(text: &str, delimiter: Delimiter, loose: bool) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }
    let sep = delimiter.as_char();
    let body = if loose { text } else { text.strip_suffix(sep).unwrap_or(text) };
    body.split(sep)
        .map(|s| if delimiter == Delimiter::Lines { s.strip_suffix('\r').unwrap_or(s) } else { s })
        .collect()
}

pub fn parse_list<E: ListElement>(ctx: &ExecContext, text: &str, delimiter: Delimiter) -> RuntimeResult<Vec<E>> {
    split_segments(text, delimiter, E::LOOSE)
        .into_iter()
        .map(|segment| E::parse(ctx, segment))
        .collect()
}

pub fn format_list<E: ListElement>(ctx: &ExecContext, items: &[E], delimiter: Delimiter) -> RuntimeResult<String> {
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(delimiter.as_char());
        }
        item.format(ctx, &mut out)?;
    }
    Ok(out)
}

impl ListElement for String {
    fn format(&self, _ctx: &ExecContext, out: &mut String) -> RuntimeResult<()> {
        out.push_str(self);
        Ok(())
    }

    fn parse(_ctx: &ExecContext, segment: &str) -> RuntimeResult<Self> {
        Ok(segment.to_owned())
    }
}

/// Proper-list backed string lists hold script values.
impl ListElement for Val {
    fn format(&self, ctx: &ExecContext, out: &mut String) -> RuntimeResult<()> {
        let text = ctx.convert_to_string(self).ok_or(RuntimeError::CannotConvert {
            from: self.kind_name(),
            to: "string",
        })?;
        out.push_str(text.as_str());
        Ok(())
    }

    fn parse(_ctx: &ExecContext, segment: &str) -> RuntimeResult<Self> {
        Ok(Val::Str(StrValue::new(segment)))
    }
}

fn loose_real(ctx: &ExecContext, segment: &str) -> RuntimeResult<f64> {
    let segment = segment.trim();
    if segment.is_empty() {
        return Ok(0.0);
    }
    ctx.string_to_number(&StrValue::new(segment))
        .ok_or_else(RuntimeError::not_a_number)
}

impl ListElement for u32 {
    const LOOSE: bool = true;

    fn format(&self, _ctx: &ExecContext, out: &mut String) -> RuntimeResult<()> {
        out.push_str(itoa::Buffer::new().format(*self));
        Ok(())
    }

    fn parse(ctx: &ExecContext, segment: &str) -> RuntimeResult<Self> {
        let real = loose_real(ctx, segment)?;
        integral_in(real, 0, u32::MAX as i64).map(|v| v as u32)
    }
}

impl ListElement for f64 {
    const LOOSE: bool = true;

    fn format(&self, ctx: &ExecContext, out: &mut String) -> RuntimeResult<()> {
        out.push_str(&format_real(*self, ctx.number_format()));
        Ok(())
    }

    fn parse(ctx: &ExecContext, segment: &str) -> RuntimeResult<Self> {
        loose_real(ctx, segment)
    }
}

/// `a,b` pairs, one per line.
impl ListElement for [u32; 2] {
    fn format(&self, _ctx: &ExecContext, out: &mut String) -> RuntimeResult<()> {
        let mut buf = itoa::Buffer::new();
        out.push_str(buf.format(self[0]));
        out.push(',');
        out.push_str(buf.format(self[1]));
        Ok(())
    }

    fn parse(ctx: &ExecContext, segment: &str) -> RuntimeResult<Self> {
        let (a, b) = segment.split_once(',').ok_or_else(RuntimeError::not_a_number)?;
        Ok([<u32 as ListElement>::parse(ctx, a)?, <u32 as ListElement>::parse(ctx, b)?])
    }
}

/// Empty lines stand for the detached point.
impl ListElement for Point {
    fn format(&self, _ctx: &ExecContext, out: &mut String) -> RuntimeResult<()> {
        if !self.is_detached() {
            out.push_str(&self.to_string());
        }
        Ok(())
    }

    fn parse(_ctx: &ExecContext, segment: &str) -> RuntimeResult<Self> {
        if segment.trim().is_empty() {
            return Ok(Point::DETACHED);
        }
        Point::parse(segment).ok_or(RuntimeError::CannotConvert {
            from: "string",
            to: "point",
        })
    }
}

type ListOf<T, E> = Accessor<T, Vec<E>>;

pub enum ListPolicy<T> {
    LinesOfString(ListOf<T, String>),
    ItemsOfString(ListOf<T, String>),
    ProperLinesOfString(Accessor<T, Arc<[Val]>>),
    ProperItemsOfString(Accessor<T, Arc<[Val]>>),
    LinesOfLooseUInt(ListOf<T, u32>),
    ItemsOfLooseUInt(ListOf<T, u32>),
    OptionalItemsOfLooseUInt(Accessor<T, Option<Vec<u32>>>),
    LinesOfLooseDouble(ListOf<T, f64>),
    LinesOfUIntX2(ListOf<T, [u32; 2]>),
    LinesOfPoint(ListOf<T, Point>),
    MixedItemsOfLooseUInt(Accessor<T, Mixed<Vec<u32>>, Vec<u32>>),
    MixedItemsOfString(Accessor<T, Mixed<Vec<String>>, Vec<String>>),
    MixedLinesOfLooseUInt(Accessor<T, Mixed<Vec<u32>>, Vec<u32>>),
}

fn fetch_plain<T, E: ListElement>(
    a: &ListOf<T, E>,
    ctx: &ExecContext,
    target: &T,
    delimiter: Delimiter,
) -> RuntimeResult<ExecValue> {
    let items = (a.get)(ctx, target)?;
    Ok(ExecValue::string(&format_list(ctx, &items, delimiter)?))
}

fn fetch_mixed<T, E: ListElement>(
    a: &Accessor<T, Mixed<Vec<E>>, Vec<E>>,
    ctx: &ExecContext,
    target: &T,
    delimiter: Delimiter,
) -> RuntimeResult<ExecValue> {
    let mixed = (a.get)(ctx, target)?;
    if mixed.differs {
        return Ok(ExecValue::string(MIXED));
    }
    Ok(ExecValue::string(&format_list(ctx, &mixed.value, delimiter)?))
}

fn fetch_proper<T>(
    a: &Accessor<T, Arc<[Val]>>,
    ctx: &ExecContext,
    target: &T,
    delimiter: Delimiter,
) -> RuntimeResult<ExecValue> {
    let items = (a.get)(ctx, target)?;
    Ok(ExecValue::string(&format_list(ctx, &items[..], delimiter)?))
}

fn store_items<T, G, E: ListElement>(
    a: &Accessor<T, G, Vec<E>>,
    name: &'static str,
    ctx: &ExecContext,
    target: &mut T,
    value: ExecValue,
    delimiter: Delimiter,
) -> RuntimeResult<()> {
    let set = a.set.ok_or(RuntimeError::ReadOnlyProperty(name))?;
    let text = convert_string(ctx, value)?;
    let items = parse_list(ctx, text.as_str(), delimiter)?;
    set(ctx, target, items)
}

impl<T> ListPolicy<T> {
    pub fn is_read_only(&self) -> bool {
        use ListPolicy::*;
        match self {
            LinesOfString(a) | ItemsOfString(a) => a.is_read_only(),
            ProperLinesOfString(a) | ProperItemsOfString(a) => a.is_read_only(),
            LinesOfLooseUInt(a) | ItemsOfLooseUInt(a) => a.is_read_only(),
            OptionalItemsOfLooseUInt(a) => a.is_read_only(),
            LinesOfLooseDouble(a) => a.is_read_only(),
            LinesOfUIntX2(a) => a.is_read_only(),
            LinesOfPoint(a) => a.is_read_only(),
            MixedItemsOfLooseUInt(a) | MixedLinesOfLooseUInt(a) => a.is_read_only(),
            MixedItemsOfString(a) => a.is_read_only(),
        }
    }

    pub(crate) fn fetch(&self, ctx: &ExecContext, target: &T) -> RuntimeResult<ExecValue> {
        use Delimiter::{Items, Lines};
        use ListPolicy::*;
        match self {
            LinesOfString(a) => fetch_plain(a, ctx, target, Lines),
            ItemsOfString(a) => fetch_plain(a, ctx, target, Items),
            ProperLinesOfString(a) => fetch_proper(a, ctx, target, Lines),
            ProperItemsOfString(a) => fetch_proper(a, ctx, target, Items),
            LinesOfLooseUInt(a) => fetch_plain(a, ctx, target, Lines),
            ItemsOfLooseUInt(a) => fetch_plain(a, ctx, target, Items),
            OptionalItemsOfLooseUInt(a) => match (a.get)(ctx, target)? {
                Some(items) => Ok(ExecValue::string(&format_list(ctx, &items, Items)?)),
                None => Ok(ExecValue::empty()),
            },
            LinesOfLooseDouble(a) => fetch_plain(a, ctx, target, Lines),
            LinesOfUIntX2(a) => fetch_plain(a, ctx, target, Lines),
            LinesOfPoint(a) => fetch_plain(a, ctx, target, Lines),
            MixedItemsOfLooseUInt(a) => fetch_mixed(a, ctx, target, Items),
            MixedItemsOfString(a) => fetch_mixed(a, ctx, target, Items),
            MixedLinesOfLooseUInt(a) => fetch_mixed(a, ctx, target, Lines),
        }
    }

    pub(crate) fn store(&self, name: &'static str, ctx: &ExecContext, target: &mut T, value: ExecValue) -> RuntimeResult<()> {
        use Delimiter::{Items, Lines};
        use ListPolicy::*;
        match self {
            LinesOfString(a) => store_items(a, name, ctx, target, value, Lines),
            ItemsOfString(a) => store_items(a, name, ctx, target, value, Items),
            ProperLinesOfString(a) | ProperItemsOfString(a) => {
                let delimiter = if matches!(self, ProperLinesOfString(_)) { Lines } else { Items };
                let set = a.set.ok_or(RuntimeError::ReadOnlyProperty(name))?;
                let text = convert_string(ctx, value)?;
                let items: Vec<Val> = parse_list(ctx, text.as_str(), delimiter)?;
                set(ctx, target, Arc::from(items))
            }
            LinesOfLooseUInt(a) => store_items(a, name, ctx, target, value, Lines),
            ItemsOfLooseUInt(a) => store_items(a, name, ctx, target, value, Items),
            OptionalItemsOfLooseUInt(a) => {
                let set = a.set.ok_or(RuntimeError::ReadOnlyProperty(name))?;
                if value.is_empty() {
                    return set(ctx, target, None);
                }
                let text = convert_string(ctx, value)?;
                let items = parse_list(ctx, text.as_str(), Items)?;
                set(ctx, target, Some(items))
            }
            LinesOfLooseDouble(a) => store_items(a, name, ctx, target, value, Lines),
            LinesOfUIntX2(a) => store_items(a, name, ctx, target, value, Lines),
            LinesOfPoint(a) => store_items(a, name, ctx, target, value, Lines),
            MixedItemsOfLooseUInt(a) => store_items(a, name, ctx, target, value, Items),
            MixedItemsOfString(a) => store_items(a, name, ctx, target, value, Items),
            MixedLinesOfLooseUInt(a) => store_items(a, name, ctx, target, value, Lines),
        }
    }
}
