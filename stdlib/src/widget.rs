//! Sample object kind. A `Widget` publishes its properties through a
//! descriptor table; a `WidgetSelection` publishes the subset that makes sense
//! across several widgets, reporting `mixed` where they disagree.

use std::{fmt, sync::Arc};

use once_cell::sync::Lazy;
use strand_core::{
    error::{NativeError, RuntimeResult},
    exec::{Color, ExecContext, Rectangle},
    invoke::HandlerSignature,
    module::ExtensionModule,
    property::{
        Accessor, CustomFormat, CustomProperty, EnumElement, EnumPolicy, EnumTypeInfo, ListPolicy, Mixed,
        MixedCustomProperty, MixedOptionalPolicy, MixedPolicy, OptionalPolicy, PlainPolicy, PropertyDescriptor,
        PropertyPolicy, PropertyTable, SetElement, SetTypeInfo,
    },
    val::{RecordValue, StrValue, Val},
};

use crate::{geometry::VECTOR, number_val};

pub static TEXT_ALIGN: EnumTypeInfo = EnumTypeInfo {
    name: "TextAlign",
    elements: &[
        EnumElement::new("left", 0),
        EnumElement::new("center", 1),
        EnumElement::new("right", 2),
        EnumElement::read_only("natural", 3),
    ],
};

pub static TEXT_STYLE: SetTypeInfo = SetTypeInfo {
    name: "TextStyle",
    elements: &[
        SetElement::new("bold", 0x1),
        SetElement::new("italic", 0x2),
        SetElement::new("underline", 0x4),
        SetElement::new("strikeout", 0x8),
    ],
};

/// Inner spacing, rendered as `"left top right bottom"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Margins {
    pub left: u16,
    pub top: u16,
    pub right: u16,
    pub bottom: u16,
}

impl Margins {
    pub const fn uniform(value: u16) -> Self {
        Margins {
            left: value,
            top: value,
            right: value,
            bottom: value,
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        let mut parts = text.split_whitespace().map(|p| p.parse::<u16>());
        let margins = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(Ok(all)), None, None, None) => Margins::uniform(all),
            (Some(Ok(left)), Some(Ok(top)), Some(Ok(right)), Some(Ok(bottom))) => Margins {
                left,
                top,
                right,
                bottom,
            },
            _ => return None,
        };
        if parts.next().is_some() {
            return None;
        }
        Some(margins)
    }
}

impl fmt::Display for Margins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.left, self.top, self.right, self.bottom)
    }
}

fn margins_format() -> CustomFormat<Margins> {
    CustomFormat {
        type_name: "margins",
        format: |m| m.to_string(),
        parse: Margins::parse,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Widget {
    pub id: u32,
    pub name: StrValue,
    pub visible: bool,
    pub border_width: u8,
    pub tooltip: Option<StrValue>,
    pub text_color: Option<Color>,
    pub text_align: i32,
    pub text_style: u32,
    pub tab_stops: Vec<u32>,
    pub text: Arc<[Val]>,
    pub rect: Rectangle,
    pub origin: (f64, f64),
    pub margins: Margins,
}

impl Widget {
    pub fn new(id: u32, name: &str) -> Self {
        Widget {
            id,
            name: StrValue::new(name),
            visible: true,
            border_width: 1,
            tooltip: None,
            text_color: None,
            text_align: 0,
            text_style: 0,
            tab_stops: Vec::new(),
            text: Arc::from(Vec::new()),
            rect: Rectangle {
                x: 0,
                y: 0,
                width: 100,
                height: 20,
            },
            origin: (0.0, 0.0),
            margins: Margins::uniform(2),
        }
    }

    pub fn properties() -> &'static PropertyTable<Widget> {
        &WIDGET_PROPERTIES
    }
}

fn get_id(_: &ExecContext, w: &Widget) -> RuntimeResult<u32> {
    Ok(w.id)
}

fn get_name(_: &ExecContext, w: &Widget) -> RuntimeResult<StrValue> {
    Ok(w.name.clone())
}

fn set_name(_: &ExecContext, w: &mut Widget, v: StrValue) -> RuntimeResult<()> {
    w.name = v;
    Ok(())
}

fn get_visible(_: &ExecContext, w: &Widget) -> RuntimeResult<bool> {
    Ok(w.visible)
}

fn set_visible(_: &ExecContext, w: &mut Widget, v: bool) -> RuntimeResult<()> {
    w.visible = v;
    Ok(())
}

fn get_width(_: &ExecContext, w: &Widget) -> RuntimeResult<u16> {
    Ok(w.rect.width)
}

fn set_width(_: &ExecContext, w: &mut Widget, v: u16) -> RuntimeResult<()> {
    w.rect.width = v;
    Ok(())
}

fn get_height(_: &ExecContext, w: &Widget) -> RuntimeResult<u16> {
    Ok(w.rect.height)
}

fn set_height(_: &ExecContext, w: &mut Widget, v: u16) -> RuntimeResult<()> {
    w.rect.height = v;
    Ok(())
}

fn get_border_width(_: &ExecContext, w: &Widget) -> RuntimeResult<u8> {
    Ok(w.border_width)
}

fn set_border_width(_: &ExecContext, w: &mut Widget, v: u8) -> RuntimeResult<()> {
    w.border_width = v;
    Ok(())
}

fn get_tooltip(_: &ExecContext, w: &Widget) -> RuntimeResult<Option<StrValue>> {
    Ok(w.tooltip.clone())
}

fn set_tooltip(_: &ExecContext, w: &mut Widget, v: Option<StrValue>) -> RuntimeResult<()> {
    w.tooltip = v;
    Ok(())
}

fn get_text_color(_: &ExecContext, w: &Widget) -> RuntimeResult<Option<Color>> {
    Ok(w.text_color)
}

fn set_text_color(_: &ExecContext, w: &mut Widget, v: Option<Color>) -> RuntimeResult<()> {
    w.text_color = v;
    Ok(())
}

fn get_text_align(_: &ExecContext, w: &Widget) -> RuntimeResult<i32> {
    Ok(w.text_align)
}

fn set_text_align(_: &ExecContext, w: &mut Widget, v: i32) -> RuntimeResult<()> {
    w.text_align = v;
    Ok(())
}

fn get_text_style(_: &ExecContext, w: &Widget) -> RuntimeResult<u32> {
    Ok(w.text_style)
}

fn set_text_style(_: &ExecContext, w: &mut Widget, v: u32) -> RuntimeResult<()> {
    w.text_style = v;
    Ok(())
}

fn get_tab_stops(_: &ExecContext, w: &Widget) -> RuntimeResult<Vec<u32>> {
    Ok(w.tab_stops.clone())
}

fn set_tab_stops(_: &ExecContext, w: &mut Widget, v: Vec<u32>) -> RuntimeResult<()> {
    w.tab_stops = v;
    Ok(())
}

fn get_text(_: &ExecContext, w: &Widget) -> RuntimeResult<Arc<[Val]>> {
    Ok(w.text.clone())
}

fn set_text(_: &ExecContext, w: &mut Widget, v: Arc<[Val]>) -> RuntimeResult<()> {
    w.text = v;
    Ok(())
}

fn get_rect(_: &ExecContext, w: &Widget) -> RuntimeResult<Rectangle> {
    Ok(w.rect)
}

fn set_rect(_: &ExecContext, w: &mut Widget, v: Rectangle) -> RuntimeResult<()> {
    w.rect = v;
    Ok(())
}

fn get_origin(_: &ExecContext, w: &Widget) -> RuntimeResult<RecordValue> {
    RecordValue::new(Arc::clone(&VECTOR), vec![number_val(w.origin.0), number_val(w.origin.1)])
}

fn set_origin(_: &ExecContext, w: &mut Widget, v: RecordValue) -> RuntimeResult<()> {
    let coord = |field| v.fetch(field).and_then(Val::as_number).map(|n| n.as_real()).unwrap_or_default();
    w.origin = (coord("x"), coord("y"));
    Ok(())
}

fn get_margins(_: &ExecContext, w: &Widget) -> RuntimeResult<Margins> {
    Ok(w.margins)
}

fn set_margins(_: &ExecContext, w: &mut Widget, v: Margins) -> RuntimeResult<()> {
    w.margins = v;
    Ok(())
}

static WIDGET_PROPERTIES: Lazy<PropertyTable<Widget>> = Lazy::new(|| {
    use PropertyPolicy as P;
    PropertyTable::new(vec![
        PropertyDescriptor::new("id", P::Plain(PlainPolicy::UInt32(Accessor::read_only(get_id)))),
        PropertyDescriptor::new("name", P::Plain(PlainPolicy::String(Accessor::read_write(get_name, set_name)))),
        PropertyDescriptor::new(
            "visible",
            P::Plain(PlainPolicy::Bool(Accessor::read_write(get_visible, set_visible))),
        ),
        PropertyDescriptor::new(
            "width",
            P::Plain(PlainPolicy::UInt16(Accessor::read_write(get_width, set_width))),
        ),
        PropertyDescriptor::new(
            "height",
            P::Plain(PlainPolicy::UInt16(Accessor::read_write(get_height, set_height))),
        ),
        PropertyDescriptor::new(
            "borderWidth",
            P::Plain(PlainPolicy::UInt8(Accessor::read_write(get_border_width, set_border_width))),
        ),
        PropertyDescriptor::new(
            "tooltip",
            P::Optional(OptionalPolicy::String(Accessor::read_write(get_tooltip, set_tooltip))),
        ),
        PropertyDescriptor::new(
            "textColor",
            P::Optional(OptionalPolicy::Color(Accessor::read_write(get_text_color, set_text_color))),
        ),
        PropertyDescriptor::new(
            "textAlign",
            P::Enum {
                info: &TEXT_ALIGN,
                policy: EnumPolicy::Plain(Accessor::read_write(get_text_align, set_text_align)),
            },
        ),
        PropertyDescriptor::new(
            "textStyle",
            P::Set {
                info: &TEXT_STYLE,
                accessor: Accessor::read_write(get_text_style, set_text_style),
            },
        ),
        PropertyDescriptor::new(
            "tabStops",
            P::List(ListPolicy::ItemsOfLooseUInt(Accessor::read_write(get_tab_stops, set_tab_stops))),
        ),
        PropertyDescriptor::new(
            "text",
            P::List(ListPolicy::ProperLinesOfString(Accessor::read_write(get_text, set_text))),
        ),
        PropertyDescriptor::new(
            "rect",
            P::Plain(PlainPolicy::Rectangle(Accessor::read_write(get_rect, set_rect))),
        ),
        PropertyDescriptor::new(
            "origin",
            P::Record {
                ty: Arc::clone(&VECTOR),
                accessor: Accessor::read_write(get_origin, set_origin),
            },
        ),
        PropertyDescriptor::new(
            "margins",
            P::Custom(Box::new(CustomProperty {
                get: get_margins,
                set: Some(set_margins),
                codec: margins_format(),
            })),
        ),
    ])
});

/// Several widgets edited together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WidgetSelection {
    pub widgets: Vec<Widget>,
}

impl WidgetSelection {
    pub fn new(widgets: Vec<Widget>) -> Self {
        Self { widgets }
    }

    pub fn properties() -> &'static PropertyTable<WidgetSelection> {
        &SELECTION_PROPERTIES
    }

    fn mixed<X: PartialEq + Default>(&self, read: impl Fn(&Widget) -> X) -> Mixed<X> {
        Mixed::from_values(self.widgets.iter().map(read)).unwrap_or_else(|| Mixed::same(X::default()))
    }

    fn apply(&mut self, write: impl Fn(&mut Widget)) {
        self.widgets.iter_mut().for_each(write);
    }
}

fn sel_get_visible(_: &ExecContext, s: &WidgetSelection) -> RuntimeResult<Mixed<bool>> {
    Ok(s.mixed(|w| w.visible))
}

fn sel_set_visible(_: &ExecContext, s: &mut WidgetSelection, v: bool) -> RuntimeResult<()> {
    s.apply(|w| w.visible = v);
    Ok(())
}

fn sel_get_width(_: &ExecContext, s: &WidgetSelection) -> RuntimeResult<Mixed<u16>> {
    Ok(s.mixed(|w| w.rect.width))
}

fn sel_set_width(_: &ExecContext, s: &mut WidgetSelection, v: u16) -> RuntimeResult<()> {
    s.apply(|w| w.rect.width = v);
    Ok(())
}

fn sel_get_tooltip(_: &ExecContext, s: &WidgetSelection) -> RuntimeResult<Mixed<Option<StrValue>>> {
    Ok(s.mixed(|w| w.tooltip.clone()))
}

fn sel_set_tooltip(_: &ExecContext, s: &mut WidgetSelection, v: Option<StrValue>) -> RuntimeResult<()> {
    s.apply(|w| w.tooltip = v.clone());
    Ok(())
}

fn sel_get_text_align(_: &ExecContext, s: &WidgetSelection) -> RuntimeResult<Mixed<i32>> {
    Ok(s.mixed(|w| w.text_align))
}

fn sel_set_text_align(_: &ExecContext, s: &mut WidgetSelection, v: i32) -> RuntimeResult<()> {
    s.apply(|w| w.text_align = v);
    Ok(())
}

fn sel_get_tab_stops(_: &ExecContext, s: &WidgetSelection) -> RuntimeResult<Mixed<Vec<u32>>> {
    Ok(s.mixed(|w| w.tab_stops.clone()))
}

fn sel_set_tab_stops(_: &ExecContext, s: &mut WidgetSelection, v: Vec<u32>) -> RuntimeResult<()> {
    s.apply(|w| w.tab_stops = v.clone());
    Ok(())
}

fn sel_get_margins(_: &ExecContext, s: &WidgetSelection) -> RuntimeResult<Mixed<Margins>> {
    Ok(s.mixed(|w| w.margins))
}

fn sel_set_margins(_: &ExecContext, s: &mut WidgetSelection, v: Margins) -> RuntimeResult<()> {
    s.apply(|w| w.margins = v);
    Ok(())
}

static SELECTION_PROPERTIES: Lazy<PropertyTable<WidgetSelection>> = Lazy::new(|| {
    use PropertyPolicy as P;
    PropertyTable::new(vec![
        PropertyDescriptor::new(
            "visible",
            P::Mixed(MixedPolicy::Bool(Accessor::read_write(sel_get_visible, sel_set_visible))),
        ),
        PropertyDescriptor::new(
            "width",
            P::Mixed(MixedPolicy::UInt16(Accessor::read_write(sel_get_width, sel_set_width))),
        ),
        PropertyDescriptor::new(
            "tooltip",
            P::MixedOptional(MixedOptionalPolicy::String(Accessor::read_write(
                sel_get_tooltip,
                sel_set_tooltip,
            ))),
        ),
        PropertyDescriptor::new(
            "textAlign",
            P::Enum {
                info: &TEXT_ALIGN,
                policy: EnumPolicy::Mixed(Accessor::read_write(sel_get_text_align, sel_set_text_align)),
            },
        ),
        PropertyDescriptor::new(
            "tabStops",
            P::List(ListPolicy::MixedItemsOfLooseUInt(Accessor::read_write(
                sel_get_tab_stops,
                sel_set_tab_stops,
            ))),
        ),
        PropertyDescriptor::new(
            "margins",
            P::Custom(Box::new(MixedCustomProperty {
                get: sel_get_margins,
                set: Some(sel_set_margins),
                codec: margins_format(),
            })),
        ),
    ])
});

/// Registers the widget object kind. Object kinds publish properties, not
/// handlers, so this module adds nothing to the handler map.
#[derive(Debug)]
pub struct WidgetModule;

impl ExtensionModule for WidgetModule {
    fn name(&self) -> &str {
        "widget"
    }

    fn description(&self) -> &str {
        "Widget object kind"
    }

    fn is_library(&self) -> bool {
        false
    }

    fn handler_names(&self) -> Vec<&str> {
        Vec::new()
    }

    fn signature(&self, _handler: &str) -> Option<&HandlerSignature> {
        None
    }

    fn call(&mut self, handler: &str, _args: &mut [Val]) -> Result<Val, NativeError> {
        tracing::warn!(target: "strand::widget", handler, "widget object kind called as a library");
        Err(NativeError::new("widget", format!("widget has no handler '{}'", handler)))
    }
}
