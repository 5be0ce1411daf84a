#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use once_cell::sync::Lazy;

    use crate::{
        error::{RuntimeError, RuntimeResult},
        exec::{ExecContext, ExecValue, Point},
        property::{
            Accessor, Bounded, CustomFormat, CustomProperty, EnumElement, EnumPolicy, EnumTypeInfo, ListPolicy, Mixed,
            MixedPolicy, OptionalPolicy, PlainPolicy, PropertyDescriptor, PropertyPolicy, PropertyTable, SetElement,
            SetTypeInfo, UInt16In1To16, fetch, store,
        },
        val::{ArrayValue, RecordType, RecordValue, StrValue, TypeInfo, Val},
    };

    static ALIGN: EnumTypeInfo = EnumTypeInfo {
        name: "Align",
        elements: &[
            EnumElement::new("left", 0),
            EnumElement::new("center", 1),
            EnumElement::read_only("justify", 2),
        ],
    };

    static STYLE: SetTypeInfo = SetTypeInfo {
        name: "Style",
        elements: &[
            SetElement::new("bold", 1),
            SetElement::new("italic", 2),
            SetElement::new("underline", 4),
        ],
    };

    static ORIGIN: Lazy<Arc<RecordType>> =
        Lazy::new(|| RecordType::new("Origin", [("x", TypeInfo::Number), ("y", TypeInfo::Number)]));

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Size {
        width: u32,
        height: u32,
    }

    fn format_size(size: &Size) -> String {
        format!("{}x{}", size.width, size.height)
    }

    fn parse_size(text: &str) -> Option<Size> {
        let (w, h) = text.trim().split_once('x')?;
        Some(Size {
            width: w.parse().ok()?,
            height: h.parse().ok()?,
        })
    }

    #[derive(Debug)]
    struct Gadget {
        width: i16,
        tab_width: UInt16In1To16,
        offset: [i16; 2],
        caption: Option<StrValue>,
        peers: Vec<i16>,
        align: i32,
        style: u32,
        tabs: Vec<u32>,
        points: Vec<Point>,
        size: Size,
        origin: (f64, f64),
        serial: u32,
        writes: u32,
    }

    impl Default for Gadget {
        fn default() -> Self {
            Gadget {
                width: 10,
                tab_width: Bounded(4),
                offset: [3, -4],
                caption: None,
                peers: vec![1, 1],
                align: 0,
                style: 0,
                tabs: Vec::new(),
                points: Vec::new(),
                size: Size { width: 4, height: 3 },
                origin: (0.0, 0.0),
                serial: 77,
                writes: 0,
            }
        }
    }

    fn get_width(_: &ExecContext, g: &Gadget) -> RuntimeResult<i16> {
        Ok(g.width)
    }

    fn set_width(_: &ExecContext, g: &mut Gadget, v: i16) -> RuntimeResult<()> {
        g.writes += 1;
        g.width = v;
        Ok(())
    }

    fn get_tab_width(_: &ExecContext, g: &Gadget) -> RuntimeResult<UInt16In1To16> {
        Ok(g.tab_width)
    }

    fn set_tab_width(_: &ExecContext, g: &mut Gadget, v: UInt16In1To16) -> RuntimeResult<()> {
        g.tab_width = v;
        Ok(())
    }

    fn get_offset(_: &ExecContext, g: &Gadget) -> RuntimeResult<[i16; 2]> {
        Ok(g.offset)
    }

    fn set_offset(_: &ExecContext, g: &mut Gadget, v: [i16; 2]) -> RuntimeResult<()> {
        g.offset = v;
        Ok(())
    }

    fn get_caption(_: &ExecContext, g: &Gadget) -> RuntimeResult<Option<StrValue>> {
        Ok(g.caption.clone())
    }

    fn set_caption(_: &ExecContext, g: &mut Gadget, v: Option<StrValue>) -> RuntimeResult<()> {
        g.caption = v;
        Ok(())
    }

    fn get_peers(_: &ExecContext, g: &Gadget) -> RuntimeResult<Mixed<i16>> {
        Ok(Mixed::from_values(g.peers.iter().copied()).unwrap_or(Mixed::same(0)))
    }

    fn set_peers(_: &ExecContext, g: &mut Gadget, v: i16) -> RuntimeResult<()> {
        g.peers.iter_mut().for_each(|p| *p = v);
        Ok(())
    }

    fn get_align(_: &ExecContext, g: &Gadget) -> RuntimeResult<i32> {
        Ok(g.align)
    }

    fn set_align(_: &ExecContext, g: &mut Gadget, v: i32) -> RuntimeResult<()> {
        g.align = v;
        Ok(())
    }

    fn get_style(_: &ExecContext, g: &Gadget) -> RuntimeResult<u32> {
        Ok(g.style)
    }

    fn set_style(_: &ExecContext, g: &mut Gadget, v: u32) -> RuntimeResult<()> {
        g.style = v;
        Ok(())
    }

    fn get_tabs(_: &ExecContext, g: &Gadget) -> RuntimeResult<Vec<u32>> {
        Ok(g.tabs.clone())
    }

    fn set_tabs(_: &ExecContext, g: &mut Gadget, v: Vec<u32>) -> RuntimeResult<()> {
        g.tabs = v;
        Ok(())
    }

    fn get_points(_: &ExecContext, g: &Gadget) -> RuntimeResult<Vec<Point>> {
        Ok(g.points.clone())
    }

    fn set_points(_: &ExecContext, g: &mut Gadget, v: Vec<Point>) -> RuntimeResult<()> {
        g.points = v;
        Ok(())
    }

    fn get_size(_: &ExecContext, g: &Gadget) -> RuntimeResult<Size> {
        Ok(g.size)
    }

    fn set_size(_: &ExecContext, g: &mut Gadget, v: Size) -> RuntimeResult<()> {
        g.size = v;
        Ok(())
    }

    fn get_origin(_: &ExecContext, g: &Gadget) -> RuntimeResult<RecordValue> {
        RecordValue::new(Arc::clone(&ORIGIN), vec![Val::real(g.origin.0), Val::real(g.origin.1)])
    }

    fn set_origin(_: &ExecContext, g: &mut Gadget, v: RecordValue) -> RuntimeResult<()> {
        let field = |name| v.fetch(name).and_then(Val::as_number).map(|n| n.as_real()).unwrap_or_default();
        g.origin = (field("x"), field("y"));
        Ok(())
    }

    fn get_serial(_: &ExecContext, g: &Gadget) -> RuntimeResult<u32> {
        Ok(g.serial)
    }

    fn gadget_table() -> PropertyTable<Gadget> {
        PropertyTable::new(vec![
            PropertyDescriptor::new(
                "width",
                PropertyPolicy::Plain(PlainPolicy::Int16(Accessor::read_write(get_width, set_width))),
            ),
            PropertyDescriptor::new(
                "tabWidth",
                PropertyPolicy::Plain(PlainPolicy::UInt16In1To16(Accessor::read_write(
                    get_tab_width,
                    set_tab_width,
                ))),
            ),
            PropertyDescriptor::new(
                "offset",
                PropertyPolicy::Plain(PlainPolicy::Int16X2(Accessor::read_write(get_offset, set_offset))),
            ),
            PropertyDescriptor::new(
                "caption",
                PropertyPolicy::Optional(OptionalPolicy::String(Accessor::read_write(get_caption, set_caption))),
            ),
            PropertyDescriptor::new(
                "peerWidth",
                PropertyPolicy::Mixed(MixedPolicy::Int16(Accessor::read_write(get_peers, set_peers))),
            ),
            PropertyDescriptor::new(
                "align",
                PropertyPolicy::Enum {
                    info: &ALIGN,
                    policy: EnumPolicy::Plain(Accessor::read_write(get_align, set_align)),
                },
            ),
            PropertyDescriptor::new(
                "style",
                PropertyPolicy::Set {
                    info: &STYLE,
                    accessor: Accessor::read_write(get_style, set_style),
                },
            ),
            PropertyDescriptor::new(
                "tabStops",
                PropertyPolicy::List(ListPolicy::ItemsOfLooseUInt(Accessor::read_write(get_tabs, set_tabs))),
            ),
            PropertyDescriptor::new(
                "points",
                PropertyPolicy::List(ListPolicy::LinesOfPoint(Accessor::read_write(get_points, set_points))),
            ),
            PropertyDescriptor::new(
                "size",
                PropertyPolicy::Custom(Box::new(CustomProperty {
                    get: get_size,
                    set: Some(set_size),
                    codec: CustomFormat {
                        type_name: "size",
                        format: format_size,
                        parse: parse_size,
                    },
                })),
            ),
            PropertyDescriptor::new(
                "origin",
                PropertyPolicy::Record {
                    ty: Arc::clone(&ORIGIN),
                    accessor: Accessor::read_write(get_origin, set_origin),
                },
            ),
            PropertyDescriptor::new(
                "serial",
                PropertyPolicy::Plain(PlainPolicy::UInt32(Accessor::read_only(get_serial))),
            ),
        ])
    }

    #[test]
    fn test_plain_store_is_range_checked() -> RuntimeResult<()> {
        let table = gadget_table();
        let ctx = ExecContext::default();
        let mut g = Gadget::default();

        let err = table.set_property(&ctx, &mut g, "width", ExecValue::Int(40000)).unwrap_err();
        assert_eq!(err, RuntimeError::out_of_range(i16::MIN as i64, i16::MAX as i64));
        assert_eq!(g.writes, 0);
        assert_eq!(g.width, 10);

        let err = table.set_property(&ctx, &mut g, "width", ExecValue::string("wide")).unwrap_err();
        assert!(err.is_conversion());
        assert_eq!(g.writes, 0);

        table.set_property(&ctx, &mut g, "width", ExecValue::string("12.6"))?;
        assert_eq!(g.writes, 1);
        assert_eq!(table.get_property(&ctx, &g, "width")?, ExecValue::Int(13));
        Ok(())
    }

    #[test]
    fn test_bounded_and_tuple() -> RuntimeResult<()> {
        let table = gadget_table();
        let ctx = ExecContext::default();
        let mut g = Gadget::default();

        assert!(table.set_property(&ctx, &mut g, "tabWidth", ExecValue::UInt(0)).is_err());
        assert!(table.set_property(&ctx, &mut g, "tabWidth", ExecValue::UInt(17)).is_err());
        table.set_property(&ctx, &mut g, "tabWidth", ExecValue::UInt(16))?;
        assert_eq!(table.get_property(&ctx, &g, "tabWidth")?, ExecValue::UInt(16));

        assert_eq!(table.get_property(&ctx, &g, "offset")?, ExecValue::string("3,-4"));
        table.set_property(&ctx, &mut g, "offset", ExecValue::string("5,6"))?;
        assert_eq!(g.offset, [5, 6]);
        assert!(table.set_property(&ctx, &mut g, "offset", ExecValue::string("1,2,3")).is_err());
        assert!(table.set_property(&ctx, &mut g, "offset", ExecValue::string("1")).is_err());
        Ok(())
    }

    #[test]
    fn test_optional_maps_empty_to_absent() -> RuntimeResult<()> {
        let table = gadget_table();
        let ctx = ExecContext::default();
        let mut g = Gadget::default();

        let fetched = table.get_property(&ctx, &g, "caption")?;
        assert!(fetched.is_empty());

        table.set_property(&ctx, &mut g, "caption", ExecValue::string("hello"))?;
        assert_eq!(g.caption.as_ref().map(StrValue::as_str), Some("hello"));
        assert_eq!(table.get_property(&ctx, &g, "caption")?, ExecValue::string("hello"));

        table.set_property(&ctx, &mut g, "caption", ExecValue::Value(Val::Null))?;
        assert!(g.caption.is_none());
        Ok(())
    }

    #[test]
    fn test_mixed_reports_disagreement() -> RuntimeResult<()> {
        let table = gadget_table();
        let ctx = ExecContext::default();
        let mut g = Gadget::default();

        assert_eq!(table.get_property(&ctx, &g, "peerWidth")?, ExecValue::Int(1));
        g.peers = vec![1, 2, 1];
        assert_eq!(table.get_property(&ctx, &g, "peerWidth")?, ExecValue::string("mixed"));

        table.set_property(&ctx, &mut g, "peerWidth", ExecValue::Double(5.0))?;
        assert_eq!(g.peers, [5, 5, 5]);
        assert_eq!(table.get_property(&ctx, &g, "peerWidth")?, ExecValue::Int(5));
        Ok(())
    }

    #[test]
    fn test_enum_tags() -> RuntimeResult<()> {
        let table = gadget_table();
        let ctx = ExecContext::default();
        let mut g = Gadget::default();

        table.set_property(&ctx, &mut g, "align", ExecValue::string(" CENTER "))?;
        assert_eq!(g.align, 1);
        assert_eq!(table.get_property(&ctx, &g, "align")?, ExecValue::string("center"));

        let err = table.set_property(&ctx, &mut g, "align", ExecValue::string("justify")).unwrap_err();
        assert!(matches!(err, RuntimeError::BadEnumeratedValue { type_name: "Align", .. }));
        assert_eq!(g.align, 1);

        g.align = 2;
        assert_eq!(table.get_property(&ctx, &g, "align")?, ExecValue::string("justify"));

        g.align = 9;
        assert!(matches!(
            table.get_property(&ctx, &g, "align"),
            Err(RuntimeError::Internal(_))
        ));
        Ok(())
    }

    #[test]
    fn test_set_formats_in_table_order() -> RuntimeResult<()> {
        let table = gadget_table();
        let ctx = ExecContext::default();
        let mut g = Gadget::default();

        table.set_property(&ctx, &mut g, "style", ExecValue::string("underline, BOLD"))?;
        assert_eq!(g.style, 5);
        assert_eq!(table.get_property(&ctx, &g, "style")?, ExecValue::string("bold,underline"));

        table.set_property(&ctx, &mut g, "style", ExecValue::string(""))?;
        assert_eq!(g.style, 0);

        let err = table.set_property(&ctx, &mut g, "style", ExecValue::string("bold,strike")).unwrap_err();
        assert!(matches!(err, RuntimeError::BadSetElement { ref tag, .. } if tag == "strike"));
        Ok(())
    }

    #[test]
    fn test_loose_list_reads_empty_as_zero() -> RuntimeResult<()> {
        let table = gadget_table();
        let ctx = ExecContext::default();
        let mut g = Gadget::default();

        table.set_property(&ctx, &mut g, "tabStops", ExecValue::string("1,,3"))?;
        assert_eq!(g.tabs, [1, 0, 3]);
        assert_eq!(table.get_property(&ctx, &g, "tabStops")?, ExecValue::string("1,0,3"));

        table.set_property(&ctx, &mut g, "tabStops", ExecValue::string("4,5,"))?;
        assert_eq!(g.tabs, [4, 5, 0]);

        table.set_property(&ctx, &mut g, "tabStops", ExecValue::string(""))?;
        assert!(g.tabs.is_empty());

        assert!(table.set_property(&ctx, &mut g, "tabStops", ExecValue::string("1,x")).is_err());
        Ok(())
    }

    #[test]
    fn test_point_lines_keep_detached_entries() -> RuntimeResult<()> {
        let table = gadget_table();
        let ctx = ExecContext::default();
        let mut g = Gadget::default();

        table.set_property(&ctx, &mut g, "points", ExecValue::string("1,2\r\n\n3,4\n"))?;
        assert_eq!(g.points, [Point::new(1, 2), Point::DETACHED, Point::new(3, 4)]);
        assert_eq!(table.get_property(&ctx, &g, "points")?, ExecValue::string("1,2\n\n3,4"));
        Ok(())
    }

    #[test]
    fn test_custom_codec() -> RuntimeResult<()> {
        let table = gadget_table();
        let ctx = ExecContext::default();
        let mut g = Gadget::default();

        assert_eq!(table.get_property(&ctx, &g, "size")?, ExecValue::string("4x3"));
        table.set_property(&ctx, &mut g, "size", ExecValue::string("640x480"))?;
        assert_eq!(g.size, Size { width: 640, height: 480 });

        let err = table.set_property(&ctx, &mut g, "size", ExecValue::string("big")).unwrap_err();
        assert_eq!(err, RuntimeError::CannotConvert { from: "string", to: "size" });
        Ok(())
    }

    #[test]
    fn test_record_property_goes_through_bridge() -> RuntimeResult<()> {
        let table = gadget_table();
        let ctx = ExecContext::default();
        let mut g = Gadget::default();
        g.origin = (1.5, 2.0);

        let ExecValue::Value(Val::Array(array)) = table.get_property(&ctx, &g, "origin")? else {
            panic!("record should fetch as an array");
        };
        assert_eq!(array.fetch("x", true), Some(&Val::real(1.5)));

        let mut incoming = ArrayValue::new();
        incoming.store("X", true, Val::str("3"));
        incoming.store("y", true, Val::int(4));
        table.set_property(&ctx, &mut g, "origin", ExecValue::ArrayRef(incoming))?;
        assert_eq!(g.origin, (3.0, 4.0));

        let mut short = ArrayValue::new();
        short.store("x", true, Val::int(1));
        assert!(table.set_property(&ctx, &mut g, "origin", ExecValue::ArrayRef(short)).is_err());
        assert_eq!(g.origin, (3.0, 4.0));
        Ok(())
    }

    #[test]
    fn test_read_only_property() -> RuntimeResult<()> {
        let table = gadget_table();
        let ctx = ExecContext::default();
        let mut g = Gadget::default();

        let serial = table.find("SERIAL").unwrap();
        assert!(serial.is_read_only());
        assert_eq!(fetch(&ctx, serial, &g)?, ExecValue::UInt(77));
        assert_eq!(
            store(&ctx, serial, &mut g, ExecValue::UInt(1)),
            Err(RuntimeError::ReadOnlyProperty("serial"))
        );
        assert_eq!(g.serial, 77);
        Ok(())
    }

    #[test]
    fn test_table_lookup() -> RuntimeResult<()> {
        let table = gadget_table();
        let ctx = ExecContext::default();
        let mut g = Gadget::default();

        assert_eq!(table.descriptors().len(), 12);
        assert_eq!(table.names().next(), Some("width"));
        assert!(table.find("TabWidth").is_some());
        assert_eq!(
            table.get_property(&ctx, &g, "nope"),
            Err(RuntimeError::UnknownProperty("nope".into()))
        );
        assert_eq!(
            table.set_property(&ctx, &mut g, "nope", ExecValue::UInt(1)),
            Err(RuntimeError::UnknownProperty("nope".into()))
        );
        Ok(())
    }
}
