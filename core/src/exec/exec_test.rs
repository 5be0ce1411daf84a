#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use crate::{
        config::{NumberFormat, RuntimeConfig},
        error::{RuntimeError, ScriptErrorEntry},
        exec::*,
        val::{ArrayValue, Number, StrValue, Val},
    };

    fn ctx() -> ExecContext {
        ExecContext::default()
    }

    #[test]
    fn test_numeric_narrowing() {
        let ctx = ctx();
        assert_eq!(ctx.convert(ExecValue::Double(-1.5), ExecValueType::UInt).unwrap(), ExecValue::UInt(0));
        assert_eq!(ctx.convert(ExecValue::Double(2.5), ExecValueType::Int).unwrap(), ExecValue::Int(3));
        assert_eq!(ctx.convert(ExecValue::Double(-2.5), ExecValueType::Int).unwrap(), ExecValue::Int(-3));
        assert_eq!(ctx.convert(ExecValue::Int(-4), ExecValueType::UInt).unwrap(), ExecValue::UInt(0));
        assert_eq!(
            ctx.convert(ExecValue::UInt(7), ExecValueType::NumberRef).unwrap(),
            ExecValue::NumberRef(Number::Int(7))
        );
        assert_eq!(ctx.convert(ExecValue::Float(1.5), ExecValueType::Double).unwrap(), ExecValue::Double(1.5));
    }

    #[test]
    fn test_same_tag_is_unchanged() {
        let ctx = ctx();
        let list = Val::list(vec![Val::int(1)]);
        assert_eq!(
            ctx.convert(ExecValue::Value(list.clone()), ExecValueType::Value).unwrap(),
            ExecValue::Value(list)
        );
    }

    #[test]
    fn test_string_to_number_memoizes() {
        let ctx = ctx();
        let text = StrValue::new(" 42 ");
        let out = ctx.convert(ExecValue::StringRef(text.clone()), ExecValueType::Int).unwrap();
        assert_eq!(out, ExecValue::Int(42));
        assert_eq!(text.cached_number(), Some(42.0));

        let err = ctx.convert(ExecValue::string("4x"), ExecValueType::Double).unwrap_err();
        assert_eq!(err, RuntimeError::not_a_number());

        let name = ctx.convert(ExecValue::Value(Val::name("2.5")), ExecValueType::Double).unwrap();
        assert_eq!(name, ExecValue::Double(2.5));
    }

    #[test]
    fn test_pivot_through_boxed_value() {
        let ctx = ctx();
        assert_eq!(
            ctx.convert(ExecValue::Point(Point::new(1, -2)), ExecValueType::StringRef).unwrap(),
            ExecValue::string("1,-2")
        );
        assert_eq!(
            ctx.convert(ExecValue::string("10, 20, 30, 40"), ExecValueType::Rectangle).unwrap(),
            ExecValue::Rectangle(Rectangle::new(10, 20, 20, 20))
        );
        assert_eq!(
            ctx.convert(ExecValue::string("255,0,128"), ExecValueType::Color).unwrap(),
            ExecValue::Color(Color::new(255, 0, 128))
        );
        assert_eq!(
            ctx.convert(ExecValue::Bool(true), ExecValueType::StringRef).unwrap(),
            ExecValue::string("true")
        );
        assert_eq!(
            ctx.convert(ExecValue::Char('q'), ExecValueType::NameRef).unwrap(),
            ExecValue::NameRef("q".into())
        );
        assert_eq!(
            ctx.convert(ExecValue::Int(12), ExecValueType::StringRef).unwrap(),
            ExecValue::string("12")
        );
    }

    #[test]
    fn test_pivot_failure_names_source() {
        let ctx = ctx();
        let err = ctx.convert(ExecValue::string("ab"), ExecValueType::Char).unwrap_err();
        assert_eq!(
            err,
            RuntimeError::CannotConvert {
                from: "string",
                to: "char"
            }
        );
        let err = ctx
            .convert(ExecValue::Value(Val::list(vec![])), ExecValueType::StringRef)
            .unwrap_err();
        assert_eq!(
            err,
            RuntimeError::CannotConvert {
                from: "list",
                to: "string"
            }
        );
        assert!(ctx.convert(ExecValue::string("1,2,3"), ExecValueType::Point).is_err());
    }

    #[test]
    fn test_rectangle_edges_out_of_range_fail() {
        let ctx = ctx();
        for text in ["-5,0,1e300,0", "0,0,-1e300,0", "0,-5,0,1e300", "0,0,3000000000,0"] {
            let err = ctx.convert(ExecValue::string(text), ExecValueType::Rectangle).unwrap_err();
            assert_eq!(
                err,
                RuntimeError::CannotConvert {
                    from: "string",
                    to: "rectangle"
                },
                "{}",
                text
            );
        }
        assert_eq!(
            ctx.convert(ExecValue::string("5,5,1,1"), ExecValueType::Rectangle).unwrap(),
            ExecValue::Rectangle(Rectangle::new(5, 5, 0, 0))
        );
    }

    #[test]
    fn test_convert_to_string() {
        let ctx = ctx();
        assert_eq!(ctx.convert_to_string(&Val::Null).unwrap().as_str(), "");
        assert_eq!(ctx.convert_to_string(&Val::Array(ArrayValue::new())).unwrap().as_str(), "");
        assert_eq!(ctx.convert_to_string(&Val::data(&[0x41, 0xe9])).unwrap().as_str(), "A\u{e9}");
        let five = ctx.convert_to_string(&Val::int(5)).unwrap();
        assert_eq!(five.as_str(), "5");
        assert_eq!(five.cached_number(), Some(5.0));
        assert_eq!(ctx.convert_to_string(&Val::real(2.5)).unwrap().as_str(), "2.5");
        assert!(ctx.convert_to_string(&Val::list(vec![])).is_none());
    }

    #[test]
    fn test_number_format_is_configurable() {
        let mut ctx = ctx();
        ctx.set_number_format(NumberFormat::new(0, 2, 2));
        assert_eq!(ctx.convert_to_string(&Val::real(1.0 / 3.0)).unwrap().as_str(), "0.33");
        assert_eq!(ctx.convert_to_string(&Val::real(2.0)).unwrap().as_str(), "2.00");
        assert_eq!(ctx.convert_to_string(&Val::int(2)).unwrap().as_str(), "2");
    }

    #[test]
    fn test_convert_to_number() {
        let ctx = ctx();
        assert_eq!(ctx.convert_to_number(&Val::Null), Some(0.0));
        assert_eq!(ctx.convert_to_number(&Val::str("0x10")), Some(16.0));
        assert_eq!(ctx.convert_to_number(&Val::data(b"3.5")), Some(3.5));
        assert_eq!(ctx.convert_to_number(&Val::Bool(true)), None);
        assert_eq!(ctx.convert_to_number(&Val::Array(ArrayValue::new())), None);

        let octal = ExecContext::new(RuntimeConfig {
            convert_octals: true,
            ..RuntimeConfig::default()
        });
        assert_eq!(octal.convert_to_number(&Val::str("017")), Some(15.0));
    }

    #[test]
    fn test_convert_to_bool() {
        let ctx = ctx();
        assert_eq!(ctx.convert_to_bool(&Val::str("TRUE")), Some(true));
        assert_eq!(ctx.convert_to_bool(&Val::name("False")), Some(false));
        assert_eq!(ctx.convert_to_bool(&Val::data(b"true")), Some(true));
        assert_eq!(ctx.convert_to_bool(&Val::str("yes")), None);
        assert_eq!(ctx.convert_to_bool(&Val::int(1)), None);
    }

    #[test]
    fn test_lax_and_strict_array() {
        let ctx = ctx();
        let lax = ctx.convert_to_array(&Val::str("abc"), false).unwrap();
        assert!(lax.is_empty());
        assert!(ctx.convert_to_array(&Val::int(3), false).unwrap().is_empty());
        assert!(ctx.convert_to_array(&Val::list(vec![]), false).is_none());

        assert!(ctx.convert_to_array(&Val::str("abc"), true).is_none());
        assert!(ctx.convert_to_array(&Val::str(""), true).unwrap().is_empty());
        assert!(ctx.convert_to_array(&Val::Null, true).is_some());

        let mut a = ArrayValue::new();
        a.store("k", true, Val::int(1));
        assert_eq!(ctx.convert_to_array(&Val::Array(a.clone()), true), Some(a));
    }

    #[test]
    fn test_data_name_char() {
        let ctx = ctx();
        assert_eq!(&*ctx.convert_to_data(&Val::str("\u{e9}")).unwrap(), &[0xe9]);
        assert_eq!(&*ctx.convert_to_data(&Val::str("\u{20ac}5")).unwrap(), b"?5");
        assert_eq!(ctx.convert_to_name(&Val::int(7)).unwrap().as_str(), "7");
        assert_eq!(ctx.convert_to_name(&Val::real(2.5)).unwrap().as_str(), "2.5");
        assert_eq!(ctx.convert_to_char(&Val::str("z")), Some('z'));
        assert_eq!(ctx.convert_to_char(&Val::str("")), None);
        assert_eq!(ctx.convert_to_char(&Val::int(12)), None);
    }

    #[test]
    fn test_string_number_round_trip() {
        let ctx = ctx();
        for value in [Val::int(0), Val::int(-3), Val::real(2.5), Val::real(1e6), Val::real(0.125)] {
            let text = ctx.convert_to_string(&value).unwrap();
            let back = ctx.convert_to_number(&Val::str(text.as_str())).unwrap();
            assert_eq!(Number::Real(back), value.as_number().unwrap(), "{}", text);
        }
    }

    #[test]
    fn test_reentrancy_limit() {
        let ctx = ExecContext::new(RuntimeConfig {
            max_reentrancy_depth: 2,
            ..RuntimeConfig::default()
        });
        let first = ctx.enter().unwrap();
        let second = ctx.enter().unwrap();
        assert_eq!(ctx.depth(), 2);
        assert_eq!(ctx.enter().unwrap_err(), RuntimeError::RecursionLimit(2));
        drop(second);
        assert!(ctx.enter().is_ok());
        drop(first);
        assert_eq!(ctx.depth(), 0);
    }

    struct CountingHook {
        calls: Rc<Cell<usize>>,
    }

    impl DebuggerHook for CountingHook {
        fn on_error(&mut self, ctx: &mut ExecContext, handler: &str, row: u32, column: u32) -> bool {
            self.calls.set(self.calls.get() + 1);
            ctx.raise(format!("{} at {}:{}", handler, row, column));
            false
        }
    }

    #[test]
    fn test_debugger_hook_reenters_context() {
        let calls = Rc::new(Cell::new(0));
        let mut ctx = ctx();
        ctx.attach_debugger(Box::new(CountingHook { calls: calls.clone() }));

        assert!(!ctx.offer_to_debugger("f", 1, 2));
        assert_eq!(calls.get(), 0, "hook is consulted only when interactive");

        ctx.set_interactive(true);
        assert!(!ctx.offer_to_debugger("f", 1, 2));
        assert!(!ctx.offer_to_debugger("g", 3, 4));
        assert_eq!(calls.get(), 2);
        assert_eq!(
            ctx.errors(),
            &[
                ScriptErrorEntry::Message("f at 1:2".into()),
                ScriptErrorEntry::Message("g at 3:4".into())
            ]
        );
    }

    #[test]
    fn test_eval_helpers() {
        let mut ctx = ctx();
        assert_eq!(ctx.eval_expr_as_int(&Literal::new("12")).unwrap(), 12);
        assert!(ctx.eval_expr_as_bool(&Literal::new("TRUE")).unwrap());
        assert_eq!(
            ctx.eval_expr_as_point(&Literal::new("3,4")).unwrap(),
            Point::new(3, 4)
        );
        let var = Variable::new("v", 2.5);
        assert_eq!(ctx.eval_expr_as_string(&var).unwrap().as_str(), "2.5");
        assert!(ctx.eval_expr_as_double(&Literal::new(Val::list(vec![]))).is_err());
        assert_eq!(ctx.depth(), 0);
    }

    #[test]
    fn test_array_element_container() {
        let ctx = ctx();
        let mut var = Variable::new("a", Val::Null);
        var.element("Key").set(&ctx, Val::int(1)).unwrap();
        var.element("KEY").set(&ctx, Val::int(2)).unwrap();
        let array = var.value().as_array().unwrap();
        assert_eq!(array.len(), 1);
        assert_eq!(array.fetch("Key", true), Some(&Val::int(2)));
        assert_eq!(var.element("key").get(), Val::int(2));
    }
}
