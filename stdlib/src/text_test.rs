#[cfg(test)]
mod tests {
    use anyhow::Result;
    use strand_core::{
        exec::{ExecContext, Variable},
        invoke::{Parameter, invoke_handler},
        module::ModuleRegistry,
        val::{ArrayValue, Val},
    };

    use crate::register_stdlib_modules;

    fn setup() -> Result<(ExecContext, ModuleRegistry)> {
        let mut registry = ModuleRegistry::new();
        register_stdlib_modules(&mut registry)?;
        Ok((ExecContext::default(), registry))
    }

    #[test]
    fn test_join_items_accepts_sequence_arrays() -> Result<()> {
        let (mut ctx, mut registry) = setup()?;
        let items = ArrayValue::from_sequence(vec![Val::str("a"), Val::name("b"), Val::int(3)]);
        let mut params = [Parameter::value(Val::Array(items)), Parameter::value("-")];
        assert_eq!(invoke_handler(&mut ctx, &mut registry, "joinItems", &mut params)?, Val::str("a-b-3"));
        Ok(())
    }

    #[test]
    fn test_join_items_formats_numbers_like_scripts() -> Result<()> {
        let (mut ctx, mut registry) = setup()?;
        let items = ArrayValue::from_sequence(vec![Val::real(3.0), Val::real(0.5), Val::real(1.0 / 3.0), Val::int(-2)]);
        let mut params = [Parameter::value(Val::Array(items)), Parameter::value(" ")];
        assert_eq!(
            invoke_handler(&mut ctx, &mut registry, "joinItems", &mut params)?,
            Val::str("3 0.5 0.333333 -2")
        );
        Ok(())
    }

    #[test]
    fn test_split_items_returns_script_array() -> Result<()> {
        let (mut ctx, mut registry) = setup()?;
        let mut params = [Parameter::value("x,y,z"), Parameter::value(",")];
        let out = invoke_handler(&mut ctx, &mut registry, "splitItems", &mut params)?;
        let array = out.as_array().expect("lists come back as arrays");
        assert!(array.is_sequence());
        assert_eq!(array.len(), 3);
        assert_eq!(array.fetch_index(3), Some(&Val::str("z")));

        let mut params = [Parameter::value(""), Parameter::value(",")];
        let out = invoke_handler(&mut ctx, &mut registry, "splitItems", &mut params)?;
        assert!(out.as_array().is_some_and(ArrayValue::is_empty));

        let mut params = [Parameter::value("abc"), Parameter::value("")];
        assert!(invoke_handler(&mut ctx, &mut registry, "splitItems", &mut params).is_err());
        Ok(())
    }

    #[test]
    fn test_upper_in_place() -> Result<()> {
        let (mut ctx, mut registry) = setup()?;
        let mut word = Variable::new("word", "MiXeD");
        {
            let mut params = [Parameter::container(&mut word)];
            invoke_handler(&mut ctx, &mut registry, "upperInPlace", &mut params)?;
        }
        assert_eq!(word.value(), &Val::str("MIXED"));

        let mut number = Variable::new("n", 12);
        {
            let mut params = [Parameter::container(&mut number)];
            invoke_handler(&mut ctx, &mut registry, "upperInPlace", &mut params)?;
        }
        assert_eq!(number.value(), &Val::str("12"));
        Ok(())
    }

    #[test]
    fn test_toggle_optional_boolean() -> Result<()> {
        let (mut ctx, mut registry) = setup()?;
        let mut params = [Parameter::value(true)];
        assert_eq!(invoke_handler(&mut ctx, &mut registry, "toggle", &mut params)?, Val::FALSE);

        let mut params = [Parameter::value("false")];
        assert_eq!(invoke_handler(&mut ctx, &mut registry, "toggle", &mut params)?, Val::TRUE);

        let mut params = [Parameter::value("")];
        assert_eq!(invoke_handler(&mut ctx, &mut registry, "toggle", &mut params)?, Val::TRUE);

        let mut params = [Parameter::value("perhaps")];
        assert!(invoke_handler(&mut ctx, &mut registry, "toggle", &mut params).is_err());
        Ok(())
    }
}
