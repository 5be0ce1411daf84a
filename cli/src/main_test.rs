mod tests {
    use crate::*;

    #[test]
    fn test_sanitize_path_allows_simple_relative() {
        let p = sanitize_path("conf/strand.toml").expect("relative path should be allowed");
        assert_eq!(p, PathBuf::from("conf/strand.toml"));
    }

    #[test]
    fn test_sanitize_path_rejects_parent_dir() {
        let err = sanitize_path("conf/../strand.toml").unwrap_err();
        assert!(err.to_string().contains("Parent directory components"));
    }

    #[cfg(unix)]
    #[test]
    fn test_sanitize_path_allows_absolute_unix() {
        let p = sanitize_path("/etc/strand.toml").expect("absolute path should be allowed");
        assert_eq!(p, PathBuf::from("/etc/strand.toml"));
    }

    #[test]
    fn test_cli_args_rejects_parent_dir_in_config() {
        let err = CliArgs::try_parse_from(["strand", "--config", "../x.toml", "handlers"]).unwrap_err();
        assert!(err.to_string().contains("Parent directory components"));
    }

    #[test]
    fn test_cli_args_config_is_global() {
        let args = CliArgs::try_parse_from(["strand", "convert", "1", "--to", "int", "--config", "a.toml"])
            .expect("should parse");
        assert_eq!(args.config.as_deref(), Some(Path::new("a.toml")));
        match args.command {
            Commands::Convert { value, to } => {
                assert_eq!(value, "1");
                assert_eq!(to, TargetKind::Int);
            }
            other => panic!("expected convert command, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_args_call_accepts_negative_numbers() {
        let args = CliArgs::try_parse_from(["strand", "call", "clampNumber", "-5", "0", "10"]).expect("should parse");
        match args.command {
            Commands::Call { handler, args } => {
                assert_eq!(handler, "clampNumber");
                assert_eq!(args, vec!["-5", "0", "10"]);
            }
            other => panic!("expected call command, got {:?}", other),
        }
    }

    #[test]
    fn test_target_kind_maps_to_slot() {
        assert_eq!(ExecValueType::from(TargetKind::Uint), ExecValueType::UInt);
        assert_eq!(ExecValueType::from(TargetKind::Name), ExecValueType::NameRef);
        assert_eq!(ExecValueType::from(TargetKind::Rect), ExecValueType::Rectangle);
        assert_eq!(ExecValueType::from(TargetKind::String), ExecValueType::StringRef);
    }

    #[test]
    fn test_filter_expr_from_toggles() {
        assert_eq!(filter_expr_from("1"), None);
        assert_eq!(filter_expr_from(" TRUE "), None);
        assert_eq!(filter_expr_from(""), None);
        assert_eq!(filter_expr_from("strand::invoke=debug"), Some("strand::invoke=debug".to_string()));
        assert!(!env_toggle_enabled("off"));
        assert!(!env_toggle_enabled("0"));
        assert!(env_toggle_enabled("debug"));
    }

    #[test]
    fn test_parse_arg_json_and_fallback() {
        assert_eq!(parse_arg("12"), Val::int(12));
        assert_eq!(parse_arg("true"), Val::Bool(true));
        assert_eq!(parse_arg("\"quoted\""), Val::str("quoted"));
        assert_eq!(parse_arg("plain words"), Val::str("plain words"));
        assert!(matches!(parse_arg("[1, 2]"), Val::Array(_)));
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(parse_assignment("width=120").expect("valid"), ("width", "120"));
        assert_eq!(parse_assignment("tooltip=a=b").expect("valid"), ("tooltip", "a=b"));
        assert!(parse_assignment("width").is_err());
        assert!(parse_assignment("=3").is_err());
    }

    #[test]
    fn test_render_uses_number_format() {
        let ctx = ExecContext::default();
        assert_eq!(render(&ctx, ExecValue::Double(2.5)), "2.5");
        assert_eq!(render(&ctx, ExecValue::Int(-4)), "-4");
        assert_eq!(render(&ctx, ExecValue::Bool(true)), "true");
    }
}
