use super::*;

#[test]
fn parses_browse_with_defaults() {
    let cli = Cli::try_parse_from(["ringbuilder-cli", "browse"]).expect("expected valid cli args");
    match cli.command {
        Commands::Browse {
            catalog,
            query,
            page_size,
            fetch,
            counts,
            json,
        } => {
            assert!(catalog.is_none());
            assert!(query.is_empty());
            assert!(page_size.is_none());
            assert!(!fetch && !counts && !json);
        }
        other => panic!("expected browse, got {other:?}"),
    }
}

#[test]
fn parses_browse_with_query() {
    let cli = Cli::try_parse_from([
        "ringbuilder-cli",
        "browse",
        "--catalog",
        "catalog.json",
        "--query",
        "gemstone=oval-2-01-ct",
        "--page-size",
        "12",
        "--json",
    ])
    .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Browse {
            page_size: Some(12),
            json: true,
            fetch: false,
            ..
        }
    ));
}

#[test]
fn parses_resolve_variant() {
    let cli = Cli::try_parse_from([
        "ringbuilder-cli",
        "resolve-variant",
        "--product-id",
        "8200000001",
        "--carat",
        "1.25",
    ])
    .expect("expected valid cli args");
    match cli.command {
        Commands::ResolveVariant {
            product_id, carat, ..
        } => {
            assert_eq!(product_id, "8200000001");
            assert!((carat - 1.25).abs() < f64::EPSILON);
        }
        other => panic!("expected resolve-variant, got {other:?}"),
    }
}

#[test]
fn parses_infer_kind() {
    let cli = Cli::try_parse_from([
        "ringbuilder-cli",
        "infer",
        "--handle",
        "oval-halo-setting",
        "--kind",
        "setting",
        "--fetch",
    ])
    .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Infer {
            kind: SideArg::Setting,
            fetch: true,
            ..
        }
    ));
    assert_eq!(Side::from(SideArg::Gemstone), Side::Gemstone);
}

#[test]
fn infer_rejects_unknown_kind() {
    let result = Cli::try_parse_from([
        "ringbuilder-cli",
        "infer",
        "--handle",
        "x",
        "--kind",
        "bracelet",
    ]);
    assert!(result.is_err());
}

#[test]
fn parses_repeated_cart_variants() {
    let cli = Cli::try_parse_from([
        "ringbuilder-cli",
        "add-to-cart",
        "--variant",
        "4400000021",
        "--variant",
        "501:2",
    ])
    .expect("expected valid cli args");
    match cli.command {
        Commands::AddToCart { variants } => {
            assert_eq!(
                variants,
                [CartLine::new("4400000021", 1), CartLine::new("501", 2)]
            );
        }
        other => panic!("expected add-to-cart, got {other:?}"),
    }
}

#[test]
fn add_to_cart_requires_a_variant() {
    assert!(Cli::try_parse_from(["ringbuilder-cli", "add-to-cart"]).is_err());
}

#[test]
fn cart_line_rejects_bad_input() {
    assert!(parse_cart_line(":2").is_err());
    assert!(parse_cart_line("501:0").is_err());
    assert!(parse_cart_line("501:two").is_err());
}
