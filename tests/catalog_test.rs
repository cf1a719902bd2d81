use small_toolkit::core::engine::SessionState;
use small_toolkit::core::numeral::{from_roman, to_roman};
use small_toolkit::core::units::{convert, Quantity};
use small_toolkit::{Category, ToolEngine, ToolError, ToolInput};

#[test]
fn test_every_tool_rejects_empty_input() {
    let engine = ToolEngine::builtin();
    for descriptor in engine.registry().list(None) {
        let result = engine.run(&descriptor.id, &ToolInput::new());
        assert!(
            matches!(result, Err(ToolError::MissingInputError { .. })),
            "{} accepted an empty form: {:?}",
            descriptor.id,
            result
        );
    }
}

#[test]
fn test_catalog_ids_unique_and_sorted() {
    let engine = ToolEngine::builtin();
    let ids: Vec<String> = engine.registry().list(None).into_iter().map(|d| d.id).collect();

    let mut sorted = ids.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(ids, sorted);

    for expected in [
        "length-converter",
        "temperature-converter",
        "number-to-roman",
        "hex-to-binary",
        "loan-calculator",
        "age-calculator",
        "json-formatter",
        "base64-to-image",
        "favicon-generator",
    ] {
        assert!(ids.iter().any(|id| id == expected), "missing {}", expected);
    }
}

#[test]
fn test_every_category_has_tools() {
    let engine = ToolEngine::builtin();
    for category in Category::ALL {
        assert!(
            !engine.registry().list(Some(category)).is_empty(),
            "no tools in {}",
            category
        );
    }
    assert_eq!(engine.registry().list(Some(Category::Unit)).len(), Quantity::ALL.len());
}

#[test]
fn test_unknown_tool() {
    let engine = ToolEngine::builtin();
    assert!(matches!(
        engine.run("time-machine", &ToolInput::new()),
        Err(ToolError::UnknownToolError { .. })
    ));
    assert!(engine.open("time-machine").is_err());
}

#[test]
fn test_concrete_scenarios() {
    let engine = ToolEngine::builtin();

    let roman = engine
        .run("number-to-roman", &ToolInput::new().with("number", "1994"))
        .unwrap();
    assert_eq!(roman.as_text(), Some("MCMXCIV"));

    let number = engine
        .run("roman-to-number", &ToolInput::new().with("numeral", "MCMXCIV"))
        .unwrap();
    assert_eq!(number.primary_number(), Some(1994.0));

    let fahrenheit = engine
        .run(
            "temperature-converter",
            &ToolInput::new()
                .with("value", "0")
                .with("from", "celsius")
                .with("to", "fahrenheit"),
        )
        .unwrap();
    assert!((fahrenheit.primary_number().unwrap() - 32.0).abs() < 1e-9);

    let feet = engine
        .run(
            "length-converter",
            &ToolInput::new()
                .with("value", "100")
                .with("from", "meter")
                .with("to", "foot"),
        )
        .unwrap();
    assert!((feet.primary_number().unwrap() - 328.084).abs() < 0.001);

    let loan = engine
        .run(
            "loan-calculator",
            &ToolInput::new()
                .with("amount", "10000")
                .with("rate", "5")
                .with("months", "12"),
        )
        .unwrap();
    assert!((loan.primary_number().unwrap() - 856.07).abs() < 0.01);
}

#[test]
fn test_roman_round_trip_full_range() {
    for n in 1..=3999 {
        let numeral = to_roman(n).unwrap();
        assert_eq!(i64::from(from_roman(&numeral).unwrap()), n);
    }
    for bad in [0, -1, 4000] {
        assert!(to_roman(bad).is_err());
    }
}

#[test]
fn test_unit_round_trip_every_quantity() {
    for quantity in Quantity::ALL {
        let units = quantity.units();
        for from in units {
            for to in units {
                let there = convert(quantity, 12.5, from.id, to.id).unwrap();
                let back = convert(quantity, there, to.id, from.id).unwrap();
                assert!(
                    (back - 12.5).abs() < 1e-6,
                    "{} {} -> {} -> {} gave {}",
                    quantity.slug(),
                    from.id,
                    to.id,
                    from.id,
                    back
                );
            }
        }
    }
}

#[test]
fn test_binary_radix_round_trip() {
    let engine = ToolEngine::builtin();
    for binary in ["0", "1", "101", "11111111", "1000000000000"] {
        let decimal = engine
            .run("binary-to-decimal", &ToolInput::new().with("value", binary))
            .unwrap();
        let back = engine
            .run(
                "decimal-to-binary",
                &ToolInput::new().with("value", decimal.as_text().unwrap()),
            )
            .unwrap();
        assert_eq!(back.as_text(), Some(binary));
    }
}

#[test]
fn test_radix_pairs_round_trip() {
    let engine = ToolEngine::builtin();
    let values = [0u64, 1, 7, 255, 4096, 1_000_000_007, u64::MAX];
    let pairs: [(&str, &str, fn(u64) -> String); 4] = [
        ("hex-to-decimal", "decimal-to-hex", |n| format!("{:x}", n)),
        ("octal-to-decimal", "decimal-to-octal", |n| format!("{:o}", n)),
        ("binary-to-hex", "hex-to-binary", |n| format!("{:b}", n)),
        ("binary-to-octal", "octal-to-binary", |n| format!("{:b}", n)),
    ];

    for (forward, backward, render) in pairs {
        for n in values {
            let source = render(n);
            let there = engine
                .run(forward, &ToolInput::new().with("value", source.as_str()))
                .unwrap();
            let back = engine
                .run(backward, &ToolInput::new().with("value", there.as_text().unwrap()))
                .unwrap();
            assert!(
                back.as_text().unwrap().eq_ignore_ascii_case(&source),
                "{} -> {} changed {}",
                forward,
                backward,
                source
            );
        }
    }
}

#[test]
fn test_url_decode_keeps_plus_sign() {
    let engine = ToolEngine::builtin();
    let decoded = engine
        .run("url-decode", &ToolInput::new().with("text", "1+1%3D2"))
        .unwrap();
    assert_eq!(decoded.as_text(), Some("1+1=2"));
    assert!(matches!(
        engine.run("url-decode", &ToolInput::new().with("text", "100%")),
        Err(ToolError::InvalidInputError { .. })
    ));
}

#[test]
fn test_overflowing_calculations_rejected() {
    let engine = ToolEngine::builtin();
    let loan = engine.run(
        "loan-calculator",
        &ToolInput::new()
            .with("amount", "1000")
            .with("rate", "5")
            .with("months", "2000000"),
    );
    assert!(matches!(loan, Err(ToolError::OutOfRangeError { .. })));

    let length = engine.run(
        "length-converter",
        &ToolInput::new()
            .with("value", "1e308")
            .with("from", "kilometer")
            .with("to", "nanometer"),
    );
    assert!(matches!(length, Err(ToolError::OutOfRangeError { .. })));
}

#[test]
fn test_session_records_failure_notice() {
    let engine = ToolEngine::builtin();
    let mut session = engine.open("percentage-change").unwrap();

    let input = ToolInput::new().with("from", "0").with("to", "5");
    assert!(session.submit(&input).is_err());
    match session.state() {
        SessionState::Failed(notice) => assert!(!notice.message.is_empty()),
        other => panic!("unexpected state: {:?}", other),
    }

    let input = ToolInput::new().with("from", "50").with("to", "75");
    session.submit(&input).unwrap();
    assert!(matches!(session.state(), SessionState::Ready(_)));
}
