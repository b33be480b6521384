use std::borrow::Cow;

use docdb_json::{
    ErrorCategory, Guid, JsonError, JsonWriter, Number64, Reader, TextWriter, Token, TokenType,
};

fn tokens(text: &str) -> Result<Vec<Token<'static>>, JsonError> {
    let mut reader = Reader::text(text.as_bytes());
    let mut out = Vec::new();
    while let Some(token) = reader.read_token()? {
        out.push(token.into_owned());
    }
    Ok(out)
}

fn single(text: &str) -> Token<'static> {
    let mut all = tokens(text).unwrap();
    assert_eq!(all.len(), 1, "{text}");
    all.remove(0)
}

#[test]
fn rfc8259_documents() {
    assert_eq!(
        tokens(" { \"a\" : [ 1 , -2.5e3 , true , false , null ] , \"b\" : { } } ").unwrap(),
        vec![
            Token::BeginObject,
            Token::FieldName("a".into()),
            Token::BeginArray,
            Token::Number(Number64::Int(1)),
            Token::Number(Number64::Double(-2500.0)),
            Token::True,
            Token::False,
            Token::Null,
            Token::EndArray,
            Token::FieldName("b".into()),
            Token::BeginObject,
            Token::EndObject,
            Token::EndObject,
        ]
    );
    assert_eq!(tokens("\t\r\n[]\n").unwrap(), vec![Token::BeginArray, Token::EndArray]);
    assert_eq!(single("\"plain\""), Token::String("plain".into()));
}

#[test]
fn number_literals() {
    let cases: Vec<(&str, Number64)> = vec![
        ("0", Number64::Int(0)),
        ("-0", Number64::Double(-0.0)),
        ("42", Number64::Int(42)),
        ("-9223372036854775808", Number64::Int(i64::MIN)),
        ("9223372036854775807", Number64::Int(i64::MAX)),
        ("0.5", Number64::Double(0.5)),
        ("1E2", Number64::Double(100.0)),
        ("1e-2", Number64::Double(0.01)),
        ("1337.1337", Number64::Double(1337.1337)),
    ];
    for (text, expected) in cases {
        assert_eq!(single(text), Token::Number(expected), "{text}");
    }

    // Integral literals beyond i64 fall back to a double.
    match single("9223372036854775808") {
        Token::Number(Number64::Double(d)) => assert_eq!(d, 9.223372036854775808e18),
        other => panic!("unexpected token {other:?}"),
    }
    match single("1.0") {
        Token::Number(Number64::Double(d)) => assert_eq!(d, 1.0),
        other => panic!("unexpected token {other:?}"),
    }
}

#[test]
fn non_finite_literals() {
    let all = tokens("[NaN, Infinity, -Infinity]").unwrap();
    assert!(matches!(all[1], Token::Number(Number64::Double(d)) if d.is_nan()));
    assert_eq!(all[2], Token::Number(Number64::Double(f64::INFINITY)));
    assert_eq!(all[3], Token::Number(Number64::Double(f64::NEG_INFINITY)));
}

#[test]
fn string_escapes() {
    let cases = [
        (r#""\u00e9\n\"""#, "é\n\""),
        (r#""\ud83d\ude00""#, "😀"),
        (r#""a\/b\\c\tz""#, "a/b\\c\tz"),
        ("\"déjà vu\"", "déjà vu"),
    ];
    for (text, expected) in cases {
        assert_eq!(single(text), Token::String(expected.into()), "{text}");
    }

    // Escape-free strings borrow from the input.
    let mut reader = Reader::text(b"\"borrowed\"");
    match reader.read_token().unwrap() {
        Some(Token::String(Cow::Borrowed(s))) => assert_eq!(s, "borrowed"),
        other => panic!("unexpected token {other:?}"),
    }
}

#[test]
fn sigil_scalars() {
    let guid = Guid::parse("ed7e38aa-074e-4a74-bab0-2a4f41079baa").unwrap();
    assert_eq!(
        tokens("[I-5,H300,L70000,LL-9,UL4000000000,S1.5,D-2.25,Ged7e38aa-074e-4a74-bab0-2a4f41079baa,BAQID]")
            .unwrap(),
        vec![
            Token::BeginArray,
            Token::Int8(-5),
            Token::Int16(300),
            Token::Int32(70000),
            Token::Int64(-9),
            Token::UInt32(4_000_000_000),
            Token::Float32(1.5),
            Token::Float64(-2.25),
            Token::Guid(guid),
            Token::Binary(vec![1, 2, 3].into()),
            Token::EndArray,
        ]
    );
    assert_eq!(tokens("{\"k\":B}").unwrap()[2], Token::Binary(Vec::new().into()));
}

#[test]
fn sigils_end_at_delimiters() {
    assert_eq!(
        tokens("{\"a\":I1 ,\"b\":DNaN}").unwrap()[2],
        Token::Int8(1)
    );
    let all = tokens("[SInfinity]").unwrap();
    assert_eq!(all[1], Token::Float32(f32::INFINITY));
    assert_eq!(tokens("B").unwrap(), vec![Token::Binary(Vec::new().into())]);
}

#[test]
fn malformed_text_matrix() {
    let cases = [
        "",
        "   ",
        "[",
        "[1,]",
        "[1 2]",
        "[1}",
        "{\"a\":1]",
        "{\"a\" 1}",
        "{1:2}",
        "{\"a\":}",
        "tru",
        "nul",
        "01",
        "1.",
        "-",
        "+1",
        ".5",
        "1e",
        "\"abc",
        "\"a\u{1}b\"",
        r#""\x""#,
        r#""\u12""#,
        "I300",
        "H",
        "UL-1",
        "LL1.5",
        "Sabc",
        "Gnot-a-guid",
        "B!!",
        "nan",
        "1 2",
        "[] []",
        "'single'",
    ];
    for text in cases {
        let err = tokens(text).expect_err(text);
        assert_eq!(err.category(), ErrorCategory::MalformedInput, "{text}: {err}");
    }
}

#[test]
fn malformed_text_offsets() {
    assert_eq!(tokens(""), Err(JsonError::UnexpectedEof { offset: 0 }));
    assert_eq!(tokens("[1, 2"), Err(JsonError::UnexpectedEof { offset: 5 }));
    assert_eq!(tokens("1 2"), Err(JsonError::TrailingData { offset: 2 }));
    assert!(matches!(
        tokens("[1,,2]"),
        Err(JsonError::InvalidText { offset: 3, .. })
    ));
}

#[test]
fn typed_getters_follow_the_current_token() {
    let mut reader = Reader::text(br#"{"n":5,"s":"x","g":G00000000-0000-0000-0000-000000000000}"#);
    assert!(reader.advance().unwrap());
    assert_eq!(reader.current_token_type(), Some(TokenType::BeginObject));
    assert!(reader.advance().unwrap());
    assert_eq!(reader.get_field_name().unwrap(), "n");
    assert!(reader.advance().unwrap());
    assert_eq!(reader.get_number().unwrap(), Number64::Int(5));
    assert_eq!(
        reader.get_string(),
        Err(JsonError::UnexpectedToken {
            expected: TokenType::String,
            actual: Some(TokenType::Number),
        })
    );
    reader.advance().unwrap();
    reader.advance().unwrap();
    assert_eq!(reader.get_string().unwrap(), "x");
    reader.advance().unwrap();
    reader.advance().unwrap();
    assert_eq!(reader.get_guid().unwrap(), Guid::default());
    assert!(reader.advance().unwrap());
    assert!(!reader.advance().unwrap());
    assert_eq!(reader.current_token(), None);
}

#[test]
fn text_writer_output_reads_back() {
    let mut writer = TextWriter::new();
    writer.write_array_start().unwrap();
    writer.write_string("tab\there \"quoted\" é").unwrap();
    writer.write_number(Number64::Double(f64::NAN)).unwrap();
    writer.write_number(Number64::Double(-0.25)).unwrap();
    writer.write_uint32(7).unwrap();
    writer.write_float64(3.0).unwrap();
    writer.write_binary(&[0xff, 0x00]).unwrap();
    writer.write_array_end().unwrap();
    let out = writer.get_result().unwrap();
    assert_eq!(
        std::str::from_utf8(out).unwrap(),
        r#"["tab\there \"quoted\" é",NaN,-0.25,UL7,D3.0,B/wA=]"#
    );

    let all = tokens(std::str::from_utf8(out).unwrap()).unwrap();
    assert_eq!(all[1], Token::String("tab\there \"quoted\" é".into()));
    assert_eq!(all[4], Token::UInt32(7));
    assert_eq!(all[5], Token::Float64(3.0));
    assert_eq!(all[6], Token::Binary(vec![0xff, 0x00].into()));
}
