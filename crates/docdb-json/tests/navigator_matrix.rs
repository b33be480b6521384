use std::borrow::Cow;

use docdb_json::{
    transcode, Guid, JsonElement, JsonError, JsonNodeType, JsonWriter, Navigator, Number64,
    SerializationFormat, StringDictionary, TextWriter, Token, WriterOptions,
};

const GLOSSARY: &str = r#"{"glossary":{"title":"example glossary","GlossDiv":{"title":"S","GlossList":{"GlossEntry":{"ID":"SGML","SortAs":"SGML","GlossTerm":"Standard Generalized Markup Language","Acronym":"SGML","Abbrev":"ISO 8879:1986","GlossDef":{"para":"A meta-markup language, used to create markup languages such as DocBook.","GlossSeeAlso":["GML","XML"]},"GlossSee":"markup"}}}}}"#;

fn to_binary(text: &str, dict: Option<&mut StringDictionary>) -> Vec<u8> {
    transcode(text.as_bytes(), SerializationFormat::Binary, WriterOptions::default(), dict).unwrap()
}

fn property(nav: &Navigator<'_>, path: &[&str]) -> docdb_json::NavigatorNode {
    let mut node = nav.root_node();
    for name in path {
        node = nav
            .try_get_object_property(node, name)
            .unwrap()
            .unwrap_or_else(|| panic!("missing property {name}"))
            .value;
    }
    node
}

fn check_glossary(nav: &Navigator<'_>) {
    let root = nav.root_node();
    assert_eq!(nav.node_type(root).unwrap(), JsonNodeType::Object);
    assert_eq!(nav.object_property_count(root).unwrap(), 1);

    let glossary = property(nav, &["glossary"]);
    assert_eq!(nav.object_property_count(glossary).unwrap(), 2);
    let title = property(nav, &["glossary", "title"]);
    assert_eq!(nav.get_string(title).unwrap(), "example glossary");

    let gloss_div = property(nav, &["glossary", "GlossDiv"]);
    assert_eq!(nav.object_property_count(gloss_div).unwrap(), 2);
    let names: Vec<String> = nav
        .object_properties(gloss_div)
        .unwrap()
        .map(|p| nav.property_name(&p.unwrap()).unwrap().into_owned())
        .collect();
    assert_eq!(names, ["title", "GlossList"]);
    let div_title = nav.try_get_object_property(gloss_div, "title").unwrap().unwrap();
    assert_eq!(nav.node_type(div_title.name).unwrap(), JsonNodeType::FieldName);
    assert_eq!(nav.token(div_title.name).unwrap(), Token::FieldName("title".into()));
    assert_eq!(nav.get_string(div_title.value).unwrap(), "S");
    assert!(nav.try_get_object_property(gloss_div, "missing").unwrap().is_none());

    let entry = property(nav, &["glossary", "GlossDiv", "GlossList", "GlossEntry"]);
    for name in ["ID", "SortAs", "Acronym"] {
        let node = nav.try_get_object_property(entry, name).unwrap().unwrap().value;
        assert_eq!(nav.get_string(node).unwrap(), "SGML", "{name}");
    }
    let abbrev = nav.try_get_object_property(entry, "Abbrev").unwrap().unwrap().value;
    assert_eq!(nav.get_string(abbrev).unwrap(), "ISO 8879:1986");

    let see_also = property(
        nav,
        &["glossary", "GlossDiv", "GlossList", "GlossEntry", "GlossDef", "GlossSeeAlso"],
    );
    assert_eq!(nav.node_type(see_also).unwrap(), JsonNodeType::Array);
    assert_eq!(nav.array_item_count(see_also).unwrap(), 2);
    let xml = nav.array_item_at(see_also, 1).unwrap();
    assert_eq!(nav.get_string(xml).unwrap(), "XML");
    assert_eq!(
        nav.array_item_at(see_also, 2),
        Err(JsonError::IndexOutOfRange { index: 2, count: 2 })
    );
    assert_eq!(
        nav.array_item_at(gloss_div, 0),
        Err(JsonError::UnexpectedNodeType {
            expected: JsonNodeType::Array,
            actual: JsonNodeType::Object,
        })
    );
    assert_eq!(
        nav.get_number(xml),
        Err(JsonError::UnexpectedNodeType {
            expected: JsonNodeType::Number,
            actual: JsonNodeType::String,
        })
    );
}

#[test]
fn glossary_over_text() {
    let nav = Navigator::new(GLOSSARY.as_bytes(), None).unwrap();
    assert_eq!(nav.format(), SerializationFormat::Text);
    check_glossary(&nav);
}

#[test]
fn glossary_over_binary() {
    let binary = to_binary(GLOSSARY, None);
    assert!(binary.len() < GLOSSARY.len());
    let nav = Navigator::new(&binary, None).unwrap();
    assert_eq!(nav.format(), SerializationFormat::Binary);
    check_glossary(&nav);
}

#[test]
fn glossary_over_binary_with_dictionary() {
    let mut dict = StringDictionary::new();
    let binary = to_binary(GLOSSARY, Some(&mut dict));
    assert!(dict.index_of("GlossDiv").is_some());
    let nav = Navigator::new(&binary, Some(&dict)).unwrap();
    check_glossary(&nav);
}

#[test]
fn subtrees_agree_across_formats() {
    let text_nav = Navigator::text(GLOSSARY.as_bytes()).unwrap();
    let binary = to_binary(GLOSSARY, None);
    let binary_nav = Navigator::binary(&binary, None).unwrap();

    let path = ["glossary", "GlossDiv"];
    let text_node = property(&text_nav, &path);
    let binary_node = property(&binary_nav, &path);
    assert_eq!(
        text_nav.materialize(text_node).unwrap(),
        binary_nav.materialize(binary_node).unwrap()
    );

    // A binary subtree written as text reproduces the original bytes.
    let mut writer = TextWriter::new();
    writer.write_node(&binary_nav, binary_node).unwrap();
    assert_eq!(
        writer.get_result().unwrap(),
        text_nav.node_bytes(text_node).unwrap()
    );
}

#[test]
fn random_access_into_large_arrays() {
    let text = format!(
        "[{}]",
        (0..300).map(|i| i.to_string()).collect::<Vec<_>>().join(",")
    );
    let binary = to_binary(&text, None);
    for payload in [text.as_bytes(), binary.as_slice()] {
        let nav = Navigator::new(payload, None).unwrap();
        let root = nav.root_node();
        assert_eq!(nav.array_item_count(root).unwrap(), 300);
        let last = nav.array_item_at(root, 299).unwrap();
        assert_eq!(nav.get_number(last).unwrap(), Number64::Int(299));
        assert_eq!(
            nav.array_item_at(root, 300),
            Err(JsonError::IndexOutOfRange { index: 300, count: 300 })
        );
    }
}

#[test]
fn extended_kinds_through_text_navigation() {
    let nav = Navigator::text(
        br#"{"i":I-3,"u":UL9,"b":BAQID,"g":Ged7e38aa-074e-4a74-bab0-2a4f41079baa,"f":S0.5,"n":NaN}"#,
    )
    .unwrap();
    let node = |name: &str| property(&nav, &[name]);
    assert_eq!(nav.get_int8(node("i")).unwrap(), -3);
    assert_eq!(nav.get_uint32(node("u")).unwrap(), 9);
    assert_eq!(nav.get_float32(node("f")).unwrap(), 0.5);
    assert_eq!(
        nav.get_guid(node("g")).unwrap(),
        Guid::parse("ed7e38aa-074e-4a74-bab0-2a4f41079baa").unwrap()
    );
    let bytes = nav.get_binary(node("b")).unwrap();
    assert!(matches!(bytes, Cow::Owned(_)));
    assert_eq!(bytes.as_ref(), [1, 2, 3]);
    assert!(nav.get_number(node("n")).unwrap().as_f64().is_nan());
    assert_eq!(
        nav.get_int8(node("u")),
        Err(JsonError::UnexpectedNodeType {
            expected: JsonNodeType::Int8,
            actual: JsonNodeType::UInt32,
        })
    );
}

#[test]
fn binary_blobs_are_borrowed_from_binary_payloads() {
    let element = JsonElement::Array(vec![JsonElement::Binary(vec![4, 5, 6])]);
    let payload = element
        .to_payload(SerializationFormat::Binary, WriterOptions::default(), None)
        .unwrap();
    let nav = Navigator::new(&payload, None).unwrap();
    let item = nav.array_item_at(nav.root_node(), 0).unwrap();
    let bytes = nav.get_binary(item).unwrap();
    assert!(matches!(bytes, Cow::Borrowed(_)));
    assert_eq!(bytes.as_ref(), [4, 5, 6]);
}

#[test]
fn scalar_roots() {
    let nav = Navigator::text(b"  42 ").unwrap();
    let root = nav.root_node();
    assert_eq!(nav.node_type(root).unwrap(), JsonNodeType::Number);
    assert_eq!(nav.node_bytes(root).unwrap(), b"42");
    assert_eq!(nav.get_number(root).unwrap(), Number64::Int(42));
    assert!(nav.get_bool(root).is_err());

    let payload = [0x80, 0xd2];
    let nav = Navigator::new(&payload, None).unwrap();
    assert!(nav.get_bool(nav.root_node()).unwrap());
    assert_eq!(nav.node_bytes(nav.root_node()).unwrap(), [0xd2]);
}

#[test]
fn construction_failures() {
    assert!(matches!(
        Navigator::text(br#"{"a":}"#),
        Err(JsonError::InvalidText { .. })
    ));
    assert_eq!(
        Navigator::new(b"[1,2", None).err(),
        Some(JsonError::UnexpectedEof { offset: 4 })
    );
    assert_eq!(Navigator::binary(b"{}", None).err(), Some(JsonError::NotBinary));
}

#[test]
fn glossdiv_call_sequence_end_to_end() {
    fn write(writer: &mut dyn JsonWriter) {
        writer.write_object_start().unwrap();
        writer.write_field_name("GlossDiv").unwrap();
        writer.write_number(Number64::Int(10)).unwrap();
        writer.write_field_name("title").unwrap();
        writer.write_string("example glossary").unwrap();
        writer.write_object_end().unwrap();
    }

    let mut text =
        docdb_json::create_writer(SerializationFormat::Text, WriterOptions::default(), None);
    write(text.as_mut());
    assert_eq!(
        text.get_result().unwrap(),
        br#"{"GlossDiv":10,"title":"example glossary"}"#
    );

    let mut binary =
        docdb_json::create_writer(SerializationFormat::Binary, WriterOptions::default(), None);
    write(binary.as_mut());
    let payload = binary.get_result().unwrap();
    let nav = Navigator::new(payload, None).unwrap();
    let root = nav.root_node();
    assert_eq!(nav.object_property_count(root).unwrap(), 2);
    let title = nav.try_get_object_property(root, "title").unwrap().unwrap();
    assert_eq!(nav.node_type(title.value).unwrap(), JsonNodeType::String);
    assert_eq!(
        nav.materialize(title.value).unwrap(),
        JsonElement::String("example glossary".into())
    );
}
