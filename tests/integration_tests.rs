use pathwise::{CompiledPath, Error, output::to_json_pretty};

fn query(doc: &str, path: &str) -> Option<String> {
    pathwise::query(doc, path).unwrap_or_else(|e| panic!("{} failed: {}", path, e))
}

fn query_err(doc: &str, path: &str) -> Error {
    match pathwise::query(doc, path) {
        Ok(result) => panic!("{} should fail, got {:?}", path, result),
        Err(e) => e,
    }
}

fn as_json(text: &str) -> serde_json::Value {
    serde_json::from_str(text).unwrap_or_else(|e| panic!("not JSON: {} ({})", text, e))
}

const STORE: &str = r#"{
    "store": {
        "book": [
            {"category": "reference", "author": "Nigel Rees", "title": "Sayings of the Century", "price": 8.95},
            {"category": "fiction", "author": "Evelyn Waugh", "title": "Sword of Honour", "price": 12.99},
            {"category": "fiction", "author": "Herman Melville", "title": "Moby Dick", "isbn": "0-553-21311-3", "price": 8.99},
            {"category": "fiction", "author": "J. R. R. Tolkien", "title": "The Lord of the Rings", "isbn": "0-395-19395-8", "price": 22.99}
        ],
        "bicycle": {"color": "red", "price": 19.95}
    },
    "expensive": 10
}"#;

// ============================================================================
// Definite paths
// ============================================================================

#[test]
fn test_member_access() {
    assert_eq!(query(r#"{"a":{"b":5}}"#, "$.a.b").as_deref(), Some("5"));
}

#[test]
fn test_missing_member_is_none() {
    assert_eq!(query(r#"{"a":{"b":5}}"#, "$.a.c"), None);
    assert_eq!(query(r#"{"a":{"b":5}}"#, "$.x.y.z"), None);
}

#[test]
fn test_string_is_decoded() {
    assert_eq!(query(r#"{"s":"a\"bA\n"}"#, "$.s").as_deref(), Some("a\"bA\n"));
}

#[test]
fn test_null_is_empty_text() {
    assert_eq!(query(r#"{"n":null}"#, "$.n").as_deref(), Some(""));
}

#[test]
fn test_booleans_and_numbers_keep_spelling() {
    let doc = r#"{"t":true,"f":false,"n":1.50,"e":1e3}"#;
    assert_eq!(query(doc, "$.t").as_deref(), Some("true"));
    assert_eq!(query(doc, "$.f").as_deref(), Some("false"));
    assert_eq!(query(doc, "$.n").as_deref(), Some("1.50"));
    assert_eq!(query(doc, "$.e").as_deref(), Some("1e3"));
}

#[test]
fn test_container_keeps_raw_text() {
    let doc = r#"{"o": {"k" : [1, 2]}}"#;
    assert_eq!(query(doc, "$.o").as_deref(), Some(r#"{"k" : [1, 2]}"#));
}

#[test]
fn test_bracket_and_dot_notation_agree() {
    assert_eq!(query(STORE, "$.store.bicycle.color"), query(STORE, "$['store']['bicycle']['color']"));
    assert_eq!(query(STORE, "$.store.book[1].author").as_deref(), Some("Evelyn Waugh"));
}

#[test]
fn test_negative_index() {
    assert_eq!(query("[10,20,30,40]", "$[-1]").as_deref(), Some("40"));
    assert_eq!(query("[10,20,30,40]", "$[-4]").as_deref(), Some("10"));
    assert_eq!(query("[10,20,30,40]", "$[-5]"), None);
    assert_eq!(query("[10,20,30,40]", "$[4]"), None);
}

#[test]
fn test_huge_index_matches_nothing() {
    assert_eq!(query("[1,2]", "$[9223372036854775807]"), None);
    assert_eq!(query("[1,2]", "$[0,9223372036854775807]").as_deref(), Some("[1]"));
    assert_eq!(query("[1,2]", "$[-9223372036854775808]"), None);
}

#[test]
fn test_quoted_member_with_spaces() {
    assert_eq!(query(r#"{"a b":{"c'd":1}}"#, r#"$['a b']["c'd"]"#).as_deref(), Some("1"));
}

// ============================================================================
// Indefinite paths
// ============================================================================

#[test]
fn test_wildcard() {
    assert_eq!(query("[1,2,3]", "$[*]").as_deref(), Some("[1,2,3]"));
    assert_eq!(query(r#"{"a":1,"b":"x"}"#, "$.*").as_deref(), Some(r#"[1,"x"]"#));
}

#[test]
fn test_wildcard_over_empty_is_none() {
    assert_eq!(query("[]", "$[*]"), None);
    assert_eq!(query("{}", "$.*"), None);
}

#[test]
fn test_slices() {
    let doc = "[10,20,30,40]";
    assert_eq!(query(doc, "$[0:2]").as_deref(), Some("[10,20]"));
    assert_eq!(query(doc, "$[-2:]").as_deref(), Some("[30,40]"));
    assert_eq!(query(doc, "$[:]").as_deref(), Some("[10,20,30,40]"));
    assert_eq!(query(doc, "$[1:-1]").as_deref(), Some("[20,30]"));
    assert_eq!(query(doc, "$[2:2]"), None);
    assert_eq!(query(doc, "$[3:1]"), None);
}

#[test]
fn test_lists_follow_document_order() {
    assert_eq!(query("[10,20,30]", "$[2,0]").as_deref(), Some("[10,30]"));
    assert_eq!(query(r#"{"a":1,"b":2}"#, "$['b','a']").as_deref(), Some("[1,2]"));
}

#[test]
fn test_wildcard_then_member() {
    assert_eq!(
        query(STORE, "$.store.book[*].author").as_deref(),
        Some(r#"["Nigel Rees","Evelyn Waugh","Herman Melville","J. R. R. Tolkien"]"#)
    );
}

#[test]
fn test_missing_members_are_skipped() {
    assert_eq!(
        query(STORE, "$.store.book[*].isbn").as_deref(),
        Some(r#"["0-553-21311-3","0-395-19395-8"]"#)
    );
}

// ============================================================================
// Recursive descent
// ============================================================================

#[test]
fn test_recursive_name() {
    let doc = r#"{"name":"a","kids":[{"name":"b"},{"x":{"name":"c"}}]}"#;
    assert_eq!(query(doc, "$..name").as_deref(), Some(r#"["a","b","c"]"#));
}

#[test]
fn test_recursive_wildcard() {
    assert_eq!(query(r#"{"a":{"b":1}}"#, "$..*").as_deref(), Some(r#"[{"b":1},1]"#));
}

#[test]
fn test_recursive_index() {
    let doc = r#"{"a":[1,2],"b":{"c":[3,4]}}"#;
    assert_eq!(query(doc, "$..[0]").as_deref(), Some("[1,3]"));
}

#[test]
fn test_recursive_in_the_middle() {
    assert_eq!(
        query(STORE, "$.store..price").as_deref(),
        Some("[8.95,12.99,8.99,22.99,19.95]")
    );
}

#[test]
fn test_recursive_then_filter() {
    assert_eq!(
        query(STORE, "$..book[?(@.price > 20)].title").as_deref(),
        Some(r#"["The Lord of the Rings"]"#)
    );
}

// ============================================================================
// Documents
// ============================================================================

#[test]
fn test_malformed_document() {
    let err = query_err(r#"{"a":"#, "$.a");
    assert!(matches!(err, Error::InternalJson { .. }), "{:?}", err);

    let err = query_err(r#"{"a":1} x"#, "$.a");
    assert!(matches!(err, Error::InternalJson { .. }), "{:?}", err);
}

#[test]
fn test_scalar_root_matches_nothing() {
    assert_eq!(query("5", "$.a"), None);
    assert_eq!(query(r#""text""#, "$[0]"), None);
}

#[test]
fn test_whitespace_in_document() {
    let doc = "{ \"a\" :\n [ 1 ,\t2 ] }";
    assert_eq!(query(doc, "$.a[*]").as_deref(), Some("[1,2]"));
    assert_eq!(query(doc, "$.a[1]").as_deref(), Some("2"));
}

#[test]
fn test_escaped_member_names() {
    assert_eq!(query(r#"{"a\u0062":1}"#, "$.ab").as_deref(), Some("1"));
    assert_eq!(query(r#"{"a\"b":2}"#, r#"$['a"b']"#).as_deref(), Some("2"));
}

// ============================================================================
// Compiled paths
// ============================================================================

#[test]
fn test_compiled_path_is_reusable() {
    let path = CompiledPath::compile("$.store.book[?(@.category == 'fiction')].price").unwrap();
    let first = path.query(STORE).unwrap();
    let second = path.query(STORE).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.as_deref(), Some("[12.99,8.99,22.99]"));
    assert_eq!(path.query(r#"{"store":{}}"#).unwrap(), None);
}

#[test]
fn test_indefinite_results_are_json() {
    for path in ["$..*", "$.store.book[*]", "$..price", "$.store.*", "$..book[0:2]"] {
        let result = query(STORE, path).unwrap_or_else(|| panic!("{} matched nothing", path));
        assert!(as_json(&result).is_array(), "{}", path);
    }
}

#[test]
fn test_pretty_output() {
    let result = query(r#"{"a":[1,2]}"#, "$.a").unwrap();
    assert_eq!(to_json_pretty(&result), "[\n  1,\n  2\n]");
    assert_eq!(as_json(&to_json_pretty(&result)), as_json(&result));
}
