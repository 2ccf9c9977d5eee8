// Tests for whitespace tolerance inside expressions

use cardtemplate::render;
use serde_json::json;

mod common;

#[test]
fn test_multiline_expression_matches_single_line() {
    let data = r#"{"flag": true, "name": "Ada"}"#;

    let compact = r#"{"body":[{"type":"TextBlock","text":"${if(flag,name,'Not  set')}"}]}"#;
    let spaced = "{\"body\":[{\"type\":\"TextBlock\",\"text\":\"${ if( flag,\t name , 'Not  set' ) }\"}]}";

    assert_eq!(render(spaced, data), render(compact, data));
    assert_eq!(
        common::rendered_body(&render(spaced, data))[0]["text"],
        json!("Ada")
    );
}

#[test]
fn test_quoted_literal_keeps_spacing() {
    let template = common::card(json!([{
        "type": "TextBlock",
        "text": "${ if( flag , 'a   b' , 'c' ) }"
    }]));

    let output = render(&template, r#"{"flag": 1}"#);
    assert_eq!(common::rendered_body(&output)[0]["text"], json!("a   b"));
}

#[test]
fn test_spaced_predicate() {
    let template = common::card(json!([{
        "type": "Image",
        "url": "${ img }",
        "$when": "${ img != null && img != '' }"
    }]));

    assert_eq!(common::rendered_body(&render(&template, "{}")), json!([]));
    assert_eq!(
        common::rendered_body(&render(&template, r#"{"img": "x.png"}"#)),
        json!([{"type": "Image", "url": "x.png"}])
    );
}

#[test]
fn test_text_outside_expressions_untouched() {
    let template = common::card(json!([{"type": "TextBlock", "text": "  a  b  ${ name }  "}]));
    let output = render(&template, r#"{"name": "x"}"#);
    assert_eq!(common::rendered_body(&output)[0]["text"], json!("  a  b  x  "));
}

#[test]
fn test_unclosed_span_does_not_reach_sibling_text() {
    let template = r#"{"body":[{"type":"TextBlock","text":"Price: ${"},{"type":"TextBlock","text":"a b"}]}"#;
    let output = render(template, "{}");

    assert_eq!(output, template);
    assert_eq!(common::rendered_body(&output)[1]["text"], json!("a b"));
}
