//! Building trees from fragment files and revealing them.

use std::time::Duration;

use quill_types::{ElementRole, Fragment, FragmentError, NodeTree, SessionPhase};
use serde_json::json;

use crate::common::Harness;

#[test]
fn parse_object_or_array() {
    let one = Fragment::parse_list(r#"{ "text": "hi" }"#).unwrap();
    assert_eq!(one, vec![Fragment::text("hi")]);

    let many = Fragment::parse_list(r#"[{ "tag": "p" }, { "text": "x" }]"#).unwrap();
    assert_eq!(many, vec![Fragment::element("p", Vec::new()), Fragment::text("x")]);
}

#[test]
fn malformed_json_is_a_parse_error() {
    let err = Fragment::parse_list("{ \"tag\": ").unwrap_err();
    assert!(matches!(err, FragmentError::Parse(_)));
}

#[test]
fn explicit_role_overrides_tag() {
    let doc = json!({
        "tag": "section",
        "role": "group",
        "children": [
            { "tag": "em", "role": "inline", "children": [{ "text": "a" }] }
        ]
    });
    let fragments = Fragment::parse_list(&doc.to_string()).unwrap();

    let mut tree = NodeTree::new();
    let root = tree.add_root("typing-text");
    tree.append_fragments(root, &fragments).unwrap();

    let section = tree.children(root)[0];
    let em = tree.children(section)[0];
    assert_eq!(tree.get(section).unwrap().role(), Some(ElementRole::Group));
    assert_eq!(tree.get(em).unwrap().role(), Some(ElementRole::Inline));
}

#[test]
fn group_role_hides_container_with_text() {
    let fragments = vec![
        Fragment::element("p", vec![Fragment::text("ab")]).with_role(ElementRole::Group),
    ];
    let mut tree = NodeTree::new();
    let root = tree.add_root("typing-text");
    tree.append_fragments(root, &fragments).unwrap();
    let p = tree.children(root)[0];

    let mut h = Harness::mount(tree, root);
    h.turn(Duration::ZERO);

    assert!(!h.tree.is_visible(p));
    assert_eq!(h.session.inventory().len(), 2);
    assert_eq!(h.session.inventory().text_entries(), 1);
}

#[test]
fn fragment_document_reveals_completely() {
    let doc = json!([
        { "tag": "h1", "children": [{ "text": "Head" }] },
        { "tag": "div", "children": [
            { "tag": "p", "children": [{ "text": "body " }, { "tag": "span", "children": [{ "text": "span" }] }] },
            { "tag": "br" }
        ] }
    ]);
    let fragments = Fragment::parse_list(&doc.to_string()).unwrap();
    let mut tree = NodeTree::new();
    let root = tree.add_root("typing-text");
    tree.append_fragments(root, &fragments).unwrap();

    let mut h = Harness::mount(tree, root);
    h.bootstrap();
    let steps = h.run_to_end();

    assert_eq!(steps, "Headbody span".chars().count());
    assert_eq!(h.session.phase(), SessionPhase::Done);
    assert_eq!(h.tree.text_content(root), "Headbody span");
}

#[test]
fn attaching_to_a_text_node_fails() {
    let mut tree = NodeTree::new();
    let root = tree.add_root("typing-text");
    let text = tree.append_text(root, "x").unwrap();

    let err = tree.append_fragment(text, &Fragment::text("y")).unwrap_err();
    assert!(matches!(err, FragmentError::InvalidParent(id) if id == text));
}
