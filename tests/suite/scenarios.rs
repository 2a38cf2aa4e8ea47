//! End-to-end reveal scenarios driven by a virtual clock.

use std::time::Duration;

use quill_types::{CursorAnchor, NodeTree, SessionOptions, SessionPhase, TypingSession};

use crate::common::{DELAY, Harness, paragraph};

#[test]
fn paragraph_hi_types_one_character_per_tick() {
    let (tree, root, text) = paragraph("Hi");
    let p = tree.parent(text).unwrap();
    let mut h = Harness::mount(tree, root);
    assert!(!h.tree.is_visible(root));

    assert_eq!(h.turn(Duration::ZERO), SessionPhase::Hiding);
    assert_eq!(h.text(text), "");
    assert_eq!(h.session.cursor().anchor(), Some(CursorAnchor::at_end(p)));
    assert!(h.session.cursor().is_visible());

    h.turn(Duration::ZERO);
    assert!(h.tree.is_visible(root));
    assert!(h.session.cursor().is_typing());
    assert_eq!(h.text(text), "");

    h.step();
    assert_eq!(h.text(text), "H");
    assert_eq!(h.done_calls.get(), 0);
    assert_eq!(h.session.cursor().anchor(), Some(CursorAnchor::after(p, text)));

    h.step();
    assert_eq!(h.text(text), "Hi");
    assert_eq!(h.done_calls.get(), 1);
    assert_eq!(h.session.phase(), SessionPhase::Done);
    assert!(!h.session.cursor().is_typing());
    assert_eq!(h.session.cursor().anchor(), Some(CursorAnchor::at_end(p)));
}

#[test]
fn partial_periods_do_not_type() {
    let (tree, root, text) = paragraph("Hi");
    let mut h = Harness::mount(tree, root);
    h.bootstrap();

    h.turn(DELAY / 2);
    assert_eq!(h.text(text), "");
    h.turn(DELAY / 2);
    assert_eq!(h.text(text), "H");
}

#[test]
fn empty_div_is_shown_without_delay() {
    let mut tree = NodeTree::new();
    let root = tree.add_root("typing-text");
    let first = tree.append_element(root, "p").unwrap();
    let a = tree.append_text(first, "a").unwrap();
    let div = tree.append_element(root, "div").unwrap();
    let second = tree.append_element(root, "p").unwrap();
    let b = tree.append_text(second, "b").unwrap();

    let mut h = Harness::mount(tree, root);
    h.turn(Duration::ZERO);
    assert!(!h.tree.is_visible(div));
    assert_eq!(h.session.inventory().entries(), &[a, div, b]);

    h.turn(Duration::ZERO);
    assert!(!h.tree.is_visible(div));

    // Typing "a" reaches the div in the same tick and moves straight on to "b".
    h.step();
    assert!(h.tree.is_visible(div));
    assert_eq!(h.text(b), "");
    assert!(matches!(h.session.phase(), SessionPhase::Typing { entry: 2, .. }));

    h.step();
    assert_eq!(h.text(b), "b");
    assert_eq!(h.session.phase(), SessionPhase::Done);
}

#[test]
fn lone_empty_div_finishes_at_reveal_start() {
    let mut tree = NodeTree::new();
    let root = tree.add_root("typing-text");
    let div = tree.append_element(root, "div").unwrap();

    let mut h = Harness::mount(tree, root);
    h.turn(Duration::ZERO);
    assert!(!h.tree.is_visible(div));

    assert_eq!(h.turn(Duration::ZERO), SessionPhase::Done);
    assert!(h.tree.is_visible(div));
    assert_eq!(h.done_calls.get(), 1);
    assert_eq!(h.session.cursor().anchor(), Some(CursorAnchor::at_end(root)));
}

#[test]
fn teardown_after_one_of_five_characters() {
    let (tree, root, text) = paragraph("Hello");
    let mut h = Harness::mount(tree, root);
    h.bootstrap();
    h.step();
    assert_eq!(h.text(text), "H");

    h.session.cancel();
    assert_eq!(h.session.phase(), SessionPhase::Cancelled);
    for _ in 0..10 {
        h.step();
    }
    h.turn(DELAY * 100);

    assert_eq!(h.text(text), "H");
    assert_eq!(h.done_calls.get(), 0);
}

#[test]
fn teardown_before_build_leaves_tree_alone() {
    let (tree, root, text) = paragraph("Hello");
    let mut h = Harness::mount(tree, root);
    h.session.cancel();
    h.bootstrap();

    assert_eq!(h.text(text), "Hello");
    assert!(h.session.inventory().is_empty());
    assert_eq!(h.done_calls.get(), 0);
}

#[test]
fn inline_span_holds_the_cursor() {
    let mut tree = NodeTree::new();
    let root = tree.add_root("typing-text");
    let p = tree.append_element(root, "p").unwrap();
    let span = tree.append_element(p, "span").unwrap();
    let text = tree.append_text(span, "ok").unwrap();

    let mut h = Harness::mount(tree, root);
    h.bootstrap();
    h.step();

    assert_eq!(h.text(text), "o");
    assert_eq!(h.session.cursor().anchor(), Some(CursorAnchor::after(span, text)));
}

#[test]
fn sessions_on_separate_roots_are_independent() {
    let mut tree = NodeTree::new();
    let left = tree.add_root("typing-text");
    let left_text = tree.append_text(left, "abc").unwrap();
    let right = tree.add_root("typing-text");
    let right_text = tree.append_text(right, "xy").unwrap();

    let fast = SessionOptions::with_delay(Duration::from_millis(10));
    let slow = SessionOptions::with_delay(Duration::from_millis(30));
    let mut a = TypingSession::mount(&mut tree, left, fast);
    let mut b = TypingSession::mount(&mut tree, right, slow);

    for _ in 0..2 {
        a.advance(&mut tree, Duration::ZERO);
        b.advance(&mut tree, Duration::ZERO);
    }
    a.advance(&mut tree, Duration::from_millis(30));
    b.advance(&mut tree, Duration::from_millis(30));

    assert_eq!(tree.text(left_text), Some("abc"));
    assert_eq!(tree.text(right_text), Some("x"));
    assert_eq!(a.phase(), SessionPhase::Done);
    assert!(matches!(b.phase(), SessionPhase::Typing { .. }));

    b.cancel();
    assert_eq!(a.phase(), SessionPhase::Done);
}

#[test]
fn multibyte_characters_are_typed_whole() {
    let (tree, root, text) = paragraph("né😀");
    let mut h = Harness::mount(tree, root);
    h.bootstrap();

    let mut seen = Vec::new();
    while !h.session.phase().is_finished() {
        h.step();
        seen.push(h.text(text).to_string());
    }
    assert_eq!(seen, ["n", "né", "né😀"]);
}
