//! Reveal invariants checked turn by turn over a mixed document.

use std::collections::HashMap;

use quill_types::{NodeId, SessionPhase};

use crate::common::{DELAY, Harness, mixed_document, text_nodes};

fn mixed() -> (Harness, HashMap<NodeId, String>) {
    let (tree, root) = mixed_document();
    let originals = text_nodes(&tree, root).into_iter().collect();
    (Harness::mount(tree, root), originals)
}

#[test]
fn every_text_node_is_restored() {
    let (mut h, originals) = mixed();
    h.bootstrap();
    h.run_to_end();

    assert_eq!(h.session.phase(), SessionPhase::Done);
    for (id, original) in &originals {
        assert_eq!(h.text(*id), original, "text of {id} after reveal");
    }
    for &entry in h.session.inventory().entries() {
        assert!(h.tree.is_visible(entry), "{entry} still hidden");
    }
    assert_eq!(h.tree.text_content(h.root), "Titleone two threeend");
}

#[test]
fn characters_arrive_in_order_without_gaps() {
    let (mut h, originals) = mixed();
    h.bootstrap();

    let mut seen: HashMap<NodeId, String> = HashMap::new();
    while !h.session.phase().is_finished() {
        h.step();
        for (id, text) in text_nodes(&h.tree, h.root) {
            let previous = seen.entry(id).or_default();
            assert!(
                text.starts_with(previous.as_str()),
                "{id} went from {previous:?} to {text:?}"
            );
            assert!(text.chars().count() <= previous.chars().count() + 1);
            assert!(originals[&id].starts_with(text.as_str()));
            *previous = text;
        }
    }
}

#[test]
fn later_entries_stay_blank_until_reached() {
    let (mut h, _) = mixed();
    h.bootstrap();

    while let SessionPhase::Typing { entry, .. } = h.session.phase() {
        let inventory = h.session.inventory();
        for &later in &inventory.entries()[entry + 1..] {
            if inventory.is_text_bearing(later) {
                assert_eq!(h.text(later), "", "{later} typed early");
            } else {
                assert!(!h.tree.is_visible(later), "{later} shown early");
            }
        }
        h.step();
    }
}

#[test]
fn one_character_per_period() {
    let (mut h, _) = mixed();
    h.bootstrap();

    let total = h.session.inventory().char_count();
    let mut previous = h.session.typed_chars();
    while !h.session.phase().is_finished() {
        let before = text_nodes(&h.tree, h.root);
        h.step();
        let after = text_nodes(&h.tree, h.root);
        let changed = before
            .iter()
            .zip(&after)
            .filter(|(b, a)| b.1 != a.1)
            .count();
        assert_eq!(changed, 1, "exactly one node receives a character");
        assert_eq!(h.session.typed_chars(), previous + 1);
        previous = h.session.typed_chars();
    }
    assert_eq!(previous, total);
}

#[test]
fn cursor_stays_inside_the_session_root() {
    let (mut h, _) = mixed();
    h.bootstrap();

    let mut attached = 0;
    while !h.session.phase().is_finished() {
        // Detached between the last character of one node and the first of the next.
        if let Some(anchor) = h.session.cursor().anchor() {
            let container = anchor.container();
            assert!(container == h.root || h.tree.descendants(h.root).contains(&container));
            if let Some(follows) = anchor.follows() {
                assert_eq!(h.tree.parent(follows), Some(container));
            }
            attached += 1;
        }
        h.step();
    }
    assert!(attached > 0);
    assert!(h.session.cursor().anchor().is_some());
}

#[test]
fn callback_fires_once_after_everything() {
    let (mut h, _) = mixed();
    h.bootstrap();

    while !h.session.phase().is_finished() {
        assert_eq!(h.done_calls.get(), 0);
        h.step();
    }
    assert_eq!(h.done_calls.get(), 1);

    for _ in 0..10 {
        h.step();
    }
    h.session.cancel();
    assert_eq!(h.done_calls.get(), 1);
    assert_eq!(h.session.phase(), SessionPhase::Done);
}

#[test]
fn large_delta_catches_up() {
    let (mut h, _) = mixed();
    h.bootstrap();

    let total = h.session.inventory().char_count();
    h.turn(DELAY * u32::try_from(total).unwrap());

    assert_eq!(h.session.phase(), SessionPhase::Done);
    assert_eq!(h.done_calls.get(), 1);
}
