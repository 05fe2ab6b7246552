//! Phase 3 tests: Import parsing + the import engine.

use outliner::engine::{Effect, ImportEngine, ImportOptions, ImportOutcome};
use outliner::graph::{Outline, OutlineBuilder};
use outliner::parse::{detect_format, parse_import, ImportNode, InputFormat};
use outliner::types::path::path_from;
use outliner::types::{Path, EM_TOKEN, NOTE_TOKEN, ROOT_TOKEN};
use outliner::ImportBatch;

// ==================== Helpers ====================

fn import(outline: &Outline, target: &Path, raw: &str) -> ImportOutcome {
    ImportEngine::new()
        .import_text(outline, target, raw, &ImportOptions::default())
        .expect("import succeeds")
}

fn structural(outcome: ImportOutcome) -> ImportBatch {
    match outcome {
        ImportOutcome::Structural(batch) => batch,
        other => panic!("expected a structural import, got {:?}", other),
    }
}

fn values(outline: &Outline, context: &[&str]) -> Vec<String> {
    outline
        .children(context)
        .into_iter()
        .map(|c| c.value)
        .collect()
}

fn ranks(outline: &Outline, context: &[&str]) -> Vec<f64> {
    outline
        .children(context)
        .into_iter()
        .map(|c| c.rank)
        .collect()
}

// ==================== Parsing ====================

#[test]
fn test_parse_nested_html() {
    assert_eq!(
        parse_import("<li>x<ul><li>y</li></ul></li>"),
        vec![
            ImportNode::ListItem("x".into()),
            ImportNode::NestedList(vec![ImportNode::ListItem("y".into())]),
        ]
    );
}

#[test]
fn test_parse_full_document_uses_body_only() {
    let doc = "<!DOCTYPE html><html><head><title>Ignored</title></head>\
               <body><ul><li>one</li><li>two &amp; three</li></ul></body></html>";
    assert_eq!(detect_format(doc), InputFormat::Html);
    assert_eq!(
        parse_import(doc),
        vec![
            ImportNode::ListItem("one".into()),
            ImportNode::ListItem("two & three".into()),
        ]
    );
}

#[test]
fn test_parse_unbalanced_html() {
    assert_eq!(
        parse_import("<li>a<li>b<ul><li>c"),
        vec![
            ImportNode::ListItem("a".into()),
            ImportNode::ListItem("b".into()),
            ImportNode::NestedList(vec![ImportNode::ListItem("c".into())]),
        ]
    );
}

#[test]
fn test_list_after_closed_item_nests_under_it() {
    let raw = "<ul><li>a</li><ul><li>b</li></ul></ul>";
    assert_eq!(
        parse_import(raw),
        vec![
            ImportNode::ListItem("a".into()),
            ImportNode::NestedList(vec![ImportNode::ListItem("b".into())]),
        ]
    );

    let outline = OutlineBuilder::new().append(&[], "top").build();
    let target = outline.resolve(&["top"]).unwrap();
    let batch = structural(import(&outline, &target, raw));
    let next = outline.apply_import(&batch);
    assert_eq!(values(&next, &[ROOT_TOKEN]), vec!["top", "a"]);
    assert_eq!(values(&next, &["a"]), vec!["b"]);
    assert!(next.verify().is_ok());
}

#[test]
fn test_parse_decodes_named_entities() {
    assert_eq!(
        parse_import("<li>caf&eacute; &amp; cr&egrave;me</li><li>&copy; &hearts;</li>"),
        vec![
            ImportNode::ListItem("café & crème".into()),
            ImportNode::ListItem("© ♥".into()),
        ]
    );
}

#[test]
fn test_parse_paragraphs_and_bullets() {
    assert_eq!(
        parse_import("<p>first</p><p>second <em>line</em></p>"),
        vec![
            ImportNode::ListItem("first".into()),
            ImportNode::ListItem("second line".into()),
        ]
    );
    assert_eq!(
        parse_import("- one\n* two\n— three\n\n"),
        vec![
            ImportNode::ListItem("one".into()),
            ImportNode::ListItem("two".into()),
            ImportNode::ListItem("three".into()),
        ]
    );
}

// ==================== Single-line imports ====================

#[test]
fn test_single_line_into_non_empty_is_text_edit() {
    let outline = OutlineBuilder::new().append(&[], "hello").build();
    let target = outline.resolve(&["hello"]).unwrap();

    match import(&outline, &target, "world") {
        ImportOutcome::Edit(edit) => {
            assert_eq!(edit.old_value, "hello");
            assert_eq!(edit.new_value, "hello world");
            assert_eq!(edit.cursor_offset, 11);
            assert_eq!(edit.path, target);
        }
        other => panic!("expected a text edit, got {:?}", other),
    }
}

#[test]
fn test_single_line_respects_caret_and_selection() {
    let outline = OutlineBuilder::new().append(&[], "añb").build();
    let target = outline.resolve(&["añb"]).unwrap();
    let options = ImportOptions {
        offset: Some(1),
        selection_len: 1,
        ..ImportOptions::default()
    };
    let outcome = ImportEngine::new()
        .import_text(&outline, &target, "<li>X</li>", &options)
        .unwrap();
    match outcome {
        ImportOutcome::Edit(edit) => {
            assert_eq!(edit.new_value, "a Xb");
            assert_eq!(edit.cursor_offset, 3);
        }
        other => panic!("expected a text edit, got {:?}", other),
    }
}

#[test]
fn test_single_line_into_empty_has_no_space() {
    let outline = OutlineBuilder::new().append(&[], "").build();
    let target = outline.resolve(&[""]).unwrap();
    match import(&outline, &target, "- solo") {
        ImportOutcome::Edit(edit) => assert_eq!(edit.new_value, "solo"),
        other => panic!("expected a text edit, got {:?}", other),
    }
}

#[test]
fn test_blank_input_imports_nothing() {
    let outline = OutlineBuilder::new().append(&[], "a").build();
    let target = outline.resolve(&["a"]).unwrap();
    assert!(matches!(import(&outline, &target, "  \n\n"), ImportOutcome::Empty));
    assert!(matches!(import(&outline, &target, "<li>  </li>"), ImportOutcome::Empty));
}

// ==================== Structural imports ====================

#[test]
fn test_plaintext_replaces_empty_destination() {
    let outline = OutlineBuilder::new()
        .append(&[], "first")
        .append(&[], "")
        .append(&[], "last")
        .build();
    let target = outline.resolve(&[""]).unwrap();

    let batch = structural(import(&outline, &target, "a\nb\nc"));
    let next = outline.apply_import(&batch);

    assert_eq!(values(&next, &[ROOT_TOKEN]), vec!["first", "a", "b", "c", "last"]);
    let r = ranks(&next, &[ROOT_TOKEN]);
    assert!(r.windows(2).all(|w| w[0] < w[1]), "ranks {:?}", r);
    assert!(next.thought("").is_none());
    assert_eq!(batch.item_count, 3);
    assert_eq!(batch.first_inserted, Some(path_from(&[("a", r[1])])));
    assert_eq!(next.cursor(), batch.first_inserted.as_ref());
    assert!(next.verify().is_ok());
}

#[test]
fn test_nested_html_under_root() {
    let outline = OutlineBuilder::new().append(&[], "r").build();
    let target = outline.resolve(&["r"]).unwrap();

    let batch = structural(import(&outline, &target, "<li>x<ul><li>y</li></ul></li>"));
    let next = outline.apply_import(&batch);

    assert_eq!(values(&next, &[ROOT_TOKEN]), vec!["r", "x"]);
    assert_eq!(values(&next, &["x"]), vec!["y"]);
    assert_eq!(next.thought("y").map(|t| t.contexts[0].context.clone()), Some(vec!["x".to_string()]));
    assert!(next.verify().is_ok());
}

#[test]
fn test_one_rank_cursor_for_all_depths() {
    let outline = OutlineBuilder::new().append(&[], "r").build();
    let target = outline.resolve(&["r"]).unwrap();

    let raw = "<ul><li>a<ul><li>a1</li><li>a2</li></ul></li><li>b</li></ul>";
    let next = outline.apply_import(&structural(import(&outline, &target, raw)));

    assert_eq!(ranks(&next, &[ROOT_TOKEN]), vec![0.0, 1.0, 4.0]);
    assert_eq!(ranks(&next, &["a"]), vec![2.0, 3.0]);
}

#[test]
fn test_indented_text_nests() {
    let outline = OutlineBuilder::new().append(&[], "top").build();
    let target = outline.resolve(&["top"]).unwrap();

    let raw = "fruits\n  - apple\n  - pear\n    bosc\nveggies";
    let next = outline.apply_import(&structural(import(&outline, &target, raw)));

    assert_eq!(values(&next, &[ROOT_TOKEN]), vec!["top", "fruits", "veggies"]);
    assert_eq!(values(&next, &["fruits"]), vec!["apple", "pear"]);
    assert_eq!(values(&next, &["fruits", "pear"]), vec!["bosc"]);
    assert!(next.verify().is_ok());
}

#[test]
fn test_ranks_fit_before_next_sibling() {
    let outline = OutlineBuilder::new()
        .add(&[], "a", 0.0)
        .add(&[], "z", 1.0)
        .build();
    let target = outline.resolve(&["a"]).unwrap();

    let next = outline.apply_import(&structural(import(&outline, &target, "m\nn\no\np")));
    assert_eq!(values(&next, &[ROOT_TOKEN]), vec!["a", "m", "n", "o", "p", "z"]);
    let r = ranks(&next, &[ROOT_TOKEN]);
    assert!(r[4] < 1.0);
    assert!(r.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_duplicates_adopt_existing_rank_and_merge() {
    let outline = OutlineBuilder::new()
        .add(&[], "r", 0.0)
        .add(&[], "x", 1.0)
        .add(&["x"], "a", 0.0)
        .build();
    let target = outline.resolve(&["r"]).unwrap();

    let next = outline.apply_import(&structural(import(
        &outline,
        &target,
        "<li>X<ul><li>b</li></ul></li><li>c</li>",
    )));

    assert_eq!(values(&next, &[ROOT_TOKEN]), vec!["r", "c", "x"]);
    assert_eq!(ranks(&next, &[ROOT_TOKEN])[2], 1.0);
    assert_eq!(values(&next, &["x"]), vec!["a", "b"]);
    assert!(next.verify().is_ok());
}

#[test]
fn test_notes_attach_to_items() {
    let outline = OutlineBuilder::new().append(&[], "r").build();
    let target = outline.resolve(&["r"]).unwrap();

    let raw = r#"<ul><li><span class="name">a</span><span class="note">about a</span></li><li>b</li></ul>"#;
    let batch = structural(import(&outline, &target, raw));
    assert_eq!(batch.item_count, 2);
    let next = outline.apply_import(&batch);

    assert_eq!(values(&next, &[ROOT_TOKEN]), vec!["r", "a", "b"]);
    assert_eq!(values(&next, &["a"]), vec![NOTE_TOKEN]);
    assert_eq!(values(&next, &["a", NOTE_TOKEN]), vec!["about a"]);
    assert_eq!(ranks(&next, &["a", NOTE_TOKEN]), vec![0.0]);
    assert!(next.verify().is_ok());
}

#[test]
fn test_em_target_inserts_under_sentinel() {
    let outline = Outline::new();
    let target = path_from(&[(EM_TOKEN, 0.0)]);

    let first = outline.apply_import(&structural(import(&outline, &target, "p\nq")));
    assert_eq!(values(&first, &[EM_TOKEN]), vec!["p", "q"]);
    assert_eq!(ranks(&first, &[EM_TOKEN]), vec![0.0, 1.0]);

    let second = first.apply_import(&structural(import(&first, &target, "r\ns")));
    assert_eq!(values(&second, &[EM_TOKEN]), vec!["p", "q", "r", "s"]);
    assert_eq!(ranks(&second, &[EM_TOKEN]), vec![0.0, 1.0, 2.0, 3.0]);
    assert!(second.children(&[ROOT_TOKEN]).is_empty());
}

#[test]
fn test_import_emits_forced_sync() {
    let outline = OutlineBuilder::new().append(&[], "r").build();
    let target = outline.resolve(&["r"]).unwrap();
    let batch = structural(import(&outline, &target, "a\nb"));

    assert_eq!(batch.effects.len(), 1);
    match &batch.effects[0] {
        Effect::Sync { updates, options } => {
            assert_eq!(updates, &batch.updates);
            assert!(options.force_render);
            assert!(options.apply_to_live_state);
        }
        other => panic!("unexpected effect {:?}", other),
    }
    assert_eq!(outline.children(&[ROOT_TOKEN]).len(), 1);
}
