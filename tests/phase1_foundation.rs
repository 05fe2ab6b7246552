//! Phase 1 tests: Data structures, hashing, indexes + file format.

use outliner::format::{SnapshotReader, SnapshotWriter};
use outliner::graph::{Outline, OutlineBuilder};
use outliner::index::{hash_context, hash_thought, ContextIndex, ThoughtIndex};
use outliner::types::error::OutlineError;
use outliner::types::header::{FileHeader, HEADER_SIZE};
use outliner::types::path::path_from;
use outliner::types::{
    rooted_context_of, ContextChild, Thought, FORMAT_VERSION, OUTLINE_MAGIC, ROOT_TOKEN,
};

use std::io::Cursor;
use tempfile::NamedTempFile;

fn ctx(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

// ==================== Hashing Tests ====================

#[test]
fn test_hash_thought_normalizes() {
    assert_eq!(hash_thought("Hello  World"), hash_thought("  hello world "));
    assert_eq!(hash_thought("a\tb"), hash_thought("A B"));
    assert_ne!(hash_thought("ab"), hash_thought("a b"));
    assert_eq!(hash_thought("x").len(), 32);
}

#[test]
fn test_hash_context_deterministic() {
    let a = hash_context(&["Fruits", "Apple  Pie"]);
    let b = hash_context(&[" fruits", "apple pie "]);
    assert_eq!(a, b);
    assert_eq!(a, hash_context(&ctx(&["fruits", "apple pie"])));
}

#[test]
fn test_hash_context_order_and_boundaries() {
    assert_ne!(hash_context(&["a", "b"]), hash_context(&["b", "a"]));
    assert_ne!(hash_context(&["ab", "c"]), hash_context(&["a", "bc"]));
    assert_ne!(hash_context(&["a"]), hash_context(&["a", ""]));
}

#[test]
fn test_empty_context_is_root() {
    let empty: [&str; 0] = [];
    assert_eq!(hash_context(&empty), hash_context(&[ROOT_TOKEN]));
    assert_eq!(rooted_context_of(&ctx(&["a"])), ctx(&[ROOT_TOKEN]));
    assert_eq!(rooted_context_of(&ctx(&["a", "b"])), ctx(&["a"]));
}

// ==================== Entity Tests ====================

#[test]
fn test_thought_membership_is_pure() {
    let t = Thought::new("apple", 1);
    let with = t.with_membership(&ctx(&["fruit"]), 2.0, 5);
    assert!(t.is_orphan());
    assert_eq!(with.contexts.len(), 1);
    assert_eq!(with.last_updated, 5);

    let rerank = with.with_membership(&ctx(&["FRUIT"]), 7.0, 6);
    assert_eq!(rerank.contexts.len(), 1);
    assert_eq!(rerank.contexts[0].rank, 7.0);

    let without = rerank.without_membership(&ctx(&["fruit"]), 7);
    assert!(without.is_orphan());
    assert_eq!(rerank.contexts.len(), 1);
}

// ==================== Index Tests ====================

#[test]
fn test_thought_index_drops_orphans() {
    let mut index = ThoughtIndex::new();
    index.add_membership("a", &ctx(&["p"]), 0.0, 1);
    index.add_membership("A", &ctx(&["q"]), 1.0, 1);
    assert_eq!(index.len(), 1);
    assert_eq!(index.membership_count(), 2);

    assert!(index.remove_membership("a", &ctx(&["p"]), 2).is_some());
    assert!(index.remove_membership("a", &ctx(&["q"]), 3).is_none());
    assert!(index.is_empty());
}

#[test]
fn test_context_index_dedup_and_purge() {
    let mut index = ContextIndex::new();
    let parent = ctx(&["p"]);
    index.put_child(&parent, ContextChild::new("a", 0.0, 1));
    index.put_child(&parent, ContextChild::new("b", 1.0, 1));
    index.put_child(&parent, ContextChild::new("A", 5.0, 2));

    let children = index.sorted_children(&parent);
    assert_eq!(children.len(), 2);
    assert_eq!(children[0].value, "b");
    assert_eq!(children[1].rank, 5.0);
    assert_eq!(index.next_rank(&parent), 6.0);

    index.remove_child(&parent, "a");
    index.remove_child(&parent, "b");
    assert!(index.is_empty());
    assert_eq!(index.next_rank(&parent), 0.0);
}

#[test]
fn test_builder_produces_consistent_outline() {
    let outline = OutlineBuilder::new()
        .append(&[], "fruits")
        .append(&["fruits"], "apple")
        .append(&["fruits"], "pear")
        .append(&[], "recipes")
        .append(&["recipes"], "apple")
        .build();

    assert!(outline.verify().is_ok());
    assert_eq!(outline.thought("apple").map(|t| t.contexts.len()), Some(2));
    assert_eq!(
        outline.resolve(&["fruits", "pear"]),
        Some(path_from(&[("fruits", 0.0), ("pear", 1.0)]))
    );
    assert!(outline.resolve(&["fruits", "kiwi"]).is_none());
    assert_eq!(
        outline.render_tree(),
        "- fruits\n  - apple\n  - pear\n- recipes\n  - apple\n"
    );
}

#[test]
fn test_verify_detects_rank_mismatch() {
    let mut ti = ThoughtIndex::new();
    let mut ci = ContextIndex::new();
    ti.add_membership("a", &ctx(&[ROOT_TOKEN]), 0.0, 1);
    ci.put_child(&[ROOT_TOKEN], ContextChild::new("a", 1.0, 1));
    let outline = Outline::from_parts(ti, ci, Default::default());
    assert!(matches!(outline.verify(), Err(OutlineError::Inconsistent(_))));
}

#[test]
fn test_verify_detects_missing_child() {
    let mut ti = ThoughtIndex::new();
    ti.add_membership("a", &ctx(&[ROOT_TOKEN]), 0.0, 1);
    let outline = Outline::from_parts(ti, ContextIndex::new(), Default::default());
    assert!(outline.verify().is_err());
}

// ==================== File Format Tests ====================

#[test]
fn test_header_roundtrip() {
    let mut header = FileHeader::new(true);
    header.thought_count = 3;
    header.context_count = 7;
    header.body_len = 1234;

    let mut buf = Vec::new();
    header.write_to(&mut buf).unwrap();
    assert_eq!(buf.len() as u64, HEADER_SIZE);
    assert_eq!(&buf[0..4], &OUTLINE_MAGIC);

    let read = FileHeader::read_from(&mut Cursor::new(&buf)).unwrap();
    assert_eq!(read, header);
    assert_eq!(read.version, FORMAT_VERSION);
    assert!(read.is_compressed());
}

#[test]
fn test_header_rejects_bad_magic() {
    let mut buf = vec![0u8; HEADER_SIZE as usize];
    buf[0..4].copy_from_slice(b"NOPE");
    assert!(matches!(
        FileHeader::read_from(&mut Cursor::new(&buf)),
        Err(OutlineError::InvalidMagic)
    ));
}

#[test]
fn test_header_rejects_future_version() {
    let mut buf = Vec::new();
    FileHeader::new(false).write_to(&mut buf).unwrap();
    buf[4..8].copy_from_slice(&99u32.to_le_bytes());
    assert!(matches!(
        FileHeader::read_from(&mut Cursor::new(&buf)),
        Err(OutlineError::UnsupportedVersion(99))
    ));
}

#[test]
fn test_truncated_file() {
    assert!(matches!(
        SnapshotReader::read_from(&mut Cursor::new(vec![0x4F, 0x54])),
        Err(OutlineError::Truncated)
    ));

    let mut buf = Vec::new();
    SnapshotWriter::new(false)
        .write_to(&OutlineBuilder::new().append(&[], "a").build(), &mut buf)
        .unwrap();
    buf.truncate(buf.len() - 3);
    assert!(matches!(
        SnapshotReader::read_from(&mut Cursor::new(buf)),
        Err(OutlineError::Truncated)
    ));
}

#[test]
fn test_snapshot_file_roundtrip() {
    let outline = OutlineBuilder::new()
        .append(&[], "fruits")
        .append(&["fruits"], "apple")
        .append(&["fruits", "apple"], "gala")
        .context_view(&["fruits"], true)
        .build();

    for compress in [false, true] {
        let tmp = NamedTempFile::new().unwrap();
        SnapshotWriter::new(compress)
            .write_to_file(&outline, tmp.path())
            .unwrap();
        let header = SnapshotReader::read_header(tmp.path()).unwrap();
        assert_eq!(header.is_compressed(), compress);
        assert_eq!(header.thought_count, 3);

        let read = SnapshotReader::read_from_file(tmp.path()).unwrap();
        assert_eq!(read.thought_index(), outline.thought_index());
        assert_eq!(read.context_index(), outline.context_index());
        assert_eq!(read.context_views(), outline.context_views());
        assert!(read.verify().is_ok());
    }
}
