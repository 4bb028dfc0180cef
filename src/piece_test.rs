#![allow(clippy::float_cmp)]

use super::*;

fn make_piece(kind: PieceKind, x: f64, y: f64, seq: u64) -> Piece {
    Piece::new(Uuid::new_v4(), kind, LocalPoint::new(x, y), 44.0, seq)
}

// =============================================================
// PieceKind
// =============================================================

#[test]
fn kind_keys_round_trip_through_from_str() {
    for kind in PieceKind::ALL {
        assert_eq!(kind.key().parse::<PieceKind>(), Ok(kind));
        assert_eq!(kind.to_string(), kind.key());
    }
}

#[test]
fn kind_from_str_rejects_unknown() {
    let err = "crossRed".parse::<PieceKind>().unwrap_err();
    assert!(err.contains("crossRed"));
}

#[test]
fn kind_serde_uses_asset_keys() {
    let json = serde_json::to_string(&PieceKind::TurnGreen).unwrap();
    assert_eq!(json, "\"turnGreen\"");
    let kind: PieceKind = serde_json::from_str("\"straightBrown\"").unwrap();
    assert_eq!(kind, PieceKind::StraightBrown);
}

#[test]
fn kind_asset_paths_are_distinct() {
    let mut paths: Vec<&str> = PieceKind::ALL.iter().map(|k| k.asset_path()).collect();
    paths.sort_unstable();
    paths.dedup();
    assert_eq!(paths.len(), PieceKind::ALL.len());
}

#[test]
fn kind_abbreviations() {
    assert_eq!(PieceKind::StraightBrown.abbreviation(), "S.B");
    assert_eq!(PieceKind::StraightGreen.abbreviation(), "S.G");
    assert_eq!(PieceKind::TurnBrown.abbreviation(), "T.B");
    assert_eq!(PieceKind::TurnGreen.abbreviation(), "T.G");
}

// =============================================================
// Piece
// =============================================================

#[test]
fn new_piece_is_at_rest_and_unrotated() {
    let piece = make_piece(PieceKind::TurnBrown, 10.0, 20.0, 3);
    assert_eq!(piece.rotation, 0.0);
    assert_eq!(piece.visual, PieceVisual::rest());
    assert_eq!(piece.visual.alpha, 1.0);
    assert_eq!(piece.visual.cursor, Cursor::Grab);
    assert_eq!(piece.half_extent_x, 22.0);
    assert_eq!(piece.half_extent_y, 22.0);
    assert_eq!(piece.seq, 3);
}

#[test]
fn piece_bounds_centered_on_position() {
    let piece = make_piece(PieceKind::StraightGreen, 100.0, 50.0, 0);
    let b = piece.bounds();
    assert_eq!(b.left, 78.0);
    assert_eq!(b.right, 122.0);
    assert_eq!(b.top, 28.0);
    assert_eq!(b.bottom, 72.0);
}

#[test]
fn rotate_step_wraps_at_full_turn() {
    let mut piece = make_piece(PieceKind::TurnGreen, 0.0, 0.0, 0);
    assert_eq!(piece.rotate_step(), 90.0);
    assert_eq!(piece.rotate_step(), 180.0);
    assert_eq!(piece.rotate_step(), 270.0);
    assert_eq!(piece.rotate_step(), 0.0);
}

#[test]
fn quarter_turn_swaps_extents() {
    let mut piece = make_piece(PieceKind::StraightBrown, 0.0, 0.0, 0);
    piece.half_extent_x = 10.0;
    piece.half_extent_y = 4.0;
    assert_eq!(piece.bounds().width(), 20.0);
    piece.rotate_step();
    assert!(piece.is_quarter_turned());
    assert_eq!(piece.bounds().width(), 8.0);
    assert_eq!(piece.bounds().height(), 20.0);
    piece.rotate_step();
    assert!(!piece.is_quarter_turned());
    assert_eq!(piece.bounds().width(), 20.0);
}

#[test]
fn dragging_visual() {
    let v = PieceVisual::dragging();
    assert_eq!(v.alpha, 0.7);
    assert_eq!(v.cursor, Cursor::Grabbing);
}

// =============================================================
// PieceStore
// =============================================================

#[test]
fn store_insert_get_remove() {
    let mut store = PieceStore::new();
    let piece = make_piece(PieceKind::TurnBrown, 1.0, 2.0, 0);
    let id = piece.id;
    store.insert(piece);
    assert_eq!(store.len(), 1);
    assert_eq!(store.get(&id).unwrap().kind, PieceKind::TurnBrown);
    let removed = store.remove(&id).unwrap();
    assert_eq!(removed.id, id);
    assert!(store.is_empty());
    assert!(store.remove(&id).is_none());
}

#[test]
fn store_get_mut_updates_in_place() {
    let mut store = PieceStore::new();
    let piece = make_piece(PieceKind::TurnBrown, 1.0, 2.0, 0);
    let id = piece.id;
    store.insert(piece);
    store.get_mut(&id).unwrap().position = LocalPoint::new(9.0, 9.0);
    assert_eq!(store.get(&id).unwrap().position, LocalPoint::new(9.0, 9.0));
}

#[test]
fn store_sorted_by_spawn_sequence() {
    let mut store = PieceStore::new();
    let mut ids = Vec::new();
    for _ in 0..5 {
        let seq = store.next_seq();
        let piece = make_piece(PieceKind::StraightBrown, 0.0, 0.0, seq);
        ids.push(piece.id);
        store.insert(piece);
    }
    let sorted: Vec<PieceId> = store.sorted_pieces().iter().map(|p| p.id).collect();
    assert_eq!(sorted, ids);
}

#[test]
fn store_clear_returns_ids_in_draw_order() {
    let mut store = PieceStore::new();
    let a = make_piece(PieceKind::StraightBrown, 0.0, 0.0, store.next_seq());
    let b = make_piece(PieceKind::TurnGreen, 0.0, 0.0, store.next_seq());
    let (ida, idb) = (a.id, b.id);
    store.insert(b);
    store.insert(a);
    assert_eq!(store.clear(), vec![ida, idb]);
    assert!(store.is_empty());
}

#[test]
fn every_kind_is_square() {
    for kind in PieceKind::ALL {
        assert_eq!(kind.size_ratio(), (1.0, 1.0));
        let piece = Piece::new(uuid::Uuid::new_v4(), kind, LocalPoint::default(), 44.0, 0);
        assert_eq!(piece.half_extent_x, piece.half_extent_y);
    }
}
