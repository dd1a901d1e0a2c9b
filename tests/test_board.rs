//! Board files: shared lines, per-file moves and file lookup.

use pio_nodelock::board::*;
use pio_nodelock::error::NodelockError;
use pio_nodelock::node_id::{BoardKind, MoveValue};

#[test]
fn shared_line_applies_to_every_file() {
    let spec = BoardSpec::from_json(r#"{ "all": "r:0:c:b16" }"#).unwrap();
    let board = spec.resolve().unwrap();
    assert_eq!(board.board_kind, BoardKind::Flop);
    assert_eq!(board.node_for("KsQd8h.cfr").unwrap().to_string(), "r:0:c:b16");
    assert_eq!(board.node_for("anything").unwrap().to_string(), "r:0:c:b16");
}

#[test]
fn shared_template_with_placeholders_fails_fast() {
    let spec = BoardSpec::from_json(r#"{ "all": "r:0:c:b:turn" }"#).unwrap();
    assert!(matches!(spec.resolve(), Err(NodelockError::MissingFileSpecificInfo(_))));
}

#[test]
fn missing_shared_line() {
    let result = BoardSpec::from_json(r#"{ "KsQd8h.cfr": [40] }"#);
    assert!(matches!(result, Err(NodelockError::MissingSharedLine)));
}

#[test]
fn rejects_malformed_documents() {
    assert!(matches!(BoardSpec::from_json("[1, 2]"), Err(NodelockError::InvalidDocument(_))));
    assert!(matches!(BoardSpec::from_json(r#"{ "all": 5 }"#), Err(NodelockError::InvalidDocument(_))));
    assert!(matches!(
        BoardSpec::from_json(r#"{ "all": "r:0:b", "a.cfr": 40 }"#),
        Err(NodelockError::InvalidDocument(_))
    ));
    assert!(matches!(
        BoardSpec::from_json(r#"{ "all": "r:0:b", "a.cfr": [true] }"#),
        Err(NodelockError::InvalidDocument(_))
    ));
    assert!(matches!(BoardSpec::from_json("{ not json"), Err(NodelockError::JsonError(_))));
}

#[test]
fn per_file_moves_keep_file_order() {
    let spec = BoardSpec::from_json(
        r#"{ "all": "r:0:c:b:turn", "KsQd8h.cfr": [40, "9h"], "Ah9c4d.cfr": [55, "2c"] }"#,
    )
    .unwrap();
    match &spec {
        BoardSpec::PerFile { template, moves } => {
            assert_eq!(template.to_string(), "r:0:c:b:turn");
            assert_eq!(moves[0].0, "KsQd8h.cfr");
            assert_eq!(moves[0].1, vec![MoveValue::Number(40), MoveValue::Text("9h".to_string())]);
            assert_eq!(moves[1].0, "Ah9c4d.cfr");
        }
        other => panic!("expected per-file moves, got {:?}", other),
    }

    let board = spec.resolve().unwrap();
    assert_eq!(board.board_kind, BoardKind::Turn);
    assert_eq!(board.node_for("KsQd8h.cfr").unwrap().to_string(), "r:0:c:b40:9h");
    assert_eq!(board.node_for("Ah9c4d.cfr").unwrap().to_string(), "r:0:c:b55:2c");
}

#[test]
fn per_file_errors_do_not_abort_siblings() {
    let spec = BoardSpec::from_json(
        r#"{ "all": "r:0:c:b:turn", "good.cfr": [40, "9h"], "short.cfr": [40], "word.cfr": ["big", "9h"], "half.cfr": [40.5, "9h"] }"#,
    )
    .unwrap();
    let board = spec.resolve().unwrap();

    assert_eq!(board.node_for("good.cfr").unwrap().to_string(), "r:0:c:b40:9h");
    for bad in ["short.cfr", "word.cfr", "half.cfr"] {
        assert!(board.node_for(bad).is_err(), "{} should fail", bad);
    }
    assert!(matches!(board.node_for("short.cfr"), Err(NodelockError::ExhaustedMoves(_))));
    assert!(matches!(board.node_for("word.cfr"), Err(NodelockError::NonNumericBet(_))));

    match &board.nodes {
        NodeBook::PerFile(nodes) => {
            let short = nodes.iter().find(|(f, _)| f == "short.cfr").unwrap();
            assert!(matches!(short.1, Err(NodelockError::ExhaustedMoves(_))));
            let word = nodes.iter().find(|(f, _)| f == "word.cfr").unwrap();
            assert!(matches!(word.1, Err(NodelockError::NonNumericBet(_))));
        }
        NodeBook::Shared(_) => panic!("expected per-file nodes"),
    }
}

#[test]
fn lookup_falls_back_to_name_without_extension() {
    let spec = BoardSpec::from_json(r#"{ "all": "r:0:b", "KsQd8h": [30] }"#).unwrap();
    let board = spec.resolve().unwrap();
    assert_eq!(board.node_for("KsQd8h.cfr").unwrap().to_string(), "r:0:b30");
    assert_eq!(board.node_for("KsQd8h").unwrap().to_string(), "r:0:b30");
}

#[test]
fn file_missing_from_board_spec() {
    let spec = BoardSpec::from_json(r#"{ "all": "r:0:b", "KsQd8h.cfr": [30] }"#).unwrap();
    let board = spec.resolve().unwrap();
    assert!(matches!(board.node_for("Ah9c4d.cfr"), Err(NodelockError::FileNotInBoardSpec(f)) if f == "Ah9c4d.cfr"));
}

#[test]
fn remove_extension_keeps_dotfiles() {
    assert_eq!(remove_extension("KsQd8h.cfr"), "KsQd8h");
    assert_eq!(remove_extension("a.b.cfr"), "a.b");
    assert_eq!(remove_extension("noext"), "noext");
    assert_eq!(remove_extension(".hidden"), ".hidden");
}
