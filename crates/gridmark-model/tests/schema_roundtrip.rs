use gridmark_model::{
    CellKey, ColumnDataType, ParsedTable, SortDirection, SortState, TableRecord,
};
use pretty_assertions::assert_eq;

fn record() -> TableRecord {
    let parsed = ParsedTable {
        start_line: 10,
        end_line: 14,
        headers: vec!["Name".into(), "Age".into(), "City".into()],
        rows: vec![
            vec!["John".into(), "25".into(), "NYC".into()],
            vec!["Jane".into(), "30".into(), "LA".into()],
        ],
        raw_lines: Some(vec![
            "| Name | Age | City |".into(),
            "| --- | --- | --- |".into(),
            "| John | 25 | NYC |".into(),
            "| Jane | 30 | LA |".into(),
        ]),
        separator_line: Some("| --- | --- | --- |".into()),
    };
    TableRecord::from_parsed(parsed, "notes.md", 1).unwrap()
}

#[test]
fn json_round_trip_preserves_equality() {
    let mut original = record();
    original.mark_edited(CellKey::Cell { row: 0, col: 1 });
    original.mark_edited(CellKey::Header { col: 2 });
    original.sort_state = Some(SortState {
        column: 1,
        direction: SortDirection::Descending,
        data_type: ColumnDataType::Number,
    });

    let json = serde_json::to_string(&original).unwrap();
    let restored: TableRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, original);
}

#[test]
fn untouched_fields_are_omitted_from_json() {
    let mut record = record();
    record.raw_lines = None;
    record.separator_line = None;
    let json = serde_json::to_value(&record).unwrap();
    let object = json.as_object().unwrap();
    assert!(!object.contains_key("edited_cells"));
    assert!(!object.contains_key("raw_lines"));
    assert!(!object.contains_key("separator_line"));
    assert!(!object.contains_key("sort_state"));
}

#[test]
fn cell_key_serializes_with_snake_case_tags() {
    let json = serde_json::to_value(CellKey::Header { col: 2 }).unwrap();
    assert_eq!(json, serde_json::json!({ "header": { "col": 2 } }));
    let json = serde_json::to_value(CellKey::Cell { row: 1, col: 0 }).unwrap();
    assert_eq!(json, serde_json::json!({ "cell": { "row": 1, "col": 0 } }));
}

#[test]
fn clone_is_fully_independent() {
    let original = record();
    let mut copy = original.clone();
    copy.rows[0][0] = "Johnny".into();
    copy.mark_edited(CellKey::Cell { row: 0, col: 0 });
    assert_eq!(original.rows[0][0], "John");
    assert!(!original.has_edits());
}
