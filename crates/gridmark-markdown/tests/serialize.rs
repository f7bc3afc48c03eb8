use gridmark_model::{CellKey, ParsedTable, TableRecord};
use gridmark_markdown::serialize_table;
use pretty_assertions::assert_eq;

const RAW: [&str; 5] = [
    "| Name | Age | City |",
    "| --- | --- | --- |",
    "| John | 25 | NYC |",
    "| Jane | 30 | LA |",
    "| Bob  | 35 | Chicago |",
];

fn record() -> TableRecord {
    let parsed = ParsedTable {
        start_line: 0,
        end_line: 4,
        headers: vec!["Name".into(), "Age".into(), "City".into()],
        rows: vec![
            vec!["John".into(), "25".into(), "NYC".into()],
            vec!["Jane".into(), "30".into(), "LA".into()],
            vec!["Bob".into(), "35".into(), "Chicago".into()],
        ],
        raw_lines: Some(RAW.iter().map(|l| l.to_string()).collect()),
        separator_line: Some(RAW[1].to_string()),
    };
    TableRecord::from_parsed(parsed, "notes.md", 0).unwrap()
}

#[test]
fn untouched_table_round_trips_byte_for_byte() {
    assert_eq!(serialize_table(&record()), RAW.join("\n"));
}

#[test]
fn edited_cell_rewrites_only_its_span() {
    let mut record = record();
    record.rows[0][0] = "Johnny".into();
    record.mark_edited(CellKey::Cell { row: 0, col: 0 });

    let output = serialize_table(&record);
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[2], "| Johnny | 25 | NYC |");
    // Everything else is byte-identical, including uneven spacing.
    assert_eq!(lines[0], RAW[0]);
    assert_eq!(lines[1], RAW[1]);
    assert_eq!(lines[3], RAW[3]);
    assert_eq!(lines[4], RAW[4]);
}

#[test]
fn edited_header_rewrites_the_header_line() {
    let mut record = record();
    record.headers[2] = "Town".into();
    record.mark_edited(CellKey::Header { col: 2 });

    let lines: Vec<String> = serialize_table(&record).lines().map(String::from).collect();
    assert_eq!(lines[0], "| Name | Age | Town |");
    assert_eq!(lines[2], RAW[2]);
}

#[test]
fn new_values_are_escaped_but_old_spans_are_not_touched() {
    let mut record = record();
    record.rows[1][2] = "LA | CA".into();
    record.mark_edited(CellKey::Cell { row: 1, col: 2 });

    let lines: Vec<String> = serialize_table(&record).lines().map(String::from).collect();
    assert_eq!(lines[3], "| Jane | 30 | LA \\| CA |");
}

#[test]
fn already_escaped_pipes_in_new_values_stay_single() {
    let mut record = record();
    record.rows[1][2] = "LA \\| CA".into();
    record.mark_edited(CellKey::Cell { row: 1, col: 2 });

    let lines: Vec<String> = serialize_table(&record).lines().map(String::from).collect();
    assert_eq!(lines[3], "| Jane | 30 | LA \\| CA |");
}

#[test]
fn escaped_pipes_in_raw_lines_do_not_shift_spans() {
    let raw = vec![
        "| Name | Quote |".to_string(),
        "| --- | --- |".to_string(),
        "| John | says \\| hi | <!-- keep -->".to_string(),
    ];
    let parsed = ParsedTable {
        start_line: 0,
        end_line: 2,
        headers: vec!["Name".into(), "Quote".into()],
        rows: vec![vec!["John".into(), "says \\| hi".into()]],
        raw_lines: Some(raw.clone()),
        separator_line: Some(raw[1].clone()),
    };
    let mut record = TableRecord::from_parsed(parsed, "notes.md", 0).unwrap();
    record.rows[0][0] = "Jon".into();
    record.mark_edited(CellKey::Cell { row: 0, col: 0 });

    let lines: Vec<String> = serialize_table(&record).lines().map(String::from).collect();
    assert_eq!(lines[2], "| Jon | says \\| hi | <!-- keep -->");
}

#[test]
fn line_without_enough_pipes_falls_back_to_naive_split() {
    let raw = vec![
        "Name | Age".to_string(),
        "John | 25".to_string(),
    ];
    let parsed = ParsedTable {
        start_line: 0,
        end_line: 1,
        headers: vec!["Name".into(), "Age".into()],
        rows: vec![vec!["John".into(), "25".into()]],
        raw_lines: Some(raw),
        separator_line: None,
    };
    let mut record = TableRecord::from_parsed(parsed, "notes.md", 0).unwrap();
    record.rows[0][1] = "26".into();
    record.mark_edited(CellKey::Cell { row: 0, col: 1 });

    let lines: Vec<String> = serialize_table(&record).lines().map(String::from).collect();
    assert_eq!(lines[0], "Name | Age");
    assert_eq!(lines[1], "John | 26 ");
}

#[test]
fn structural_edit_regenerates_with_padding() {
    let mut record = record();
    record.rows.remove(1);
    record.discard_raw_lines();
    record.touch();

    assert_eq!(
        serialize_table(&record),
        [
            "| Name | Age | City    |",
            "| ---- | --- | ------- |",
            "| John | 25  | NYC     |",
            "| Bob  | 35  | Chicago |",
        ]
        .join("\n")
    );
}

#[test]
fn regeneration_reuses_parseable_alignment_tokens() {
    let parsed = ParsedTable {
        start_line: 0,
        end_line: 3,
        headers: vec!["Item".into(), "Price".into()],
        rows: vec![vec!["Tea".into(), "4".into()]],
        raw_lines: None,
        separator_line: Some("| :-- | --: |".into()),
    };
    let record = TableRecord::from_parsed(parsed, "notes.md", 0).unwrap();

    assert_eq!(
        serialize_table(&record),
        ["| Item | Price |", "| :--- | ----: |", "| Tea  | 4     |"].join("\n")
    );
}

#[test]
fn regeneration_drops_stale_alignment_tokens() {
    let parsed = ParsedTable {
        start_line: 0,
        end_line: 3,
        headers: vec!["A".into(), "B".into(), "C".into()],
        rows: vec![],
        raw_lines: None,
        // Two tokens for a three-column table: no longer a valid ruler.
        separator_line: Some("| :-- | --: |".into()),
    };
    let record = TableRecord::from_parsed(parsed, "notes.md", 0).unwrap();

    assert_eq!(
        serialize_table(&record),
        ["| A   | B   | C   |", "| --- | --- | --- |"].join("\n")
    );
}

#[test]
fn regenerated_cells_escape_pipes() {
    let parsed = ParsedTable {
        start_line: 0,
        end_line: 2,
        headers: vec!["Key".into()],
        rows: vec![vec!["a|b".into()]],
        raw_lines: None,
        separator_line: None,
    };
    let record = TableRecord::from_parsed(parsed, "notes.md", 0).unwrap();

    assert_eq!(
        serialize_table(&record),
        ["| Key  |", "| ---- |", "| a\\|b |"].join("\n")
    );
}
