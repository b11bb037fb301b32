mod common;

use common::{TableBuilder, dbase3_memo, dbase4_memo, foxpro_memo, write};
use dbf_reader::{ColumnType, DbfError, Table, Value};
use tempfile::tempdir;
use time::{Date, Month};

fn date(year: i32, month: Month, day: u8) -> Date {
    Date::from_calendar_date(year, month, day).expect("valid date")
}

fn inventory_columns(builder: TableBuilder) -> TableBuilder {
    builder
        .column("ID", 'N', 6, 0)
        .column("NAME", 'C', 20, 0)
        .column("DESC", 'M', 10, 0)
        .column("PRICE", 'N', 8, 2)
        .column("QTY", 'N', 4, 0)
        .column("ACTIVE", 'L', 1, 0)
        .column("BORN", 'D', 8, 0)
        .column("CITY", 'C', 15, 0)
        .column("ZIP", 'C', 5, 0)
        .column("RATE", 'F', 10, 3)
        .column("NOTE2", 'C', 10, 0)
        .column("CODE", 'C', 3, 0)
        .column("SCORE", 'N', 5, 1)
        .column("FLAG", 'L', 1, 0)
        .column("COMMENT", 'C', 12, 0)
}

/// A version 83 table with 15 columns, 67 records (every tenth deleted) and
/// a dBase III memo per record.
fn inventory() -> (Vec<u8>, Vec<u8>) {
    let descriptions: Vec<String> = (0..67)
        .map(|i| format!("Description for item {}", i))
        .collect();
    let memo_refs: Vec<&[u8]> = descriptions.iter().map(|d| d.as_bytes()).collect();
    let (memo, blocks) = dbase3_memo(&memo_refs);

    let mut builder = inventory_columns(TableBuilder::new(0x83));
    for i in 0..67usize {
        let id = i.to_string();
        let name = format!("Item {}", i);
        let block = blocks[i].to_string();
        let price = format!("{}.25", i);
        let qty = (i * 3).to_string();
        let active = if i % 2 == 0 { "T" } else { "n" };
        let fields = [
            id.as_str(),
            name.as_str(),
            block.as_str(),
            price.as_str(),
            qty.as_str(),
            active,
            "19990101",
            "Springfield",
            "12345",
            "1.5",
            "",
            "ABC",
            "4.5",
            "?",
            "comment",
        ];
        builder = if i % 10 == 9 {
            builder.deleted(&fields)
        } else {
            builder.record(&fields)
        };
    }
    (builder.build(), memo)
}

#[test]
fn dbase3_table_with_memo_end_to_end() {
    let dir = tempdir().expect("tempdir");
    let (table_bytes, memo_bytes) = inventory();
    let path = write(dir.path(), "items.dbf", &table_bytes);
    write(dir.path(), "items.DBT", &memo_bytes);

    let table = Table::new(&path, None, None).expect("open table");
    assert_eq!(table.version().hex(), "83");
    assert_eq!(table.record_count(), 67);
    assert!(table.has_memo());
    assert_eq!(table.columns().len(), 15);
    assert_eq!(table.filename(), Some(path.as_path()));

    let record = table.record(5).expect("read").expect("not deleted");
    assert_eq!(record["DESC"], Value::Text("Description for item 5".to_string()));
    assert_eq!(record["ID"], Value::Integer(5));
    assert_eq!(record["NAME"], Value::Text("Item 5".to_string()));
    assert_eq!(record["PRICE"], Value::Float(5.25));
    assert_eq!(record["QTY"], Value::Integer(15));
    assert_eq!(record["ACTIVE"], Value::Boolean(false));
    assert_eq!(record["BORN"], Value::Date(date(1999, Month::January, 1)));
    assert_eq!(record["RATE"], Value::Float(1.5));
    assert_eq!(record["NOTE2"], Value::Text(String::new()));
    assert_eq!(record["SCORE"], Value::Float(4.5));
    assert_eq!(record["FLAG"], Value::Boolean(false));
    assert_eq!(record.len(), 15);
}

#[test]
fn deleted_records_are_absent_not_errors() {
    let (table_bytes, memo_bytes) = inventory();
    let table = Table::from_bytes(table_bytes, Some(memo_bytes), None).expect("open table");

    assert_eq!(table.record(9).expect("read"), None);
    assert_eq!(table.record(59).expect("read"), None);
    assert!(table.record(10).expect("read").is_some());

    let slots: Vec<_> = table.iter().map(|r| r.expect("record ok")).collect();
    assert_eq!(slots.len(), 67);
    assert_eq!(slots.iter().filter(|r| r.is_none()).count(), 6);

    let records = table.records().expect("records");
    assert_eq!(records.len(), 61);
    assert_eq!(records[9]["ID"], Value::Integer(10));
    assert_eq!(table.iter().len(), 67);
}

#[test]
fn memo_fields_are_nil_without_memo_file() {
    let (table_bytes, _) = inventory();
    let table = Table::from_bytes(table_bytes, None, None).expect("open table");
    assert!(!table.has_memo());
    let record = table.record(0).expect("read").expect("present");
    assert_eq!(record["DESC"], Value::Nil);
}

#[test]
fn memo_file_discovery_ignores_extension_case() {
    let dir = tempdir().expect("tempdir");
    let (table_bytes, memo_bytes) = inventory();
    let path = write(dir.path(), "Stock.DBF", &table_bytes);
    write(dir.path(), "Stock.dbt", &memo_bytes);
    write(dir.path(), "Other.dbt", &[0u8; 512]);

    let table = Table::new(&path, None, None).expect("open table");
    assert!(table.has_memo());
    let record = table.record(1).expect("read").expect("present");
    assert_eq!(record["DESC"].as_str(), Some("Description for item 1"));
}

#[test]
fn number_columns_follow_decimal_count() {
    let bytes = TableBuilder::new(0x03)
        .column("WHOLE", 'N', 5, 0)
        .column("FRACTION", 'N', 5, 1)
        .column("BLANK", 'N', 5, 0)
        .record(&["135", "13.5", ""])
        .build();
    let table = Table::from_bytes(bytes, None, None).expect("open");
    let record = table.record(0).expect("read").expect("present");

    assert_eq!(record["WHOLE"], Value::Integer(135));
    assert_eq!(record["FRACTION"], Value::Float(13.5));
    assert_eq!(record["BLANK"], Value::Nil);
}

#[test]
fn foxpro_table_dates_and_spanning_memos() {
    let long_memo: Vec<u8> = (0..150u8).map(|i| b'a' + i % 26).collect();
    let (memo, blocks) = foxpro_memo(64, &[b"short note", &long_memo, b"after"]);

    let pointer = |block: u32| format!("{:>10}", block).into_bytes();
    let bytes = TableBuilder::new(0xf5)
        .column("NAME", 'C', 10, 0)
        .column("BIRTH", 'D', 8, 0)
        .column("NOTES", 'M', 10, 0)
        .column("WEIGHT", 'B', 8, 0)
        .raw_record(
            false,
            vec![
                b"Lee       ".to_vec(),
                b"18700630".to_vec(),
                pointer(blocks[0]),
                72.5f64.to_le_bytes().to_vec(),
            ],
        )
        .raw_record(
            false,
            vec![
                b"Grant     ".to_vec(),
                b"        ".to_vec(),
                pointer(blocks[1]),
                0f64.to_le_bytes().to_vec(),
            ],
        )
        .raw_record(
            false,
            vec![
                b"Sherman   ".to_vec(),
                b"18200208".to_vec(),
                pointer(0),
                (-1.25f64).to_le_bytes().to_vec(),
            ],
        )
        .build();

    let dir = tempdir().expect("tempdir");
    let path = write(dir.path(), "generals.dbf", &bytes);
    write(dir.path(), "generals.FPT", &memo);

    let table = Table::new(&path, None, None).expect("open");
    assert!(table.version().is_foxpro());
    assert!(table.has_memo());

    let lee = table.record(0).expect("read").expect("present");
    assert_eq!(lee["BIRTH"], Value::Date(date(1870, Month::June, 30)));
    assert_eq!(lee["NOTES"], Value::Text("short note".to_string()));
    assert_eq!(lee["WEIGHT"], Value::Float(72.5));

    let grant = table.record(1).expect("read").expect("present");
    assert_eq!(grant["BIRTH"], Value::Nil);
    let notes = grant["NOTES"].as_str().expect("memo text");
    assert_eq!(notes.as_bytes(), long_memo.as_slice());

    let sherman = table.record(2).expect("read").expect("present");
    assert_eq!(sherman["NOTES"], Value::Nil);
    assert_eq!(sherman["WEIGHT"], Value::Float(-1.25));
}

#[test]
fn visual_foxpro_binary_fields() {
    let picture: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0xFF];
    let logo: &[u8] = &[0x42, 0x4D, 0x00, 0x1A, 0x00];
    let (memo, blocks) = foxpro_memo(64, &[b"vfp memo", picture, logo]);
    let mut stamp = 2_451_545i32.to_le_bytes().to_vec(); // 2000-01-01
    stamp.extend(((8 * 3600 + 5 * 60 + 9) * 1000i32).to_le_bytes());
    let pointer = |block: u32| block.to_le_bytes().to_vec();

    let bytes = TableBuilder::new(0x30)
        .column("ID", 'I', 4, 0)
        .column("PRICE", 'Y', 8, 4)
        .column("STAMP", 'T', 8, 0)
        .column("MEMO", 'M', 4, 0)
        .column("PIC", 'G', 4, 0)
        .column("LOGO", 'P', 4, 0)
        .raw_record(
            false,
            vec![
                (-42i32).to_le_bytes().to_vec(),
                199_990i64.to_le_bytes().to_vec(),
                stamp,
                pointer(blocks[0]),
                pointer(blocks[1]),
                pointer(blocks[2]),
            ],
        )
        .raw_record(
            false,
            vec![
                7i32.to_le_bytes().to_vec(),
                0i64.to_le_bytes().to_vec(),
                vec![0; 8],
                pointer(0),
                pointer(0),
                pointer(0),
            ],
        )
        .build();

    let table = Table::from_bytes(bytes, Some(memo), None).expect("open");
    let record = table.record(0).expect("read").expect("present");

    assert_eq!(record["ID"], Value::Integer(-42));
    assert_eq!(record["PRICE"], Value::Float(19.999));
    let stamp = record["STAMP"].as_datetime().expect("datetime");
    assert_eq!(stamp.date(), date(2000, Month::January, 1));
    assert_eq!((stamp.hour(), stamp.minute(), stamp.second()), (8, 5, 9));
    assert_eq!(record["MEMO"], Value::Text("vfp memo".to_string()));
    assert_eq!(record["PIC"], Value::Blob(picture.to_vec()));
    assert_eq!(record["LOGO"], Value::Blob(logo.to_vec()));
    assert_eq!(table.column("pic").map(|c| c.column_type), Some(ColumnType::General));
    assert_eq!(table.column("logo").map(|c| c.column_type), Some(ColumnType::Picture));

    let empty = table.record(1).expect("read").expect("present");
    assert_eq!(empty["STAMP"], Value::Nil);
    assert_eq!(empty["MEMO"], Value::Nil);
    assert_eq!(empty["PIC"], Value::Nil);
    assert_eq!(empty["LOGO"], Value::Nil);
}

#[test]
fn dbase4_memo_table() {
    let (memo, blocks) = dbase4_memo(&[b"first", b"second memo"]);
    let bytes = TableBuilder::new(0x8b)
        .column("TITLE", 'C', 8, 0)
        .column("BODY", 'M', 10, 0)
        .record(&["one", blocks[0].to_string().as_str()])
        .record(&["two", blocks[1].to_string().as_str()])
        .build();

    let table = Table::from_bytes(bytes, Some(memo), None).expect("open");
    let bodies: Vec<String> = table
        .records()
        .expect("records")
        .iter()
        .map(|r| r["BODY"].to_string())
        .collect();
    assert_eq!(bodies, vec!["first", "second memo"]);
}

#[test]
fn dbase7_descriptors_allow_long_names() {
    let bytes = TableBuilder::new(0x8c)
        .column("A_VERY_LONG_COLUMN_NAME", 'C', 6, 0)
        .column("AMOUNT", 'N', 7, 2)
        .record(&["abc", "12.50"])
        .build();

    let table = Table::from_bytes(bytes, None, None).expect("open");
    assert_eq!(table.column_names(), vec!["A_VERY_LONG_COLUMN_NAME", "AMOUNT"]);
    assert_eq!(table.columns()[1].decimal, 2);
    let record = table.record(0).expect("read").expect("present");
    assert_eq!(record["A_VERY_LONG_COLUMN_NAME"], Value::Text("abc".to_string()));
    assert_eq!(record["AMOUNT"], Value::Float(12.5));
}

#[test]
fn foxbase_layout() {
    let bytes = TableBuilder::new(0x02)
        .column("NAME", 'C', 8, 0)
        .column("AGE", 'N', 3, 0)
        .record(&["Ada", "36"])
        .deleted(&["Bob", "40"])
        .record(&["Cy", "7"])
        .build();

    let table = Table::from_bytes(bytes, None, None).expect("open");
    assert_eq!(table.header.header_length, 521);
    assert_eq!(table.header.encoding_key, None);
    assert_eq!(table.record_count(), 3);
    assert_eq!(table.columns()[1].decimal, 0);

    let records = table.records().expect("records");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["NAME"], Value::Text("Ada".to_string()));
    assert_eq!(records[1]["AGE"], Value::Integer(7));
}

#[test]
fn code_page_marker_and_override() {
    let build = || {
        TableBuilder::new(0x03)
            .code_page(0x03)
            .column("NAME", 'C', 6, 0)
            .raw_record(false, vec![b"Ren\xe9  ".to_vec()])
            .build()
    };

    let table = Table::from_bytes(build(), None, None).expect("open");
    assert_eq!(table.encoding().name(), "windows-1252");
    let record = table.record(0).expect("read").expect("present");
    assert_eq!(record["NAME"], Value::Text("René".to_string()));

    let table = Table::from_bytes(build(), None, Some("cp1251")).expect("open");
    let record = table.record(0).expect("read").expect("present");
    assert_eq!(record["NAME"], Value::Text("Renй".to_string()));

    let err = Table::from_bytes(build(), None, Some("klingon")).unwrap_err();
    assert!(matches!(err, DbfError::UnknownEncoding(_)));
}

#[test]
fn dos_code_pages_decode_through_oem_tables() {
    let bytes = TableBuilder::new(0x03)
        .code_page(0x02)
        .column("NAME", 'C', 6, 0)
        .raw_record(false, vec![b"Ren\x82  ".to_vec()])
        .build();
    let table = Table::from_bytes(bytes, None, None).expect("open");
    assert_eq!(table.encoding().name(), "cp850");
    let record = table.record(0).expect("read").expect("present");
    assert_eq!(record["NAME"], Value::Text("René".to_string()));

    let bytes = TableBuilder::new(0x83)
        .code_page(0x01)
        .column("CITY", 'C', 8, 0)
        .raw_record(false, vec![b"M\x81nchen ".to_vec()])
        .build();
    let table = Table::from_bytes(bytes, None, None).expect("open");
    assert_eq!(table.encoding().name(), "cp437");
    let record = table.record(0).expect("read").expect("present");
    assert_eq!(record["CITY"], Value::Text("München".to_string()));
}

#[test]
fn dbase3_memo_pointer_past_end_is_nil() {
    let (memo, _) = dbase3_memo(&[b"only memo"]);
    let bytes = TableBuilder::new(0x83)
        .column("NAME", 'C', 4, 0)
        .column("DESC", 'M', 10, 0)
        .record(&["a", "999"])
        .build();
    let table = Table::from_bytes(bytes, Some(memo), None).expect("open");
    let record = table.record(0).expect("read").expect("present");
    assert_eq!(record["DESC"], Value::Nil);
}

#[test]
fn record_lookup_by_alternate_names() {
    let bytes = TableBuilder::new(0x03)
        .column("OrderDate", 'D', 8, 0)
        .column("QTY", 'N', 3, 0)
        .record(&["20240229", "3"])
        .build();
    let table = Table::from_bytes(bytes, None, None).expect("open");
    assert_eq!(table.columns()[0].underscored_name(), "order_date");

    let record = table.record(0).expect("read").expect("present");
    let leap_day = Value::Date(date(2024, Month::February, 29));
    assert_eq!(record.get("OrderDate"), Some(&leap_day));
    assert_eq!(record.get("orderdate"), Some(&leap_day));
    assert_eq!(record.get("order_date"), Some(&leap_day));
    assert_eq!(record.get_index(1), Some(&Value::Integer(3)));
    assert_eq!(record.get("missing"), None);
    assert_eq!(record.names().collect::<Vec<_>>(), vec!["OrderDate", "QTY"]);
}

#[test]
fn records_serialize_as_maps() {
    let bytes = TableBuilder::new(0x03)
        .column("ID", 'N', 3, 0)
        .column("NAME", 'C', 5, 0)
        .column("BORN", 'D', 8, 0)
        .column("OK", 'L', 1, 0)
        .column("GONE", 'D', 8, 0)
        .record(&["1", "Ann", "19990131", "Y", ""])
        .build();
    let table = Table::from_bytes(bytes, None, None).expect("open");
    let record = table.record(0).expect("read").expect("present");

    let json = serde_json::to_value(&record).expect("serialize");
    assert_eq!(
        json,
        serde_json::json!({
            "ID": 1,
            "NAME": "Ann",
            "BORN": "1999-01-31",
            "OK": true,
            "GONE": null,
        })
    );
}

#[test]
fn record_length_mismatch_fails_open() {
    let bytes = TableBuilder::new(0x03)
        .column("NAME", 'C', 10, 0)
        .record_length(20)
        .build();
    let err = Table::from_bytes(bytes, None, None).unwrap_err();
    assert!(err.is_structural());
    assert!(matches!(
        err,
        DbfError::RecordLengthMismatch { declared: 20, computed: 11 }
    ));
}

#[test]
fn invalid_columns_fail_open() {
    let zero_length = TableBuilder::new(0x03).column("BAD", 'C', 0, 0).build();
    assert!(matches!(
        Table::from_bytes(zero_length, None, None),
        Err(DbfError::InvalidColumn { index: 0, .. })
    ));

    let unnamed = TableBuilder::new(0x03)
        .column("OK", 'C', 2, 0)
        .column("\x01\x02", 'C', 2, 0)
        .build();
    assert!(matches!(
        Table::from_bytes(unnamed, None, None),
        Err(DbfError::InvalidColumn { index: 1, .. })
    ));
}

#[test]
fn truncated_header_fails_open() {
    let err = Table::from_bytes(vec![0x03; 10], None, None).unwrap_err();
    assert!(matches!(err, DbfError::TruncatedHeader { expected: 32, found: 10 }));
}

#[test]
fn missing_files_are_not_found() {
    let dir = tempdir().expect("tempdir");
    let err = Table::new(dir.path().join("absent.dbf"), None, None).unwrap_err();
    assert!(err.is_not_found());
    assert!(!err.is_structural());

    let (table_bytes, _) = inventory();
    let path = write(dir.path(), "items.dbf", &table_bytes);
    let missing_memo = dir.path().join("elsewhere.dbt");
    let err = Table::new(&path, Some(missing_memo.as_path()), None).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn out_of_range_and_empty_tables() {
    let (table_bytes, _) = inventory();
    let table = Table::from_bytes(table_bytes, None, None).expect("open");
    assert!(matches!(
        table.record(67),
        Err(DbfError::RecordOutOfRange { index: 67, count: 67 })
    ));

    let empty = Table::from_bytes(TableBuilder::new(0x03).build(), None, None).expect("open");
    assert!(empty.columns().is_empty());
    assert!(matches!(empty.record(0), Err(DbfError::NoColumns)));
    assert_eq!(empty.iter().count(), 0);
}

#[test]
fn closed_table_refuses_reads() {
    let (table_bytes, memo_bytes) = inventory();
    let table = Table::from_bytes(table_bytes, Some(memo_bytes), None).expect("open");
    assert!(table.record(0).is_ok());

    table.close().expect("close");
    assert!(table.is_closed());
    assert!(matches!(table.record(0), Err(DbfError::Closed)));
    assert!(table.records().is_err());
    table.close().expect("closing twice is harmless");
}
