// CSV column extraction tests
// Author: Gabriel Demetrios Lafis

use std::io::Write;

use tempfile::NamedTempFile;

use rust_streaming_stats::{
    data::{ColumnExtractor, DataError, ExtractSummary},
    processing::Emitter,
};

const RETAIL: &str = "\
Invoice,Quantity,Price,Customer ID
536365,6,2.55,17850
536366,0,1.85,17850
C536379,-1,27.50,14527
536367,,3.39,13047
536368,4,abc,13047
536369,2,0.5,
";

fn extract(extractor: &ColumnExtractor, csv: &str) -> (String, ExtractSummary) {
    let mut output = Vec::new();
    let summary = extractor.extract(csv.as_bytes(), &mut output).unwrap();
    (String::from_utf8(output).unwrap(), summary)
}

#[test]
fn test_extract_single_column() {
    let (values, summary) = extract(&ColumnExtractor::new("Price"), RETAIL);

    assert_eq!(values, "2.55\n1.85\n27.5\n3.39\n0.5\n");
    assert_eq!(summary, ExtractSummary { rows: 6, written: 5, skipped: 1 });
}

#[test]
fn test_extract_positive_only() {
    let extractor = ColumnExtractor::new("Quantity").positive_only(true);
    let (values, summary) = extract(&extractor, RETAIL);

    assert_eq!(values, "6\n4\n2\n");
    assert_eq!(summary.skipped, 3);
}

#[test]
fn test_extract_product_of_columns() {
    let extractor = ColumnExtractor::new("Quantity").times("Price").positive_only(true);
    let (values, summary) = extract(&extractor, RETAIL);

    let amounts: Vec<f64> = values.lines().map(|v| v.parse().unwrap()).collect();
    assert_eq!(amounts.len(), 2);
    assert!((amounts[0] - 15.3).abs() < 1e-9);
    assert_eq!(amounts[1], 1.0);
    assert_eq!(summary.written, 2);
}

#[test]
fn test_extract_missing_column() {
    let mut output = Vec::new();
    let err = ColumnExtractor::new("Total Spend")
        .extract(RETAIL.as_bytes(), &mut output)
        .unwrap_err();

    assert!(matches!(err, DataError::ColumnNotFound(ref name) if name == "Total Spend"));
}

#[test]
fn test_extract_file_feeds_emitter() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "Customer ID;Total Spend\n101;1120.20\n102;780.50\n103;\n").unwrap();

    let mut values = Vec::new();
    let summary = ColumnExtractor::new("Total Spend")
        .with_delimiter(b';')
        .extract_file(file.path(), &mut values)
        .unwrap();
    assert_eq!(summary.written, 2);

    let mut records = Vec::new();
    let emitted = Emitter::default().run(values.as_slice(), &mut records).unwrap();
    assert_eq!(emitted.emitted, 2);
    assert_eq!(emitted.skipped, 0);
    assert_eq!(String::from_utf8(records).unwrap(), "values\t1120.2\nvalues\t780.5\n");
}

#[test]
fn test_extract_drops_cancelled_and_incomplete_rows() {
    let extractor = ColumnExtractor::new("Price")
        .exclude_prefix("Invoice", "C")
        .require("Customer ID");
    let (values, summary) = extract(&extractor, RETAIL);

    assert_eq!(values, "2.55\n1.85\n3.39\n");
    assert_eq!(summary, ExtractSummary { rows: 6, written: 3, skipped: 3 });
}

#[test]
fn test_extract_filter_on_missing_column() {
    let mut output = Vec::new();
    let err = ColumnExtractor::new("Price")
        .exclude_prefix("StockCode", "POST")
        .extract(RETAIL.as_bytes(), &mut output)
        .unwrap_err();

    assert!(matches!(err, DataError::ColumnNotFound(ref name) if name == "StockCode"));
    assert!(output.is_empty());
}

#[test]
fn test_extract_tab_delimited() {
    let extractor = ColumnExtractor::new("b").with_delimiter(b'\t');
    let (values, summary) = extract(&extractor, "a\tb\n1\t2.5\n3\t-4\n");

    assert_eq!(values, "2.5\n-4\n");
    assert_eq!(summary.written, 2);
}
