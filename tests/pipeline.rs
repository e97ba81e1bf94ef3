use gridline::config::Settings;
use gridline::db::{open_database, SqliteRecordStore};
use gridline::pipeline::{DirectoryArtifactSource, ExtractionJob, ExtractionPipeline};
use serde_json::{json, Value};

const JOB: &str = r#"{
    "entity": {"id": "e1", "name": "brand_leaders"},
    "template": {
        "id": "t1",
        "name": "Brand leaders",
        "fields": [
            {"name": "brand", "displayName": "Brand"},
            {"name": "type", "displayName": "Type"},
            {"name": "ytd_rank", "displayName": "YTD Rank"}
        ]
    },
    "source": {"id": "s1", "name": "reports"},
    "artifact_type": "textract"
}"#;

/// Textract-style blocks for one table; `span` adds RowSpan/ColumnSpan.
fn table_blocks(table_id: &str, rows: &[&[&str]], span: bool) -> Vec<Value> {
    let mut blocks = Vec::new();
    let mut cell_ids = Vec::new();
    for (r, row) in rows.iter().enumerate() {
        for (c, text) in row.iter().enumerate() {
            let cell_id = format!("{table_id}-{r}-{c}");
            let word_ids: Vec<String> = text
                .split_whitespace()
                .enumerate()
                .map(|(w, word)| {
                    let id = format!("{cell_id}-w{w}");
                    blocks.push(json!({"BlockType": "WORD", "Id": id, "Text": word}));
                    id
                })
                .collect();
            let mut cell = json!({
                "BlockType": "CELL",
                "Id": cell_id,
                "RowIndex": r + 1,
                "ColumnIndex": c + 1,
                "RowSpan": 1,
                "ColumnSpan": 1
            });
            if !word_ids.is_empty() {
                cell["Relationships"] = json!([{"Type": "CHILD", "Ids": word_ids}]);
            }
            blocks.push(cell);
            cell_ids.push(cell_id);
        }
    }
    let mut table = json!({
        "BlockType": "TABLE",
        "Id": table_id,
        "Relationships": [{"Type": "CHILD", "Ids": cell_ids}]
    });
    if span {
        table["RowSpan"] = json!(rows.len());
        table["ColumnSpan"] = json!(rows[0].len());
    }
    blocks.push(table);
    blocks
}

fn analysis_pages() -> Value {
    let page_one = table_blocks(
        "t1",
        &[
            &["'", "'", "'"],
            &["Brand", "Type", "YTD Rank"],
            &["Tito's", "Vodka", "'1,234"],
            &["Fireball", "Cordials", "2"],
        ],
        true,
    );
    let page_two = table_blocks(
        "t2",
        &[
            &["Brand", "Type", "YTD Rank"],
            &["Jameson", "Whiskey", "12.5%"],
            &["Smirnoff", "", ""],
        ],
        false,
    );
    json!([{"Blocks": page_one}, {"Blocks": page_two}])
}

#[test]
fn textract_directory_is_extracted_into_sqlite() {
    let sources = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(sources.path().join("reports/empty")).unwrap();
    std::fs::write(
        sources.path().join("reports/brand_leaders.json"),
        serde_json::to_vec(&analysis_pages()).unwrap(),
    )
    .unwrap();
    std::fs::write(sources.path().join("reports/broken.json"), b"{oops").unwrap();

    let out = tempfile::tempdir().unwrap();
    let settings = Settings {
        database_path: out.path().join("records.db"),
        batch_size: 2,
        ..Settings::default()
    };

    let job = ExtractionJob::from_json_str(JOB).unwrap();
    let source = DirectoryArtifactSource::new(sources.path()).with_prefix("reports/");
    let pipeline =
        ExtractionPipeline::with_settings(job, settings.clone(), Box::new(source)).unwrap();
    let stats = pipeline.run().unwrap();

    assert_eq!(stats.artifacts_processed, 2);
    assert_eq!(stats.artifacts_failed, 1);
    assert_eq!(stats.tables_found, 2);
    assert_eq!(stats.rows_merged, 6);
    assert_eq!(stats.header_row_index, Some(1));
    assert_eq!(stats.columns_mapped, 3);
    assert_eq!(stats.records_extracted, 4);
    assert_eq!(stats.records_accepted, 4);
    assert_eq!(stats.records_loaded, 4);
    assert_eq!(stats.records_failed, 0);

    let store = SqliteRecordStore::new(open_database(&settings.database_path).unwrap());
    let rows = store.fetch_all("brand_leaders").unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0]["brand"], "Tito's");
    assert_eq!(rows[0]["ytd_rank"], json!(1234));
    assert_eq!(rows[1]["ytd_rank"], json!(2));
    assert_eq!(rows[2]["brand"], "Jameson");
    assert_eq!(rows[2]["ytd_rank"], json!(12.5));
    assert_eq!(rows[3]["brand"], "Smirnoff");
    assert!(rows[3]["type"].is_null());
    assert!(rows[3]["ytd_rank"].is_null());
}

#[test]
fn invalid_job_fails_before_touching_the_source() {
    let job = JOB.replace(r#""name": "brand_leaders""#, r#""name": """#);
    assert!(ExtractionJob::from_json_str(&job).is_err());
}
