use gamenight_service::catalog::{RankIndex, RankRecord};
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

const HEADER: &str = "id,name,yearpublished,rank,bayesaverage,average,usersrated";

fn rank_file(rows: &[String]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", HEADER).unwrap();
    for row in rows {
        writeln!(file, "{}", row).unwrap();
    }
    file.flush().unwrap();
    file
}

fn sample() -> NamedTempFile {
    rank_file(&[
        "13,Catan,1995,520,7.0,7.1,120000".to_string(),
        "174430,Gloomhaven,2017,3,8.3,8.6,60000".to_string(),
        "".to_string(),
        "27710,Catan Dice Game,2007,3000,6.0,6.2,9000".to_string(),
        "822, Carcassonne ,2000,200,7.3,7.4,130000".to_string(),
    ])
}

#[test]
fn first_existing_candidate_wins() {
    let file = sample();
    let index = RankIndex::load(&[
        PathBuf::from("/does/not/exist.csv"),
        file.path().to_path_buf(),
    ]);

    assert_eq!(index.len(), 4);
    assert_eq!(index.source(), Some(file.path()));
}

#[test]
fn values_are_kept_as_text_and_trimmed() {
    let file = sample();
    let index = RankIndex::load(&[file.path().to_path_buf()]);

    let record = index.get_by_id("822").unwrap();
    assert_eq!(record.name(), Some("Carcassonne"));
    assert_eq!(record.get("rank"), Some("200"));
    assert_eq!(record.get("average"), Some("7.4"));
}

#[test]
fn search_is_case_insensitive_and_stable() {
    let file = sample();
    let index = RankIndex::load(&[file.path().to_path_buf()]);

    let expected: Vec<_> = index.search("Catan").into_iter().filter_map(RankRecord::id).collect();
    assert_eq!(expected, vec!["13", "27710"]);

    for query in ["catan", "CATAN", "CaTaN"] {
        let ids: Vec<_> = index.search(query).into_iter().filter_map(RankRecord::id).collect();
        assert_eq!(ids, expected);
    }
    assert!(index.search("").is_empty());
}

#[test]
fn search_returns_first_fifty_matches_in_load_order() {
    let rows: Vec<String> = (1..=80)
        .map(|i| format!("{},Game A{},2000,{},6.0,6.0,100", i, i, i))
        .collect();
    let file = rank_file(&rows);
    let index = RankIndex::load(&[file.path().to_path_buf()]);

    let results = index.search("a");

    assert_eq!(results.len(), 50);
    let ids: Vec<String> = results
        .iter()
        .filter_map(|r| r.id().map(str::to_string))
        .collect();
    let expected: Vec<String> = (1..=50).map(|i| i.to_string()).collect();
    assert_eq!(ids, expected);
}

#[test]
fn short_rows_are_skipped_not_fatal() {
    let file = rank_file(&[
        "13,Catan,1995,520,7.0,7.1,120000".to_string(),
        "broken-row".to_string(),
        "822,Carcassonne,2000,200,7.3,7.4,130000".to_string(),
    ]);
    let index = RankIndex::load(&[file.path().to_path_buf()]);

    assert_eq!(index.len(), 2);
    assert!(index.get_by_id("822").is_some());
}

#[test]
fn no_candidate_leaves_index_empty() {
    let index = RankIndex::load(&[
        PathBuf::from("/does/not/exist.csv"),
        PathBuf::from("also/missing.csv"),
    ]);

    assert!(index.is_empty());
    assert!(index.search("catan").is_empty());
    assert!(index.get_by_id("13").is_none());
}
