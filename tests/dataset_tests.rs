//! Integration tests for loading the sample datasets

use cohort_analytics::core::dataset::{load_dataset, ColumnMapping, LoadOptions, PeriodPolicy};
use cohort_analytics::core::filter::{filter, Selection};
use cohort_analytics::core::models::{Column, Period, Status, Vocabulary, VocabularyChoice};
use cohort_analytics::core::summary::DatasetSummary;
use cohort_analytics::CohortError;
use std::fs;
use tempfile::TempDir;

const COMPLETION: &str = "samples/cohort_completion.csv";
const DROPOUT: &str = "samples/cohort_dropout.csv";

#[test]
fn test_load_completion_sample() {
    let table = load_dataset(COMPLETION, &LoadOptions::default()).expect("load completion sample");

    assert_eq!(table.len(), 12);
    assert_eq!(table.vocabulary(), Vocabulary::Completion);
    assert_eq!(table.unrecognized_count(), 1, "'Transferred' is outside the vocabulary");
    assert!(table.has_column(Column::EntryYear));
    assert!(table.has_column(Column::EntryTerm));
    assert!(table.has_column(Column::ExitYear));

    let first = &table.records()[0];
    assert_eq!(first.student_id, "1001");
    assert_eq!(first.entry, Some(Period::new(2013, 1)));
    assert_eq!(first.exit_year, Some(2017));
    assert_eq!(first.status, Some(Status::Graduated));
    assert_eq!(first.time_to_exit, Some(9.0));

    let active = &table.records()[3];
    assert_eq!(active.exit_year, None);
    assert_eq!(active.time_to_exit, None);
}

#[test]
fn test_load_legacy_headers() {
    let table = load_dataset(DROPOUT, &LoadOptions::default()).expect("load dropout sample");

    assert_eq!(table.len(), 6);
    assert_eq!(table.vocabulary(), Vocabulary::Dropout);
    assert_eq!(table.unrecognized_count(), 0);
    assert!(!table.has_column(Column::EntryPeriod));
    assert!(!table.has_column(Column::ExitYear));

    let programs: Vec<String> = table.programs().into_iter().collect();
    assert_eq!(programs, vec!["Engenharia".to_string(), "Letras".to_string()]);
    assert_eq!(table.records()[0].status, Some(Status::Dropped));
    assert_eq!(table.records()[1].status_label, "Ativo");
}

#[test]
fn test_forced_vocabulary_excludes_other_statuses() {
    let options = LoadOptions {
        vocabulary: VocabularyChoice::Fixed(Vocabulary::Dropout),
        ..LoadOptions::default()
    };
    let table = load_dataset(COMPLETION, &options).expect("load");

    assert_eq!(table.vocabulary(), Vocabulary::Dropout);
    // Only the five Active rows survive under the dropout vocabulary
    assert_eq!(table.recognized().count(), 5);
}

#[test]
fn test_column_mapping_from_options() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("renamed.csv");
    fs::write(
        &path,
        "id_aluno,curso_nome,ingresso,situacao_final\n7,Quimica,2021/2,Ativo\n",
    )
    .expect("write csv");

    let options = LoadOptions {
        columns: ColumnMapping::default()
            .with(Column::StudentId, "id_aluno")
            .with(Column::Program, "curso_nome")
            .with(Column::EntryPeriod, "ingresso")
            .with(Column::Status, "situacao_final"),
        ..LoadOptions::default()
    };
    let table = load_dataset(&path, &options).expect("load renamed file");

    let record = &table.records()[0];
    assert_eq!(record.student_id, "7");
    assert_eq!(record.program, "Quimica");
    assert_eq!(record.entry, Some(Period::new(2021, 2)));
}

#[test]
fn test_malformed_period_strict_and_lenient() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("bad.csv");
    fs::write(
        &path,
        "student_id,program,entry_period,status\n1,P1,2020/1,Active\n2,P1,2020-2,Active\n",
    )
    .expect("write csv");

    match load_dataset(&path, &LoadOptions::default()) {
        Err(CohortError::MalformedPeriod { column, line, value }) => {
            assert_eq!(column, Column::EntryPeriod);
            assert_eq!(line, 3);
            assert_eq!(value, "2020-2");
        }
        other => panic!("expected MalformedPeriod, got {other:?}"),
    }

    let lenient = LoadOptions {
        period_policy: PeriodPolicy::Lenient,
        ..LoadOptions::default()
    };
    let table = load_dataset(&path, &lenient).expect("lenient load");
    assert_eq!(table.len(), 2);
    assert_eq!(table.records()[1].entry, None);
}

#[test]
fn test_missing_required_column_aborts_load() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("no_status.csv");
    fs::write(&path, "student_id,program,entry_period\n1,P1,2020/1\n").expect("write csv");

    let result = load_dataset(&path, &LoadOptions::default());
    assert!(matches!(result, Err(CohortError::MissingColumn(Column::Status))));
}

#[test]
fn test_missing_file_is_io_error() {
    let result = load_dataset("samples/does_not_exist.csv", &LoadOptions::default());
    assert!(matches!(result, Err(CohortError::Io(_))));
}

#[test]
fn test_filter_sample_by_all_categories() {
    let table = load_dataset(COMPLETION, &LoadOptions::default()).expect("load");

    let selection = Selection::all(&table)
        .with_programs(["Computer Science", "Physics"])
        .with_years([2015, 2020])
        .with_statuses([Status::Active, Status::Withdrawn]);
    let filtered = filter(&table, &selection).expect("filter");

    let ids: Vec<&str> = filtered
        .records()
        .iter()
        .map(|r| r.student_id.as_str())
        .collect();
    assert_eq!(ids, vec!["1003", "1005", "1011"]);

    // Filtering again with the same selection changes nothing
    let again = filter(&filtered, &selection).expect("filter");
    assert_eq!(again.records(), filtered.records());
}

#[test]
fn test_filter_with_defaults_drops_only_unrecognized_rows() {
    let table = load_dataset(COMPLETION, &LoadOptions::default()).expect("load");
    let filtered = filter(&table, &Selection::all(&table)).expect("filter");

    assert_eq!(filtered.len(), 11);
    assert!(filtered.records().iter().all(|r| r.status.is_some()));
}

#[test]
fn test_summary_of_sample() {
    let table = load_dataset(COMPLETION, &LoadOptions::default()).expect("load");
    let summary = DatasetSummary::from_table(&table);

    assert_eq!(summary.rows, 12);
    assert_eq!(summary.recognized, 11);
    assert_eq!(summary.unrecognized, 1);
    assert_eq!(summary.programs.len(), 3);
    assert_eq!(summary.first_year, Some(2013));
    assert_eq!(summary.last_year, Some(2020));
    assert_eq!(
        summary.to_string(),
        "12 rows (1 excluded), 3 programs, entry years 2013-2020, vocabulary 'completion'"
    );
}
