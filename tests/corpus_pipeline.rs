use std::fs;

use spam_corpus::pipeline::observer::StageTimingObserver;
use spam_corpus::pipeline::runner::DefaultPipeline;
use spam_corpus::types::StopwordSource;
use spam_corpus::{
    extract_features, filter, load_directory, normalize_line, CorpusSession, Label,
    PipelineConfig, PipelineSpec, Stage,
};
use tempfile::TempDir;

fn write_corpus(files: &[(&str, &[u8])]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, bytes) in files {
        fs::write(dir.path().join(name), bytes).unwrap();
    }
    dir
}

#[test]
fn normalize_then_filter() {
    let tokens = normalize_line("Don't worry, be happy!\n").unwrap();
    assert_eq!(tokens, vec!["don't", "worry", "be", "happy"]);

    let stopwords = ["be".to_string()].into_iter().collect();
    assert_eq!(filter(&tokens, &stopwords, 0.0), vec!["don't", "worry", "happy"]);
}

#[test]
fn invalid_utf8_file_still_loads() {
    let dir = write_corpus(&[("a.txt", b"caf\xff\xfeoffer\n"), ("b.txt", b"plain text\n")]);

    let docs = load_directory(dir.path()).unwrap();

    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].text, "cafoffer\n");
}

#[test]
fn end_to_end_session_from_spec() {
    let spam = write_corpus(&[
        ("001.txt", b"Subject: WIN a FREE prize\n\nClaim your prizes now now now!\n"),
        ("002.txt", b"Cheap offers, cheap offers.\n"),
    ]);
    let ham = write_corpus(&[("001.txt", b"Meeting notes attached\nSee the notes.\n")]);

    let spec = PipelineSpec::from_json_str(
        r#"{
            "v": 1,
            "filter": { "uncommon_amount": 0 },
            "stopwords": { "language": null, "extra": ["the", "a", "your", "see"] },
            "lemmatizer": "morphy",
            "shuffle": { "enabled": false }
        }"#,
    )
    .unwrap();
    let mut session = CorpusSession::from_spec(spec).unwrap();

    let examples = session.load_and_process(spam.path(), ham.path()).unwrap();
    assert_eq!(examples.len(), 3);
    assert_eq!(examples[1].tokens, vec!["cheap", "offer", "cheap", "offer"]);
    assert_eq!(examples[2].label, Label::Ham);
    assert_eq!(examples[2].tokens, vec!["meeting", "note", "attached", "note"]);

    let features = session.extract_features().to_vec();
    assert_eq!(features.len(), 3);
    assert_eq!(features[0].count("prize"), 2);
    assert_eq!(features[0].count("now"), 3);
    assert_eq!(features[1].count("offer"), 2);
    assert_eq!(features[2].label.as_u8(), 0);
    assert_eq!(features, extract_features(session.examples()));
}

#[test]
fn rare_words_removed_per_document() {
    let cfg = PipelineConfig::default()
        .with_stopwords(StopwordSource::none())
        .with_uncommon_amount(1.0);
    let pipeline = DefaultPipeline::from_config(&cfg);
    let mut observer = StageTimingObserver::new();

    let docs = vec![
        spam_corpus::RawDocument::from_text("cash cash cash bonus\n"),
        spam_corpus::RawDocument::from_text("lunch lunch menu\n"),
    ];
    let out = pipeline.run(&docs, &cfg, &mut observer);

    assert_eq!(out[0], vec!["cash", "cash", "cash"]);
    assert_eq!(out[1], vec!["lunch", "lunch"]);
    assert_eq!(observer.reports().len(), 3);
}

#[test]
fn missing_ham_directory_reports_load_stage() {
    let spam = write_corpus(&[("1.txt", b"hello\n")]);
    let missing = spam.path().join("does-not-exist");

    let err = CorpusSession::new(PipelineConfig::default())
        .load_and_process(spam.path(), &missing)
        .unwrap_err();

    assert_eq!(err.stage(), Stage::Load);
    assert_eq!(err.path(), Some(missing.as_path()));
}
