use bertsum::data::{split_sentences, tokenize_words, Document, Split, SummarizationDataset};
use std::fs;
use std::path::Path;

fn write_split(directory: &Path, split: &str, sources: &[&str], targets: &[&str]) -> anyhow::Result<()> {
    fs::write(directory.join(format!("{}.source", split)), sources.join("\n"))?;
    fs::write(directory.join(format!("{}.target", split)), targets.join("\n"))?;
    Ok(())
}

#[test]
fn tokenizer_keeps_abbreviations() -> anyhow::Result<()> {
    assert_eq!(
        tokenize_words("Dr. Jones visited the U.S. on Monday."),
        vec!["Dr.", "Jones", "visited", "the", "U.S.", "on", "Monday", "."]
    );
    assert_eq!(tokenize_words("Wait... what?"), vec!["Wait", "...", "what", "?"]);
    Ok(())
}

#[test]
fn splitter_handles_quotes_and_markers() -> anyhow::Result<()> {
    let sentences = split_sentences("He said \"It is over.\" Then he left.");
    assert_eq!(sentences.len(), 2);
    assert_eq!(sentences[0].last().map(String::as_str), Some("\""));

    let sentences = split_sentences("first highlight .<q>second highlight .<q>third one");
    assert_eq!(
        sentences,
        vec![
            vec!["first", "highlight", "."],
            vec!["second", "highlight", "."],
            vec!["third", "one"],
        ]
    );
    assert!(split_sentences("   ").is_empty());
    Ok(())
}

#[test]
fn document_target_text_uses_markers() -> anyhow::Result<()> {
    let document = Document::from_text("The cat sat. It was sunny.", "The cat sat. It slept.");
    assert_eq!(document.target_text(), "The cat sat .<q>It slept .");
    assert_eq!(document.source_sentences(), vec!["The cat sat .", "It was sunny ."]);
    Ok(())
}

#[test]
fn loads_line_aligned_split() -> anyhow::Result<()> {
    let directory = tempfile::tempdir()?;
    write_split(
        directory.path(),
        "val",
        &["The cat sat. It was sunny.", "", "The dog ran home."],
        &["The cat sat.", "Nothing.", "A dog ran."],
    )?;
    let dataset = SummarizationDataset::from_dir(directory.path())?;

    let documents = dataset.load(Split::Validation, None)?;
    assert_eq!(documents.len(), 2);
    assert_eq!(documents[0].source.len(), 2);
    assert_eq!(documents[1].target_text(), "A dog ran .");

    let documents = dataset.load(Split::Validation, Some(1))?;
    assert_eq!(documents.len(), 1);
    assert_eq!(Split::Validation.to_string(), "val");
    Ok(())
}

#[test]
fn descends_into_single_nested_directory() -> anyhow::Result<()> {
    let directory = tempfile::tempdir()?;
    let nested = directory.path().join("cnn_dm");
    fs::create_dir(&nested)?;
    write_split(&nested, "test", &["The cat sat."], &["The cat sat."])?;

    let dataset = SummarizationDataset::from_dir(directory.path())?;
    assert_eq!(dataset.root(), nested.as_path());
    assert_eq!(dataset.load(Split::Test, None)?.len(), 1);
    Ok(())
}

#[test]
fn mismatched_files_are_an_error() -> anyhow::Result<()> {
    let directory = tempfile::tempdir()?;
    write_split(
        directory.path(),
        "train",
        &["The cat sat.", "The dog ran."],
        &["The cat sat."],
    )?;
    let dataset = SummarizationDataset::from_dir(directory.path())?;
    assert!(dataset.load(Split::Train, None).is_err());
    Ok(())
}

#[test]
fn missing_directory_or_split_is_an_error() -> anyhow::Result<()> {
    assert!(SummarizationDataset::from_dir("/path/that/does/not/exist").is_err());
    let directory = tempfile::tempdir()?;
    write_split(directory.path(), "train", &["a"], &["b"])?;
    let dataset = SummarizationDataset::from_dir(directory.path())?;
    assert!(dataset.documents(Split::Test).is_err());
    Ok(())
}
