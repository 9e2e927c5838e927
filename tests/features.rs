mod common;

use bertsum::data::Document;
use bertsum::features::{
    read_examples, write_examples, Batch, Batcher, ConversionConfig, FeatureConverter,
    SubwordTokenizer,
};
use bertsum::oracle::GreedySelector;
use tch::{Device, Kind};

#[test]
fn tokenizer_ids_round_trip() -> anyhow::Result<()> {
    let (_directory, tokenizer) = common::tokenizer()?;
    let tokens = SubwordTokenizer::tokenize(&tokenizer, "The cats sat on the mat.");
    assert_eq!(tokens, vec!["the", "cat", "##s", "sat", "on", "the", "mat", "."]);

    let ids = tokenizer.tokens_to_ids(&tokens);
    assert_eq!(ids, vec![5, 6, 16, 7, 8, 5, 9, 17]);
    assert_eq!(tokenizer.ids_to_tokens(&ids), tokens);

    assert_eq!(tokenizer.cls_id(), 2);
    assert_eq!(tokenizer.sep_id(), 3);
    assert_eq!(tokenizer.pad_id(), 0);
    assert_eq!(tokenizer.token_to_id("zebra"), 1);
    Ok(())
}

#[test]
fn converts_document_to_bertsum_format() -> anyhow::Result<()> {
    let (_directory, tokenizer) = common::tokenizer()?;
    let converter = FeatureConverter::new(tokenizer, ConversionConfig::default())?;
    let document = common::document();

    let example = converter
        .convert(&document, &[true, false, false])?
        .expect("document should be kept");

    assert_eq!(example.len(), 24);
    assert_eq!(example.cls_positions, vec![0, 9, 17]);
    assert_eq!(example.labels, vec![true, false, false]);
    assert_eq!(&example.token_ids[..9], &[2, 5, 6, 7, 8, 5, 9, 17, 3]);
    assert_eq!(example.token_ids[23], 3);

    let expected_segments: Vec<i64> = std::iter::repeat(0)
        .take(9)
        .chain(std::iter::repeat(1).take(8))
        .chain(std::iter::repeat(0).take(7))
        .collect();
    assert_eq!(example.segment_ids, expected_segments);
    assert_eq!(example.source_sentences[2], "The dog ran home .");
    assert_eq!(example.target, "The cat sat on the mat .");
    Ok(())
}

#[test]
fn truncates_to_max_length() -> anyhow::Result<()> {
    let (_directory, tokenizer) = common::tokenizer()?;
    let config = ConversionConfig {
        max_length: 12,
        min_sentences: 1,
        ..Default::default()
    };
    let converter = FeatureConverter::new(tokenizer, config)?;

    let example = converter
        .convert(&common::document(), &[false, true, true])?
        .expect("document should be kept");

    assert_eq!(example.len(), 12);
    assert_eq!(example.segment_ids.len(), 12);
    assert_eq!(example.token_ids[11], 3);
    assert_eq!(example.cls_positions, vec![0, 9]);
    assert_eq!(example.labels, vec![false, true]);
    assert_eq!(example.source_sentences.len(), 2);
    Ok(())
}

#[test]
fn length_limits_hold() -> anyhow::Result<()> {
    let (_directory, tokenizer) = common::tokenizer()?;
    let config = ConversionConfig {
        max_length: 16,
        max_sentences: 2,
        min_sentences: 1,
        ..Default::default()
    };
    let converter = FeatureConverter::new(tokenizer, config)?;
    let example = converter
        .convert_with_oracle(&common::document(), &GreedySelector::default())?
        .expect("document should be kept");
    assert!(example.len() <= 16);
    assert!(example.labels.len() <= 2);
    assert_eq!(example.labels.len(), example.cls_positions.len());
    assert_eq!(example.labels[0], true);
    Ok(())
}

#[test]
fn drops_short_and_empty_documents() -> anyhow::Result<()> {
    let (_directory, tokenizer) = common::tokenizer()?;
    let converter = FeatureConverter::new(tokenizer, ConversionConfig::default())?;

    let empty = Document::from_text("", "The cat sat.");
    assert!(converter.convert(&empty, &[])?.is_none());

    let short = Document::from_text("The cat sat on the mat. It was a big day.", "The cat sat.");
    assert!(converter.convert(&short, &[true, false])?.is_none());
    assert!(converter.convert_for_inference(&short).is_some());
    Ok(())
}

#[test]
fn drops_sentences_below_min_tokens_with_their_labels() -> anyhow::Result<()> {
    let (_directory, tokenizer) = common::tokenizer()?;
    let config = ConversionConfig {
        min_sentences: 1,
        ..Default::default()
    };
    let converter = FeatureConverter::new(tokenizer, config)?;
    let document = Document::from_text(
        "The cat sat on the mat. It ran. The dog ran home.",
        "It ran.",
    );
    let example = converter
        .convert(&document, &[false, true, false])?
        .expect("document should be kept");
    assert_eq!(example.num_sentences(), 2);
    assert_eq!(example.labels, vec![false, false]);
    Ok(())
}

#[test]
fn rejects_label_length_mismatch() -> anyhow::Result<()> {
    let (_directory, tokenizer) = common::tokenizer()?;
    let converter = FeatureConverter::new(tokenizer, ConversionConfig::default())?;
    assert!(converter.convert(&common::document(), &[true]).is_err());
    Ok(())
}

#[test]
fn examples_json_lines() -> anyhow::Result<()> {
    let (directory, tokenizer) = common::tokenizer()?;
    let converter = FeatureConverter::new(tokenizer, ConversionConfig::default())?;
    let example = converter
        .convert(&common::document(), &[true, false, true])?
        .expect("document should be kept");

    let path = directory.path().join("examples.jsonl");
    write_examples(&path, &[example.clone(), example.clone()])?;
    let examples = read_examples(&path)?;
    assert_eq!(examples, vec![example.clone(), example]);
    Ok(())
}

#[test]
fn batch_padding_and_masks() -> anyhow::Result<()> {
    let (_directory, tokenizer) = common::tokenizer()?;
    let pad_id = tokenizer.pad_id();
    let config = ConversionConfig {
        min_sentences: 1,
        ..Default::default()
    };
    let converter = FeatureConverter::new(tokenizer, config)?;
    let long = converter
        .convert(&common::document(), &[true, false, true])?
        .expect("document should be kept");
    let short = converter
        .convert(
            &Document::from_text("The dog ran home today.", "The dog ran home."),
            &[true],
        )?
        .expect("document should be kept");

    let batch = Batch::from_examples(&[&long, &short], pad_id, Device::Cpu)?;
    assert_eq!(batch.size(), 2);
    assert_eq!(batch.token_ids.size(), vec![2, 24]);
    assert_eq!(batch.cls_positions.size(), vec![2, 3]);
    assert_eq!(batch.num_sentences, vec![3, 1]);
    assert_eq!(
        batch.attention_mask.sum(Kind::Int64).int64_value(&[]),
        (long.len() + short.len()) as i64
    );
    assert_eq!(batch.sentence_mask.sum(Kind::Float).double_value(&[]), 4.0);
    assert_eq!(batch.labels.double_value(&[0, 2]), 1.0);
    assert_eq!(batch.labels.double_value(&[1, 1]), 0.0);

    assert!(Batch::from_examples(&[], pad_id, Device::Cpu).is_err());
    Ok(())
}

#[test]
fn batcher_covers_all_examples() -> anyhow::Result<()> {
    let (_directory, tokenizer) = common::tokenizer()?;
    let converter = FeatureConverter::new(tokenizer, ConversionConfig::default())?;
    let example = converter
        .convert(&common::document(), &[true, false, true])?
        .expect("document should be kept");
    let examples = vec![example; 5];

    let mut batcher = Batcher::new(&examples, 2, Some(42));
    assert_eq!(batcher.num_batches(), 3);
    let batches = batcher.epoch();
    assert_eq!(batches.iter().map(Vec::len).collect::<Vec<_>>(), vec![2, 2, 1]);
    Ok(())
}
