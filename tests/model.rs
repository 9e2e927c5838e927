mod common;

use bertsum::features::{Batch, SubwordTokenizer};
use bertsum::model::{
    load_pretrained_encoder, sinusoidal_positions, BertSumConfig, EncoderType,
    ExtractiveSummarizer,
};
use bertsum::{BertSumError, Config};
use tch::{nn, no_grad, Device, Kind};

fn head_config(encoder: EncoderType) -> BertSumConfig {
    BertSumConfig {
        encoder,
        inter_heads: 2,
        ff_size: 32,
        rnn_size: 16,
        hidden_size: 8,
        baseline_layers: 1,
        baseline_heads: 2,
        ..Default::default()
    }
}

#[test]
fn every_head_scores_real_sentences_only() -> anyhow::Result<()> {
    let (_directory, tokenizer) = common::tokenizer()?;
    let pad_id = tokenizer.pad_id();
    let examples = common::encoded_examples(tokenizer)?;
    let batch = Batch::from_examples(&[&examples[0], &examples[1]], pad_id, Device::Cpu)?;
    let encoder_config = common::tiny_bert_config()?;

    for &encoder in [
        EncoderType::Classifier,
        EncoderType::Transformer,
        EncoderType::Rnn,
        EncoderType::Baseline,
    ]
    .iter()
    {
        let vs = nn::VarStore::new(Device::Cpu);
        let model = ExtractiveSummarizer::new(&vs.root(), &head_config(encoder), &encoder_config)?;
        assert_eq!(model.encoder_type(), encoder);

        let scores = no_grad(|| model.forward_t(&batch, false))?;
        assert_eq!(scores.size(), vec![2, 3]);
        for &(row, column) in [(0, 0), (0, 1), (0, 2), (1, 0)].iter() {
            let score = scores.double_value(&[row, column]);
            assert!(score > 0.0 && score < 1.0, "{:?}: score {}", encoder, score);
        }
        assert_eq!(scores.double_value(&[1, 1]), 0.0);
        assert_eq!(scores.double_value(&[1, 2]), 0.0);
    }
    Ok(())
}

#[test]
fn loss_is_masked_binary_cross_entropy() -> anyhow::Result<()> {
    let (_directory, tokenizer) = common::tokenizer()?;
    let pad_id = tokenizer.pad_id();
    let examples = common::encoded_examples(tokenizer)?;
    let batch = Batch::from_examples(&[&examples[0], &examples[1]], pad_id, Device::Cpu)?;

    let vs = nn::VarStore::new(Device::Cpu);
    let model = ExtractiveSummarizer::new(
        &vs.root(),
        &head_config(EncoderType::Classifier),
        &common::tiny_bert_config()?,
    )?;
    let output = no_grad(|| model.forward_with_loss(&batch, false))?;

    let scores = &output.scores;
    let expected: f64 = [(0, 0, 1.0), (0, 1, 0.0), (0, 2, 1.0), (1, 0, 1.0)]
        .iter()
        .map(|&(row, column, label)| {
            let p = scores.double_value(&[row, column]);
            -(label * p.ln() + (1.0 - label) * (1.0 - p).ln())
        })
        .sum();
    assert!((output.loss.double_value(&[]) - expected).abs() < 1e-4);
    Ok(())
}

#[test]
fn baseline_uses_its_own_encoder_size() -> anyhow::Result<()> {
    let config = head_config(EncoderType::Baseline);
    let encoder_config = config.baseline_encoder_config(&common::tiny_bert_config()?)?;
    assert_eq!(encoder_config.hidden_size, 8);
    assert_eq!(encoder_config.num_hidden_layers, 1);
    assert_eq!(encoder_config.vocab_size, common::VOCAB.len() as i64);
    Ok(())
}

#[test]
fn invalid_head_dimensions_are_rejected() -> anyhow::Result<()> {
    let encoder_config = common::tiny_bert_config()?;
    let vs = nn::VarStore::new(Device::Cpu);

    let rnn = BertSumConfig {
        rnn_size: 32,
        ..head_config(EncoderType::Rnn)
    };
    assert!(ExtractiveSummarizer::new(&vs.root(), &rnn, &encoder_config).is_err());

    let transformer = BertSumConfig {
        inter_heads: 3,
        ..head_config(EncoderType::Transformer)
    };
    assert!(ExtractiveSummarizer::new(&vs.root(), &transformer, &encoder_config).is_err());

    let no_heads = BertSumConfig {
        inter_heads: 0,
        ..head_config(EncoderType::Transformer)
    };
    assert!(matches!(
        ExtractiveSummarizer::new(&vs.root(), &no_heads, &encoder_config),
        Err(BertSumError::InvalidConfigurationError(_))
    ));

    let no_baseline_heads = BertSumConfig {
        baseline_heads: 0,
        ..head_config(EncoderType::Baseline)
    };
    assert!(matches!(
        ExtractiveSummarizer::new(&vs.root(), &no_baseline_heads, &encoder_config),
        Err(BertSumError::InvalidConfigurationError(_))
    ));

    for config in [
        BertSumConfig {
            inter_layers: -1,
            ..head_config(EncoderType::Transformer)
        },
        BertSumConfig {
            max_sentences: 0,
            ..head_config(EncoderType::Transformer)
        },
        BertSumConfig {
            rnn_size: -16,
            ..head_config(EncoderType::Rnn)
        },
        BertSumConfig {
            dropout: 1.5,
            ..head_config(EncoderType::Classifier)
        },
    ]
    .iter()
    {
        assert!(matches!(
            config.validate(16),
            Err(BertSumError::InvalidConfigurationError(_))
        ));
    }
    Ok(())
}

#[test]
fn zero_heads_from_config_file_are_rejected() -> anyhow::Result<()> {
    let directory = tempfile::tempdir()?;
    let path = directory.path().join("config.json");
    let mut config = serde_json::to_value(head_config(EncoderType::Transformer))?;
    config["inter_heads"] = serde_json::json!(0);
    std::fs::write(&path, config.to_string())?;

    let config = BertSumConfig::from_file(&path)?;
    let vs = nn::VarStore::new(Device::Cpu);
    let result = ExtractiveSummarizer::new(&vs.root(), &config, &common::tiny_bert_config()?);
    assert!(matches!(
        result,
        Err(BertSumError::InvalidConfigurationError(_))
    ));
    Ok(())
}

#[test]
fn position_encoding_table() -> anyhow::Result<()> {
    let table = sinusoidal_positions(4, 6);
    assert_eq!(table.size(), vec![4, 6]);
    assert_eq!(table.double_value(&[0, 0]), 0.0);
    assert_eq!(table.double_value(&[0, 1]), 1.0);
    assert!((table.double_value(&[1, 0]) - 1f64.sin()).abs() < 1e-6);
    assert!((table.double_value(&[1, 1]) - 1f64.cos()).abs() < 1e-6);
    Ok(())
}

#[test]
fn pretrained_encoder_weights_are_restored() -> anyhow::Result<()> {
    let directory = tempfile::tempdir()?;
    let weights_path = directory.path().join("encoder.ot");
    let encoder_config = common::tiny_bert_config()?;
    let config = head_config(EncoderType::Classifier);

    let source = nn::VarStore::new(Device::Cpu);
    let _ = ExtractiveSummarizer::new(&source.root(), &config, &encoder_config)?;
    source.save(&weights_path)?;

    let mut target = nn::VarStore::new(Device::Cpu);
    let _ = ExtractiveSummarizer::new(&target.root(), &config, &encoder_config)?;
    let missing = load_pretrained_encoder(&mut target, &weights_path.into())?;
    assert!(missing.is_empty());

    let name = "bert.embeddings.word_embeddings.weight";
    let source_variables = source.variables();
    let target_variables = target.variables();
    let difference = (&source_variables[name] - &target_variables[name])
        .abs()
        .sum(Kind::Float)
        .double_value(&[]);
    assert_eq!(difference, 0.0);
    Ok(())
}
