use anyhow::{anyhow, Context, Result};
use bertsum::common::workdir::WorkingDirectory;
use bertsum::data::{DatasetResources, Split, SummarizationDataset};
use bertsum::evaluation::{rouge_scores, write_results, SENTENCE_SEPARATOR};
use bertsum::features::{
    load_bert_tokenizer, read_examples, write_examples, ConversionConfig, FeatureConverter,
    SubwordTokenizer,
};
use bertsum::model::{load_pretrained_encoder, BertSumConfig, EncoderType, ExtractiveSummarizer};
use bertsum::oracle::{OracleConfig, OracleLabeler, OraclePolicy};
use bertsum::pipelines::selection::SummaryOrder;
use bertsum::pipelines::summarization::{ExtractiveSummarizationModel, SummarizationConfig};
use bertsum::resources::{
    BertConfigResources, BertModelResources, BertVocabResources, RemoteResource, Resource,
};
use bertsum::training::{Trainer, TrainingConfig};
use bertsum::Config;
use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_bert::bert::BertConfig;
use std::fs;
use std::path::PathBuf;
use tch::{nn, Device};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "bertsum",
    version,
    about = "Extractive summarization with fine-tuned BERT encoders"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Label a corpus split with oracle summaries and write encoded examples as JSON lines
    Prepare(PrepareArgs),
    /// Fine-tune a summarizer on prepared examples
    Train(TrainArgs),
    /// Summarize prepared examples with a checkpoint and report ROUGE
    Test(TestArgs),
    /// Summarize the articles of a text file, one article per line
    Summarize(SummarizeArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SplitArg {
    Train,
    Validation,
    Test,
}

impl From<SplitArg> for Split {
    fn from(split: SplitArg) -> Self {
        match split {
            SplitArg::Train => Split::Train,
            SplitArg::Validation => Split::Validation,
            SplitArg::Test => Split::Test,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OracleArg {
    Greedy,
    Combination,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OrderArg {
    Source,
    Score,
}

fn parse_device(value: &str) -> Result<Device> {
    match value {
        "cpu" => Ok(Device::Cpu),
        "cuda" => Ok(Device::cuda_if_available()),
        other => other
            .strip_prefix("cuda:")
            .and_then(|index| index.parse::<usize>().ok())
            .map(Device::Cuda)
            .ok_or_else(|| anyhow!("invalid device {}, expected cpu, cuda or cuda:<index>", other)),
    }
}

fn resource_or(path: &Option<PathBuf>, default: (&str, &str)) -> Resource {
    match path {
        Some(path) => path.clone().into(),
        None => Resource::Remote(RemoteResource::from_pretrained(default)),
    }
}

#[derive(Args, Debug)]
struct PrepareArgs {
    /// Directory with `<split>.source` and `<split>.target` files, CNN / Daily Mail is downloaded when absent
    #[arg(long)]
    data_dir: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = SplitArg::Train)]
    split: SplitArg,
    /// WordPiece vocabulary, bert-base-uncased when absent
    #[arg(long)]
    vocab: Option<PathBuf>,
    /// Output JSON lines file
    #[arg(long)]
    output: PathBuf,
    #[arg(long, value_enum, default_value_t = OracleArg::Greedy)]
    oracle: OracleArg,
    /// JSON oracle configuration, overrides `--oracle`
    #[arg(long)]
    oracle_config: Option<PathBuf>,
    /// JSON conversion configuration
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    max_documents: Option<usize>,
    /// Keep the original casing (for cased vocabularies)
    #[arg(long)]
    cased: bool,
}

fn prepare(args: PrepareArgs) -> Result<()> {
    let dataset = match &args.data_dir {
        Some(path) => SummarizationDataset::from_dir(path)?,
        None => SummarizationDataset::new(&Resource::Remote(RemoteResource::archive(
            DatasetResources::CNN_DM,
        )))?,
    };
    let oracle_config = match &args.oracle_config {
        Some(path) => OracleConfig::from_file(path)?,
        None => OracleConfig {
            policy: match args.oracle {
                OracleArg::Greedy => OraclePolicy::Greedy,
                OracleArg::Combination => OraclePolicy::Combination,
            },
            ..Default::default()
        },
    };
    let conversion_config = match &args.config {
        Some(path) => ConversionConfig::from_file(path)?,
        None => ConversionConfig::default(),
    };
    let vocab = resource_or(&args.vocab, BertVocabResources::BERT_BASE_UNCASED);
    let converter = FeatureConverter::new(load_bert_tokenizer(&vocab, !args.cased)?, conversion_config)?;
    let oracle = OracleLabeler::new(&oracle_config);

    let split = Split::from(args.split);
    let documents = dataset.load(split, args.max_documents)?;
    let mut examples = Vec::with_capacity(documents.len());
    for document in documents.iter() {
        if let Some(example) = converter.convert_with_oracle(document, &oracle)? {
            examples.push(example);
        }
    }
    info!(
        "Kept {} of {} {} documents",
        examples.len(),
        documents.len(),
        split
    );
    write_examples(&args.output, &examples)?;
    println!("{} examples written to {}", examples.len(), args.output.display());
    Ok(())
}

#[derive(Args, Debug)]
struct TrainArgs {
    /// Prepared training examples
    #[arg(long)]
    examples: PathBuf,
    /// Prepared validation examples, evaluated after training
    #[arg(long)]
    validation_examples: Option<PathBuf>,
    /// Directory receiving checkpoints and configurations
    #[arg(long)]
    output_dir: PathBuf,
    /// JSON model configuration
    #[arg(long)]
    config: Option<PathBuf>,
    /// JSON training configuration
    #[arg(long)]
    training_config: Option<PathBuf>,
    /// Pretrained encoder configuration, bert-base-uncased when absent
    #[arg(long)]
    encoder_config: Option<PathBuf>,
    /// Pretrained encoder weights, bert-base-uncased when absent
    #[arg(long)]
    encoder_weights: Option<PathBuf>,
    /// WordPiece vocabulary used to prepare the examples
    #[arg(long)]
    vocab: Option<PathBuf>,
    #[arg(long)]
    cased: bool,
    /// cpu, cuda or cuda:<index>
    #[arg(long, default_value = "cuda", value_parser = parse_device)]
    device: Device,
}

fn train(args: TrainArgs) -> Result<()> {
    let model_config = match &args.config {
        Some(path) => BertSumConfig::from_file(path)?,
        None => BertSumConfig::default(),
    };
    let mut training_config = match &args.training_config {
        Some(path) => TrainingConfig::from_file(path)?,
        None => TrainingConfig::default(),
    };
    training_config.checkpoint_dir = args.output_dir.clone();

    let encoder_config = resource_or(&args.encoder_config, BertConfigResources::BERT_BASE_UNCASED);
    let encoder_config = BertConfig::from_file(encoder_config.get_local_path()?)?;
    let vocab = resource_or(&args.vocab, BertVocabResources::BERT_BASE_UNCASED);
    let pad_id = load_bert_tokenizer(&vocab, !args.cased)?.pad_id();

    let mut vs = nn::VarStore::new(args.device);
    let model = ExtractiveSummarizer::new(&vs.root(), &model_config, &encoder_config)?;
    if model.encoder_type() != EncoderType::Baseline {
        let weights = resource_or(&args.encoder_weights, BertModelResources::BERT_BASE_UNCASED);
        load_pretrained_encoder(&mut vs, &weights)?;
    }

    let examples = read_examples(&args.examples)
        .with_context(|| format!("reading {}", args.examples.display()))?;
    let trainer = Trainer::new(training_config)?;
    let checkpoint = trainer.train(&model, &vs, &examples, pad_id)?;
    println!("Last checkpoint: {}", checkpoint.display());

    if let Some(path) = &args.validation_examples {
        let validation = read_examples(path)?;
        let statistics = trainer.validate(&model, &validation, pad_id, args.device)?;
        println!("Validation xent: {:.4}", statistics.mean_loss());
    }
    Ok(())
}

#[derive(Args, Debug)]
struct CheckpointArgs {
    /// Training output directory
    #[arg(long)]
    checkpoint_dir: PathBuf,
    /// Step of the checkpoint to load
    #[arg(long)]
    step: usize,
    /// WordPiece vocabulary, bert-base-uncased when absent
    #[arg(long)]
    vocab: Option<PathBuf>,
    #[arg(long)]
    cased: bool,
    /// Number of sentences in a summary
    #[arg(long, default_value_t = 3)]
    max_sentences: usize,
    #[arg(long)]
    no_trigram_blocking: bool,
    #[arg(long, value_enum, default_value_t = OrderArg::Source)]
    order: OrderArg,
    #[arg(long, default_value = "cuda", value_parser = parse_device)]
    device: Device,
}

impl CheckpointArgs {
    fn summarization_config(&self) -> Result<SummarizationConfig> {
        let mut config = SummarizationConfig::from_checkpoint_dir(&self.checkpoint_dir, self.step)?;
        if let Some(vocab) = &self.vocab {
            config.vocab_resource = vocab.clone().into();
        }
        config.lower_case = !self.cased;
        config.selection_config.max_sentences = self.max_sentences;
        config.selection_config.block_trigrams = !self.no_trigram_blocking;
        config.selection_config.order = match self.order {
            OrderArg::Source => SummaryOrder::Source,
            OrderArg::Score => SummaryOrder::Score,
        };
        config.device = self.device;
        Ok(config)
    }
}

#[derive(Args, Debug)]
struct TestArgs {
    /// Prepared test examples
    #[arg(long)]
    examples: PathBuf,
    #[command(flatten)]
    checkpoint: CheckpointArgs,
    /// Directory receiving the candidate and gold files, a temporary directory when absent
    #[arg(long)]
    results_dir: Option<PathBuf>,
}

fn test(args: TestArgs) -> Result<()> {
    let model = ExtractiveSummarizationModel::new(args.checkpoint.summarization_config()?)?;
    let examples = read_examples(&args.examples)?;
    let candidates = model.summarize_examples(&examples, SENTENCE_SEPARATOR)?;
    let references: Vec<String> = examples.iter().map(|example| example.target.clone()).collect();

    let working_directory;
    let results_dir = match &args.results_dir {
        Some(path) => path.clone(),
        None => {
            working_directory = WorkingDirectory::new("bertsum-results")?;
            working_directory.path().to_path_buf()
        }
    };
    let prefix = format!("step_{}", args.checkpoint.step);
    let (candidate_path, gold_path) = write_results(&results_dir, &prefix, &candidates, &references)?;
    info!(
        "Candidates written to {}, references to {}",
        candidate_path.display(),
        gold_path.display()
    );
    let scores = rouge_scores(&candidates, &references)?;
    print!("{}", scores);
    Ok(())
}

#[derive(Args, Debug)]
struct SummarizeArgs {
    /// Text file with one article per line
    #[arg(long)]
    input: PathBuf,
    #[command(flatten)]
    checkpoint: CheckpointArgs,
}

fn summarize(args: SummarizeArgs) -> Result<()> {
    let model = ExtractiveSummarizationModel::new(args.checkpoint.summarization_config()?)?;
    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let articles: Vec<&str> = text.lines().filter(|line| !line.trim().is_empty()).collect();
    for summary in model.summarize(&articles)? {
        println!("{}", summary);
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("bertsum=info")),
        )
        .init();

    match Cli::parse().command {
        Commands::Prepare(args) => prepare(args),
        Commands::Train(args) => train(args),
        Commands::Test(args) => test(args),
        Commands::Summarize(args) => summarize(args),
    }
}
