use crate::common::error::BertSumError;
use crate::resources::Resource;
use rust_tokenizers::tokenizer::{BertTokenizer, Tokenizer};
use rust_tokenizers::vocab::{BertVocab, Vocab};

pub const CLS_TOKEN: &str = "[CLS]";
pub const SEP_TOKEN: &str = "[SEP]";
pub const PAD_TOKEN: &str = "[PAD]";

/// # Subword tokenizer used to encode documents
/// Abstracts the operations needed by the feature converter over the tokenizer implementation.
pub trait SubwordTokenizer {
    /// Splits text into subword tokens.
    fn tokenize(&self, text: &str) -> Vec<String>;

    /// Id of a subword token, unknown tokens map to the unknown token id.
    fn token_to_id(&self, token: &str) -> i64;

    /// Subword token for an id.
    fn id_to_token(&self, id: i64) -> String;

    fn tokens_to_ids(&self, tokens: &[String]) -> Vec<i64> {
        tokens.iter().map(|token| self.token_to_id(token)).collect()
    }

    fn ids_to_tokens(&self, ids: &[i64]) -> Vec<String> {
        ids.iter().map(|&id| self.id_to_token(id)).collect()
    }

    fn cls_id(&self) -> i64 {
        self.token_to_id(CLS_TOKEN)
    }

    fn sep_id(&self) -> i64 {
        self.token_to_id(SEP_TOKEN)
    }

    fn pad_id(&self) -> i64 {
        self.token_to_id(PAD_TOKEN)
    }
}

impl SubwordTokenizer for BertTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        Tokenizer::tokenize(self, text)
    }

    fn token_to_id(&self, token: &str) -> i64 {
        self.vocab().token_to_id(token)
    }

    fn id_to_token(&self, id: i64) -> String {
        self.vocab().id_to_token(&id)
    }
}

/// Loads a WordPiece tokenizer from a vocabulary resource.
///
/// # Arguments
///
/// * `vocab` - `Resource` pointing to a `vocab.txt` file (one token per line)
/// * `lower_case` - lowercase the input before tokenization (true for uncased models)
pub fn load_bert_tokenizer(
    vocab: &Resource,
    lower_case: bool,
) -> Result<BertTokenizer, BertSumError> {
    let vocab_path = vocab.get_local_path()?;
    let vocab_path = vocab_path.to_str().ok_or_else(|| {
        BertSumError::InvalidConfigurationError(format!(
            "vocabulary path {} is not valid UTF-8",
            vocab_path.display()
        ))
    })?;
    let vocab = BertVocab::from_file(vocab_path)?;
    Ok(BertTokenizer::from_existing_vocab(vocab, lower_case, lower_case))
}
