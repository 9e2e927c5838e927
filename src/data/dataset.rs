use crate::common::error::BertSumError;
use crate::data::sentences::split_sentences;
use crate::resources::Resource;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

/// # Pretrained corpora archives
pub struct DatasetResources;

impl DatasetResources {
    /// CNN / Daily Mail articles and highlights, one document per line (`train.source`, `train.target`, `val.*`, `test.*`).
    /// Shared by Hugging Face Inc for the sequence-to-sequence summarization examples.
    pub const CNN_DM: (&'static str, &'static str) = (
        "cnn-dm",
        "https://cdn-datasets.huggingface.co/summarization/cnn_dm_v2.tgz",
    );
}

/// # Dataset split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    Train,
    Validation,
    Test,
}

impl Split {
    fn file_stem(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Validation => "val",
            Split::Test => "test",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_stem())
    }
}

/// # Document to summarize
/// Source article and reference summary, both as sentences of word tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Article sentences
    pub source: Vec<Vec<String>>,
    /// Reference summary sentences
    pub target: Vec<Vec<String>>,
}

impl Document {
    pub fn new(source: Vec<Vec<String>>, target: Vec<Vec<String>>) -> Document {
        Document { source, target }
    }

    /// Builds a document from raw article and summary text, splitting both into sentences.
    ///
    /// # Example
    ///
    /// ```
    /// use bertsum::data::Document;
    /// let document = Document::from_text("The cat sat. It was sunny.", "The cat sat.");
    /// assert_eq!(document.source.len(), 2);
    /// assert_eq!(document.target.len(), 1);
    /// ```
    pub fn from_text(article: &str, summary: &str) -> Document {
        Document {
            source: split_sentences(article),
            target: split_sentences(summary),
        }
    }

    /// Article sentences as space-joined strings.
    pub fn source_sentences(&self) -> Vec<String> {
        self.source.iter().map(|sentence| sentence.join(" ")).collect()
    }

    /// Reference summary with sentences separated by `<q>`.
    pub fn target_text(&self) -> String {
        self.target
            .iter()
            .map(|sentence| sentence.join(" "))
            .collect::<Vec<String>>()
            .join("<q>")
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }
}

/// # Line-aligned summarization corpus
/// A directory holding `<split>.source` and `<split>.target` files where line `i` of both files
/// forms one (article, summary) pair.
#[derive(Debug, Clone)]
pub struct SummarizationDataset {
    root: PathBuf,
}

impl SummarizationDataset {
    /// Opens a dataset directory. Remote resources are downloaded and extracted first.
    /// Archives that extract into a single sub-directory are handled transparently.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # fn main() -> anyhow::Result<()> {
    /// use bertsum::data::{DatasetResources, Split, SummarizationDataset};
    /// use bertsum::resources::{RemoteResource, Resource};
    ///
    /// let resource = Resource::Remote(RemoteResource::archive(DatasetResources::CNN_DM));
    /// let dataset = SummarizationDataset::new(&resource)?;
    /// let documents = dataset.load(Split::Validation, Some(100))?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(resource: &Resource) -> Result<SummarizationDataset, BertSumError> {
        let root = resource.get_local_path()?;
        SummarizationDataset::from_dir(root)
    }

    pub fn from_dir<P: AsRef<Path>>(root: P) -> Result<SummarizationDataset, BertSumError> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(BertSumError::IOError(format!(
                "dataset directory {} does not exist",
                root.display()
            )));
        }
        let root = match SummarizationDataset::nested_root(&root)? {
            Some(nested) => nested,
            None => root,
        };
        Ok(SummarizationDataset { root })
    }

    fn nested_root(root: &Path) -> Result<Option<PathBuf>, BertSumError> {
        let has_files = fs::read_dir(root)?
            .filter_map(Result::ok)
            .any(|entry| entry.path().is_file());
        if has_files {
            return Ok(None);
        }
        let directories: Vec<PathBuf> = fs::read_dir(root)?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect();
        Ok(match directories.as_slice() {
            [single] => Some(single.clone()),
            _ => None,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Streams the documents of a split.
    pub fn documents(&self, split: Split) -> Result<DocumentReader, BertSumError> {
        let source_path = self.root.join(format!("{}.source", split.file_stem()));
        let target_path = self.root.join(format!("{}.target", split.file_stem()));
        DocumentReader::new(&source_path, &target_path)
    }

    /// Loads the documents of a split, optionally capped to the first `max_documents` pairs.
    /// Pairs with an empty article line are skipped.
    pub fn load(
        &self,
        split: Split,
        max_documents: Option<usize>,
    ) -> Result<Vec<Document>, BertSumError> {
        let mut documents = Vec::new();
        for document in self.documents(split)? {
            if max_documents.map_or(false, |max| documents.len() >= max) {
                break;
            }
            let document = document?;
            if !document.is_empty() {
                documents.push(document);
            }
        }
        Ok(documents)
    }
}

/// Iterator over the (article, summary) line pairs of a split.
/// Yields an error if one file has more lines than the other.
pub struct DocumentReader {
    sources: Lines<BufReader<File>>,
    targets: Lines<BufReader<File>>,
    line: usize,
    done: bool,
}

impl DocumentReader {
    fn new(source_path: &Path, target_path: &Path) -> Result<DocumentReader, BertSumError> {
        let open = |path: &Path| {
            File::open(path).map_err(|e| {
                BertSumError::IOError(format!("could not open {}: {}", path.display(), e))
            })
        };
        Ok(DocumentReader {
            sources: BufReader::new(open(source_path)?).lines(),
            targets: BufReader::new(open(target_path)?).lines(),
            line: 0,
            done: false,
        })
    }
}

impl Iterator for DocumentReader {
    type Item = Result<Document, BertSumError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        self.line += 1;
        match (self.sources.next(), self.targets.next()) {
            (None, None) => {
                self.done = true;
                None
            }
            (Some(Ok(article)), Some(Ok(summary))) => {
                Some(Ok(Document::from_text(&article, &summary)))
            }
            (Some(Err(e)), _) | (_, Some(Err(e))) => {
                self.done = true;
                Some(Err(e.into()))
            }
            _ => {
                self.done = true;
                Some(Err(BertSumError::ValueError(format!(
                    "source and target files have a different number of lines (mismatch at line {})",
                    self.line
                ))))
            }
        }
    }
}
