//! # Resource definitions for model weights, vocabularies, configuration files and corpora
//!
//! Files used by the summarizer are referenced as resources:
//! - pretrained encoder weights, configuration and vocabulary
//! - fine-tuned summarizer checkpoints
//! - raw article/summary corpora, possibly packed as a remote archive
//!
//! Two types of resources are pre-defined:
//! - LocalResource: points to a local file or directory
//! - RemoteResource: points to a remote file via a URL, downloaded once into the cache
//!
//! For both types the local location can be retrieved using `get_local_path`.
//! Remote resources are cached under `~/.cache/.bertsum` unless the `BERTSUM_CACHE`
//! environment variable points elsewhere.

use crate::common::error::BertSumError;
use cached_path::{Cache, Options};
use lazy_static::lazy_static;
use std::path::PathBuf;

/// # Resource Enum pointing to model, configuration, vocabulary or corpus resources
/// Can be of type:
/// - LocalResource
/// - RemoteResource
#[derive(PartialEq, Clone, Debug)]
pub enum Resource {
    Local(LocalResource),
    Remote(RemoteResource),
}

impl Resource {
    /// Gets the local path for a given resource.
    ///
    /// If the resource is a remote resource, it is downloaded (and extracted if it was marked
    /// as an archive) and the path of the cached copy is returned.
    ///
    /// # Returns
    ///
    /// * `PathBuf` pointing to the resource file or extracted directory
    ///
    /// # Example
    ///
    /// ```no_run
    /// use bertsum::resources::{LocalResource, Resource};
    /// use std::path::PathBuf;
    /// let config_resource = Resource::Local(LocalResource {
    ///     local_path: PathBuf::from("path/to/config.json"),
    /// });
    /// let config_path = config_resource.get_local_path();
    /// ```
    pub fn get_local_path(&self) -> Result<PathBuf, BertSumError> {
        match self {
            Resource::Local(resource) => Ok(resource.local_path.clone()),
            Resource::Remote(resource) => {
                let mut options = Options::default().subdir(&resource.cache_subdir);
                if resource.extract {
                    options = options.extract();
                }
                Ok(CACHE.cached_path_with_options(&resource.url, &options)?)
            }
        }
    }
}

/// # Local resource
#[derive(PartialEq, Clone, Debug)]
pub struct LocalResource {
    /// Local path for the resource
    pub local_path: PathBuf,
}

impl From<PathBuf> for Resource {
    fn from(local_path: PathBuf) -> Self {
        Resource::Local(LocalResource { local_path })
    }
}

/// # Remote resource
#[derive(PartialEq, Clone, Debug)]
pub struct RemoteResource {
    /// Remote path/url for the resource
    pub url: String,
    /// Sub-directory of the cache where the resource is stored
    pub cache_subdir: String,
    /// Archives (`.tar.gz`, `.zip`) are extracted after download
    pub extract: bool,
}

impl RemoteResource {
    /// Creates a new RemoteResource from an URL and a custom cache sub-directory.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use bertsum::resources::{RemoteResource, Resource};
    /// let config_resource = Resource::Remote(RemoteResource::new(
    ///     "https://huggingface.co/bert-base-uncased/resolve/main/config.json",
    ///     "bert-base-uncased/config",
    /// ));
    /// ```
    pub fn new(url: &str, cache_subdir: &str) -> RemoteResource {
        RemoteResource {
            url: url.to_string(),
            cache_subdir: cache_subdir.to_string(),
            extract: false,
        }
    }

    /// Creates a new RemoteResource from a (cache sub-directory, URL) pair as defined by the
    /// pretrained resource constants of this crate.
    pub fn from_pretrained(name_url_tuple: (&str, &str)) -> RemoteResource {
        RemoteResource::new(name_url_tuple.1, name_url_tuple.0)
    }

    /// Creates a RemoteResource pointing to an archive that is extracted once downloaded.
    pub fn archive(name_url_tuple: (&str, &str)) -> RemoteResource {
        RemoteResource {
            extract: true,
            ..RemoteResource::from_pretrained(name_url_tuple)
        }
    }
}

/// # Pretrained encoder weight files
pub struct BertModelResources;

/// # Pretrained encoder config files
pub struct BertConfigResources;

/// # Pretrained encoder vocab files
pub struct BertVocabResources;

impl BertModelResources {
    /// Shared under Apache 2.0 license by the Google team at <https://github.com/google-research/bert>. Modified with conversion to C-array format.
    pub const BERT_BASE_UNCASED: (&'static str, &'static str) = (
        "bert-base-uncased/model",
        "https://huggingface.co/bert-base-uncased/resolve/main/rust_model.ot",
    );
}

impl BertConfigResources {
    /// Shared under Apache 2.0 license by the Google team at <https://github.com/google-research/bert>. Modified with conversion to C-array format.
    pub const BERT_BASE_UNCASED: (&'static str, &'static str) = (
        "bert-base-uncased/config",
        "https://huggingface.co/bert-base-uncased/resolve/main/config.json",
    );
}

impl BertVocabResources {
    /// Shared under Apache 2.0 license by the Google team at <https://github.com/google-research/bert>. Modified with conversion to C-array format.
    pub const BERT_BASE_UNCASED: (&'static str, &'static str) = (
        "bert-base-uncased/vocab",
        "https://huggingface.co/bert-base-uncased/resolve/main/vocab.txt",
    );
}

lazy_static! {
    pub static ref CACHE: Cache = Cache::builder()
        .dir(_get_cache_directory())
        .build()
        .expect("could not initialize the resource cache");
}

fn _get_cache_directory() -> PathBuf {
    match std::env::var("BERTSUM_CACHE") {
        Ok(value) => PathBuf::from(value),
        Err(_) => {
            let mut home = dirs::home_dir().unwrap_or_else(std::env::temp_dir);
            home.push(".cache");
            home.push(".bertsum");
            home
        }
    }
}
