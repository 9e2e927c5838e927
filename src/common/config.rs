// Copyright 2019 Guillaume Becquin
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//     http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::common::error::BertSumError;
use rust_bert::bert::BertConfig;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// # Utility to deserialize JSON configuration files
/// Shared by the encoder configuration and every configuration defined in this crate.
pub trait Config
where
    Self: Sized + DeserializeOwned,
{
    /// Loads a `Config` object from a JSON file. The format is expected to be aligned with the
    /// [Transformers library](https://github.com/huggingface/transformers) configuration files
    /// for encoder configurations, and with the serde representation of this crate's types otherwise.
    ///
    /// # Arguments
    ///
    /// * `path` - `Path` to the configuration JSON file.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use bertsum::training::TrainingConfig;
    /// use bertsum::Config;
    /// use std::path::Path;
    ///
    /// let config_path = Path::new("path/to/training_config.json");
    /// let config = TrainingConfig::from_file(config_path).unwrap();
    /// ```
    fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, BertSumError> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            BertSumError::IOError(format!("could not open {}: {}", path.display(), e))
        })?;
        let br = BufReader::new(f);
        let config: Self = serde_json::from_reader(br)?;
        Ok(config)
    }

    /// Writes the configuration as pretty-printed JSON, used next to checkpoints.
    fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), BertSumError>
    where
        Self: Serialize,
    {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}

impl Config for BertConfig {}
